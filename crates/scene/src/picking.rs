use std::cmp::Ordering;

use foundation::math::Vec3;
use foundation::math::precision::cmp_keys;

use crate::camera::{Camera, Viewport};
use crate::config::PickConfig;
use crate::registry::{RegionKey, RegionRegistry};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Nearest positive intersection with a sphere centered at the origin.
pub fn ray_sphere_hit(ray: Ray, radius: f64) -> Option<Vec3> {
    let dir = ray.dir.normalized()?;
    let b = ray.origin.dot(dir);
    let c = ray.origin.dot(ray.origin) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sdisc = disc.sqrt();
    let t0 = -b - sdisc;
    let t1 = -b + sdisc;
    let t = if t0 > 0.0 {
        t0
    } else if t1 > 0.0 {
        t1
    } else {
        return None;
    };
    Some(ray.origin + dir * t)
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub region: RegionKey,
    /// Point on the globe under the pointer.
    pub point: Vec3,
    /// Distance from `point` to the region's bounding volume.
    pub distance: f64,
}

/// Resolves the region under the pointer from bounding volumes alone.
///
/// Resolution order:
/// - the region whose bounds are nearest to the globe hit point wins, ties going
///   to the smaller bounds and then to build order;
/// - a region with a bounding diagonal below `small_region_diagonal` is
///   preferred when its weighted distance `d * (0.5 + diagonal / 2)` is within
///   `small_region_ratio` of the raw winner;
/// - a winner with subdivisions hands over to its nearest subdivision when that
///   one is within `subdivision_ratio` of the winner's distance.
///
/// Containment is never tested, so a pick near a shared border can land on the
/// neighbor.
#[derive(Debug, Clone)]
pub struct RegionPicker {
    config: PickConfig,
    globe_radius: f64,
}

impl RegionPicker {
    pub fn new(config: PickConfig, globe_radius: f64) -> Self {
        Self {
            config,
            globe_radius,
        }
    }

    pub fn config(&self) -> &PickConfig {
        &self.config
    }

    /// Picks at pointer pixel `(x_px, y_px)` inside `viewport`.
    pub fn pick(
        &self,
        registry: &RegionRegistry,
        camera: &Camera,
        viewport: Viewport,
        x_px: f64,
        y_px: f64,
    ) -> Option<PickHit> {
        let ray = camera.ray_through_ndc(viewport.ndc(x_px, y_px))?;
        self.pick_ray(registry, ray)
    }

    pub fn pick_ray(&self, registry: &RegionRegistry, ray: Ray) -> Option<PickHit> {
        let point = ray_sphere_hit(ray, self.globe_radius)?;
        self.resolve_point(registry, point)
    }

    /// Region nearest to the globe point `point`.
    ///
    /// Each region is measured from `point` lifted onto its own layer shell, so
    /// layers drawn above the globe are not penalized for their height.
    pub fn resolve_point(&self, registry: &RegionRegistry, point: Vec3) -> Option<PickHit> {
        let dir = point.normalized()?;
        let mut best: Option<Candidate> = None;
        let mut best_small: Option<Candidate> = None;

        for (key, region) in registry.iter() {
            let distance = region.bounds.distance_to_point(dir * region.radius);
            if !distance.is_finite() {
                continue;
            }
            let diagonal = region.bounds.diagonal();
            let candidate = Candidate {
                key,
                distance,
                diagonal,
                score: distance,
            };
            if best.is_none_or(|b| candidate.cmp_score(&b).is_lt()) {
                best = Some(candidate);
            }

            if diagonal < self.config.small_region_diagonal {
                let weighted = Candidate {
                    score: distance * (0.5 + diagonal / 2.0),
                    ..candidate
                };
                if best_small.is_none_or(|b| weighted.cmp_score(&b).is_lt()) {
                    best_small = Some(weighted);
                }
            }
        }

        let mut chosen = best?;
        if let Some(small) = best_small
            && small.score <= self.config.small_region_ratio * chosen.distance
        {
            chosen = small;
        }

        let refined = self.refine_subdivision(registry, chosen, dir);
        Some(PickHit {
            region: refined.key,
            point,
            distance: refined.distance,
        })
    }

    fn refine_subdivision(
        &self,
        registry: &RegionRegistry,
        chosen: Candidate,
        dir: Vec3,
    ) -> Candidate {
        let Some(parent) = registry.get(chosen.key) else {
            return chosen;
        };
        let children = registry.subdivisions_of(&parent.id);
        let mut nearest: Option<Candidate> = None;
        for key in children {
            let Some(child) = registry.get(*key) else {
                continue;
            };
            let distance = child.bounds.distance_to_point(dir * child.radius);
            let candidate = Candidate {
                key: *key,
                distance,
                diagonal: child.bounds.diagonal(),
                score: distance,
            };
            if nearest.is_none_or(|n| candidate.cmp_score(&n).is_lt()) {
                nearest = Some(candidate);
            }
        }
        match nearest {
            Some(child) if child.distance <= self.config.subdivision_ratio * chosen.distance => {
                child
            }
            _ => chosen,
        }
    }
}

#[derive(Debug, Copy, Clone)]
struct Candidate {
    key: RegionKey,
    distance: f64,
    diagonal: f64,
    score: f64,
}

impl Candidate {
    fn cmp_score(&self, other: &Candidate) -> Ordering {
        cmp_keys(&[self.score, self.diagonal], &[other.score, other.diagonal])
            .then_with(|| self.key.index().cmp(&other.key.index()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Ray, RegionPicker, ray_sphere_hit};
    use crate::camera::{Camera, Viewport};
    use crate::config::PickConfig;
    use crate::region::{LayerKind, Region};
    use crate::registry::RegionRegistry;
    use foundation::bounds::Aabb3;
    use foundation::math::{Vec3, project};

    fn boxed(id: &str, min: Vec3, max: Vec3) -> Region {
        Region {
            id: id.to_string(),
            layer: LayerKind::Base,
            visited: false,
            radius: 1.0,
            polygons: Vec::new(),
            bounds: Aabb3::new(min, max),
            centroid: Vec3::ZERO,
            boundaries: Vec::new(),
            fill: None,
        }
    }

    fn picker() -> RegionPicker {
        RegionPicker::new(PickConfig::default(), 1.0)
    }

    #[test]
    fn sphere_hit_takes_front_surface() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = ray_sphere_hit(ray, 1.0).expect("hit");
        assert!(hit.distance(Vec3::new(0.0, 0.0, 1.0)) < 1e-12);
    }

    #[test]
    fn sphere_miss_is_none() {
        let ray = Ray::new(Vec3::new(0.0, 2.0, 3.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(ray_sphere_hit(ray, 1.0).is_none());
        let away = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(ray_sphere_hit(away, 1.0).is_none());
    }

    #[test]
    fn small_region_beats_nearer_large_region() {
        let mut reg = RegionRegistry::new();
        let big = reg
            .insert(boxed("big", Vec3::new(0.9, -0.2, -0.2), Vec3::new(0.99, 0.2, 0.2)))
            .expect("big");
        let small = reg
            .insert(boxed("small", Vec3::new(1.012, 0.04, 0.04), Vec3::new(1.02, 0.06, 0.06)))
            .expect("small");
        let p = Vec3::new(1.0, 0.05, 0.05).normalized().expect("unit");

        let raw_big = reg.get(big).expect("big").bounds.distance_to_point(p);
        let raw_small = reg.get(small).expect("small").bounds.distance_to_point(p);
        assert!(raw_big < raw_small);

        let hit = picker().resolve_point(&reg, p).expect("hit");
        assert_eq!(hit.region, small);
    }

    #[test]
    fn far_small_region_does_not_steal_the_pick() {
        let mut reg = RegionRegistry::new();
        let big = reg
            .insert(boxed("big", Vec3::new(0.9, -0.2, -0.2), Vec3::new(1.0, 0.2, 0.2)))
            .expect("big");
        reg.insert(boxed("small", Vec3::new(0.5, 0.5, 0.5), Vec3::new(0.51, 0.51, 0.51)))
            .expect("small");
        let hit = picker()
            .resolve_point(&reg, Vec3::new(1.0, 0.0, 0.0))
            .expect("hit");
        assert_eq!(hit.region, big);
    }

    #[test]
    fn country_hands_over_to_nearby_subdivision() {
        let mut reg = RegionRegistry::new();
        let country = reg
            .insert(boxed("C", Vec3::new(0.5, -0.5, -0.5), Vec3::new(0.98, 0.5, 0.5)))
            .expect("country");
        let sub = reg
            .insert(boxed("C-a", Vec3::new(0.9, 0.0, 0.0), Vec3::new(0.98, 0.3, 0.3)))
            .expect("sub");
        reg.add_child("C", sub);
        let on_globe = |y: f64, z: f64| Vec3::new((1.0 - y * y - z * z).sqrt(), y, z);

        let inside_sub = picker().resolve_point(&reg, on_globe(0.1, 0.1)).expect("hit");
        assert_eq!(inside_sub.region, sub);

        let outside_sub = picker()
            .resolve_point(&reg, on_globe(-0.3, -0.3))
            .expect("hit");
        assert_eq!(outside_sub.region, country);

        // Country bounds are nearer, but the subdivision is within the ratio.
        let near_sub = picker()
            .resolve_point(&reg, on_globe(-0.01, 0.1))
            .expect("hit");
        assert_eq!(near_sub.region, sub);

        let far_from_sub = picker()
            .resolve_point(&reg, on_globe(-0.1, 0.1))
            .expect("hit");
        assert_eq!(far_from_sub.region, country);
    }

    #[test]
    fn layers_are_measured_on_their_own_shell() {
        let mut reg = RegionRegistry::new();
        let mut raised = boxed(
            "raised",
            Vec3::new(1.001, -0.01, -0.01),
            Vec3::new(1.003, 0.01, 0.01),
        );
        raised.radius = 1.002;
        let raised = reg.insert(raised).expect("raised");
        reg.insert(boxed("flat", Vec3::new(0.9, -0.3, -0.3), Vec3::new(1.0, 0.3, 0.3)))
            .expect("flat");
        let hit = picker()
            .resolve_point(&reg, Vec3::new(1.0, 0.0, 0.0))
            .expect("hit");
        assert_eq!(hit.region, raised);
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn empty_registry_picks_nothing() {
        let reg = RegionRegistry::new();
        assert!(picker().resolve_point(&reg, Vec3::new(1.0, 0.0, 0.0)).is_none());
    }

    #[test]
    fn picking_is_deterministic() {
        let mut reg = RegionRegistry::new();
        reg.insert(boxed("a", Vec3::new(0.9, -0.1, -0.1), Vec3::new(1.0, 0.1, 0.1)))
            .expect("a");
        reg.insert(boxed("b", Vec3::new(0.9, -0.1, -0.1), Vec3::new(1.0, 0.1, 0.1)))
            .expect("b");
        let cam = Camera::new(project(0.0, 0.0, 3.0), 1.0);
        let vp = Viewport::new(400, 400);
        let first = picker().pick(&reg, &cam, vp, 200.0, 200.0).expect("hit");
        let second = picker().pick(&reg, &cam, vp, 200.0, 200.0).expect("hit");
        assert_eq!(first, second);
        assert_eq!(reg.get(first.region).map(|r| r.id.as_str()), Some("a"));
    }

    #[test]
    fn pointer_off_globe_picks_nothing() {
        let mut reg = RegionRegistry::new();
        reg.insert(boxed("a", Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0)))
            .expect("a");
        let cam = Camera::new(Vec3::new(0.0, 0.0, 3.4), 1.0);
        let vp = Viewport::new(400, 400);
        assert!(picker().pick(&reg, &cam, vp, 0.0, 0.0).is_none());
    }
}
