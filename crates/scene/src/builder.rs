//! Region builder: projects feature rings onto the globe and produces the
//! boundary strips, bounding volumes, centroids and visited fills that the
//! registry owns.
//!
//! Fills are triangulated in a tangent plane at the ring centroid. When that
//! plane is degenerate, or the triangulation yields nothing, the polygon is
//! marked with a small disc instead so a visited region is never invisible.

use earcutr::earcut;
use formats::{RegionDataset, RegionFeature, VisitedPlaces};
use foundation::bounds::Aabb3;
use foundation::math::{Vec3, project};
use tracing::{debug, info, warn};

use crate::config::BuildConfig;
use crate::region::{FillPrimitive, LayerKind, LinePrimitive, Region};
use crate::registry::{RegionKey, RegionRegistry};

/// Id of a feature from the detailed dataset.
///
/// The feature carrying the country's own outline (named after the country, or
/// unnamed) keeps the bare country id; every other one is `"<country>-<name>"`.
pub fn subdivision_id(country: &str, name: &str) -> String {
    if name.is_empty() || name == country {
        country.to_string()
    } else {
        format!("{country}-{name}")
    }
}

#[derive(Debug, Clone)]
pub struct RegionBuilder {
    config: BuildConfig,
}

impl RegionBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn layer_radius(&self, layer: LayerKind) -> f64 {
        let scale = match layer {
            LayerKind::Base => self.config.base_scale,
            LayerKind::Detailed => self.config.detailed_scale,
        };
        self.config.globe_radius * scale
    }

    /// Builds a fresh registry. Primitive colors are left unset; the material
    /// manager paints them for the current theme.
    pub fn build(
        &self,
        base: &RegionDataset,
        detailed: Option<&RegionDataset>,
        visited: &VisitedPlaces,
    ) -> RegionRegistry {
        let mut registry = RegionRegistry::new();
        let country = self.config.detailed_country.as_str();

        registry.stats_mut().features_skipped =
            base.skipped + detailed.map(|d| d.skipped).unwrap_or(0);

        for feature in &base.features {
            registry.stats_mut().features_seen += 1;
            if detailed.is_some() && feature.name == country {
                debug!(country, "base outline replaced by detailed dataset");
                continue;
            }
            self.build_feature(
                &mut registry,
                feature,
                feature.name.clone(),
                LayerKind::Base,
                visited,
            );
        }

        if let Some(detailed) = detailed {
            for feature in &detailed.features {
                registry.stats_mut().features_seen += 1;
                let id = subdivision_id(country, &feature.name);
                let is_outline = id == country;
                let key =
                    self.build_feature(&mut registry, feature, id, LayerKind::Detailed, visited);
                if let Some(key) = key
                    && !is_outline
                {
                    registry.add_child(country, key);
                }
            }
        }

        let stats = registry.stats();
        info!(
            regions = registry.len(),
            visited = registry.visited_count(),
            fills = stats.fills,
            fallback_discs = stats.fallback_discs,
            skipped = stats.features_skipped,
            "region registry built"
        );
        registry
    }

    fn build_feature(
        &self,
        registry: &mut RegionRegistry,
        feature: &RegionFeature,
        id: String,
        layer: LayerKind,
        visited: &VisitedPlaces,
    ) -> Option<RegionKey> {
        let radius = self.layer_radius(layer);
        let is_visited = visited.contains(&id);

        let mut bounds = Aabb3::empty();
        let mut sum = Vec3::ZERO;
        let mut count = 0usize;
        let mut first: Option<Vec3> = None;
        let mut boundaries = Vec::new();
        let mut fill = is_visited.then(FillPrimitive::new);
        let mut degenerate_rings = 0usize;

        for polygon in &feature.polygons {
            let mut fillable: Vec<Vec<Vec3>> = Vec::new();
            for ring in polygon {
                let points: Vec<Vec3> = ring
                    .iter()
                    .map(|p| project(p.lat_deg, p.lon_deg, radius))
                    .collect();
                for p in &points {
                    bounds.expand(*p);
                    sum += *p;
                }
                count += points.len();
                if first.is_none() {
                    first = points.first().copied();
                }

                if points.len() < 3 {
                    degenerate_rings += 1;
                }
                if points.len() >= 2 {
                    boundaries.push(LinePrimitive::new(close_strip(&points)));
                }
                if points.len() >= 3 {
                    fillable.push(points);
                }
            }

            if let Some(fill) = &mut fill
                && !fillable.is_empty()
            {
                self.fill_polygon(fill, &fillable, radius, &id);
            }
        }

        registry.stats_mut().degenerate_rings += degenerate_rings;

        if count == 0 {
            debug!(region = %id, "no projectable points, region omitted");
            return None;
        }

        let fill = fill.filter(|f| !f.is_empty());
        if let Some(fill) = &fill {
            let stats = registry.stats_mut();
            stats.fills += 1;
            stats.fallback_discs += fill.fallback_discs;
        }

        let centroid_radius = radius + self.config.centroid_lift;
        let centroid = match feature.centroid_hint {
            Some(hint) => project(hint.lat_deg, hint.lon_deg, centroid_radius),
            None => (sum * (1.0 / count as f64))
                .normalized()
                .or_else(|| first.and_then(Vec3::normalized))
                .map(|dir| dir * centroid_radius)
                .unwrap_or(Vec3::ZERO),
        };

        let region = Region {
            id,
            layer,
            visited: is_visited,
            radius,
            polygons: feature.polygons.clone(),
            bounds,
            centroid,
            boundaries,
            fill,
        };
        let id_for_log = region.id.clone();
        let key = registry.insert(region);
        if key.is_none() {
            warn!(region = %id_for_log, "duplicate region id, keeping the first");
        }
        key
    }

    /// Adds one polygon (outer ring first, then holes) to `fill`.
    fn fill_polygon(&self, fill: &mut FillPrimitive, rings: &[Vec<Vec3>], radius: f64, id: &str) {
        let lift = (radius + self.config.fill_lift) / radius;
        if let Some((vertices, indices)) = self.triangulate(rings) {
            // Triangles keep the ring's own vertices, not a flat plane at the centroid.
            let lifted: Vec<Vec3> = vertices.iter().map(|v| *v * lift).collect();
            fill.append(&lifted, indices);
            return;
        }

        let Some(outer) = rings.first() else {
            return;
        };
        let Some((vertices, indices)) = self.disc(outer, radius + self.config.fill_lift) else {
            return;
        };
        debug!(region = id, "fill fell back to disc marker");
        fill.append(&vertices, indices);
        fill.fallback_discs += 1;
    }

    /// Ear-clips the rings in the tangent plane at the outer ring's centroid.
    fn triangulate(&self, rings: &[Vec<Vec3>]) -> Option<(Vec<Vec3>, Vec<u32>)> {
        let outer = rings.first()?;
        let origin = mean(outer)?;
        if origin.length() < self.config.degenerate_normal_eps {
            return None;
        }
        let (_, east, north) = tangent_basis(origin)?;

        let mut vertices_3d: Vec<Vec3> = Vec::new();
        let mut coords_2d: Vec<f64> = Vec::new();
        let mut hole_indices: Vec<usize> = Vec::new();

        for (ring_i, ring) in rings.iter().enumerate() {
            let pts = drop_closing_duplicate(ring);
            if pts.len() < 3 {
                if ring_i == 0 {
                    return None;
                }
                continue;
            }
            if ring_i > 0 {
                hole_indices.push(vertices_3d.len());
            }
            for p in pts {
                let v = *p - origin;
                coords_2d.push(v.dot(east));
                coords_2d.push(v.dot(north));
                vertices_3d.push(*p);
            }
        }

        let outer_len = hole_indices.first().copied().unwrap_or(vertices_3d.len());
        if signed_area(&coords_2d[..outer_len * 2]).abs() < self.config.degenerate_area_eps {
            return None;
        }

        let indices = earcut(&coords_2d, &hole_indices, 2).ok()?;
        if indices.is_empty() {
            return None;
        }
        Some((vertices_3d, indices.into_iter().map(|i| i as u32).collect()))
    }

    /// Flat disc facing away from the globe center at the ring's centroid.
    fn disc(&self, ring: &[Vec3], radius: f64) -> Option<(Vec<Vec3>, Vec<u32>)> {
        let dir = mean(ring)
            .and_then(Vec3::normalized)
            .or_else(|| ring.first().and_then(|p| p.normalized()))?;
        let (normal, east, north) = tangent_basis(dir)?;
        let center = normal * radius;
        let segments = self.config.disc_segments.max(3);

        let mut vertices = Vec::with_capacity(segments as usize + 1);
        vertices.push(center);
        for k in 0..segments {
            let a = std::f64::consts::TAU * k as f64 / segments as f64;
            vertices.push(center + (east * a.cos() + north * a.sin()) * self.config.disc_radius);
        }
        let indices = (0..segments)
            .flat_map(|k| [0, 1 + k, 1 + (k + 1) % segments])
            .collect();
        Some((vertices, indices))
    }
}

/// Line strip for a ring, closing it when it has at least three points.
fn close_strip(points: &[Vec3]) -> Vec<Vec3> {
    let mut out = points.to_vec();
    if points.len() >= 3
        && let (Some(first), Some(last)) = (points.first(), points.last())
        && first.distance(*last) > 1e-12
    {
        out.push(*first);
    }
    out
}

fn drop_closing_duplicate(points: &[Vec3]) -> &[Vec3] {
    match points {
        [first, rest @ .., last] if !rest.is_empty() && first.distance(*last) <= 1e-12 => {
            &points[..points.len() - 1]
        }
        _ => points,
    }
}

fn mean(points: &[Vec3]) -> Option<Vec3> {
    if points.is_empty() {
        return None;
    }
    let mut sum = Vec3::ZERO;
    for p in points {
        sum += *p;
    }
    Some(sum * (1.0 / points.len() as f64))
}

/// `(normal, east, north)` at direction `p`.
fn tangent_basis(p: Vec3) -> Option<(Vec3, Vec3, Vec3)> {
    let normal = p.normalized()?;
    let up = if normal.y.abs() < 0.99 {
        Vec3::Y
    } else {
        Vec3::new(1.0, 0.0, 0.0)
    };
    let east = up.cross(normal).normalized()?;
    let north = normal.cross(east);
    Some((normal, east, north))
}

/// Shoelace area of an interleaved `[x0, y0, x1, y1, ..]` outline.
fn signed_area(coords: &[f64]) -> f64 {
    let n = coords.len() / 2;
    let mut acc = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        acc += coords[2 * i] * coords[2 * j + 1] - coords[2 * j] * coords[2 * i + 1];
    }
    0.5 * acc
}

#[cfg(test)]
mod tests {
    use super::{RegionBuilder, subdivision_id};
    use crate::config::BuildConfig;
    use crate::region::LayerKind;
    use formats::{GeoPoint, RegionDataset, RegionFeature, VisitedPlaces};
    use foundation::math::project;
    use pretty_assertions::assert_eq;

    fn square(name: &str, lat: f64, lon: f64, size: f64) -> RegionFeature {
        RegionFeature::new(
            name,
            vec![vec![vec![
                GeoPoint::new(lon, lat),
                GeoPoint::new(lon + size, lat),
                GeoPoint::new(lon + size, lat + size),
                GeoPoint::new(lon, lat + size),
            ]]],
        )
    }

    fn builder() -> RegionBuilder {
        RegionBuilder::new(BuildConfig::default())
    }

    #[test]
    fn subdivision_ids_are_namespaced() {
        assert_eq!(subdivision_id("中国", "北京"), "中国-北京");
        assert_eq!(subdivision_id("中国", "中国"), "中国");
        assert_eq!(subdivision_id("中国", ""), "中国");
    }

    #[test]
    fn fills_exist_only_for_visited_regions() {
        let base = RegionDataset::new(vec![
            square("France", 43.0, 0.0, 5.0),
            square("Spain", 37.0, -8.0, 5.0),
        ]);
        let visited: VisitedPlaces = ["France"].into_iter().collect();
        let reg = builder().build(&base, None, &visited);

        assert_eq!(reg.len(), 2);
        for (_, region) in reg.iter() {
            assert_eq!(region.visited, visited.contains(&region.id));
            assert_eq!(region.has_fill(), region.visited);
        }
        let france = reg.by_id("France").expect("France");
        let fill = france.fill.as_ref().expect("fill");
        assert_eq!(fill.triangle_count(), 2);
        assert_eq!(fill.fallback_discs, 0);
    }

    #[test]
    fn boundaries_close_their_rings() {
        let base = RegionDataset::new(vec![square("A", 0.0, 0.0, 1.0)]);
        let reg = builder().build(&base, None, &VisitedPlaces::new());
        let a = reg.by_id("A").expect("A");
        assert_eq!(a.boundaries.len(), 1);
        let strip = &a.boundaries[0].points;
        assert_eq!(strip.len(), 5);
        assert_eq!(strip.first(), strip.last());
    }

    #[test]
    fn every_feature_with_points_is_registered() {
        let lonely = RegionFeature::new("Dot", vec![vec![vec![GeoPoint::new(10.0, 10.0)]]]);
        let empty = RegionFeature::new("Nothing", vec![vec![Vec::new()]]);
        let no_geometry = RegionFeature::new("Null", Vec::new());
        let base = RegionDataset::new(vec![
            lonely,
            empty,
            no_geometry,
            square("Sq", 0.0, 0.0, 1.0),
        ]);
        let reg = builder().build(&base, None, &VisitedPlaces::new());

        assert!(reg.contains("Dot"));
        assert!(reg.contains("Sq"));
        assert!(!reg.contains("Nothing"));
        assert!(!reg.contains("Null"));
        let dot = reg.by_id("Dot").expect("Dot");
        assert!(dot.boundaries.is_empty());
        assert!(dot.bounds.contains(project(10.0, 10.0, 1.0)));
    }

    #[test]
    fn visited_two_point_ring_has_no_fill() {
        let line = RegionFeature::new(
            "Line",
            vec![vec![vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)]]],
        );
        let visited: VisitedPlaces = ["Line"].into_iter().collect();
        let reg = builder().build(&RegionDataset::new(vec![line]), None, &visited);
        let region = reg.by_id("Line").expect("Line");
        assert!(region.visited);
        assert!(!region.has_fill());
        assert_eq!(region.boundaries.len(), 1);
    }

    #[test]
    fn collinear_ring_falls_back_to_disc() {
        let sliver = RegionFeature::new(
            "Sliver",
            vec![vec![vec![
                GeoPoint::new(0.0, 0.0),
                GeoPoint::new(1.0, 0.0),
                GeoPoint::new(2.0, 0.0),
            ]]],
        );
        let visited: VisitedPlaces = ["Sliver"].into_iter().collect();
        let reg = builder().build(&RegionDataset::new(vec![sliver]), None, &visited);
        let fill = reg
            .by_id("Sliver")
            .and_then(|r| r.fill.as_ref())
            .expect("fill");
        assert_eq!(fill.fallback_discs, 1);
        assert_eq!(fill.triangle_count(), 16);
        assert_eq!(reg.stats().fallback_discs, 1);
    }

    #[test]
    fn holes_are_cut_from_fills() {
        let outer = vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(4.0, 0.0),
            GeoPoint::new(4.0, 4.0),
            GeoPoint::new(0.0, 4.0),
            GeoPoint::new(0.0, 0.0),
        ];
        let hole = vec![
            GeoPoint::new(1.0, 1.0),
            GeoPoint::new(1.0, 3.0),
            GeoPoint::new(3.0, 3.0),
            GeoPoint::new(3.0, 1.0),
        ];
        let feature = RegionFeature::new("Ring", vec![vec![outer, hole]]);
        let visited: VisitedPlaces = ["Ring"].into_iter().collect();
        let reg = builder().build(&RegionDataset::new(vec![feature]), None, &visited);
        let fill = reg
            .by_id("Ring")
            .and_then(|r| r.fill.as_ref())
            .expect("fill");
        assert_eq!(fill.fallback_discs, 0);
        assert_eq!(fill.triangle_count(), 8);
    }

    #[test]
    fn detailed_dataset_replaces_country_outline() {
        let base = RegionDataset::new(vec![
            square("中国", 20.0, 80.0, 30.0),
            square("Mongolia", 42.0, 90.0, 10.0),
        ]);
        let detailed = RegionDataset::new(vec![
            square("中国", 20.0, 80.0, 30.0),
            square("北京", 39.5, 116.0, 1.0),
            square("上海", 30.8, 121.0, 1.0),
        ]);
        let reg = builder().build(&base, Some(&detailed), &VisitedPlaces::new());

        assert_eq!(reg.len(), 4);
        let country = reg.by_id("中国").expect("outline");
        assert_eq!(country.layer, LayerKind::Detailed);
        assert_eq!(reg.subdivisions_of("中国").len(), 2);
        let beijing = reg.by_id("中国-北京").expect("beijing");
        assert_eq!(beijing.layer, LayerKind::Detailed);
        assert!((beijing.centroid.length() - 1.012).abs() < 1e-9);
    }

    #[test]
    fn centroid_prefers_hint_and_floats_above_surface() {
        let hinted = square("H", 0.0, 0.0, 10.0).with_centroid_hint(GeoPoint::new(2.0, 3.0));
        let plain = square("P", 0.0, 0.0, 10.0);
        let dataset = RegionDataset::new(vec![hinted, plain]);
        let reg = builder().build(&dataset, None, &VisitedPlaces::new());

        let h = reg.by_id("H").expect("H");
        let expected = project(3.0, 2.0, 1.01);
        assert!(h.centroid.distance(expected) < 1e-12);

        let p = reg.by_id("P").expect("P");
        assert!((p.centroid.length() - 1.01).abs() < 1e-9);
        assert!(p.bounds.distance_to_point(p.centroid) < 0.05);
    }
}
