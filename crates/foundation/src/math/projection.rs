//! Geographic to scene-space projection.
//!
//! Axis convention (fixed, used everywhere in the workspace):
//! - `+Y` points at the north pole.
//! - `(lat 0, lon 0)` lands on `+X`.
//! - `(lat 0, lon 90)` lands on `-Z`.

use std::f64::consts::PI;

use super::Vec3;

/// Wraps a longitude into `[-180, 180]` by whole turns.
pub fn normalize_lon_deg(mut lon_deg: f64) -> f64 {
    if !lon_deg.is_finite() {
        return lon_deg;
    }
    while lon_deg > 180.0 {
        lon_deg -= 360.0;
    }
    while lon_deg < -180.0 {
        lon_deg += 360.0;
    }
    lon_deg
}

/// Projects `(lat, lon)` in degrees onto a sphere of `radius` centered at the origin.
pub fn project(lat_deg: f64, lon_deg: f64, radius: f64) -> Vec3 {
    let lon_deg = normalize_lon_deg(lon_deg);
    let phi = (90.0 - lat_deg) * PI / 180.0;
    let theta = (lon_deg + 180.0) * PI / 180.0;

    Vec3::new(
        -radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Inverse of [`project`] for any non-zero point: returns `(lat, lon)` in degrees.
pub fn unproject(p: Vec3) -> Option<(f64, f64)> {
    let r = p.length();
    if r <= 1e-12 {
        return None;
    }
    let lat = 90.0 - (p.y / r).clamp(-1.0, 1.0).acos().to_degrees();
    let theta = p.z.atan2(-p.x);
    let lon = normalize_lon_deg(theta.to_degrees() - 180.0);
    Some((lat, lon))
}

#[cfg(test)]
mod tests {
    use super::{normalize_lon_deg, project, unproject};
    use crate::math::Vec3;

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        let d = a.distance(b);
        assert!(d <= eps, "expected {a:?} ~= {b:?} (diff {d})");
    }

    #[test]
    fn equator_prime_meridian_is_plus_x() {
        assert_vec_close(project(0.0, 0.0, 2.0), Vec3::new(2.0, 0.0, 0.0), 1e-12);
    }

    #[test]
    fn equator_90_east_is_minus_z() {
        assert_vec_close(project(0.0, 90.0, 1.0), Vec3::new(0.0, 0.0, -1.0), 1e-12);
    }

    #[test]
    fn north_pole_ignores_longitude() {
        let a = project(90.0, 0.0, 1.0);
        for lon in [-180.0, -45.0, 12.5, 90.0, 179.0] {
            assert_vec_close(project(90.0, lon, 1.0), a, 1e-12);
        }
        assert_vec_close(a, Vec3::new(0.0, 1.0, 0.0), 1e-12);
    }

    #[test]
    fn longitude_wraps_around() {
        assert_vec_close(project(30.0, 190.0, 1.0), project(30.0, -170.0, 1.0), 1e-12);
        assert_vec_close(project(-10.0, -540.0, 1.0), project(-10.0, 180.0, 1.0), 1e-12);
        assert_eq!(normalize_lon_deg(370.0), 10.0);
    }

    #[test]
    fn projected_points_sit_on_the_sphere() {
        let p = project(39.9, 116.4, 3.0);
        assert!((p.length() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn unproject_recovers_lat_lon() {
        let (lat, lon) = unproject(project(39.9, 116.4, 1.0)).expect("non-zero");
        assert!((lat - 39.9).abs() < 1e-9);
        assert!((lon - 116.4).abs() < 1e-9);
    }
}
