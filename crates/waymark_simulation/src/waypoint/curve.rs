//! Curve parameter builder + интерполяция
//!
//! Для угла B между A и C (cD = curve distance):
//! - p0 = B + cD * (A - B)
//! - p1 = B
//! - p2 = B + cD * (C - B)
//!
//! Кривая угла: кубический bezier (p0, p1, p1, p2).

use bevy::prelude::*;

use super::path::Path;

/// Контрольные точки сглаживания вокруг одного interior waypoint
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerControlPoints {
    pub p0: Vec3,
    pub p1: Vec3,
    pub p2: Vec3,
}

impl CornerControlPoints {
    /// Позиция на кривой угла, t ∈ [0, 1] (за пределами: экстраполяция)
    pub fn sample(&self, t: f32) -> Vec3 {
        cubic_bezier(self.p0, self.p1, self.p1, self.p2, t)
    }
}

/// Контрольные точки для угла `corner`.
/// None если `corner` не interior (первый/последний waypoint, или путь из 2 точек).
pub fn corner_control_points(
    path: &Path,
    corner: usize,
    curve_distance: f32,
) -> Option<CornerControlPoints> {
    if !path.is_interior(corner) {
        return None;
    }

    let before = path.position(corner - 1);
    let p1 = path.position(corner);
    let after = path.position(corner + 1);

    Some(CornerControlPoints {
        p0: p1 + curve_distance * (before - p1),
        p1,
        p2: p1 + curve_distance * (after - p1),
    })
}

/// Кубический bezier в форме Бернштейна
pub fn cubic_bezier(a: Vec3, b: Vec3, c: Vec3, d: Vec3, t: f32) -> Vec3 {
    let inverse = 1.0 - t;
    let inverse_sq = inverse * inverse;
    let t_sq = t * t;

    a * (inverse_sq * inverse) + b * (3.0 * t * inverse_sq) + c * (3.0 * t_sq * inverse) + d * (t_sq * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn l_path() -> Path {
        Path::from_positions(
            [Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 10.0)],
            0.2,
        )
        .unwrap()
    }

    #[test]
    fn test_control_points_offset_towards_neighbours() {
        let path = l_path();
        let points = corner_control_points(&path, 1, path.curve_distance()).unwrap();

        assert_eq!(points.p1, Vec3::new(10.0, 0.0, 0.0));
        assert!(points.p0.distance(Vec3::new(8.0, 0.0, 0.0)) < EPS);
        assert!(points.p2.distance(Vec3::new(10.0, 0.0, 2.0)) < EPS);
    }

    #[test]
    fn test_no_control_points_for_path_ends() {
        let path = l_path();
        assert!(corner_control_points(&path, 0, 0.2).is_none());
        assert!(corner_control_points(&path, 2, 0.2).is_none());

        let two_points = Path::from_positions([Vec3::ZERO, Vec3::X], 0.2).unwrap();
        assert!(corner_control_points(&two_points, 1, 0.2).is_none());
    }

    #[test]
    fn test_bezier_endpoints() {
        let points = corner_control_points(&l_path(), 1, 0.2).unwrap();
        assert!(points.sample(0.0).distance(points.p0) < EPS);
        assert!(points.sample(1.0).distance(points.p2) < EPS);
    }

    #[test]
    fn test_bezier_midpoint_pulls_towards_corner() {
        let points = corner_control_points(&l_path(), 1, 0.2).unwrap();
        let mid = points.sample(0.5);

        // (p0, p1, p1, p2) в t=0.5: 0.75·p1 + 0.125·(p0 + p2)
        let expected = points.p1 * 0.75 + (points.p0 + points.p2) * 0.125;
        assert!(mid.distance(expected) < EPS);
        assert!(mid.distance(points.p1) < points.p0.distance(points.p1));
    }

    #[test]
    fn test_bezier_passes_through_collinear_corner() {
        let path = Path::from_positions([Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0)], 0.1)
            .unwrap();
        let points = corner_control_points(&path, 1, 0.1).unwrap();
        assert!(points.sample(0.5).distance(Vec3::X) < EPS);
    }
}
