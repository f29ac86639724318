//! Path builder: снапшот waypoint'ов + длины сегментов
//!
//! Path не держит live-ссылку на контейнер хоста. Позиции читаются один раз
//! при build, дальше путь immutable (замена только целиком).

use bevy::prelude::*;

use super::error::PathError;

/// Верхняя граница curve distance.
/// 0.5 дало бы пересечение curve-зон соседних углов и деление на ноль при 0.
pub const MAX_CURVE_DISTANCE: f32 = 0.49999;

/// Waypoint как его отдаёт хост: имя child'а + world position
#[derive(Debug, Clone, PartialEq)]
pub struct NamedWaypoint {
    pub name: String,
    pub position: Vec3,
}

impl NamedWaypoint {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
        }
    }
}

/// Нормализация curve distance: clamp в [0, MAX_CURVE_DISTANCE], никогда не ошибка.
/// NaN → 0 (чистое линейное движение).
pub fn clamp_curve_distance(curve_distance: f32) -> f32 {
    if curve_distance.is_nan() {
        return 0.0;
    }
    curve_distance.clamp(0.0, MAX_CURVE_DISTANCE)
}

/// Упорядоченный снапшот waypoint'ов (len ≥ 2)
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    names: Vec<String>,
    positions: Vec<Vec3>,
    segment_lengths: Vec<f32>,
    curve_distance: f32,
}

impl Path {
    /// Строит путь из named children: stable sort по имени (лексикографически).
    pub fn build(
        children: impl IntoIterator<Item = NamedWaypoint>,
        curve_distance: f32,
    ) -> Result<Self, PathError> {
        let mut children: Vec<NamedWaypoint> = children.into_iter().collect();
        // sort_by стабильный: одинаковые имена сохраняют исходный порядок
        children.sort_by(|a, b| a.name.cmp(&b.name));

        let (names, positions) = children
            .into_iter()
            .map(|waypoint| (waypoint.name, waypoint.position))
            .unzip();

        Self::from_parts(names, positions, curve_distance)
    }

    /// Путь из уже упорядоченных позиций (имена генерируются по индексу)
    pub fn from_positions(
        positions: impl IntoIterator<Item = Vec3>,
        curve_distance: f32,
    ) -> Result<Self, PathError> {
        let positions: Vec<Vec3> = positions.into_iter().collect();
        let names = (0..positions.len()).map(|i| format!("{:04}", i)).collect();
        Self::from_parts(names, positions, curve_distance)
    }

    fn from_parts(
        names: Vec<String>,
        positions: Vec<Vec3>,
        curve_distance: f32,
    ) -> Result<Self, PathError> {
        if positions.len() < 2 {
            return Err(PathError::InvalidPath {
                waypoints: positions.len(),
            });
        }

        let segment_lengths = positions
            .windows(2)
            .map(|pair| pair[0].distance(pair[1]))
            .collect();

        Ok(Self {
            names,
            positions,
            segment_lengths,
            curve_distance: clamp_curve_distance(curve_distance),
        })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Всегда false: build не пропускает пути короче 2 точек
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, index: usize) -> Vec3 {
        self.positions[index]
    }

    pub fn segment_count(&self) -> usize {
        self.segment_lengths.len()
    }

    /// Длина сегмента `index → index + 1`
    pub fn segment_length(&self, index: usize) -> f32 {
        self.segment_lengths[index]
    }

    pub fn total_length(&self) -> f32 {
        self.segment_lengths.iter().sum()
    }

    pub fn curve_distance(&self) -> f32 {
        self.curve_distance
    }

    /// Interior waypoint = есть и предшественник, и следующий
    pub fn is_interior(&self, index: usize) -> bool {
        index > 0 && index + 1 < self.positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_sorts_children_by_name() {
        let path = Path::build(
            [
                NamedWaypoint::new("C", Vec3::new(2.0, 0.0, 0.0)),
                NamedWaypoint::new("A", Vec3::ZERO),
                NamedWaypoint::new("B", Vec3::X),
            ],
            0.1,
        )
        .unwrap();

        assert_eq!(path.names(), &["A", "B", "C"]);
        assert_eq!(path.position(0), Vec3::ZERO);
        assert_eq!(path.position(2), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_sort_is_lexicographic_not_numeric() {
        let path = Path::build(
            [
                NamedWaypoint::new("10", Vec3::Z),
                NamedWaypoint::new("9", Vec3::Y),
                NamedWaypoint::new("1", Vec3::X),
            ],
            0.1,
        )
        .unwrap();

        assert_eq!(path.names(), &["1", "10", "9"]);
    }

    #[test]
    fn test_equal_names_keep_original_order() {
        let path = Path::build(
            [
                NamedWaypoint::new("B", Vec3::new(5.0, 0.0, 0.0)),
                NamedWaypoint::new("A", Vec3::new(1.0, 0.0, 0.0)),
                NamedWaypoint::new("A", Vec3::new(2.0, 0.0, 0.0)),
            ],
            0.1,
        )
        .unwrap();

        assert_eq!(path.position(0).x, 1.0);
        assert_eq!(path.position(1).x, 2.0);
        assert_eq!(path.position(2).x, 5.0);
    }

    #[test]
    fn test_fewer_than_two_waypoints_is_invalid() {
        assert_eq!(
            Path::build(std::iter::empty(), 0.1),
            Err(PathError::InvalidPath { waypoints: 0 })
        );
        assert_eq!(
            Path::from_positions([Vec3::ONE], 0.1),
            Err(PathError::InvalidPath { waypoints: 1 })
        );
    }

    #[test]
    fn test_segment_lengths_precomputed() {
        let path = Path::from_positions(
            [Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0), Vec3::new(3.0, 4.0, 2.0)],
            0.1,
        )
        .unwrap();

        assert_eq!(path.segment_count(), 2);
        assert_eq!(path.segment_length(0), 5.0);
        assert_eq!(path.segment_length(1), 2.0);
        assert_eq!(path.total_length(), 7.0);
    }

    #[test]
    fn test_curve_distance_is_clamped() {
        let path = Path::from_positions([Vec3::ZERO, Vec3::X], 0.9).unwrap();
        assert_eq!(path.curve_distance(), MAX_CURVE_DISTANCE);

        let path = Path::from_positions([Vec3::ZERO, Vec3::X], -1.0).unwrap();
        assert_eq!(path.curve_distance(), 0.0);

        assert_eq!(clamp_curve_distance(f32::NAN), 0.0);
        assert_eq!(clamp_curve_distance(0.25), 0.25);
    }

    #[test]
    fn test_interior_waypoints() {
        let path = Path::from_positions([Vec3::ZERO, Vec3::X, Vec3::Y], 0.1).unwrap();
        assert!(!path.is_interior(0));
        assert!(path.is_interior(1));
        assert!(!path.is_interior(2));
    }
}
