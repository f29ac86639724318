//! Ошибки waypoint домена

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    /// Меньше 2 waypoint'ов: нет ни одного сегмента.
    /// Фатально для follower'а: он не должен тикать.
    InvalidPath { waypoints: usize },
    /// look-at из совпадающих точек. Recoverable: пропускаем поворот на этом тике.
    DegenerateDirection,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::InvalidPath { waypoints } => {
                write!(f, "invalid path: need at least 2 waypoints, got {}", waypoints)
            }
            PathError::DegenerateDirection => {
                write!(f, "degenerate look direction: source and destination coincide")
            }
        }
    }
}

impl std::error::Error for PathError {}
