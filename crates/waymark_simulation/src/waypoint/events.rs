//! Waypoint events

use bevy::prelude::*;

use super::error::PathError;

/// Event: follower дошёл до последнего waypoint'а и начал путь заново
///
/// Дублирует in-component callbacks для систем, которым удобнее EventReader.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct FinalWaypointReached {
    pub entity: Entity,
    /// Сколько полных кругов пройдено (включая этот)
    pub loops: u32,
}

/// Event: путь не построился (follower не тикает)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct PathBuildFailed {
    pub entity: Entity,
    pub error: PathError,
}
