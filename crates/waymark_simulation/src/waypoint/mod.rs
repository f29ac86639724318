//! Waypoint domain: движение по пути из waypoint'ов
//!
//! Содержит:
//! - Path builder (снапшот waypoint'ов, длины сегментов)
//! - Curve parameter builder (контрольные точки углов)
//! - Frame advancer (PathFollower state machine)
//! - Look-at solver
//! - ECS binding: WaypointMovement, события, системы

use bevy::prelude::*;

pub mod components;
pub mod curve;
pub mod error;
pub mod events;
pub mod follower;
pub mod look_at;
pub mod path;
pub mod systems;


pub use components::*;
pub use curve::{corner_control_points, cubic_bezier, CornerControlPoints};
pub use error::PathError;
pub use events::*;
pub use follower::{CallbackId, FollowerTick, PathFollower, LOOK_AHEAD};
pub use look_at::look_at;
pub use path::{clamp_curve_distance, NamedWaypoint, Path, MAX_CURVE_DISTANCE};

/// Waypoint Plugin
///
/// Порядок выполнения (FixedUpdate):
/// 1. build_waypoint_paths: (пере)строение путей для изменённых WaypointMovement
/// 2. advance_waypoint_followers: тик + запись позы в Transform
///
/// Update: teardown_removed_followers: чистка PathFollower (и callbacks)
pub struct WaypointPlugin;

impl Plugin for WaypointPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<WaypointMovement>()
            .register_type::<RebuildWaypointPath>()
            .add_event::<FinalWaypointReached>()
            .add_event::<PathBuildFailed>();

        app.add_systems(
            FixedUpdate,
            (
                systems::build_waypoint_paths,
                systems::advance_waypoint_followers,
            )
                .chain(),
        );

        app.add_systems(Update, systems::teardown_removed_followers);
    }
}
