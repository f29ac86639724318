//! Locomotion domain: VR smooth locomotion по осям контроллера
//!
//! XR session вне симуляции: хост каждый кадр пишет опрошенное состояние
//! контроллеров в `XrInputSources`, системы здесь только читают его.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod input;
pub mod systems;

#[cfg(test)]
mod locomotion_tests;

pub use components::{ControlSource, ControlType, Handedness, SmoothLocomotion};
pub use events::GrabIntent;
pub use input::{GamepadState, InputSource, XrInputSources};
pub use systems::{move_offset, snap_turn_angle, smooth_locomotion};

/// Locomotion Plugin
///
/// Update: smooth_locomotion (читает XrInputSources, двигает/поворачивает player)
pub struct LocomotionPlugin;

impl Plugin for LocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<XrInputSources>()
            .register_type::<SmoothLocomotion>()
            .add_event::<GrabIntent>()
            .add_systems(Update, smooth_locomotion);
    }
}
