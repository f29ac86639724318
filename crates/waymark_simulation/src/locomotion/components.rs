use bevy::prelude::*;

use crate::config::LocomotionDefaults;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Handedness {
    Left,
    Right,
}

/// Что делает контроллер: двигает или поворачивает игрока
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ControlType {
    Move,
    Rotate,
}

/// Источник осей (xr-standard gamepad mapping)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum ControlSource {
    Thumbstick,
    Touchpad,
}

impl ControlSource {
    /// Индексы осей (x, y) в `GamepadState::axes`
    pub fn axis_indices(self) -> (usize, usize) {
        match self {
            ControlSource::Touchpad => (0, 1),
            ControlSource::Thumbstick => (2, 3),
        }
    }
}

/// Smooth locomotion controller (висит на entity контроллера)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct SmoothLocomotion {
    pub handedness: Handedness,
    pub control_type: ControlType,
    pub control_source: ControlSource,
    /// Кого двигаем (root rig)
    pub player: Entity,
    /// Откуда берём направление движения и центр поворота
    pub head: Option<Entity>,
    pub move_speed: f32,
    /// false → движение только в горизонтальной плоскости
    pub allow_fly: bool,
    pub snap_degrees: f32,
    /// Повторный snap только после возврата оси ниже порога
    pub snap_deadzone: f32,

    // Runtime state
    pub just_snapped: bool,
    pub grabbing: bool,
}

impl SmoothLocomotion {
    pub fn new(handedness: Handedness, control_type: ControlType, player: Entity) -> Self {
        Self::from_defaults(handedness, control_type, player, LocomotionDefaults::default())
    }

    pub fn from_defaults(
        handedness: Handedness,
        control_type: ControlType,
        player: Entity,
        defaults: LocomotionDefaults,
    ) -> Self {
        Self {
            handedness,
            control_type,
            control_source: ControlSource::Thumbstick,
            player,
            head: None,
            move_speed: defaults.move_speed,
            allow_fly: false,
            snap_degrees: defaults.snap_degrees,
            snap_deadzone: defaults.snap_deadzone,
            just_snapped: false,
            grabbing: false,
        }
    }

    pub fn with_head(mut self, head: Entity) -> Self {
        self.head = Some(head);
        self
    }

    pub fn with_control_source(mut self, control_source: ControlSource) -> Self {
        self.control_source = control_source;
        self
    }

    pub fn with_fly(mut self, allow_fly: bool) -> Self {
        self.allow_fly = allow_fly;
        self
    }
}
