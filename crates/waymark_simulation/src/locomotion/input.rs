//! Снапшот XR input sources за кадр (пишет хост)

use bevy::prelude::*;

use super::components::Handedness;

/// Состояние gamepad'а контроллера (xr-standard: axes 0/1 touchpad, 2/3 thumbstick)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamepadState {
    pub axes: Vec<f32>,
    pub buttons: Vec<bool>,
}

impl GamepadState {
    pub fn axis(&self, index: usize) -> Option<f32> {
        self.axes.get(index).copied()
    }

    /// Grip = кнопка 1
    pub fn gripped(&self) -> bool {
        self.buttons.get(1).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputSource {
    pub handedness: Handedness,
    /// Hand tracking (без gamepad'а): locomotion игнорирует
    pub is_hand: bool,
    pub gamepad: Option<GamepadState>,
}

impl InputSource {
    pub fn controller(handedness: Handedness, gamepad: GamepadState) -> Self {
        Self {
            handedness,
            is_hand: false,
            gamepad: Some(gamepad),
        }
    }
}

/// Все активные input sources текущего кадра
#[derive(Resource, Debug, Clone, Default)]
pub struct XrInputSources {
    pub sources: Vec<InputSource>,
}

impl XrInputSources {
    /// Gamepad'ы контроллеров заданной руки (hand tracking пропускается)
    pub fn gamepads(&self, handedness: Handedness) -> impl Iterator<Item = &GamepadState> {
        self.sources
            .iter()
            .filter(move |source| !source.is_hand && source.handedness == handedness)
            .filter_map(|source| source.gamepad.as_ref())
    }
}
