//! Waypoint компоненты: конфигурация движения по пути

use bevy::prelude::*;

use crate::config::WaypointDefaults;

/// Движение объекта по waypoint'ам контейнера
///
/// Children `path_object`: waypoint'ы, порядок обхода = сортировка по `Name`
/// (например A, B, C, D). Позиции снимаются один раз при build.
///
/// Смена `path_object` или `curve_distance` → путь перестраивается с нуля.
/// Смена `speed` применяется со следующего тика без перестройки.
/// Повторный snapshot того же контейнера: [`RebuildWaypointPath`].
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct WaypointMovement {
    /// Контейнер waypoint'ов
    pub path_object: Entity,
    /// Скорость движения (единиц/сек)
    pub speed: f32,
    /// Доля сегмента [0, 0.5) с каждой стороны угла, где движение идёт по кривой
    pub curve_distance: f32,
    /// World up для look-at
    pub up: Vec3,
}

impl WaypointMovement {
    pub fn new(path_object: Entity) -> Self {
        Self::from_defaults(path_object, WaypointDefaults::default())
    }

    pub fn from_defaults(path_object: Entity, defaults: WaypointDefaults) -> Self {
        Self {
            path_object,
            speed: defaults.speed,
            curve_distance: defaults.curve_distance,
            up: Vec3::Y,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_curve_distance(mut self, curve_distance: f32) -> Self {
        self.curve_distance = curve_distance;
        self
    }
}

/// Запрос перестройки пути со свежим snapshot позиций (тот же контейнер)
///
/// Снимается build системой после обработки.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct RebuildWaypointPath;
