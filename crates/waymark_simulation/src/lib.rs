//! Waymark Simulation Core
//!
//! ECS-симуляция на Bevy 0.16 (headless, MinimalPlugins)
//!
//! Домены:
//! - waypoint: движение по пути из waypoint'ов со сглаженными углами
//! - line: линия-коннектор между двумя объектами
//! - locomotion: VR smooth locomotion по осям контроллера
//!
//! Математика (path/curve/look-at/follower) не зависит от ECS и тестируется
//! отдельно, ECS слой только связывает её с иерархией entity.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod config;
pub mod line;
pub mod locomotion;
pub mod logger;
pub mod waypoint;

// Re-export для удобства
pub use config::{ConfigError, LocomotionDefaults, SimulationConfig, WaypointDefaults};
pub use line::{line_transform, LineConnection, LinePlugin};
pub use locomotion::{
    ControlSource, ControlType, GamepadState, GrabIntent, Handedness, InputSource, LocomotionPlugin,
    SmoothLocomotion, XrInputSources,
};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, set_logger_if_needed,
    LogLevel, LogPrinter,
};
pub use waypoint::{
    look_at, FinalWaypointReached, NamedWaypoint, Path, PathBuildFailed, PathError, PathFollower,
    RebuildWaypointPath, WaypointMovement, WaypointPlugin,
};

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Берёт `SimulationConfig` из world (если вставлен до плагина), иначе Default.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let mut config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        // Resource мог быть вставлен в обход from_ron_str
        if let Err(e) = config.validate() {
            logger::log_error(&format!("{}, using default fixed_hz", e));
            config.fixed_hz = SimulationConfig::default().fixed_hz;
        }

        logger::set_log_level(config.log_level);

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(config.seed));
        }

        app
            // Fixed timestep для движения по пути
            .insert_resource(Time::<Fixed>::from_hz(config.fixed_hz))
            .insert_resource(config)
            .add_plugins((WaypointPlugin, LinePlugin, LocomotionPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
