//! Headless симуляция Waymark
//!
//! Строит случайный путь (DeterministicRng), пускает по нему follower'а
//! и логирует позицию. Использование: `waymark_simulation [config.ron]`

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::Rng;
use waymark_simulation::{
    create_headless_app, init_logger, log_info, DeterministicRng, PathFollower, SimulationConfig,
    SimulationPlugin, WaypointMovement,
};

const WAYPOINT_COUNT: usize = 6;
const TICKS: u32 = 1000;

fn main() {
    init_logger();

    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load_or_default(path),
        None => SimulationConfig::default(),
    };
    log_info(&format!(
        "Starting Waymark headless simulation (seed: {}, {} Hz)",
        config.seed, config.fixed_hz
    ));

    let mut app = create_headless_app(config.seed);
    // Один update = один fixed tick
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
        1.0 / config.fixed_hz,
    )))
    .insert_resource(config.clone())
    .add_plugins(SimulationPlugin);

    let container = spawn_random_path(&mut app, WAYPOINT_COUNT);
    let follower = app
        .world_mut()
        .spawn((
            Name::new("Follower"),
            Transform::default(),
            WaypointMovement::from_defaults(container, config.waypoint),
        ))
        .id();

    let mut callback_installed = false;
    for tick in 0..TICKS {
        app.update();

        if !callback_installed {
            if let Some(mut path_follower) = app.world_mut().get_mut::<PathFollower>(follower) {
                path_follower.add_final_waypoint_callback(|| log_info("Final waypoint reached, looping"));
                callback_installed = true;
            }
        }

        if tick % 100 == 0 {
            if let Some(transform) = app.world().get::<Transform>(follower) {
                log_info(&format!("Tick {}: follower at {:.2}", tick, transform.translation));
            }
        }
    }

    let loops = app
        .world()
        .get::<PathFollower>(follower)
        .map_or(0, |path_follower| path_follower.loops_completed());
    log_info(&format!("Simulation complete! Loops: {}", loops));
}

/// Контейнер со случайными waypoint'ами.
/// Children спавнятся в обратном порядке: путь упорядочивается по имени.
fn spawn_random_path(app: &mut App, waypoint_count: usize) -> Entity {
    let positions: Vec<Vec3> = {
        let mut rng = app.world_mut().resource_mut::<DeterministicRng>();
        (0..waypoint_count)
            .map(|_| {
                Vec3::new(
                    rng.rng.gen_range(-10.0..10.0),
                    0.0,
                    rng.rng.gen_range(-10.0..10.0),
                )
            })
            .collect()
    };

    let container = app
        .world_mut()
        .spawn((Name::new("Path"), Transform::default()))
        .id();

    for (index, position) in positions.iter().enumerate().rev() {
        app.world_mut().spawn((
            Name::new(format!("Waypoint_{:02}", index)),
            Transform::from_translation(*position),
            ChildOf(container),
        ));
    }

    container
}
