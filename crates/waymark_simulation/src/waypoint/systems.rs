//! Waypoint systems: build путей + per-frame движение
//!
//! Граница с хостом (Bevy):
//! - named-child enumeration: `Children` контейнера + `Name` каждого child'а
//! - position provider: world position child'а через `TransformHelper`
//!   (считается по иерархии on demand, не ждёт propagate в PostUpdate)
//! - pose setter: `Transform` follower'а (follower должен быть root entity)

use bevy::prelude::*;
use bevy::transform::helper::TransformHelper;

use crate::logger;

use super::components::{RebuildWaypointPath, WaypointMovement};
use super::events::{FinalWaypointReached, PathBuildFailed};
use super::follower::PathFollower;
use super::path::{clamp_curve_distance, NamedWaypoint, Path};

/// Система: (пере)строить путь для изменённых WaypointMovement
///
/// Первый build → insert PathFollower. Повторный build (другой контейнер или
/// curve distance, или `RebuildWaypointPath`) → `set_path`, callbacks сохраняются.
/// Ошибка build → PathFollower удаляется, PathBuildFailed event.
pub fn build_waypoint_paths(
    mut commands: Commands,
    mut movers: Query<
        (
            Entity,
            &WaypointMovement,
            Option<&mut PathFollower>,
            Has<RebuildWaypointPath>,
        ),
        Or<(Changed<WaypointMovement>, With<RebuildWaypointPath>)>,
    >,
    containers: Query<&Children>,
    names: Query<&Name>,
    transforms: TransformHelper,
    mut failures: EventWriter<PathBuildFailed>,
) {
    for (entity, movement, mut follower, forced) in movers.iter_mut() {
        let curve_distance = clamp_curve_distance(movement.curve_distance);

        if let Some(follower) = follower.as_mut() {
            if follower.up() != movement.up {
                follower.set_up(movement.up);
            }
        }

        if forced {
            commands.entity(entity).remove::<RebuildWaypointPath>();
        }

        let rebuild_needed = forced
            || follower.as_ref().map_or(true, |follower| {
                follower.source() != Some(movement.path_object)
                    || follower.path().curve_distance() != curve_distance
            });
        if !rebuild_needed {
            // Изменилась только скорость/up
            continue;
        }

        let waypoints = collect_waypoints(movement.path_object, &containers, &names, &transforms);

        match Path::build(waypoints, movement.curve_distance) {
            Ok(path) => {
                logger::log(&format!(
                    "Waypoint path for {:?}: {} waypoints, length {:.2}, curve distance {}",
                    entity,
                    path.len(),
                    path.total_length(),
                    path.curve_distance()
                ));

                match follower {
                    Some(mut follower) => follower.set_path(path, Some(movement.path_object)),
                    None => {
                        commands.entity(entity).insert(
                            PathFollower::new(path)
                                .with_source(movement.path_object)
                                .with_up(movement.up),
                        );
                    }
                }
            }
            Err(error) => {
                logger::log_error(&format!(
                    "Waypoint path for {:?} (container {:?}) not built: {}",
                    entity, movement.path_object, error
                ));
                if follower.is_some() {
                    commands.entity(entity).remove::<PathFollower>();
                }
                failures.write(PathBuildFailed { entity, error });
            }
        }
    }
}

/// Снапшот children контейнера: имя + world position
fn collect_waypoints(
    container: Entity,
    containers: &Query<&Children>,
    names: &Query<&Name>,
    transforms: &TransformHelper,
) -> Vec<NamedWaypoint> {
    let Ok(children) = containers.get(container) else {
        return Vec::new();
    };
    let children: &[Entity] = children;

    children
        .iter()
        .filter_map(|&child| {
            // Безымянные child'ы сортируются первыми
            let name = names
                .get(child)
                .map(|name| name.as_str().to_owned())
                .unwrap_or_default();

            match transforms.compute_global_transform(child) {
                Ok(global) => Some(NamedWaypoint::new(name, global.translation())),
                Err(e) => {
                    logger::log_warning(&format!(
                        "Waypoint {:?} of container {:?} skipped: {:?}",
                        child, container, e
                    ));
                    None
                }
            }
        })
        .collect()
}

/// Система: один тик движения для каждого follower'а
///
/// Работает в FixedUpdate. Поворот пишется только если look-at валиден,
/// иначе остаётся прошлый.
pub fn advance_waypoint_followers(
    mut followers: Query<(Entity, &WaypointMovement, &mut PathFollower, &mut Transform)>,
    time: Res<Time<Fixed>>,
    mut reached: EventWriter<FinalWaypointReached>,
) {
    let dt = time.delta_secs();

    for (entity, movement, mut follower, mut transform) in followers.iter_mut() {
        let tick = follower.tick(dt, movement.speed);

        transform.translation = tick.position;
        if let Some(rotation) = tick.rotation {
            transform.rotation = rotation;
        }

        if tick.wrapped {
            let loops = follower.loops_completed();
            logger::log(&format!("Waypoint follower {:?}: loop {} complete", entity, loops));
            reached.write(FinalWaypointReached { entity, loops });
        }
    }
}

/// Система: WaypointMovement удалён → удаляем PathFollower вместе с callbacks
pub fn teardown_removed_followers(
    mut commands: Commands,
    mut removed: RemovedComponents<WaypointMovement>,
    followers: Query<(), With<PathFollower>>,
) {
    for entity in removed.read() {
        if followers.contains(entity) {
            commands.entity(entity).remove::<PathFollower>();
        }
    }
}
