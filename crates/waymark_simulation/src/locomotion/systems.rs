//! Smooth locomotion systems
//!
//! Player двигается/поворачивается напрямую через Transform (root rig entity).
//! Head: child player'а, его world pose считается через TransformHelper.

use bevy::prelude::*;
use bevy::transform::helper::TransformHelper;

use super::components::{ControlType, SmoothLocomotion};
use super::events::GrabIntent;
use super::input::XrInputSources;

/// Смещение player'а за кадр по осям (x, y) контроллера.
/// None если направление нулевое (стик в центре или смотрим строго вниз без fly).
pub fn move_offset(
    x: f32,
    y: f32,
    head_rotation: Option<Quat>,
    allow_fly: bool,
    move_speed: f32,
    dt: f32,
) -> Option<Vec3> {
    let mut direction = Vec3::new(x, 0.0, y);
    if let Some(rotation) = head_rotation {
        direction = rotation * direction;
    }
    if !allow_fly {
        direction.y = 0.0;
    }

    let length = direction.length();
    if !(length > 0.0) {
        return None;
    }

    Some(direction * (dt * move_speed / length))
}

/// Snap turn: угол (радианы) вокруг +Y, если пора поворачивать.
/// Обновляет `just_snapped` (hysteresis через deadzone).
pub fn snap_turn_angle(locomotion: &mut SmoothLocomotion, x: f32) -> Option<f32> {
    if x.abs() > locomotion.snap_deadzone && !locomotion.just_snapped {
        locomotion.just_snapped = true;
        return Some((locomotion.snap_degrees * -x.signum()).to_radians());
    }

    if x.abs() < locomotion.snap_deadzone {
        locomotion.just_snapped = false;
    }
    None
}

/// Система: применить input контроллеров к player'ам
pub fn smooth_locomotion(
    time: Res<Time>,
    sources: Res<XrInputSources>,
    mut controllers: Query<(Entity, &mut SmoothLocomotion)>,
    mut transforms: ParamSet<(TransformHelper, Query<&mut Transform>)>,
    mut grabs: EventWriter<GrabIntent>,
) {
    let dt = time.delta_secs();

    for (controller, mut locomotion) in controllers.iter_mut() {
        let (x_index, y_index) = locomotion.control_source.axis_indices();

        for gamepad in sources.gamepads(locomotion.handedness) {
            let (Some(x), Some(y)) = (gamepad.axis(x_index), gamepad.axis(y_index)) else {
                continue;
            };

            let head_pose = locomotion
                .head
                .and_then(|head| transforms.p0().compute_global_transform(head).ok());

            match locomotion.control_type {
                ControlType::Move => {
                    let head_rotation = head_pose.map(|pose| pose.rotation());
                    let offset = move_offset(
                        x,
                        y,
                        head_rotation,
                        locomotion.allow_fly,
                        locomotion.move_speed,
                        dt,
                    );
                    if let Some(offset) = offset {
                        if let Ok(mut player) = transforms.p1().get_mut(locomotion.player) {
                            player.translation += offset;
                        }
                    }
                }
                ControlType::Rotate => {
                    // Без головы нет центра поворота
                    if let Some(head_pose) = head_pose {
                        if let Some(angle) = snap_turn_angle(&mut locomotion, x) {
                            if let Ok(mut player) = transforms.p1().get_mut(locomotion.player) {
                                // Голова остаётся на месте
                                player.rotate_around(head_pose.translation(), Quat::from_rotation_y(angle));
                            }
                        }
                    }
                }
            }

            let gripped = gamepad.gripped();
            if gripped && !locomotion.grabbing {
                locomotion.grabbing = true;
                grabs.write(GrabIntent::Grab { controller });
            } else if !gripped && locomotion.grabbing {
                locomotion.grabbing = false;
                grabs.write(GrabIntent::Drop { controller });
            }
        }
    }
}
