use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (orbit_camera_controls, follow_target, update_camera_transform).chain(),
        );
    }
}

#[derive(Component)]
pub struct OrbitCamera {
    pub focus: Vec3,
    /// Если задан: focus плавно следует за этим entity
    pub follow: Option<Entity>,
    pub distance: f32,
    pub yaw: f32,   // Horizontal rotation (radians)
    pub pitch: f32, // Vertical rotation (radians)
    pub sensitivity: f32,
    pub zoom_speed: f32,
    /// Скорость догоняния focus (1/сек)
    pub follow_sharpness: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            focus: Vec3::ZERO,
            follow: None,
            distance: 20.0,
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: std::f32::consts::FRAC_PI_4,
            sensitivity: 0.005,
            zoom_speed: 1.0,
            follow_sharpness: 3.0,
        }
    }
}

/// ПКМ вращает, колесо зумит, Space переключает follow
fn orbit_camera_controls(
    mut query: Query<&mut OrbitCamera>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    followers: Query<Entity, With<waymark_simulation::WaypointMovement>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut mouse_wheel: EventReader<MouseWheel>,
) {
    let Ok(mut camera) = query.single_mut() else {
        return;
    };

    if mouse_buttons.pressed(MouseButton::Right) {
        for motion in mouse_motion.read() {
            camera.yaw -= motion.delta.x * camera.sensitivity;
            camera.pitch -= motion.delta.y * camera.sensitivity;

            camera.pitch = camera.pitch.clamp(
                -std::f32::consts::FRAC_PI_2 + 0.1,
                std::f32::consts::FRAC_PI_2 - 0.1,
            );
        }
    } else {
        mouse_motion.clear();
    }

    for wheel in mouse_wheel.read() {
        camera.distance -= wheel.y * camera.zoom_speed;
        camera.distance = camera.distance.clamp(3.0, 60.0);
    }

    if keys.just_pressed(KeyCode::Space) {
        camera.follow = match camera.follow {
            Some(_) => None,
            None => followers.iter().next(),
        };
    }
}

fn follow_target(
    time: Res<Time>,
    mut cameras: Query<&mut OrbitCamera>,
    targets: Query<&GlobalTransform>,
) {
    for mut camera in cameras.iter_mut() {
        let Some(target) = camera.follow else {
            continue;
        };
        let Ok(target) = targets.get(target) else {
            // Цель пропала
            camera.follow = None;
            continue;
        };

        let blend = 1.0 - (-camera.follow_sharpness * time.delta_secs()).exp();
        camera.focus = camera.focus.lerp(target.translation(), blend);
    }
}

fn update_camera_transform(mut query: Query<(&OrbitCamera, &mut Transform), Changed<OrbitCamera>>) {
    for (camera, mut transform) in query.iter_mut() {
        // Spherical → cartesian
        let x = camera.distance * camera.pitch.cos() * camera.yaw.sin();
        let y = camera.distance * camera.pitch.sin();
        let z = camera.distance * camera.pitch.cos() * camera.yaw.cos();

        *transform = Transform::from_translation(camera.focus + Vec3::new(x, y, z))
            .looking_at(camera.focus, Vec3::Y);
    }
}
