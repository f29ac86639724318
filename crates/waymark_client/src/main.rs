use bevy::prelude::*;
use waymark_simulation::{
    set_logger, ControlType, GamepadState, GrabIntent, Handedness, InputSource, LineConnection,
    SimulationConfig, SimulationPlugin, SmoothLocomotion, WaypointMovement, XrInputSources,
};

mod camera;
mod logger;
mod rendering;

use camera::CameraPlugin;
use rendering::RenderingSyncPlugin;

const CONFIG_PATH: &str = "config/simulation.ron";

/// Waypoint'ы демо-пути. Спавнятся не по порядку: обход идёт по имени.
const DEMO_WAYPOINTS: [(&str, Vec3); 5] = [
    ("Waypoint_C", Vec3::new(6.0, 0.5, 6.0)),
    ("Waypoint_A", Vec3::new(-6.0, 0.5, -6.0)),
    ("Waypoint_E", Vec3::new(-6.0, 3.0, 6.0)),
    ("Waypoint_B", Vec3::new(6.0, 0.5, -6.0)),
    ("Waypoint_D", Vec3::new(0.0, 2.0, 8.0)),
];

fn main() {
    set_logger(Box::new(logger::BevyLogPrinter));
    let config = SimulationConfig::load_or_default(CONFIG_PATH);

    App::new()
        // Bevy defaults (rendering, input, time, etc.)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Waymark - Path Follower".to_string(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        // Config до SimulationPlugin: плагин читает его при build
        .insert_resource(config)
        .add_plugins(SimulationPlugin)
        .add_plugins(RenderingSyncPlugin)
        .add_plugins(CameraPlugin)
        .add_systems(Startup, setup_scene)
        .add_systems(Update, (emulate_xr_input, log_grab_intents))
        .run();
}

/// Ground, свет, камера, путь с follower'ом, линии, locomotion rig
fn setup_scene(
    mut commands: Commands,
    config: Res<SimulationConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::new(Vec3::Y, Vec2::splat(15.0)))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
        Transform::default(),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 10000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_rotation_x(-std::f32::consts::FRAC_PI_4)),
    ));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 0.3,
        affects_lightmapped_meshes: false,
    });

    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(14.0, 14.0, 14.0).looking_at(Vec3::ZERO, Vec3::Y),
        camera::OrbitCamera::default(),
    ));

    // Контейнер пути + waypoint маркеры
    let marker_mesh = meshes.add(Sphere::new(0.2));
    let marker_material = materials.add(Color::srgb(0.9, 0.9, 0.9));
    let container = commands
        .spawn((Name::new("Path"), Transform::default(), Visibility::default()))
        .id();

    let mut waypoints: Vec<(&str, Entity)> = DEMO_WAYPOINTS
        .iter()
        .map(|(name, position)| {
            let waypoint = commands
                .spawn((
                    Name::new(*name),
                    Transform::from_translation(*position),
                    Mesh3d(marker_mesh.clone()),
                    MeshMaterial3d(marker_material.clone()),
                    ChildOf(container),
                ))
                .id();
            (*name, waypoint)
        })
        .collect();

    // Линии между соседями по имени (тот же порядок, что у follower'а)
    waypoints.sort_by_key(|(name, _)| *name);
    let line_mesh = meshes.add(Cuboid::new(1.0, 2.0, 1.0));
    let line_material = materials.add(Color::srgb(0.6, 0.6, 0.7));
    for pair in waypoints.windows(2) {
        commands.spawn((
            Transform::default(),
            Mesh3d(line_mesh.clone()),
            MeshMaterial3d(line_material.clone()),
            LineConnection::new(pair[0].1, pair[1].1).with_length_percentage(0.9),
        ));
    }

    // Follower: визуал добавит RenderingSyncPlugin после build пути
    commands.spawn((
        Name::new("Follower"),
        Transform::default(),
        WaypointMovement::from_defaults(container, config.waypoint),
        rendering::NeedsVisual,
    ));

    spawn_locomotion_rig(&mut commands, &config, &mut meshes, &mut materials);
}

/// Player (capsule) + head; левая рука двигает, правая делает snap поворот
fn spawn_locomotion_rig(
    commands: &mut Commands,
    config: &SimulationConfig,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) {
    let player = commands
        .spawn((
            Name::new("Player"),
            Mesh3d(meshes.add(Capsule3d::new(0.3, 1.2))),
            MeshMaterial3d(materials.add(Color::srgb(0.2, 0.6, 0.8))),
            Transform::from_xyz(0.0, 0.9, 10.0),
        ))
        .id();
    let head = commands
        .spawn((
            Name::new("Head"),
            Mesh3d(meshes.add(Sphere::new(0.2))),
            MeshMaterial3d(materials.add(Color::srgb(0.9, 0.7, 0.5))),
            Transform::from_xyz(0.0, 0.8, 0.0),
            ChildOf(player),
        ))
        .id();

    commands.spawn((
        Name::new("LeftController"),
        SmoothLocomotion::from_defaults(Handedness::Left, ControlType::Move, player, config.locomotion)
            .with_head(head),
    ));
    commands.spawn((
        Name::new("RightController"),
        SmoothLocomotion::from_defaults(Handedness::Right, ControlType::Rotate, player, config.locomotion)
            .with_head(head),
    ));
}

/// Клавиатура вместо XR контроллеров:
/// WASD: левый thumbstick, Q/E: правый thumbstick (snap), G: grip левой
fn emulate_xr_input(keys: Res<ButtonInput<KeyCode>>, mut sources: ResMut<XrInputSources>) {
    let axis = |negative: KeyCode, positive: KeyCode| -> f32 {
        let mut value = 0.0;
        if keys.pressed(negative) {
            value -= 1.0;
        }
        if keys.pressed(positive) {
            value += 1.0;
        }
        value
    };

    // Thumbstick "вперёд" = -y (xr-standard)
    let left = GamepadState {
        axes: vec![0.0, 0.0, axis(KeyCode::KeyA, KeyCode::KeyD), axis(KeyCode::KeyW, KeyCode::KeyS)],
        buttons: vec![false, keys.pressed(KeyCode::KeyG)],
    };
    let right = GamepadState {
        axes: vec![0.0, 0.0, axis(KeyCode::KeyQ, KeyCode::KeyE), 0.0],
        buttons: vec![false, false],
    };

    sources.sources = vec![
        InputSource::controller(Handedness::Left, left),
        InputSource::controller(Handedness::Right, right),
    ];
}

fn log_grab_intents(mut intents: EventReader<GrabIntent>) {
    for intent in intents.read() {
        info!("Grab intent: {:?}", intent);
    }
}
