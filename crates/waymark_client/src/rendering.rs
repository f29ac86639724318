use bevy::prelude::*;
use waymark_simulation::{FinalWaypointReached, PathFollower};

pub struct RenderingSyncPlugin;

impl Plugin for RenderingSyncPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (
                spawn_visuals_for_new_followers,
                sync_transforms,
                recolor_on_loop,
                draw_paths,
                despawn_orphaned_visuals,
            )
                .chain(),
        );
    }
}

/// Marker: follower ещё без визуала
#[derive(Component)]
pub struct NeedsVisual;

/// Link: visual entity → simulation entity
#[derive(Component)]
pub struct VisualOf(pub Entity);

/// Link: simulation entity → visual entity
#[derive(Component)]
pub struct HasVisual(pub Entity);

/// Визуал follower'а появляется только после успешного build пути
fn spawn_visuals_for_new_followers(
    mut commands: Commands,
    query: Query<(Entity, &Transform), (With<NeedsVisual>, With<PathFollower>)>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (sim_entity, sim_transform) in query.iter() {
        // Вытянут по +Z: look-at смотрит локальной +Z вперёд
        let visual_entity = commands
            .spawn((
                Mesh3d(meshes.add(Cuboid::new(0.5, 0.4, 1.2))),
                MeshMaterial3d(materials.add(StandardMaterial {
                    base_color: loop_color(0),
                    ..default()
                })),
                *sim_transform,
                VisualOf(sim_entity),
            ))
            .id();

        commands
            .entity(sim_entity)
            .remove::<NeedsVisual>()
            .insert(HasVisual(visual_entity));
    }
}

fn sync_transforms(
    sim_query: Query<(&Transform, &HasVisual), Changed<Transform>>,
    mut visual_query: Query<&mut Transform, (With<VisualOf>, Without<HasVisual>)>,
) {
    for (sim_transform, has_visual) in sim_query.iter() {
        if let Ok(mut visual_transform) = visual_query.get_mut(has_visual.0) {
            *visual_transform = *sim_transform;
        }
    }
}

/// Новый круг → новый цвет
fn recolor_on_loop(
    mut reached: EventReader<FinalWaypointReached>,
    owners: Query<&HasVisual>,
    visuals: Query<&MeshMaterial3d<StandardMaterial>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for event in reached.read() {
        let Ok(has_visual) = owners.get(event.entity) else {
            continue;
        };
        let Ok(material) = visuals.get(has_visual.0) else {
            continue;
        };
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = loop_color(event.loops);
        }
    }
}

/// Gizmos: ломаная пути + кривая текущего угла
fn draw_paths(followers: Query<&PathFollower>, mut gizmos: Gizmos) {
    const CURVE_SAMPLES: usize = 16;

    for follower in followers.iter() {
        gizmos.linestrip(
            follower.path().positions().iter().copied(),
            Color::srgb(0.4, 0.4, 0.9),
        );

        for position in follower.path().positions() {
            gizmos.sphere(
                bevy::math::Isometry3d::from_translation(*position),
                0.15,
                Color::srgb(0.9, 0.9, 0.9),
            );
        }

        if let Some(controls) = follower.corner_controls() {
            gizmos.linestrip(
                (0..=CURVE_SAMPLES).map(|i| controls.sample(i as f32 / CURVE_SAMPLES as f32)),
                Color::srgb(0.9, 0.8, 0.2),
            );
        }
    }
}

/// PathFollower снят (ошибка build / WaypointMovement удалён) → визуал убираем
fn despawn_orphaned_visuals(
    mut commands: Commands,
    orphans: Query<(Entity, &HasVisual), Without<PathFollower>>,
) {
    for (sim_entity, has_visual) in orphans.iter() {
        commands.entity(has_visual.0).despawn();
        commands
            .entity(sim_entity)
            .remove::<HasVisual>()
            .insert(NeedsVisual);
    }
}

fn loop_color(loops: u32) -> Color {
    match loops % 5 {
        0 => Color::srgb(0.8, 0.2, 0.2), // Red
        1 => Color::srgb(0.2, 0.2, 0.8), // Blue
        2 => Color::srgb(0.2, 0.8, 0.2), // Green
        3 => Color::srgb(0.8, 0.8, 0.2), // Yellow
        _ => Color::srgb(0.8, 0.2, 0.8), // Magenta
    }
}
