//! LineConnection: unit mesh (высота 1 по Y), растянутый между target_a и target_b
//!
//! Mesh считается центрированным: половина вверх, половина вниз по Y.
//! Поэтому scale.y = половина расстояния (× length_percentage).

use bevy::prelude::*;
use bevy::transform::helper::TransformHelper;

use crate::logger;

/// Линия между двумя entity
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct LineConnection {
    pub target_a: Entity,
    pub target_b: Entity,
    /// Какую долю расстояния покрывает линия (1.0 = целиком)
    pub length_percentage: f32,
    pub thickness: f32,
}

impl LineConnection {
    pub fn new(target_a: Entity, target_b: Entity) -> Self {
        Self {
            target_a,
            target_b,
            length_percentage: 1.0,
            thickness: 0.05,
        }
    }

    pub fn with_length_percentage(mut self, length_percentage: f32) -> Self {
        self.length_percentage = length_percentage;
        self
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = thickness;
        self
    }
}

/// World transform линии между `a` и `b`.
/// None если точки совпадают (направления нет).
pub fn line_transform(a: Vec3, b: Vec3, length_percentage: f32, thickness: f32) -> Option<Transform> {
    let half = (b - a) * 0.5;
    let distance = half.length();
    if !(distance > f32::EPSILON) {
        return None;
    }

    Some(Transform {
        translation: a + half,
        rotation: Quat::from_rotation_arc(Vec3::Y, half / distance),
        scale: Vec3::new(thickness, length_percentage * distance, thickness),
    })
}

/// Система: обновить Transform всех линий
///
/// Если у линии есть родитель: позиция/поворот переводятся в его пространство,
/// scale остаётся локальным. Пропавшая цель → warning + LineConnection снимается.
pub fn update_line_connections(
    mut commands: Commands,
    lines: Query<(Entity, &LineConnection, Option<&ChildOf>)>,
    mut transforms: ParamSet<(TransformHelper, Query<&mut Transform>)>,
) {
    for (entity, line, child_of) in lines.iter() {
        let helper = transforms.p0();

        let targets = (
            helper.compute_global_transform(line.target_a),
            helper.compute_global_transform(line.target_b),
        );
        let (pos_a, pos_b) = match targets {
            (Ok(a), Ok(b)) => (a.translation(), b.translation()),
            (Err(e), _) | (_, Err(e)) => {
                logger::log_warning(&format!(
                    "LineConnection {:?}: target unavailable ({:?}), deactivating",
                    entity, e
                ));
                commands.entity(entity).remove::<LineConnection>();
                continue;
            }
        };

        let Some(world) = line_transform(pos_a, pos_b, line.length_percentage, line.thickness) else {
            // Цели совпали: оставляем прошлую позу
            continue;
        };

        let local = match child_of {
            Some(child_of) => match helper.compute_global_transform(child_of.parent()) {
                Ok(parent) => Transform {
                    translation: parent.affine().inverse().transform_point3(world.translation),
                    rotation: parent.rotation().inverse() * world.rotation,
                    scale: world.scale,
                },
                Err(e) => {
                    logger::log_warning(&format!(
                        "LineConnection {:?}: parent transform unavailable ({:?})",
                        entity, e
                    ));
                    continue;
                }
            },
            None => world,
        };

        if let Ok(mut transform) = transforms.p1().get_mut(entity) {
            *transform = local;
        }
    }
}
