//! Look-at solver: forward + up hint → orientation
//!
//! Базис (right, up, forward) строится из forward и ортогонализованного up,
//! затем 3×3 → quaternion через trace-based ветвление по наибольшему
//! диагональному элементу (точность около поворотов на ±180°).
//!
//! Результат поворачивает локальную +Z в forward, локальную +Y в up.

use bevy::prelude::*;

use super::error::PathError;

/// Минимальная длина вектора направления
const DIRECTION_EPSILON: f32 = 1e-6;

pub fn look_at(source: Vec3, dest: Vec3, up_hint: Vec3) -> Result<Quat, PathError> {
    let delta = dest - source;
    let length = delta.length();
    if !(length > DIRECTION_EPSILON) {
        return Err(PathError::DegenerateDirection);
    }
    let forward = delta / length;

    // Gram-Schmidt: убираем из up компоненту вдоль forward
    let projected = up_hint - forward * up_hint.dot(forward);
    let up = if projected.length_squared() > DIRECTION_EPSILON * DIRECTION_EPSILON {
        projected.normalize()
    } else {
        // up параллелен forward (смотрим строго вверх/вниз)
        forward.any_orthonormal_vector()
    };

    let right = up.cross(forward);
    let up = forward.cross(right);

    Ok(basis_to_quat(right, up, forward))
}

/// Строки матрицы: m0 = right, m1 = up, m2 = forward
fn basis_to_quat(right: Vec3, up: Vec3, forward: Vec3) -> Quat {
    let (m00, m01, m02) = (right.x, right.y, right.z);
    let (m10, m11, m12) = (up.x, up.y, up.z);
    let (m20, m21, m22) = (forward.x, forward.y, forward.z);

    let trace = m00 + m11 + m22;
    if trace > 0.0 {
        let root = (trace + 1.0).sqrt();
        let w = root * 0.5;
        let scale = 0.5 / root;
        return Quat::from_xyzw(
            (m12 - m21) * scale,
            (m20 - m02) * scale,
            (m01 - m10) * scale,
            w,
        )
        .normalize();
    }

    if m00 >= m11 && m00 >= m22 {
        let root = (1.0 + m00 - m11 - m22).sqrt();
        let scale = 0.5 / root;
        return Quat::from_xyzw(
            0.5 * root,
            (m01 + m10) * scale,
            (m02 + m20) * scale,
            (m12 - m21) * scale,
        )
        .normalize();
    }

    if m11 > m22 {
        let root = (1.0 + m11 - m00 - m22).sqrt();
        let scale = 0.5 / root;
        return Quat::from_xyzw(
            (m10 + m01) * scale,
            0.5 * root,
            (m21 + m12) * scale,
            (m20 - m02) * scale,
        )
        .normalize();
    }

    let root = (1.0 + m22 - m00 - m11).sqrt();
    let scale = 0.5 / root;
    Quat::from_xyzw(
        (m20 + m02) * scale,
        (m21 + m12) * scale,
        0.5 * root,
        (m01 - m10) * scale,
    )
    .normalize()
}
