//! Frame advancer: per-frame state machine движения по пути
//!
//! Состояние = progress (пройденная длина на текущем сегменте) + индексы.
//! Явных state enum'ов нет, переходы вытекают из factor = progress / length:
//!
//! ```text
//! TraversingSegment(i) ──factor ≈ 1──▶ ApproachingCorner(i+1) ──progress > length──▶ TraversingSegment(i+1)
//!          ▲                                                                                 │
//!          └────────────────────── WrappedToStart (последний waypoint) ◀─────────────────────┘
//! ```
//!
//! Контрольные точки угла пересчитываются лениво: один раз на проход угла
//! (guard `pending_corner_advance`) и один раз при wrap.

use std::fmt;
use std::sync::Arc;

use bevy::prelude::*;

use super::curve::{corner_control_points, CornerControlPoints};
use super::look_at::look_at;
use super::path::Path;

/// Сдвиг look-ahead точки (в единицах factor / bezier t)
pub const LOOK_AHEAD: f32 = 0.01;

/// Сегменты короче считаются нулевыми (дубликаты waypoint'ов)
const ZERO_LENGTH_EPSILON: f32 = 1e-6;

pub type FinalWaypointCallback = Arc<dyn Fn() + Send + Sync>;

/// Handle зарегистрированного callback'а (для удаления)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

/// Callback set: вызывается один раз на каждый полный круг, в порядке регистрации
#[derive(Default)]
pub struct FinalWaypointCallbacks {
    next_id: u64,
    entries: Vec<(CallbackId, FinalWaypointCallback)>,
}

impl FinalWaypointCallbacks {
    pub fn add(&mut self, callback: FinalWaypointCallback) -> CallbackId {
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    pub fn remove(&mut self, id: CallbackId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot-then-invoke: список копируется до вызова
    fn invoke_all(&self) {
        let snapshot: Vec<FinalWaypointCallback> =
            self.entries.iter().map(|(_, callback)| Arc::clone(callback)).collect();
        for callback in snapshot {
            callback();
        }
    }
}

impl fmt::Debug for FinalWaypointCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinalWaypointCallbacks")
            .field("registered", &self.entries.len())
            .finish()
    }
}

/// Результат одного тика: поза для хоста
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowerTick {
    pub position: Vec3,
    /// Точка чуть впереди на пути (только для направления взгляда)
    pub look_target: Vec3,
    /// None = направление вырождено, хост сохраняет предыдущий поворот
    pub rotation: Option<Quat>,
    /// true если на этом тике путь завершился и начался заново
    pub wrapped: bool,
}

/// Состояние движения по пути (вставляется build системой)
#[derive(Component, Debug)]
pub struct PathFollower {
    path: Path,
    /// Контейнер waypoint'ов, из которого построен путь
    source: Option<Entity>,
    up: Vec3,
    segment: usize,
    /// Interior waypoint, для которого посчитаны `controls`
    corner: usize,
    progress: f32,
    segment_length: f32,
    controls: Option<CornerControlPoints>,
    pending_corner_advance: bool,
    rotation: Quat,
    callbacks: FinalWaypointCallbacks,
    loops_completed: u32,
    corner_rebuilds: u32,
}

impl PathFollower {
    pub fn new(path: Path) -> Self {
        let mut follower = Self {
            segment_length: path.segment_length(0),
            path,
            source: None,
            up: Vec3::Y,
            segment: 0,
            corner: 1,
            progress: 0.0,
            controls: None,
            pending_corner_advance: false,
            rotation: Quat::IDENTITY,
            callbacks: FinalWaypointCallbacks::default(),
            loops_completed: 0,
            corner_rebuilds: 0,
        };
        follower.controls = corner_control_points(&follower.path, 1, follower.path.curve_distance());
        follower.face_first_segment();
        follower
    }

    pub fn with_source(mut self, source: Entity) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_up(mut self, up: Vec3) -> Self {
        self.up = up;
        self.face_first_segment();
        self
    }

    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
    }

    /// Замена пути целиком (setPathObject): индексы и progress в 0, callbacks сохраняются
    pub fn set_path(&mut self, path: Path, source: Option<Entity>) {
        self.path = path;
        self.source = source;
        self.segment = 0;
        self.corner = 1;
        self.progress = 0.0;
        self.segment_length = self.path.segment_length(0);
        self.controls = corner_control_points(&self.path, 1, self.path.curve_distance());
        self.pending_corner_advance = false;
        self.face_first_segment();
    }

    fn face_first_segment(&mut self) {
        if let Ok(rotation) = look_at(self.path.position(0), self.path.position(1), self.up) {
            self.rotation = rotation;
        }
    }

    /// Поза до первого тика: первый waypoint, взгляд на второй
    pub fn start_pose(&self) -> (Vec3, Quat) {
        (self.path.position(0), self.rotation)
    }

    pub fn tick(&mut self, dt: f32, speed: f32) -> FollowerTick {
        self.progress += dt * speed;

        if self.segment_length <= ZERO_LENGTH_EPSILON {
            return self.skip_zero_length_segment();
        }

        let waypoint_count = self.path.len();
        let curve_distance = self.path.curve_distance();
        let factor = self.progress / self.segment_length;

        if factor > 0.5 && self.segment != waypoint_count - 1 {
            self.pending_corner_advance = true;
        }

        let offset = factor - factor.round();
        let in_curve = offset.abs() < curve_distance
            // Нет кривой после последнего и перед первым waypoint'ом
            && !(self.segment == waypoint_count - 2 && factor > 0.5)
            && !(self.segment == 0 && factor < 0.5);

        let (position, look_target) = match (in_curve, self.controls) {
            (true, Some(controls)) => {
                let bez_factor = (offset + curve_distance) / (2.0 * curve_distance);
                (controls.sample(bez_factor), controls.sample(bez_factor + LOOK_AHEAD))
            }
            _ => {
                if self.pending_corner_advance
                    && factor < 0.5
                    && factor > curve_distance
                    && self.corner != waypoint_count - 2
                {
                    self.corner += 1;
                    self.pending_corner_advance = false;
                    self.rebuild_corner();
                }

                let from = self.path.position(self.segment);
                let to = self.path.position(self.segment + 1);
                (from.lerp(to, factor), from.lerp(to, factor + LOOK_AHEAD))
            }
        };

        let rotation = match look_at(position, look_target, self.up) {
            Ok(rotation) => {
                self.rotation = rotation;
                Some(rotation)
            }
            Err(_) => None,
        };

        let wrapped = if self.progress > self.segment_length {
            self.advance_segment()
        } else {
            false
        };

        FollowerTick {
            position,
            look_target,
            rotation,
            wrapped,
        }
    }

    /// Дубликат waypoint'а: сегмент сразу считается пройденным
    fn skip_zero_length_segment(&mut self) -> FollowerTick {
        let position = self.path.position(self.segment);

        // Сегмент пройден целиком: отложенный переход угла выполняется сразу
        if self.pending_corner_advance && self.corner != self.path.len() - 2 {
            self.corner += 1;
            self.rebuild_corner();
        }
        // Угол в конце нулевого сегмента: переход на следующем сегменте
        self.pending_corner_advance = true;
        let wrapped = self.advance_segment();

        FollowerTick {
            position,
            look_target: position,
            rotation: None,
            wrapped,
        }
    }

    /// Переход на следующий сегмент; true если путь закончился (wrap)
    fn advance_segment(&mut self) -> bool {
        self.segment += 1;

        let wrapped = self.segment == self.path.len() - 1;
        if wrapped {
            self.segment = 0;
            self.corner = 1;
            self.rebuild_corner();
            self.pending_corner_advance = false;
            self.loops_completed += 1;
            self.callbacks.invoke_all();
        }

        self.segment_length = self.path.segment_length(self.segment);
        self.progress = 0.0;
        wrapped
    }

    fn rebuild_corner(&mut self) {
        self.controls = corner_control_points(&self.path, self.corner, self.path.curve_distance());
        self.corner_rebuilds += 1;
    }

    pub fn add_final_waypoint_callback(
        &mut self,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> CallbackId {
        self.callbacks.add(Arc::new(callback))
    }

    pub fn remove_final_waypoint_callback(&mut self, id: CallbackId) -> bool {
        self.callbacks.remove(id)
    }

    pub fn clear_final_waypoint_callbacks(&mut self) {
        self.callbacks.clear();
    }

    pub fn final_waypoint_callback_count(&self) -> usize {
        self.callbacks.len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn source(&self) -> Option<Entity> {
        self.source
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn segment_index(&self) -> usize {
        self.segment
    }

    pub fn corner_index(&self) -> usize {
        self.corner
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn segment_length(&self) -> f32 {
        self.segment_length
    }

    /// Нормализованная позиция на сегменте (нулевой сегмент = 1.0)
    pub fn factor(&self) -> f32 {
        if self.segment_length <= ZERO_LENGTH_EPSILON {
            1.0
        } else {
            self.progress / self.segment_length
        }
    }

    pub fn corner_controls(&self) -> Option<CornerControlPoints> {
        self.controls
    }

    /// Последний валидный поворот
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn loops_completed(&self) -> u32 {
        self.loops_completed
    }

    /// Сколько раз пересчитывались контрольные точки после создания
    pub fn corner_rebuilds(&self) -> u32 {
        self.corner_rebuilds
    }
}
