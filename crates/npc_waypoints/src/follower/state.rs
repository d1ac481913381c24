//! Waypoint FSM: Idle ↔ Walking + advance/debounce логика
//!
//! Состояние хранится в owned компоненте, переходы = методы без доступа к World.
//! Системы только подают counts/телеметрию и коммитят destination в агента.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::WaypointProvider;
use crate::error::PathError;

/// Сколько кадров после switching кадра arrival check остаётся выключен
///
/// Кадр F: advance + commit; кадр F+1: проверка пропускается; кадр F+2: снова armed.
pub const SWITCH_DEBOUNCE_FRAMES: u8 = 1;

/// Дискретное состояние NPC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum NpcState {
    #[default]
    Idle,
    Walking,
}

/// Результат обработки "waypoint достигнут"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// Следующая точка внутри sequence
    Advanced { reached: usize, next: usize },
    /// Прошли последнюю точку, loop → снова 0
    Wrapped { reached: usize, next: usize },
    /// Прошли последнюю точку без loop → Idle
    Completed { reached: usize },
}

impl Arrival {
    /// Индекс, который надо закоммитить в агента (None = путь завершён)
    pub fn destination(&self) -> Option<usize> {
        match *self {
            Arrival::Advanced { next, .. } | Arrival::Wrapped { next, .. } => Some(next),
            Arrival::Completed { .. } => None,
        }
    }

    pub fn reached(&self) -> usize {
        match *self {
            Arrival::Advanced { reached, .. }
            | Arrival::Wrapped { reached, .. }
            | Arrival::Completed { reached } => reached,
        }
    }
}

/// Состояние следования по path
///
/// Инварианты:
/// - `current_index < count` пока `is_moving`
/// - `switching_point` только между advance и истечением debounce
#[derive(Component, Debug, Clone, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct PathFollower {
    pub state: NpcState,
    pub current_index: usize,
    pub is_moving: bool,
    pub switching_point: bool,
    /// Кадры debounce, оставшиеся до снятия switching_point
    pub switch_frames_left: u8,
    /// Реально применённая скорость (0 в Idle), источник для animation
    pub realtime_speed: f32,
    /// Автостарт: секунды до StartPath (None = не запланирован)
    pub pending_start: Option<f32>,
}

impl PathFollower {
    /// Idle → Walking
    ///
    /// Возвращает индекс первой destination (всегда 0).
    /// Пустая sequence → `PathError::EmptyPath`, состояние не меняется.
    pub fn start(&mut self, waypoint_count: usize) -> Result<usize, PathError> {
        if waypoint_count == 0 {
            return Err(PathError::EmptyPath);
        }

        self.current_index = 0;
        self.is_moving = true;
        self.switching_point = false;
        self.switch_frames_left = 0;
        self.pending_start = None;
        self.state = NpcState::Walking;
        Ok(self.current_index)
    }

    /// Walking → Idle (из любого состояния). Destination сбрасывает вызывающий
    pub fn stop(&mut self) {
        self.is_moving = false;
        self.switching_point = false;
        self.switch_frames_left = 0;
        self.pending_start = None;
        self.realtime_speed = 0.0;
        self.state = NpcState::Idle;
    }

    /// Запланировать автостарт через `delay` секунд
    pub fn schedule_start(&mut self, delay: f32) {
        self.state = NpcState::Idle;
        self.pending_start = Some(delay.max(0.0));
    }

    /// Тикает таймер автостарта. true → пора вызывать start
    pub fn tick_pending_start(&mut self, delta: f32) -> bool {
        let Some(remaining) = self.pending_start else {
            return false;
        };

        let remaining = remaining - delta;
        if remaining <= 0.0 {
            self.pending_start = None;
            true
        } else {
            self.pending_start = Some(remaining);
            false
        }
    }

    /// Можно ли проверять arrival в этом кадре (агент не должен быть path_pending)
    pub fn is_arrival_armed(&self) -> bool {
        self.is_moving && !self.switching_point
    }

    /// Waypoint достигнут: switching + advance
    ///
    /// Вызывать только когда `is_arrival_armed()` и агент дошёл до reach threshold.
    /// count == 0 (path опустел во время ходьбы) обрабатывается как завершение.
    pub fn on_point_reached(&mut self, waypoint_count: usize, loop_path: bool) -> Arrival {
        let reached = self.current_index;
        self.switching_point = true;
        self.current_index += 1;

        if self.current_index >= waypoint_count {
            if loop_path && waypoint_count > 0 {
                self.current_index = 0;
                self.switch_frames_left = SWITCH_DEBOUNCE_FRAMES;
                Arrival::Wrapped {
                    reached,
                    next: self.current_index,
                }
            } else {
                self.current_index = reached;
                self.is_moving = false;
                self.switching_point = false;
                self.switch_frames_left = 0;
                self.state = NpcState::Idle;
                Arrival::Completed { reached }
            }
        } else {
            self.switch_frames_left = SWITCH_DEBOUNCE_FRAMES;
            Arrival::Advanced {
                reached,
                next: self.current_index,
            }
        }
    }

    /// Конец кадра: debounce switching флага
    pub fn tick_switch_debounce(&mut self) {
        if !self.switching_point {
            return;
        }

        if self.switch_frames_left == 0 {
            self.switching_point = false;
        } else {
            self.switch_frames_left -= 1;
        }
    }

    /// Индексы (текущий, следующий) для look-at midpoint
    ///
    /// Следующий wrap'ается к 0 при loop, иначе клампится к последнему.
    pub fn look_ahead_indices(&self, waypoint_count: usize, loop_path: bool) -> Option<(usize, usize)> {
        if waypoint_count == 0 {
            return None;
        }

        let current = self.current_index.min(waypoint_count - 1);
        let mut next = current + 1;
        if next >= waypoint_count {
            next = if loop_path { 0 } else { waypoint_count - 1 };
        }
        Some((current, next))
    }

    /// Midpoint текущего и следующего waypoint'а (без height offset)
    pub fn look_ahead_point<P: WaypointProvider + ?Sized>(&self, path: &P, loop_path: bool) -> Option<Vec3> {
        let (a, b) = self.look_ahead_indices(path.count(), loop_path)?;
        Some(path.position_at(a).lerp(path.position_at(b), 0.5))
    }
}
