//! Path events: уведомления контроллера и внешние запросы
//!
//! Notifications пишутся синхронно из `check_path_progress` в порядке update'а:
//! PointReached всегда раньше PathCompleted того же кадра.

use bevy::prelude::*;

/// Уведомления NPC контроллера (observer side)
#[derive(Event, Debug, Clone, PartialEq)]
pub enum PathFollowEvent {
    /// NPC дошёл до waypoint'а `index`
    PointReached { npc: Entity, index: usize },

    /// Non-loop path пройден до конца, NPC перешёл в Idle
    PathCompleted { npc: Entity },
}

/// Внешние запросы к контроллеру (UI, quest logic, тесты)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCommand {
    /// StartPath: Idle → Walking с индекса 0
    Start { npc: Entity },

    /// StopPath: → Idle, destination сбрасывается
    Stop { npc: Entity },
}

/// Authoring запросы для path entity с PathSpline
///
/// Headless аналог editor tools: пересобрать/выровнять children по сплайну.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathAuthoringRequest {
    /// Удалить children и создать `count` точек равномерно по длине сплайна
    GeneratePoints { path: Entity, count: usize },

    /// Удалить children и создать по точке на каждый knot
    GenerateFromKnots { path: Entity },

    /// Разложить существующие children равномерно по сплайну (нужно ≥ 2)
    DistributeEvenly { path: Entity },

    /// Повернуть children по касательной сплайна в ближайшей точке
    AlignRotation { path: Entity },
}
