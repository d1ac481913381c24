//! Path компоненты: waypoint sequence, её источник, ссылка NPC → path

use bevy::prelude::*;

/// Индексируемая последовательность waypoint'ов в world space
///
/// Out-of-range index → `Vec3::ZERO` (defined default, не паника).
pub trait WaypointProvider {
    fn count(&self) -> usize;
    fn position_at(&self, index: usize) -> Vec3;
}

impl WaypointProvider for [Vec3] {
    fn count(&self) -> usize {
        self.len()
    }

    fn position_at(&self, index: usize) -> Vec3 {
        self.get(index).copied().unwrap_or(Vec3::ZERO)
    }
}

/// Кэш world-space позиций waypoint'ов (read-only для контроллера)
///
/// Пересобирается системой `refresh_waypoints` из PathSource.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Waypoints {
    pub points: Vec<Vec3>,
}

impl Waypoints {
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl WaypointProvider for Waypoints {
    fn count(&self) -> usize {
        self.points.len()
    }

    fn position_at(&self, index: usize) -> Vec3 {
        self.points.as_slice().position_at(index)
    }
}

/// Откуда path entity берёт свои Waypoints
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
#[require(Waypoints, Transform)]
pub enum PathSource {
    /// Children path entity в порядке Children (ручная расстановка / authoring tools)
    #[default]
    ChildTransforms,
    /// `count` точек равномерно по длине PathSpline
    SplineSamples { count: usize },
    /// Knot'ы PathSpline
    SplineKnots,
}

/// NPC → path entity
///
/// Отсутствие компонента = "path не назначен" (warning при активации).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct FollowPath(pub Entity);
