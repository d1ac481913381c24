//! Presentation-side компоненты NPC: look-at rig и animation параметр

use bevy::prelude::*;

/// Look-at rig: NPC → entity точки, за которой следит голова/глаза
///
/// velocity: состояние smooth damp между кадрами.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct LookAtRig {
    pub target: Entity,
    pub velocity: Vec3,
}

impl LookAtRig {
    pub fn new(target: Entity) -> Self {
        Self {
            target,
            velocity: Vec3::ZERO,
        }
    }
}

/// Marker: entity, которую двигает LookAtRig (head/eye IK target)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct LookTarget;

/// Animation параметр "Speed" (читается animation graph'ом)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct LocomotionAnimation {
    pub speed: f32,
}
