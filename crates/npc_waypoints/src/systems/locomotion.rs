//! Locomotion systems: heading/скорость (Direct vs Smoothed) и animation параметр.

use bevy::prelude::*;

use crate::components::{LocomotionAnimation, MovementMode, NavAgent, NpcControllerConfig};
use crate::follower::{NpcState, PathFollower};
use crate::steering::{damp_towards, smoothed_heading, turn_speed_multiplier};

/// Система: animation параметр Speed
///
/// Читает realtime_speed прошлого кадра (animation обновляется до steering).
pub fn update_locomotion_animation(
    mut npcs: Query<(&NpcControllerConfig, &PathFollower, &mut LocomotionAnimation)>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (config, follower, mut animation) in npcs.iter_mut() {
        let target = match follower.state {
            NpcState::Walking => follower.realtime_speed,
            NpcState::Idle => 0.0,
        };

        let speed = damp_towards(animation.speed, target, config.anim_damp_time, delta);
        if animation.speed != speed {
            animation.speed = speed;
        }
    }
}

/// Система: управление агентом по MovementMode
///
/// Direct: агент рулит телом сам, скорость фиксированная.
/// Smoothed: slerp heading к steering target, скорость режется по углу разворота,
/// velocity агента = facing × скорость (пока не дошли до stopping distance).
pub fn steer_npc_agents(
    mut npcs: Query<(&NpcControllerConfig, &mut PathFollower, &mut Transform, Option<&mut NavAgent>)>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (config, mut follower, mut transform, agent) in npcs.iter_mut() {
        let Some(mut agent) = agent else {
            follower.realtime_speed = 0.0;
            continue;
        };

        if !follower.is_moving || follower.state == NpcState::Idle {
            follower.realtime_speed = 0.0;
            // Smoothed: velocity = facing × 0, иначе тело продолжит идти по старому facing
            if config.movement_mode == MovementMode::Smoothed && agent.velocity != Vec3::ZERO {
                agent.velocity = Vec3::ZERO;
            }
            continue;
        }

        match config.movement_mode {
            MovementMode::Direct => {
                if !agent.update_rotation {
                    agent.update_rotation = true;
                }
                agent.speed = config.speed;
                follower.realtime_speed = config.speed;
            }

            MovementMode::Smoothed => {
                if agent.update_rotation {
                    agent.update_rotation = false;
                }

                // Путь ещё не посчитан: держим прошлую скорость
                if !agent.has_path() {
                    continue;
                }

                let step = smoothed_heading(
                    transform.rotation,
                    transform.translation,
                    agent.steering_target,
                    config.turn_speed,
                    delta,
                );
                transform.rotation = step.rotation;

                let multiplier = turn_speed_multiplier(step.angle_deg, config.min_turn_speed_multiplier);

                if agent.remaining_distance > agent.stopping_distance {
                    follower.realtime_speed = config.speed * multiplier;
                    agent.velocity = *transform.forward() * follower.realtime_speed;
                }
            }
        }
    }
}
