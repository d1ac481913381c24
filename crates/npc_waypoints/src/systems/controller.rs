//! Controller systems: активация, start/stop запросы, прогресс по waypoint'ам.

use bevy::prelude::*;

use crate::components::{
    FollowPath, LocomotionAnimation, LookAtRig, LookTarget, MovementMode, NavAgent, NpcControllerConfig,
    WaypointProvider, Waypoints,
};
use crate::error::PathError;
use crate::events::{PathCommand, PathFollowEvent};
use crate::follower::PathFollower;
use crate::logger::{log, log_info, log_warning};
use crate::steering::INITIAL_LOOK_DISTANCE;

/// Stopping distance агента (маленькая: arrival решает reach_distance контроллера)
pub const AGENT_STOPPING_DISTANCE: f32 = 0.02;

/// Ускорение агента: скорость задаём мы, агент не должен разгоняться сам
pub const AGENT_ACCELERATION: f32 = 999.0;

/// Direct: агент поворачивает тело практически мгновенно
pub const DIRECT_ANGULAR_SPEED: f32 = 999.0;

/// Настроить агента под режим движения контроллера
pub fn configure_agent(agent: &mut NavAgent, config: &NpcControllerConfig) {
    agent.speed = config.speed;
    agent.stopping_distance = AGENT_STOPPING_DISTANCE;
    agent.auto_braking = false;
    agent.acceleration = AGENT_ACCELERATION;

    match config.movement_mode {
        MovementMode::Smoothed => {
            agent.update_rotation = false;
        }
        MovementMode::Direct => {
            agent.update_rotation = true;
            agent.angular_speed = DIRECT_ANGULAR_SPEED;
        }
    }
}

/// Система: активация новых NPC контроллеров
///
/// - Санитизация конфига
/// - Настройка NavAgent под MovementMode
/// - Look-at rig в стартовую точку
/// - Автостарт через start_delay
///
/// Отсутствующие ссылки → warning один раз, поведение деградирует до no-op.
pub fn initialize_npc_controllers(
    mut npcs: Query<
        (
            Entity,
            &mut NpcControllerConfig,
            &mut PathFollower,
            &Transform,
            Option<&mut NavAgent>,
            Option<&FollowPath>,
            Option<&LookAtRig>,
            Option<&LocomotionAnimation>,
        ),
        (Added<NpcControllerConfig>, Without<LookTarget>),
    >,
    mut look_targets: Query<&mut Transform, (With<LookTarget>, Without<NpcControllerConfig>)>,
) {
    for (entity, mut config, mut follower, transform, agent, follow_path, rig, animation) in npcs.iter_mut() {
        let (sanitized, fixed) = config.sanitized();
        if !fixed.is_empty() {
            log_warning(&format!("NPC {:?}: config values out of range, clamped: {:?}", entity, fixed));
            *config = sanitized;
        }

        match agent {
            Some(mut agent) => configure_agent(&mut agent, &config),
            None => log_warning(&format!("NPC {:?}: {}", entity, PathError::MissingAgent)),
        }

        if follow_path.is_none() {
            log_warning(&format!("NPC {:?}: {}", entity, PathError::MissingPath));
        }

        if animation.is_none() {
            log(&format!("NPC {:?}: no LocomotionAnimation, speed parameter disabled", entity));
        }

        if let Some(rig) = rig {
            match look_targets.get_mut(rig.target) {
                Ok(mut target) => {
                    target.translation = transform.translation
                        + *transform.forward() * INITIAL_LOOK_DISTANCE
                        + Vec3::Y * config.look_height_offset;
                }
                Err(_) => log_warning(&format!(
                    "NPC {:?}: look-at target {:?} has no LookTarget",
                    entity, rig.target
                )),
            }
        }

        follower.stop();
        if config.start_on_awake {
            follower.schedule_start(config.start_delay);
        }
    }
}

/// StartPath: коммитит первую destination в агента
fn start_path(
    follower: &mut PathFollower,
    agent: Option<Mut<NavAgent>>,
    follow_path: Option<&FollowPath>,
    paths: &Query<&Waypoints>,
) -> Result<(), PathError> {
    let waypoints = follow_path
        .and_then(|path| paths.get(path.0).ok())
        .ok_or(PathError::MissingPath)?;

    let index = follower.start(waypoints.count())?;
    if let Some(mut agent) = agent {
        agent.set_destination(waypoints.position_at(index));
    }
    Ok(())
}

/// StopPath: Idle + сброс destination
fn stop_path(follower: &mut PathFollower, agent: Option<Mut<NavAgent>>) {
    follower.stop();
    if let Some(mut agent) = agent {
        agent.reset_path();
    }
}

/// Система: PathCommand события + таймер автостарта
pub fn handle_path_commands(
    mut path_commands: EventReader<PathCommand>,
    mut npcs: Query<(Entity, &mut PathFollower, Option<&mut NavAgent>, Option<&FollowPath>)>,
    paths: Query<&Waypoints>,
    time: Res<Time>,
) {
    for command in path_commands.read() {
        match *command {
            PathCommand::Start { npc } => {
                let Ok((_, mut follower, agent, follow_path)) = npcs.get_mut(npc) else {
                    continue;
                };
                match start_path(&mut follower, agent, follow_path, &paths) {
                    Ok(()) => log_info(&format!("NPC {:?}: path started", npc)),
                    Err(err) => log_warning(&format!("NPC {:?}: start rejected: {}", npc, err)),
                }
            }
            PathCommand::Stop { npc } => {
                let Ok((_, mut follower, agent, _)) = npcs.get_mut(npc) else {
                    continue;
                };
                stop_path(&mut follower, agent);
                log_info(&format!("NPC {:?}: path stopped", npc));
            }
        }
    }

    let delta = time.delta_secs();
    for (entity, mut follower, agent, follow_path) in npcs.iter_mut() {
        if !follower.tick_pending_start(delta) {
            continue;
        }
        if let Err(err) = start_path(&mut follower, agent, follow_path, &paths) {
            log_warning(&format!("NPC {:?}: auto start rejected: {}", entity, err));
        }
    }
}

/// Система: проверка достижения waypoint'а
///
/// Пропускается пока агент считает путь (path_pending) или идёт switching debounce.
/// PointReached пишется до commit'а следующей destination, PathCompleted: после.
/// Debounce тикает в конце кадра для всех NPC.
pub fn check_path_progress(
    mut npcs: Query<(
        Entity,
        &NpcControllerConfig,
        &mut PathFollower,
        Option<&mut NavAgent>,
        Option<&FollowPath>,
    )>,
    paths: Query<&Waypoints>,
    mut path_events: EventWriter<PathFollowEvent>,
) {
    for (entity, config, mut follower, agent, follow_path) in npcs.iter_mut() {
        let waypoints = follow_path.and_then(|path| paths.get(path.0).ok());

        if let (Some(mut agent), Some(waypoints)) = (agent, waypoints) {
            let arrived = follower.is_arrival_armed()
                && !agent.path_pending
                && agent.remaining_distance <= config.reach_distance;

            if arrived {
                let arrival = follower.on_point_reached(waypoints.count(), config.loop_path);
                path_events.write(PathFollowEvent::PointReached {
                    npc: entity,
                    index: arrival.reached(),
                });

                match arrival.destination() {
                    Some(next) => agent.set_destination(waypoints.position_at(next)),
                    None => {
                        path_events.write(PathFollowEvent::PathCompleted { npc: entity });
                        log_info(&format!("NPC {:?}: path complete", entity));
                    }
                }
            }
        }

        follower.tick_switch_debounce();
    }
}
