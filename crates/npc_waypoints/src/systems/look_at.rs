//! Look-at rig system.

use bevy::prelude::*;

use crate::components::{FollowPath, LookAtRig, LookTarget, NpcControllerConfig, Waypoints};
use crate::follower::PathFollower;
use crate::steering::{smooth_damp, IDLE_LOOK_DISTANCE};

/// Система: look-at точка для head/eye rig
///
/// Moving → midpoint текущего и следующего waypoint'а, Idle → точка впереди по facing.
/// Позиция rig'а догоняет цель через smooth damp (без рывков при смене waypoint'а).
pub fn update_look_at_targets(
    mut npcs: Query<
        (&NpcControllerConfig, &PathFollower, &Transform, &mut LookAtRig, Option<&FollowPath>),
        Without<LookTarget>,
    >,
    mut look_targets: Query<&mut Transform, (With<LookTarget>, Without<NpcControllerConfig>)>,
    paths: Query<&Waypoints>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (config, follower, transform, mut rig, follow_path) in npcs.iter_mut() {
        let Ok(mut look_target) = look_targets.get_mut(rig.target) else {
            continue;
        };

        let path_point = if follower.is_moving {
            follow_path
                .and_then(|path| paths.get(path.0).ok())
                .and_then(|waypoints| follower.look_ahead_point(waypoints, config.loop_path))
        } else {
            None
        };

        let mut target = path_point
            .unwrap_or_else(|| transform.translation + *transform.forward() * IDLE_LOOK_DISTANCE);
        target.y += config.look_height_offset;

        let mut velocity = rig.velocity;
        look_target.translation = smooth_damp(
            look_target.translation,
            target,
            &mut velocity,
            config.look_smooth_time,
            delta,
        );
        rig.velocity = velocity;
    }
}
