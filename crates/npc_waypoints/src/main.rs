//! Headless патруль NPC
//!
//! Случайный (seeded) path из children, один NPC в Smoothed режиме, печать событий.

use bevy::prelude::*;
use rand::Rng;

use npc_waypoints::{
    create_headless_app, log_info, DeterministicRng, FollowPath, HeadlessNavigationPlugin, LocomotionAnimation,
    LookAtRig, LookTarget, NavAgent, NpcControllerConfig, PathFollowEvent, PathFollower, PathSource,
    WaypointNavigationPlugin,
};

const WAYPOINT_COUNT: usize = 6;
const PATROL_RADIUS: f32 = 8.0;
const TICKS: usize = 3000;

fn main() {
    let seed = 42;
    println!("Starting headless NPC patrol (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins((WaypointNavigationPlugin, HeadlessNavigationPlugin));

    let points: Vec<Vec3> = {
        let mut rng = app.world_mut().resource_mut::<DeterministicRng>();
        (0..WAYPOINT_COUNT)
            .map(|_| {
                Vec3::new(
                    rng.rng.gen_range(-PATROL_RADIUS..PATROL_RADIUS),
                    0.0,
                    rng.rng.gen_range(-PATROL_RADIUS..PATROL_RADIUS),
                )
            })
            .collect()
    };

    let path = app
        .world_mut()
        .spawn((Name::new("PatrolPath"), PathSource::ChildTransforms))
        .with_children(|parent| {
            for (i, point) in points.iter().enumerate() {
                parent.spawn((Name::new(format!("Point_{i}")), Transform::from_translation(*point)));
            }
        })
        .id();

    let look_target = app.world_mut().spawn((Name::new("LookTarget"), LookTarget)).id();

    let npc = app
        .world_mut()
        .spawn((
            Name::new("Patroller"),
            NpcControllerConfig::default(),
            NavAgent::default(),
            FollowPath(path),
            LookAtRig::new(look_target),
            LocomotionAnimation::default(),
        ))
        .id();

    let mut cursor = app
        .world()
        .resource::<Events<PathFollowEvent>>()
        .get_cursor();

    for tick in 0..TICKS {
        app.update();

        let events = app.world().resource::<Events<PathFollowEvent>>();
        for event in cursor.read(events) {
            println!("Tick {}: {:?}", tick, event);
        }

        if tick % 300 == 0 {
            let world = app.world();
            let (Some(transform), Some(follower)) = (world.get::<Transform>(npc), world.get::<PathFollower>(npc)) else {
                continue;
            };
            println!(
                "Tick {}: {:?} index {} at {:.2?} speed {:.2}",
                tick, follower.state, follower.current_index, transform.translation, follower.realtime_speed
            );
        }
    }

    log_info("Patrol complete!");
}
