//! Tests for waypoint FSM.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use super::super::state::{Arrival, NpcState, PathFollower};
    use crate::components::Waypoints;
    use crate::error::PathError;

    /// Сигнал "reached" + debounce до следующего armed кадра
    fn reach_and_settle(follower: &mut PathFollower, count: usize, loop_path: bool) -> Arrival {
        assert!(follower.is_arrival_armed());
        let arrival = follower.on_point_reached(count, loop_path);
        while follower.switching_point {
            follower.tick_switch_debounce();
        }
        arrival
    }

    #[test]
    fn test_default_is_idle() {
        let follower = PathFollower::default();
        assert_eq!(follower.state, NpcState::Idle);
        assert!(!follower.is_moving);
        assert!(!follower.is_arrival_armed());
    }

    #[test]
    fn test_start_empty_path_is_rejected() {
        let mut follower = PathFollower::default();

        assert_eq!(follower.start(0), Err(PathError::EmptyPath));
        assert_eq!(follower.state, NpcState::Idle);
        assert!(!follower.is_moving);
    }

    #[test]
    fn test_start_commits_first_index() {
        let mut follower = PathFollower {
            current_index: 3,
            switching_point: true,
            ..default()
        };

        assert_eq!(follower.start(5), Ok(0));
        assert_eq!(follower.current_index, 0);
        assert_eq!(follower.state, NpcState::Walking);
        assert!(!follower.switching_point);
    }

    #[test]
    fn test_non_loop_completes_exactly_once_after_n_reaches() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..50 {
            let count = rng.gen_range(1..=20);
            let mut follower = PathFollower::default();
            follower.start(count).expect("non-empty path");

            let mut completions = 0;
            for signal in 1..=count {
                let arrival = reach_and_settle(&mut follower, count, false);
                if let Arrival::Completed { reached } = arrival {
                    completions += 1;
                    assert_eq!(signal, count, "completed before the last waypoint");
                    assert_eq!(reached, count - 1);
                } else {
                    assert_eq!(follower.state, NpcState::Walking);
                }
            }

            assert_eq!(completions, 1);
            assert_eq!(follower.state, NpcState::Idle);
            assert!(!follower.is_moving);
        }
    }

    #[test]
    fn test_loop_cycles_modulo_count() {
        for count in 1..=6 {
            let mut follower = PathFollower::default();
            follower.start(count).expect("non-empty path");

            for step in 0..(count * 4) {
                let expected_next = (step + 1) % count;
                let arrival = reach_and_settle(&mut follower, count, true);

                assert_eq!(arrival.destination(), Some(expected_next));
                assert!(!matches!(arrival, Arrival::Completed { .. }));
                assert_eq!(follower.current_index, expected_next);
                assert_eq!(follower.state, NpcState::Walking);
            }
        }
    }

    #[test]
    fn test_wrap_reports_wrapped() {
        let mut follower = PathFollower::default();
        follower.start(2).expect("non-empty path");

        assert_eq!(
            reach_and_settle(&mut follower, 2, true),
            Arrival::Advanced { reached: 0, next: 1 }
        );
        assert_eq!(
            reach_and_settle(&mut follower, 2, true),
            Arrival::Wrapped { reached: 1, next: 0 }
        );
    }

    #[test]
    fn test_switching_flag_debounce() {
        let mut follower = PathFollower::default();
        follower.start(4).expect("non-empty path");

        follower.on_point_reached(4, false);
        assert!(follower.switching_point);
        assert!(!follower.is_arrival_armed());

        // Конец switching кадра: всё ещё выключено
        follower.tick_switch_debounce();
        assert!(follower.switching_point);

        // Конец следующего кадра: снова armed
        follower.tick_switch_debounce();
        assert!(!follower.switching_point);
        assert!(follower.is_arrival_armed());
        assert_eq!(follower.current_index, 1);
    }

    #[test]
    fn test_stop_from_any_index() {
        for index in 0..5 {
            let mut follower = PathFollower::default();
            follower.start(5).expect("non-empty path");
            for _ in 0..index {
                reach_and_settle(&mut follower, 5, true);
            }
            follower.realtime_speed = 1.0;

            follower.stop();
            assert_eq!(follower.state, NpcState::Idle);
            assert!(!follower.is_moving);
            assert_eq!(follower.realtime_speed, 0.0);
        }
    }

    #[test]
    fn test_path_emptied_while_walking_completes() {
        let mut follower = PathFollower::default();
        follower.start(3).expect("non-empty path");

        let arrival = follower.on_point_reached(0, true);
        assert_eq!(arrival, Arrival::Completed { reached: 0 });
        assert_eq!(follower.state, NpcState::Idle);
    }

    #[test]
    fn test_pending_start_timer() {
        let mut follower = PathFollower::default();
        follower.schedule_start(1.0);

        assert!(!follower.tick_pending_start(0.5));
        assert!(!follower.tick_pending_start(0.4));
        assert!(follower.tick_pending_start(0.2));
        assert_eq!(follower.pending_start, None);
        assert!(!follower.tick_pending_start(1.0));
    }

    #[test]
    fn test_stop_cancels_pending_start() {
        let mut follower = PathFollower::default();
        follower.schedule_start(0.5);
        follower.stop();

        assert!(!follower.tick_pending_start(1.0));
    }

    #[test]
    fn test_look_ahead_wraps_or_clamps() {
        let path = Waypoints::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 4.0),
        ]);
        let follower = PathFollower {
            current_index: 2,
            is_moving: true,
            state: NpcState::Walking,
            ..default()
        };

        assert_eq!(follower.look_ahead_indices(3, true), Some((2, 0)));
        assert_eq!(follower.look_ahead_indices(3, false), Some((2, 2)));
        assert_eq!(follower.look_ahead_point(&path, true), Some(Vec3::new(1.0, 0.0, 2.0)));
        assert_eq!(follower.look_ahead_point(&path, false), Some(Vec3::new(2.0, 0.0, 4.0)));
        assert_eq!(follower.look_ahead_indices(0, true), None);
    }
}
