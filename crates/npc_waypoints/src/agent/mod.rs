//! Headless navigation agent (engine stand-in)
//!
//! В игре NavAgent телеметрию пишет engine bridge (NavigationAgent3D / NavMeshAgent).
//! Для headless прогонов и тестов: прямолинейный агент без navmesh:
//! - path request резолвится на следующем кадре (path_pending один кадр)
//! - steering target = destination (препятствий нет)
//! - update_rotation: агент разгоняется к speed и сам поворачивает тело
//! - иначе: интегрирует velocity контроллера (горизонтальную проекцию)
//! - шаг не длиннее оставшейся дистанции до destination

use bevy::prelude::*;

use crate::components::NavAgent;
use crate::steering::{horizontal_direction, look_rotation, move_towards, rotate_towards};
use crate::WaypointSet;

/// Минимальная дистанция, ниже которой агент считается стоящим на destination
const ARRIVED_EPSILON: f32 = 1e-4;

pub struct HeadlessNavigationPlugin;

impl Plugin for HeadlessNavigationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, simulate_nav_agents.in_set(WaypointSet::Agents));
    }
}

/// Система: один шаг headless агента
pub fn simulate_nav_agents(mut agents: Query<(&mut Transform, &mut NavAgent)>, time: Res<Time>) {
    let delta = time.delta_secs();

    for (mut transform, mut agent) in agents.iter_mut() {
        let Some(destination) = agent.destination else {
            if agent.velocity != Vec3::ZERO {
                agent.velocity = Vec3::ZERO;
            }
            continue;
        };

        // Резолв пути (аналог async path request у engine'а)
        if agent.path_pending {
            agent.path_pending = false;
            agent.steering_target = destination;
            agent.remaining_distance = transform.translation.distance(destination);
            continue;
        }

        agent.steering_target = destination;
        let to_target = destination - transform.translation;
        let distance = to_target.length();

        if distance <= agent.stopping_distance.max(ARRIVED_EPSILON) {
            agent.velocity = Vec3::ZERO;
            agent.remaining_distance = distance;
            continue;
        }

        let velocity = if agent.update_rotation {
            let desired = to_target / distance * agent.speed;
            let velocity = move_towards(agent.velocity, desired, agent.acceleration * delta);

            if let Some(heading) = horizontal_direction(Vec3::ZERO, velocity) {
                transform.rotation = rotate_towards(
                    transform.rotation,
                    look_rotation(heading),
                    agent.angular_speed.to_radians() * delta,
                );
            }
            velocity
        } else {
            // Velocity пишет контроллер (facing × скорость), вертикаль отбрасываем
            Vec3::new(agent.velocity.x, 0.0, agent.velocity.z)
        };

        transform.translation += (velocity * delta).clamp_length_max(distance);

        agent.velocity = velocity;
        agent.remaining_distance = transform.translation.distance(destination);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn agent_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(bevy::time::TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
            .add_systems(Update, simulate_nav_agents);
        app
    }

    #[test]
    fn test_path_pending_resolves_next_frame() {
        let mut app = agent_app();
        let mut agent = NavAgent::default();
        agent.set_destination(Vec3::new(0.0, 0.0, -4.0));
        let entity = app.world_mut().spawn((Transform::default(), agent)).id();

        app.update();

        let agent = app.world().get::<NavAgent>(entity).expect("agent");
        assert!(!agent.path_pending);
        assert_eq!(agent.steering_target, Vec3::new(0.0, 0.0, -4.0));
        assert!((agent.remaining_distance - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_direct_agent_reaches_destination_without_overshoot() {
        let mut app = agent_app();
        let mut agent = NavAgent {
            speed: 2.0,
            acceleration: 999.0,
            angular_speed: 999.0,
            ..default()
        };
        agent.set_destination(Vec3::new(3.0, 0.0, 0.0));
        let entity = app.world_mut().spawn((Transform::default(), agent)).id();

        for _ in 0..40 {
            app.update();
            let transform = app.world().get::<Transform>(entity).expect("transform");
            assert!(transform.translation.x <= 3.0 + 1e-4);
        }

        let transform = app.world().get::<Transform>(entity).expect("transform");
        assert!((transform.translation - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-3);
        // Повернулся лицом к +X
        assert!((*transform.forward() - Vec3::X).length() < 1e-2);
    }

    #[test]
    fn test_controller_velocity_is_integrated_along_its_direction() {
        let mut app = agent_app();
        let mut agent = NavAgent {
            update_rotation: false,
            ..default()
        };
        agent.set_destination(Vec3::new(0.0, 0.0, -10.0));
        let entity = app.world_mut().spawn((Transform::default(), agent)).id();

        // Первый update: резолв пути (delta первого кадра = 0)
        app.update();
        app.world_mut().get_mut::<NavAgent>(entity).expect("agent").velocity = Vec3::new(1.0, 0.5, 0.0);
        app.update();

        let transform = app.world().get::<Transform>(entity).expect("transform");
        // Вдоль +X (как написал контроллер), вертикаль отброшена
        assert!((transform.translation - Vec3::new(0.1, 0.0, 0.0)).length() < 1e-4);

        let agent = app.world().get::<NavAgent>(entity).expect("agent");
        assert_eq!(agent.velocity, Vec3::new(1.0, 0.0, 0.0));
        assert!((agent.remaining_distance - Vec3::new(0.1, 0.0, 10.0).length()).abs() < 1e-4);
    }

    #[test]
    fn test_controller_velocity_step_is_clamped_to_remaining_distance() {
        let mut app = agent_app();
        let mut agent = NavAgent {
            update_rotation: false,
            ..default()
        };
        agent.set_destination(Vec3::new(0.0, 0.0, -0.5));
        let entity = app.world_mut().spawn((Transform::default(), agent)).id();

        app.update();
        // 20 м/с × 0.1 с = 2 м > 0.5 м до destination
        app.world_mut().get_mut::<NavAgent>(entity).expect("agent").velocity = Vec3::NEG_Z * 20.0;
        app.update();

        let transform = app.world().get::<Transform>(entity).expect("transform");
        assert!((transform.translation - Vec3::new(0.0, 0.0, -0.5)).length() < 1e-4);
    }
}
