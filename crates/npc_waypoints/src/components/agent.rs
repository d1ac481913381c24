//! Navigation agent contract (engine NavMesh agent ↔ ECS)
//!
//! Архитектура:
//! - Контроллер пишет destination / velocity / параметры агента
//! - Engine side (Godot/Unity bridge или HeadlessNavigationPlugin) резолвит путь
//!   и пишет телеметрию: remaining_distance, path_pending, steering_target
//! - Pathfinding целиком на стороне engine

use bevy::prelude::*;

/// Steering agent на navigation mesh
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct NavAgent {
    /// Текущая цель (None = пути нет)
    pub destination: Option<Vec3>,
    /// Оставшаяся дистанция до destination (телеметрия)
    pub remaining_distance: f32,
    /// Path request отправлен, но ещё не посчитан (телеметрия)
    pub path_pending: bool,
    /// Ближайший угол пути, к которому агент рулит сейчас (телеметрия)
    pub steering_target: Vec3,
    /// Текущая скорость. Settable: Smoothed режим пишет её каждый кадр
    pub velocity: Vec3,
    /// true → агент сам поворачивает тело по направлению движения
    pub update_rotation: bool,
    /// Максимальная скорость (м/с)
    pub speed: f32,
    /// Ускорение (м/с²)
    pub acceleration: f32,
    /// Скорость поворота (градусы/с), используется при update_rotation
    pub angular_speed: f32,
    /// Дистанция, на которой агент считает цель достигнутой
    pub stopping_distance: f32,
    /// Тормозить ли перед destination
    pub auto_braking: bool,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            destination: None,
            remaining_distance: 0.0,
            path_pending: false,
            steering_target: Vec3::ZERO,
            velocity: Vec3::ZERO,
            update_rotation: true,
            speed: 3.5,
            acceleration: 8.0,
            angular_speed: 120.0,
            stopping_distance: 0.0,
            auto_braking: true,
        }
    }
}

impl NavAgent {
    /// Запросить путь к точке. Телеметрия валидна после резолва (path_pending = false)
    pub fn set_destination(&mut self, target: Vec3) {
        self.destination = Some(target);
        self.path_pending = true;
    }

    /// Сбросить путь (StopPath)
    pub fn reset_path(&mut self) {
        self.destination = None;
        self.path_pending = false;
        self.remaining_distance = 0.0;
        self.velocity = Vec3::ZERO;
    }

    /// Путь посчитан и активен
    pub fn has_path(&self) -> bool {
        self.destination.is_some() && !self.path_pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_is_pending_until_resolved() {
        let mut agent = NavAgent::default();
        assert!(!agent.has_path());

        agent.set_destination(Vec3::new(1.0, 0.0, 2.0));
        assert!(agent.path_pending);
        assert!(!agent.has_path());

        agent.path_pending = false;
        assert!(agent.has_path());
    }

    #[test]
    fn test_reset_path_clears_destination() {
        let mut agent = NavAgent::default();
        agent.set_destination(Vec3::X);
        agent.velocity = Vec3::X;

        agent.reset_path();
        assert_eq!(agent.destination, None);
        assert!(!agent.path_pending);
        assert_eq!(agent.velocity, Vec3::ZERO);
    }
}
