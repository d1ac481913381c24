//! NPC controller конфиг: режим движения, скорости, look-at, path logic

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::follower::PathFollower;

/// Кто управляет поворотом тела
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum MovementMode {
    /// Агент сам поворачивает тело, скорость фиксированная
    Direct,
    /// Контроллер сам slerp'ит heading и режет скорость на поворотах
    #[default]
    Smoothed,
}

/// Параметры NPC контроллера
///
/// `#[serde(default)]`: в data-файле можно указать только нужные поля.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[require(PathFollower, Transform)]
#[serde(default)]
pub struct NpcControllerConfig {
    pub movement_mode: MovementMode,
    /// Скорость ходьбы (м/с)
    pub speed: f32,
    /// Smoothed: коэффициент slerp heading'а (в секунду)
    pub turn_speed: f32,
    /// Smoothed: множитель скорости при развороте ≥ 120°, диапазон [0.1, 1]
    pub min_turn_speed_multiplier: f32,
    /// Время сглаживания look-at точки (секунды)
    pub look_smooth_time: f32,
    /// Высота look-at точки над waypoint'ом
    pub look_height_offset: f32,
    /// После последней точки вернуться к нулевой
    pub loop_path: bool,
    /// Дистанция, на которой waypoint считается достигнутым
    pub reach_distance: f32,
    /// Стартовать автоматически после активации
    pub start_on_awake: bool,
    /// Задержка автостарта (секунды)
    pub start_delay: f32,
    /// Time constant демпфирования animation параметра Speed
    pub anim_damp_time: f32,
}

impl Default for NpcControllerConfig {
    fn default() -> Self {
        Self {
            movement_mode: MovementMode::Smoothed,
            speed: 1.6,
            turn_speed: 2.0,
            min_turn_speed_multiplier: 0.2,
            look_smooth_time: 0.5,
            look_height_offset: 1.6,
            loop_path: true,
            reach_distance: 0.2,
            start_on_awake: true,
            start_delay: 1.0,
            anim_damp_time: 0.1,
        }
    }
}

impl NpcControllerConfig {
    pub const MIN_TURN_MULTIPLIER_RANGE: (f32, f32) = (0.1, 1.0);

    /// Клампит значения вне допустимых диапазонов
    ///
    /// Возвращает исправленный конфиг и список исправленных полей (для warning).
    pub fn sanitized(&self) -> (Self, Vec<&'static str>) {
        let mut config = self.clone();
        let mut fixed = Vec::new();

        let (lo, hi) = Self::MIN_TURN_MULTIPLIER_RANGE;
        if !(lo..=hi).contains(&config.min_turn_speed_multiplier) {
            config.min_turn_speed_multiplier = if config.min_turn_speed_multiplier.is_nan() {
                lo
            } else {
                config.min_turn_speed_multiplier.clamp(lo, hi)
            };
            fixed.push("min_turn_speed_multiplier");
        }

        for (value, name) in [
            (&mut config.speed, "speed"),
            (&mut config.turn_speed, "turn_speed"),
            (&mut config.look_smooth_time, "look_smooth_time"),
            (&mut config.reach_distance, "reach_distance"),
            (&mut config.start_delay, "start_delay"),
            (&mut config.anim_damp_time, "anim_damp_time"),
        ] {
            if *value < 0.0 || !value.is_finite() {
                *value = 0.0;
                fixed.push(name);
            }
        }

        (config, fixed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = NpcControllerConfig::default();
        assert_eq!(config.movement_mode, MovementMode::Smoothed);
        assert_eq!(config.speed, 1.6);
        assert_eq!(config.reach_distance, 0.2);
        assert!(config.loop_path);
        assert!(config.start_on_awake);
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config: NpcControllerConfig =
            serde_json::from_str(r#"{ "movement_mode": "Direct", "loop_path": false }"#).expect("valid config json");

        assert_eq!(config.movement_mode, MovementMode::Direct);
        assert!(!config.loop_path);
        assert_eq!(config.turn_speed, 2.0);
        assert_eq!(config.start_delay, 1.0);
    }

    #[test]
    fn test_sanitized_clamps_out_of_range() {
        let config = NpcControllerConfig {
            min_turn_speed_multiplier: 1.5,
            speed: -1.0,
            ..default()
        };

        let (fixed, fields) = config.sanitized();
        assert_eq!(fixed.min_turn_speed_multiplier, 1.0);
        assert_eq!(fixed.speed, 0.0);
        assert_eq!(fields, vec!["min_turn_speed_multiplier", "speed"]);

        let (_, untouched) = NpcControllerConfig::default().sanitized();
        assert!(untouched.is_empty());
    }
}
