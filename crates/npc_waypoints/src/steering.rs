//! Steering math: heading, скорость на поворотах, look-at smoothing, animation damping
//!
//! Чистые функции без ECS: системы в `systems::*` только подают данные.

use bevy::prelude::*;

/// Угол разворота, при котором скорость падает до минимального множителя
pub const FULL_SLOWDOWN_ANGLE_DEG: f32 = 120.0;

/// Idle look-at: дистанция точки впереди персонажа
pub const IDLE_LOOK_DISTANCE: f32 = 3.0;

/// Начальная look-at точка при активации
pub const INITIAL_LOOK_DISTANCE: f32 = 1.0;

/// Множитель скорости по углу между facing и направлением на steering target
///
/// 0° → 1.0, ≥ 120° → `min_multiplier`, между: линейно.
pub fn turn_speed_multiplier(angle_deg: f32, min_multiplier: f32) -> f32 {
    let turn_factor = 1.0 - (angle_deg / FULL_SLOWDOWN_ANGLE_DEG).clamp(0.0, 1.0);
    min_multiplier + (1.0 - min_multiplier) * turn_factor
}

/// Направление from → to в горизонтальной плоскости (None если вырождено)
pub fn horizontal_direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    let mut direction = to - from;
    direction.y = 0.0;
    direction.try_normalize()
}

/// Rotation "смотреть по direction" (Bevy forward = -Z, up = Y)
pub fn look_rotation(direction: Vec3) -> Quat {
    Transform::IDENTITY.looking_to(direction, Vec3::Y).rotation
}

/// Результат одного Smoothed тика heading'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadingStep {
    pub rotation: Quat,
    /// Угол (градусы) между facing ДО поворота и направлением на target
    pub angle_deg: f32,
}

/// Slerp heading к steering target со скоростью `turn_speed * delta`
///
/// Вырожденное направление (target под ногами) → rotation без изменений, угол 0.
pub fn smoothed_heading(
    rotation: Quat,
    position: Vec3,
    steering_target: Vec3,
    turn_speed: f32,
    delta: f32,
) -> HeadingStep {
    let Some(direction) = horizontal_direction(position, steering_target) else {
        return HeadingStep {
            rotation,
            angle_deg: 0.0,
        };
    };

    let forward = rotation * Vec3::NEG_Z;
    let angle_deg = forward.angle_between(direction).to_degrees();
    let t = (turn_speed * delta).clamp(0.0, 1.0);

    HeadingStep {
        rotation: rotation.slerp(look_rotation(direction), t),
        angle_deg,
    }
}

/// Critically damped smooth damp (Game Programming Gems 4, 1.10)
///
/// `velocity` хранится между кадрами вызывающим. Без overshoot'а за target.
pub fn smooth_damp(current: Vec3, target: Vec3, velocity: &mut Vec3, smooth_time: f32, delta: f32) -> Vec3 {
    if delta <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;
    let x = omega * delta;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + change * omega) * delta;
    *velocity = (*velocity - temp * omega) * exp;
    let mut output = target + (change + temp) * exp;

    // Overshoot: прошли target → встаём ровно в него
    if (target - current).dot(output - target) > 0.0 {
        output = target;
        *velocity = (output - target) / delta;
    }

    output
}

/// Экспоненциальное демпфирование скаляра к target
///
/// `damp_time` ≤ 0 → мгновенно.
pub fn damp_towards(current: f32, target: f32, damp_time: f32, delta: f32) -> f32 {
    if damp_time <= 0.0 {
        return target;
    }
    let blend = 1.0 - (-delta / damp_time).exp();
    current + (target - current) * blend
}

/// Поворот rotation к target не больше чем на `max_radians`
pub fn rotate_towards(rotation: Quat, target: Quat, max_radians: f32) -> Quat {
    let angle = rotation.angle_between(target);
    if angle <= max_radians || angle <= f32::EPSILON {
        return target;
    }
    rotation.slerp(target, max_radians / angle)
}

/// Сдвиг вектора к target не больше чем на `max_delta`
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let diff = target - current;
    let distance = diff.length();
    if distance <= max_delta || distance <= f32::EPSILON {
        return target;
    }
    current + diff / distance * max_delta
}
