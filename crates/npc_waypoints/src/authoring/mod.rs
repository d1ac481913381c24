//! Path authoring: генерация и выравнивание waypoint children по сплайну,
//! polyline preview для debug отрисовки (сама отрисовка: не здесь).
//!
//! Чистые функции над SplineTrack; ECS обвязка в `systems::authoring`.

use bevy::prelude::*;

use crate::spline::SplineTrack;
use crate::steering::look_rotation;

/// Диапазон resolution (сэмплов на метр) для smooth preview
pub const PREVIEW_RESOLUTION_RANGE: (f32, f32) = (1.0, 20.0);

/// Waypoint child, созданный authoring tools
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPoint {
    pub name: String,
    pub position: Vec3,
    pub rotation: Quat,
}

/// Rotation "вперёд по path" в ближайшей к `position` точке track'а
///
/// Нулевая касательная → None (rotation оставляем как есть).
pub fn path_forward_rotation(track: &SplineTrack, position: Vec3) -> Option<Quat> {
    let tangent = track.nearest_tangent(position);
    if tangent.length_squared() <= f32::EPSILON {
        return None;
    }
    Some(look_rotation(tangent))
}

/// `count` точек равномерно по длине, уже выровненных по касательной
pub fn generate_even_points(track: &SplineTrack, count: usize) -> Vec<GeneratedPoint> {
    track
        .even_points(count)
        .into_iter()
        .enumerate()
        .map(|(i, position)| GeneratedPoint {
            name: format!("Point_{i}"),
            position,
            rotation: path_forward_rotation(track, position).unwrap_or(Quat::IDENTITY),
        })
        .collect()
}

/// По точке на каждый knot, выровненных по касательной
pub fn generate_knot_points(track: &SplineTrack) -> Vec<GeneratedPoint> {
    track
        .knots()
        .iter()
        .enumerate()
        .map(|(i, &position)| GeneratedPoint {
            name: format!("Point_Knot_{i}"),
            position,
            rotation: path_forward_rotation(track, position).unwrap_or(Quat::IDENTITY),
        })
        .collect()
}

/// Новые world позиции для `count` существующих children (нужно ≥ 2)
pub fn distribute_evenly(track: &SplineTrack, count: usize) -> Option<Vec<Vec3>> {
    if count < 2 {
        return None;
    }
    Some(track.even_points(count))
}

/// Настройки polyline preview
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
#[require(PathPolyline)]
pub struct PathPreview {
    /// true = сглаженная кривая, false = прямые между knot'ами
    pub smooth: bool,
    /// Сэмплов на метр (только smooth), клампится в [1, 20]
    pub resolution: f32,
    /// Подъём линии над землёй
    pub ground_offset: f32,
}

impl Default for PathPreview {
    fn default() -> Self {
        Self {
            smooth: true,
            resolution: 5.0,
            ground_offset: 0.1,
        }
    }
}

/// Посчитанная polyline (читается debug renderer'ом)
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PathPolyline {
    pub points: Vec<Vec3>,
    /// Renderer замыкает линию
    pub closed: bool,
}

/// Polyline preview по track'у
pub fn preview_polyline(track: &SplineTrack, preview: &PathPreview) -> PathPolyline {
    let lift = Vec3::Y * preview.ground_offset;

    let points = if preview.smooth {
        let (lo, hi) = PREVIEW_RESOLUTION_RANGE;
        let resolution = preview.resolution.clamp(lo, hi);
        let steps = ((track.length() * resolution).ceil() as usize).max(2);

        (0..steps)
            .map(|i| {
                let ratio = if track.is_closed() {
                    i as f32 / steps as f32
                } else {
                    i as f32 / (steps - 1) as f32
                };
                track.position_at_ratio(ratio) + lift
            })
            .collect()
    } else {
        track.knots().iter().map(|k| *k + lift).collect()
    };

    PathPolyline {
        points,
        closed: track.is_closed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spline::PathSpline;

    const EPS: f32 = 1e-3;

    fn track(knots: Vec<Vec3>, closed: bool) -> SplineTrack {
        SplineTrack::build(&PathSpline::new(knots, closed), &GlobalTransform::IDENTITY).expect("valid spline")
    }

    #[test]
    fn test_generate_even_points_open() {
        let track = track(vec![Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0)], false);
        let points = generate_even_points(&track, 5);

        assert_eq!(points.len(), 5);
        assert_eq!(points[0].name, "Point_0");
        assert!((points[4].position - Vec3::new(0.0, 0.0, -10.0)).length() < 0.01);
        assert!((points[2].position - Vec3::new(0.0, 0.0, -5.0)).length() < 0.05);

        // Path идёт в -Z = Bevy forward → rotation ≈ identity
        let forward = points[2].rotation * Vec3::NEG_Z;
        assert!((forward - Vec3::NEG_Z).length() < EPS);
    }

    #[test]
    fn test_generate_knot_points() {
        let knots = vec![Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 4.0)];
        let track = track(knots.clone(), false);
        let points = generate_knot_points(&track);

        assert_eq!(points.len(), 3);
        assert_eq!(points[2].name, "Point_Knot_2");
        for (point, knot) in points.iter().zip(&knots) {
            assert_eq!(point.position, *knot);
        }
    }

    #[test]
    fn test_distribute_requires_two_children() {
        let track = track(vec![Vec3::ZERO, Vec3::X * 3.0], false);
        assert!(distribute_evenly(&track, 1).is_none());
        assert_eq!(distribute_evenly(&track, 4).map(|p| p.len()), Some(4));
    }

    #[test]
    fn test_align_faces_tangent() {
        let track = track(vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)], false);
        let rotation = path_forward_rotation(&track, Vec3::new(3.0, 0.0, 1.0)).expect("non-zero tangent");

        let forward = rotation * Vec3::NEG_Z;
        assert!((forward - Vec3::X).length() < EPS);
    }

    #[test]
    fn test_preview_sample_count() {
        let track = track(vec![Vec3::ZERO, Vec3::new(2.1, 0.0, 0.0)], false);

        let smooth = preview_polyline(&track, &PathPreview::default());
        // ceil(2.1m * 5) = 11
        assert_eq!(smooth.points.len(), 11);
        assert!((smooth.points[0].y - 0.1).abs() < EPS);

        let knots = preview_polyline(
            &track,
            &PathPreview {
                smooth: false,
                ..default()
            },
        );
        assert_eq!(knots.points.len(), 2);
        assert!(!knots.closed);
    }

    #[test]
    fn test_preview_has_at_least_two_points() {
        let track = track(vec![Vec3::ZERO, Vec3::new(0.01, 0.0, 0.0)], false);
        let polyline = preview_polyline(
            &track,
            &PathPreview {
                resolution: 1.0,
                ..default()
            },
        );
        assert_eq!(polyline.points.len(), 2);
    }
}
