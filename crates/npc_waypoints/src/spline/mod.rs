//! Spline track: Catmull-Rom через knot'ы path entity
//!
//! - Knot'ы хранятся в local space path entity, track работает в world space
//! - Параметризация по длине (arc-length table): "равномерно" значит равные метры
//! - Nearest point: грубый поиск по table + уточнение тернарным поиском

use bevy::prelude::*;
use bevy_math::cubic_splines::{CubicCardinalSpline, CubicCurve, CubicGenerator, CyclicCubicGenerator};

use crate::error::PathError;

/// Сэмплов arc-length table на сегмент
const SAMPLES_PER_SEGMENT: usize = 32;

/// Итераций уточнения nearest point
const NEAREST_REFINE_ITERATIONS: usize = 24;

/// Сплайн path entity (knots в local space entity)
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct PathSpline {
    pub knots: Vec<Vec3>,
    /// Замкнутый контур (последний knot соединён с первым)
    pub closed: bool,
}

impl PathSpline {
    pub fn new(knots: Vec<Vec3>, closed: bool) -> Self {
        Self { knots, closed }
    }
}

/// World-space track поверх PathSpline с arc-length параметризацией
#[derive(Debug, Clone)]
pub struct SplineTrack {
    curve: CubicCurve<Vec3>,
    closed: bool,
    to_world: GlobalTransform,
    knots: Vec<Vec3>,
    /// (curve param, накопленная world длина), монотонно по обоим
    table: Vec<(f32, f32)>,
}

impl SplineTrack {
    pub fn build(spline: &PathSpline, to_world: &GlobalTransform) -> Result<Self, PathError> {
        if spline.knots.len() < 2 {
            return Err(PathError::InsufficientKnots(spline.knots.len()));
        }

        let generator = CubicCardinalSpline::new_catmull_rom(spline.knots.iter().copied());
        let curve = if spline.closed {
            generator.to_curve_cyclic()
        } else {
            generator.to_curve()
        }
        .map_err(|_| PathError::InsufficientKnots(spline.knots.len()))?;

        let knots = spline.knots.iter().map(|k| to_world.transform_point(*k)).collect();

        let mut track = Self {
            curve,
            closed: spline.closed,
            to_world: *to_world,
            knots,
            table: Vec::new(),
        };
        track.table = track.build_length_table();
        Ok(track)
    }

    fn build_length_table(&self) -> Vec<(f32, f32)> {
        let max_param = self.max_param();
        let samples = (self.segment_count() * SAMPLES_PER_SEGMENT).max(1);

        let mut table = Vec::with_capacity(samples + 1);
        let mut previous = self.position_at_param(0.0);
        let mut total = 0.0;
        table.push((0.0, 0.0));

        for i in 1..=samples {
            let param = max_param * i as f32 / samples as f32;
            let position = self.position_at_param(param);
            total += position.distance(previous);
            table.push((param, total));
            previous = position;
        }

        table
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn segment_count(&self) -> usize {
        self.curve.segments().len()
    }

    fn max_param(&self) -> f32 {
        self.segment_count() as f32
    }

    /// World позиция knot'а (out of range → Vec3::ZERO)
    pub fn knot_position(&self, index: usize) -> Vec3 {
        self.knots.get(index).copied().unwrap_or(Vec3::ZERO)
    }

    pub fn knots(&self) -> &[Vec3] {
        &self.knots
    }

    /// Длина track'а в world метрах (по arc-length table)
    pub fn length(&self) -> f32 {
        self.table.last().map(|(_, length)| *length).unwrap_or(0.0)
    }

    pub fn position_at_param(&self, param: f32) -> Vec3 {
        let param = param.clamp(0.0, self.max_param());
        self.to_world.transform_point(self.curve.position(param))
    }

    pub fn tangent_at_param(&self, param: f32) -> Vec3 {
        let param = param.clamp(0.0, self.max_param());
        self.to_world.affine().transform_vector3(self.curve.velocity(param))
    }

    /// Доля длины [0, 1] → curve param
    pub fn param_at_ratio(&self, ratio: f32) -> f32 {
        let ratio = ratio.clamp(0.0, 1.0);
        let length = self.length();
        if length <= f32::EPSILON {
            return ratio * self.max_param();
        }

        let target = ratio * length;
        let upper = self
            .table
            .partition_point(|(_, cumulative)| *cumulative < target)
            .min(self.table.len() - 1);
        if upper == 0 {
            return 0.0;
        }

        let (param_a, len_a) = self.table[upper - 1];
        let (param_b, len_b) = self.table[upper];
        let span = len_b - len_a;
        if span <= f32::EPSILON {
            return param_b;
        }
        param_a + (param_b - param_a) * ((target - len_a) / span)
    }

    pub fn position_at_ratio(&self, ratio: f32) -> Vec3 {
        self.position_at_param(self.param_at_ratio(ratio))
    }

    /// Curve param ближайшей к `point` точки track'а
    ///
    /// Table уже посчитана при build: стоимость O(table) на точку без повторных сборок.
    pub fn nearest_param(&self, point: Vec3) -> f32 {
        let Some((best_index, _)) = self
            .table
            .iter()
            .enumerate()
            .map(|(i, (param, _))| (i, self.position_at_param(*param).distance_squared(point)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
        else {
            return 0.0;
        };

        let mut lo = self.table[best_index.saturating_sub(1)].0;
        let mut hi = self.table[(best_index + 1).min(self.table.len() - 1)].0;

        for _ in 0..NEAREST_REFINE_ITERATIONS {
            let m1 = lo + (hi - lo) / 3.0;
            let m2 = hi - (hi - lo) / 3.0;
            if self.position_at_param(m1).distance_squared(point) < self.position_at_param(m2).distance_squared(point) {
                hi = m2;
            } else {
                lo = m1;
            }
        }

        (lo + hi) * 0.5
    }

    /// Касательная в ближайшей к `point` точке
    pub fn nearest_tangent(&self, point: Vec3) -> Vec3 {
        self.tangent_at_param(self.nearest_param(point))
    }

    /// Доля длины для i-й из `count` равномерных точек
    ///
    /// Closed: i / count (последняя не дублирует первую). Open: i / (count - 1).
    pub fn even_ratio(&self, index: usize, count: usize) -> f32 {
        if self.closed {
            index as f32 / count.max(1) as f32
        } else if count <= 1 {
            0.0
        } else {
            index as f32 / (count - 1) as f32
        }
    }

    /// `count` точек равномерно по длине
    pub fn even_points(&self, count: usize) -> Vec<Vec3> {
        (0..count)
            .map(|i| self.position_at_ratio(self.even_ratio(i, count)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    fn straight_track(closed: bool) -> SplineTrack {
        let spline = PathSpline::new(
            vec![Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0)],
            closed,
        );
        SplineTrack::build(&spline, &GlobalTransform::IDENTITY).expect("valid spline")
    }

    #[test]
    fn test_requires_two_knots() {
        let spline = PathSpline::new(vec![Vec3::ZERO], false);
        assert_eq!(
            SplineTrack::build(&spline, &GlobalTransform::IDENTITY).err(),
            Some(PathError::InsufficientKnots(1))
        );
    }

    #[test]
    fn test_straight_open_track_length_and_endpoints() {
        let track = straight_track(false);

        assert_eq!(track.segment_count(), 2);
        assert!((track.length() - 10.0).abs() < 0.05);
        assert!((track.position_at_ratio(0.0) - Vec3::ZERO).length() < EPS);
        assert!((track.position_at_ratio(1.0) - Vec3::new(10.0, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_track_passes_through_knots() {
        let track = straight_track(false);
        assert!((track.position_at_param(1.0) - Vec3::new(5.0, 0.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_world_transform_applied() {
        let spline = PathSpline::new(vec![Vec3::ZERO, Vec3::X], false);
        let to_world = GlobalTransform::from(Transform::from_xyz(0.0, 2.0, 0.0));
        let track = SplineTrack::build(&spline, &to_world).expect("valid spline");

        assert_eq!(track.knot_position(1), Vec3::new(1.0, 2.0, 0.0));
        assert!((track.position_at_ratio(0.0).y - 2.0).abs() < EPS);
        assert_eq!(track.knot_position(5), Vec3::ZERO);
    }

    #[test]
    fn test_even_ratio_open_and_closed() {
        let open = straight_track(false);
        assert_eq!(open.even_ratio(0, 5), 0.0);
        assert_eq!(open.even_ratio(4, 5), 1.0);
        assert_eq!(open.even_ratio(0, 1), 0.0);

        let closed = straight_track(true);
        assert_eq!(closed.even_ratio(4, 5), 0.8);
    }

    #[test]
    fn test_nearest_param_on_straight_track() {
        let track = straight_track(false);
        let param = track.nearest_param(Vec3::new(7.5, 3.0, 0.0));
        let nearest = track.position_at_param(param);

        assert!((nearest.x - 7.5).abs() < 0.05);
        assert!(track.nearest_tangent(Vec3::new(7.5, 3.0, 0.0)).x > 0.0);
    }
}
