//! Waypoint source systems: PathSource → Waypoints

use bevy::prelude::*;

use crate::components::{PathSource, Waypoints};
use crate::logger::log_warning;
use crate::spline::{PathSpline, SplineTrack};

/// Система: пересборка Waypoints из источника
///
/// - ChildTransforms: каждый кадр (children могли подвинуть/добавить)
/// - Spline*: только когда изменился источник, сплайн или transform path entity
///
/// World позиция child = GlobalTransform path entity × local Transform child'а.
pub fn refresh_waypoints(
    mut paths: Query<(
        Entity,
        Ref<PathSource>,
        &mut Waypoints,
        Ref<GlobalTransform>,
        Option<&Children>,
        Option<Ref<PathSpline>>,
    )>,
    child_transforms: Query<&Transform>,
) {
    for (entity, source, mut waypoints, global, children, spline) in paths.iter_mut() {
        match *source {
            PathSource::ChildTransforms => {
                let child_entities: &[Entity] = match children {
                    Some(children) => &**children,
                    None => &[],
                };

                let points: Vec<Vec3> = child_entities
                    .iter()
                    .filter_map(|child| child_transforms.get(*child).ok())
                    .map(|local| global.mul_transform(*local).translation())
                    .collect();

                // Не трогаем компонент без нужды: иначе Changed<Waypoints> каждый кадр
                if waypoints.points != points {
                    waypoints.points = points;
                }
            }

            PathSource::SplineSamples { .. } | PathSource::SplineKnots => {
                let spline_changed = spline.as_ref().is_some_and(|s| s.is_changed());
                if !(source.is_changed() || global.is_changed() || spline_changed) {
                    continue;
                }

                let Some(spline) = spline else {
                    log_warning(&format!("Path {:?}: spline source without PathSpline", entity));
                    waypoints.points.clear();
                    continue;
                };

                match SplineTrack::build(&spline, &global) {
                    Ok(track) => {
                        waypoints.points = match *source {
                            PathSource::SplineSamples { count } => track.even_points(count),
                            _ => track.knots().to_vec(),
                        };
                    }
                    Err(err) => {
                        log_warning(&format!("Path {:?}: {}", entity, err));
                        waypoints.points.clear();
                    }
                }
            }
        }
    }
}
