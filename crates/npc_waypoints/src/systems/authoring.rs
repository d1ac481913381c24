//! Authoring systems: PathAuthoringRequest → children path entity, polyline preview.

use bevy::prelude::*;

use crate::authoring::{
    distribute_evenly, generate_even_points, generate_knot_points, path_forward_rotation, preview_polyline,
    GeneratedPoint, PathPolyline, PathPreview,
};
use crate::events::PathAuthoringRequest;
use crate::logger::{log_info, log_warning};
use crate::spline::{PathSpline, SplineTrack};

/// Заменить children path entity на сгенерированные точки
///
/// World → local через GlobalTransform родителя (points остаются на своих world местах).
fn replace_children(
    commands: &mut Commands,
    path: Entity,
    path_global: &GlobalTransform,
    existing: Option<&Children>,
    points: Vec<GeneratedPoint>,
) {
    if let Some(children) = existing {
        let old: &[Entity] = children;
        for child in old {
            commands.entity(*child).despawn();
        }
    }

    commands.entity(path).with_children(|parent| {
        for point in points {
            let world = GlobalTransform::from(Transform::from_translation(point.position).with_rotation(point.rotation));
            parent.spawn((Name::new(point.name), world.reparented_to(path_global)));
        }
    });
}

/// Система: обработка authoring запросов
///
/// Нет PathSpline / сплайн невалиден / мало children → warning, no-op.
pub fn apply_path_authoring(
    mut commands: Commands,
    mut requests: EventReader<PathAuthoringRequest>,
    paths: Query<(&PathSpline, &GlobalTransform, Option<&Children>)>,
    mut point_transforms: Query<&mut Transform, Without<PathSpline>>,
) {
    for request in requests.read() {
        let path = match *request {
            PathAuthoringRequest::GeneratePoints { path, .. }
            | PathAuthoringRequest::GenerateFromKnots { path }
            | PathAuthoringRequest::DistributeEvenly { path }
            | PathAuthoringRequest::AlignRotation { path } => path,
        };

        let Ok((spline, path_global, children)) = paths.get(path) else {
            log_warning(&format!("Authoring {:?}: path entity has no PathSpline", path));
            continue;
        };

        // Одна сборка track'а (и arc-length table) на запрос, не на child
        let track = match SplineTrack::build(spline, path_global) {
            Ok(track) => track,
            Err(err) => {
                log_warning(&format!("Authoring {:?}: {}", path, err));
                continue;
            }
        };

        let child_entities: &[Entity] = match children {
            Some(children) => &**children,
            None => &[],
        };

        match *request {
            PathAuthoringRequest::GeneratePoints { count, .. } => {
                let points = generate_even_points(&track, count);
                log_info(&format!("Authoring {:?}: generated {} points along spline", path, points.len()));
                replace_children(&mut commands, path, path_global, children, points);
            }

            PathAuthoringRequest::GenerateFromKnots { .. } => {
                let points = generate_knot_points(&track);
                log_info(&format!("Authoring {:?}: generated {} points on knots", path, points.len()));
                replace_children(&mut commands, path, path_global, children, points);
            }

            PathAuthoringRequest::DistributeEvenly { .. } => {
                let Some(positions) = distribute_evenly(&track, child_entities.len()) else {
                    log_warning(&format!("Authoring {:?}: need at least 2 children to distribute", path));
                    continue;
                };

                let to_local = path_global.affine().inverse();
                for (child, world) in child_entities.iter().zip(positions) {
                    if let Ok(mut transform) = point_transforms.get_mut(*child) {
                        transform.translation = to_local.transform_point3(world);
                    }
                }
            }

            PathAuthoringRequest::AlignRotation { .. } => {
                let parent_rotation = path_global.compute_transform().rotation;
                for child in child_entities {
                    let Ok(mut transform) = point_transforms.get_mut(*child) else {
                        continue;
                    };
                    let world_position = path_global.transform_point(transform.translation);
                    if let Some(world_rotation) = path_forward_rotation(&track, world_position) {
                        transform.rotation = parent_rotation.inverse() * world_rotation;
                    }
                }
            }
        }
    }
}

/// Система: пересчёт PathPolyline при изменении сплайна, настроек или transform'а
pub fn update_path_polylines(
    mut paths: Query<(Entity, Ref<PathSpline>, Ref<PathPreview>, Ref<GlobalTransform>, &mut PathPolyline)>,
) {
    for (entity, spline, preview, global, mut polyline) in paths.iter_mut() {
        if !(spline.is_changed() || preview.is_changed() || global.is_changed()) {
            continue;
        }

        match SplineTrack::build(&spline, &global) {
            Ok(track) => *polyline = preview_polyline(&track, &preview),
            Err(err) => {
                log_warning(&format!("Preview {:?}: {}", entity, err));
                polyline.points.clear();
            }
        }
    }
}
