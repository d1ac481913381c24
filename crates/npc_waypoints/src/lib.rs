//! NPC waypoint navigation
//!
//! ECS-плагин на Bevy 0.16: NPC идёт по последовательности waypoint'ов,
//! коммитя destination в navigation agent, сглаживая heading и look-at точку.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = решения (FSM следования, heading, скорость, look-at, animation параметр)
//! - Engine = navmesh pathfinding + движение тела (через NavAgent контракт)
//! - HeadlessNavigationPlugin заменяет engine в headless прогонах и тестах

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy::transform::TransformPlugin;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod agent;
pub mod authoring;
pub mod components;
pub mod error;
pub mod events;
pub mod follower;
pub mod logger;
pub mod spline;
pub mod steering;
pub mod systems;

// Re-export базовых типов для удобства
pub use agent::HeadlessNavigationPlugin;
pub use authoring::{PathPolyline, PathPreview};
pub use components::*;
pub use error::PathError;
pub use events::{PathAuthoringRequest, PathCommand, PathFollowEvent};
pub use follower::{Arrival, NpcState, PathFollower, SWITCH_DEBOUNCE_FRAMES};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use spline::{PathSpline, SplineTrack};

/// Частота headless кадров
pub const HEADLESS_FRAME_HZ: f64 = 60.0;

/// Порядок фаз внутри кадра
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaypointSet {
    /// Authoring запросы + polyline preview
    Authoring,
    /// PathSource → Waypoints
    Sources,
    /// NPC контроллер (commands → animation → steering → look-at → progress)
    Controller,
    /// Engine/headless агент двигает тела
    Agents,
}

/// Главный plugin навигации (без агента: его даёт engine bridge или HeadlessNavigationPlugin)
///
/// Порядок выполнения Controller фазы:
/// 1. initialize_npc_controllers: активация (агент, look-at, автостарт)
/// 2. handle_path_commands: Start/Stop + таймер автостарта
/// 3. update_locomotion_animation: animation Speed от realtime_speed
/// 4. steer_npc_agents: heading/скорость по MovementMode
/// 5. update_look_at_targets: look-at rig
/// 6. check_path_progress: arrival → advance, события, debounce
pub struct WaypointNavigationPlugin;

impl Plugin for WaypointNavigationPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Waypoints>()
            .register_type::<PathSource>()
            .register_type::<FollowPath>()
            .register_type::<NavAgent>()
            .register_type::<NpcControllerConfig>()
            .register_type::<PathFollower>()
            .register_type::<LookAtRig>()
            .register_type::<LookTarget>()
            .register_type::<LocomotionAnimation>()
            .register_type::<PathSpline>()
            .register_type::<PathPreview>()
            .register_type::<PathPolyline>();

        // Регистрация событий
        app.add_event::<PathFollowEvent>()
            .add_event::<PathCommand>()
            .add_event::<PathAuthoringRequest>();

        app.configure_sets(
            Update,
            (
                WaypointSet::Authoring,
                WaypointSet::Sources,
                WaypointSet::Controller,
                WaypointSet::Agents,
            )
                .chain(),
        );

        app.add_systems(
            Update,
            (systems::apply_path_authoring, systems::update_path_polylines)
                .chain()
                .in_set(WaypointSet::Authoring),
        )
        .add_systems(Update, systems::refresh_waypoints.in_set(WaypointSet::Sources))
        .add_systems(
            Update,
            (
                systems::initialize_npc_controllers,
                systems::handle_path_commands,
                systems::update_locomotion_animation,
                systems::steer_npc_agents,
                systems::update_look_at_targets,
                systems::check_path_progress,
            )
                .chain() // Последовательное выполнение: порядок update'а важен для событий
                .in_set(WaypointSet::Controller),
        );
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Единственный источник случайности headless прогонов (генерация патрульных path'ов).
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless прогонов
///
/// Время шагает фиксированно (1/60 с на update): прогоны детерминированы.
/// Плагины навигации не добавляются: вызывающий решает, нужен ли headless агент.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, TransformPlugin))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / HEADLESS_FRAME_HZ,
        )))
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Snapshot компонентов для сравнения детерминизма
///
/// Байты = (entity index, Debug-представление компонента) для каждой entity с `T`.
/// Два прогона с одним seed должны давать побайтно равные snapshot'ы
/// (позиции NPC, PathFollower состояние, children path'а).
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Формат не стабилен между версиями: годится только для сравнения в одном прогоне тестов
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // f32 через Debug печатается точно (shortest round-trip), расхождение в последнем бите видно
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
