//! ECS Components навигации NPC
//!
//! Организация по доменам:
//! - path: waypoint sequence и её источник (Waypoints, PathSource, FollowPath)
//! - agent: контракт navigation agent'а (NavAgent)
//! - controller: параметры контроллера (NpcControllerConfig, MovementMode)
//! - rig: look-at rig и animation параметр (LookAtRig, LookTarget, LocomotionAnimation)

pub mod agent;
pub mod controller;
pub mod path;
pub mod rig;

// Re-exports для удобного импорта
pub use agent::*;
pub use controller::*;
pub use path::*;
pub use rig::*;
