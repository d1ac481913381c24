//! ECS systems навигации NPC (per-frame, Update schedule)

pub mod authoring;
pub mod controller;
pub mod locomotion;
pub mod look_at;
pub mod sources;

// Re-export all systems
pub use authoring::*;
pub use controller::*;
pub use locomotion::*;
pub use look_at::*;
pub use sources::*;
