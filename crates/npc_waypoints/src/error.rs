//! Rejection reasons для path операций.
//!
//! Жёстких ошибок нет: системы логируют PathError как warning и продолжают кадр.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// Waypoint sequence пустая: Idle → Walking запрещён
    #[error("waypoint sequence is empty")]
    EmptyPath,

    /// У NPC нет FollowPath (или path entity без Waypoints)
    #[error("no waypoint path assigned")]
    MissingPath,

    /// У NPC нет NavAgent
    #[error("no navigation agent attached")]
    MissingAgent,

    /// Catmull-Rom требует минимум 2 knot'а
    #[error("spline needs at least 2 knots, got {0}")]
    InsufficientKnots(usize),
}
