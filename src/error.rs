use thiserror::Error;

use crate::sim::EntityId;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced at the edges of the simulation (config, insertion, lookups).
///
/// The tick itself never fails: missing handlers are no-ops and stale
/// collision handles are skipped.
#[derive(Debug, Error)]
pub enum Error {
    /// A settings value is out of range or inconsistent with another one.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// An entity handed to `spawn` breaks a physical invariant.
    #[error("invalid entity: {0}")]
    InvalidEntity(String),

    /// The handle does not refer to a live entity.
    #[error("unknown entity {0:?}")]
    UnknownEntity(EntityId),

    /// A wall-only operation was used on another kind.
    #[error("entity {0:?} is not a wall")]
    NotAWall(EntityId),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::InvalidSettings("atom_density must be > 0".to_string());
        let msg = format!("{e}");
        assert!(msg.contains("invalid settings"));
        assert!(msg.contains("atom_density"));
    }
}
