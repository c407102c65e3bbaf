//! Error types
//!
//! Configuration errors are returned to the caller at wager time.
//! Storage errors never reach gameplay: callers log them and fall back to
//! defaults.

/// Rejected battle configuration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Battle needs at least one entity")]
    NoEntities,
    #[error("Battle needs at least two species")]
    SingleSpecies,
    #[error("Speed must be a positive finite number, got {0}")]
    InvalidSpeed(f32),
    #[error("Arena size {arena} is too small for entity size {entity}")]
    ArenaTooSmall { arena: f32, entity: f32 },
    #[error("A battle is already in progress")]
    BattleInProgress,
    #[error("Unknown species '{0}'")]
    UnknownSpecies(String),
}

/// Persistent storage failure
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage backend unavailable")]
    Unavailable,
    #[error("Storage backend error: {0}")]
    Backend(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
