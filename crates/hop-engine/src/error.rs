use thiserror::Error;

use crate::api::types::EntityId;

/// Errors raised while loading configuration or addressing objects by id.
///
/// The simulation step itself never fails; see `StepOutcome`.
#[derive(Debug, Error)]
pub enum HopError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no object or anchor with id {0:?}")]
    UnknownEntity(EntityId),

    #[error("object {0:?} is not carryable")]
    NotCarryable(EntityId),
}

pub type Result<T> = std::result::Result<T, HopError>;
