use thiserror::Error;

use crate::handle::HandleId;

/// Result type for inspector operations
pub type Result<T> = std::result::Result<T, InspectError>;

/// Errors reported to the caller. All of them are recoverable: the operation
/// that raised one left the scene untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InspectError {
    /// Operation needs a bound mesh (or other precondition) that is missing
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("mesh handle is not registered with the geometry engine")]
    UnknownMesh,

    #[error("interactive handle {0:?} is not registered")]
    UnknownHandle(HandleId),

    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
}
