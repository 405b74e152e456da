//! Engine error types
//!
//! Input handling never fails; these cover API misuse only.

use scrollsync_platform::Axis;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScrollError {
    /// The container has no scrollbar on this axis
    #[error("No scrollbar on axis {0}")]
    AxisNotActive(Axis),

    /// No live container manages this surface
    #[error("Surface is not registered")]
    UnknownSurface,

    /// The container handle is stale
    #[error("Unknown container")]
    UnknownContainer,

    /// The container was torn down
    #[error("Container has been cleared")]
    Cleared,

    #[error("Invalid event kind: {0}")]
    InvalidEventKind(String),
}

pub type Result<T> = std::result::Result<T, ScrollError>;
