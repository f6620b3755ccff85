//! Error types for catalog retrieval and the engine surface.

use thiserror::Error;

/// Failure of a single page fetch. Never fatal: the engine logs it, keeps the
/// previous result set and waits for the next user-triggered fetch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Network error while querying item store: {0}")]
    Network(String),

    #[error("Item store responded with HTTP {status}: {url}")]
    Status { status: u16, url: String },

    #[error("Item store rate limit exceeded")]
    RateLimited,

    #[error("Failed to decode item store response: {0}")]
    Decode(String),

    #[error("Item store rejected the query: {0}")]
    Store(String),
}

impl FetchError {
    /// Whether a later identical request could plausibly succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::RateLimited => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Decode(_) | Self::Store(_) => false,
        }
    }
}

/// Errors surfaced by `CatalogHandle` operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Catalog engine has shut down")]
    Closed,

    #[error("Quantity must be greater than zero, got {0}")]
    InvalidQuantity(u32),

    #[error("Item {0} is not part of the loaded catalog")]
    ItemNotLoaded(String),

    #[error("Order has no lines")]
    EmptyOrder,

    #[error("No {0} collaborator configured")]
    CollaboratorMissing(&'static str),

    #[error("Collaborator call failed: {0}")]
    Collaborator(String),
}
