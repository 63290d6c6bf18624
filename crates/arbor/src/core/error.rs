use std::result::Result as StdResult;

use thiserror::Error;

use crate::core::id::NodeId;

/// Result type for arbor operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("node not found: {0:?}")]
    /// A node id did not resolve to a live node.
    NodeNotFound(NodeId),
    #[error("invalid: {0}")]
    /// Invalid input error.
    Invalid(String),
    #[error("resource {key}: {reason}")]
    /// A texture or other external resource could not be resolved.
    Resource {
        /// Lookup key of the resource.
        key: String,
        /// Failure description.
        reason: String,
    },
    #[error("sprite sheet: {0}")]
    /// Malformed sprite sheet definition.
    SpriteSheet(#[from] serde_json::Error),
    #[error("config: {0}")]
    /// Configuration failure.
    Config(String),
    #[error("thread pool: {0}")]
    /// The worker pool could not be started.
    Pool(#[from] rayon::ThreadPoolBuildError),
}
