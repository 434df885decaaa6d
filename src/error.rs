use thiserror::Error;

/// Errors raised by a review session while moving the playback cursor
#[derive(Debug, Error, PartialEq)]
pub enum ReviewError {
    /// A path must contain at least one marker
    #[error("path has no markers")]
    EmptyPath,

    /// The path does not point at a node of the game tree
    #[error("no node at path {path}: {reason}")]
    PathNotFound { path: String, reason: String },

    /// The recorded game could not be read
    #[error("invalid game data: {0}")]
    Input(String),
}

pub type ReviewResult<T> = Result<T, ReviewError>;
