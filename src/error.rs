//! Error taxonomy for the coaching engine.
//!
//! The rule logic itself never fails; these errors only surface at the
//! boundaries (config files, collaborators, practice-session misuse).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("config I/O error at {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config serialization error: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    #[error("knowledge provider error: {0}")]
    Knowledge(String),

    #[error("model backend error: {0}")]
    Model(String),

    #[error("practice session is not active")]
    SessionInactive,

    #[error("reply text is blank")]
    BlankReply,

    #[error("a practice reply is already in flight")]
    RequestInFlight,
}

pub type Result<T> = std::result::Result<T, CoachError>;

