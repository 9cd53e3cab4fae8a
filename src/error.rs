// Error types for the uploader. Each boundary gets its own enum so callers
// can match on what went wrong; `main` folds them into `anyhow`.

use thiserror::Error;

/// Problems with the connection settings, raised before any prompt is shown.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing {0}: pass it as a flag or set it in the environment / .env file")]
    Missing(&'static str),

    #[error("invalid store url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to read env file {path}: {source}")]
    EnvFile {
        path: String,
        #[source]
        source: dotenvy::Error,
    },
}

/// Failure of a single insert against the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store rejected insert ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("api key contains characters not allowed in a header")]
    InvalidKey,

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Raised by the console while waiting for a line of input.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The user pressed Ctrl-C. Ends the whole session.
    #[error("interrupted")]
    Interrupted,

    #[error("terminal error: {0}")]
    Io(#[source] std::io::Error),
}

impl From<std::io::Error> for PromptError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::Interrupted {
            PromptError::Interrupted
        } else {
            PromptError::Io(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn interrupted_io_maps_to_interrupt() {
        let err: PromptError = io::Error::new(io::ErrorKind::Interrupted, "read interrupted").into();
        assert!(matches!(err, PromptError::Interrupted));
    }

    #[test]
    fn other_io_errors_stay_io() {
        let err: PromptError = io::Error::new(io::ErrorKind::BrokenPipe, "gone").into();
        assert!(matches!(err, PromptError::Io(_)));
    }

    #[test]
    fn rejected_message_is_shown() {
        let err = StoreError::Rejected {
            status: 504,
            message: "network timeout".into(),
        };
        assert!(err.to_string().contains("network timeout"));
    }
}
