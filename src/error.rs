//! Typed failures for a scrape run, grouped into classes the binary maps to exit codes.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse failure class. Scripted callers branch on the exit code derived from it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad URL, missing credentials, invalid options.
    Input,
    /// Query service unreachable, non-success status, unparseable body.
    Network,
    /// Output directory/file could not be written.
    Io,
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid URL: {0} (expected https://www.instagram.com/reel/<short>/ or https://www.instagram.com/p/<short>/)")]
    InvalidUrl(String),

    #[error("missing environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("HTTP {status} from query service: {body_snippet}")]
    Status { status: u16, body_snippet: String },

    #[error("request to query service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("non-JSON response received from query service: {0}")]
    MalformedResponse(String),

    #[error("failed to write output {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScrapeError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ScrapeError::InvalidUrl(_)
            | ScrapeError::MissingCredentials(_)
            | ScrapeError::InvalidConfig(_) => ErrorClass::Input,
            ScrapeError::Status { .. }
            | ScrapeError::Transport(_)
            | ScrapeError::MalformedResponse(_) => ErrorClass::Network,
            ScrapeError::Write { .. } => ErrorClass::Io,
        }
    }

    /// Process exit status: 2 for input/config, 1 for runtime/network, 3 for I/O.
    pub fn exit_code(&self) -> i32 {
        match self.class() {
            ErrorClass::Input => 2,
            ErrorClass::Network => 1,
            ErrorClass::Io => 3,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ScrapeError::Write { path: path.into(), source }
    }
}

pub type ScrapeResult<T> = std::result::Result<T, ScrapeError>;
