use std::path::PathBuf;

use thiserror::Error;

/// Every fallible operation of the crate returns this error.
///
/// The first four variants are the classified failures. The remaining ones
/// carry failures that happen outside of the service's answer: the transport
/// itself, a body of an unexpected shape, or local files.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No authorization: {0}")]
    NoAuthorization(String),

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Invalid request (HTTP {status}): {body}")]
    InvalidRequest { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Path: {path}. Error: {message}")]
    Decode { path: String, message: String },

    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("SHA-1 mismatch for {file}: expected {expected}, got {actual}")]
    HashMismatch {
        file: String,
        expected: String,
        actual: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// What a `400 Bad Request` means for a given endpoint.
///
/// Delete and follow endpoints answer 400 when the targeted resource does not
/// exist, everything else uses it for malformed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadRequest {
    #[default]
    Invalid,
    Absent,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Maps a response status onto the error taxonomy.
///
/// `what` names the resource for the error message. Any 2xx status passes.
pub fn classify(status: u16, body: &[u8], what: &str, bad_request: BadRequest) -> Result<()> {
    match status {
        200..=299 => Ok(()),
        404 => Err(Error::NotFound(format!(
            "{what} wasn't found or no authorization to see it"
        ))),
        401 => Err(Error::NoAuthorization(format!("no authorization to access {what}"))),
        400 if bad_request == BadRequest::Absent => {
            Err(Error::NotFound(format!("{what} wasn't found")))
        }
        _ => Err(Error::InvalidRequest {
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        }),
    }
}
