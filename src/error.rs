// Error taxonomy for the submit flow. Three user-visible classes:
// authentication failures, platform (Twitter) API errors, and everything
// else. The Display strings are exactly what the UI prints, so variants
// carry the message prefixes themselves.

use thiserror::Error;

/// Errors that can occur while publishing a tweet.
#[derive(Error, Debug)]
pub enum PostError {
    /// Building the HTTP client failed, so no authenticated handle exists.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// No usable handle: every resolved credential field was empty.
    #[error("Twitter authentication failed")]
    AuthUnavailable,

    /// The platform returned a non-success response; message shown verbatim.
    #[error("Twitter API error: {0}")]
    Api(String),

    /// Anything else: transport failure, unreadable file, bad response body.
    #[error("Error: {0}")]
    Unexpected(String),
}

impl From<reqwest::Error> for PostError {
    fn from(err: reqwest::Error) -> Self {
        PostError::Unexpected(err.to_string())
    }
}

impl From<std::io::Error> for PostError {
    fn from(err: std::io::Error) -> Self {
        PostError::Unexpected(err.to_string())
    }
}

/// Result alias used throughout the library.
pub type PostResult<T> = Result<T, PostError>;
