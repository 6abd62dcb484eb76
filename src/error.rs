//! # Error Handling
//!
//! This module defines the centralized error type of the `sapcli` library.
//! It uses the `thiserror` library to build a single `Error` enum covering
//! every failure the library can surface to the command line layer.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. HTTP failures that carry a response are kept
//!   as [`HttpRequestError`] until the gCTS layer classifies them into a
//!   [`GctsError`]. Responses that are not JSON are never classified and stay
//!   `Error::Http`.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.

use thiserror::Error;

use crate::connection::HttpRequestError;
use crate::gcts::errors::GctsError;

/// Main error type for sapcli operations
#[derive(Error, Debug)]
pub enum Error {
    /// The server answered with a non-success HTTP status.
    #[error(transparent)]
    Http(#[from] HttpRequestError),

    /// A gCTS error classified from a JSON error response.
    #[error(transparent)]
    Gcts(#[from] GctsError),

    /// The request never produced a response (DNS, TLS, refused connection).
    #[error("Network operation error: {url} - {message}")]
    Network { url: String, message: String },

    /// The server answered with a body that does not have the expected shape.
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// Connection settings are missing or malformed.
    #[error("Configuration error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Config {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A JSON (de)serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Shorthand for an [`Error::InvalidResponse`].
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Error::InvalidResponse {
            message: message.into(),
        }
    }

    /// Returns the gCTS error if this error was classified as one.
    pub fn as_gcts(&self) -> Option<&GctsError> {
        match self {
            Error::Gcts(err) => Some(err),
            _ => None,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
