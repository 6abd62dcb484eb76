//! # Error Suggestions
//!
//! Helper functions that turn library errors into messages with hints.
//! Errors should tell users what went wrong AND how to fix it.

use crate::error::Error;

/// Adds hints to errors the user can usually fix from the command line.
pub fn with_hints(error: Error) -> anyhow::Error {
    match &error {
        Error::Network { url, message } => anyhow::anyhow!(
            "Cannot reach {url}: {message}\n\n\
             hint: Check --ashost and --port (SAP_ASHOST, SAP_PORT)\n\
             hint: Use --ssl no for plain HTTP or --verify no for self-signed certificates\n\
             hint: Raise SAPCLI_HTTP_TIMEOUT for slow systems"
        ),
        Error::Http(http) if http.response.status() == 401 => anyhow::anyhow!(
            "{error}\n\n\
             hint: Check --user and --password (SAP_USER, SAP_PASSWORD)"
        ),
        Error::Http(http) if http.response.status() == 403 => anyhow::anyhow!(
            "{error}\n\n\
             hint: The user may lack gCTS authorizations"
        ),
        _ => anyhow::Error::new(error),
    }
}
