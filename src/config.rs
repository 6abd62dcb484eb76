//! # Connection Configuration
//!
//! Settings needed to reach the gCTS service of an SAP system. The command
//! line fills [`ConnectionConfig`] from flags and their environment fallbacks;
//! the HTTP timeout is only configurable through `SAPCLI_HTTP_TIMEOUT`.

use std::env;
use std::time::Duration;

use url::Url;

use crate::defaults::{DEFAULT_HTTP_TIMEOUT_SECS, GCTS_ICF_PATH, HTTP_TIMEOUT_ENV};
use crate::error::{Error, Result};

/// Where and how to connect
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub client: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub ssl: bool,
    pub verify_ssl: bool,
    pub timeout: Duration,
}

impl ConnectionConfig {
    /// Root URL of the gCTS ICF service, always ending with a slash.
    pub fn base_url(&self) -> Result<Url> {
        if self.host.trim().is_empty() {
            return Err(Error::Config {
                message: "No application server host given".to_string(),
                hint: Some("Pass --ashost or set SAP_ASHOST".to_string()),
            });
        }

        let scheme = if self.ssl { "https" } else { "http" };
        let url = Url::parse(&format!(
            "{}://{}:{}{}",
            scheme, self.host, self.port, GCTS_ICF_PATH
        ))?;
        Ok(url)
    }
}

/// Reads the HTTP timeout from the environment.
///
/// The value is in seconds and may be fractional.
pub fn http_timeout() -> Result<Duration> {
    match env::var(HTTP_TIMEOUT_ENV) {
        Ok(raw) => parse_timeout(&raw),
        Err(_) => Ok(Duration::from_secs_f64(DEFAULT_HTTP_TIMEOUT_SECS)),
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    let invalid = || Error::Config {
        message: format!("Invalid {} value: {}", HTTP_TIMEOUT_ENV, raw),
        hint: Some("Use a positive number of seconds, e.g. 900 or 2.5".to_string()),
    };

    let secs: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(invalid());
    }

    Ok(Duration::from_secs_f64(secs))
}
