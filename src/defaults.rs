//! Default values for sapcli.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

/// Path of the gCTS ICF service on the application server.
pub const GCTS_ICF_PATH: &str = "/sap/bc/cts_abapvcs/";

/// Environment variable overriding the HTTP timeout in seconds.
pub const HTTP_TIMEOUT_ENV: &str = "SAPCLI_HTTP_TIMEOUT";

pub const DEFAULT_HTTP_TIMEOUT_SECS: f64 = 900.0;

pub const DEFAULT_PORT: u16 = 443;

/// Virtual system ID assigned to new repositories.
pub const DEFAULT_VSID: &str = "6IT";

/// Repository folder holding the ABAP sources.
pub const DEFAULT_STARTING_FOLDER: &str = "src/";
