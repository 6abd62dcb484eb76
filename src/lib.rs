//! # sapcli
//!
//! This library drives the gCTS REST service of an SAP system: it registers,
//! clones, switches, pulls and deletes Git repositories that the system
//! manages, and it turns the service's JSON error bodies into typed errors.
//! It is used by the `sapcli` command-line tool.
//!
//! ## Quick Example
//!
//! ```no_run
//! use sapcli::config::{http_timeout, ConnectionConfig};
//! use sapcli::connection::HttpConnection;
//! use sapcli::gcts::simple::{self, CloneOptions};
//!
//! let config = ConnectionConfig {
//!     host: "sap.example.com".to_string(),
//!     port: 443,
//!     client: Some("001".to_string()),
//!     user: Some("DEVELOPER".to_string()),
//!     password: Some("secret".to_string()),
//!     ssl: true,
//!     verify_ssl: true,
//!     timeout: http_timeout()?,
//! };
//! let connection = HttpConnection::new(&config)?;
//!
//! let mut repo = simple::clone_new(
//!     &connection,
//!     "https://github.com/org/demo.git",
//!     "demo",
//!     &CloneOptions::default(),
//! )?;
//! println!("{:?} at {:?}", repo.branch()?, repo.head()?);
//! # Ok::<(), sapcli::error::Error>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **Connection (`connection`)**: the HTTP seam. Everything above it is
//!   written against the `Connection` trait.
//! - **Repository proxy (`gcts::repository`)**: one remote repository with a
//!   lazily fetched, explicitly invalidated snapshot of its server data.
//! - **Error classification (`gcts::errors`)**: JSON error bodies become
//!   `GctsError::{Request, AlreadyExists, NotExists}`.
//! - **Workflows (`gcts::simple`)**: create-then-clone with "already exists"
//!   tolerance, checkout, pull, log, delete and user credentials.

pub mod config;
pub mod connection;
pub mod defaults;
pub mod error;
pub mod gcts;
pub mod output;
pub mod suggestions;
