//! # gCTS
//!
//! Client side of the gCTS (git-enabled Change and Transport System) REST
//! service. The service performs all Git work itself; this module only
//! drives it.
//!
//! - [`repository`]: the [`Repository`] proxy with its lazily fetched data.
//! - [`errors`]: classification of JSON error bodies into [`GctsError`].
//! - [`messages`]: printable trees built from error bodies.
//! - [`configuration`]: list/map adapters for repository configuration.
//! - [`simple`]: create-then-clone and other multi-step workflows.

pub mod configuration;
pub mod errors;
pub mod messages;
pub mod repository;
pub mod simple;

#[cfg(test)]
mod mock;

pub use errors::{ErrorClassifier, GctsError};
pub use repository::{package_name_from_url, Repository};
