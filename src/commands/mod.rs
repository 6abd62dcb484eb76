//! # Subcommands of `sapcli`
//!
//! `gcts` is a command group with one file per git-like command under
//! `commands/gcts/`; `completions` stands alone. Every command file holds a
//! clap `Args` struct and an `execute` function that calls the library and
//! prints to stdout. Failures go to stderr through `anyhow`.

pub mod completions;
pub mod gcts;
