//! Module containing concrete implementations from the [core](crate::core) module.

/// Command line interface.
pub mod cli;

/// External converter implementations.
pub mod convert;

/// Repository implementations.
pub mod repo;

/// Application state configuration.
pub mod state;

/// Upload storage implementations.
pub mod upload;
