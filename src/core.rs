//! The core module defines the business logic of casekit.
//! It provides the traits and models upstream adapters need to implement.

pub mod convert;
pub mod model;
pub mod preview;
pub mod provider;
pub mod repo;
pub mod service;
pub mod upload;
