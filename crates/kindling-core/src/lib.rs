//! # kindling-core
//!
//! Core types, configuration, and error handling for the Kindling prompt composer.

pub mod candidate;
pub mod config;
pub mod error;
pub mod signature;

pub use candidate::Candidate;
pub use config::{shellexpand, Config};
pub use error::KindlingError;
