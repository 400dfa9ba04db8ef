//! # chime-core
//!
//! Core types, traits, configuration, and error handling for Chime.

pub mod alarm;
pub mod config;
pub mod error;
pub mod notice;
pub mod traits;

pub use config::shellexpand;
