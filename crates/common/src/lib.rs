//! Shared utilities, configuration, and error handling for Parlor
//!
//! This crate provides common functionality used across the Parlor moderation
//! service:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Clock abstraction for time-dependent logic

pub mod clock;
pub mod config;
pub mod error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{Error, Result};
