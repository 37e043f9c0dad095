//! Seokit Core Library
//!
//! Configuration and error handling shared by the Seokit builders and server.

pub mod config;
pub mod error;

pub use config::{ChangeFreq, Config, TrailingSlash, join_url};
pub use error::{CoreError, Result};
