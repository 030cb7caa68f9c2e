//! # Fan Hub Core
//!
//! The domain layer of the Fan Hub backend.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! the post/reply/notification entities, the store ports, and the three
//! stateful services (post interaction engine, feed controller, notification
//! center) that the API server drives.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{DomainError, StoreError};
