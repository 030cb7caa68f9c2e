//! # Fan Hub Shared
//!
//! Wire types shared between the web client and the API server.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
