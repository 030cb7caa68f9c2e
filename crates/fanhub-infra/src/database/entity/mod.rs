//! SeaORM entities for the document collections.

pub mod like;
pub mod notification;
pub mod post;
pub mod reply;
pub mod user;
