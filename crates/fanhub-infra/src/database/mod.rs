//! PostgreSQL document store.

mod connections;
pub mod entity;
mod stores;

pub use connections::{DatabaseConfig, connect};
pub use stores::PostgresDocumentStore;

pub use sea_orm::DbConn as DatabaseConnection;

#[cfg(test)]
mod tests;
