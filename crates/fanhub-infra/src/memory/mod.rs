//! In-memory document store. Default backend for tests and local runs
//! without a database.

mod store;

pub use store::InMemoryDocumentStore;
