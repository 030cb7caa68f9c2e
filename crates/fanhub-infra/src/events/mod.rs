//! Interaction event fan-out.

mod notifier;

pub use notifier::StoreNotifier;
