//! Infrastructure adapters for session storage and notice delivery.

pub mod notify;
pub mod store;

pub use notify::{InMemoryOutbox, TracingGateway};
pub use store::{FileSessionStore, InMemorySessionStore};
