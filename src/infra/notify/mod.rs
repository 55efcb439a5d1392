//! Notification gateway backends.

pub mod memory;
pub mod tracing_gateway;

pub use memory::InMemoryOutbox;
pub use tracing_gateway::TracingGateway;
