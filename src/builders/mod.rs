//! Builders that assemble booking components from configuration.

pub mod schedule_builder;
pub mod service_builder;

pub use schedule_builder::{seed_week_if_empty, ScheduleBuilder};
pub use service_builder::{build_service, build_store, DynBookingService};
