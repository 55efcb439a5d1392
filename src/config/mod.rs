//! Configuration models for booking rules, backends and the expiry sweep.

pub mod booking;

pub use booking::{BookingConfig, StoreBackendConfig, SweepConfig};
