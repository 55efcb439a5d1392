//! # Class Booking
//!
//! Class scheduling, enrollment and waitlist promotion for a gym membership app.
//!
//! Sessions have a fixed seat count. Members enroll directly while seats are
//! free and queue on a FIFO waitlist once a session is full. When a seat is
//! released the oldest waiter is offered it and has a short acceptance window
//! to claim it; enrollment changes close shortly before class.
//!
//! ## Rules
//!
//! - **Capacity**: a session never holds more enrollments than its capacity,
//!   even under concurrent enroll and accept calls. The seat check and insert
//!   happen as one store operation.
//! - **Enrollment window**: enroll and cancel are refused once the class is
//!   less than 30 minutes away (configurable).
//! - **Promotion**: at most one waiter is offered a seat per release, in
//!   enqueue order.
//! - **Acceptance window**: an offered seat must be accepted within 5 minutes
//!   (configurable). Late accepts purge the entry.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use class_booking::builders::build_service;
//! use class_booking::config::BookingConfig;
//! use class_booking::infra::InMemoryOutbox;
//! use class_booking::util::SystemClock;
//!
//! let cfg = BookingConfig::from_env()?;
//! let outbox = Arc::new(InMemoryOutbox::new());
//! let service = build_service(&cfg, outbox, Arc::new(SystemClock))?;
//!
//! service.enroll("session-1", "user-1").await?;
//! service.join_waitlist("session-1", "user-2").await?;
//! service.cancel("session-1", "user-1").await?; // user-2 is notified
//! service.accept_spot("session-1", "user-2").await?;
//! ```
//!
//! For complete scenarios, see `tests/booking_scenarios_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Booking components, records and the traits at their seams.
pub mod core;
/// Configuration models for booking rules, backends and the sweep.
pub mod config;
/// Builders to construct booking components from configuration.
pub mod builders;
/// Infrastructure adapters for session storage and notice delivery.
pub mod infra;
/// Runtime adapters (spawner, expiry sweeper) and response envelopes.
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
/// Shared utilities.
pub mod util;
