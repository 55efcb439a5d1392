//! Booking components and the traits at their seams.

pub mod audit;
pub mod booking_service;
pub mod capacity;
pub mod enrollment;
pub mod error;
pub mod model;
pub mod notify;
pub mod promotion;
pub mod rules;
pub mod store;
pub mod waitlist;

pub use audit::{
    build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink, TracingAuditSink,
};
pub use booking_service::{BookingService, NoticeTemplate, SessionOverview};
pub use capacity::CapacityManager;
pub use enrollment::{CancelOutcome, EnrollmentPolicy};
pub use error::{AppResult, BookingError, ErrorKind};
pub use model::{ClassSession, ClassType, Enrollment, Participation, SeatClaim, WaitlistEntry, WodType};
pub use notify::{Notice, NotificationGateway};
pub use promotion::{PromotionProtocol, SweepReport};
pub use rules::BookingRules;
pub use store::SessionStore;
pub use waitlist::WaitlistQueue;
