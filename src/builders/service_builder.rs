//! Builders to construct a booking service from configuration.

use std::sync::Arc;

use crate::config::{BookingConfig, StoreBackendConfig};
use crate::core::{BookingError, BookingService, InMemoryAuditSink, NotificationGateway, SessionStore};
use crate::infra::{FileSessionStore, InMemorySessionStore};
use crate::util::clock::Clock;

/// Booking service over a store chosen at runtime.
pub type DynBookingService<N> = BookingService<dyn SessionStore, N>;

/// Open the store selected by `cfg`.
pub fn build_store(cfg: &BookingConfig) -> Result<Arc<dyn SessionStore>, BookingError> {
    let store: Arc<dyn SessionStore> = match &cfg.store {
        StoreBackendConfig::InMemory => Arc::new(InMemorySessionStore::new()),
        StoreBackendConfig::File { path, stream } => {
            Arc::new(FileSessionStore::open(path, stream.clone())?)
        }
    };
    Ok(store)
}

/// Validate `cfg` and wire a service around its store, the given gateway and clock.
pub fn build_service<N>(
    cfg: &BookingConfig,
    gateway: Arc<N>,
    clock: Arc<dyn Clock>,
) -> Result<DynBookingService<N>, BookingError>
where
    N: NotificationGateway,
{
    cfg.validate().map_err(BookingError::InvalidConfig)?;

    let store = build_store(cfg)?;
    let mut service = BookingService::new(store, gateway, clock, cfg.rules()).with_notice(cfg.notice.clone());
    if cfg.audit_capacity > 0 {
        service = service.with_audit(Box::new(InMemoryAuditSink::new(cfg.audit_capacity)));
    }
    tracing::info!(
        cutoff_secs = cfg.enrollment_cutoff_secs,
        acceptance_secs = cfg.acceptance_window_secs,
        store = ?cfg.store,
        "booking service built"
    );
    Ok(service)
}
