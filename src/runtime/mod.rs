//! Runtime adapters and the response surface.

pub mod api;
pub mod sweeper;
pub mod tokio_spawner;

pub use api::{health, BookingResponse, ErrorBody, Health};
pub use sweeper::{ExpirySweeper, SweeperHandle};
pub use tokio_spawner::{Spawn, TokioSpawner};
