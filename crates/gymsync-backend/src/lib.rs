//! gymsync-backend: in-memory activity status service.
//!
//! Holds one status record per user and exposes create / pause / resume /
//! stop / get over HTTP. Mutating calls require a shared-secret bearer
//! credential; reads are open so the desktop presence client can poll.

pub mod api;
pub mod clock;
pub mod http;
pub mod store;

pub use api::StatusApi;
pub use clock::{Clock, ManualClock, SystemClock};
pub use http::{router, serve, ApiError};
pub use store::{StatusRecord, StatusSnapshot, StatusStore};
