//! HTTP server for the refsync branch-mirroring service.
//!
//! Exposes `POST /sync` (the pull/push operation), `GET /logs`
//! (recent audit rows) and `GET /healthz`.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use server::build_app;
pub use state::AppState;
