//! Branch-ref sync orchestration.

pub mod error;
pub mod host;
pub mod orchestrator;
pub mod testing;

pub use error::SyncError;
pub use host::RepoHost;
pub use orchestrator::{SyncEndpoint, SyncOperation, SyncOrchestrator, SyncOutcome, SyncPlan};
