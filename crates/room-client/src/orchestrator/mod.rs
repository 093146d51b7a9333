//! Session orchestration.
//!
//! [`SessionOrchestrator`] drives the join sequence and owns the
//! participant set for the lifetime of a room session.

pub mod messages;
pub mod session;

pub use messages::{OrchestratorMessage, SessionInfo, SessionState, SessionUpdate};
pub use session::{Session, SessionOrchestrator, SessionOrchestratorHandle};
