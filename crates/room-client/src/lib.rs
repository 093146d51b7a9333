//! Room client library.
//!
//! Joins a room by requesting a session token and the shared media key,
//! connecting a [`RoomTransport`](transport::RoomTransport) with both, and
//! reconciling the transport's asynchronous participant and track events
//! into a renderable participant set.
//!
//! # Architecture
//!
//! ```text
//! SessionOrchestrator (one per client)
//!   ├── CredentialProvider (token + key)
//!   ├── RoomTransport (external media connection)
//!   └── ParticipantSet
//!         └── ParticipantTracker (one per participant)
//! ```
//!
//! # Modules
//!
//! - [`config`] - Client configuration
//! - [`credentials`] - Token and key acquisition
//! - [`errors`] - Error types
//! - [`orchestrator`] - Session actor and its messages
//! - [`participant`] - Per-participant track state
//! - [`roster`] - Participant set reducer
//! - [`transport`] - Media transport abstraction

pub mod config;
pub mod credentials;
pub mod errors;
pub mod orchestrator;
pub mod participant;
pub mod roster;
pub mod transport;

pub use errors::{ClientError, CredentialError, TransportError};
pub use orchestrator::{
    SessionInfo, SessionOrchestrator, SessionOrchestratorHandle, SessionState, SessionUpdate,
};
