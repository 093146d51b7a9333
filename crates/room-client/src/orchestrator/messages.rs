//! Message types for the session orchestrator.
//!
//! Commands arrive on a bounded `tokio::sync::mpsc` mailbox and answer via
//! `tokio::sync::oneshot`. Output for the application flows the other way
//! as [`SessionUpdate`]s on an unbounded channel.

use crate::errors::ClientError;
use crate::participant::{ParticipantView, RenderAction};
use tokio::sync::oneshot;

/// Commands sent to the orchestrator actor.
#[derive(Debug)]
pub enum OrchestratorMessage {
    /// Join a room as `username`.
    Join {
        username: String,
        room_name: String,
        /// Response channel for the join result.
        respond_to: oneshot::Sender<Result<SessionInfo, ClientError>>,
    },

    /// Leave the current room. No-op when idle.
    Leave {
        respond_to: oneshot::Sender<()>,
    },

    /// Snapshot of the current participant set.
    GetParticipants {
        respond_to: oneshot::Sender<Vec<ParticipantView>>,
    },

    GetState {
        respond_to: oneshot::Sender<SessionState>,
    },
}

/// Non-secret description of a live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub username: String,
    pub room_name: String,
    /// Identity the transport assigned to the local participant.
    pub local_identity: String,
    /// Unix timestamp after which the session token no longer verifies.
    pub expires_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connected(SessionInfo),
}

/// Notifications for the application's rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUpdate {
    /// Attach or detach a track.
    Render(RenderAction),

    /// Participant set after a change was applied.
    Participants(Vec<ParticipantView>),

    /// The session ended without the application asking for it.
    Ended { reason: String },
}
