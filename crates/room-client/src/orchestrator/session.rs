//! `SessionOrchestrator` - owns one room session at a time.
//!
//! The orchestrator is an actor. All commands go through its mailbox and
//! are processed to completion one at a time, so a `leave` sent while a
//! `join` is waiting on the transport is handled only after that join has
//! resolved. Transport events arrive on a separate per-session channel and
//! are applied in delivery order.
//!
//! # Join sequence
//!
//! 1. Issue a session token (failure: `AuthFailed`, transport untouched)
//! 2. Fetch the shared key (failure: `KeyUnavailable`)
//! 3. Create the event channel and connect with token and key
//! 4. Enable microphone and camera, seed the participant set
//!
//! A failure in 3 or 4 disconnects the transport before returning
//! `TransportFailed`, so a failed join leaves nothing behind.

use crate::credentials::CredentialProvider;
use crate::errors::{ClientError, TransportError};
use crate::participant::{ParticipantView, RenderAction, TrackKind};
use crate::roster::ParticipantSet;
use crate::transport::{
    ConnectOptions, E2eeOptions, KeyMode, RemoteParticipant, RoomTransport, TrackHandle,
    TransportEvent,
};

use super::messages::{OrchestratorMessage, SessionInfo, SessionState, SessionUpdate};

use common::jwt::peek_claims;
use common::secret::{duplicate_bytes, ExposeSecret, SecretBox, SecretString};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Default channel buffer size for the orchestrator mailbox.
const ORCHESTRATOR_CHANNEL_BUFFER: usize = 64;

/// Buffer for transport events of one session.
const TRANSPORT_EVENT_BUFFER: usize = 256;

/// Credentials and identity of the live session.
///
/// Token and key are zeroized when the session is dropped.
pub struct Session {
    username: String,
    room_name: String,
    local_identity: String,
    token: SecretString,
    key: SecretBox<Vec<u8>>,
    expires_at: i64,
}

impl Session {
    #[must_use]
    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            username: self.username.clone(),
            room_name: self.room_name.clone(),
            local_identity: self.local_identity.clone(),
            expires_at: self.expires_at,
        }
    }

    #[must_use]
    pub fn token(&self) -> &SecretString {
        &self.token
    }

    #[must_use]
    pub fn key(&self) -> &SecretBox<Vec<u8>> {
        &self.key
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.username)
            .field("room_name", &self.room_name)
            .field("local_identity", &self.local_identity)
            .field("token", &"[REDACTED]")
            .field("key", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// A connected session with its participants and event stream.
struct LiveSession {
    session: Session,
    participants: ParticipantSet,
    events: mpsc::Receiver<TransportEvent>,
}

/// Handle to a `SessionOrchestrator`.
#[derive(Clone, Debug)]
pub struct SessionOrchestratorHandle {
    sender: mpsc::Sender<OrchestratorMessage>,
    cancel_token: CancellationToken,
}

impl SessionOrchestratorHandle {
    /// Join `room_name` as `username`.
    pub async fn join(
        &self,
        username: impl Into<String>,
        room_name: impl Into<String>,
    ) -> Result<SessionInfo, ClientError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(OrchestratorMessage::Join {
                username: username.into(),
                room_name: room_name.into(),
                respond_to: tx,
            })
            .await
            .map_err(|e| ClientError::Internal(format!("channel send failed: {e}")))?;

        rx.await
            .map_err(|e| ClientError::Internal(format!("response receive failed: {e}")))?
    }

    /// Leave the current room. Succeeds when no session is live.
    pub async fn leave(&self) -> Result<(), ClientError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(OrchestratorMessage::Leave { respond_to: tx })
            .await
            .map_err(|e| ClientError::Internal(format!("channel send failed: {e}")))?;

        rx.await
            .map_err(|e| ClientError::Internal(format!("response receive failed: {e}")))
    }

    /// Read-only snapshot of the participant set.
    pub async fn participants(&self) -> Result<Vec<ParticipantView>, ClientError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(OrchestratorMessage::GetParticipants { respond_to: tx })
            .await
            .map_err(|e| ClientError::Internal(format!("channel send failed: {e}")))?;

        rx.await
            .map_err(|e| ClientError::Internal(format!("response receive failed: {e}")))
    }

    pub async fn state(&self) -> Result<SessionState, ClientError> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(OrchestratorMessage::GetState { respond_to: tx })
            .await
            .map_err(|e| ClientError::Internal(format!("channel send failed: {e}")))?;

        rx.await
            .map_err(|e| ClientError::Internal(format!("response receive failed: {e}")))
    }

    /// Stop the orchestrator. A live session is torn down first.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}

/// The `SessionOrchestrator` actor.
pub struct SessionOrchestrator {
    transport: Arc<dyn RoomTransport>,
    credentials: Arc<dyn CredentialProvider>,
    /// Media server URL passed to the transport on connect.
    room_url: String,
    receiver: mpsc::Receiver<OrchestratorMessage>,
    cancel_token: CancellationToken,
    updates: mpsc::UnboundedSender<SessionUpdate>,
    live: Option<LiveSession>,
}

impl SessionOrchestrator {
    /// Spawn a new orchestrator.
    ///
    /// Returns a handle and the task join handle. Updates for rendering are
    /// delivered on `updates`.
    pub fn spawn(
        transport: Arc<dyn RoomTransport>,
        credentials: Arc<dyn CredentialProvider>,
        room_url: String,
        updates: mpsc::UnboundedSender<SessionUpdate>,
        cancel_token: CancellationToken,
    ) -> (SessionOrchestratorHandle, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(ORCHESTRATOR_CHANNEL_BUFFER);

        let actor = Self {
            transport,
            credentials,
            room_url,
            receiver,
            cancel_token: cancel_token.clone(),
            updates,
            live: None,
        };

        let task_handle = tokio::spawn(actor.run());

        let handle = SessionOrchestratorHandle {
            sender,
            cancel_token,
        };

        (handle, task_handle)
    }

    #[instrument(skip_all, name = "room.orchestrator")]
    async fn run(mut self) {
        debug!(target: "room.orchestrator", "SessionOrchestrator started");

        loop {
            tokio::select! {
                () = self.cancel_token.cancelled() => {
                    debug!(
                        target: "room.orchestrator",
                        "SessionOrchestrator received cancellation signal"
                    );
                    self.teardown().await;
                    break;
                }

                msg = self.receiver.recv() => {
                    match msg {
                        Some(message) => self.handle_message(message).await,
                        None => {
                            debug!(
                                target: "room.orchestrator",
                                "SessionOrchestrator channel closed, exiting"
                            );
                            self.teardown().await;
                            break;
                        }
                    }
                }

                event = next_event(&mut self.live) => {
                    match event {
                        Some(event) => self.handle_event(event).await,
                        None => self.end_session("transport event stream closed").await,
                    }
                }
            }
        }

        info!(target: "room.orchestrator", "SessionOrchestrator stopped");
    }

    async fn handle_message(&mut self, message: OrchestratorMessage) {
        match message {
            OrchestratorMessage::Join {
                username,
                room_name,
                respond_to,
            } => {
                let result = self.handle_join(username, room_name).await;
                let _ = respond_to.send(result);
            }

            OrchestratorMessage::Leave { respond_to } => {
                if self.teardown().await {
                    info!(target: "room.orchestrator", "Left room");
                }
                let _ = respond_to.send(());
            }

            OrchestratorMessage::GetParticipants { respond_to } => {
                let snapshot = self
                    .live
                    .as_ref()
                    .map(|live| live.participants.snapshot())
                    .unwrap_or_default();
                let _ = respond_to.send(snapshot);
            }

            OrchestratorMessage::GetState { respond_to } => {
                let state = match &self.live {
                    Some(live) => SessionState::Connected(live.session.info()),
                    None => SessionState::Idle,
                };
                let _ = respond_to.send(state);
            }
        }
    }

    #[instrument(skip_all, fields(room = %room_name))]
    async fn handle_join(
        &mut self,
        username: String,
        room_name: String,
    ) -> Result<SessionInfo, ClientError> {
        if let Some(live) = &self.live {
            return Err(ClientError::AlreadyJoined(live.session.room_name.clone()));
        }

        if room_name.trim().is_empty() {
            return Err(ClientError::Validation("Room name is required".to_string()));
        }

        let token = self.credentials.issue_token(&username).await.map_err(|e| {
            warn!(target: "room.orchestrator", error = %e, "Token issuance failed");
            ClientError::AuthFailed(e.to_string())
        })?;

        let expires_at = peek_claims(token.expose_secret())
            .map_err(|e| ClientError::AuthFailed(format!("Unreadable session token: {e}")))?
            .exp;

        let key = self.credentials.fetch_key().await.map_err(|e| {
            warn!(target: "room.orchestrator", error = %e, "Shared key fetch failed");
            ClientError::KeyUnavailable(e.to_string())
        })?;

        // The channel exists before connect so nothing sent during setup is lost.
        let (event_tx, events) = mpsc::channel(TRANSPORT_EVENT_BUFFER);

        let options = ConnectOptions {
            url: self.room_url.clone(),
            room_name: room_name.clone(),
            token: SecretString::from(token.expose_secret().to_string()),
            e2ee: E2eeOptions {
                key_mode: KeyMode::SharedKey,
                shared_key: duplicate_bytes(&key),
            },
        };

        let roster = match self.transport.connect(options, event_tx).await {
            Ok(roster) => roster,
            Err(e) => return Err(self.abort_join(e).await),
        };

        let local_tracks = match self.enable_local_media().await {
            Ok(tracks) => tracks,
            Err(e) => return Err(self.abort_join(e).await),
        };

        let mut participants = ParticipantSet::new();
        let mut actions = participants.insert(
            RemoteParticipant {
                identity: roster.local_identity.clone(),
                tracks: local_tracks,
            },
            true,
        );
        for participant in roster.participants {
            actions.extend(participants.insert(participant, false));
        }

        let session = Session {
            username,
            room_name,
            local_identity: roster.local_identity,
            token,
            key,
            expires_at,
        };
        let info = session.info();

        info!(
            target: "room.orchestrator",
            participants = participants.len(),
            "Joined room"
        );

        let snapshot = participants.snapshot();
        self.live = Some(LiveSession {
            session,
            participants,
            events,
        });
        self.publish(actions, snapshot);

        Ok(info)
    }

    /// Enable outgoing audio and video, returning the published tracks.
    async fn enable_local_media(&self) -> Result<Vec<(TrackKind, TrackHandle)>, TransportError> {
        let mut tracks = Vec::new();
        if let Some(track) = self.transport.set_microphone_enabled(true).await? {
            tracks.push((TrackKind::Audio, track));
        }
        if let Some(track) = self.transport.set_camera_enabled(true).await? {
            tracks.push((TrackKind::Video, track));
        }
        Ok(tracks)
    }

    async fn abort_join(&self, error: TransportError) -> ClientError {
        warn!(target: "room.orchestrator", error = %error, "Join failed, disconnecting transport");
        self.transport.disconnect().await;
        ClientError::TransportFailed(error)
    }

    async fn handle_event(&mut self, event: TransportEvent) {
        let event = match event {
            TransportEvent::Disconnected { reason } => {
                self.end_session(&reason).await;
                return;
            }
            other => other,
        };

        let Some(live) = self.live.as_mut() else {
            return;
        };

        let actions = live.participants.apply(event);
        let snapshot = live.participants.snapshot();
        self.publish(actions, snapshot);
    }

    /// Tear down after the transport dropped and tell the application.
    async fn end_session(&mut self, reason: &str) {
        if self.teardown().await {
            warn!(target: "room.orchestrator", reason = %reason, "Session ended by transport");
            self.emit(SessionUpdate::Ended {
                reason: reason.to_string(),
            });
        }
    }

    /// Detach everything, disconnect and drop the session. Returns whether
    /// a session was live.
    async fn teardown(&mut self) -> bool {
        let Some(mut live) = self.live.take() else {
            return false;
        };

        let actions = live.participants.clear();
        self.publish(actions, Vec::new());
        self.transport.disconnect().await;

        debug!(
            target: "room.orchestrator",
            room = %live.session.room_name,
            "Session discarded"
        );
        true
    }

    fn publish(&self, actions: Vec<RenderAction>, snapshot: Vec<ParticipantView>) {
        for action in actions {
            self.emit(SessionUpdate::Render(action));
        }
        self.emit(SessionUpdate::Participants(snapshot));
    }

    fn emit(&self, update: SessionUpdate) {
        if self.updates.send(update).is_err() {
            debug!(target: "room.orchestrator", "Update receiver dropped");
        }
    }
}

/// Next event of the live session, or never when idle.
async fn next_event(live: &mut Option<LiveSession>) -> Option<TransportEvent> {
    match live {
        Some(live) => live.events.recv().await,
        None => std::future::pending().await,
    }
}
