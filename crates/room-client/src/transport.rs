//! Abstract real-time media transport.
//!
//! The room client never talks to a media server directly. It drives an
//! implementation of [`RoomTransport`] and consumes the [`TransportEvent`]s
//! that implementation pushes into the channel supplied at connect time.

use crate::errors::TransportError;
use crate::participant::TrackKind;
use async_trait::async_trait;
use common::secret::{SecretBox, SecretString};
use std::fmt;
use tokio::sync::mpsc;

/// Opaque reference to a media track owned by the transport.
///
/// Rendering attaches and detaches tracks by handle; the client never looks
/// inside.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackHandle(String);

impl TrackHandle {
    pub fn new(sid: impl Into<String>) -> Self {
        Self(sid.into())
    }
}

impl fmt::Display for TrackHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A participant as reported by the transport, with its live tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteParticipant {
    pub identity: String,
    pub tracks: Vec<(TrackKind, TrackHandle)>,
}

impl RemoteParticipant {
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            tracks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_track(mut self, kind: TrackKind, track: TrackHandle) -> Self {
        self.tracks.push((kind, track));
        self
    }
}

/// Room membership at the moment `connect` resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomRoster {
    pub local_identity: String,
    pub participants: Vec<RemoteParticipant>,
}

/// End-to-end encryption key handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    /// Every participant uses the same symmetric key; no per-peer exchange.
    SharedKey,
}

pub struct E2eeOptions {
    pub key_mode: KeyMode,
    pub shared_key: SecretBox<Vec<u8>>,
}

impl fmt::Debug for E2eeOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("E2eeOptions")
            .field("key_mode", &self.key_mode)
            .field("shared_key", &"[REDACTED]")
            .finish()
    }
}

/// Everything the transport needs to open a room connection.
pub struct ConnectOptions {
    pub url: String,
    pub room_name: String,
    /// Session token, presented to the media server as the join credential.
    pub token: SecretString,
    pub e2ee: E2eeOptions,
}

impl fmt::Debug for ConnectOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectOptions")
            .field("url", &self.url)
            .field("room_name", &self.room_name)
            .field("token", &"[REDACTED]")
            .field("e2ee", &self.e2ee)
            .finish()
    }
}

/// Events pushed by the transport after a successful connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    ParticipantConnected {
        participant: RemoteParticipant,
    },
    ParticipantDisconnected {
        identity: String,
    },
    TrackSubscribed {
        identity: String,
        kind: TrackKind,
        track: TrackHandle,
    },
    TrackUnsubscribed {
        identity: String,
        kind: TrackKind,
        track: TrackHandle,
    },
    /// The connection dropped without the client asking for it.
    Disconnected {
        reason: String,
    },
}

/// Real-time media connection capability.
///
/// Implementations must start delivering events into `events` only after
/// `connect` has been called with it, and must stop once `disconnect`
/// returns.
#[async_trait]
pub trait RoomTransport: Send + Sync {
    /// Open the room connection and return the roster present at connect
    /// time.
    async fn connect(
        &self,
        options: ConnectOptions,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<RoomRoster, TransportError>;

    /// Close the connection. Must be safe to call on a connection that is
    /// half-open or already closed.
    async fn disconnect(&self);

    /// Start or stop the local microphone. Returns the published track when
    /// enabling.
    async fn set_microphone_enabled(
        &self,
        enabled: bool,
    ) -> Result<Option<TrackHandle>, TransportError>;

    /// Start or stop the local camera. Returns the published track when
    /// enabling.
    async fn set_camera_enabled(&self, enabled: bool)
        -> Result<Option<TrackHandle>, TransportError>;
}
