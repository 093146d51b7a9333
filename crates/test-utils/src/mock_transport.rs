//! Mock room transport for orchestrator testing.
//!
//! Records every call, can be configured to fail connect or local media,
//! and lets a test push [`TransportEvent`]s into the channel the
//! orchestrator handed over at connect time.
//!
//! # Example
//!
//! ```rust,ignore
//! use test_utils::MockRoomTransport;
//!
//! let transport = Arc::new(
//!     MockRoomTransport::builder()
//!         .local_identity("alice")
//!         .with_participant(RemoteParticipant::new("bob"))
//!         .build(),
//! );
//!
//! // after join:
//! transport.emit(TransportEvent::ParticipantDisconnected { identity: "bob".into() }).await;
//! ```

use crate::test_ids::{TEST_TRACK_LOCAL_AUDIO, TEST_TRACK_LOCAL_VIDEO};
use async_trait::async_trait;
use common::secret::ExposeSecret;
use room_client::errors::TransportError;
use room_client::transport::{
    ConnectOptions, KeyMode, RemoteParticipant, RoomRoster, RoomTransport, TrackHandle,
    TransportEvent,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::{mpsc, Notify};

/// What the orchestrator passed to `connect`, with secrets exposed for
/// assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedConnect {
    pub url: String,
    pub room_name: String,
    pub token: String,
    pub key_mode: KeyMode,
    pub shared_key: Vec<u8>,
}

#[derive(Default)]
struct MockState {
    events: Option<mpsc::Sender<TransportEvent>>,
    connects: Vec<RecordedConnect>,
}

/// Mock implementation of [`RoomTransport`].
pub struct MockRoomTransport {
    roster: RoomRoster,
    connect_error: Option<TransportError>,
    media_error: Option<TransportError>,
    hold_connect: bool,
    state: Mutex<MockState>,
    connect_started: Notify,
    release_connect: Notify,
    connect_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
    media_calls: AtomicUsize,
}

impl MockRoomTransport {
    #[must_use]
    pub fn builder() -> MockRoomTransportBuilder {
        MockRoomTransportBuilder::default()
    }

    /// Push an event to the connected orchestrator.
    ///
    /// Returns false when nothing is connected or the receiver is gone.
    pub async fn emit(&self, event: TransportEvent) -> bool {
        let sender = self.state.lock().unwrap().events.clone();
        match sender {
            Some(sender) => sender.send(event).await.is_ok(),
            None => false,
        }
    }

    /// Drop the event sender, as a transport does when it dies silently.
    pub fn close_events(&self) {
        self.state.lock().unwrap().events = None;
    }

    /// Wait until `connect` has been entered.
    pub async fn connect_started(&self) {
        self.connect_started.notified().await;
    }

    /// Let a held `connect` complete.
    pub fn release_connect(&self) {
        self.release_connect.notify_one();
    }

    /// Every `connect` call made so far.
    pub fn connects(&self) -> Vec<RecordedConnect> {
        self.state.lock().unwrap().connects.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state.lock().unwrap().events.is_some()
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }

    /// Calls to either `set_microphone_enabled` or `set_camera_enabled`.
    pub fn media_calls(&self) -> usize {
        self.media_calls.load(Ordering::SeqCst)
    }

    fn local_track(&self, enabled: bool, sid: &str) -> Result<Option<TrackHandle>, TransportError> {
        self.media_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.media_error {
            return Err(error.clone());
        }
        Ok(enabled.then(|| TrackHandle::new(sid)))
    }
}

#[async_trait]
impl RoomTransport for MockRoomTransport {
    async fn connect(
        &self,
        options: ConnectOptions,
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<RoomRoster, TransportError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        {
            let mut state = self.state.lock().unwrap();
            state.connects.push(RecordedConnect {
                url: options.url,
                room_name: options.room_name,
                token: options.token.expose_secret().to_string(),
                key_mode: options.e2ee.key_mode,
                shared_key: options.e2ee.shared_key.expose_secret().clone(),
            });
        }
        self.connect_started.notify_one();

        if self.hold_connect {
            self.release_connect.notified().await;
        }

        if let Some(error) = &self.connect_error {
            return Err(error.clone());
        }

        self.state.lock().unwrap().events = Some(events);
        Ok(self.roster.clone())
    }

    async fn disconnect(&self) {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        self.state.lock().unwrap().events = None;
    }

    async fn set_microphone_enabled(
        &self,
        enabled: bool,
    ) -> Result<Option<TrackHandle>, TransportError> {
        self.local_track(enabled, TEST_TRACK_LOCAL_AUDIO)
    }

    async fn set_camera_enabled(
        &self,
        enabled: bool,
    ) -> Result<Option<TrackHandle>, TransportError> {
        self.local_track(enabled, TEST_TRACK_LOCAL_VIDEO)
    }
}

/// Builder for [`MockRoomTransport`].
#[derive(Debug)]
pub struct MockRoomTransportBuilder {
    local_identity: String,
    participants: Vec<RemoteParticipant>,
    connect_error: Option<TransportError>,
    media_error: Option<TransportError>,
    hold_connect: bool,
}

impl Default for MockRoomTransportBuilder {
    fn default() -> Self {
        Self {
            local_identity: crate::test_ids::TEST_USER_ALICE.to_string(),
            participants: Vec::new(),
            connect_error: None,
            media_error: None,
            hold_connect: false,
        }
    }
}

impl MockRoomTransportBuilder {
    /// Identity the transport assigns to the local participant.
    #[must_use]
    pub fn local_identity(mut self, identity: &str) -> Self {
        self.local_identity = identity.to_string();
        self
    }

    /// Add a participant to the connect-time roster.
    #[must_use]
    pub fn with_participant(mut self, participant: RemoteParticipant) -> Self {
        self.participants.push(participant);
        self
    }

    #[must_use]
    pub fn failing_connect(mut self, error: TransportError) -> Self {
        self.connect_error = Some(error);
        self
    }

    /// Fail enabling the microphone and camera.
    #[must_use]
    pub fn failing_media(mut self, error: TransportError) -> Self {
        self.media_error = Some(error);
        self
    }

    /// Block `connect` until [`MockRoomTransport::release_connect`].
    #[must_use]
    pub fn hold_connect(mut self) -> Self {
        self.hold_connect = true;
        self
    }

    #[must_use]
    pub fn build(self) -> MockRoomTransport {
        MockRoomTransport {
            roster: RoomRoster {
                local_identity: self.local_identity,
                participants: self.participants,
            },
            connect_error: self.connect_error,
            media_error: self.media_error,
            hold_connect: self.hold_connect,
            state: Mutex::new(MockState::default()),
            connect_started: Notify::new(),
            release_connect: Notify::new(),
            connect_calls: AtomicUsize::new(0),
            disconnect_calls: AtomicUsize::new(0),
            media_calls: AtomicUsize::new(0),
        }
    }
}
