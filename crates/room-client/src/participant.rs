//! Per-participant track reconciliation.
//!
//! A [`ParticipantTracker`] turns track subscribe/unsubscribe events for one
//! participant into [`RenderAction`]s. Duplicate and out-of-order events are
//! absorbed: the tracker only emits an action when the attach state of a
//! track kind actually changes.

use crate::transport::TrackHandle;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TrackKind {
    Audio,
    Video,
}

/// Attach state of one participant's track of one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackPublication {
    pub kind: TrackKind,
    pub track: TrackHandle,
    pub attached: bool,
}

/// Side effect for the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderAction {
    Attach {
        identity: String,
        kind: TrackKind,
        track: TrackHandle,
    },
    Detach {
        identity: String,
        kind: TrackKind,
        track: TrackHandle,
    },
}

impl RenderAction {
    #[must_use]
    pub fn identity(&self) -> &str {
        match self {
            RenderAction::Attach { identity, .. } | RenderAction::Detach { identity, .. } => {
                identity
            }
        }
    }
}

/// Read-only projection of a participant for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantView {
    pub identity: String,
    pub is_local: bool,
    /// Local playback is muted for the local participant to avoid echo.
    pub playback_muted: bool,
    pub audio: Option<TrackHandle>,
    pub video: Option<TrackHandle>,
}

/// Track state machine for one participant.
///
/// At most one publication exists per [`TrackKind`], so at most one track
/// per kind is ever attached.
#[derive(Debug)]
pub struct ParticipantTracker {
    identity: String,
    publications: BTreeMap<TrackKind, TrackPublication>,
}

impl ParticipantTracker {
    /// Create a tracker and replay attach for tracks that are already live.
    pub fn new(
        identity: impl Into<String>,
        existing_tracks: impl IntoIterator<Item = (TrackKind, TrackHandle)>,
    ) -> (Self, Vec<RenderAction>) {
        let mut tracker = Self {
            identity: identity.into(),
            publications: BTreeMap::new(),
        };

        let actions = existing_tracks
            .into_iter()
            .filter_map(|(kind, track)| tracker.on_track_subscribed(kind, track))
            .collect();

        (tracker, actions)
    }

    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    #[must_use]
    pub fn publication(&self, kind: TrackKind) -> Option<&TrackPublication> {
        self.publications.get(&kind)
    }

    #[must_use]
    pub fn is_attached(&self, kind: TrackKind) -> bool {
        self.publications.get(&kind).is_some_and(|p| p.attached)
    }

    /// Currently attached track of `kind`, if any.
    #[must_use]
    pub fn attached_track(&self, kind: TrackKind) -> Option<&TrackHandle> {
        self.publications
            .get(&kind)
            .filter(|p| p.attached)
            .map(|p| &p.track)
    }

    pub fn on_track_subscribed(
        &mut self,
        kind: TrackKind,
        track: TrackHandle,
    ) -> Option<RenderAction> {
        match self.publications.get_mut(&kind) {
            Some(publication) if publication.attached => {
                debug!(
                    target: "room.participant",
                    kind = ?kind,
                    "Duplicate track subscription ignored"
                );
                None
            }
            Some(publication) => {
                publication.track = track.clone();
                publication.attached = true;
                Some(self.attach_action(kind, track))
            }
            None => {
                self.publications.insert(
                    kind,
                    TrackPublication {
                        kind,
                        track: track.clone(),
                        attached: true,
                    },
                );
                Some(self.attach_action(kind, track))
            }
        }
    }

    pub fn on_track_unsubscribed(&mut self, kind: TrackKind) -> Option<RenderAction> {
        let publication = self.publications.get_mut(&kind).filter(|p| p.attached)?;
        publication.attached = false;

        Some(RenderAction::Detach {
            identity: self.identity.clone(),
            kind,
            track: publication.track.clone(),
        })
    }

    /// Detach every attached publication, consuming the tracker.
    pub fn teardown(self) -> Vec<RenderAction> {
        let identity = self.identity;
        self.publications
            .into_values()
            .filter(|p| p.attached)
            .map(|p| RenderAction::Detach {
                identity: identity.clone(),
                kind: p.kind,
                track: p.track,
            })
            .collect()
    }

    fn attach_action(&self, kind: TrackKind, track: TrackHandle) -> RenderAction {
        RenderAction::Attach {
            identity: self.identity.clone(),
            kind,
            track,
        }
    }
}
