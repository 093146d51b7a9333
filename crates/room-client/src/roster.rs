//! Authoritative participant set for one room session.
//!
//! [`ParticipantSet`] is a reducer over [`TransportEvent`]s. It owns every
//! participant and its [`ParticipantTracker`]; nothing else holds a
//! reference to a participant, only its identity.

use crate::participant::{ParticipantTracker, ParticipantView, RenderAction, TrackKind};
use crate::transport::{RemoteParticipant, TrackHandle, TransportEvent};
use tracing::debug;

#[derive(Debug)]
struct Member {
    is_local: bool,
    tracker: ParticipantTracker,
}

impl Member {
    fn view(&self) -> ParticipantView {
        ParticipantView {
            identity: self.tracker.identity().to_string(),
            is_local: self.is_local,
            playback_muted: self.is_local,
            audio: self.tracker.attached_track(TrackKind::Audio).cloned(),
            video: self.tracker.attached_track(TrackKind::Video).cloned(),
        }
    }
}

/// Room members in insertion order, unique by identity.
#[derive(Debug, Default)]
pub struct ParticipantSet {
    members: Vec<Member>,
}

impl ParticipantSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn contains(&self, identity: &str) -> bool {
        self.position(identity).is_some()
    }

    /// Add a participant unless one with the same identity is present.
    ///
    /// Returns the attach actions replayed for tracks the participant
    /// already has.
    pub fn insert(&mut self, participant: RemoteParticipant, is_local: bool) -> Vec<RenderAction> {
        if self.contains(&participant.identity) {
            debug!(
                target: "room.roster",
                is_local = is_local,
                "Duplicate participant connect ignored"
            );
            return Vec::new();
        }

        let (tracker, actions) = ParticipantTracker::new(participant.identity, participant.tracks);
        self.members.push(Member { is_local, tracker });
        actions
    }

    /// Remove a participant and detach its tracks. Unknown identities are
    /// ignored.
    pub fn remove(&mut self, identity: &str) -> Vec<RenderAction> {
        match self.position(identity) {
            Some(index) => self.members.remove(index).tracker.teardown(),
            None => {
                debug!(target: "room.roster", "Disconnect for unknown participant ignored");
                Vec::new()
            }
        }
    }

    pub fn on_track_subscribed(
        &mut self,
        identity: &str,
        kind: TrackKind,
        track: TrackHandle,
    ) -> Option<RenderAction> {
        match self.member_mut(identity) {
            Some(member) => member.tracker.on_track_subscribed(kind, track),
            None => {
                debug!(
                    target: "room.roster",
                    kind = ?kind,
                    "Track subscription for unknown participant ignored"
                );
                None
            }
        }
    }

    pub fn on_track_unsubscribed(&mut self, identity: &str, kind: TrackKind) -> Option<RenderAction> {
        self.member_mut(identity)?.tracker.on_track_unsubscribed(kind)
    }

    /// Apply one transport event, returning the resulting render actions.
    ///
    /// `Disconnected` is a session-level event and leaves the set
    /// untouched; the owner decides when to [`clear`](Self::clear).
    pub fn apply(&mut self, event: TransportEvent) -> Vec<RenderAction> {
        match event {
            TransportEvent::ParticipantConnected { participant } => self.insert(participant, false),
            TransportEvent::ParticipantDisconnected { identity } => self.remove(&identity),
            TransportEvent::TrackSubscribed {
                identity,
                kind,
                track,
            } => self
                .on_track_subscribed(&identity, kind, track)
                .into_iter()
                .collect(),
            TransportEvent::TrackUnsubscribed { identity, kind, .. } => self
                .on_track_unsubscribed(&identity, kind)
                .into_iter()
                .collect(),
            TransportEvent::Disconnected { .. } => Vec::new(),
        }
    }

    /// Remove every participant, detaching all attached tracks.
    pub fn clear(&mut self) -> Vec<RenderAction> {
        self.members
            .drain(..)
            .flat_map(|member| member.tracker.teardown())
            .collect()
    }

    /// Renderable snapshot in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<ParticipantView> {
        self.members.iter().map(Member::view).collect()
    }

    fn position(&self, identity: &str) -> Option<usize> {
        self.members
            .iter()
            .position(|m| m.tracker.identity() == identity)
    }

    fn member_mut(&mut self, identity: &str) -> Option<&mut Member> {
        self.members
            .iter_mut()
            .find(|m| m.tracker.identity() == identity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn connected(identity: &str) -> TransportEvent {
        TransportEvent::ParticipantConnected {
            participant: RemoteParticipant::new(identity),
        }
    }

    fn disconnected(identity: &str) -> TransportEvent {
        TransportEvent::ParticipantDisconnected {
            identity: identity.to_string(),
        }
    }

    fn subscribed(identity: &str, kind: TrackKind, sid: &str) -> TransportEvent {
        TransportEvent::TrackSubscribed {
            identity: identity.to_string(),
            kind,
            track: TrackHandle::new(sid),
        }
    }

    fn unsubscribed(identity: &str, kind: TrackKind, sid: &str) -> TransportEvent {
        TransportEvent::TrackUnsubscribed {
            identity: identity.to_string(),
            kind,
            track: TrackHandle::new(sid),
        }
    }

    #[test]
    fn test_duplicate_connect_keeps_one_entry() {
        let mut set = ParticipantSet::new();
        set.apply(connected("bob"));
        set.apply(connected("bob"));

        assert_eq!(set.len(), 1);
        assert_eq!(set.snapshot()[0].identity, "bob");
    }

    #[test]
    fn test_bob_connects_twice_then_leaves() {
        let mut set = ParticipantSet::new();
        set.apply(connected("bob"));
        set.apply(connected("bob"));
        set.apply(disconnected("bob"));

        assert!(set.is_empty());
    }

    #[test]
    fn test_disconnect_unknown_is_noop() {
        let mut set = ParticipantSet::new();
        set.apply(connected("bob"));

        assert!(set.apply(disconnected("carol")).is_empty());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut set = ParticipantSet::new();
        set.insert(RemoteParticipant::new("alice"), true);
        for identity in ["carol", "bob", "dave"] {
            set.apply(connected(identity));
        }
        set.apply(disconnected("bob"));
        set.apply(connected("bob"));

        let order: Vec<_> = set.snapshot().into_iter().map(|v| v.identity).collect();
        assert_eq!(order, vec!["alice", "carol", "dave", "bob"]);
    }

    #[test]
    fn test_local_participant_playback_muted() {
        let mut set = ParticipantSet::new();
        set.insert(RemoteParticipant::new("alice"), true);
        set.apply(connected("bob"));

        let snapshot = set.snapshot();
        assert!(snapshot[0].is_local && snapshot[0].playback_muted);
        assert!(!snapshot[1].is_local && !snapshot[1].playback_muted);
    }

    #[test]
    fn test_connect_with_existing_tracks_replays_attach() {
        let mut set = ParticipantSet::new();
        let actions = set.apply(TransportEvent::ParticipantConnected {
            participant: RemoteParticipant::new("bob")
                .with_track(TrackKind::Audio, TrackHandle::new("TR_a")),
        });

        assert_eq!(
            actions,
            vec![RenderAction::Attach {
                identity: "bob".to_string(),
                kind: TrackKind::Audio,
                track: TrackHandle::new("TR_a"),
            }]
        );
        assert_eq!(set.snapshot()[0].audio, Some(TrackHandle::new("TR_a")));
    }

    #[test]
    fn test_track_events_delegate_to_tracker() {
        let mut set = ParticipantSet::new();
        set.apply(connected("bob"));

        assert_eq!(set.apply(subscribed("bob", TrackKind::Video, "TR_v")).len(), 1);
        assert!(set.apply(subscribed("bob", TrackKind::Video, "TR_v")).is_empty());
        assert_eq!(set.snapshot()[0].video, Some(TrackHandle::new("TR_v")));

        assert_eq!(set.apply(unsubscribed("bob", TrackKind::Video, "TR_v")).len(), 1);
        assert_eq!(set.snapshot()[0].video, None);
    }

    #[test]
    fn test_track_events_for_unknown_identity_ignored() {
        let mut set = ParticipantSet::new();

        assert!(set.apply(subscribed("ghost", TrackKind::Audio, "TR_a")).is_empty());
        assert!(set.apply(unsubscribed("ghost", TrackKind::Audio, "TR_a")).is_empty());
        assert!(set.is_empty());
    }

    #[test]
    fn test_remove_detaches_tracks() {
        let mut set = ParticipantSet::new();
        set.apply(connected("bob"));
        set.apply(subscribed("bob", TrackKind::Audio, "TR_a"));

        let actions = set.apply(disconnected("bob"));
        assert_eq!(
            actions,
            vec![RenderAction::Detach {
                identity: "bob".to_string(),
                kind: TrackKind::Audio,
                track: TrackHandle::new("TR_a"),
            }]
        );
    }

    #[test]
    fn test_clear_detaches_everything() {
        let mut set = ParticipantSet::new();
        set.insert(
            RemoteParticipant::new("alice").with_track(TrackKind::Audio, TrackHandle::new("L_a")),
            true,
        );
        set.apply(connected("bob"));
        set.apply(subscribed("bob", TrackKind::Audio, "TR_a"));
        set.apply(subscribed("bob", TrackKind::Video, "TR_v"));
        set.apply(unsubscribed("bob", TrackKind::Audio, "TR_a"));

        let actions = set.clear();
        assert!(set.is_empty());
        assert_eq!(actions.len(), 2);
        assert!(actions
            .iter()
            .all(|a| matches!(a, RenderAction::Detach { .. })));
        assert_eq!(actions[0].identity(), "alice");
        assert_eq!(actions[1].identity(), "bob");
    }

    #[test]
    fn test_transport_disconnected_leaves_set_untouched() {
        let mut set = ParticipantSet::new();
        set.apply(connected("bob"));

        let actions = set.apply(TransportEvent::Disconnected {
            reason: "network".to_string(),
        });
        assert!(actions.is_empty());
        assert!(set.contains("bob"));
    }
}
