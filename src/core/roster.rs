//! Participant state tracking across a transcript.
//!
//! [`ParticipantTracker`] maps identities to [`Participant`]s in
//! first-appearance order. Every event naming an identity refreshes its
//! `last_seen`; membership events flip `is_present`. Participants are never
//! removed, only marked absent.

use std::collections::HashMap;

use crate::message::{LastSeen, Message, Participant};

/// Left-to-right and right-to-left marks some exports wrap names in.
const DIRECTION_MARKS: [char; 2] = ['\u{200e}', '\u{200f}'];

/// A membership change carried by a system line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Membership {
    /// Created the group or was added
    Joined,
    /// Left or was removed
    Departed,
}

impl Membership {
    pub fn is_departure(self) -> bool {
        self == Membership::Departed
    }
}

/// Trims spaces and direction marks so that `"\u{200e}Bob "` and `"Bob"`
/// name the same participant.
pub fn normalize_identity(identity: &str) -> &str {
    identity.trim_matches(|c: char| c == ' ' || DIRECTION_MARKS.contains(&c))
}

/// Per-transcript participant map.
///
/// # Example
///
/// ```rust
/// use chatroster::core::roster::{Membership, ParticipantTracker};
///
/// let mut tracker = ParticipantTracker::new();
/// tracker.touch("Bob", "12/05/2023", "10:30", None);
/// tracker.touch("\u{200e}Bob", "12/05/2023", "10:31", Some(Membership::Departed));
///
/// let roster = tracker.into_participants();
/// assert_eq!(roster.len(), 1);
/// assert!(!roster[0].is_present);
/// assert_eq!(roster[0].last_seen.to_string(), "12/05/2023 10:31");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ParticipantTracker {
    participants: Vec<Participant>,
    index: HashMap<String, usize>,
    excluded: Option<String>,
}

impl ParticipantTracker {
    /// Creates an empty tracker that keeps every identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tracker that silently ignores `alias` (the device owner
    /// placeholder in exports that cannot name the owner).
    pub fn excluding(alias: impl Into<String>) -> Self {
        Self {
            excluded: Some(alias.into()),
            ..Self::default()
        }
    }

    /// Records an event naming `identity` at `date`/`time`.
    ///
    /// Creates the participant if needed (present unless `membership` is a
    /// departure), overwrites `last_seen`, and applies `membership` if given.
    /// Returns `None` for the excluded owner alias and for identities that
    /// are empty after normalization.
    pub fn touch(
        &mut self,
        identity: &str,
        date: &str,
        time: &str,
        membership: Option<Membership>,
    ) -> Option<&mut Participant> {
        let identity = normalize_identity(identity);
        if identity.is_empty() || self.excluded.as_deref() == Some(identity) {
            return None;
        }

        let seen = LastSeen::new(date, time);
        let idx = match self.index.get(identity) {
            Some(&idx) => {
                let participant = &mut self.participants[idx];
                participant.last_seen = seen;
                if let Some(membership) = membership {
                    participant.is_present = !membership.is_departure();
                }
                idx
            }
            None => {
                let present = !membership.is_some_and(Membership::is_departure);
                self.participants
                    .push(Participant::new(identity, seen, present));
                self.index
                    .insert(identity.to_string(), self.participants.len() - 1);
                self.participants.len() - 1
            }
        };

        Some(&mut self.participants[idx])
    }

    /// Touches `identity` as a sender and appends `message` to its list.
    ///
    /// A message never changes presence. Returns `false` when the identity is
    /// excluded and the message was dropped.
    pub fn record_message(&mut self, identity: &str, message: Message) -> bool {
        match self.touch(identity, &message.date, &message.time, None) {
            Some(participant) => {
                participant.messages.push(message);
                true
            }
            None => false,
        }
    }

    /// Looks up a participant by (un-normalized) identity.
    pub fn get(&self, identity: &str) -> Option<&Participant> {
        self.index
            .get(normalize_identity(identity))
            .map(|&idx| &self.participants[idx])
    }

    /// Number of distinct participants seen so far.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Participants in first-appearance order.
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Consumes the tracker, returning participants in first-appearance order.
    pub fn into_participants(self) -> Vec<Participant> {
        self.participants
    }
}
