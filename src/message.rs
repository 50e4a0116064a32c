//! Participant and message types.
//!
//! These types serialize to the persisted contract consumed by storage and
//! analytics:
//!
//! ```json
//! {
//!   "id": "Alice",
//!   "messages": [
//!     {"date": "12/05/2023", "time_stamp": "10:30", "message": "hello @99", "tagged": ["99"]}
//!   ],
//!   "last_seen": "12/05/2023 10:30",
//!   "is_present_in_group": true
//! }
//! ```
//!
//! Field names and the date/time string formats are part of that contract.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One chat message, owned by the [`Participant`] who sent it.
///
/// `date` is `DD/MM/YYYY` and `time` is `HH:MM` unless the source token could
/// not be resolved, in which case the token is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Canonical date (`DD/MM/YYYY`) or the raw token
    pub date: String,

    /// Canonical 24-hour time (`HH:MM`) or the raw token
    #[serde(rename = "time_stamp")]
    pub time: String,

    /// Message text, untouched by mention extraction
    #[serde(rename = "message")]
    pub body: String,

    /// Mention tokens in order of occurrence, `None` if there are none
    #[serde(rename = "tagged")]
    pub mentions: Option<Vec<String>>,
}

impl Message {
    /// Creates a message without mentions.
    pub fn new(date: impl Into<String>, time: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            body: body.into(),
            mentions: None,
        }
    }

    /// Builder-style method to set mentions. An empty list is stored as `None`.
    #[must_use]
    pub fn with_mentions(mut self, mentions: Vec<String>) -> Self {
        self.mentions = if mentions.is_empty() {
            None
        } else {
            Some(mentions)
        };
        self
    }

    /// Returns the mentions as a slice (empty when there are none).
    pub fn mentions(&self) -> &[String] {
        self.mentions.as_deref().unwrap_or_default()
    }

    /// Returns `true` if the message mentions anyone.
    pub fn has_mentions(&self) -> bool {
        self.mentions.as_ref().is_some_and(|m| !m.is_empty())
    }
}

/// Date and time of the most recent event naming a participant.
///
/// Serialized as a single space-joined string: `"12/05/2023 10:31"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct LastSeen {
    /// Canonical date or the raw token
    pub date: String,
    /// Canonical time or the raw token
    pub time: String,
}

impl LastSeen {
    pub fn new(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
        }
    }
}

impl fmt::Display for LastSeen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.date, self.time)
    }
}

impl From<LastSeen> for String {
    fn from(seen: LastSeen) -> Self {
        seen.to_string()
    }
}

impl From<String> for LastSeen {
    // Canonical dates never contain spaces, so the first space is the split.
    fn from(s: String) -> Self {
        match s.split_once(' ') {
            Some((date, time)) => LastSeen::new(date, time),
            None => LastSeen::new(s, String::new()),
        }
    }
}

/// A member of the chat and everything they sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Normalized identity (display name or phone number)
    #[serde(rename = "id")]
    pub identity: String,

    /// Messages in input order
    pub messages: Vec<Message>,

    /// Most recent event naming this participant
    pub last_seen: LastSeen,

    /// Whether the most recent membership event left them in the group
    #[serde(rename = "is_present_in_group")]
    pub is_present: bool,
}

impl Participant {
    /// Creates a participant with no messages yet.
    pub fn new(identity: impl Into<String>, last_seen: LastSeen, is_present: bool) -> Self {
        Self {
            identity: identity.into(),
            messages: Vec::new(),
            last_seen,
            is_present,
        }
    }

    /// Number of messages sent.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}
