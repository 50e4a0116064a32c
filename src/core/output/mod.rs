//! Output format writers.
//!
//! - [`write_json`] / [`to_json`] - the participant roster as a JSON array - requires `json-output` feature
//! - [`write_jsonl`] / [`to_jsonl`] - one [`MessageRecord`] per line - requires `json-output` feature
//! - [`write_csv`] / [`to_csv`] - [`MessageRecord`]s, semicolon-delimited - requires `csv-output` feature
//!
//! # Choosing a Format
//!
//! | Format | Shape | Use Case |
//! |--------|-------|----------|
//! | JSON | participant roster | storage, the persisted contract |
//! | JSONL | flat message records | bulk inserts, streaming consumers |
//! | CSV | flat message records | spreadsheets, quick analysis |
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> chatroster::Result<()> {
//! use chatroster::core::output::{to_csv, write_json, write_jsonl};
//! use chatroster::normalizer::ChatNormalizer;
//!
//! let transcript = ChatNormalizer::new().normalize_file("chat.txt")?;
//!
//! write_json(&transcript.participants, "roster.json")?;
//! write_jsonl(&transcript.participants, "messages.jsonl")?;
//! let csv_string = to_csv(&transcript.participants)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};

use serde::Serialize;

use crate::message::Participant;

/// One message flattened together with its sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRecord<'a> {
    pub user_id: &'a str,
    pub date: &'a str,
    pub time_stamp: &'a str,
    pub message: &'a str,
    pub tagged: Option<&'a [String]>,
}

/// Flattens a roster into message records, participant by participant.
pub fn records(participants: &[Participant]) -> impl Iterator<Item = MessageRecord<'_>> {
    participants.iter().flat_map(|participant| {
        participant.messages.iter().map(move |msg| MessageRecord {
            user_id: &participant.identity,
            date: &msg.date,
            time_stamp: &msg.time,
            message: &msg.body,
            tagged: msg.mentions.as_deref(),
        })
    })
}
