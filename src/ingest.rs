//! Upload-facing entry point.
//!
//! The normalizer treats an empty roster as a valid result. Callers that
//! ingest uploaded transcripts need to tell "nothing usable in this file"
//! apart from a genuine failure, so this layer turns an empty roster into
//! [`ChatrosterError::NoUsableData`] and summarizes the rest.

use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::{ChatrosterError, Result};
use crate::normalizer::{ChatNormalizer, Transcript};

/// Headline numbers for an ingested transcript.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub participants: usize,
    pub messages: usize,
    /// Participants still in the group at the end of the transcript
    pub present: usize,
    /// Participants who left or were removed
    pub departed: usize,
}

impl IngestSummary {
    /// Computes the summary of a transcript.
    pub fn of(transcript: &Transcript) -> Self {
        let present = transcript
            .participants
            .iter()
            .filter(|p| p.is_present)
            .count();

        Self {
            participants: transcript.participants.len(),
            messages: transcript.message_count(),
            present,
            departed: transcript.participants.len() - present,
        }
    }
}

/// Normalizes `text`, rejecting a transcript with no participants.
///
/// # Example
///
/// ```rust
/// use chatroster::ingest::ingest_str;
/// use chatroster::normalizer::ChatNormalizer;
///
/// let normalizer = ChatNormalizer::new();
/// let (_, summary) = ingest_str(&normalizer, "12/05/23, 10:30 am - Alice: hi")?;
/// assert_eq!(summary.participants, 1);
///
/// let err = ingest_str(&normalizer, "nothing to see").unwrap_err();
/// assert!(err.is_no_usable_data());
/// # Ok::<(), chatroster::ChatrosterError>(())
/// ```
pub fn ingest_str(normalizer: &ChatNormalizer, text: &str) -> Result<(Transcript, IngestSummary)> {
    let transcript = normalizer.normalize_str(text)?;
    summarize(transcript, None)
}

/// Normalizes the transcript at `path`, rejecting one with no participants.
pub fn ingest_file(
    normalizer: &ChatNormalizer,
    path: impl AsRef<Path>,
) -> Result<(Transcript, IngestSummary)> {
    let path = path.as_ref();
    let transcript = normalizer.normalize_file(path)?;
    summarize(transcript, Some(path))
}

fn summarize(transcript: Transcript, path: Option<&Path>) -> Result<(Transcript, IngestSummary)> {
    if transcript.is_empty() {
        warn!(
            path = ?path,
            lines = transcript.stats.lines,
            "no participants found in transcript"
        );
        return Err(ChatrosterError::no_usable_data(path.map(Path::to_path_buf)));
    }

    let summary = IngestSummary::of(&transcript);
    info!(
        participants = summary.participants,
        messages = summary.messages,
        present = summary.present,
        departed = summary.departed,
        dialect = %transcript.dialect,
        "ingested transcript"
    );
    Ok((transcript, summary))
}
