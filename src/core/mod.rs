//! Core roster logic for chatroster.
//!
//! This module contains:
//! - [`roster`] - Participant state tracking (presence and last-seen)
//! - [`output`] - Format writers (JSON, JSONL, CSV)
//!
//! # Quick Start
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() {
//! use chatroster::core::{
//!     Membership, ParticipantTracker,
//!     write_csv, write_json, write_jsonl,
//! };
//! # }
//! ```

pub mod output;
pub mod roster;

pub use roster::{Membership, ParticipantTracker, normalize_identity};

pub use output::{MessageRecord, records};

// Conditionally re-export output writers
#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
