//! # Chatroster
//!
//! A Rust library for turning free-text group chat exports into a
//! per-participant roster: who said what and when, who is still in the
//! group, and when each member was last seen.
//!
//! ## Overview
//!
//! Chat exports come in several incompatible layouts. Chatroster reads the
//! two WhatsApp conventions and their variants:
//! - **Android** - `12/05/23, 10:30 am - Alice: hello`
//! - **iOS** - `[12/05/2023, 10:30:15 AM] Alice: hello`
//! - 24-hour and with-seconds variants of both
//!
//! Dates come out as `DD/MM/YYYY`, times as 24-hour `HH:MM`. Membership
//! notices (`Bob left`, `Alice added Carol`) update presence. Lines that fit
//! nowhere are skipped, never fatal.
//!
//! ## Quick Start
//!
//! ```rust
//! use chatroster::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let transcript = ChatNormalizer::new().normalize_str(
//!         "12/05/23, 10:30 am - Alice: hello @99\n\
//!          12/05/23, 10:31 am - Bob left",
//!     )?;
//!
//!     for participant in transcript.participants() {
//!         println!(
//!             "{}: {} messages, present: {}",
//!             participant.identity,
//!             participant.message_count(),
//!             participant.is_present,
//!         );
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Choosing a Dialect
//!
//! By default every known [`Dialect`](config::Dialect) is tried and the first
//! under which some line reads as a message wins. Fix it when you know the
//! source:
//!
//! ```rust
//! use chatroster::prelude::*;
//!
//! let config = NormalizerConfig::new().with_dialect(Dialect::iphone());
//! let transcript = ChatNormalizer::with_config(config)
//!     .normalize_str("[12/05/2023, 10:30:15 AM] Carol: yo")?;
//! assert_eq!(transcript.participants[0].messages[0].time, "10:30");
//! # Ok::<(), ChatrosterError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`normalizer`] - [`ChatNormalizer`](normalizer::ChatNormalizer), [`Transcript`](normalizer::Transcript), [`ParseStats`](normalizer::ParseStats)
//! - [`ingest`] - upload entry point that reports "no usable data"
//! - [`config`] - [`Dialect`](config::Dialect), [`NormalizerConfig`](config::NormalizerConfig)
//! - [`parsing`] - line classification, date/time normalization, mentions
//! - [`core`] - participant tracking and output writers
//! - [`observer`] - per-line diagnostics
//! - [`format`] - [`OutputFormat`](format::OutputFormat)
//! - [`error`] - [`ChatrosterError`], [`Result`]
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod ingest;
pub mod message;
pub mod normalizer;
pub mod observer;
pub mod parsing;

// Re-export the main types at the crate root for convenience
pub use error::{ChatrosterError, Result};
pub use message::{LastSeen, Message, Participant};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatroster::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{LastSeen, Message, Participant};

    // Error types
    pub use crate::error::{ChatrosterError, Result};

    // Configuration
    pub use crate::config::{Delimiter, Dialect, DialectChoice, MentionStyle, NormalizerConfig};

    // Normalization
    pub use crate::ingest::{IngestSummary, ingest_file, ingest_str};
    pub use crate::normalizer::{ChatNormalizer, ParseStats, Transcript};
    pub use crate::observer::{LineObserver, NoopObserver, SkipReason, TracingObserver};

    // Output
    pub use crate::format::{OutputFormat, to_format_string, write_to_format};
}
