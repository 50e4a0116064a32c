//! Line-level parsing shared by every dialect.
//!
//! - [`classify`] - what kind of line this is
//! - [`datetime`] - canonical dates and times
//! - [`mentions`] - sender, body and `@` mentions of a message line

pub mod classify;
pub mod datetime;
pub mod mentions;

// Re-export commonly used items
pub use classify::{LineError, LineGrammar, LineKind, MembershipEvent, TemplateKind};
pub use datetime::{is_canonical_date, is_canonical_time, normalize_date, normalize_time};
pub use mentions::{ExtractedMessage, extract, find_mentions};
