//! Sender/body isolation and mention extraction for message lines.

use std::sync::LazyLock;

use regex::Regex;

use crate::config::MentionStyle;
use crate::core::roster::normalize_identity;

// @919876543210
static DIGIT_MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@(\d+)").unwrap());

// @alice.smith, @Team-Lead
static TOKEN_MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@([^\s@]+)").unwrap());

/// Sender and body of a message line, ready to become a [`Message`](crate::Message).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedMessage {
    /// Normalized sender identity
    pub sender: String,
    /// Trimmed body, otherwise unchanged
    pub body: String,
    /// Mentions in order of occurrence, `None` if there are none
    pub mentions: Option<Vec<String>>,
}

/// Isolates sender and body and collects the mentions in the body.
///
/// # Example
///
/// ```rust
/// use chatroster::config::MentionStyle;
/// use chatroster::parsing::mentions::extract;
///
/// let msg = extract(" Alice ", "hi @123 and @456 ", MentionStyle::Digits);
/// assert_eq!(msg.sender, "Alice");
/// assert_eq!(msg.body, "hi @123 and @456");
/// assert_eq!(msg.mentions, Some(vec!["123".to_string(), "456".to_string()]));
/// ```
pub fn extract(sender: &str, body: &str, style: MentionStyle) -> ExtractedMessage {
    let body = body.trim();
    let mentions = find_mentions(body, style);

    ExtractedMessage {
        sender: normalize_identity(sender).to_string(),
        body: body.to_string(),
        mentions: if mentions.is_empty() {
            None
        } else {
            Some(mentions)
        },
    }
}

/// Returns every mention in `body`, first to last, without the `@`.
pub fn find_mentions(body: &str, style: MentionStyle) -> Vec<String> {
    let pattern = match style {
        MentionStyle::Digits => &*DIGIT_MENTION,
        MentionStyle::Token => &*TOKEN_MENTION,
    };

    pattern
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}
