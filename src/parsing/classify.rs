//! Line classification.
//!
//! Every transcript line is one of:
//!
//! - a chat message: `12/05/23, 10:30 am - Alice: hello`
//! - a membership notice: `12/05/23, 10:31 am - Bob left`
//! - noise: blank lines and the end-to-end encryption banner
//! - unrecognized: anything else, including continuation lines of
//!   multi-line messages
//!
//! The layout of the timestamp prefix comes from the active [`Dialect`];
//! nothing is guessed per line.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::config::{Delimiter, Dialect};
use crate::core::roster::{Membership, normalize_identity};
use crate::error::ChatrosterError;

/// Banner WhatsApp writes at the top of every export.
pub const ENCRYPTION_NOTICE: &str = "Messages and calls are end-to-end encrypted";

/// Left-to-right mark. iOS exports put it in front of system notices.
const LRM: char = '\u{200e}';

/// Byte order mark and direction marks that may lead a line.
const LEADING_MARKS: [char; 3] = ['\u{feff}', LRM, '\u{200f}'];

const DATE_TOKEN: &str = r"(\d{1,2}/\d{1,2}/\d{2,4})";

// Sender runs up to the first colon; the body must not be empty.
static SENDER_BODY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([^:]+):\s*(.+)$").unwrap());

/// Membership templates, in the order they are tried. First match wins.
static TEMPLATES: LazyLock<Vec<(TemplateKind, Regex)>> = LazyLock::new(|| {
    [
        (TemplateKind::CreatedGroup, r#"(.+) created group ["“]([^"”]+)["”]"#),
        (TemplateKind::Added, r"(.+) added (.+)"),
        (TemplateKind::Left, r"(.+) left"),
        (TemplateKind::Removed, r"(.+) removed (.+)"),
        (TemplateKind::YouWereAdded, r"You were added"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).unwrap()))
    .collect()
});

/// Which membership template a system line matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// `<name> created group "<group>"`
    CreatedGroup,
    /// `<name> added <name>`
    Added,
    /// `<name> left`
    Left,
    /// `<name> removed <name>`
    Removed,
    /// `You were added`
    YouWereAdded,
}

impl TemplateKind {
    /// Membership change this template applies to its subject.
    pub fn membership(self) -> Option<Membership> {
        match self {
            TemplateKind::CreatedGroup | TemplateKind::Added => Some(Membership::Joined),
            TemplateKind::Left | TemplateKind::Removed => Some(Membership::Departed),
            TemplateKind::YouWereAdded => None,
        }
    }
}

/// A matched membership notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipEvent<'a> {
    /// Template that matched
    pub kind: TemplateKind,
    /// Affected identity (the object of added/removed, else the actor);
    /// `None` for `You were added`
    pub subject: Option<&'a str>,
}

impl MembershipEvent<'_> {
    /// Membership change carried by this event.
    pub fn membership(&self) -> Option<Membership> {
        self.kind.membership()
    }
}

/// Classification of one transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `date, time - sender: body`
    Message {
        date: &'a str,
        time: &'a str,
        sender: &'a str,
        body: &'a str,
    },
    /// `date, time - <membership notice>`
    System {
        date: &'a str,
        time: &'a str,
        event: MembershipEvent<'a>,
    },
    /// Blank line or encryption banner
    Noise,
    /// Anything else
    Unrecognized,
}

/// Why a line that looked parseable could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    /// A capture group the grammar guarantees was missing
    #[error("missing {0} in matched line")]
    MissingCapture(&'static str),
    /// Sender was nothing but whitespace or direction marks
    #[error("empty sender")]
    EmptySender,
    /// A membership template matched but named nobody
    #[error("membership notice names no participant")]
    EmptySubject,
}

/// Compiled line layout for one [`Dialect`].
#[derive(Debug, Clone)]
pub struct LineGrammar {
    dialect: Dialect,
    prefix: Regex,
}

impl LineGrammar {
    /// Compiles the prefix pattern for `dialect`.
    pub fn new(dialect: Dialect) -> Result<Self, ChatrosterError> {
        let prefix = Regex::new(&prefix_pattern(dialect))
            .map_err(|e| ChatrosterError::invalid_format("WhatsApp TXT", e.to_string()))?;
        Ok(Self { dialect, prefix })
    }

    /// The dialect this grammar was built for.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Classifies one line. Surrounding whitespace and any leading byte order
    /// or direction marks are dropped first.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chatroster::config::Dialect;
    /// use chatroster::parsing::classify::{LineGrammar, LineKind};
    ///
    /// let grammar = LineGrammar::new(Dialect::android())?;
    /// let kind = grammar.classify("12/05/23, 10:30 am - Alice: hello")?;
    /// assert!(matches!(kind, LineKind::Message { sender: "Alice", .. }));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn classify<'a>(&self, line: &'a str) -> Result<LineKind<'a>, LineError> {
        let line = line
            .trim()
            .trim_start_matches(|c: char| c.is_whitespace() || LEADING_MARKS.contains(&c));
        if line.is_empty() || line.contains(ENCRYPTION_NOTICE) {
            return Ok(LineKind::Noise);
        }

        let Some(caps) = self.prefix.captures(line) else {
            return Ok(LineKind::Unrecognized);
        };
        let date = caps.get(1).ok_or(LineError::MissingCapture("date"))?.as_str();
        let time = caps.get(2).ok_or(LineError::MissingCapture("time"))?.as_str();
        let rest = caps.get(3).ok_or(LineError::MissingCapture("text"))?.as_str();

        if let Some(parts) = SENDER_BODY.captures(rest) {
            let sender = parts.get(1).ok_or(LineError::MissingCapture("sender"))?.as_str();
            let body = parts.get(2).ok_or(LineError::MissingCapture("body"))?.as_str();

            // iOS attributes notices to the group itself: "[..] Team: ‎Bob left".
            if self.dialect.delimiter == Delimiter::Bracket {
                if let Some(notice) = body.strip_prefix(LRM) {
                    if let Some(event) = match_template(notice)? {
                        return Ok(LineKind::System { date, time, event });
                    }
                }
            }

            if normalize_identity(sender).is_empty() {
                return Err(LineError::EmptySender);
            }
            return Ok(LineKind::Message {
                date,
                time,
                sender,
                body,
            });
        }

        match match_template(rest)? {
            Some(event) => Ok(LineKind::System { date, time, event }),
            None => Ok(LineKind::Unrecognized),
        }
    }
}

/// Matches `text` against the membership templates in priority order.
pub fn match_template(text: &str) -> Result<Option<MembershipEvent<'_>>, LineError> {
    let Some((kind, caps)) = TEMPLATES
        .iter()
        .find_map(|(kind, regex)| regex.captures(text).map(|caps| (*kind, caps)))
    else {
        return Ok(None);
    };

    let subject = match kind {
        TemplateKind::YouWereAdded => None,
        TemplateKind::Added | TemplateKind::Removed => {
            Some(caps.get(2).ok_or(LineError::MissingCapture("object"))?.as_str())
        }
        TemplateKind::CreatedGroup | TemplateKind::Left => {
            Some(caps.get(1).ok_or(LineError::MissingCapture("subject"))?.as_str())
        }
    };

    if subject.is_some_and(|s| normalize_identity(s).is_empty()) {
        return Err(LineError::EmptySubject);
    }

    Ok(Some(MembershipEvent { kind, subject }))
}

fn prefix_pattern(dialect: Dialect) -> String {
    let seconds = if dialect.seconds { r":\d{2}" } else { "" };
    let meridiem = if dialect.meridiem {
        r"\s*[AaPp]\.?\s?[Mm]\.?"
    } else {
        ""
    };
    let time = format!(r"(\d{{1,2}}:\d{{2}}{seconds}{meridiem})");

    match dialect.delimiter {
        // [12/05/2023, 10:30:15 AM] Alice: hello
        Delimiter::Bracket => format!(r"^\[{DATE_TOKEN},\s*{time}\]\s*(.+)$"),
        // 12/05/23, 10:30 am - Alice: hello
        Delimiter::Hyphen => format!(r"^{DATE_TOKEN},\s*{time}\s*-\s*(.+)$"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn android() -> LineGrammar {
        LineGrammar::new(Dialect::android()).unwrap()
    }

    fn iphone() -> LineGrammar {
        LineGrammar::new(Dialect::iphone()).unwrap()
    }

    #[test]
    fn test_android_message() {
        let kind = android()
            .classify("12/05/23, 10:30 am - Alice: hello @99")
            .unwrap();
        assert_eq!(
            kind,
            LineKind::Message {
                date: "12/05/23",
                time: "10:30 am",
                sender: "Alice",
                body: "hello @99",
            }
        );
    }

    #[test]
    fn test_iphone_message() {
        let kind = iphone()
            .classify("[12/05/2023, 10:30:15 AM] Carol: yo")
            .unwrap();
        assert_eq!(
            kind,
            LineKind::Message {
                date: "12/05/2023",
                time: "10:30:15 AM",
                sender: "Carol",
                body: "yo",
            }
        );
    }

    #[test]
    fn test_narrow_space_before_meridiem() {
        let kind = iphone()
            .classify("[12/05/2023, 10:30:15\u{202f}PM] Carol: yo")
            .unwrap();
        assert!(matches!(kind, LineKind::Message { sender: "Carol", .. }));
    }

    #[test]
    fn test_body_keeps_later_colons() {
        let kind = android()
            .classify("12/05/23, 10:30 am - Alice: meet at 10:45: room 2")
            .unwrap();
        assert!(matches!(
            kind,
            LineKind::Message {
                body: "meet at 10:45: room 2",
                ..
            }
        ));
    }

    #[test]
    fn test_noise() {
        let g = android();
        assert_eq!(g.classify("").unwrap(), LineKind::Noise);
        assert_eq!(g.classify("   ").unwrap(), LineKind::Noise);
        assert_eq!(
            g.classify(
                "12/05/23, 10:00 am - Messages and calls are end-to-end encrypted. No one outside of this chat can read them."
            )
            .unwrap(),
            LineKind::Noise
        );
    }

    #[test]
    fn test_unrecognized() {
        let g = android();
        assert_eq!(g.classify("just a continuation line").unwrap(), LineKind::Unrecognized);
        assert_eq!(
            g.classify("12/05/23, 10:30 am - Alice changed the subject to \"Hikes\"")
                .unwrap(),
            LineKind::Unrecognized
        );
        assert_eq!(
            g.classify("12/05/23, 10:30 am - Alice:").unwrap(),
            LineKind::Unrecognized
        );
    }

    #[test]
    fn test_dialect_is_strict() {
        // 24-hour line under a 12-hour dialect
        assert_eq!(
            android().classify("12/05/23, 10:30 - Alice: hi").unwrap(),
            LineKind::Unrecognized
        );
        // Seconds under a no-seconds dialect
        assert_eq!(
            android().classify("12/05/23, 10:30:15 am - Alice: hi").unwrap(),
            LineKind::Unrecognized
        );
        // Hyphen line under a bracket dialect
        assert_eq!(
            iphone().classify("12/05/23, 10:30 am - Alice: hi").unwrap(),
            LineKind::Unrecognized
        );
    }

    #[test]
    fn test_system_left() {
        let kind = android().classify("12/05/23, 10:31 am - Bob left").unwrap();
        let LineKind::System { date, time, event } = kind else {
            panic!("expected system line");
        };
        assert_eq!(date, "12/05/23");
        assert_eq!(time, "10:31 am");
        assert_eq!(event.kind, TemplateKind::Left);
        assert_eq!(event.subject, Some("Bob"));
        assert_eq!(event.membership(), Some(Membership::Departed));
    }

    #[test]
    fn test_system_added_and_removed_use_object() {
        let g = android();
        let LineKind::System { event, .. } = g.classify("12/05/23, 9:00 am - Alice added Bob").unwrap()
        else {
            panic!("expected system line");
        };
        assert_eq!(event.kind, TemplateKind::Added);
        assert_eq!(event.subject, Some("Bob"));
        assert_eq!(event.membership(), Some(Membership::Joined));

        let LineKind::System { event, .. } =
            g.classify("12/05/23, 9:05 am - Alice removed Bob").unwrap()
        else {
            panic!("expected system line");
        };
        assert_eq!(event.kind, TemplateKind::Removed);
        assert_eq!(event.subject, Some("Bob"));
        assert_eq!(event.membership(), Some(Membership::Departed));
    }

    #[test]
    fn test_created_group_wins_over_added() {
        let event = match_template("Alice created group \"Added value\"")
            .unwrap()
            .unwrap();
        assert_eq!(event.kind, TemplateKind::CreatedGroup);
        assert_eq!(event.subject, Some("Alice"));
    }

    #[test]
    fn test_you_were_added() {
        let event = match_template("You were added").unwrap().unwrap();
        assert_eq!(event.kind, TemplateKind::YouWereAdded);
        assert_eq!(event.subject, None);
        assert_eq!(event.membership(), None);
    }

    #[test]
    fn test_template_miss() {
        assert_eq!(match_template("Alice changed this group's icon").unwrap(), None);
    }

    #[test]
    fn test_iphone_notice_from_group_sender() {
        let kind = iphone()
            .classify("[12/05/2023, 10:40:00 AM] Weekend Hikes: \u{200e}Bob left")
            .unwrap();
        let LineKind::System { event, .. } = kind else {
            panic!("expected system line");
        };
        assert_eq!(event.subject, Some("Bob"));
    }

    #[test]
    fn test_iphone_marked_attachment_stays_message() {
        let kind = iphone()
            .classify("[12/05/2023, 10:41:00 AM] Carol: \u{200e}image omitted")
            .unwrap();
        assert!(matches!(kind, LineKind::Message { sender: "Carol", .. }));
    }

    #[test]
    fn test_plain_body_with_left_is_message() {
        let kind = iphone()
            .classify("[12/05/2023, 10:42:00 AM] Carol: I left my keys")
            .unwrap();
        assert!(matches!(kind, LineKind::Message { .. }));
    }

    #[test]
    fn test_marked_body_is_message_in_hyphen_dialect() {
        let kind = android()
            .classify("12/05/23, 10:40 am - Alice: \u{200e}Bob left")
            .unwrap();
        assert!(matches!(kind, LineKind::Message { sender: "Alice", .. }));
    }

    #[test]
    fn test_leading_marks_before_prefix() {
        let kind = android()
            .classify("\u{feff}12/05/23, 9:00 am - Alice: hi")
            .unwrap();
        assert!(matches!(kind, LineKind::Message { sender: "Alice", .. }));

        let kind = iphone()
            .classify("\u{200e}[12/05/2023, 10:41:00 AM] Carol: \u{200e}image omitted")
            .unwrap();
        assert!(matches!(kind, LineKind::Message { sender: "Carol", .. }));

        let kind = android()
            .classify("\u{200f} 12/05/23, 9:01 am - Bob left")
            .unwrap();
        assert!(matches!(kind, LineKind::System { .. }));
    }

    #[test]
    fn test_empty_sender_is_error() {
        let err = iphone()
            .classify("[12/05/2023, 10:42:00 AM] \u{200e}: hi")
            .unwrap_err();
        assert_eq!(err, LineError::EmptySender);
    }

    #[test]
    fn test_grammar_reports_dialect() {
        assert_eq!(iphone().dialect(), Dialect::iphone());
    }
}
