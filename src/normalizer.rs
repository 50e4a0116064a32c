//! Transcript normalization.
//!
//! [`ChatNormalizer`] runs every line of a transcript through the classifier
//! in file order and folds the results into a participant roster:
//!
//! - message lines normalize their timestamp, extract mentions and append a
//!   [`Message`] to the sender
//! - membership notices update the named participant's presence
//! - everything else is skipped, counted and reported to the
//!   [`LineObserver`]
//!
//! No single line can fail a parse. Only I/O errors are fatal.
//!
//! # Example
//!
//! ```rust
//! use chatroster::normalizer::ChatNormalizer;
//!
//! let transcript = ChatNormalizer::new().normalize_str(
//!     "12/05/23, 10:30 am - Alice: hello @99\n12/05/23, 10:31 am - Bob left",
//! )?;
//!
//! let alice = &transcript.participants[0];
//! assert_eq!(alice.identity, "Alice");
//! assert_eq!(alice.messages[0].date, "12/05/2023");
//! assert_eq!(alice.messages[0].mentions(), ["99"]);
//!
//! let bob = &transcript.participants[1];
//! assert!(!bob.is_present);
//! # Ok::<(), chatroster::ChatrosterError>(())
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::Message;
use crate::config::{Dialect, DialectChoice, MentionStyle, NormalizerConfig};
use crate::core::roster::ParticipantTracker;
use crate::error::Result;
use crate::message::Participant;
use crate::observer::{LineObserver, NoopObserver, SkipReason};
use crate::parsing::classify::{LineGrammar, LineKind};
use crate::parsing::datetime::{is_canonical_date, is_canonical_time, normalize_date, normalize_time};
use crate::parsing::mentions;

/// Per-line counters for one parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Lines read, including blank ones
    pub lines: usize,
    /// Message lines kept in the roster
    pub messages: usize,
    /// Membership notices
    pub system_events: usize,
    /// Blank lines and banners
    pub noise: usize,
    /// Lines no grammar or template matched
    pub unrecognized: usize,
    /// Lines that matched but could not be used
    pub failed: usize,
    /// Lines dropped because they named the owner placeholder
    pub excluded: usize,
    /// Date or time tokens kept verbatim
    pub unresolved_timestamps: usize,
}

impl ParseStats {
    /// Lines that contributed nothing to the roster.
    pub fn skipped(&self) -> usize {
        self.noise + self.unrecognized + self.failed
    }
}

/// Result of normalizing one transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    /// Participants in first-appearance order
    pub participants: Vec<Participant>,
    /// Dialect the lines were read with
    pub dialect: Dialect,
    /// Per-line counters
    pub stats: ParseStats,
}

impl Transcript {
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn into_participants(self) -> Vec<Participant> {
        self.participants
    }

    /// Returns `true` if no participant was found.
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Total messages across all participants.
    pub fn message_count(&self) -> usize {
        self.participants.iter().map(Participant::message_count).sum()
    }
}

/// Normalizes transcripts into participant rosters.
///
/// Holds only configuration; each call builds its own roster, so one
/// normalizer can serve many transcripts, from many threads.
#[derive(Clone)]
pub struct ChatNormalizer {
    config: NormalizerConfig,
    observer: Arc<dyn LineObserver>,
}

impl std::fmt::Debug for ChatNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatNormalizer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for ChatNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatNormalizer {
    /// Creates a normalizer with automatic dialect detection.
    pub fn new() -> Self {
        Self::with_config(NormalizerConfig::default())
    }

    /// Creates a normalizer with custom configuration.
    pub fn with_config(config: NormalizerConfig) -> Self {
        Self {
            config,
            observer: Arc::new(NoopObserver),
        }
    }

    /// Builder-style method to install a diagnostics observer.
    #[must_use]
    pub fn with_observer(mut self, observer: impl LineObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// Builder-style method to share an existing observer.
    #[must_use]
    pub fn with_shared_observer(mut self, observer: Arc<dyn LineObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalizes a sequence of lines.
    ///
    /// With a fixed dialect the lines are consumed as they come. With
    /// [`DialectChoice::Auto`] they are buffered first so every candidate
    /// dialect can see them.
    pub fn normalize_lines<I, S>(&self, lines: I) -> Result<Transcript>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match self.config.dialect {
            DialectChoice::Fixed(dialect) => {
                let mut pass = self.start(dialect)?;
                for line in lines {
                    pass.feed(line.as_ref());
                }
                Ok(self.finish(pass))
            }
            DialectChoice::Auto => {
                let buffered: Vec<S> = lines.into_iter().collect();
                let dialect = detect_dialect(&buffered)?;
                let mut pass = self.start(dialect)?;
                for line in &buffered {
                    pass.feed(line.as_ref());
                }
                Ok(self.finish(pass))
            }
        }
    }

    /// Normalizes an in-memory transcript.
    pub fn normalize_str(&self, text: &str) -> Result<Transcript> {
        self.normalize_lines(text.lines())
    }

    /// Normalizes a transcript from any buffered reader.
    ///
    /// A read error aborts the parse.
    pub fn normalize_reader<R: BufRead>(&self, reader: R) -> Result<Transcript> {
        match self.config.dialect {
            DialectChoice::Fixed(dialect) => {
                let mut pass = self.start(dialect)?;
                for line in reader.lines() {
                    pass.feed(&line?);
                }
                Ok(self.finish(pass))
            }
            DialectChoice::Auto => {
                let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
                self.normalize_lines(lines)
            }
        }
    }

    /// Normalizes the transcript at `path`.
    pub fn normalize_file(&self, path: impl AsRef<Path>) -> Result<Transcript> {
        let file = File::open(path.as_ref())?;
        self.normalize_reader(BufReader::new(file))
    }

    fn start(&self, dialect: Dialect) -> Result<Pass<'_>> {
        let tracker = if dialect.owner_is_anonymous() {
            ParticipantTracker::excluding(self.config.owner_alias.clone())
        } else {
            ParticipantTracker::new()
        };

        Ok(Pass {
            grammar: LineGrammar::new(dialect)?,
            tracker,
            stats: ParseStats::default(),
            style: self.config.mention_style,
            observer: self.observer.as_ref(),
        })
    }

    fn finish(&self, pass: Pass<'_>) -> Transcript {
        let dialect = pass.grammar.dialect();
        let stats = pass.stats;
        let participants = pass.tracker.into_participants();

        debug!(
            %dialect,
            lines = stats.lines,
            participants = participants.len(),
            messages = stats.messages,
            system_events = stats.system_events,
            skipped = stats.skipped(),
            unresolved = stats.unresolved_timestamps,
            "normalized transcript"
        );

        Transcript {
            participants,
            dialect,
            stats,
        }
    }
}

/// Picks the first dialect under which some line reads as a message.
///
/// Falls back to the first candidate when none does, so a transcript made of
/// membership notices alone is still read with the default layout.
fn detect_dialect<S: AsRef<str>>(lines: &[S]) -> Result<Dialect> {
    for &dialect in Dialect::all() {
        let grammar = LineGrammar::new(dialect)?;
        let matched = lines.iter().any(|line| {
            matches!(grammar.classify(line.as_ref()), Ok(LineKind::Message { .. }))
        });
        if matched {
            debug!(%dialect, "detected dialect");
            return Ok(dialect);
        }
    }

    let fallback = Dialect::all()[0];
    debug!(%fallback, "no dialect matched a message line, using fallback");
    Ok(fallback)
}

/// State of one single-pass run over a transcript.
struct Pass<'a> {
    grammar: LineGrammar,
    tracker: ParticipantTracker,
    stats: ParseStats,
    style: MentionStyle,
    observer: &'a dyn LineObserver,
}

impl Pass<'_> {
    fn feed(&mut self, line: &str) {
        self.stats.lines += 1;
        let line_no = self.stats.lines;

        let kind = match self.grammar.classify(line) {
            Ok(kind) => kind,
            Err(err) => {
                self.stats.failed += 1;
                self.observer
                    .on_skipped(line_no, line, &SkipReason::Failed(err));
                return;
            }
        };

        match kind {
            LineKind::Message {
                date,
                time,
                sender,
                body,
            } => {
                let (date, time) = self.timestamp(line_no, date, time);
                let extracted = mentions::extract(sender, body, self.style);
                let message = Message::new(date, time, extracted.body)
                    .with_mentions(extracted.mentions.unwrap_or_default());
                if self.tracker.record_message(&extracted.sender, message) {
                    self.stats.messages += 1;
                } else {
                    self.stats.excluded += 1;
                }
            }
            LineKind::System { date, time, event } => {
                self.stats.system_events += 1;
                // "You were added" names nobody.
                let Some(subject) = event.subject else {
                    return;
                };
                let (date, time) = self.timestamp(line_no, date, time);
                if self
                    .tracker
                    .touch(subject, &date, &time, event.membership())
                    .is_none()
                {
                    self.stats.excluded += 1;
                }
            }
            LineKind::Noise => {
                self.stats.noise += 1;
                self.observer.on_skipped(line_no, line, &SkipReason::Noise);
            }
            LineKind::Unrecognized => {
                self.stats.unrecognized += 1;
                self.observer
                    .on_skipped(line_no, line, &SkipReason::Unrecognized);
            }
        }
    }

    fn timestamp(&mut self, line_no: usize, date: &str, time: &str) -> (String, String) {
        let canonical_date = normalize_date(date);
        if !is_canonical_date(&canonical_date) {
            self.stats.unresolved_timestamps += 1;
            self.observer.on_unresolved(line_no, date);
        }

        let canonical_time = normalize_time(time);
        if !is_canonical_time(&canonical_time) {
            self.stats.unresolved_timestamps += 1;
            self.observer.on_unresolved(line_no, time);
        }

        (canonical_date, canonical_time)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::config::{Delimiter, MentionStyle};

    fn android() -> ChatNormalizer {
        ChatNormalizer::with_config(NormalizerConfig::new().with_dialect(Dialect::android()))
    }

    fn iphone() -> ChatNormalizer {
        ChatNormalizer::with_config(NormalizerConfig::new().with_dialect(Dialect::iphone()))
    }

    #[derive(Default)]
    struct Recorder {
        skipped: Mutex<Vec<(usize, SkipReason)>>,
        unresolved: Mutex<Vec<(usize, String)>>,
    }

    impl LineObserver for Recorder {
        fn on_skipped(&self, line_no: usize, _line: &str, reason: &SkipReason) {
            self.skipped.lock().unwrap().push((line_no, reason.clone()));
        }

        fn on_unresolved(&self, line_no: usize, token: &str) {
            self.unresolved
                .lock()
                .unwrap()
                .push((line_no, token.to_string()));
        }
    }

    #[test]
    fn test_hyphen_message_scenario() {
        let t = android()
            .normalize_str("12/05/23, 10:30 am - Alice: hello @99")
            .unwrap();

        assert_eq!(t.participants.len(), 1);
        let alice = &t.participants[0];
        assert_eq!(alice.identity, "Alice");
        assert!(alice.is_present);
        assert_eq!(
            alice.messages,
            vec![Message::new("12/05/2023", "10:30", "hello @99").with_mentions(vec!["99".into()])]
        );
    }

    #[test]
    fn test_system_event_scenario() {
        let t = android().normalize_str("12/05/23, 10:31 am - Bob left").unwrap();

        let bob = &t.participants[0];
        assert_eq!(bob.identity, "Bob");
        assert!(!bob.is_present);
        assert_eq!(bob.last_seen.to_string(), "12/05/2023 10:31");
        assert!(bob.messages.is_empty());
        assert_eq!(t.stats.system_events, 1);
    }

    #[test]
    fn test_bracket_seconds_scenario() {
        let t = iphone()
            .normalize_str("[12/05/2023, 10:30:15 AM] Carol: yo")
            .unwrap();

        let carol = &t.participants[0];
        assert_eq!(carol.messages[0].time, "10:30");
        assert_eq!(carol.messages[0].date, "12/05/2023");
        assert_eq!(carol.messages[0].mentions, None);
    }

    #[test]
    fn test_banner_only() {
        let t = android()
            .normalize_str(
                "12/05/23, 10:00 am - Messages and calls are end-to-end encrypted. No one outside of this chat can read them.",
            )
            .unwrap();
        assert!(t.is_empty());
        assert_eq!(t.stats.noise, 1);
    }

    #[test]
    fn test_empty_input() {
        let t = ChatNormalizer::new().normalize_str("").unwrap();
        assert!(t.is_empty());
        assert_eq!(t.stats, ParseStats::default());
    }

    #[test]
    fn test_presence_follows_latest_event() {
        let input = "\
12/05/23, 9:00 am - Alice created group \"Hikes\"
12/05/23, 9:01 am - Alice added Bob
12/05/23, 9:02 am - Bob: hi all
12/05/23, 9:03 am - Alice removed Bob
12/05/23, 9:04 am - Alice added Bob
12/05/23, 9:05 am - Bob left";
        let t = android().normalize_str(input).unwrap();

        let names: Vec<_> = t.participants.iter().map(|p| p.identity.as_str()).collect();
        assert_eq!(names, ["Alice", "Bob"]);

        let bob = &t.participants[1];
        assert!(!bob.is_present);
        assert_eq!(bob.last_seen.time, "09:05");
        assert_eq!(bob.message_count(), 1);
        assert_eq!(t.stats.system_events, 5);
    }

    #[test]
    fn test_owner_placeholder_dropped_in_hyphen_dialect() {
        let input = "\
12/05/23, 9:00 am - You: my message
12/05/23, 9:01 am - You added Bob
12/05/23, 9:02 am - Bob: thanks";
        let t = android().normalize_str(input).unwrap();

        let names: Vec<_> = t.participants.iter().map(|p| p.identity.as_str()).collect();
        assert_eq!(names, ["Bob"]);
        assert_eq!(t.stats.excluded, 1);
        assert_eq!(t.stats.messages, 1);
        assert_eq!(t.stats.messages, t.message_count());
    }

    #[test]
    fn test_owner_kept_in_bracket_dialect() {
        let t = iphone()
            .normalize_str("[12/05/2023, 10:30:15 AM] You: hello")
            .unwrap();
        assert_eq!(t.participants[0].identity, "You");
    }

    #[test]
    fn test_custom_owner_alias() {
        let config = NormalizerConfig::new()
            .with_dialect(Dialect::android())
            .with_owner_alias("Du");
        let t = ChatNormalizer::with_config(config)
            .normalize_str("12/05/23, 9:00 am - Du: hallo\n12/05/23, 9:01 am - You: hi")
            .unwrap();

        let names: Vec<_> = t.participants.iter().map(|p| p.identity.as_str()).collect();
        assert_eq!(names, ["You"]);
    }

    #[test]
    fn test_you_were_added_is_acknowledged() {
        let t = android()
            .normalize_str("12/05/23, 9:00 am - You were added")
            .unwrap();
        assert!(t.is_empty());
        assert_eq!(t.stats.system_events, 1);
        assert_eq!(t.stats.unrecognized, 0);
    }

    #[test]
    fn test_unrecognized_lines_do_not_abort() {
        let input = "\
12/05/23, 9:00 am - Alice: first line
of a long message
12/05/23, 9:01 am - Alice changed this group's icon
12/05/23, 9:02 am - Bob: ok";
        let t = android().normalize_str(input).unwrap();

        assert_eq!(t.participants.len(), 2);
        assert_eq!(t.participants[0].messages[0].body, "first line");
        assert_eq!(t.stats.unrecognized, 2);
        assert_eq!(t.stats.lines, 4);
    }

    #[test]
    fn test_observer_receives_line_numbers() {
        let recorder = Arc::new(Recorder::default());
        let normalizer = android().with_shared_observer(recorder.clone());

        let input = "\n12/05/23, 9:00 am - Alice: hi\ngarbage\n12/05/23, 9:01 am - \u{200e}: ?";
        let t = normalizer.normalize_str(input).unwrap();
        assert_eq!(t.stats.failed, 1);

        let skipped = recorder.skipped.lock().unwrap();
        assert_eq!(
            *skipped,
            vec![
                (1, SkipReason::Noise),
                (3, SkipReason::Unrecognized),
                (4, SkipReason::Failed(crate::parsing::classify::LineError::EmptySender)),
            ]
        );
    }

    #[test]
    fn test_unresolved_date_kept_verbatim() {
        let recorder = Arc::new(Recorder::default());
        let normalizer = android().with_shared_observer(recorder.clone());

        let t = normalizer
            .normalize_str("31/02/23, 9:00 am - Alice: impossible day")
            .unwrap();

        let msg = &t.participants[0].messages[0];
        assert_eq!(msg.date, "31/02/23");
        assert_eq!(msg.time, "09:00");
        assert_eq!(t.stats.unresolved_timestamps, 1);
        assert_eq!(
            *recorder.unresolved.lock().unwrap(),
            vec![(1, "31/02/23".to_string())]
        );
    }

    #[test]
    fn test_auto_detects_iphone() {
        let input = "\
[12/05/2023, 10:30:15 AM] Carol: yo
[12/05/2023, 10:31:00 AM] Dave: hey @4412";
        let t = ChatNormalizer::new().normalize_str(input).unwrap();

        assert_eq!(t.dialect, Dialect::iphone());
        assert_eq!(t.participants.len(), 2);
        assert_eq!(t.participants[1].messages[0].mentions(), ["4412"]);
    }

    #[test]
    fn test_auto_detects_24_hour_hyphen() {
        let t = ChatNormalizer::new()
            .normalize_str("12/05/2023, 22:15 - Erin: late")
            .unwrap();
        assert_eq!(t.dialect, Dialect::new(Delimiter::Hyphen, false, false));
        assert_eq!(t.participants[0].messages[0].time, "22:15");
    }

    #[test]
    fn test_auto_falls_back_to_first_dialect() {
        let t = ChatNormalizer::new()
            .normalize_str("12/05/23, 10:31 am - Bob left")
            .unwrap();
        assert_eq!(t.dialect, Dialect::all()[0]);
        assert!(!t.participants[0].is_present);
    }

    #[test]
    fn test_token_mentions() {
        let config = NormalizerConfig::new()
            .with_dialect(Dialect::android())
            .with_mention_style(MentionStyle::Token);
        let t = ChatNormalizer::with_config(config)
            .normalize_str("12/05/23, 9:00 am - Alice: ping @bob.k")
            .unwrap();
        assert_eq!(t.participants[0].messages[0].mentions(), ["bob.k"]);
    }

    #[test]
    fn test_reader_and_str_agree() {
        let input = "12/05/23, 10:30 am - Alice: hello\n12/05/23, 10:31 am - Bob left\n";
        let from_str = android().normalize_str(input).unwrap();
        let from_reader = android().normalize_reader(input.as_bytes()).unwrap();
        assert_eq!(from_str, from_reader);

        let auto_reader = ChatNormalizer::new()
            .normalize_reader(input.as_bytes())
            .unwrap();
        assert_eq!(auto_reader.participants, from_str.participants);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ChatNormalizer::new()
            .normalize_file("/definitely/not/here.txt")
            .unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_normalizer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChatNormalizer>();
    }
}
