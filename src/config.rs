//! Configuration types for the normalizer.
//!
//! This module provides clean configuration structs for library usage,
//! without any CLI framework dependencies.
//!
//! # Dialects
//!
//! A [`Dialect`] fixes the line layout of one export convention:
//!
//! | Preset | Example line |
//! |--------|--------------|
//! | [`Dialect::android`] | `12/05/23, 10:30 am - Alice: hello` |
//! | [`Dialect::iphone`] | `[12/05/2023, 10:30:15 AM] Alice: hello` |
//! | [`Dialect::hyphen_with_seconds`] | `12/05/23, 10:30:15 pm - Alice: hello` |
//!
//! # Example
//!
//! ```rust
//! use chatroster::config::{Dialect, MentionStyle, NormalizerConfig};
//! use chatroster::normalizer::ChatNormalizer;
//!
//! let config = NormalizerConfig::new()
//!     .with_dialect(Dialect::iphone())
//!     .with_mention_style(MentionStyle::Token);
//!
//! let normalizer = ChatNormalizer::with_config(config);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChatrosterError;

/// Placeholder name WhatsApp uses for the exporting device's owner.
pub const DEFAULT_OWNER_ALIAS: &str = "You";

/// How the timestamp prefix is separated from the rest of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// `[date, time] sender: body` (iOS exports)
    Bracket,
    /// `date, time - sender: body` (Android exports)
    Hyphen,
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delimiter::Bracket => write!(f, "bracket"),
            Delimiter::Hyphen => write!(f, "hyphen"),
        }
    }
}

/// One transcript export convention.
///
/// `seconds` and `meridiem` are strict: a dialect with `seconds: true` only
/// accepts time tokens that carry seconds, and one with `meridiem: false`
/// rejects tokens with an AM/PM marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dialect {
    /// Prefix delimiter style
    pub delimiter: Delimiter,
    /// Time tokens carry seconds (`10:30:15`)
    pub seconds: bool,
    /// Time tokens carry an AM/PM marker
    pub meridiem: bool,
}

impl Dialect {
    /// Creates a dialect from its three components.
    pub const fn new(delimiter: Delimiter, seconds: bool, meridiem: bool) -> Self {
        Self {
            delimiter,
            seconds,
            meridiem,
        }
    }

    /// Android export: `12/05/23, 10:30 am - Alice: hello`.
    pub const fn android() -> Self {
        Self::new(Delimiter::Hyphen, false, true)
    }

    /// iOS export: `[12/05/2023, 10:30:15 AM] Alice: hello`.
    pub const fn iphone() -> Self {
        Self::new(Delimiter::Bracket, true, true)
    }

    /// Hyphenated export with seconds: `12/05/23, 10:30:15 pm - Alice: hello`.
    pub const fn hyphen_with_seconds() -> Self {
        Self::new(Delimiter::Hyphen, true, true)
    }

    /// Every dialect, in the order automatic detection tries them.
    pub fn all() -> &'static [Dialect] {
        const ALL: [Dialect; 8] = [
            Dialect::android(),
            Dialect::new(Delimiter::Hyphen, false, false),
            Dialect::iphone(),
            Dialect::new(Delimiter::Bracket, true, false),
            Dialect::hyphen_with_seconds(),
            Dialect::new(Delimiter::Hyphen, true, false),
            Dialect::new(Delimiter::Bracket, false, true),
            Dialect::new(Delimiter::Bracket, false, false),
        ];
        &ALL
    }

    /// Canonical name, e.g. `hyphen-12h` or `bracket-seconds-24h`.
    pub fn name(&self) -> String {
        format!(
            "{}{}-{}",
            self.delimiter,
            if self.seconds { "-seconds" } else { "" },
            if self.meridiem { "12h" } else { "24h" }
        )
    }

    /// Returns `true` when the owner placeholder cannot be told apart from a
    /// real participant. Hyphenated exports write the owner as a bare
    /// placeholder name with no phone number or contact behind it.
    pub fn owner_is_anonymous(&self) -> bool {
        self.delimiter == Delimiter::Hyphen
    }

    /// Shorthand names accepted by [`FromStr`] besides the canonical ones.
    pub fn aliases() -> &'static [(&'static str, Dialect)] {
        const ALIASES: [(&str, Dialect); 5] = [
            ("android", Dialect::android()),
            ("android-24h", Dialect::new(Delimiter::Hyphen, false, false)),
            ("iphone", Dialect::iphone()),
            ("iphone-24h", Dialect::new(Delimiter::Bracket, true, false)),
            ("hyphen-seconds", Dialect::hyphen_with_seconds()),
        ];
        &ALIASES
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::android()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Dialect {
    type Err = ChatrosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();

        if let Some((_, dialect)) = Dialect::aliases().iter().find(|(name, _)| *name == wanted) {
            return Ok(*dialect);
        }

        Dialect::all()
            .iter()
            .find(|d| d.name() == wanted)
            .copied()
            .ok_or_else(|| ChatrosterError::invalid_dialect(s))
    }
}

/// Which dialect a parse uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectChoice {
    /// Try [`Dialect::all`] in order; keep the first that yields a message.
    #[default]
    Auto,
    /// Use exactly this dialect.
    Fixed(Dialect),
}

impl DialectChoice {
    /// Every name accepted by [`FromStr`].
    pub fn all_names() -> Vec<String> {
        let mut names = vec!["auto".to_string()];
        names.extend(Dialect::aliases().iter().map(|(name, _)| (*name).to_string()));
        names.extend(Dialect::all().iter().map(Dialect::name));
        names
    }
}

impl fmt::Display for DialectChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DialectChoice::Auto => write!(f, "auto"),
            DialectChoice::Fixed(dialect) => write!(f, "{dialect}"),
        }
    }
}

impl FromStr for DialectChoice {
    type Err = ChatrosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(DialectChoice::Auto);
        }
        s.parse().map(DialectChoice::Fixed)
    }
}

impl From<Dialect> for DialectChoice {
    fn from(dialect: Dialect) -> Self {
        DialectChoice::Fixed(dialect)
    }
}

/// Which `@` tokens count as mentions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentionStyle {
    /// `@` followed by digits (phone-number mentions in WhatsApp exports)
    #[default]
    Digits,
    /// `@` followed by any run of non-whitespace (meeting-chat exports)
    Token,
}

impl FromStr for MentionStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "digits" | "digit" => Ok(MentionStyle::Digits),
            "token" | "word" => Ok(MentionStyle::Token),
            _ => Err(format!(
                "Unknown mention style: '{}'. Expected one of: digits, token",
                s
            )),
        }
    }
}

/// Configuration for [`ChatNormalizer`](crate::normalizer::ChatNormalizer).
///
/// # Example
///
/// ```rust
/// use chatroster::config::{Dialect, DialectChoice, NormalizerConfig};
///
/// let config = NormalizerConfig::new().with_dialect(Dialect::android());
/// assert_eq!(config.dialect, DialectChoice::Fixed(Dialect::android()));
///
/// let config = NormalizerConfig::new();
/// assert_eq!(config.dialect, DialectChoice::Auto);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Dialect selection (default: auto)
    pub dialect: DialectChoice,

    /// Mention convention (default: digits)
    pub mention_style: MentionStyle,

    /// Placeholder name of the exporting device's owner (default: "You")
    pub owner_alias: String,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            dialect: DialectChoice::Auto,
            mention_style: MentionStyle::Digits,
            owner_alias: DEFAULT_OWNER_ALIAS.to_string(),
        }
    }
}

impl NormalizerConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the dialect for every line.
    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = DialectChoice::Fixed(dialect);
        self
    }

    /// Sets the dialect selection.
    #[must_use]
    pub fn with_dialect_choice(mut self, choice: DialectChoice) -> Self {
        self.dialect = choice;
        self
    }

    /// Sets the mention convention.
    #[must_use]
    pub fn with_mention_style(mut self, style: MentionStyle) -> Self {
        self.mention_style = style;
        self
    }

    /// Sets the owner placeholder (e.g. "Du" or "Вы" for localized exports).
    #[must_use]
    pub fn with_owner_alias(mut self, alias: impl Into<String>) -> Self {
        self.owner_alias = alias.into();
        self
    }
}
