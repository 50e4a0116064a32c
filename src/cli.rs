//! Command-line interface definition using clap.
//!
//! [`Args`] is the argument structure of the `chatroster` binary. The dialect
//! and mention flags parse straight into the library's config types, so the
//! binary needs no conversion layer beyond [`Args::normalizer_config`].

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{DialectChoice, MentionStyle, NormalizerConfig};

/// Normalize WhatsApp group chat exports into per-participant rosters.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatroster")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatroster chat.txt
    chatroster chat.txt -o roster.json
    chatroster chat.txt -f csv -o messages.csv
    chatroster chat.txt -d iphone --mentions token
    chatroster chat.txt -d android --owner Du -v")]
pub struct Args {
    /// Path to the exported transcript
    pub input: String,

    /// Path to output file
    #[arg(short, long, default_value = "roster.json")]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Export dialect: auto, android, iphone, hyphen-seconds, or a name
    /// like bracket-24h
    #[arg(short, long, default_value = "auto", value_parser = parse_dialect)]
    pub dialect: DialectChoice,

    /// Which @ tokens count as mentions
    #[arg(long, value_name = "STYLE", default_value = "digits", value_parser = parse_mention_style)]
    pub mentions: MentionStyle,

    /// Owner placeholder name to drop from hyphenated exports
    #[arg(long, value_name = "NAME", default_value = crate::config::DEFAULT_OWNER_ALIAS)]
    pub owner: String,

    /// Log skipped lines and unresolved timestamps
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Builds the normalizer configuration from the flags.
    pub fn normalizer_config(&self) -> NormalizerConfig {
        NormalizerConfig::new()
            .with_dialect_choice(self.dialect)
            .with_mention_style(self.mentions)
            .with_owner_alias(self.owner.clone())
    }
}

fn parse_dialect(s: &str) -> Result<DialectChoice, String> {
    s.parse().map_err(|e: crate::ChatrosterError| e.to_string())
}

fn parse_mention_style(s: &str) -> Result<MentionStyle, String> {
    s.parse()
}

/// Output format options.
///
/// - [`Json`](OutputFormat::Json) - participant roster (default)
/// - [`Jsonl`](OutputFormat::Jsonl) - one message record per line
/// - [`Csv`](OutputFormat::Csv) - message records, semicolon-delimited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON array of participants
    #[default]
    Json,

    /// JSON Lines - one message record per line
    #[value(alias = "ndjson")]
    Jsonl,

    /// CSV of message records
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::format::OutputFormat::from(*self))
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dialect;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["chatroster", "chat.txt"]).unwrap();
        assert_eq!(args.input, "chat.txt");
        assert_eq!(args.output, "roster.json");
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.dialect, DialectChoice::Auto);
        assert_eq!(args.mentions, MentionStyle::Digits);
        assert_eq!(args.owner, "You");
        assert!(!args.verbose);
    }

    #[test]
    fn test_dialect_flag() {
        let args = Args::try_parse_from(["chatroster", "chat.txt", "-d", "iphone"]).unwrap();
        assert_eq!(args.dialect, DialectChoice::Fixed(Dialect::iphone()));

        let args =
            Args::try_parse_from(["chatroster", "chat.txt", "--dialect", "hyphen-seconds-24h"])
                .unwrap();
        assert!(matches!(args.dialect, DialectChoice::Fixed(d) if !d.meridiem && d.seconds));

        assert!(Args::try_parse_from(["chatroster", "chat.txt", "-d", "nokia"]).is_err());
    }

    #[test]
    fn test_format_and_mentions_flags() {
        let args = Args::try_parse_from([
            "chatroster",
            "chat.txt",
            "-f",
            "csv",
            "--mentions",
            "token",
            "--owner",
            "Du",
        ])
        .unwrap();
        assert_eq!(args.format, OutputFormat::Csv);

        let config = args.normalizer_config();
        assert_eq!(config.mention_style, MentionStyle::Token);
        assert_eq!(config.owner_alias, "Du");
    }

    #[test]
    fn test_format_display_and_conversion() {
        assert_eq!(OutputFormat::Jsonl.to_string(), "JSONL");
        assert_eq!(
            crate::format::OutputFormat::from(OutputFormat::Csv),
            crate::format::OutputFormat::Csv
        );
    }

    #[test]
    fn test_format_serde() {
        let json = serde_json::to_string(&OutputFormat::Jsonl).unwrap();
        assert_eq!(json, "\"jsonl\"");
    }
}
