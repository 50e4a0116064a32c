//! JSON Lines (JSONL) output writer.
//!
//! One [`MessageRecord`](crate::core::output::MessageRecord) per line, the shape of a flat message table row.

use std::fs::File;
use std::io::{BufWriter, Write};

use crate::core::output::records;
use crate::error::Result;
use crate::message::Participant;

/// Writes every message in the roster as a JSON line.
///
/// ```jsonl
/// {"user_id":"Alice","date":"12/05/2023","time_stamp":"10:30","message":"hello @99","tagged":["99"]}
/// {"user_id":"Bob","date":"12/05/2023","time_stamp":"10:32","message":"hi","tagged":null}
/// ```
pub fn write_jsonl(participants: &[Participant], output_path: &str) -> Result<()> {
    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    write_records(&mut writer, participants)?;
    writer.flush()?;
    Ok(())
}

/// Converts the roster to a JSONL string.
pub fn to_jsonl(participants: &[Participant]) -> Result<String> {
    let mut buf = Vec::new();
    write_records(&mut buf, participants)?;
    Ok(String::from_utf8(buf)?)
}

fn write_records<W: Write>(writer: &mut W, participants: &[Participant]) -> Result<()> {
    for record in records(participants) {
        let line = serde_json::to_string(&record)?;
        writeln!(writer, "{line}")?;
    }
    Ok(())
}
