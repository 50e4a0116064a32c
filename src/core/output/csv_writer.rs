//! CSV output writer.

use std::fs::File;
use std::io::Write;

use crate::core::output::{MessageRecord, records};
use crate::error::Result;
use crate::message::Participant;

const HEADER: [&str; 5] = ["user_id", "date", "time_stamp", "message", "tagged"];

/// Writes every message in the roster as a CSV row.
///
/// # Format
/// - Delimiter: `;`
/// - Columns: `user_id`, `date`, `time_stamp`, `message`, `tagged`
/// - `tagged`: mentions joined with `,`, empty when there are none
/// - Encoding: UTF-8
pub fn write_csv(participants: &[Participant], output_path: &str) -> Result<()> {
    let file = File::create(output_path)?;
    write_records(file, participants)
}

/// Converts the roster to a CSV string.
pub fn to_csv(participants: &[Participant]) -> Result<String> {
    let mut buf = Vec::new();
    write_records(&mut buf, participants)?;
    Ok(String::from_utf8(buf)?)
}

fn write_records<W: Write>(out: W, participants: &[Participant]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(out);

    writer.write_record(HEADER)?;
    for record in records(participants) {
        writer.write_record(build_record(&record))?;
    }

    writer.flush()?;
    Ok(())
}

fn build_record(record: &MessageRecord<'_>) -> [String; 5] {
    [
        record.user_id.to_string(),
        record.date.to_string(),
        record.time_stamp.to_string(),
        record.message.to_string(),
        record.tagged.map(|tags| tags.join(",")).unwrap_or_default(),
    ]
}
