//! JSON output writer.

use std::fs::File;
use std::io::Write;

use crate::error::Result;
use crate::message::Participant;

/// Writes the roster to a JSON file as an array of participants.
///
/// # Format
/// ```json
/// [
///   {
///     "id": "Alice",
///     "messages": [
///       {"date": "12/05/2023", "time_stamp": "10:30", "message": "hello @99", "tagged": ["99"]}
///     ],
///     "last_seen": "12/05/2023 10:30",
///     "is_present_in_group": true
///   }
/// ]
/// ```
pub fn write_json(participants: &[Participant], output_path: &str) -> Result<()> {
    let json = to_json(participants)?;
    let mut file = File::create(output_path)?;
    file.write_all(json.as_bytes())?;
    Ok(())
}

/// Converts the roster to a pretty-printed JSON string.
///
/// Same format as `write_json`, but returns a String instead of writing to file.
pub fn to_json(participants: &[Participant]) -> Result<String> {
    Ok(serde_json::to_string_pretty(participants)?)
}
