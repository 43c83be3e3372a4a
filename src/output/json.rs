//! JSON serialization for measurement records.

use crate::result::ResultRecord;

/// Serialize a record to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for
/// `ResultRecord`).
pub fn to_json(record: &ResultRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string(record)
}

/// Serialize a record to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for
/// `ResultRecord`).
pub fn to_json_pretty(record: &ResultRecord) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(record)
}
