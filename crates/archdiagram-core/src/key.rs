//! Storage key generation for diagram artifacts
//!
//! Format: `diagrams/{document_id}/architecture-{YYYYMMDD-HHMMSS}.mmd`

use chrono::{DateTime, Utc};

const KEY_PREFIX: &str = "diagrams";
const FILE_STEM: &str = "architecture";
const FILE_EXTENSION: &str = "mmd";

/// Format a timestamp as `YYYYMMDD-HHMMSS` (second resolution)
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d-%H%M%S").to_string()
}

/// Build the storage key for a document's diagram generated at `at`.
///
/// The document id is used verbatim. Two calls within the same second for the
/// same document produce the same key.
pub fn storage_key(document_id: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}/{}/{}-{}.{}",
        KEY_PREFIX,
        document_id,
        FILE_STEM,
        format_timestamp(at),
        FILE_EXTENSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_second_resolution_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 1, 5, 7, 8, 9).unwrap();
        assert_eq!(format_timestamp(at), "20240105-070809");
    }

    #[test]
    fn builds_key_from_document_and_time() {
        let at = Utc.with_ymd_and_hms(2024, 11, 30, 23, 59, 59).unwrap();
        assert_eq!(
            storage_key("doc-1", at),
            "diagrams/doc-1/architecture-20241130-235959.mmd"
        );
    }

    #[test]
    fn same_second_collides() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let later = at + chrono::Duration::milliseconds(900);
        assert_eq!(storage_key("doc", at), storage_key("doc", later));
    }
}
