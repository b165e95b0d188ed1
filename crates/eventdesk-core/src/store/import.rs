use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::models::Attendee;

/// Parse a JSON array of registration sheet rows
pub fn parse_rows(json: &str) -> Result<Vec<Attendee>> {
    serde_json::from_str(json).context("Import file is not a JSON array of roster rows")
}

pub fn read_rows(path: &Path) -> Result<Vec<Attendee>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))?;
    let rows = parse_rows(&contents)?;
    debug!(path = %path.display(), rows = rows.len(), "Read import file");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BusAssignment, Role};

    #[test]
    fn test_parse_sheet_export() {
        let sheet = r#"[
            {"Name": "Rahim", "Role": "Student", "Ticket_Number": 1001.0, "Class": "Class 9"},
            {"Name": "Karima", "Role": "teacher", "Ticket_Number": "1002", "Bus_Number": "Bus 2"},
            {"Name": "No columns"}
        ]"#;
        let rows = parse_rows(sheet).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].ticket_number, "1001");
        assert_eq!(rows[1].role, Role::Teacher);
        assert_eq!(rows[1].bus, BusAssignment::Bus("Bus 2".into()));
        assert_eq!(rows[2].ticket_number, "");
    }

    #[test]
    fn test_non_array_is_error() {
        let err = parse_rows(r#"{"Name": "Rahim"}"#).unwrap_err();
        assert!(err.to_string().contains("JSON array"));
    }
}
