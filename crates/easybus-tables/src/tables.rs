use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, TableError};

/// Default table document compiled into the binary.
const BUILTIN_TABLES: &str = include_str!("../data/easybus.json");

/// Maps an instrument fault code to its text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorDescriptor {
    pub code: u32,
    pub text: String,
}

/// Maps one system-status bit to its text.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusDescriptor {
    pub bit: u32,
    pub text: String,
}

/// Maps a unit code to its display string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnitDescriptor {
    pub code: u32,
    pub value: String,
}

/// Immutable error/status/unit lookup tables.
///
/// Constructed once and passed by reference wherever decoded readings need
/// resolving; never mutated afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct Tables {
    error: Vec<ErrorDescriptor>,
    status: Vec<StatusDescriptor>,
    units: Vec<UnitDescriptor>,
}

impl Tables {
    /// Load the tables compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_TABLES)
    }

    /// Load tables from a JSON document string.
    pub fn from_json(document: &str) -> Result<Self> {
        let tables: Tables = serde_json::from_str(document)?;
        tables.check_sections()?;
        debug!(
            errors = tables.error.len(),
            status = tables.status.len(),
            units = tables.units.len(),
            "loaded lookup tables"
        );
        Ok(tables)
    }

    /// Load tables from a JSON file on disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|source| TableError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&document)
    }

    fn check_sections(&self) -> Result<()> {
        if self.error.is_empty() {
            return Err(TableError::EmptySection("error"));
        }
        if self.status.is_empty() {
            return Err(TableError::EmptySection("status"));
        }
        if self.units.is_empty() {
            return Err(TableError::EmptySection("units"));
        }
        Ok(())
    }

    /// Look up a fault code.
    pub fn error(&self, code: u32) -> Option<&ErrorDescriptor> {
        self.error.iter().find(|item| item.code == code)
    }

    /// Fault text for a code, or a fallback naming the unknown code.
    pub fn error_text(&self, code: u32) -> String {
        match self.error(code) {
            Some(descriptor) => descriptor.text.clone(),
            None => format!("Unknown error code {code}"),
        }
    }

    /// Expand a status bitmask: one descriptor per set bit that has text.
    pub fn status_bits(&self, value: u32) -> Vec<&StatusDescriptor> {
        self.status
            .iter()
            .filter(|item| item.bit & value != 0)
            .collect()
    }

    /// Look up a unit code.
    pub fn unit(&self, code: u32) -> Option<&UnitDescriptor> {
        self.units.iter().find(|item| item.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tables_load() {
        let tables = Tables::builtin().unwrap();
        assert!(tables.error(0).is_some());
    }

    #[test]
    fn fault_code_13_is_no_sensor() {
        let tables = Tables::builtin().unwrap();
        assert_eq!(tables.error(13).unwrap().text, "No sensor");
        assert_eq!(tables.error_text(13), "No sensor");
    }

    #[test]
    fn unknown_fault_code_gets_fallback_text() {
        let tables = Tables::builtin().unwrap();
        assert!(tables.error(4).is_none());
        assert_eq!(tables.error_text(4), "Unknown error code 4");
    }

    #[test]
    fn status_bitmask_expands_per_set_bit() {
        let tables = Tables::builtin().unwrap();

        let flags = tables.status_bits(0x0001 | 0x0400);
        assert_eq!(flags.len(), 2);
        assert!(flags.iter().any(|s| s.text == "Max. alarm"));
        assert!(flags.iter().any(|s| s.text == "Sensor error"));

        assert!(tables.status_bits(0).is_empty());
    }

    #[test]
    fn unit_lookup() {
        let tables = Tables::builtin().unwrap();
        assert_eq!(tables.unit(1).unwrap().value, "°C");
        assert!(tables.unit(200).is_none());
    }

    #[test]
    fn empty_section_is_rejected() {
        let document = r#"{ "error": [], "status": [{"bit":1,"text":"x"}], "units": [{"code":1,"value":"u"}] }"#;
        assert!(matches!(
            Tables::from_json(document).unwrap_err(),
            TableError::EmptySection("error")
        ));
    }

    #[test]
    fn missing_section_is_a_parse_error() {
        let document = r#"{ "error": [{"code":1,"text":"x"}] }"#;
        assert!(matches!(
            Tables::from_json(document).unwrap_err(),
            TableError::Parse(_)
        ));
    }

    #[test]
    fn from_file_reports_read_failure() {
        let err = Tables::from_file("/nonexistent/easybus.json").unwrap_err();
        assert!(matches!(err, TableError::Read { .. }));
    }
}
