//! Error and discrepancy types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Fatal errors.
///
/// Reading the schema dump or a source file are the only operations that
/// abort a run. Everything else degrades locally: malformed schema
/// fragments and unparseable chain fragments are skipped, and invalid
/// references become [`Discrepancy`] records rather than errors.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Kind of an invalid reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscrepancyKind {
    Table,
    Column,
}

impl DiscrepancyKind {
    pub fn code(&self) -> &'static str {
        match self {
            DiscrepancyKind::Table => "E0001",
            DiscrepancyKind::Column => "E0002",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DiscrepancyKind::Table => "invalid-table",
            DiscrepancyKind::Column => "invalid-column",
        }
    }
}

/// One invalid table or column reference found in a source file.
///
/// Immutable once produced; ordering follows discovery order (file
/// traversal order, then position within the file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub file: PathBuf,
    /// 1-based line of the offending call
    pub line: usize,
    /// Byte offset of the offending call within the file
    pub offset: usize,
    pub kind: DiscrepancyKind,
    /// Table the identifier was checked against. For `table` kind this
    /// is the invalid name itself.
    pub table: String,
    /// The invalid identifier
    pub identifier: String,
    /// Nearest valid identifier, if one is close enough
    pub suggestion: Option<String>,
}

impl Discrepancy {
    /// Stable error code (e.g. "E0001")
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Human-readable description of the invalid reference
    pub fn message(&self) -> String {
        match self.kind {
            DiscrepancyKind::Table => {
                format!("Invalid table reference: '{}'", self.identifier)
            }
            DiscrepancyKind::Column => {
                format!("Invalid column '{}' on table '{}'", self.identifier, self.table)
            }
        }
    }

    /// Suggested fix, or an explicit unknown marker
    pub fn fix(&self) -> String {
        match (&self.suggestion, self.kind) {
            (Some(suggestion), _) => format!("Change to '{}'", suggestion),
            (None, DiscrepancyKind::Table) => "Unknown table".to_string(),
            (None, DiscrepancyKind::Column) => "Unknown column".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_and_fix() {
        let disc = Discrepancy {
            file: PathBuf::from("src/app.ts"),
            line: 3,
            offset: 42,
            kind: DiscrepancyKind::Column,
            table: "users".to_string(),
            identifier: "nmae".to_string(),
            suggestion: Some("name".to_string()),
        };
        assert_eq!(disc.message(), "Invalid column 'nmae' on table 'users'");
        assert_eq!(disc.fix(), "Change to 'name'");
        assert_eq!(disc.code(), "E0002");
        assert_eq!(disc.kind.name(), "invalid-column");
    }

    #[test]
    fn test_fix_without_suggestion() {
        let disc = Discrepancy {
            file: PathBuf::from("src/app.ts"),
            line: 1,
            offset: 0,
            kind: DiscrepancyKind::Table,
            table: "usrs".to_string(),
            identifier: "usrs".to_string(),
            suggestion: None,
        };
        assert_eq!(disc.fix(), "Unknown table");
    }
}
