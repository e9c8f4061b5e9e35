//! Report assembly
//!
//! Each file-processing unit returns its own discrepancy list; the
//! report merges them in traversal order, so runs over unchanged inputs
//! produce byte-identical output.

use serde::{Deserialize, Serialize};

use crate::error::Discrepancy;

/// Final ordered report, one entry per discrepancy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub entries: Vec<ReportEntry>,
}

/// One reported discrepancy, shaped for serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub file: String,
    pub line: usize,
    pub error: String,
    pub fix: String,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one file's discrepancies, preserving discovery order
    pub fn extend(&mut self, discrepancies: &[Discrepancy]) {
        self.entries
            .extend(discrepancies.iter().map(ReportEntry::from));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl From<&Discrepancy> for ReportEntry {
    fn from(disc: &Discrepancy) -> Self {
        Self {
            file: disc.file.display().to_string(),
            line: disc.line,
            error: disc.message(),
            fix: disc.fix(),
        }
    }
}

/// 1-based line number of a byte offset, counting preceding newlines
pub fn line_at(content: &str, offset: usize) -> usize {
    content.as_bytes()[..offset.min(content.len())]
        .iter()
        .filter(|&&byte| byte == b'\n')
        .count()
        + 1
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::error::DiscrepancyKind;

    #[test]
    fn test_line_at() {
        let content = "a\nb\nc\n";
        assert_eq!(line_at(content, 0), 1);
        assert_eq!(line_at(content, 2), 2);
        assert_eq!(line_at(content, 4), 3);
        // Offsets past the end clamp instead of panicking
        assert_eq!(line_at(content, 100), 4);
    }

    #[test]
    fn test_entries_preserve_order() {
        let mut report = Report::new();
        let make = |line: usize, identifier: &str| Discrepancy {
            file: PathBuf::from("src/app.ts"),
            line,
            offset: 0,
            kind: DiscrepancyKind::Column,
            table: "users".to_string(),
            identifier: identifier.to_string(),
            suggestion: None,
        };
        report.extend(&[make(3, "aa"), make(7, "bb")]);
        report.extend(&[make(1, "cc")]);

        let lines: Vec<usize> = report.entries.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 7, 1]);
        assert_eq!(report.len(), 3);
    }

    #[test]
    fn test_entry_shape() {
        let disc = Discrepancy {
            file: PathBuf::from("src/app.ts"),
            line: 12,
            offset: 0,
            kind: DiscrepancyKind::Table,
            table: "user".to_string(),
            identifier: "user".to_string(),
            suggestion: Some("users".to_string()),
        };
        let entry = ReportEntry::from(&disc);
        assert_eq!(entry.file, "src/app.ts");
        assert_eq!(entry.line, 12);
        assert_eq!(entry.error, "Invalid table reference: 'user'");
        assert_eq!(entry.fix, "Change to 'users'");
    }
}
