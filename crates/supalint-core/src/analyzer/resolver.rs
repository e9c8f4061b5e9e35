//! Candidate validation and nearest-neighbor suggestions

use std::path::Path;

use tracing::debug;

use crate::analyzer::extractor::Candidate;
use crate::error::{Discrepancy, DiscrepancyKind};
use crate::report::line_at;
use crate::schema::Catalog;

/// Similarity below which no suggestion is offered
const SUGGESTION_THRESHOLD: f64 = 0.6;

/// Checks candidate facts against the catalog and produces
/// discrepancies with suggested corrections.
pub struct Resolver<'a> {
    catalog: &'a Catalog,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Check a table reference. `None` means the table is known.
    pub fn resolve_table(
        &self,
        file: &Path,
        content: &str,
        table: &str,
        offset: usize,
    ) -> Option<Discrepancy> {
        if self.catalog.table_exists(table) {
            return None;
        }
        let suggestion = find_closest(table, self.catalog.table_names());
        Some(Discrepancy {
            file: file.to_path_buf(),
            line: line_at(content, offset),
            offset,
            kind: DiscrepancyKind::Table,
            table: table.to_string(),
            identifier: table.to_string(),
            suggestion,
        })
    }

    /// Check one candidate fact against the catalog
    pub fn resolve_candidate(
        &self,
        file: &Path,
        content: &str,
        candidate: &Candidate,
    ) -> Option<Discrepancy> {
        match candidate {
            Candidate::Column {
                table,
                column,
                offset,
            } => {
                // Cross-table filter references may name a table we do
                // not know; those are skipped, not reported.
                let table_def = self.catalog.get_table(table)?;
                if table_def.column_exists(column) {
                    return None;
                }
                let suggestion = find_closest(column, table_def.column_names());
                Some(Discrepancy {
                    file: file.to_path_buf(),
                    line: line_at(content, *offset),
                    offset: *offset,
                    kind: DiscrepancyKind::Column,
                    table: table.clone(),
                    identifier: column.clone(),
                    suggestion,
                })
            }
            Candidate::Relation { name, .. } => {
                if !self.catalog.table_exists(name) {
                    // May be a foreign-key name rather than a table name
                    debug!(relation = %name, "relation name is not a known table");
                }
                None
            }
        }
    }
}

/// Nearest valid identifier by normalized edit-distance similarity.
/// Deterministic: best similarity wins, ties keep the earliest
/// candidate in catalog order.
fn find_closest(name: &str, candidates: Vec<&str>) -> Option<String> {
    let mut best: Option<(f64, &str)> = None;
    for candidate in candidates {
        let score = similarity(name, candidate);
        if score < SUGGESTION_THRESHOLD {
            continue;
        }
        if best.map_or(true, |(top, _)| score > top) {
            best = Some((score, candidate));
        }
    }
    best.map(|(_, candidate)| candidate.to_string())
}

/// Similarity in [0, 1]: 1 - distance / longer length, case-insensitive
fn similarity(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - osa_distance(&a, &b) as f64 / longest as f64
}

/// Damerau-Levenshtein distance, optimal-string-alignment form: an
/// adjacent transposition costs 1, so swapped-letter typos stay close.
fn osa_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut dp = vec![vec![0usize; n + 1]; m + 1];

    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in dp[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=m {
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
            if i > 1 && j > 1 && a_chars[i - 1] == b_chars[j - 2] && a_chars[i - 2] == b_chars[j - 1]
            {
                dp[i][j] = dp[i][j].min(dp[i - 2][j - 2] + 1);
            }
        }
    }

    dp[m][n]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osa_distance() {
        assert_eq!(osa_distance("kitten", "sitting"), 3);
        assert_eq!(osa_distance("", "abc"), 3);
        assert_eq!(osa_distance("abc", ""), 3);
        assert_eq!(osa_distance("equal", "equal"), 0);
        // Adjacent transposition counts once
        assert_eq!(osa_distance("nmae", "name"), 1);
    }

    #[test]
    fn test_transposed_typo_clears_threshold() {
        assert!(similarity("nmae", "name") >= SUGGESTION_THRESHOLD);
    }

    #[test]
    fn test_find_closest_prefers_best_match() {
        let candidates = vec!["id", "name", "email"];
        assert_eq!(find_closest("nmae", candidates), Some("name".to_string()));
    }

    #[test]
    fn test_find_closest_rejects_distant_names() {
        let candidates = vec!["id", "name", "email"];
        assert_eq!(find_closest("created_at", candidates), None);
    }

    #[test]
    fn test_find_closest_singular_plural() {
        let candidates = vec!["users", "orders"];
        assert_eq!(find_closest("user", candidates), Some("users".to_string()));
    }

    #[test]
    fn test_tie_keeps_catalog_order() {
        // Both are distance 1 from "ab"; the earlier one wins
        let candidates = vec!["abc", "abd"];
        assert_eq!(find_closest("ab", candidates), Some("abc".to_string()));
    }
}
