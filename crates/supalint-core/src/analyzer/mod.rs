//! Query-chain analyzer module

mod extractor;
mod resolver;
mod scanner;

use std::path::Path;

use crate::error::Discrepancy;
use crate::schema::Catalog;

pub use extractor::{chain_candidates, reference_sites, Candidate, ReferenceSite};
pub use resolver::Resolver;
pub use scanner::{parse_select_list, SelectItem, SelectNode};

/// Analyzes source files against a shared, read-only catalog.
///
/// Each file is independent: no state survives between calls, so files
/// can be distributed across workers and their results merged in any
/// order the caller wants.
pub struct Analyzer<'a> {
    catalog: &'a Catalog,
}

impl<'a> Analyzer<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Extract and validate every reference site in one file.
    ///
    /// Discrepancies come back in position order. An unknown table
    /// yields exactly one `table` discrepancy and suppresses column
    /// validation for that site.
    pub fn analyze(&self, file: &Path, content: &str) -> Vec<Discrepancy> {
        let resolver = Resolver::new(self.catalog);
        let mut discrepancies = Vec::new();

        for site in reference_sites(content) {
            if let Some(disc) = resolver.resolve_table(file, content, &site.table, site.offset) {
                discrepancies.push(disc);
                continue;
            }
            for candidate in chain_candidates(content, &site) {
                if let Some(disc) = resolver.resolve_candidate(file, content, &candidate) {
                    discrepancies.push(disc);
                }
            }
        }

        discrepancies
    }
}
