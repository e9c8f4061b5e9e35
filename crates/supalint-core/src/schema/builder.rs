//! Schema builder - harvests a Catalog from a SQL schema dump
//!
//! The dump is not parsed as SQL. Each `CREATE TABLE` block is split off
//! and scanned line by line for `name type` column declarations; nothing
//! else in the dump needs to be valid SQL. A block or line that cannot
//! be harvested is skipped, never fatal.

use std::path::Path;

use tracing::debug;

use crate::error::Error;
use crate::schema::{Catalog, TableDef};

/// Marker that opens each table block in the dump
const CREATE_TABLE: &str = "CREATE TABLE ";

/// Keywords that open constraint clauses inside a CREATE TABLE body.
/// A line led by one of these carries no column declaration, and none
/// of them may be taken as a column name.
const CONSTRAINT_KEYWORDS: &[&str] =
    &["CONSTRAINT", "PRIMARY", "FOREIGN", "UNIQUE", "CHECK", "EXCLUDE"];

/// Builder for constructing a Catalog from schema dump text
pub struct SchemaBuilder {
    catalog: Catalog,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            catalog: Catalog::new(),
        }
    }

    /// Parse a schema dump and add its tables to the catalog.
    ///
    /// Best-effort: a malformed block contributes no columns for its
    /// table rather than aborting the build.
    pub fn parse(&mut self, dump: &str) {
        for block in dump.split(CREATE_TABLE).skip(1) {
            match parse_block(block) {
                Some(table) => self.catalog.add_table(table),
                None => debug!("skipped table block with unreadable name"),
            }
        }
    }

    /// Read and parse a schema dump file.
    ///
    /// An I/O failure here is the builder's only fatal outcome.
    pub fn parse_file(&mut self, path: &Path) -> Result<(), Error> {
        let dump = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(&dump);
        Ok(())
    }

    /// Consume the builder and return the catalog
    pub fn build(self) -> Catalog {
        self.catalog
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one block: everything between a `CREATE TABLE ` marker and the
/// next. Returns None when no table name can be read.
fn parse_block(block: &str) -> Option<TableDef> {
    let name = table_name(block)?;
    let mut table = TableDef::new(name);

    // Column declarations live between the opening paren and the
    // terminator line (leading `)`), one per line.
    if let Some(open) = block.find('(') {
        for line in block[open + 1..].lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with(')') {
                break;
            }
            if is_constraint_line(line) {
                continue;
            }
            match column_decl(line) {
                Some((column, type_tag)) => table.add_column(column, type_tag),
                None => debug!(line, "skipped unparseable column line"),
            }
        }
    }

    Some(table)
}

/// Table name: the contiguous identifier at the head of the block, with
/// any `schema.` qualifier dropped and quoting stripped.
fn table_name(block: &str) -> Option<String> {
    let head: String = block
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '"'))
        .collect();
    let name = head.rsplit('.').next()?.trim_matches('"');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

fn is_constraint_line(line: &str) -> bool {
    let first = line.split_whitespace().next().unwrap_or("");
    CONSTRAINT_KEYWORDS
        .iter()
        .any(|kw| first.eq_ignore_ascii_case(kw))
}

/// Split a declaration line into (column name, type tag): the first two
/// identifiers on the line. Nothing after them needs to parse.
fn column_decl(line: &str) -> Option<(String, String)> {
    let mut words = line.split_whitespace();
    let column = words.next()?.trim_end_matches(',').trim_matches('"');
    let type_tag = words.next()?.trim_end_matches(',');
    if column.is_empty() || type_tag.is_empty() {
        return None;
    }
    Some((column.to_string(), type_tag.to_string()))
}
