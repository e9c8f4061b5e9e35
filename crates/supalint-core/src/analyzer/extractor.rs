//! Reference extraction - table-reference call sites and their chains
//!
//! The extractor proposes candidate facts; it raises no discrepancies
//! itself. Anything that does not match the expected literal-string
//! shape (a dynamically computed argument, an interpolated template) is
//! skipped, never fatal.

use tracing::{debug, trace};

use crate::analyzer::scanner::{parse_select_list, SelectItem, SelectNode};

/// Method that opens a query chain on a table
const FROM_METHOD: &str = ".from(";
/// Column-selection method
const SELECT_METHOD: &str = ".select(";
/// Filter and ordering methods taking a column name as first argument
const FILTER_METHODS: &[&str] = &[
    "eq",
    "neq",
    "gt",
    "gte",
    "lt",
    "lte",
    "like",
    "ilike",
    "is",
    "in",
    "contains",
    "containedBy",
    "rangeGt",
    "rangeGte",
    "rangeLt",
    "rangeLte",
    "rangeAdjacent",
    "overlaps",
    "textSearch",
    "match",
    "order",
];
/// Write-path methods: recognized, payload keys never parsed
const WRITE_METHODS: &[&str] = &["insert", "update", "upsert"];

/// One `.from('table')` occurrence with its bounded chain scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSite {
    pub table: String,
    /// Byte offset of the `.from(` call
    pub offset: usize,
    /// Bounds of the text searched for chained operations
    pub scope_start: usize,
    pub scope_end: usize,
}

/// A fact proposed by the extractor, checked by the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Identifier to validate against `table`'s column set
    Column {
        table: String,
        column: String,
        offset: usize,
    },
    /// Relation embedding. May legitimately be a foreign-key name
    /// rather than a table name, so it is trusted and never reported.
    Relation { name: String, offset: usize },
}

/// Locate every table-reference call with a literal string argument.
///
/// Each site's scope starts after the call and ends at the first `;`,
/// or just before the next `.from(` call, whichever comes first. This
/// keeps one chain's operations from leaking into the next.
pub fn reference_sites(content: &str) -> Vec<ReferenceSite> {
    let mut sites = Vec::new();
    let mut search_from = 0;
    while let Some(found) = content[search_from..].find(FROM_METHOD) {
        let call = search_from + found;
        let arg_start = call + FROM_METHOD.len();
        search_from = arg_start;
        let Some((table, scope_start)) = literal_ident_arg(content, arg_start) else {
            trace!(offset = call, "skipped non-literal table reference");
            continue;
        };

        let semi = content[scope_start..]
            .find(';')
            .map(|p| scope_start + p)
            .unwrap_or(content.len());
        let next_call = content[scope_start..]
            .find(FROM_METHOD)
            .map(|p| scope_start + p)
            .unwrap_or(content.len());

        sites.push(ReferenceSite {
            table,
            offset: call,
            scope_start,
            scope_end: semi.min(next_call),
        });
    }
    sites
}

/// Collect candidate facts from one site's bounded scope
pub fn chain_candidates(content: &str, site: &ReferenceSite) -> Vec<Candidate> {
    let scope = &content[site.scope_start..site.scope_end];
    let mut candidates = Vec::new();
    collect_select_candidates(scope, site, &mut candidates);
    collect_filter_candidates(scope, site, &mut candidates);
    note_write_calls(scope, site);
    candidates
}

fn collect_select_candidates(scope: &str, site: &ReferenceSite, out: &mut Vec<Candidate>) {
    let mut search_from = 0;
    while let Some(found) = scope[search_from..].find(SELECT_METHOD) {
        let call = search_from + found;
        let arg_start = call + SELECT_METHOD.len();
        search_from = arg_start;
        let Some((list, _)) = literal_string_arg(scope, arg_start) else {
            trace!(table = %site.table, "skipped non-literal selection list");
            continue;
        };
        let offset = site.scope_start + call;
        flatten_items(&parse_select_list(&list), &site.table, offset, out);
    }
}

/// Turn parsed selection items into candidates. Only top-level columns
/// are validated; relation inner lists are recognized but trusted.
fn flatten_items(items: &[SelectItem], table: &str, offset: usize, out: &mut Vec<Candidate>) {
    for item in items {
        match &item.node {
            SelectNode::Column(name) => {
                // Wildcards and tokens that strip down to nothing are
                // not validatable.
                if name.is_empty() || name == "*" {
                    continue;
                }
                out.push(Candidate::Column {
                    table: table.to_string(),
                    column: name.clone(),
                    offset,
                });
            }
            SelectNode::Relation { name, .. } => {
                out.push(Candidate::Relation {
                    name: name.clone(),
                    offset,
                });
            }
        }
    }
}

fn collect_filter_candidates(scope: &str, site: &ReferenceSite, out: &mut Vec<Candidate>) {
    for method in FILTER_METHODS {
        let needle = format!(".{method}(");
        let mut search_from = 0;
        while let Some(found) = scope[search_from..].find(&needle) {
            let call = search_from + found;
            let arg_start = call + needle.len();
            search_from = arg_start;
            let Some((arg, _)) = literal_string_arg(scope, arg_start) else {
                trace!(method = %method, "skipped non-literal filter argument");
                continue;
            };
            push_filter_candidate(&arg, site, site.scope_start + call, out);
        }
    }
}

/// A filter argument names a column on the enclosing table, or
/// `related.column`, validated against the related table.
fn push_filter_candidate(arg: &str, site: &ReferenceSite, offset: usize, out: &mut Vec<Candidate>) {
    let arg = arg.split("->").next().unwrap_or_default().trim();
    if arg.is_empty() {
        return;
    }
    let (table, column) = match arg.split_once('.') {
        Some((related, column)) => (related, column),
        None => (site.table.as_str(), arg),
    };
    out.push(Candidate::Column {
        table: table.to_string(),
        column: column.to_string(),
        offset,
    });
}

fn note_write_calls(scope: &str, site: &ReferenceSite) {
    for method in WRITE_METHODS {
        let needle = format!(".{method}(");
        if scope.contains(&needle) {
            debug!(table = %site.table, method = %method, "write payload keys are not validated");
        }
    }
}

/// Parse a single-identifier literal string argument followed by `)`.
/// Returns the identifier and the offset just past the closing paren.
fn literal_ident_arg(content: &str, mut pos: usize) -> Option<(String, usize)> {
    let bytes = content.as_bytes();
    while bytes.get(pos).is_some_and(|c| c.is_ascii_whitespace()) {
        pos += 1;
    }
    let quote = *bytes.get(pos)?;
    if !matches!(quote, b'\'' | b'"' | b'`') {
        return None;
    }
    pos += 1;
    let start = pos;
    while bytes
        .get(pos)
        .is_some_and(|c| c.is_ascii_alphanumeric() || *c == b'_')
    {
        pos += 1;
    }
    if pos == start || bytes.get(pos) != Some(&quote) {
        return None;
    }
    let ident = content[start..pos].to_string();
    pos += 1;
    while bytes.get(pos).is_some_and(|c| c.is_ascii_whitespace()) {
        pos += 1;
    }
    if bytes.get(pos) != Some(&b')') {
        return None;
    }
    Some((ident, pos + 1))
}

/// Parse a literal string argument delimited by `'`, `"`, or a backtick.
/// Backtick templates carrying `${` interpolation are not literals and
/// are skipped.
fn literal_string_arg(scope: &str, mut pos: usize) -> Option<(String, usize)> {
    let bytes = scope.as_bytes();
    while bytes.get(pos).is_some_and(|c| c.is_ascii_whitespace()) {
        pos += 1;
    }
    let quote = *bytes.get(pos)?;
    if !matches!(quote, b'\'' | b'"' | b'`') {
        return None;
    }
    pos += 1;
    let start = pos;
    while let Some(&c) = bytes.get(pos) {
        if c == quote {
            let text = &scope[start..pos];
            if text.contains("${") {
                return None;
            }
            return Some((text.to_string(), pos + 1));
        }
        pos += 1;
    }
    None
}
