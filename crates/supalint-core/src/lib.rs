//! supalint-core: static analysis of query-builder chains
//!
//! This library validates `.from('table')` query-builder call chains in a
//! source tree against a catalog built from a SQL schema dump, without
//! executing any SQL or connecting to a database.

pub mod analyzer;
pub mod error;
pub mod report;
pub mod schema;
pub mod walker;

pub use analyzer::Analyzer;
pub use error::{Discrepancy, DiscrepancyKind, Error};
pub use report::{Report, ReportEntry};
pub use schema::{Catalog, SchemaBuilder, TableDef};
pub use walker::SourceWalker;
