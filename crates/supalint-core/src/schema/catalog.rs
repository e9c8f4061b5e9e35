//! Schema catalog - stores table and column definitions

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Schema catalog - holds every table harvested from the schema dump.
///
/// Built once, read-only afterward. Iteration follows declaration order,
/// which keeps suggestion tie-breaking and report output deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Table name -> TableDef
    pub tables: IndexMap<String, TableDef>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            tables: IndexMap::new(),
        }
    }

    /// Add a table to the catalog
    pub fn add_table(&mut self, table: TableDef) {
        self.tables.insert(table.name.clone(), table);
    }

    /// Look up a table by name.
    ///
    /// Lookups are case-sensitive: the query builder passes identifiers
    /// through to the database verbatim.
    pub fn get_table(&self, name: &str) -> Option<&TableDef> {
        self.tables.get(name)
    }

    /// Check if a table exists
    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// All table names, in declaration order (for typo suggestions)
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }
}

/// Table definition: column name -> declared type tag.
///
/// The type tag is informational only; validation is pure existence
/// checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    pub name: String,
    pub columns: IndexMap<String, String>,
}

impl TableDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: IndexMap::new(),
        }
    }

    /// Add a column with its declared type tag
    pub fn add_column(&mut self, name: impl Into<String>, type_tag: impl Into<String>) {
        self.columns.insert(name.into(), type_tag.into());
    }

    /// Check if a column exists
    pub fn column_exists(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// All column names, in declaration order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|s| s.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_add_table() {
        let mut catalog = Catalog::new();
        let mut table = TableDef::new("users");
        table.add_column("id", "uuid");
        catalog.add_table(table);

        assert!(catalog.table_exists("users"));
        assert!(catalog.get_table("users").unwrap().column_exists("id"));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let mut catalog = Catalog::new();
        catalog.add_table(TableDef::new("Users"));

        assert!(catalog.table_exists("Users"));
        assert!(!catalog.table_exists("users"));
    }

    #[test]
    fn test_names_keep_declaration_order() {
        let mut catalog = Catalog::new();
        catalog.add_table(TableDef::new("users"));
        catalog.add_table(TableDef::new("orders"));
        catalog.add_table(TableDef::new("profiles"));

        assert_eq!(catalog.table_names(), vec!["users", "orders", "profiles"]);
    }
}
