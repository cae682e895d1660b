use serde::{Deserialize, Serialize};
use std::sync::RwLock;

/// One table definition as submitted by the client. Duplicate table or
/// column names are accepted as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDef {
    pub table: String,
    pub columns: Vec<String>,
}

impl TableDef {
    pub fn new(table: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            table: table.into(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// `name(col1, col2, …)`
    pub fn render(&self) -> String {
        format!("{}({})", self.table, self.columns.join(", "))
    }
}

/// One line per table, joined with newlines. An empty schema renders as the
/// empty string.
pub fn render_schema(tables: &[TableDef]) -> String {
    tables
        .iter()
        .map(TableDef::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Schema installed at process start, before any update arrives.
pub fn default_schema() -> Vec<TableDef> {
    vec![
        TableDef::new("users", &["id", "name", "email"]),
        TableDef::new("orders", &["id", "user_id", "total", "date"]),
    ]
}

struct Inner {
    tables: Vec<TableDef>,
    version: u64,
}

/// Owned, lock-guarded holder for the current schema. Replacement is
/// wholesale, never a merge; readers see either the old or the new value.
pub struct SchemaStore {
    inner: RwLock<Inner>,
}

impl SchemaStore {
    pub fn new(tables: Vec<TableDef>) -> Self {
        Self {
            inner: RwLock::new(Inner { tables, version: 0 }),
        }
    }

    pub fn get(&self) -> Vec<TableDef> {
        self.inner.read().unwrap().tables.clone()
    }

    /// Overwrites the schema unconditionally and returns the installed value.
    pub fn replace(&self, tables: Vec<TableDef>) -> Vec<TableDef> {
        let mut inner = self.inner.write().unwrap();
        inner.tables = tables;
        inner.version += 1;
        inner.tables.clone()
    }

    pub fn version(&self) -> u64 {
        self.inner.read().unwrap().version
    }

    /// Snapshot and render under a single read lock.
    pub fn render(&self) -> String {
        render_schema(&self.inner.read().unwrap().tables)
    }
}

impl Default for SchemaStore {
    fn default() -> Self {
        Self::new(default_schema())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table() {
        let t = TableDef::new("users", &["id", "name"]);
        assert_eq!(t.render(), "users(id, name)");
    }

    #[test]
    fn test_render_schema_joins_lines() {
        let text = render_schema(&default_schema());
        assert_eq!(
            text,
            "users(id, name, email)\norders(id, user_id, total, date)"
        );
    }

    #[test]
    fn test_render_empty_schema() {
        assert_eq!(render_schema(&[]), "");
        assert_eq!(SchemaStore::new(Vec::new()).render(), "");
    }

    #[test]
    fn test_replace_then_get_is_structurally_equal() {
        let store = SchemaStore::default();
        let submitted = vec![
            TableDef::new("b", &["z", "a"]),
            TableDef::new("a", &["x"]),
        ];
        let installed = store.replace(submitted.clone());
        assert_eq!(installed, submitted);
        assert_eq!(store.get(), submitted);
    }

    #[test]
    fn test_replace_is_wholesale() {
        let store = SchemaStore::default();
        store.replace(vec![TableDef::new("only", &["c"])]);
        assert_eq!(store.get().len(), 1);
    }

    #[test]
    fn test_duplicate_names_accepted() {
        let store = SchemaStore::default();
        let dup = vec![
            TableDef::new("t", &["c", "c"]),
            TableDef::new("t", &["c"]),
        ];
        assert_eq!(store.replace(dup.clone()), dup);
    }

    #[test]
    fn test_version_bumps_on_replace() {
        let store = SchemaStore::default();
        assert_eq!(store.version(), 0);
        store.replace(Vec::new());
        store.replace(default_schema());
        assert_eq!(store.version(), 2);
    }
}
