use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::errors::{PlanError, Result};
use crate::field::RowType;
use crate::table::TableHandle;
use crate::table::abstract_table::AbstractTable;
use crate::table::memory::{MemoryTable, TableMetadata};

/// Definition of a table as stored in a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub row_type: RowType,
    /// Extra metadata, None if the catalog only knows the columns.
    pub metadata: Option<TableMetadata>,
}

impl TableDefinition {
    pub fn new(name: impl Into<String>, row_type: RowType) -> Self {
        TableDefinition {
            name: name.into(),
            row_type,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: TableMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A named collection of table definitions.
///
/// Schemas are built up front and shared, table handles hold a weak
/// reference back to the schema that created them.
#[derive(Debug)]
pub struct Schema {
    name: String,
    tables: BTreeMap<String, TableDefinition>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Schema {
            name: name.into(),
            tables: BTreeMap::new(),
        }
    }

    /// Add a table definition, erroring if the name is taken.
    pub fn with_table(mut self, table: TableDefinition) -> Result<Self> {
        let key = table.name.to_lowercase();
        if self.tables.contains_key(&key) {
            return Err(PlanError::Config(format!(
                "Duplicate table '{}' in schema '{}'",
                table.name, self.name
            )));
        }
        self.tables.insert(key, table);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.values().map(|t| t.name.as_str())
    }

    pub fn table_definition(&self, name: &str) -> Option<&TableDefinition> {
        self.tables.get(&name.to_lowercase())
    }

    /// Create a new handle for a table in this schema.
    ///
    /// Every call creates a distinct handle.
    pub fn create_handle(self: &Arc<Self>, name: &str) -> Option<Arc<dyn TableHandle>> {
        let def = self.table_definition(name)?;
        let handle: Arc<dyn TableHandle> = match &def.metadata {
            Some(metadata) => Arc::new(MemoryTable::with_schema(
                self,
                &def.name,
                def.row_type.clone(),
                metadata.clone(),
            )),
            None => Arc::new(AbstractTable::with_schema(
                self,
                &def.name,
                def.row_type.clone(),
            )),
        };
        tracing::debug!(schema = %self.name, table = %def.name, "created table handle");
        Some(handle)
    }
}

/// Resolves table names for a single planning context.
///
/// Each qualified name resolves to one handle for the lifetime of the
/// resolver, so every scan of the same table shares a handle.
#[derive(Debug)]
pub struct TableResolver {
    schemas: HashMap<String, Arc<Schema>>,
    default_schema: String,
    resolved: Mutex<HashMap<Vec<String>, Arc<dyn TableHandle>>>,
}

impl TableResolver {
    pub fn new(default_schema: impl Into<String>) -> Self {
        TableResolver {
            schemas: HashMap::new(),
            default_schema: default_schema.into(),
            resolved: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_schema(mut self, schema: Arc<Schema>) -> Self {
        self.schemas.insert(schema.name().to_lowercase(), schema);
        self
    }

    pub fn default_schema(&self) -> &str {
        &self.default_schema
    }

    /// Resolve a possibly schema qualified table name.
    pub fn resolve(&self, name: &[String]) -> Result<Arc<dyn TableHandle>> {
        let (schema, table) = match name {
            [table] => (self.default_schema.as_str(), table.as_str()),
            [schema, table] => (schema.as_str(), table.as_str()),
            _ => return Err(PlanError::TableNotFound(name.join("."))),
        };

        let key = vec![schema.to_lowercase(), table.to_lowercase()];
        let mut resolved = self.resolved.lock();
        if let Some(handle) = resolved.get(&key) {
            return Ok(handle.clone());
        }

        let handle = self
            .schemas
            .get(&key[0])
            .and_then(|s| s.create_handle(table))
            .ok_or_else(|| PlanError::TableNotFound(name.join(".")))?;
        tracing::debug!(table = %key.join("."), "resolved table");
        resolved.insert(key, handle.clone());

        Ok(handle)
    }

    /// Resolve a dot separated table name.
    pub fn resolve_str(&self, name: &str) -> Result<Arc<dyn TableHandle>> {
        let parts: Vec<_> = name.split('.').map(|s| s.to_string()).collect();
        self.resolve(&parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::DataType;
    use crate::field::Field;

    fn schema() -> Arc<Schema> {
        let row_type = RowType::new([Field::new("id", DataType::Int64, false)]);
        Arc::new(
            Schema::new("main")
                .with_table(TableDefinition::new("Orders", row_type))
                .unwrap(),
        )
    }

    #[test]
    fn handles_point_back_to_schema() {
        let schema = schema();
        let handle = schema.create_handle("orders").unwrap();
        assert_eq!(&["main".to_string(), "Orders".to_string()], handle.qualified_name());
        assert!(Arc::ptr_eq(&schema, &handle.schema().unwrap()));

        drop(schema);
        assert!(handle.schema().is_none());
    }

    #[test]
    fn resolver_reuses_handles() {
        let resolver = TableResolver::new("main").with_schema(schema());
        let a = resolver.resolve_str("orders").unwrap();
        let b = resolver.resolve_str("MAIN.ORDERS").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn resolver_missing_table() {
        let resolver = TableResolver::new("main").with_schema(schema());
        let err = resolver.resolve_str("main.nope").unwrap_err();
        assert_eq!("Missing table 'main.nope'", err.to_string());
        assert!(resolver.resolve_str("a.b.c").is_err());
    }

    #[test]
    fn duplicate_table_errors() {
        let res = Schema::new("main")
            .with_table(TableDefinition::new("t", RowType::empty()))
            .unwrap()
            .with_table(TableDefinition::new("T", RowType::empty()));
        assert!(res.is_err());
    }
}
