use std::sync::Arc;

use crate::datatype::SqlType;
use crate::explain::{ExplainConfig, ExplainEntry, Explainable};
use crate::table::{TableHandle, TableHint, ToRelContext};

/// Represents a scan of a table.
#[derive(Debug, Clone)]
pub struct LogicalScan {
    /// Table being scanned.
    pub table: Arc<dyn TableHandle>,
    /// Types representing all columns from the source.
    pub types: Vec<SqlType>,
    /// Names for all columns from the source.
    pub names: Vec<String>,
    /// Positional column projections.
    pub projection: Vec<usize>,
    /// Hints from the table reference.
    pub hints: Vec<TableHint>,
}

impl LogicalScan {
    /// Scan every column of the table.
    pub fn for_table(table: Arc<dyn TableHandle>, ctx: &ToRelContext) -> Self {
        let row_type = table.row_type();
        let names = row_type.names().map(|s| s.to_string()).collect();
        let types = row_type.sql_types().collect();
        let projection = (0..row_type.len()).collect();

        LogicalScan {
            types,
            names,
            projection,
            hints: ctx.hints.clone(),
            table,
        }
    }
}

/// Scans are equal when they read the same handle with the same hints.
impl PartialEq for LogicalScan {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.table, &other.table)
            && self.types == other.types
            && self.names == other.names
            && self.projection == other.projection
            && self.hints == other.hints
    }
}

impl Explainable for LogicalScan {
    fn explain_entry(&self, conf: ExplainConfig) -> ExplainEntry {
        let mut ent = ExplainEntry::new("Scan")
            .with_value("source", self.table.qualified_name().join("."))
            .with_values("column_names", &self.names)
            .with_values("column_types", &self.types);

        if !self.hints.is_empty() {
            ent = ent.with_values("hints", &self.hints);
        }

        if conf.verbose {
            ent = ent
                .with_values("projection", &self.projection)
                .with_value("row_count", self.table.row_count())
                .with_value("distribution", self.table.distribution());
        }

        ent
    }
}
