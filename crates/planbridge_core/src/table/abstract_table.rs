use std::any::Any;
use std::sync::{Arc, Weak};

use super::{TableHandle, ToRelContext};
use crate::catalog::Schema;
use crate::field::RowType;
use crate::logical::logical_scan::LogicalScan;

/// A table that only knows its name and columns.
///
/// Everything else comes from the base behavior of `TableHandle`.
#[derive(Debug)]
pub struct AbstractTable {
    name: Vec<String>,
    row_type: RowType,
    schema: Weak<Schema>,
}

impl AbstractTable {
    pub fn new(name: impl IntoIterator<Item = impl Into<String>>, row_type: RowType) -> Self {
        AbstractTable {
            name: name.into_iter().map(Into::into).collect(),
            row_type,
            schema: Weak::new(),
        }
    }

    /// Create a table belonging to a schema.
    ///
    /// Only a weak reference to the schema is kept.
    pub fn with_schema(schema: &Arc<Schema>, table: &str, row_type: RowType) -> Self {
        AbstractTable {
            name: vec![schema.name().to_string(), table.to_string()],
            row_type,
            schema: Arc::downgrade(schema),
        }
    }
}

impl TableHandle for AbstractTable {
    fn qualified_name(&self) -> &[String] {
        &self.name
    }

    fn row_type(&self) -> &RowType {
        &self.row_type
    }

    fn schema(&self) -> Option<Arc<Schema>> {
        self.schema.upgrade()
    }

    fn to_rel(self: Arc<Self>, ctx: &ToRelContext) -> LogicalScan {
        LogicalScan::for_table(self, ctx)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
