use std::any::Any;
use std::collections::HashSet;
use std::sync::{Arc, Weak};

use super::metadata::{Collation, ColumnSet, Distribution, ReferentialConstraint};
use super::{
    ColumnStatistics, PhysicalTarget, SourceExpression, TableHandle, ToRelContext,
};
use crate::catalog::Schema;
use crate::errors::{PlanError, Result};
use crate::field::{Field, RowType};
use crate::logical::logical_scan::LogicalScan;
use crate::statistics::assumptions::DEFAULT_ROW_COUNT;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColumnStats {
    pub distinct_count: Option<f64>,
    pub null_fraction: Option<f64>,
}

/// Metadata a catalog knows about a table on top of its columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableMetadata {
    pub row_count: Option<f64>,
    pub keys: Vec<ColumnSet>,
    pub collations: Vec<Collation>,
    pub distribution: Option<Distribution>,
    pub constraints: Vec<ReferentialConstraint>,
    /// Stats for each column, by position. May be shorter than the row type.
    pub column_stats: Vec<ColumnStats>,
}

/// A table whose metadata is held in memory by the catalog.
///
/// Supports adding columns through `extend`.
#[derive(Debug, Clone)]
pub struct MemoryTable {
    name: Vec<String>,
    row_type: RowType,
    schema: Weak<Schema>,
    metadata: TableMetadata,
}

impl MemoryTable {
    pub fn new(
        name: impl IntoIterator<Item = impl Into<String>>,
        row_type: RowType,
        metadata: TableMetadata,
    ) -> Self {
        MemoryTable {
            name: name.into_iter().map(Into::into).collect(),
            row_type,
            schema: Weak::new(),
            metadata,
        }
    }

    pub fn with_schema(
        schema: &Arc<Schema>,
        table: &str,
        row_type: RowType,
        metadata: TableMetadata,
    ) -> Self {
        MemoryTable {
            name: vec![schema.name().to_string(), table.to_string()],
            row_type,
            schema: Arc::downgrade(schema),
            metadata,
        }
    }

    pub fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }
}

impl TableHandle for MemoryTable {
    fn qualified_name(&self) -> &[String] {
        &self.name
    }

    fn row_type(&self) -> &RowType {
        &self.row_type
    }

    fn schema(&self) -> Option<Arc<Schema>> {
        self.schema.upgrade()
    }

    fn row_count(&self) -> f64 {
        self.metadata.row_count.unwrap_or(DEFAULT_ROW_COUNT)
    }

    fn collations(&self) -> Vec<Collation> {
        self.metadata.collations.clone()
    }

    fn distribution(&self) -> Distribution {
        self.metadata
            .distribution
            .clone()
            .unwrap_or(Distribution::Broadcast)
    }

    fn is_key(&self, columns: &ColumnSet) -> bool {
        self.metadata.keys.iter().any(|key| key.is_subset(columns))
    }

    fn keys(&self) -> Vec<ColumnSet> {
        self.metadata.keys.clone()
    }

    fn referential_constraints(&self) -> Vec<ReferentialConstraint> {
        self.metadata.constraints.clone()
    }

    fn to_rel(self: Arc<Self>, ctx: &ToRelContext) -> LogicalScan {
        LogicalScan::for_table(self, ctx)
    }

    fn expression(&self, target: PhysicalTarget) -> Option<SourceExpression> {
        Some(SourceExpression {
            target,
            source: format!("memory:{}", self.name.join(".")),
        })
    }

    fn extend(&self, fields: Vec<Field>) -> Result<Arc<dyn TableHandle>> {
        let mut seen: HashSet<String> = self
            .row_type
            .names()
            .map(|n| n.to_lowercase())
            .collect();
        for field in &fields {
            if !seen.insert(field.name.to_lowercase()) {
                return Err(PlanError::DuplicateColumn {
                    table: self.name.join("."),
                    column: field.name.clone(),
                });
            }
        }

        let added = fields.len();
        let row_type = self.row_type.extended(fields);
        let mut metadata = self.metadata.clone();
        metadata
            .column_stats
            .resize(self.row_type.len(), ColumnStats::default());
        metadata
            .column_stats
            .extend(std::iter::repeat_n(ColumnStats::default(), added));

        tracing::debug!(table = %self.name.join("."), added, "extended table");

        Ok(Arc::new(MemoryTable {
            name: self.name.clone(),
            row_type,
            schema: self.schema.clone(),
            metadata,
        }))
    }

    fn column_statistics(&self) -> Option<&(dyn ColumnStatistics + 'static)> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ColumnStatistics for MemoryTable {
    fn distinct_count(&self, column: usize) -> Option<f64> {
        self.metadata.column_stats.get(column)?.distinct_count
    }

    fn null_fraction(&self, column: usize) -> Option<f64> {
        self.metadata.column_stats.get(column)?.null_fraction
    }
}
