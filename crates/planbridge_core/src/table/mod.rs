//! Planner facing view of catalog tables.
pub mod abstract_table;
pub mod memory;
pub mod metadata;

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use metadata::{Collation, ColumnSet, ColumnStrategy, Distribution, ReferentialConstraint};

use crate::catalog::Schema;
use crate::errors::{PlanError, Result};
use crate::field::{Field, RowType};
use crate::logical::logical_scan::LogicalScan;
use crate::statistics::assumptions::DEFAULT_ROW_COUNT;

/// A hint attached to a table reference, e.g. `t /*+ index(idx_a) */`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableHint {
    pub name: String,
    pub options: Vec<String>,
}

impl fmt::Display for TableHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.options.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}({})", self.name, self.options.join(", "))
        }
    }
}

/// Context for converting a table into a scan.
#[derive(Debug, Clone, Default)]
pub struct ToRelContext {
    pub hints: Vec<TableHint>,
}

/// Runtime representation an executor wants a table source in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalTarget {
    /// Row at a time iteration.
    Rows,
    /// Columnar batches.
    Batches,
}

/// Handle an executor can use to read a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceExpression {
    pub target: PhysicalTarget,
    pub source: String,
}

/// Per column statistics a table may be able to provide.
pub trait ColumnStatistics: fmt::Debug + Sync + Send {
    /// Estimated number of distinct values in the column.
    fn distinct_count(&self, column: usize) -> Option<f64>;

    /// Estimated fraction of rows that are NULL in the column.
    fn null_fraction(&self, column: usize) -> Option<f64>;
}

/// A table as seen by the planner.
///
/// The base implementations of the provided methods are conservative: they
/// never claim a guarantee (keys, ordering) the table might not uphold.
/// Catalogs override them when they know better.
///
/// Handles are immutable. Changing the columns produces a new handle.
pub trait TableHandle: fmt::Debug + Sync + Send {
    /// Name components identifying the table, e.g. `["main", "orders"]`.
    fn qualified_name(&self) -> &[String];

    fn row_type(&self) -> &RowType;

    /// Schema this table belongs to, if it's still alive.
    fn schema(&self) -> Option<Arc<Schema>> {
        None
    }

    /// Estimated number of rows.
    fn row_count(&self) -> f64 {
        DEFAULT_ROW_COUNT
    }

    fn collations(&self) -> Vec<Collation> {
        Vec::new()
    }

    fn distribution(&self) -> Distribution {
        Distribution::Broadcast
    }

    /// If the columns are known to uniquely identify a row.
    fn is_key(&self, _columns: &ColumnSet) -> bool {
        false
    }

    fn keys(&self) -> Vec<ColumnSet> {
        Vec::new()
    }

    fn referential_constraints(&self) -> Vec<ReferentialConstraint> {
        Vec::new()
    }

    /// Convert into a scan bound to this handle.
    ///
    /// Implementations that don't need anything special should use
    /// `LogicalScan::for_table`.
    fn to_rel(self: Arc<Self>, ctx: &ToRelContext) -> LogicalScan;

    /// How an executor can read the table, if this table supports the target.
    fn expression(&self, _target: PhysicalTarget) -> Option<SourceExpression> {
        None
    }

    /// Create a new handle with additional columns appended.
    fn extend(&self, _fields: Vec<Field>) -> Result<Arc<dyn TableHandle>> {
        Err(PlanError::UnsupportedExtension {
            table: self.qualified_name().join("."),
        })
    }

    /// Insert strategy for each column.
    fn column_strategies(&self) -> Vec<ColumnStrategy> {
        self.row_type()
            .fields
            .iter()
            .map(|f| {
                if f.nullable {
                    ColumnStrategy::Nullable
                } else {
                    ColumnStrategy::NotNullable
                }
            })
            .collect()
    }

    fn column_statistics(&self) -> Option<&(dyn ColumnStatistics + 'static)> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// Something a table handle may be able to provide beyond the base contract.
pub trait Capability {
    type Target: ?Sized;

    fn recover(table: &dyn TableHandle) -> Option<&Self::Target>;
}

/// Recover the concrete handle type.
#[derive(Debug)]
pub struct Concrete<T>(PhantomData<T>);

impl<T: TableHandle + 'static> Capability for Concrete<T> {
    type Target = T;

    fn recover(table: &dyn TableHandle) -> Option<&T> {
        table.as_any().downcast_ref::<T>()
    }
}

/// Recover per column statistics.
#[derive(Debug)]
pub struct ColumnStatisticsCapability;

impl Capability for ColumnStatisticsCapability {
    type Target = dyn ColumnStatistics;

    fn recover(table: &dyn TableHandle) -> Option<&Self::Target> {
        table.column_statistics()
    }
}

impl dyn TableHandle {
    /// Try to get a capability from this handle.
    ///
    /// None is a normal result, meaning the table doesn't provide it.
    pub fn unwrap<C: Capability>(&self) -> Option<&C::Target> {
        C::recover(self)
    }
}
