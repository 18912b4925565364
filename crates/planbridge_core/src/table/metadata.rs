use std::collections::BTreeSet;
use std::fmt;

/// Set of column ordinals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ColumnSet(BTreeSet<usize>);

impl ColumnSet {
    pub fn new(columns: impl IntoIterator<Item = usize>) -> Self {
        ColumnSet(columns.into_iter().collect())
    }

    pub fn contains(&self, column: usize) -> bool {
        self.0.contains(&column)
    }

    pub fn is_subset(&self, other: &ColumnSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ColumnSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols: Vec<_> = self.0.iter().map(|c| format!("#{c}")).collect();
        write!(f, "{{{}}}", cols.join(", "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullsOrder {
    First,
    Last,
}

/// Sort order of a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldCollation {
    pub column: usize,
    pub direction: SortDirection,
    pub nulls: NullsOrder,
}

impl FieldCollation {
    pub const fn asc(column: usize) -> Self {
        FieldCollation {
            column,
            direction: SortDirection::Ascending,
            nulls: NullsOrder::Last,
        }
    }

    pub const fn desc(column: usize) -> Self {
        FieldCollation {
            column,
            direction: SortDirection::Descending,
            nulls: NullsOrder::First,
        }
    }
}

impl fmt::Display for FieldCollation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.direction {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        };
        let nulls = match self.nulls {
            NullsOrder::First => "NULLS FIRST",
            NullsOrder::Last => "NULLS LAST",
        };
        write!(f, "#{} {dir} {nulls}", self.column)
    }
}

/// An ordering the rows of a table are known to follow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Collation {
    pub fields: Vec<FieldCollation>,
}

impl Collation {
    pub fn new(fields: impl IntoIterator<Item = FieldCollation>) -> Self {
        Collation {
            fields: fields.into_iter().collect(),
        }
    }
}

impl fmt::Display for Collation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<_> = self.fields.iter().map(|c| c.to_string()).collect();
        write!(f, "[{}]", fields.join(", "))
    }
}

/// How rows of a table are spread across partitions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Distribution {
    /// Every partition has all rows.
    Broadcast,
    /// All rows live in a single partition.
    Singleton,
    /// Rows are hash partitioned on these columns.
    Hash(Vec<usize>),
    /// Rows are range partitioned on these columns.
    Range(Vec<usize>),
    /// Rows are spread with no known pattern.
    Random,
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols = |cols: &[usize]| {
            cols.iter()
                .map(|c| format!("#{c}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        match self {
            Self::Broadcast => write!(f, "broadcast"),
            Self::Singleton => write!(f, "singleton"),
            Self::Hash(c) => write!(f, "hash[{}]", cols(c)),
            Self::Range(c) => write!(f, "range[{}]", cols(c)),
            Self::Random => write!(f, "random"),
        }
    }
}

/// Foreign key from columns of one table to a unique key of another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferentialConstraint {
    pub source: Vec<String>,
    pub target: Vec<String>,
    /// (source column, target column) pairs.
    pub column_pairs: Vec<(usize, usize)>,
}

/// How a column gets a value on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnStrategy {
    /// Nullable, NULL if not provided.
    Nullable,
    /// Must be provided.
    NotNullable,
    /// Has a default value.
    Default,
    /// Computed on read, not stored.
    Virtual,
    /// Computed on write and stored.
    Stored,
}

impl ColumnStrategy {
    pub const fn can_insert(&self) -> bool {
        !matches!(self, Self::Virtual | Self::Stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_set_subset() {
        let key = ColumnSet::new([0]);
        let wider = ColumnSet::new([1, 0]);
        assert!(key.is_subset(&wider));
        assert!(!wider.is_subset(&key));
        assert_eq!("{#0, #1}", wider.to_string());
    }

    #[test]
    fn displays() {
        assert_eq!("hash[#0, #2]", Distribution::Hash(vec![0, 2]).to_string());
        assert_eq!(
            "[#1 DESC NULLS FIRST]",
            Collation::new([FieldCollation::desc(1)]).to_string()
        );
    }
}
