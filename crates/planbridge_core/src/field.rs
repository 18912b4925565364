use std::fmt;

use crate::datatype::{DataType, SqlType};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub datatype: DataType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, datatype: DataType, nullable: bool) -> Self {
        Field {
            name: name.into(),
            datatype,
            nullable,
        }
    }

    pub fn sql_type(&self) -> SqlType {
        SqlType::new(self.datatype, self.nullable)
    }
}

/// Ordered set of columns produced by a relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RowType {
    pub fields: Vec<Field>,
}

impl RowType {
    pub fn new(fields: impl IntoIterator<Item = Field>) -> Self {
        RowType {
            fields: fields.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Find a column by name, ignoring case.
    pub fn find_field(&self, name: &str) -> Option<(usize, &Field)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, f)| f.name.eq_ignore_ascii_case(name))
    }

    /// Create a new row type with additional fields appended.
    pub fn extended(&self, additional: impl IntoIterator<Item = Field>) -> Self {
        let mut fields = self.fields.clone();
        fields.extend(additional);
        RowType { fields }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn sql_types(&self) -> impl Iterator<Item = SqlType> + '_ {
        self.fields.iter().map(|f| f.sql_type())
    }
}

impl fmt::Display for RowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (idx, field) in self.fields.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", field.name, field.sql_type())?;
        }
        write!(f, ")")
    }
}
