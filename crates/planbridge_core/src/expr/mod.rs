pub mod call;
pub use call::*;

use std::fmt;

use crate::datatype::SqlType;
use crate::scalar::ScalarValue;

/// Reference to a column of some table in scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnExpr {
    /// Table name or alias the column was qualified with.
    pub table: Option<String>,
    pub name: String,
    /// Type of the column, None if not resolved against a table.
    pub datatype: Option<SqlType>,
}

impl fmt::Display for ColumnExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{table}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(ColumnExpr),
    Literal(ScalarValue),
    Call(Box<Call>),
}

impl Expr {
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column(ColumnExpr {
            table: None,
            name: name.into(),
            datatype: None,
        })
    }

    pub fn literal(value: impl Into<ScalarValue>) -> Self {
        Expr::Literal(value.into())
    }

    pub fn as_call(&self) -> Option<&Call> {
        match self {
            Self::Call(call) => Some(call),
            _ => None,
        }
    }
}

impl From<Call> for Expr {
    fn from(call: Call) -> Self {
        Expr::Call(Box::new(call))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Column(col) => write!(f, "{col}"),
            Self::Literal(ScalarValue::Utf8(s)) => write!(f, "'{s}'"),
            Self::Literal(v) => write!(f, "{v}"),
            Self::Call(call) => write!(f, "{call}"),
        }
    }
}
