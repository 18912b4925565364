use std::fmt;

use planbridge_parser::Location;

use super::Expr;
use crate::datatype::DataType;
use crate::functions::behavior::BehaviorTag;
use crate::functions::{FunctionQualifier, SqlOperator};

/// One positional argument of a call.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A data expression.
    Expr(Expr),
    /// A syntactic choice encoded as a tag.
    Symbol(BehaviorTag),
    /// A type written in the call, e.g. RETURNING VARCHAR(20).
    TypeSpec(DataType),
}

impl Operand {
    pub fn as_expr(&self) -> Option<&Expr> {
        match self {
            Self::Expr(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<BehaviorTag> {
        match self {
            Self::Symbol(tag) => Some(*tag),
            _ => None,
        }
    }
}

impl From<Expr> for Operand {
    fn from(expr: Expr) -> Self {
        Operand::Expr(expr)
    }
}

impl From<BehaviorTag> for Operand {
    fn from(tag: BehaviorTag) -> Self {
        Operand::Symbol(tag)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expr(expr) => write!(f, "{expr}"),
            Self::Symbol(tag) => write!(f, "{tag}"),
            Self::TypeSpec(datatype) => write!(f, "{datatype}"),
        }
    }
}

/// An operator applied to a list of operands.
///
/// Calls are immutable. Defaults for omitted operands have already been
/// filled in by the time a call exists.
#[derive(Debug, Clone)]
pub struct Call {
    operator: &'static dyn SqlOperator,
    qualifier: Option<FunctionQualifier>,
    pos: Location,
    operands: Vec<Operand>,
}

impl Call {
    /// Create a call from already complete operands.
    ///
    /// Skips default filling and arity checks. Operators should be going
    /// through `create_call` instead.
    pub fn new_unchecked(
        operator: &'static dyn SqlOperator,
        qualifier: Option<FunctionQualifier>,
        pos: Location,
        operands: Vec<Operand>,
    ) -> Self {
        Call {
            operator,
            qualifier,
            pos,
            operands,
        }
    }

    pub fn operator(&self) -> &'static dyn SqlOperator {
        self.operator
    }

    pub fn qualifier(&self) -> Option<FunctionQualifier> {
        self.qualifier
    }

    /// Source position of the call.
    pub fn pos(&self) -> Location {
        self.pos
    }

    pub fn operands(&self) -> &[Operand] {
        &self.operands
    }

    pub fn operand(&self, idx: usize) -> Option<&Operand> {
        self.operands.get(idx)
    }
}

/// Source position isn't part of a call's identity.
impl PartialEq for Call {
    fn eq(&self, other: &Self) -> bool {
        self.operator.name() == other.operator.name()
            && self.operator.kind() == other.operator.kind()
            && self.qualifier == other.qualifier
            && self.operands == other.operands
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.operator.name())?;
        if let Some(qualifier) = self.qualifier {
            write!(f, "{qualifier} ")?;
        }
        for (idx, operand) in self.operands.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{operand}")?;
        }
        write!(f, ")")
    }
}
