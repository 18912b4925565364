//! Type checking of bound expressions.

use crate::datatype::SqlType;
use crate::errors::{PlanError, Result};
use crate::expr::{Call, Expr, Operand};
use crate::functions::checker::{OperandType, TypeCheck};

/// Outcome of validating an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validated {
    /// The expression type checks and has this type.
    Type(SqlType),
    /// Some operand types aren't known yet. Validation needs to happen
    /// again once they are.
    Deferred,
}

impl Validated {
    pub fn sql_type(&self) -> Option<SqlType> {
        match self {
            Self::Type(t) => Some(*t),
            Self::Deferred => None,
        }
    }
}

/// Validate an expression and all calls nested inside of it.
pub fn validate_expr(expr: &Expr) -> Result<Validated> {
    match expr {
        Expr::Column(col) => Ok(match col.datatype {
            Some(t) => Validated::Type(t),
            None => Validated::Deferred,
        }),
        Expr::Literal(v) => Ok(Validated::Type(SqlType::new(v.datatype(), v.is_null()))),
        Expr::Call(call) => validate_call(call),
    }
}

/// Validate a single call against its operator's operand checker.
pub fn validate_call(call: &Call) -> Result<Validated> {
    let operand_types = call
        .operands()
        .iter()
        .map(operand_type)
        .collect::<Result<Vec<_>>>()?;

    let operator = call.operator();
    let verdict = operator.operand_type_checker().check(&operand_types);
    tracing::trace!(function = operator.name(), ?verdict, "checked operand types");

    match verdict {
        TypeCheck::Pass => Ok(match operator.derive_return_type(call, &operand_types) {
            Some(t) => Validated::Type(t),
            None => Validated::Deferred,
        }),
        TypeCheck::Deferred => Ok(Validated::Deferred),
        TypeCheck::Fail => {
            let types: Vec<_> = operand_types.iter().map(|t| format!("<{t}>")).collect();
            Err(PlanError::Validation {
                message: format!(
                    "Cannot apply '{name}' to arguments of type '{name}({})'. Supported form(s): {}",
                    types.join(", "),
                    operator.allowed_signatures().join(", "),
                    name = operator.name(),
                ),
                pos: call.pos(),
            })
        }
    }
}

/// What the checker gets to know about an operand.
fn operand_type(operand: &Operand) -> Result<OperandType> {
    Ok(match operand {
        Operand::Expr(expr) => match validate_expr(expr)? {
            Validated::Type(t) => OperandType::Resolved(t),
            Validated::Deferred => OperandType::Unresolved,
        },
        Operand::Symbol(_) | Operand::TypeSpec(_) => OperandType::Symbol,
    })
}
