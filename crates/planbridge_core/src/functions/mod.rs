pub mod behavior;
pub mod checker;
pub mod json_query;
pub mod operator_table;
pub mod return_type;

use std::fmt;

use planbridge_parser::Location;

use behavior::BehaviorOperand;
use checker::{OperandType, OperandTypeChecker};
use return_type::ReturnTypeInference;

use crate::datatype::SqlType;
use crate::errors::{PlanError, Result};
use crate::expr::{Call, Operand};
use crate::unparse::SqlWriter;

/// Function categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionCategory {
    System,
    String,
    Numeric,
    Json,
    UserDefined,
}

impl FunctionCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::String => "string",
            Self::Numeric => "numeric",
            Self::Json => "json",
            Self::UserDefined => "user_defined",
        }
    }
}

/// Syntactic kind of an operator, part of its identity along with the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    /// A function without dedicated handling in the planner.
    OtherFunction,
    /// A function written with regular `f(a, b)` syntax.
    Function,
}

/// Set quantifier on a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionQualifier {
    Distinct,
    All,
}

impl fmt::Display for FunctionQualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Distinct => write!(f, "DISTINCT"),
            Self::All => write!(f, "ALL"),
        }
    }
}

/// Definition of a SQL operator.
///
/// Operators are stateless and shared between every call that uses them, and
/// between concurrent planning sessions. A single static instance exists per
/// operator.
pub trait SqlOperator: fmt::Debug + Sync + Send {
    fn name(&self) -> &'static str;

    fn kind(&self) -> OperatorKind {
        OperatorKind::Function
    }

    fn category(&self) -> FunctionCategory;

    fn operand_type_checker(&self) -> &OperandTypeChecker;

    fn return_type_inference(&self) -> &ReturnTypeInference;

    /// Operand positions holding behavior tags.
    fn behavior_operands(&self) -> &[BehaviorOperand] {
        &[]
    }

    /// Operand positions holding type specs, e.g. a RETURNING type.
    fn type_spec_operands(&self) -> &[usize] {
        &[]
    }

    /// Complete a partially filled operand list.
    ///
    /// Absent behavior operands get their default tag, trailing absent
    /// operands are dropped. Explicitly provided operands are never changed,
    /// but must be of the kind their position declares.
    fn fill_operands(
        &self,
        pos: Location,
        operands: Vec<Option<Operand>>,
    ) -> Result<Vec<Operand>> {
        let supplied = operands.iter().filter(|op| op.is_some()).count();
        let mut operands = operands;

        let behaviors = self.behavior_operands();
        if let Some(last) = behaviors.iter().map(|b| b.position).max() {
            if operands.len() <= last {
                operands.resize(last + 1, None);
            }
        }

        let mut filled = 0;
        for behavior in behaviors {
            let slot = &mut operands[behavior.position];
            if slot.is_none() {
                *slot = Some(Operand::Symbol(behavior.default));
                filled += 1;
            }
        }

        while matches!(operands.last(), Some(None)) {
            operands.pop();
        }

        let checker = self.operand_type_checker();
        let complete = operands.iter().all(|op| op.is_some());
        if !complete || !checker.accepts_count(operands.len()) {
            let expected = checker
                .accepted_counts()
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(" or ");
            return Err(PlanError::InvalidArity {
                function: self.name().to_string(),
                got: supplied,
                expected,
                pos,
            });
        }

        if filled > 0 {
            tracing::debug!(function = self.name(), filled, "filled default operands");
        }

        let operands: Vec<_> = operands.into_iter().flatten().collect();
        self.check_operand_kinds(pos, &operands)?;

        Ok(operands)
    }

    /// Check each operand is a data expression, a behavior tag of the right
    /// axis, or a type spec, as its position declares.
    fn check_operand_kinds(&self, pos: Location, operands: &[Operand]) -> Result<()> {
        for (idx, operand) in operands.iter().enumerate() {
            let behavior = self
                .behavior_operands()
                .iter()
                .find(|b| b.position == idx);

            let (ok, expected) = match behavior {
                Some(behavior) => (
                    matches!(operand, Operand::Symbol(tag) if tag.same_axis(&behavior.default)),
                    format!("one of {}", behavior.default.axis_choices().join(", ")),
                ),
                None if self.type_spec_operands().contains(&idx) => (
                    matches!(operand, Operand::TypeSpec(_)),
                    "a type".to_string(),
                ),
                None => (
                    matches!(operand, Operand::Expr(_)),
                    "an expression".to_string(),
                ),
            };

            if !ok {
                return Err(PlanError::Validation {
                    message: format!(
                        "Operand {idx} of {} must be {expected}, found {operand}",
                        self.name()
                    ),
                    pos,
                });
            }
        }
        Ok(())
    }

    /// Template describing operand roles for a call with this many operands.
    ///
    /// `{0}` is the operator name, `{n}` is operand `n - 1`.
    fn signature_template(&self, operand_count: usize) -> String {
        let args: Vec<_> = (1..=operand_count).map(|i| format!("{{{i}}}")).collect();
        format!("{{0}}({})", args.join(", "))
    }

    /// Derive the return type of a call that passed type checking.
    fn derive_return_type(&self, call: &Call, operand_types: &[OperandType]) -> Option<SqlType> {
        self.return_type_inference()
            .infer(call.operands(), operand_types)
    }

    /// Write the call as SQL.
    fn render(&self, writer: &mut SqlWriter, call: &Call) -> Result<()> {
        writer.start_fun_call(self.name());
        if let Some(qualifier) = call.qualifier() {
            writer.keyword(&qualifier.to_string());
        }
        for (idx, operand) in call.operands().iter().enumerate() {
            if idx > 0 {
                writer.sep(",");
            }
            match operand {
                Operand::Expr(expr) => writer.expr(expr)?,
                Operand::Symbol(tag) => writer.keywords(tag.keywords()),
                Operand::TypeSpec(datatype) => writer.type_spec(datatype)?,
            }
        }
        writer.end_fun_call();
        Ok(())
    }
}

impl dyn SqlOperator {
    /// Create a call to this operator.
    ///
    /// Operands that weren't provided are None. Defaults are filled before
    /// the call is constructed.
    pub fn create_call(
        &'static self,
        qualifier: Option<FunctionQualifier>,
        pos: Location,
        operands: Vec<Option<Operand>>,
    ) -> Result<Call> {
        let operands = self.fill_operands(pos, operands)?;
        Ok(Call::new_unchecked(self, qualifier, pos, operands))
    }

    /// Human readable signature for a call with this many operands.
    pub fn describe_signature(&self, operand_count: usize) -> String {
        let template = self.signature_template(operand_count);
        let mut args = vec![self.name().to_string()];
        args.extend((0..operand_count).map(|i| format!("<arg{i}>")));
        expand_template(&template, &args)
    }

    /// Every signature the operand checker accepts, with type families in
    /// place of operands.
    pub fn allowed_signatures(&self) -> Vec<String> {
        self.operand_type_checker()
            .signatures()
            .into_iter()
            .map(|families| {
                let template = self.signature_template(families.len());
                let mut args = vec![self.name().to_string()];
                args.extend(families.iter().map(|f| format!("<{f}>")));
                expand_template(&template, &args)
            })
            .collect()
    }
}

/// Replace `{n}` placeholders with the nth argument.
///
/// Placeholders without a matching argument are left as is.
pub fn expand_template(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let replaced = after.find('}').and_then(|end| {
            let idx: usize = after[..end].parse().ok()?;
            let arg = args.get(idx)?;
            Some((arg, end))
        });
        match replaced {
            Some((arg, end)) => {
                out.push_str(arg);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_template_placeholders() {
        let args = vec!["F".to_string(), "a".to_string()];
        assert_eq!("F(a, {2})", expand_template("{0}({1}, {2})", &args));
        assert_eq!("{x} F", expand_template("{x} {0}", &args));
    }
}
