use std::sync::LazyLock;

use super::behavior::{
    BehaviorOperand, JsonQueryEmptyOrErrorBehavior, JsonQueryWrapperBehavior, SymbolTag,
};
use super::checker::OperandTypeChecker;
use super::return_type::{ReturnTypeInference, ReturnTypeRule, TypeTransform};
use super::{FunctionCategory, OperatorKind, SqlOperator};
use crate::datatype::{DataType, SqlType, StringTypeMeta, TypeFamily};
use crate::errors::{Result, internal};
use crate::expr::{Call, Operand};
use crate::unparse::SqlWriter;

/// Operand positions.
pub const EXPR: usize = 0;
pub const PATH: usize = 1;
pub const WRAPPER: usize = 2;
pub const ON_EMPTY: usize = 3;
pub const ON_ERROR: usize = 4;
pub const RETURNING: usize = 5;

/// Result type when no RETURNING clause is given.
pub const DEFAULT_RETURN_TYPE: SqlType =
    SqlType::not_null(DataType::Utf8(StringTypeMeta::varchar(2000)));

static JSON_QUERY: LazyLock<JsonQuery> = LazyLock::new(JsonQuery::new);

/// `JSON_QUERY(<expr>, <path> [RETURNING <type>] <wrapper> WRAPPER
///   <behavior> ON EMPTY <behavior> ON ERROR)`
///
/// Extracts a JSON object or array from a JSON document. Calls always carry
/// the wrapper and both behavior operands, written or not. RETURNING is an
/// optional sixth operand.
#[derive(Debug)]
pub struct JsonQuery {
    checker: OperandTypeChecker,
    return_type: ReturnTypeInference,
    behaviors: [BehaviorOperand; 3],
}

impl JsonQuery {
    fn new() -> Self {
        use TypeFamily::{Any, Character};

        JsonQuery {
            checker: OperandTypeChecker::family([Any, Character, Any, Any, Any])
                .or(OperandTypeChecker::family([Any, Character, Any, Any, Any, Any])),
            return_type: ReturnTypeInference::new(ReturnTypeRule::TypeSpecOr {
                position: RETURNING,
                fallback: DEFAULT_RETURN_TYPE,
            })
            .and_then(TypeTransform::ForceNullable),
            behaviors: [
                BehaviorOperand::new(WRAPPER, JsonQueryWrapperBehavior::WithoutArray),
                BehaviorOperand::new(ON_EMPTY, JsonQueryEmptyOrErrorBehavior::Null),
                BehaviorOperand::new(ON_ERROR, JsonQueryEmptyOrErrorBehavior::Null),
            ],
        }
    }

    /// The shared instance.
    pub fn instance() -> &'static dyn SqlOperator {
        &*JSON_QUERY
    }

    fn expect_tag<T: SymbolTag>(&self, call: &Call, idx: usize) -> Result<T> {
        let tag = call.operand(idx).and_then(Operand::as_symbol);
        match tag.and_then(T::from_tag) {
            Some(tag) => Ok(tag),
            None => {
                let found = call
                    .operand(idx)
                    .map(|op| op.to_string())
                    .unwrap_or_else(|| "nothing".to_string());
                tracing::error!(function = self.name(), idx, %found, %call, "unexpected operand");
                Err(internal!(
                    "{} operand {idx} must be a {} tag, found {found} in {call}",
                    self.name(),
                    T::AXIS,
                ))
            }
        }
    }

    fn expect_expr(&self, writer: &mut SqlWriter, call: &Call, idx: usize) -> Result<()> {
        match call.operand(idx) {
            Some(Operand::Expr(expr)) => writer.expr(expr),
            other => {
                tracing::error!(function = self.name(), idx, ?other, %call, "unexpected operand");
                Err(internal!(
                    "{} operand {idx} must be an expression in {call}",
                    self.name()
                ))
            }
        }
    }
}

impl SqlOperator for JsonQuery {
    fn name(&self) -> &'static str {
        "JSON_QUERY"
    }

    fn kind(&self) -> OperatorKind {
        OperatorKind::OtherFunction
    }

    fn category(&self) -> FunctionCategory {
        FunctionCategory::System
    }

    fn operand_type_checker(&self) -> &OperandTypeChecker {
        &self.checker
    }

    fn return_type_inference(&self) -> &ReturnTypeInference {
        &self.return_type
    }

    fn behavior_operands(&self) -> &[BehaviorOperand] {
        &self.behaviors
    }

    fn type_spec_operands(&self) -> &[usize] {
        &[RETURNING]
    }

    fn signature_template(&self, operand_count: usize) -> String {
        match operand_count {
            5 => "{0}({1}, {2} {3} WRAPPER {4} ON EMPTY {5} ON ERROR)".to_string(),
            6 => "{0}({1}, {2} RETURNING {6} {3} WRAPPER {4} ON EMPTY {5} ON ERROR)".to_string(),
            n => {
                let args: Vec<_> = (1..=n).map(|i| format!("{{{i}}}")).collect();
                format!("{{0}}({})", args.join(", "))
            }
        }
    }

    fn render(&self, writer: &mut SqlWriter, call: &Call) -> Result<()> {
        let count = call.operands().len();
        if count != 5 && count != 6 {
            tracing::error!(function = self.name(), count, %call, "unexpected operand count");
            return Err(internal!(
                "{} expects 5 or 6 operands, got {count} in {call}",
                self.name()
            ));
        }

        writer.start_fun_call(self.name());
        self.expect_expr(writer, call, EXPR)?;
        writer.sep(",");
        self.expect_expr(writer, call, PATH)?;

        if count == 6 {
            match call.operand(RETURNING) {
                Some(Operand::TypeSpec(datatype)) => {
                    writer.keyword("RETURNING");
                    writer.type_spec(datatype)?;
                }
                other => {
                    tracing::error!(function = self.name(), ?other, %call, "unexpected operand");
                    return Err(internal!(
                        "{} operand {RETURNING} must be a type in {call}",
                        self.name()
                    ));
                }
            }
        }

        let wrapper: JsonQueryWrapperBehavior = self.expect_tag(call, WRAPPER)?;
        writer.keywords(wrapper.keywords());
        writer.keyword("WRAPPER");

        let on_empty: JsonQueryEmptyOrErrorBehavior = self.expect_tag(call, ON_EMPTY)?;
        writer.keywords(on_empty.keywords());
        writer.keywords(&["ON", "EMPTY"]);

        let on_error: JsonQueryEmptyOrErrorBehavior = self.expect_tag(call, ON_ERROR)?;
        writer.keywords(on_error.keywords());
        writer.keywords(&["ON", "ERROR"]);

        writer.end_fun_call();
        Ok(())
    }
}
