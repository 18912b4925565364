//! Turns parsed expressions into operator calls.

use std::sync::Arc;

use planbridge_parser::Location;
use planbridge_parser::ast;

use crate::datatype::{DataType, DecimalTypeMeta, StringTypeMeta};
use crate::errors::{PlanError, Result};
use crate::expr::{ColumnExpr, Expr, Operand};
use crate::functions::FunctionQualifier;
use crate::functions::behavior::{
    JsonQueryEmptyOrErrorBehavior, JsonQueryWrapperBehavior, SymbolTag,
};
use crate::functions::json_query;
use crate::functions::operator_table::OperatorTable;
use crate::scalar::ScalarValue;
use crate::table::TableHandle;

/// A table columns can be resolved against.
#[derive(Debug, Clone)]
pub struct ScopeTable {
    /// Name the table can be referenced by.
    pub alias: String,
    pub table: Arc<dyn TableHandle>,
}

/// Tables in scope for column resolution.
#[derive(Debug, Clone, Default)]
pub struct BindScope {
    pub tables: Vec<ScopeTable>,
}

impl BindScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, referenced by the last part of its name.
    pub fn with_table(mut self, table: Arc<dyn TableHandle>) -> Self {
        let alias = table
            .qualified_name()
            .last()
            .map(|s| s.to_lowercase())
            .unwrap_or_default();
        self.tables.push(ScopeTable { alias, table });
        self
    }

    pub fn with_aliased_table(
        mut self,
        alias: impl Into<String>,
        table: Arc<dyn TableHandle>,
    ) -> Self {
        self.tables.push(ScopeTable {
            alias: alias.into(),
            table,
        });
        self
    }
}

#[derive(Debug)]
pub struct Binder<'a> {
    operators: &'a OperatorTable,
    scope: Option<&'a BindScope>,
}

impl<'a> Binder<'a> {
    pub fn new(operators: &'a OperatorTable) -> Self {
        Binder {
            operators,
            scope: None,
        }
    }

    /// Resolve columns against a scope.
    ///
    /// Without a scope, columns are left unresolved.
    pub fn with_scope(mut self, scope: &'a BindScope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn bind_expr(&self, expr: &ast::Expr) -> Result<Expr> {
        self.bind_expr_at(expr, Location::START)
    }

    /// Bind an expression, using `pos` for errors that the expression has no
    /// location of its own for.
    fn bind_expr_at(&self, expr: &ast::Expr, pos: Location) -> Result<Expr> {
        match expr {
            ast::Expr::Ident(ident) => self.bind_column(None, ident, pos),
            ast::Expr::CompoundIdent(idents) => match idents.as_slice() {
                [table, column] => self.bind_column(Some(table), column, pos),
                _ => Err(PlanError::Validation {
                    message: format!(
                        "Too many identifier parts in '{}'",
                        ast::ObjectReference(idents.clone())
                    ),
                    pos,
                }),
            },
            ast::Expr::Literal(lit) => Ok(Expr::Literal(self.bind_literal(lit, pos)?)),
            ast::Expr::Nested(inner) => self.bind_expr_at(inner, pos),
            ast::Expr::Function(func) => self.bind_function(func),
            ast::Expr::JsonQuery(query) => self.bind_json_query(query),
        }
    }

    fn bind_literal(&self, lit: &ast::Literal, pos: Location) -> Result<ScalarValue> {
        Ok(match lit {
            ast::Literal::Null => ScalarValue::Null,
            ast::Literal::Boolean(b) => ScalarValue::Boolean(*b),
            ast::Literal::SingleQuotedString(s) => ScalarValue::Utf8(s.clone()),
            ast::Literal::Number(n) => {
                ScalarValue::parse_number(n).ok_or_else(|| PlanError::Validation {
                    message: format!("Invalid number literal '{n}'"),
                    pos,
                })?
            }
        })
    }

    fn bind_column(
        &self,
        table: Option<&ast::Ident>,
        column: &ast::Ident,
        pos: Location,
    ) -> Result<Expr> {
        let table = table.map(|t| t.as_normalized_string());
        let name = column.as_normalized_string();

        let scope = match self.scope {
            Some(scope) => scope,
            None => {
                return Ok(Expr::Column(ColumnExpr {
                    table,
                    name,
                    datatype: None,
                }));
            }
        };

        let mut found = None;
        for scope_table in &scope.tables {
            if let Some(t) = &table {
                if !scope_table.alias.eq_ignore_ascii_case(t) {
                    continue;
                }
            }
            if let Some((_, field)) = scope_table.table.row_type().find_field(&name) {
                if found.is_some() {
                    return Err(PlanError::Validation {
                        message: format!("Ambiguous column '{name}'"),
                        pos,
                    });
                }
                found = Some(field);
            }
        }

        let field = found.ok_or_else(|| PlanError::ColumnNotFound {
            column: match &table {
                Some(t) => format!("{t}.{name}"),
                None => name.clone(),
            },
            pos,
        })?;

        Ok(Expr::Column(ColumnExpr {
            table,
            name: field.name.clone(),
            datatype: Some(field.sql_type()),
        }))
    }

    fn bind_function(&self, func: &ast::Function) -> Result<Expr> {
        let operator = match func.reference.0.as_slice() {
            [name] => self.operators.get(&name.value),
            _ => None,
        }
        .ok_or_else(|| PlanError::UnknownOperator {
            name: func.reference.to_string(),
            pos: func.location,
        })?;

        let operands = func
            .args
            .iter()
            .map(|arg| Ok(Some(Operand::Expr(self.bind_expr_at(arg, func.location)?))))
            .collect::<Result<Vec<_>>>()?;

        let qualifier = func.qualifier.map(|q| match q {
            ast::FunctionQualifier::Distinct => FunctionQualifier::Distinct,
            ast::FunctionQualifier::All => FunctionQualifier::All,
        });

        Ok(operator.create_call(qualifier, func.location, operands)?.into())
    }

    fn bind_json_query(&self, query: &ast::JsonQuery) -> Result<Expr> {
        let operator = self
            .operators
            .get("json_query")
            .ok_or_else(|| PlanError::UnknownOperator {
                name: "JSON_QUERY".to_string(),
                pos: query.location,
            })?;

        let pos = query.location;
        let mut operands = vec![None; json_query::RETURNING + 1];
        operands[json_query::EXPR] = Some(Operand::Expr(self.bind_expr_at(&query.expr, pos)?));
        operands[json_query::PATH] = Some(Operand::Expr(self.bind_expr_at(&query.path, pos)?));
        operands[json_query::WRAPPER] = query
            .wrapper
            .map(|w| Operand::Symbol(bind_wrapper(w).into_tag()));
        operands[json_query::ON_EMPTY] = query
            .on_empty
            .map(|b| Operand::Symbol(bind_behavior(b).into_tag()));
        operands[json_query::ON_ERROR] = query
            .on_error
            .map(|b| Operand::Symbol(bind_behavior(b).into_tag()));
        operands[json_query::RETURNING] = query
            .returning
            .map(|t| bind_datatype(&t, pos).map(Operand::TypeSpec))
            .transpose()?;

        Ok(operator.create_call(None, pos, operands)?.into())
    }
}

fn bind_wrapper(wrapper: ast::JsonQueryWrapper) -> JsonQueryWrapperBehavior {
    match wrapper {
        ast::JsonQueryWrapper::WithoutArray => JsonQueryWrapperBehavior::WithoutArray,
        ast::JsonQueryWrapper::WithConditionalArray => {
            JsonQueryWrapperBehavior::WithConditionalArray
        }
        ast::JsonQueryWrapper::WithUnconditionalArray => {
            JsonQueryWrapperBehavior::WithUnconditionalArray
        }
    }
}

fn bind_behavior(behavior: ast::JsonQueryBehavior) -> JsonQueryEmptyOrErrorBehavior {
    match behavior {
        ast::JsonQueryBehavior::Null => JsonQueryEmptyOrErrorBehavior::Null,
        ast::JsonQueryBehavior::Error => JsonQueryEmptyOrErrorBehavior::Error,
        ast::JsonQueryBehavior::EmptyArray => JsonQueryEmptyOrErrorBehavior::EmptyArray,
        ast::JsonQueryBehavior::EmptyObject => JsonQueryEmptyOrErrorBehavior::EmptyObject,
    }
}

/// Maximum precision that fits a 64-bit decimal.
const DECIMAL64_MAX_PRECISION: u8 = 18;

/// Convert a parsed data type.
pub fn bind_datatype(datatype: &ast::DataType, pos: Location) -> Result<DataType> {
    Ok(match datatype {
        ast::DataType::Varchar(len) => DataType::Utf8(StringTypeMeta {
            max_length: *len,
            fixed_length: false,
        }),
        ast::DataType::Text => DataType::Utf8(StringTypeMeta::UNBOUNDED),
        ast::DataType::Char(len) => DataType::Utf8(StringTypeMeta {
            max_length: Some(len.unwrap_or(1)),
            fixed_length: true,
        }),
        ast::DataType::Boolean => DataType::Boolean,
        ast::DataType::SmallInt => DataType::Int16,
        ast::DataType::Integer => DataType::Int32,
        ast::DataType::BigInt => DataType::Int64,
        ast::DataType::Real => DataType::Float32,
        ast::DataType::Double => DataType::Float64,
        ast::DataType::Decimal(prec, scale) => {
            let meta = match (prec, scale) {
                (None, _) => DecimalTypeMeta::new(
                    DecimalTypeMeta::DEFAULT_PRECISION,
                    DecimalTypeMeta::DEFAULT_SCALE,
                ),
                (Some(p), s) => DecimalTypeMeta::new(*p, s.unwrap_or(0)),
            };
            if meta.precision == 0 || meta.precision > DECIMAL64_MAX_PRECISION {
                return Err(PlanError::Validation {
                    message: format!(
                        "Decimal precision must be between 1 and {DECIMAL64_MAX_PRECISION}, got {}",
                        meta.precision
                    ),
                    pos,
                });
            }
            if meta.scale < 0 || meta.scale as u8 > meta.precision {
                return Err(PlanError::Validation {
                    message: format!(
                        "Decimal scale must be between 0 and the precision, got {}",
                        meta.scale
                    ),
                    pos,
                });
            }
            DataType::Decimal64(meta)
        }
    })
}

#[cfg(test)]
mod tests {
    use planbridge_parser::parse_expr;

    use super::*;
    use crate::datatype::SqlType;
    use crate::field::{Field, RowType};
    use crate::table::abstract_table::AbstractTable;

    fn bind(sql: &str) -> Result<Expr> {
        let operators = OperatorTable::builtin();
        Binder::new(&operators).bind_expr(&parse_expr(sql)?)
    }

    #[test]
    fn unscoped_columns_unresolved() {
        assert_eq!(Expr::column("doc"), bind("DOC").unwrap());
    }

    #[test]
    fn scoped_column_types() {
        let table: Arc<dyn TableHandle> = Arc::new(AbstractTable::new(
            ["main", "t"],
            RowType::new([Field::new("Doc", DataType::Utf8(StringTypeMeta::UNBOUNDED), false)]),
        ));
        let scope = BindScope::new().with_table(table);
        let operators = OperatorTable::builtin();
        let binder = Binder::new(&operators).with_scope(&scope);

        let expr = binder.bind_expr(&parse_expr("t.doc").unwrap()).unwrap();
        assert_eq!(
            Expr::Column(ColumnExpr {
                table: Some("t".to_string()),
                name: "Doc".to_string(),
                datatype: Some(SqlType::not_null(DataType::Utf8(StringTypeMeta::UNBOUNDED))),
            }),
            expr
        );

        let err = binder.bind_expr(&parse_expr("missing").unwrap()).unwrap_err();
        assert!(matches!(err, PlanError::ColumnNotFound { .. }), "{err}");
    }

    #[test]
    fn unknown_function() {
        let err = bind("  nope(a)").unwrap_err();
        assert_eq!("Unknown function 'nope' at line 1, column 3", err.to_string());
    }

    #[test]
    fn function_syntax_json_query_gets_defaults() {
        let a = bind("\"json_query\"(doc, '$')").unwrap();
        let b =
            bind("JSON_QUERY(doc, '$' WITHOUT ARRAY WRAPPER NULL ON EMPTY NULL ON ERROR)").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn decimal_bounds() {
        assert!(bind_datatype(&ast::DataType::Decimal(Some(40), None), Location::START).is_err());
        assert!(bind_datatype(&ast::DataType::Decimal(Some(4), Some(5)), Location::START).is_err());
        assert_eq!(
            DataType::Decimal64(DecimalTypeMeta::new(10, 2)),
            bind_datatype(&ast::DataType::Decimal(Some(10), Some(2)), Location::START).unwrap()
        );
    }
}
