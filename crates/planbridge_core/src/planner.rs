//! Entry point tying parsing, binding, validation and unparsing together.

use std::sync::Arc;

use planbridge_parser::parse_expr;
use serde::Serialize;

use crate::binder::{BindScope, Binder};
use crate::catalog::{Schema, TableResolver};
use crate::config::PlannerConfig;
use crate::errors::{Result, internal};
use crate::expr::Expr;
use crate::functions::operator_table::OperatorTable;
use crate::logical::logical_scan::LogicalScan;
use crate::table::{TableHandle, ToRelContext};
use crate::unparse::expr_to_sql;
use crate::validate::{Validated, validate_expr};

/// An expression that's been bound and validated.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedExpr {
    pub expr: Expr,
    /// The expression rendered back to SQL.
    pub sql: String,
    pub validated: Validated,
}

/// Description of an operator for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDescription {
    pub name: String,
    pub category: String,
    pub signatures: Vec<String>,
}

#[derive(Debug)]
pub struct Planner {
    config: PlannerConfig,
    operators: OperatorTable,
    resolver: TableResolver,
}

impl Planner {
    pub fn new(
        config: PlannerConfig,
        operators: OperatorTable,
        schemas: impl IntoIterator<Item = Arc<Schema>>,
    ) -> Self {
        let resolver = schemas
            .into_iter()
            .fold(TableResolver::new(config.default_schema.clone()), |r, s| {
                r.with_schema(s)
            });

        Planner {
            config,
            operators,
            resolver,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn operators(&self) -> &OperatorTable {
        &self.operators
    }

    pub fn resolve_table(&self, name: &str) -> Result<Arc<dyn TableHandle>> {
        self.resolver.resolve_str(name)
    }

    /// Plan a single expression.
    ///
    /// Columns are resolved against `tables`. If no tables are given, columns
    /// are left untyped and validation may be deferred.
    pub fn plan_expr(&self, sql: &str, tables: &[&str]) -> Result<PlannedExpr> {
        let scope = tables
            .iter()
            .map(|name| self.resolve_table(name))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .fold(BindScope::new(), |scope, table| scope.with_table(table));

        let expr = self.bind_sql(sql, tables, &scope)?;
        let validated = validate_expr(&expr)?;
        let rendered = expr_to_sql(&expr, self.config.lowercase_keywords)?;

        if self.config.verify_unparse {
            let reparsed = self.bind_sql(&rendered, tables, &scope)?;
            if reparsed != expr {
                tracing::error!(%sql, %rendered, "unparsed expression binds differently");
                return Err(internal!(
                    "Rendered SQL '{rendered}' binds to {reparsed}, expected {expr}"
                ));
            }
            let rerendered = expr_to_sql(&reparsed, self.config.lowercase_keywords)?;
            if rerendered != rendered {
                return Err(internal!(
                    "Rendering is not stable, got '{rendered}' then '{rerendered}'"
                ));
            }
        }

        tracing::debug!(%sql, %rendered, ?validated, "planned expression");

        Ok(PlannedExpr {
            expr,
            sql: rendered,
            validated,
        })
    }

    fn bind_sql(&self, sql: &str, tables: &[&str], scope: &BindScope) -> Result<Expr> {
        let ast = parse_expr(sql)?;
        let binder = Binder::new(&self.operators);
        if tables.is_empty() {
            binder.bind_expr(&ast)
        } else {
            binder.with_scope(scope).bind_expr(&ast)
        }
    }

    /// Plan a scan of a table.
    pub fn scan(&self, table: &str, ctx: &ToRelContext) -> Result<LogicalScan> {
        let handle = self.resolve_table(table)?;
        Ok(handle.to_rel(ctx))
    }

    pub fn describe_function(&self, name: &str) -> Option<FunctionDescription> {
        let operator = self.operators.get(name)?;
        Some(FunctionDescription {
            name: operator.name().to_string(),
            category: operator.category().as_str().to_string(),
            signatures: operator.allowed_signatures(),
        })
    }
}
