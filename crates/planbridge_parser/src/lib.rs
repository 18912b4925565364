//! SQL expression parser. Heavily inspired by sqlparser-rs.
//!
//! Only scalar expressions are handled here. Statements are out of scope, the
//! parser exists to turn source text into AST nodes that the binder can turn
//! into operator calls.
pub mod ast;
pub mod errors;
pub mod keywords;
pub mod parser;
pub mod tokens;

pub use errors::{Location, ParseError, Result};

/// Parse a single expression from a string.
///
/// Errors if the string contains anything after the expression.
pub fn parse_expr(sql: &str) -> Result<ast::Expr> {
    let mut parser = parser::Parser::with_sql_string(sql)?;
    parser.parse_complete_expr()
}

/// Parse a data type, e.g. `VARCHAR(20)`.
pub fn parse_datatype(sql: &str) -> Result<ast::DataType> {
    let mut parser = parser::Parser::with_sql_string(sql)?;
    parser.parse_complete()
}
