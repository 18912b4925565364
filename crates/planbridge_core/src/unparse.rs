//! Turning expressions back into SQL text.

use planbridge_parser::keywords::keyword_from_str;

use crate::datatype::DataType;
use crate::errors::{Result, internal};
use crate::expr::Expr;
use crate::scalar::ScalarValue;

/// Accumulates SQL text, taking care of spacing and keyword casing.
#[derive(Debug, Default)]
pub struct SqlWriter {
    buf: String,
    lowercase_keywords: bool,
}

impl SqlWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lowercase_keywords(mut self, lowercase: bool) -> Self {
        self.lowercase_keywords = lowercase;
        self
    }

    /// Separate the next token from the previous one, unless we're right after
    /// an opening paren or already have a space.
    fn space(&mut self) {
        match self.buf.chars().last() {
            None | Some('(') | Some(' ') => (),
            Some(_) => self.buf.push(' '),
        }
    }

    fn push_keyword(&mut self, keyword: &str) {
        if self.lowercase_keywords {
            self.buf.push_str(&keyword.to_lowercase());
        } else {
            self.buf.push_str(keyword);
        }
    }

    pub fn keyword(&mut self, keyword: &str) {
        self.space();
        self.push_keyword(keyword);
    }

    pub fn keywords(&mut self, keywords: &[&str]) {
        for keyword in keywords {
            self.keyword(keyword);
        }
    }

    pub fn identifier(&mut self, ident: &str) {
        self.space();
        self.push_identifier(ident);
    }

    fn push_identifier(&mut self, ident: &str) {
        if needs_quotes(ident) {
            self.buf.push('"');
            self.buf.push_str(&ident.replace('"', "\"\""));
            self.buf.push('"');
        } else {
            self.buf.push_str(ident);
        }
    }

    pub fn literal(&mut self, value: &ScalarValue) {
        match value {
            ScalarValue::Null => self.keyword("NULL"),
            ScalarValue::Boolean(true) => self.keyword("TRUE"),
            ScalarValue::Boolean(false) => self.keyword("FALSE"),
            ScalarValue::Utf8(s) => {
                self.space();
                self.buf.push('\'');
                self.buf.push_str(&s.replace('\'', "''"));
                self.buf.push('\'');
            }
            other => {
                self.space();
                self.buf.push_str(&other.to_string());
            }
        }
    }

    /// Write a data type as it would appear in a RETURNING or CAST clause.
    pub fn type_spec(&mut self, datatype: &DataType) -> Result<()> {
        let name = datatype
            .sql_name()
            .ok_or_else(|| internal!("Data type {datatype} has no SQL spelling"))?;
        self.keyword(&name);
        Ok(())
    }

    /// Write `NAME(`.
    pub fn start_fun_call(&mut self, name: &str) {
        self.space();
        self.push_keyword(name);
        self.buf.push('(');
    }

    /// Write a separator between operands, e.g. a comma.
    pub fn sep(&mut self, sep: &str) {
        self.buf.push_str(sep);
        self.buf.push(' ');
    }

    pub fn end_fun_call(&mut self) {
        if self.buf.ends_with(' ') {
            self.buf.pop();
        }
        self.buf.push(')');
    }

    pub fn expr(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Column(col) => {
                self.space();
                if let Some(table) = &col.table {
                    self.push_identifier(table);
                    self.buf.push('.');
                }
                self.push_identifier(&col.name);
                Ok(())
            }
            Expr::Literal(value) => {
                self.literal(value);
                Ok(())
            }
            Expr::Call(call) => call.operator().render(self, call),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_sql(self) -> String {
        self.buf
    }
}

/// Unquoted identifiers are case folded by the parser, so anything not already
/// lower case needs quotes to survive a round trip. Keywords always need
/// quotes.
fn needs_quotes(ident: &str) -> bool {
    let mut chars = ident.chars();
    let starts_ok = matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_');
    if !starts_ok {
        return true;
    }
    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$') {
        return true;
    }
    keyword_from_str(ident).is_some()
}

/// Render an expression to SQL.
pub fn expr_to_sql(expr: &Expr, lowercase_keywords: bool) -> Result<String> {
    let mut writer = SqlWriter::new().with_lowercase_keywords(lowercase_keywords);
    writer.expr(expr)?;
    Ok(writer.into_sql())
}
