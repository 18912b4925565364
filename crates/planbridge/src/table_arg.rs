//! Parsing of `--table` arguments.
//!
//! Format is `name:col TYPE [NOT NULL],col TYPE`, where the name may be schema
//! qualified.

use planbridge_core::binder::bind_datatype;
use planbridge_core::catalog::TableDefinition;
use planbridge_core::errors::{PlanError, Result};
use planbridge_core::field::{Field, RowType};
use planbridge_parser::{Location, parse_datatype};

/// A table definition from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct TableArg {
    pub schema: Option<String>,
    pub definition: TableDefinition,
}

pub fn parse_table_arg(arg: &str) -> Result<TableArg> {
    let (name, columns) = arg
        .split_once(':')
        .ok_or_else(|| PlanError::Config(format!("Expected 'name:columns', got '{arg}'")))?;

    let (schema, table) = match name.split_once('.') {
        Some((schema, table)) => (Some(schema.trim().to_string()), table.trim()),
        None => (None, name.trim()),
    };
    if table.is_empty() {
        return Err(PlanError::Config(format!("Missing table name in '{arg}'")));
    }

    let fields = split_top_level(columns)
        .into_iter()
        .filter(|col| !col.trim().is_empty())
        .map(parse_column)
        .collect::<Result<Vec<_>>>()?;

    Ok(TableArg {
        schema,
        definition: TableDefinition::new(table, RowType::new(fields)),
    })
}

fn parse_column(col: &str) -> Result<Field> {
    let col = col.trim();
    let (name, ty) = col
        .split_once(char::is_whitespace)
        .ok_or_else(|| PlanError::Config(format!("Expected 'column TYPE', got '{col}'")))?;

    let mut ty = ty.trim();
    let mut nullable = true;
    let upper = ty.to_ascii_uppercase();
    if let Some(stripped) = upper.strip_suffix("NOT NULL") {
        ty = ty[..stripped.len()].trim_end();
        nullable = false;
    }

    let datatype = bind_datatype(&parse_datatype(ty)?, Location::START)?;
    Ok(Field::new(name, datatype, nullable))
}

/// Split on commas that aren't inside parens, e.g. `DECIMAL(10, 2)`.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&s[start..idx]);
                start = idx + 1;
            }
            _ => (),
        }
    }
    parts.push(&s[start..]);
    parts
}
