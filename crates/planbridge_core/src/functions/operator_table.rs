use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::SqlOperator;
use super::json_query::JsonQuery;
use crate::errors::{PlanError, Result};

/// Operators available by default.
pub static BUILTIN_OPERATORS: LazyLock<OperatorTable> = LazyLock::new(|| {
    let mut table = OperatorTable::empty();
    insert_builtin(&mut table, JsonQuery::instance());
    table
});

fn insert_builtin(table: &mut OperatorTable, operator: &'static dyn SqlOperator) {
    if table.register(operator).is_err() {
        panic!("Duplicate builtin operator: {}", operator.name());
    }
}

/// Lookup of operators by name, ignoring case.
#[derive(Debug, Clone, Default)]
pub struct OperatorTable {
    operators: BTreeMap<String, &'static dyn SqlOperator>,
}

impl OperatorTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a table containing all builtin operators.
    pub fn builtin() -> Self {
        BUILTIN_OPERATORS.clone()
    }

    /// Register an operator, erroring if one with the same name exists.
    pub fn register(&mut self, operator: &'static dyn SqlOperator) -> Result<()> {
        let key = operator.name().to_lowercase();
        if self.operators.contains_key(&key) {
            return Err(PlanError::Config(format!(
                "Operator '{}' already registered",
                operator.name()
            )));
        }
        self.operators.insert(key, operator);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&'static dyn SqlOperator> {
        self.operators.get(&name.to_lowercase()).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static dyn SqlOperator> + '_ {
        self.operators.values().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_lookup_ignores_case() {
        let table = OperatorTable::builtin();
        let op = table.get("json_query").unwrap();
        assert_eq!("JSON_QUERY", op.name());
        assert!(table.get("nope").is_none());
    }

    #[test]
    #[should_panic(expected = "Duplicate builtin operator: JSON_QUERY")]
    fn duplicate_builtin_panics() {
        let mut table = OperatorTable::builtin();
        insert_builtin(&mut table, JsonQuery::instance());
    }

    #[test]
    fn duplicate_registration_errors() {
        let mut table = OperatorTable::builtin();
        assert!(table.register(JsonQuery::instance()).is_err());
        assert_eq!(1, table.iter().count());
    }
}
