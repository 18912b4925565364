use crate::datatype::SqlType;
use crate::expr::Operand;
use crate::functions::checker::OperandType;

/// Base rule for deriving the type a call returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnTypeRule {
    /// Always this type.
    Explicit(SqlType),
    /// Same type as the operand at this position.
    ArgType(usize),
    /// The type spec operand at this position if present, otherwise the
    /// fallback.
    TypeSpecOr { position: usize, fallback: SqlType },
}

/// Adjustment applied after the base rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTransform {
    ForceNullable,
    ToNotNullable,
}

impl TypeTransform {
    fn apply(&self, t: SqlType) -> SqlType {
        match self {
            Self::ForceNullable => t.with_nullable(true),
            Self::ToNotNullable => t.with_nullable(false),
        }
    }
}

/// A base rule followed by zero or more transforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnTypeInference {
    pub rule: ReturnTypeRule,
    pub transforms: Vec<TypeTransform>,
}

impl ReturnTypeInference {
    pub fn new(rule: ReturnTypeRule) -> Self {
        ReturnTypeInference {
            rule,
            transforms: Vec::new(),
        }
    }

    pub fn explicit(t: SqlType) -> Self {
        Self::new(ReturnTypeRule::Explicit(t))
    }

    /// Add a transform to run after everything before it.
    pub fn and_then(mut self, transform: TypeTransform) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Derive the return type.
    ///
    /// Returns None if the rule depends on an operand type that isn't known.
    pub fn infer(&self, operands: &[Operand], operand_types: &[OperandType]) -> Option<SqlType> {
        let base = match &self.rule {
            ReturnTypeRule::Explicit(t) => *t,
            ReturnTypeRule::ArgType(idx) => match operand_types.get(*idx) {
                Some(OperandType::Resolved(t)) => *t,
                _ => return None,
            },
            ReturnTypeRule::TypeSpecOr { position, fallback } => match operands.get(*position) {
                Some(Operand::TypeSpec(datatype)) => SqlType::nullable(*datatype),
                _ => *fallback,
            },
        };

        Some(
            self.transforms
                .iter()
                .fold(base, |t, transform| transform.apply(t)),
        )
    }
}
