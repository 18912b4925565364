use std::fmt;

use crate::datatype::{SqlType, TypeFamily};

/// What a checker knows about a single operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandType {
    /// A data operand with a known type.
    Resolved(SqlType),
    /// A data operand whose type hasn't been resolved yet.
    Unresolved,
    /// A behavior tag or type spec, not a data value.
    Symbol,
}

impl fmt::Display for OperandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(t) => write!(f, "{}", t.datatype),
            Self::Unresolved => write!(f, "?"),
            Self::Symbol => write!(f, "SYMBOL"),
        }
    }
}

/// Verdict of a type check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCheck {
    Pass,
    Fail,
    /// Can't decide until more operand types are resolved.
    Deferred,
}

impl TypeCheck {
    /// Combine verdicts where every one needs to pass.
    fn all(verdicts: impl IntoIterator<Item = TypeCheck>) -> TypeCheck {
        let mut out = TypeCheck::Pass;
        for verdict in verdicts {
            match verdict {
                TypeCheck::Fail => return TypeCheck::Fail,
                TypeCheck::Deferred => out = TypeCheck::Deferred,
                TypeCheck::Pass => (),
            }
        }
        out
    }

    /// Combine verdicts where one passing is enough.
    fn any(verdicts: impl IntoIterator<Item = TypeCheck>) -> TypeCheck {
        let mut out = TypeCheck::Fail;
        for verdict in verdicts {
            match verdict {
                TypeCheck::Pass => return TypeCheck::Pass,
                TypeCheck::Deferred => out = TypeCheck::Deferred,
                TypeCheck::Fail => (),
            }
        }
        out
    }
}

impl TypeFamily {
    /// Check a single operand against this family.
    pub fn check(&self, operand: &OperandType) -> TypeCheck {
        match (self, operand) {
            (TypeFamily::Any, _) => TypeCheck::Pass,
            (_, OperandType::Unresolved) => TypeCheck::Deferred,
            (_, OperandType::Symbol) => TypeCheck::Fail,
            (family, OperandType::Resolved(t)) => {
                if family.contains(&t.datatype) {
                    TypeCheck::Pass
                } else {
                    TypeCheck::Fail
                }
            }
        }
    }
}

/// Predicate over the operand types of a call.
///
/// Checkers are plain values. Combining two produces a new checker and leaves
/// both inputs untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandTypeChecker {
    /// Exactly this many operands, each in the family at its position.
    Family(Vec<TypeFamily>),
    /// Any of the inner checkers.
    Or(Vec<OperandTypeChecker>),
    /// All of the inner checkers.
    And(Vec<OperandTypeChecker>),
}

impl OperandTypeChecker {
    pub fn family(families: impl IntoIterator<Item = TypeFamily>) -> Self {
        OperandTypeChecker::Family(families.into_iter().collect())
    }

    pub fn or(self, other: OperandTypeChecker) -> Self {
        match self {
            OperandTypeChecker::Or(mut inner) => {
                inner.push(other);
                OperandTypeChecker::Or(inner)
            }
            this => OperandTypeChecker::Or(vec![this, other]),
        }
    }

    pub fn and(self, other: OperandTypeChecker) -> Self {
        match self {
            OperandTypeChecker::And(mut inner) => {
                inner.push(other);
                OperandTypeChecker::And(inner)
            }
            this => OperandTypeChecker::And(vec![this, other]),
        }
    }

    pub fn check(&self, operands: &[OperandType]) -> TypeCheck {
        match self {
            Self::Family(families) => {
                if families.len() != operands.len() {
                    return TypeCheck::Fail;
                }
                TypeCheck::all(
                    families
                        .iter()
                        .zip(operands)
                        .map(|(family, operand)| family.check(operand)),
                )
            }
            Self::Or(inner) => TypeCheck::any(inner.iter().map(|c| c.check(operands))),
            Self::And(inner) => TypeCheck::all(inner.iter().map(|c| c.check(operands))),
        }
    }

    /// If a call with this many operands could ever pass.
    pub fn accepts_count(&self, count: usize) -> bool {
        match self {
            Self::Family(families) => families.len() == count,
            Self::Or(inner) => inner.iter().any(|c| c.accepts_count(count)),
            Self::And(inner) => inner.iter().all(|c| c.accepts_count(count)),
        }
    }

    /// All operand counts this checker accepts, sorted.
    pub fn accepted_counts(&self) -> Vec<usize> {
        let mut counts: Vec<_> = self
            .signatures()
            .into_iter()
            .map(|sig| sig.len())
            .filter(|&n| self.accepts_count(n))
            .collect();
        counts.sort_unstable();
        counts.dedup();
        counts
    }

    /// Family shapes accepted by this checker.
    ///
    /// For a conjunction, the shapes of the first checker that every other
    /// checker accepts the length of.
    pub fn signatures(&self) -> Vec<Vec<TypeFamily>> {
        match self {
            Self::Family(families) => vec![families.clone()],
            Self::Or(inner) => inner.iter().flat_map(|c| c.signatures()).collect(),
            Self::And(inner) => match inner.split_first() {
                Some((first, rest)) => first
                    .signatures()
                    .into_iter()
                    .filter(|sig| rest.iter().all(|c| c.accepts_count(sig.len())))
                    .collect(),
                None => Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatype::{DataType, StringTypeMeta};

    fn resolved(datatype: DataType) -> OperandType {
        OperandType::Resolved(SqlType::nullable(datatype))
    }

    fn varchar() -> OperandType {
        resolved(DataType::Utf8(StringTypeMeta::UNBOUNDED))
    }

    #[test]
    fn family_checks_count_and_position() {
        let checker = OperandTypeChecker::family([TypeFamily::Numeric, TypeFamily::Character]);
        assert_eq!(TypeCheck::Pass, checker.check(&[resolved(DataType::Int32), varchar()]));
        assert_eq!(TypeCheck::Fail, checker.check(&[varchar(), resolved(DataType::Int32)]));
        assert_eq!(TypeCheck::Fail, checker.check(&[resolved(DataType::Int32)]));
    }

    #[test]
    fn unresolved_defers() {
        let checker = OperandTypeChecker::family([TypeFamily::Any, TypeFamily::Character]);
        assert_eq!(
            TypeCheck::Pass,
            checker.check(&[OperandType::Unresolved, varchar()])
        );
        assert_eq!(
            TypeCheck::Deferred,
            checker.check(&[varchar(), OperandType::Unresolved])
        );
    }

    #[test]
    fn definite_failure_beats_deferred() {
        let checker = OperandTypeChecker::family([TypeFamily::Numeric, TypeFamily::Numeric]);
        assert_eq!(
            TypeCheck::Fail,
            checker.check(&[OperandType::Unresolved, varchar()])
        );
    }

    #[test]
    fn or_deferred_when_no_pass() {
        let checker = OperandTypeChecker::family([TypeFamily::Numeric])
            .or(OperandTypeChecker::family([TypeFamily::Boolean]));
        assert_eq!(TypeCheck::Deferred, checker.check(&[OperandType::Unresolved]));
        assert_eq!(TypeCheck::Pass, checker.check(&[resolved(DataType::Boolean)]));
        assert_eq!(TypeCheck::Fail, checker.check(&[varchar()]));
    }

    #[test]
    fn and_requires_all() {
        let checker = OperandTypeChecker::family([TypeFamily::Any])
            .and(OperandTypeChecker::family([TypeFamily::Numeric]));
        assert_eq!(TypeCheck::Pass, checker.check(&[resolved(DataType::Int64)]));
        assert_eq!(TypeCheck::Fail, checker.check(&[varchar()]));
        assert_eq!(TypeCheck::Deferred, checker.check(&[OperandType::Unresolved]));
        assert_eq!(vec![1], checker.accepted_counts());
    }

    #[test]
    fn symbols_only_match_any() {
        assert_eq!(TypeCheck::Pass, TypeFamily::Any.check(&OperandType::Symbol));
        assert_eq!(TypeCheck::Fail, TypeFamily::Character.check(&OperandType::Symbol));
    }

    #[test]
    fn combining_leaves_inputs_untouched() {
        let a = OperandTypeChecker::family([TypeFamily::Any]);
        let b = OperandTypeChecker::family([TypeFamily::Any, TypeFamily::Any]);
        let combined = a.clone().or(b.clone());
        assert_eq!(OperandTypeChecker::Or(vec![a.clone(), b]), combined);
        assert_eq!(OperandTypeChecker::Family(vec![TypeFamily::Any]), a);
        assert_eq!(vec![1, 2], combined.accepted_counts());
    }
}
