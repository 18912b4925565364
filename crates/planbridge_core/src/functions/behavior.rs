//! Closed sets of syntactic choices that operators carry as call operands.
//!
//! A tag has no behavior of its own. It only identifies which choice was made
//! and knows the keywords that spell it.

use std::fmt;

/// A closed set of behavior tags for one syntactic axis.
pub trait SymbolTag: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Name of the axis, used in diagnostics.
    const AXIS: &'static str;

    /// Every member of the set.
    const ALL: &'static [Self];

    /// Keywords this tag renders as.
    fn keywords(&self) -> &'static [&'static str];

    /// Upper snake case name of the tag.
    fn name(&self) -> &'static str;

    fn into_tag(self) -> BehaviorTag;

    /// Get the tag back out of a type erased tag, None if the tag belongs to a
    /// different axis.
    fn from_tag(tag: BehaviorTag) -> Option<Self>;
}

/// How JSON_QUERY wraps its result in an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonQueryWrapperBehavior {
    WithoutArray,
    WithConditionalArray,
    WithUnconditionalArray,
}

impl SymbolTag for JsonQueryWrapperBehavior {
    const AXIS: &'static str = "wrapper";

    const ALL: &'static [Self] = &[
        Self::WithoutArray,
        Self::WithConditionalArray,
        Self::WithUnconditionalArray,
    ];

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::WithoutArray => &["WITHOUT", "ARRAY"],
            Self::WithConditionalArray => &["WITH", "CONDITIONAL", "ARRAY"],
            Self::WithUnconditionalArray => &["WITH", "UNCONDITIONAL", "ARRAY"],
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::WithoutArray => "WITHOUT_ARRAY",
            Self::WithConditionalArray => "WITH_CONDITIONAL_ARRAY",
            Self::WithUnconditionalArray => "WITH_UNCONDITIONAL_ARRAY",
        }
    }

    fn into_tag(self) -> BehaviorTag {
        BehaviorTag::Wrapper(self)
    }

    fn from_tag(tag: BehaviorTag) -> Option<Self> {
        match tag {
            BehaviorTag::Wrapper(v) => Some(v),
            _ => None,
        }
    }
}

/// What JSON_QUERY produces when the path yields nothing, or fails.
///
/// The same set is used for both the ON EMPTY and ON ERROR clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonQueryEmptyOrErrorBehavior {
    Null,
    Error,
    EmptyArray,
    EmptyObject,
}

impl SymbolTag for JsonQueryEmptyOrErrorBehavior {
    const AXIS: &'static str = "empty_or_error";

    const ALL: &'static [Self] = &[Self::Null, Self::Error, Self::EmptyArray, Self::EmptyObject];

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Null => &["NULL"],
            Self::Error => &["ERROR"],
            Self::EmptyArray => &["EMPTY", "ARRAY"],
            Self::EmptyObject => &["EMPTY", "OBJECT"],
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Error => "ERROR",
            Self::EmptyArray => "EMPTY_ARRAY",
            Self::EmptyObject => "EMPTY_OBJECT",
        }
    }

    fn into_tag(self) -> BehaviorTag {
        BehaviorTag::EmptyOrError(self)
    }

    fn from_tag(tag: BehaviorTag) -> Option<Self> {
        match tag {
            BehaviorTag::EmptyOrError(v) => Some(v),
            _ => None,
        }
    }
}

/// A behavior tag from any axis.
///
/// This is what's stored in a call operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BehaviorTag {
    Wrapper(JsonQueryWrapperBehavior),
    EmptyOrError(JsonQueryEmptyOrErrorBehavior),
}

impl BehaviorTag {
    pub fn axis(&self) -> &'static str {
        match self {
            Self::Wrapper(_) => JsonQueryWrapperBehavior::AXIS,
            Self::EmptyOrError(_) => JsonQueryEmptyOrErrorBehavior::AXIS,
        }
    }

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Wrapper(v) => v.keywords(),
            Self::EmptyOrError(v) => v.keywords(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Wrapper(v) => v.name(),
            Self::EmptyOrError(v) => v.name(),
        }
    }

    pub fn same_axis(&self, other: &BehaviorTag) -> bool {
        self.axis() == other.axis()
    }

    /// Keyword spellings of every tag on this tag's axis.
    pub fn axis_choices(&self) -> Vec<String> {
        fn spell<T: SymbolTag>() -> Vec<String> {
            T::ALL.iter().map(|t| t.keywords().join(" ")).collect()
        }
        match self {
            Self::Wrapper(_) => spell::<JsonQueryWrapperBehavior>(),
            Self::EmptyOrError(_) => spell::<JsonQueryEmptyOrErrorBehavior>(),
        }
    }
}

impl fmt::Display for BehaviorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An operand position holding a behavior tag, with the tag used when the
/// caller leaves the position out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BehaviorOperand {
    pub position: usize,
    pub default: BehaviorTag,
}

impl BehaviorOperand {
    pub fn new<T: SymbolTag>(position: usize, default: T) -> Self {
        BehaviorOperand {
            position,
            default: default.into_tag(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_axis_complete<T: SymbolTag>() {
        for tag in T::ALL {
            assert!(!tag.keywords().is_empty(), "{tag:?}");
            assert_eq!(Some(*tag), T::from_tag(tag.into_tag()));
            assert_eq!(T::AXIS, tag.into_tag().axis());
        }
    }

    #[test]
    fn every_tag_has_keywords() {
        assert_axis_complete::<JsonQueryWrapperBehavior>();
        assert_axis_complete::<JsonQueryEmptyOrErrorBehavior>();
    }

    #[test]
    fn from_tag_rejects_other_axis() {
        let tag = JsonQueryEmptyOrErrorBehavior::Null.into_tag();
        assert_eq!(None, JsonQueryWrapperBehavior::from_tag(tag));
        assert!(!tag.same_axis(&JsonQueryWrapperBehavior::WithoutArray.into_tag()));
    }

    #[test]
    fn axis_choices_spell_every_tag() {
        assert_eq!(
            vec!["NULL", "ERROR", "EMPTY ARRAY", "EMPTY OBJECT"],
            JsonQueryEmptyOrErrorBehavior::Error.into_tag().axis_choices()
        );
    }

    #[test]
    fn names() {
        assert_eq!(
            "WITH_CONDITIONAL_ARRAY",
            JsonQueryWrapperBehavior::WithConditionalArray.into_tag().to_string()
        );
    }
}
