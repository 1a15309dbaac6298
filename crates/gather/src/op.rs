//! Operations and joins for query criteria.
//!
//! The [`Op`] enum lists every test a criterion can apply to a resolved
//! attribute. [`Join`] says how a criterion's result folds into the
//! results of the criteria before it.

use std::cmp::Ordering;

/// Operation applied by a criterion.
///
/// Operations are grouped by what they inspect:
/// - **Presence**: `HasProperty`, `IsNull`
/// - **Equality**: `Equals`, `EqualsIgnoreCase`
/// - **Text**: `WildcardMatch`, `RegexMatch`
/// - **Ordering**: `LessThan`, `LessThanOrEquals`, `GreaterThan`, `GreaterThanOrEquals`
/// - **Membership**: `In` (value among the literal's elements)
/// - **Containment**: `CollectionHasValue`, `CollectionHasAllValues`,
///   `CollectionHasAnyValue` (literal among the value's elements)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Value equals the literal.
    Equals,
    /// Text equals the literal ignoring case; plain equality otherwise.
    EqualsIgnoreCase,
    /// The record has the attribute, whatever its value.
    HasProperty,
    /// The value is null or the attribute is missing.
    IsNull,
    /// Text matches a `?`/`*` wildcard pattern.
    WildcardMatch,
    /// Text matches a regular expression as a whole.
    RegexMatch,
    /// Value orders before the literal.
    LessThan,
    /// Value orders before or equal to the literal.
    LessThanOrEquals,
    /// Value orders after the literal.
    GreaterThan,
    /// Value orders after or equal to the literal.
    GreaterThanOrEquals,
    /// Value is one of the literal's elements.
    In,
    /// The collection value contains the literal.
    CollectionHasValue,
    /// The collection value contains every element of the literal.
    CollectionHasAllValues,
    /// The collection value contains at least one element of the literal.
    CollectionHasAnyValue,
}

impl Op {
    /// Returns `true` if this operation takes no literal.
    pub fn is_unary(self) -> bool {
        matches!(self, Op::HasProperty | Op::IsNull)
    }

    /// Returns `true` for the four ordering operations.
    pub fn is_ordering(self) -> bool {
        matches!(
            self,
            Op::LessThan | Op::LessThanOrEquals | Op::GreaterThan | Op::GreaterThanOrEquals
        )
    }

    /// Evaluates an ordering operation given the value-to-literal ordering.
    ///
    /// Non-ordering operations return `false`.
    pub fn test_ordering(self, ordering: Ordering) -> bool {
        match self {
            Op::LessThan => ordering == Ordering::Less,
            Op::LessThanOrEquals => ordering != Ordering::Greater,
            Op::GreaterThan => ordering == Ordering::Greater,
            Op::GreaterThanOrEquals => ordering != Ordering::Less,
            _ => false,
        }
    }

    /// Returns the display name of this operation.
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Equals => "equals",
            Op::EqualsIgnoreCase => "equals-ignore-case",
            Op::HasProperty => "has-property",
            Op::IsNull => "is-null",
            Op::WildcardMatch => "wildcard-match",
            Op::RegexMatch => "regex-match",
            Op::LessThan => "less-than",
            Op::LessThanOrEquals => "less-than-or-equals",
            Op::GreaterThan => "greater-than",
            Op::GreaterThanOrEquals => "greater-than-or-equals",
            Op::In => "in",
            Op::CollectionHasValue => "has-value",
            Op::CollectionHasAllValues => "has-all-values",
            Op::CollectionHasAnyValue => "has-any-value",
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a criterion's result combines with the accumulated result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Join {
    /// Accumulated result AND this criterion.
    And,
    /// Accumulated result OR this criterion.
    #[default]
    Or,
}

impl Join {
    /// Folds `result` into the accumulated value.
    pub fn apply(self, accumulated: bool, result: bool) -> bool {
        match self {
            Join::And => accumulated & result,
            Join::Or => accumulated | result,
        }
    }

    /// Returns the display name of this join.
    pub fn as_str(self) -> &'static str {
        match self {
            Join::And => "and",
            Join::Or => "or",
        }
    }
}

impl std::fmt::Display for Join {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
