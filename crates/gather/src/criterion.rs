//! Single query predicates.
//!
//! A [`Criterion`] names an attribute path, an [`Op`] and an optional
//! literal, plus the [`Join`] that folds its result into a query and an
//! inversion flag.

use crate::contains::{contains, contains_all_or_any};
use crate::op::{Join, Op};
use crate::ordering::natural_cmp;
use crate::pattern::{regex_match, regex_match_compiled, wildcard_match};
use crate::record::Record;
use crate::resolve::{has_attribute, resolve};
use crate::value::Value;

/// A single predicate of a query.
///
/// # Example
///
/// ```
/// use gather::{Criterion, Op, Value};
///
/// let criterion = Criterion::new("age", Op::GreaterThan, 40);
/// assert!(criterion.matches(&Value::from(46u32)));
/// assert!(!criterion.matches(&Value::from(36u32)));
/// assert!(!criterion.matches(&Value::Null));
/// ```
#[derive(Debug, Clone)]
pub struct Criterion {
    path: String,
    op: Op,
    literal: Option<Value<'static>>,
    join: Join,
    inverted: bool,
}

impl Criterion {
    /// Creates a criterion comparing `path` against `literal`, joined with OR.
    pub fn new(path: impl Into<String>, op: Op, literal: impl Into<Value<'static>>) -> Self {
        Criterion {
            path: path.into(),
            op,
            literal: Some(literal.into()),
            join: Join::Or,
            inverted: false,
        }
    }

    /// Creates a criterion without a literal, for [`Op::IsNull`] and
    /// [`Op::HasProperty`].
    pub fn unary(path: impl Into<String>, op: Op) -> Self {
        Criterion {
            path: path.into(),
            op,
            literal: None,
            join: Join::Or,
            inverted: false,
        }
    }

    /// Sets how this criterion folds into the accumulated result.
    pub fn with_join(mut self, join: Join) -> Self {
        self.join = join;
        self
    }

    /// Sets whether the criterion's result is negated before folding.
    pub fn with_inverted(mut self, inverted: bool) -> Self {
        self.inverted = inverted;
        self
    }

    /// The attribute name or dotted path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The operation.
    pub fn op(&self) -> Op {
        self.op
    }

    /// The literal, if the operation takes one.
    pub fn literal(&self) -> Option<&Value<'static>> {
        self.literal.as_ref()
    }

    /// The join.
    pub fn join(&self) -> Join {
        self.join
    }

    /// Whether the result is negated.
    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Evaluates this criterion against a record, before inversion.
    ///
    /// [`Op::HasProperty`] only checks that the attribute exists. Every
    /// other operation resolves the attribute first; a missing attribute
    /// yields `false`, except for [`Op::IsNull`] which treats it as null.
    pub fn evaluate<R: Record + ?Sized>(&self, record: &R) -> bool {
        if self.op == Op::HasProperty {
            return has_attribute(record, &self.path);
        }
        match resolve(record, &self.path) {
            Some(value) => self.matches(&value),
            None => self.op == Op::IsNull,
        }
    }

    /// Evaluates this criterion against an already resolved value.
    ///
    /// Returns `false` for a null value (unless testing for null), a
    /// missing literal, or values the operation cannot compare.
    pub fn matches(&self, value: &Value<'_>) -> bool {
        match self.op {
            Op::IsNull => return value.is_null(),
            // existence was settled by the caller
            Op::HasProperty => return true,
            _ if value.is_null() => return false,
            _ => {}
        }
        let Some(literal) = self.literal.as_ref() else {
            return false;
        };

        match self.op {
            Op::Equals => value == literal,
            Op::EqualsIgnoreCase => match (value, literal.to_text()) {
                (Value::Text(text), Some(wanted)) => equals_ignore_case(text, &wanted),
                _ => value == literal,
            },
            Op::WildcardMatch => match (value.to_text(), literal.to_text()) {
                (Some(text), Some(pattern)) => wildcard_match(&text, &pattern),
                _ => false,
            },
            Op::RegexMatch => self.match_regex(value, literal),
            Op::LessThan | Op::LessThanOrEquals | Op::GreaterThan | Op::GreaterThanOrEquals => {
                natural_cmp(value, literal).is_some_and(|ordering| self.op.test_ordering(ordering))
            }
            Op::In => contains(literal, value),
            Op::CollectionHasValue => contains(value, literal),
            Op::CollectionHasAllValues => contains_all_or_any(value, literal, true),
            Op::CollectionHasAnyValue => contains_all_or_any(value, literal, false),
            Op::IsNull | Op::HasProperty => false,
        }
    }

    fn match_regex(&self, value: &Value<'_>, literal: &Value<'_>) -> bool {
        let Some(text) = value.to_text() else {
            return false;
        };
        match literal {
            Value::Regex(regex) => regex_match_compiled(&text, regex),
            other => {
                let Some(pattern) = other.to_text() else {
                    return false;
                };
                match regex_match(&text, &pattern) {
                    Ok(matched) => matched,
                    Err(err) => {
                        tracing::warn!(path = %self.path, %err, "regex criterion never matches");
                        false
                    }
                }
            }
        }
    }
}

fn equals_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

impl std::fmt::Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.inverted {
            write!(f, "not ")?;
        }
        write!(f, "{} {}", self.path, self.op)?;
        if let Some(literal) = &self.literal {
            write!(f, " {literal:?}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Array;
    use regex::Regex;

    #[test]
    fn equality_is_numeric_across_widths() {
        let c = Criterion::new("age", Op::Equals, 36i64);
        assert!(c.matches(&Value::from(36u32)));
        assert!(!c.matches(&Value::from(37u32)));
        assert!(!c.matches(&Value::from("36")));
    }

    #[test]
    fn equals_ignore_case() {
        let c = Criterion::new("name", Op::EqualsIgnoreCase, "AMIT modi");
        assert!(c.matches(&Value::from("Amit Modi")));
        assert!(!c.matches(&Value::from("Amit")));

        // non-text values fall back to plain equality
        let c = Criterion::new("age", Op::EqualsIgnoreCase, 36);
        assert!(c.matches(&Value::from(36u8)));
    }

    #[test]
    fn null_values_only_match_is_null() {
        assert!(Criterion::unary("x", Op::IsNull).matches(&Value::Null));
        assert!(!Criterion::unary("x", Op::IsNull).matches(&Value::from(0i32)));
        assert!(!Criterion::new("x", Op::Equals, 0).matches(&Value::Null));
        assert!(!Criterion::new("x", Op::LessThan, 0).matches(&Value::Null));
    }

    #[test]
    fn wildcard_on_text_and_scalars() {
        let c = Criterion::new("name", Op::WildcardMatch, "S*Gupta");
        assert!(c.matches(&Value::from("Sandeep Gupta")));
        assert!(!c.matches(&Value::from("Amit Modi")));

        let c = Criterion::new("salary", Op::WildcardMatch, "4?");
        assert!(c.matches(&Value::from(40i32)));
        assert!(!c.matches(&Value::list(["40"])));
    }

    #[test]
    fn regex_literals() {
        let c = Criterion::new("name", Op::RegexMatch, r"\w+ Gupta");
        assert!(c.matches(&Value::from("Sushant Gupta")));
        assert!(!c.matches(&Value::from("Sushant Gupta Jr")));

        let c = Criterion::new("name", Op::RegexMatch, Regex::new("Amit").unwrap());
        assert!(c.matches(&Value::from("Amit")));
        assert!(!c.matches(&Value::from("Amit Modi")));

        let broken = Criterion::new("name", Op::RegexMatch, "(oops");
        assert!(!broken.matches(&Value::from("(oops")));
    }

    #[test]
    fn ordering_requires_a_common_order() {
        let c = Criterion::new("salary", Op::GreaterThanOrEquals, 50);
        assert!(c.matches(&Value::from(50.0f64)));
        assert!(c.matches(&Value::from(70u64)));
        assert!(!c.matches(&Value::from(40i16)));
        assert!(!c.matches(&Value::from("70")));

        let c = Criterion::new("name", Op::LessThan, "B");
        assert!(c.matches(&Value::from("Abhishek")));
    }

    #[test]
    fn membership_mirrors_containment() {
        let within = Criterion::new("salary", Op::In, Value::list([40, 50]));
        assert!(within.matches(&Value::from(50u32)));
        assert!(!within.matches(&Value::from(70u32)));

        let has = Criterion::new("primes", Op::CollectionHasValue, 7);
        let primes = [2i32, 3, 5, 7];
        assert!(has.matches(&Value::from(Array::from(&primes[..]))));
        assert!(!has.matches(&Value::from(7i32)));
    }

    #[test]
    fn all_and_any_values() {
        let tags = Value::list(["rust", "query", "engine"]);
        let all = Criterion::new(
            "tags",
            Op::CollectionHasAllValues,
            Value::list(["rust", "query"]),
        );
        let any = Criterion::new(
            "tags",
            Op::CollectionHasAnyValue,
            Value::list(["java", "query"]),
        );
        let none = Criterion::new("tags", Op::CollectionHasAnyValue, Value::list(["java"]));
        assert!(all.matches(&tags));
        assert!(any.matches(&tags));
        assert!(!none.matches(&tags));
    }

    #[test]
    fn builders_and_display() {
        let c = Criterion::unary("manager", Op::IsNull)
            .with_join(Join::And)
            .with_inverted(true);
        assert_eq!(c.join(), Join::And);
        assert!(c.is_inverted());
        assert!(c.literal().is_none());
        assert_eq!(c.to_string(), "not manager is-null");
        assert_eq!(
            Criterion::new("age", Op::LessThan, 3).to_string(),
            "age less-than Number(I32(3))"
        );
    }
}
