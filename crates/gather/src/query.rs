//! Query builder and executor.
//!
//! The [`Query`] struct holds an ordered list of [`Criterion`]s and methods
//! for executing it against record sequences. [`Clause`] is the half-built
//! state of the fluent builder: it names an attribute and waits for a
//! terminal predicate that turns it back into a `Query`.

use regex::Regex;

use crate::criterion::Criterion;
use crate::error::Result;
use crate::op::{Join, Op};
use crate::pattern::compiled;
use crate::record::Record;
use crate::value::Value;

/// An ordered list of criteria folded left to right.
///
/// Evaluation starts from `false` and folds each criterion's (possibly
/// inverted) result into the accumulator with the criterion's [`Join`]:
///
/// ```text
/// acc = false
/// for c in criteria: acc = acc <join c> (c.evaluate(record) xor c.inverted)
/// ```
///
/// There is no precedence and no short-circuit; every criterion is
/// evaluated for every record. The first criterion of a query started with
/// [`Query::filter`] joins with OR, so it seeds the accumulator. A query
/// whose first criterion joins with AND never matches.
///
/// # Example
///
/// ```
/// use gather::{Query, Record};
///
/// #[derive(Record)]
/// struct Worker {
///     name: String,
///     salary: u32,
///     active: bool,
/// }
///
/// let workers = vec![
///     Worker { name: "Sandeep Gupta".into(), salary: 40, active: true },
///     Worker { name: "Abhishek Gupta".into(), salary: 50, active: true },
///     Worker { name: "Amit Modi".into(), salary: 50, active: false },
/// ];
///
/// let query = Query::filter("salary")
///     .greater_than_or_equals(50)
///     .and("active")
///     .is(true);
///
/// let found = query.find(&workers);
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].name, "Abhishek Gupta");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    criteria: Vec<Criterion>,
}

impl Query {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Creates an empty query, which matches every non-null record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a query with a clause on `name`.
    pub fn filter(name: impl Into<String>) -> Clause {
        Clause::new(Query::new(), name.into(), Join::Or)
    }

    /// Starts a query matching records that have the attribute `name`.
    pub fn has_property(name: impl Into<String>) -> Query {
        Query::new().push(Criterion::unary(name, Op::HasProperty))
    }

    /// Opens a clause on `name` whose result is ANDed into the query.
    pub fn and(self, name: impl Into<String>) -> Clause {
        Clause::new(self, name.into(), Join::And)
    }

    /// Opens a clause on `name` whose result is ORed into the query.
    pub fn or(self, name: impl Into<String>) -> Clause {
        Clause::new(self, name.into(), Join::Or)
    }

    /// Appends a prebuilt criterion.
    pub fn push(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    /// The criteria in evaluation order.
    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Returns `true` if the query has no criteria.
    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Evaluates the query against a single record.
    ///
    /// A null record never matches. An empty query matches every other
    /// record.
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        if record.is_null() {
            return false;
        }
        if self.criteria.is_empty() {
            return true;
        }
        self.criteria.iter().fold(false, |acc, criterion| {
            let result = criterion.evaluate(record) != criterion.is_inverted();
            criterion.join().apply(acc, result)
        })
    }

    /// Counts the matching records.
    pub fn count<'a, T, I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = &'a T>,
        T: Record + ?Sized + 'a,
    {
        self.scan(records, 0, 0, |_| {})
    }

    /// Returns every matching record, in sequence order.
    pub fn find<'a, T, I>(&self, records: I) -> Vec<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
        T: Record + ?Sized + 'a,
    {
        self.find_limit(records, 0, 0)
    }

    /// Returns up to `limit` matching records after skipping the first
    /// `skip` matches. A `limit` of zero means no limit.
    ///
    /// The scan stops as soon as `limit` records are collected.
    pub fn find_limit<'a, T, I>(&self, records: I, limit: usize, skip: usize) -> Vec<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
        T: Record + ?Sized + 'a,
    {
        let mut found = Vec::new();
        self.scan(records, limit, skip, |record| found.push(record));
        found
    }

    /// Returns the first match after skipping `skip` matches.
    pub fn find_one<'a, T, I>(&self, records: I, skip: usize) -> Option<&'a T>
    where
        I: IntoIterator<Item = &'a T>,
        T: Record + ?Sized + 'a,
    {
        let mut found = None;
        self.scan(records, 1, skip, |record| found = Some(record));
        found
    }

    /// Walks `records`, handing matches past `skip` to `sink` until `limit`
    /// of them were taken. Returns how many were taken.
    fn scan<'a, T, I, F>(&self, records: I, limit: usize, mut skip: usize, mut sink: F) -> usize
    where
        I: IntoIterator<Item = &'a T>,
        T: Record + ?Sized + 'a,
        F: FnMut(&'a T),
    {
        let mut taken = 0;
        for record in records {
            if !self.matches(record) {
                continue;
            }
            if skip > 0 {
                skip -= 1;
                continue;
            }
            sink(record);
            taken += 1;
            if limit > 0 && taken == limit {
                break;
            }
        }
        taken
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, criterion) in self.criteria.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", criterion.join())?;
            }
            write!(f, "{criterion}")?;
        }
        Ok(())
    }
}

/// A query clause waiting for its predicate.
///
/// Created by [`Query::filter`], [`Query::and`] and [`Query::or`]. Every
/// predicate method consumes the clause and returns the extended
/// [`Query`], so a clause gets exactly one predicate.
#[derive(Debug, Clone)]
#[must_use = "a clause does nothing until a predicate closes it"]
pub struct Clause {
    query: Query,
    path: String,
    join: Join,
    inverted: bool,
}

impl Clause {
    fn new(query: Query, path: String, join: Join) -> Self {
        Clause {
            query,
            path,
            join,
            inverted: false,
        }
    }

    fn close(self, op: Op, literal: Option<Value<'static>>) -> Query {
        let criterion = match literal {
            Some(literal) => Criterion::new(self.path, op, literal),
            None => Criterion::unary(self.path, op),
        };
        self.query
            .push(criterion.with_join(self.join).with_inverted(self.inverted))
    }

    /// Negates the predicate that closes this clause.
    pub fn not(mut self) -> Self {
        self.inverted = !self.inverted;
        self
    }

    /// Attribute equals `value`.
    pub fn is(self, value: impl Into<Value<'static>>) -> Query {
        self.close(Op::Equals, Some(value.into()))
    }

    /// Text attribute equals `value` ignoring case.
    pub fn is_ignore_case(self, value: impl Into<Value<'static>>) -> Query {
        self.close(Op::EqualsIgnoreCase, Some(value.into()))
    }

    /// Attribute is null or missing.
    pub fn is_null(self) -> Query {
        self.close(Op::IsNull, None)
    }

    /// Attribute exists and is not null.
    pub fn is_not_null(mut self) -> Query {
        self.inverted = !self.inverted;
        self.close(Op::IsNull, None)
    }

    /// The record has the attribute.
    pub fn exists_property(self) -> Query {
        self.close(Op::HasProperty, None)
    }

    /// The record lacks the attribute.
    pub fn not_exists_property(mut self) -> Query {
        self.inverted = !self.inverted;
        self.close(Op::HasProperty, None)
    }

    /// Attribute text matches a `?`/`*` wildcard pattern.
    pub fn like(self, pattern: impl Into<String>) -> Query {
        self.close(Op::WildcardMatch, Some(Value::from(pattern.into())))
    }

    /// Attribute text matches the regular expression as a whole.
    ///
    /// # Errors
    ///
    /// Returns [`GatherError::InvalidRegex`](crate::GatherError::InvalidRegex)
    /// if the pattern does not compile.
    pub fn regex(self, pattern: impl Into<String>) -> Result<Query> {
        let pattern = pattern.into();
        compiled(&pattern)?;
        Ok(self.close(Op::RegexMatch, Some(Value::from(pattern))))
    }

    /// Attribute text matches a precompiled regular expression as a whole.
    pub fn matches(self, regex: Regex) -> Query {
        self.close(Op::RegexMatch, Some(Value::Regex(regex)))
    }

    /// Attribute orders after `value`.
    pub fn greater_than(self, value: impl Into<Value<'static>>) -> Query {
        self.close(Op::GreaterThan, Some(value.into()))
    }

    /// Attribute orders after or equal to `value`.
    pub fn greater_than_or_equals(self, value: impl Into<Value<'static>>) -> Query {
        self.close(Op::GreaterThanOrEquals, Some(value.into()))
    }

    /// Attribute orders before `value`.
    pub fn less_than(self, value: impl Into<Value<'static>>) -> Query {
        self.close(Op::LessThan, Some(value.into()))
    }

    /// Attribute orders before or equal to `value`.
    pub fn less_than_or_equals(self, value: impl Into<Value<'static>>) -> Query {
        self.close(Op::LessThanOrEquals, Some(value.into()))
    }

    /// Attribute is one of `values`, a list or array.
    pub fn in_values(self, values: impl Into<Value<'static>>) -> Query {
        self.close(Op::In, Some(values.into()))
    }

    /// Collection attribute contains `value`.
    pub fn has(self, value: impl Into<Value<'static>>) -> Query {
        self.close(Op::CollectionHasValue, Some(value.into()))
    }

    /// Collection attribute contains every element of `values`.
    pub fn has_all(self, values: impl Into<Value<'static>>) -> Query {
        self.close(Op::CollectionHasAllValues, Some(values.into()))
    }

    /// Collection attribute contains at least one element of `values`.
    pub fn has_any(self, values: impl Into<Value<'static>>) -> Query {
        self.close(Op::CollectionHasAnyValue, Some(values.into()))
    }
}
