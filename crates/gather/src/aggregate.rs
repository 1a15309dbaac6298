//! Streaming aggregation over one attribute of a record sequence.
//!
//! A [`Reducer`] consumes the values of an attribute one record at a time
//! and finalizes to a [`Number`]. [`aggregate`] drives a reducer over a
//! sequence; [`Aggregate`] names the built-in reducers.

use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::error::{GatherError, Result};
use crate::number::Number;
use crate::record::Record;
use crate::resolve::resolve;
use crate::value::{EnumValue, Value};

/// Folds attribute values into a single number.
///
/// The driver calls [`consume`](Reducer::consume) once per record that has
/// the attribute, with a 1-based running count of such records, then calls
/// [`finalize`](Reducer::finalize) with the total count.
pub trait Reducer {
    /// Folds one attribute value.
    ///
    /// # Errors
    ///
    /// Numeric reducers fail with [`GatherError::NotNumeric`] on values that
    /// are not number-like.
    fn consume(&mut self, index: usize, value: &Value<'_>) -> Result<()>;

    /// Produces the result after `seen` values were consumed.
    fn finalize(&self, seen: usize) -> Number;
}

/// Runs `reducer` over the attribute `name` of every record.
///
/// Records without the attribute are skipped and do not count as seen.
/// Returns `Ok(None)` for a blank attribute name or an empty sequence.
///
/// # Errors
///
/// Propagates the first error returned by the reducer.
pub fn aggregate<'a, T, I, A>(records: I, name: &str, reducer: &mut A) -> Result<Option<Number>>
where
    I: IntoIterator<Item = &'a T>,
    T: Record + ?Sized + 'a,
    A: Reducer + ?Sized,
{
    if name.trim().is_empty() {
        return Ok(None);
    }
    let mut records = records.into_iter().peekable();
    if records.peek().is_none() {
        return Ok(None);
    }

    let mut seen = 0;
    let mut found = 0;
    for record in records {
        seen += 1;
        let Some(value) = resolve(record, name) else {
            continue;
        };
        found += 1;
        reducer.consume(found, &value)?;
    }
    tracing::trace!(attribute = name, seen, found, "aggregated attribute");
    Ok(Some(reducer.finalize(found)))
}

/// Returns the distinct non-null values of the attribute `name`.
///
/// # Errors
///
/// Never fails for well-behaved records; the signature mirrors [`aggregate`].
pub fn distinct<'a, T, I>(records: I, name: &str) -> Result<HashSet<Distinct>>
where
    I: IntoIterator<Item = &'a T>,
    T: Record + ?Sized + 'a,
{
    let mut unique = Unique::default();
    aggregate(records, name, &mut unique)?;
    Ok(unique.into_values())
}

/// Numeric domain of a numeric reducer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Values truncate to `i64`.
    Integral,
    /// Values widen to `f64`.
    Floating,
}

/// Built-in reducers.
///
/// # Example
///
/// ```
/// use gather::{Aggregate, Domain, Number, Record};
///
/// #[derive(Record)]
/// struct Worker {
///     age: u32,
/// }
///
/// let workers = vec![Worker { age: 36 }, Worker { age: 32 }, Worker { age: 46 }];
///
/// let sum = Aggregate::Sum(Domain::Integral).run(&workers, "age").unwrap();
/// assert_eq!(sum, Some(Number::I64(114)));
///
/// let average = Aggregate::Average(Domain::Floating).run(&workers, "age").unwrap();
/// assert_eq!(average, Some(Number::F64(38.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregate {
    /// Number of records having the attribute, null values included.
    Count,
    /// Number of distinct non-null values.
    Unique,
    /// Sum of the values.
    Sum(Domain),
    /// Smallest value.
    Min(Domain),
    /// Largest value.
    Max(Domain),
    /// Mean of the values.
    Average(Domain),
}

impl Aggregate {
    /// Creates a fresh reducer for this aggregate.
    pub fn reducer(self) -> Box<dyn Reducer> {
        match self {
            Aggregate::Count => Box::new(Count::default()),
            Aggregate::Unique => Box::new(Unique::default()),
            Aggregate::Sum(Domain::Integral) => Box::new(Sum::<i64>::default()),
            Aggregate::Sum(Domain::Floating) => Box::new(Sum::<f64>::default()),
            Aggregate::Min(Domain::Integral) => Box::new(Min::<i64>::default()),
            Aggregate::Min(Domain::Floating) => Box::new(Min::<f64>::default()),
            Aggregate::Max(Domain::Integral) => Box::new(Max::<i64>::default()),
            Aggregate::Max(Domain::Floating) => Box::new(Max::<f64>::default()),
            Aggregate::Average(Domain::Integral) => Box::new(Average::<i64>::default()),
            Aggregate::Average(Domain::Floating) => Box::new(Average::<f64>::default()),
        }
    }

    /// Aggregates the attribute `name` over `records`.
    ///
    /// # Errors
    ///
    /// Numeric aggregates fail with [`GatherError::NotNumeric`] when a
    /// record's value is not number-like.
    pub fn run<'a, T, I>(self, records: I, name: &str) -> Result<Option<Number>>
    where
        I: IntoIterator<Item = &'a T>,
        T: Record + ?Sized + 'a,
    {
        let mut reducer = self.reducer();
        aggregate(records, name, reducer.as_mut())
    }
}

// ============================================================================
// Count and Unique
// ============================================================================

/// Counts every value, nulls included.
#[derive(Debug, Default)]
pub struct Count {
    count: usize,
}

impl Reducer for Count {
    fn consume(&mut self, _index: usize, _value: &Value<'_>) -> Result<()> {
        self.count += 1;
        Ok(())
    }

    fn finalize(&self, _seen: usize) -> Number {
        Number::from(self.count)
    }
}

/// Counts distinct non-null values.
#[derive(Debug, Default)]
pub struct Unique {
    values: HashSet<Distinct>,
}

impl Unique {
    /// The distinct values consumed so far.
    pub fn values(&self) -> &HashSet<Distinct> {
        &self.values
    }

    /// Consumes the reducer, returning its distinct values.
    pub fn into_values(self) -> HashSet<Distinct> {
        self.values
    }
}

impl Reducer for Unique {
    fn consume(&mut self, _index: usize, value: &Value<'_>) -> Result<()> {
        if !value.is_null() {
            self.values.insert(Distinct::from(value));
        }
        Ok(())
    }

    fn finalize(&self, _seen: usize) -> Number {
        Number::from(self.values.len())
    }
}

/// Owned, hashable key for a [`Value`], consistent with value equality.
///
/// Numbers of any sub-kind holding the same integer map to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Distinct {
    Null,
    Bool(bool),
    Char(char),
    Integer(i128),
    /// Bit pattern of a non-integral float.
    Float(u64),
    /// Normalized non-integral decimal.
    Decimal(Decimal),
    Text(String),
    Enum(EnumValue),
    Sequence(Vec<Distinct>),
    /// Address of a nested record.
    Record(usize),
    Pattern(String),
}

impl From<Number> for Distinct {
    fn from(n: Number) -> Self {
        if let Some(i) = n.to_i128_exact() {
            return Distinct::Integer(i);
        }
        match n {
            Number::Decimal(d) => Distinct::Decimal(d.normalize()),
            other => Distinct::Float(other.to_f64().to_bits()),
        }
    }
}

impl From<&Value<'_>> for Distinct {
    fn from(value: &Value<'_>) -> Self {
        match value {
            Value::Null => Distinct::Null,
            Value::Bool(b) => Distinct::Bool(*b),
            Value::Char(c) => Distinct::Char(*c),
            Value::Number(n) => Distinct::from(*n),
            Value::Counter(c) => Distinct::from(c.load()),
            Value::Text(s) => Distinct::Text(s.to_string()),
            Value::Enum(e) => Distinct::Enum(*e),
            Value::Record(r) => Distinct::Record((*r as *const dyn Record).cast::<()>() as usize),
            Value::Regex(r) => Distinct::Pattern(r.as_str().to_string()),
            Value::List(_) | Value::Array(_) => Distinct::Sequence(
                value
                    .elements()
                    .into_iter()
                    .flatten()
                    .map(|item| Distinct::from(&*item))
                    .collect(),
            ),
        }
    }
}

// ============================================================================
// Numeric reducers
// ============================================================================

/// Numeric domain a reducer folds in.
pub trait Numeric: Copy + PartialOrd + Default {
    /// Smallest representable value, the starting point of [`Max`].
    const LOWEST: Self;
    /// Largest representable value, the starting point of [`Min`].
    const HIGHEST: Self;

    /// Converts a number-like value into this domain.
    fn coerce(value: &Value<'_>) -> Result<Self>;

    /// Adds two values.
    fn add(self, other: Self) -> Self;

    /// Divides a sum by a count.
    fn mean(sum: Self, count: usize) -> Self;

    /// Wraps the result.
    fn into_number(self) -> Number;
}

fn number_like(value: &Value<'_>) -> Result<Number> {
    value
        .as_number()
        .ok_or(GatherError::NotNumeric { kind: value.kind() })
}

impl Numeric for i64 {
    const LOWEST: Self = i64::MIN;
    const HIGHEST: Self = i64::MAX;

    fn coerce(value: &Value<'_>) -> Result<Self> {
        number_like(value).map(Number::to_i64)
    }

    fn add(self, other: Self) -> Self {
        self.wrapping_add(other)
    }

    fn mean(sum: Self, count: usize) -> Self {
        sum / count as i64
    }

    fn into_number(self) -> Number {
        Number::I64(self)
    }
}

impl Numeric for f64 {
    const LOWEST: Self = f64::MIN;
    const HIGHEST: Self = f64::MAX;

    fn coerce(value: &Value<'_>) -> Result<Self> {
        number_like(value).map(Number::to_f64)
    }

    fn add(self, other: Self) -> Self {
        self + other
    }

    fn mean(sum: Self, count: usize) -> Self {
        sum / count as f64
    }

    fn into_number(self) -> Number {
        Number::F64(self)
    }
}

/// Sums values in domain `N`.
#[derive(Debug, Default)]
pub struct Sum<N> {
    total: N,
}

impl<N: Numeric> Reducer for Sum<N> {
    fn consume(&mut self, _index: usize, value: &Value<'_>) -> Result<()> {
        self.total = self.total.add(N::coerce(value)?);
        Ok(())
    }

    fn finalize(&self, _seen: usize) -> Number {
        self.total.into_number()
    }
}

/// Keeps the smallest value in domain `N`.
#[derive(Debug)]
pub struct Min<N> {
    min: N,
}

impl<N: Numeric> Default for Min<N> {
    fn default() -> Self {
        Min { min: N::HIGHEST }
    }
}

impl<N: Numeric> Reducer for Min<N> {
    fn consume(&mut self, _index: usize, value: &Value<'_>) -> Result<()> {
        let n = N::coerce(value)?;
        if n < self.min {
            self.min = n;
        }
        Ok(())
    }

    fn finalize(&self, _seen: usize) -> Number {
        self.min.into_number()
    }
}

/// Keeps the largest value in domain `N`.
#[derive(Debug)]
pub struct Max<N> {
    max: N,
}

impl<N: Numeric> Default for Max<N> {
    fn default() -> Self {
        Max { max: N::LOWEST }
    }
}

impl<N: Numeric> Reducer for Max<N> {
    fn consume(&mut self, _index: usize, value: &Value<'_>) -> Result<()> {
        let n = N::coerce(value)?;
        if n > self.max {
            self.max = n;
        }
        Ok(())
    }

    fn finalize(&self, _seen: usize) -> Number {
        self.max.into_number()
    }
}

/// Averages values in domain `N`. Integral averages truncate.
#[derive(Debug)]
pub struct Average<N> {
    total: N,
    count: usize,
}

impl<N: Numeric> Default for Average<N> {
    fn default() -> Self {
        Average {
            total: N::default(),
            count: 0,
        }
    }
}

impl<N: Numeric> Reducer for Average<N> {
    fn consume(&mut self, _index: usize, value: &Value<'_>) -> Result<()> {
        self.total = self.total.add(N::coerce(value)?);
        self.count += 1;
        Ok(())
    }

    fn finalize(&self, _seen: usize) -> Number {
        if self.count == 0 {
            return N::default().into_number();
        }
        N::mean(self.total, self.count).into_number()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AsValue, Attribute};

    struct Reading {
        value: Option<f64>,
        label: &'static str,
    }

    impl Record for Reading {
        fn attributes(&self) -> Vec<Attribute> {
            vec![Attribute::field("value", 0), Attribute::field("label", 1)]
        }

        fn read(&self, location: &[usize]) -> Option<Value<'_>> {
            match location {
                [0] => Some(self.value.as_value()),
                [1] => Some(self.label.as_value()),
                _ => None,
            }
        }
    }

    fn reading(value: Option<f64>, label: &'static str) -> Reading {
        Reading { value, label }
    }

    fn readings() -> Vec<Reading> {
        vec![
            reading(Some(1.5), "a"),
            reading(Some(2.5), "b"),
            reading(Some(1.5), "a"),
        ]
    }

    #[test]
    fn empty_inputs_are_none() {
        let none: Vec<Reading> = Vec::new();
        assert_eq!(Aggregate::Count.run(&none, "value").unwrap(), None);
        assert_eq!(Aggregate::Count.run(&readings(), "").unwrap(), None);
        assert_eq!(Aggregate::Count.run(&readings(), "  ").unwrap(), None);
    }

    #[test]
    fn missing_attribute_contributes_nothing() {
        let readings = readings();
        assert_eq!(Aggregate::Count.run(&readings, "weight").unwrap(), Some(Number::U64(0)));
        assert_eq!(
            Aggregate::Average(Domain::Integral).run(&readings, "weight").unwrap(),
            Some(Number::I64(0))
        );
        assert_eq!(
            Aggregate::Min(Domain::Integral).run(&readings, "weight").unwrap(),
            Some(Number::I64(i64::MAX))
        );
    }

    #[test]
    fn floating_and_integral_domains() {
        let readings = readings();
        assert_eq!(
            Aggregate::Sum(Domain::Floating).run(&readings, "value").unwrap(),
            Some(Number::F64(5.5))
        );
        // 1 + 2 + 1 after truncation
        assert_eq!(
            Aggregate::Sum(Domain::Integral).run(&readings, "value").unwrap(),
            Some(Number::I64(4))
        );
        assert_eq!(
            Aggregate::Max(Domain::Floating).run(&readings, "value").unwrap(),
            Some(Number::F64(2.5))
        );
        assert_eq!(
            Aggregate::Min(Domain::Floating).run(&readings, "value").unwrap(),
            Some(Number::F64(1.5))
        );
    }

    #[test]
    fn unique_ignores_nulls() {
        let mut readings = readings();
        readings.push(reading(None, "c"));
        assert_eq!(Aggregate::Unique.run(&readings, "value").unwrap(), Some(Number::U64(2)));
        assert_eq!(Aggregate::Count.run(&readings, "value").unwrap(), Some(Number::U64(4)));
        assert_eq!(Aggregate::Unique.run(&readings, "label").unwrap(), Some(Number::U64(3)));
    }

    #[test]
    fn numeric_reducers_reject_non_numbers() {
        let readings = readings();
        let err = Aggregate::Sum(Domain::Integral).run(&readings, "label").unwrap_err();
        assert!(matches!(err, GatherError::NotNumeric { kind: "text" }));

        let mut with_null = readings;
        with_null.push(reading(None, "d"));
        assert!(Aggregate::Max(Domain::Floating).run(&with_null, "value").is_err());
    }

    #[test]
    fn distinct_keys_follow_value_equality() {
        assert_eq!(Distinct::from(&Value::from(36u8)), Distinct::from(&Value::from(36.0f64)));
        assert_ne!(Distinct::from(&Value::from(36.5f64)), Distinct::from(&Value::from(36i64)));
        assert_eq!(
            Distinct::from(&Value::list([1i32, 2])),
            Distinct::Sequence(vec![Distinct::Integer(1), Distinct::Integer(2)])
        );
        assert_eq!(
            Distinct::from(&Value::from(Decimal::new(150, 2))),
            Distinct::from(&Value::from(Decimal::new(15, 1)))
        );
    }

    #[test]
    fn distinct_returns_the_set() {
        let values = distinct(&readings(), "label").unwrap();
        assert_eq!(values.len(), 2);
        assert!(values.contains(&Distinct::Text("a".into())));
    }

    #[test]
    fn reducers_can_be_driven_directly() {
        let readings = readings();
        let mut count = Count::default();
        assert_eq!(aggregate(&readings, "label", &mut count).unwrap(), Some(Number::U64(3)));
        let mut average = Average::<f64>::default();
        let result = aggregate(&readings, "value", &mut average).unwrap();
        assert_eq!(result.map(Number::to_f64), Some(5.5 / 3.0));
    }
}
