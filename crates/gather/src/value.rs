//! Runtime value types for attribute resolution and query literals.
//!
//! The [`Value`] enum represents both the value of an attribute resolved
//! from a record (usually borrowing from it) and the literal a criterion
//! compares against (a `Value<'static>` owning its data).

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;
use std::sync::atomic::{self, AtomicI32, AtomicI64};

use regex::Regex;
use rust_decimal::Decimal;

use crate::number::Number;
use crate::record::{GatherEnum, Record};

/// Dynamically typed value, borrowed from a record or owned by a literal.
///
/// # Example
///
/// ```
/// use gather::{Number, Value};
///
/// let name = String::from("Sandeep Gupta");
/// let value = Value::from(name.as_str());
/// assert_eq!(value.as_str(), Some("Sandeep Gupta"));
///
/// // numbers compare by value, whatever their width
/// assert_eq!(Value::from(36i32), Value::from(36u8));
/// assert_eq!(Value::from(36i64).as_number(), Some(Number::I64(36)));
/// ```
#[derive(Clone)]
pub enum Value<'a> {
    /// Attribute present but holding no value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Single character.
    Char(char),
    /// Numeric value of any sub-kind.
    Number(Number),
    /// Atomically updated integer, read when coerced to a number.
    Counter(Counter<'a>),
    /// Text, borrowed or owned.
    Text(Cow<'a, str>),
    /// Generic container, ordered or not.
    List(Vec<Value<'a>>),
    /// Homogeneous fixed-width primitive array.
    Array(Array<'a>),
    /// Opaque enum variant, compared by equality only.
    Enum(EnumValue),
    /// Nested record, traversable with dotted attribute paths.
    Record(&'a dyn Record),
    /// Compiled regular expression literal.
    Regex(Regex),
}

impl<'a> Value<'a> {
    /// Wraps a nested record, mapping a null record to [`Value::Null`].
    pub fn from_record<R: Record>(record: &'a R) -> Self {
        if record.is_null() {
            Value::Null
        } else {
            Value::Record(record)
        }
    }

    /// Builds a [`Value::List`] from anything convertible to values.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value<'a>>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Returns the name of this value's kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::Number(_) => "number",
            Value::Counter(_) => "counter",
            Value::Text(_) => "text",
            Value::List(_) => "list",
            Value::Array(_) => "array",
            Value::Enum(_) => "enum",
            Value::Record(_) => "record",
            Value::Regex(_) => "regex",
        }
    }

    /// Returns `true` if this is a `Null` value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Extracts the text, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the nested record, if present.
    pub fn as_record(&self) -> Option<&'a dyn Record> {
        match self {
            Value::Record(r) => Some(*r),
            _ => None,
        }
    }

    /// Coerces a number-like value to a [`Number`].
    ///
    /// Plain numbers are returned as is and atomic counters are read.
    /// Every other kind returns `None`.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Counter(c) => Some(c.load()),
            _ => None,
        }
    }

    /// Renders a scalar value as text for pattern matching.
    ///
    /// Containers, records, enums and null have no textual form.
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Text(s) => Some(Cow::Borrowed(s.as_ref())),
            Value::Char(c) => Some(Cow::Owned(c.to_string())),
            Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            Value::Counter(c) => Some(Cow::Owned(c.load().to_string())),
            _ => None,
        }
    }

    /// Iterates the elements of a list or array.
    ///
    /// Returns `None` for values that are not list-like.
    pub fn elements(&self) -> Option<Elements<'_, 'a>> {
        match self {
            Value::List(items) => Some(Elements::List(items.iter())),
            Value::Array(array) => Some(Elements::Array(array.values())),
            _ => None,
        }
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => std::ptr::addr_eq(*a, *b),
            (Value::Regex(a), Value::Regex(b)) => a.as_str() == b.as_str(),
            _ => match (self.as_number(), other.as_number()) {
                (Some(a), Some(b)) => a == b,
                _ => match (self.elements(), other.elements()) {
                    (Some(a), Some(b)) => a.eq(b),
                    _ => false,
                },
            },
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Char(c) => f.debug_tuple("Char").field(c).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::Counter(c) => f.debug_tuple("Counter").field(c).finish(),
            Value::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Array(array) => f.debug_tuple("Array").field(array).finish(),
            Value::Enum(e) => f.debug_tuple("Enum").field(e).finish(),
            Value::Record(r) => f
                .debug_tuple("Record")
                .field(&r.record_type().name())
                .finish(),
            Value::Regex(r) => f.debug_tuple("Regex").field(&r.as_str()).finish(),
        }
    }
}

/// Iterator over the elements of a list-like [`Value`].
pub enum Elements<'v, 'a> {
    /// Elements of a [`Value::List`].
    List(std::slice::Iter<'v, Value<'a>>),
    /// Elements of a [`Value::Array`].
    Array(ArrayValues<'v, 'a>),
}

impl<'v, 'a> Iterator for Elements<'v, 'a> {
    type Item = Cow<'v, Value<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Elements::List(iter) => iter.next().map(Cow::Borrowed),
            Elements::Array(iter) => iter.next().map(Cow::Owned),
        }
    }
}

/// Borrowed atomic integer, read with sequentially consistent ordering.
#[derive(Debug, Clone, Copy)]
pub enum Counter<'a> {
    /// 32-bit atomic counter.
    I32(&'a AtomicI32),
    /// 64-bit atomic counter.
    I64(&'a AtomicI64),
}

impl Counter<'_> {
    /// Reads the current value of the counter.
    pub fn load(self) -> Number {
        match self {
            Counter::I32(c) => Number::I32(c.load(atomic::Ordering::SeqCst)),
            Counter::I64(c) => Number::I64(c.load(atomic::Ordering::SeqCst)),
        }
    }
}

/// Homogeneous array of fixed-width primitives.
///
/// Membership tests against a numeric array convert the needle to the
/// array's element width first, so `12i64` is found in an `i8` array
/// holding `12`.
#[derive(Debug, Clone)]
pub enum Array<'a> {
    Bool(Cow<'a, [bool]>),
    Char(Cow<'a, [char]>),
    I8(Cow<'a, [i8]>),
    I16(Cow<'a, [i16]>),
    I32(Cow<'a, [i32]>),
    I64(Cow<'a, [i64]>),
    U8(Cow<'a, [u8]>),
    F32(Cow<'a, [f32]>),
    F64(Cow<'a, [f64]>),
}

impl<'a> Array<'a> {
    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        match self {
            Array::Bool(items) => items.len(),
            Array::Char(items) => items.len(),
            Array::I8(items) => items.len(),
            Array::I16(items) => items.len(),
            Array::I32(items) => items.len(),
            Array::I64(items) => items.len(),
            Array::U8(items) => items.len(),
            Array::F32(items) => items.len(),
            Array::F64(items) => items.len(),
        }
    }

    /// Returns `true` if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `index` as a value.
    pub fn get(&self, index: usize) -> Option<Value<'a>> {
        match self {
            Array::Bool(items) => items.get(index).map(|b| Value::Bool(*b)),
            Array::Char(items) => items.get(index).map(|c| Value::Char(*c)),
            Array::I8(items) => items.get(index).map(|n| Value::from(*n)),
            Array::I16(items) => items.get(index).map(|n| Value::from(*n)),
            Array::I32(items) => items.get(index).map(|n| Value::from(*n)),
            Array::I64(items) => items.get(index).map(|n| Value::from(*n)),
            Array::U8(items) => items.get(index).map(|n| Value::from(*n)),
            Array::F32(items) => items.get(index).map(|n| Value::from(*n)),
            Array::F64(items) => items.get(index).map(|n| Value::from(*n)),
        }
    }

    /// Iterates the elements as values.
    pub fn values(&self) -> ArrayValues<'_, 'a> {
        ArrayValues {
            array: self,
            index: 0,
        }
    }
}

/// Iterator over the elements of an [`Array`].
pub struct ArrayValues<'v, 'a> {
    array: &'v Array<'a>,
    index: usize,
}

impl<'a> Iterator for ArrayValues<'_, 'a> {
    type Item = Value<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.array.get(self.index)?;
        self.index += 1;
        Some(value)
    }
}

macro_rules! array_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a [$ty]> for Array<'a> {
                fn from(items: &'a [$ty]) -> Self {
                    Array::$variant(Cow::Borrowed(items))
                }
            }

            impl From<Vec<$ty>> for Array<'static> {
                fn from(items: Vec<$ty>) -> Self {
                    Array::$variant(Cow::Owned(items))
                }
            }
        )*
    };
}

array_from! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    f32 => F32,
    f64 => F64,
}

/// Opaque enum variant: its type and a stable discriminant.
///
/// Two enum values are equal when they come from the same enum type and
/// carry the same discriminant. Ordering operations order them by
/// discriminant within one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumValue {
    type_id: TypeId,
    discriminant: u32,
}

impl EnumValue {
    /// Captures an enum variant through its [`GatherEnum`] impl.
    pub fn of<E: GatherEnum>(value: &E) -> Self {
        EnumValue {
            type_id: TypeId::of::<E>(),
            discriminant: value.discriminant(),
        }
    }

    /// Returns the discriminant.
    pub fn discriminant(self) -> u32 {
        self.discriminant
    }

    /// Returns `true` if both values come from the same enum type.
    pub fn same_type(self, other: EnumValue) -> bool {
        self.type_id == other.type_id
    }
}

// Conversions from common types to Value

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Text(Cow::Borrowed(s))
    }
}

impl From<String> for Value<'_> {
    fn from(s: String) -> Self {
        Value::Text(Cow::Owned(s))
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value<'_> {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<Number> for Value<'_> {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<Regex> for Value<'_> {
    fn from(r: Regex) -> Self {
        Value::Regex(r)
    }
}

impl From<EnumValue> for Value<'_> {
    fn from(e: EnumValue) -> Self {
        Value::Enum(e)
    }
}

impl<'a> From<Array<'a>> for Value<'a> {
    fn from(array: Array<'a>) -> Self {
        Value::Array(array)
    }
}

impl<'a> From<Vec<Value<'a>>> for Value<'a> {
    fn from(items: Vec<Value<'a>>) -> Self {
        Value::List(items)
    }
}

macro_rules! value_from_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value<'_> {
                fn from(n: $ty) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

value_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, Decimal);
