//! Traits for derive macro support.
//!
//! This module provides the [`Record`] trait, implemented by
//! `#[derive(Record)]`, which lists a type's attributes and reads them back
//! by location, [`RecordSchema`] for the same list without an instance, and
//! the [`AsValue`] trait that turns field types into [`Value`]s.

use std::any::{type_name, TypeId};
use std::borrow::Cow;
use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicI32, AtomicI64};
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::number::Number;
use crate::value::{Array, Counter, Value};

/// Trait for types that can be queried and aggregated.
///
/// A record exposes its attributes in two steps. [`attributes`] lists every
/// attribute name together with a [`Location`] describing where it lives,
/// and [`read`] produces the value at such a location. The attribute list of
/// a type is computed once and cached, so it must not depend on the
/// instance. Types with a fixed schema also implement [`RecordSchema`] and
/// return it from [`attributes`]; the derive generates both.
///
/// This trait is typically derived using `#[derive(Record)]`, but can also
/// be implemented manually.
///
/// # Derive Usage
///
/// ```
/// use gather::{Query, Record};
///
/// #[derive(Record)]
/// struct Worker {
///     name: String,
///     age: u32,
///     #[gather(rename = "isActive")]
///     active: bool,
/// }
///
/// let workers = vec![
///     Worker { name: "Sandeep Gupta".into(), age: 36, active: true },
///     Worker { name: "Amit Modi".into(), age: 36, active: false },
/// ];
///
/// let query = Query::filter(Worker::AGE).is(36).and("isActive").is(true);
/// assert_eq!(query.count(&workers), 1);
/// ```
///
/// # Manual Implementation
///
/// ```
/// use gather::{AsValue, Attribute, Record, RecordSchema, Value};
///
/// struct Task {
///     title: String,
///     priority: u8,
/// }
///
/// impl RecordSchema for Task {
///     fn schema() -> Vec<Attribute> {
///         vec![Attribute::field("title", 0), Attribute::field("priority", 1)]
///     }
/// }
///
/// impl Record for Task {
///     fn attributes(&self) -> Vec<Attribute> {
///         Self::schema()
///     }
///
///     fn read(&self, location: &[usize]) -> Option<Value<'_>> {
///         match location {
///             [0] => Some(self.title.as_value()),
///             [1] => Some(self.priority.as_value()),
///             _ => None,
///         }
///     }
/// }
/// ```
///
/// [`attributes`]: Record::attributes
/// [`read`]: Record::read
pub trait Record: Sync + 'static {
    /// Lists the attributes of this record type.
    ///
    /// Attributes inherited from an embedded parent come after the type's
    /// own attributes. When two attributes share a name, the first one
    /// listed wins.
    fn attributes(&self) -> Vec<Attribute>;

    /// Reads the attribute at `location`.
    ///
    /// Returns `None` if the location does not belong to this type.
    fn read(&self, location: &[usize]) -> Option<Value<'_>>;

    /// Identifies the concrete record type, used as the attribute cache key.
    fn record_type(&self) -> RecordType {
        RecordType::of::<Self>()
    }

    /// Returns `true` for an absent record. Absent records never match a
    /// query and have no attributes.
    fn is_null(&self) -> bool {
        false
    }
}

/// The attribute list of a record type, known without an instance.
///
/// Embedded parents are flattened through this trait, so a parent that is
/// absent in one record still contributes its attributes to the type.
/// `Option`, `Box` and `Arc` forward to the wrapped type.
pub trait RecordSchema: Record + Sized {
    /// Lists the attributes of this type, own ones first.
    fn schema() -> Vec<Attribute>;
}

/// Identity of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordType {
    id: TypeId,
    name: &'static str,
}

impl RecordType {
    /// Returns the identity of `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        RecordType {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// The type's unique id.
    pub fn id(self) -> TypeId {
        self.id
    }

    /// The type's name, for diagnostics.
    pub fn name(self) -> &'static str {
        self.name
    }
}

/// Path of slots leading from a record to one of its attributes.
///
/// An own field has a single slot. A field inherited from an embedded
/// parent is prefixed with the slot of that parent.
pub type Location = Vec<usize>;

/// A named, readable attribute of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: Cow<'static, str>,
    location: Location,
}

impl Attribute {
    /// An own attribute stored in `slot`.
    pub fn field(name: impl Into<Cow<'static, str>>, slot: usize) -> Self {
        Attribute {
            name: name.into(),
            location: vec![slot],
        }
    }

    /// Re-roots this attribute under the parent stored in `slot`.
    pub fn inherited(mut self, slot: usize) -> Self {
        self.location.insert(0, slot);
        self
    }

    /// The attribute's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the attribute lives.
    pub fn location(&self) -> &[usize] {
        &self.location
    }

    pub(crate) fn into_parts(self) -> (Cow<'static, str>, Location) {
        (self.name, self.location)
    }
}

/// Enum types usable as attribute values.
///
/// Enum attributes support equality and, within one enum type, ordering by
/// discriminant. Derive code uses this through `#[gather(enumeration)]`.
///
/// ```
/// use gather::{EnumValue, GatherEnum};
///
/// #[derive(Clone, Copy)]
/// enum Shift {
///     Day,
///     Night,
/// }
///
/// impl GatherEnum for Shift {
///     fn discriminant(&self) -> u32 {
///         *self as u32
///     }
/// }
///
/// assert_ne!(EnumValue::of(&Shift::Day), EnumValue::of(&Shift::Night));
/// ```
pub trait GatherEnum: 'static {
    /// Stable discriminant of this variant.
    fn discriminant(&self) -> u32;
}

// Absent and shared records

impl<T: Record> Record for Option<T> {
    fn attributes(&self) -> Vec<Attribute> {
        self.as_ref().map(Record::attributes).unwrap_or_default()
    }

    /// An absent record reads every attribute as null.
    fn read(&self, location: &[usize]) -> Option<Value<'_>> {
        match self {
            Some(record) => record.read(location),
            None => Some(Value::Null),
        }
    }

    fn record_type(&self) -> RecordType {
        match self {
            Some(record) => record.record_type(),
            None => RecordType::of::<Self>(),
        }
    }

    fn is_null(&self) -> bool {
        self.as_ref().map_or(true, Record::is_null)
    }
}

impl<T: RecordSchema> RecordSchema for Option<T> {
    fn schema() -> Vec<Attribute> {
        T::schema()
    }
}

impl<T: RecordSchema> RecordSchema for Box<T> {
    fn schema() -> Vec<Attribute> {
        T::schema()
    }
}

impl<T: RecordSchema + Send> RecordSchema for Arc<T> {
    fn schema() -> Vec<Attribute> {
        T::schema()
    }
}

impl<T: Record + ?Sized> Record for Box<T> {
    fn attributes(&self) -> Vec<Attribute> {
        (**self).attributes()
    }

    fn read(&self, location: &[usize]) -> Option<Value<'_>> {
        (**self).read(location)
    }

    fn record_type(&self) -> RecordType {
        (**self).record_type()
    }

    fn is_null(&self) -> bool {
        (**self).is_null()
    }
}

impl<T: Record + Send + ?Sized> Record for Arc<T> {
    fn attributes(&self) -> Vec<Attribute> {
        (**self).attributes()
    }

    fn read(&self, location: &[usize]) -> Option<Value<'_>> {
        (**self).read(location)
    }

    fn record_type(&self) -> RecordType {
        (**self).record_type()
    }

    fn is_null(&self) -> bool {
        (**self).is_null()
    }
}

/// Conversion of a field into a [`Value`] borrowing from it.
pub trait AsValue {
    /// Returns the field's value.
    fn as_value(&self) -> Value<'_>;
}

macro_rules! as_number_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl AsValue for $ty {
                fn as_value(&self) -> Value<'_> {
                    Value::Number(Number::from(*self))
                }
            }
        )*
    };
}

as_number_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, Decimal);

macro_rules! as_array_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<const N: usize> AsValue for [$ty; N] {
                fn as_value(&self) -> Value<'_> {
                    Value::Array(Array::from(&self[..]))
                }
            }
        )*
    };
}

as_array_value!(bool, char, i8, i16, i32, i64, u8, f32, f64);

impl AsValue for bool {
    fn as_value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl AsValue for char {
    fn as_value(&self) -> Value<'_> {
        Value::Char(*self)
    }
}

impl AsValue for str {
    fn as_value(&self) -> Value<'_> {
        Value::Text(Cow::Borrowed(self))
    }
}

impl AsValue for String {
    fn as_value(&self) -> Value<'_> {
        Value::Text(Cow::Borrowed(self.as_str()))
    }
}

impl AsValue for Cow<'_, str> {
    fn as_value(&self) -> Value<'_> {
        Value::Text(Cow::Borrowed(self.as_ref()))
    }
}

impl AsValue for AtomicI32 {
    fn as_value(&self) -> Value<'_> {
        Value::Counter(Counter::I32(self))
    }
}

impl AsValue for AtomicI64 {
    fn as_value(&self) -> Value<'_> {
        Value::Counter(Counter::I64(self))
    }
}

impl AsValue for Value<'_> {
    fn as_value(&self) -> Value<'_> {
        self.clone()
    }
}

impl<T: AsValue + ?Sized> AsValue for &T {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: AsValue + ?Sized> AsValue for Box<T> {
    fn as_value(&self) -> Value<'_> {
        (**self).as_value()
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(&self) -> Value<'_> {
        self.as_ref().map_or(Value::Null, AsValue::as_value)
    }
}

impl<T: AsValue> AsValue for [T] {
    fn as_value(&self) -> Value<'_> {
        Value::List(self.iter().map(AsValue::as_value).collect())
    }
}

impl<T: AsValue> AsValue for Vec<T> {
    fn as_value(&self) -> Value<'_> {
        self.as_slice().as_value()
    }
}

impl<T: AsValue, S> AsValue for HashSet<T, S> {
    fn as_value(&self) -> Value<'_> {
        Value::List(self.iter().map(AsValue::as_value).collect())
    }
}

impl<T: AsValue> AsValue for BTreeSet<T> {
    fn as_value(&self) -> Value<'_> {
        Value::List(self.iter().map(AsValue::as_value).collect())
    }
}
