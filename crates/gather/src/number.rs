//! Numeric sub-kinds and the coercion rules between them.
//!
//! Record fields and literals keep the width they were declared with, so a
//! [`Number`] remembers whether it came from an `i8`, an `f32`, a
//! [`Decimal`] and so on. Two different comparisons are built on top:
//!
//! - **Exact** comparison ([`Number::compare`], `PartialEq`), used for
//!   equality, membership and distinct-value tracking. Values compare by
//!   their mathematical value regardless of sub-kind.
//! - **Literal-domain** comparison ([`compare_numbers`]), used by the
//!   ordering operations. The field value is first converted into the
//!   literal's sub-kind, narrowing with truncation where needed, and then
//!   compared in that domain.

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::error::{GatherError, Result};
use crate::value::Value;

/// Numeric value tagged with the sub-kind it was produced from.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    /// 8-bit signed integer.
    I8(i8),
    /// 16-bit signed integer.
    I16(i16),
    /// 32-bit signed integer.
    I32(i32),
    /// 64-bit signed integer.
    I64(i64),
    /// Unsigned integer of any width.
    U64(u64),
    /// 32-bit floating point.
    F32(f32),
    /// 64-bit floating point.
    F64(f64),
    /// Arbitrary-precision decimal.
    Decimal(Decimal),
}

impl Number {
    /// Returns the name of this number's sub-kind.
    pub fn kind(self) -> &'static str {
        match self {
            Number::I8(_) => "i8",
            Number::I16(_) => "i16",
            Number::I32(_) => "i32",
            Number::I64(_) => "i64",
            Number::U64(_) => "u64",
            Number::F32(_) => "f32",
            Number::F64(_) => "f64",
            Number::Decimal(_) => "decimal",
        }
    }

    /// Returns `true` for the fixed-width integer sub-kinds.
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            Number::I8(_) | Number::I16(_) | Number::I32(_) | Number::I64(_) | Number::U64(_)
        )
    }

    /// Converts to `i64`, truncating any fractional part.
    ///
    /// Floats saturate at the `i64` bounds and NaN becomes `0`; decimals
    /// truncate toward zero and saturate the same way.
    pub fn to_i64(self) -> i64 {
        match self {
            Number::I8(n) => n as i64,
            Number::I16(n) => n as i64,
            Number::I32(n) => n as i64,
            Number::I64(n) => n,
            Number::U64(n) => n as i64,
            Number::F32(n) => n as i64,
            Number::F64(n) => n as i64,
            Number::Decimal(d) => d.trunc().to_i64().unwrap_or(if d.is_sign_negative() {
                i64::MIN
            } else {
                i64::MAX
            }),
        }
    }

    /// Converts to `u64`, truncating any fractional part.
    pub fn to_u64(self) -> u64 {
        match self {
            Number::U64(n) => n,
            Number::F32(n) => n as u64,
            Number::F64(n) => n as u64,
            Number::Decimal(d) => d.trunc().to_u64().unwrap_or(if d.is_sign_negative() {
                0
            } else {
                u64::MAX
            }),
            other => other.to_i64() as u64,
        }
    }

    /// Converts to `f64`, widening integers.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I8(n) => n as f64,
            Number::I16(n) => n as f64,
            Number::I32(n) => n as f64,
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F32(n) => n as f64,
            Number::F64(n) => n,
            Number::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
        }
    }

    /// Converts to a [`Decimal`].
    ///
    /// Returns `None` for NaN, infinite or out-of-range floats.
    pub fn to_decimal(self) -> Option<Decimal> {
        match self {
            Number::I8(n) => Some(Decimal::from(n)),
            Number::I16(n) => Some(Decimal::from(n)),
            Number::I32(n) => Some(Decimal::from(n)),
            Number::I64(n) => Some(Decimal::from(n)),
            Number::U64(n) => Some(Decimal::from(n)),
            Number::F32(n) => Decimal::from_f32(n),
            Number::F64(n) => Decimal::from_f64(n),
            Number::Decimal(d) => Some(d),
        }
    }

    /// Returns the exact integral value, if this number has no fractional part.
    pub fn to_i128_exact(self) -> Option<i128> {
        match self {
            Number::I8(n) => Some(n as i128),
            Number::I16(n) => Some(n as i128),
            Number::I32(n) => Some(n as i128),
            Number::I64(n) => Some(n as i128),
            Number::U64(n) => Some(n as i128),
            Number::F32(n) => float_to_i128(n as f64),
            Number::F64(n) => float_to_i128(n),
            Number::Decimal(d) if d.fract().is_zero() => d.to_i128(),
            Number::Decimal(_) => None,
        }
    }

    /// Compares two numbers by their exact value, whatever their sub-kinds.
    ///
    /// Returns `None` only when a NaN is involved.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        if self.is_integral() && other.is_integral() {
            return Some(self.to_i128_exact().cmp(&other.to_i128_exact()));
        }

        if matches!(self, Number::Decimal(_)) || matches!(other, Number::Decimal(_)) {
            if let (Some(a), Some(b)) = (self.to_decimal(), other.to_decimal()) {
                return Some(a.cmp(&b));
            }
        }

        self.to_f64().partial_cmp(&other.to_f64())
    }

    /// Compares `self` against `literal` inside the literal's sub-kind.
    ///
    /// `self` is narrowed or widened into the literal's representation
    /// first: `Number::I64(300).compare_as(Number::I8(44))` compares
    /// `300 as i8 == 44` and yields `Equal`. Floats use total ordering.
    pub fn compare_as(self, literal: Number) -> Result<Ordering> {
        let ordering = match literal {
            Number::I8(b) => (self.to_i64() as i8).cmp(&b),
            Number::I16(b) => (self.to_i64() as i16).cmp(&b),
            Number::I32(b) => (self.to_i64() as i32).cmp(&b),
            Number::I64(b) => self.to_i64().cmp(&b),
            Number::U64(b) => self.to_u64().cmp(&b),
            Number::F32(b) => (self.to_f64() as f32).total_cmp(&b),
            Number::F64(b) => self.to_f64().total_cmp(&b),
            Number::Decimal(b) => {
                let a = self.to_decimal().ok_or(GatherError::Incomparable {
                    field: self.kind(),
                    literal: literal.kind(),
                })?;
                a.cmp(&b)
            }
        };
        Ok(ordering)
    }
}

fn float_to_i128(n: f64) -> Option<i128> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1.0e38 {
        Some(n as i128)
    } else {
        None
    }
}

/// Compares a field value against a literal in the literal's numeric domain.
///
/// Both sides must be number-like (see [`Value::as_number`]); atomic
/// counters are read before comparing.
///
/// # Errors
///
/// - [`GatherError::NotNumeric`] if either side is not number-like.
/// - [`GatherError::Incomparable`] if the field cannot be represented in
///   the literal's sub-kind (a NaN or infinite float against a decimal).
pub fn compare_numbers(field: &Value<'_>, literal: &Value<'_>) -> Result<Ordering> {
    let lhs = field
        .as_number()
        .ok_or(GatherError::NotNumeric { kind: field.kind() })?;
    let rhs = literal
        .as_number()
        .ok_or(GatherError::NotNumeric {
            kind: literal.kind(),
        })?;
    lhs.compare_as(rhs)
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.compare(*other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I8(n) => write!(f, "{}", n),
            Number::I16(n) => write!(f, "{}", n),
            Number::I32(n) => write!(f, "{}", n),
            Number::I64(n) => write!(f, "{}", n),
            Number::U64(n) => write!(f, "{}", n),
            Number::F32(n) => write!(f, "{}", n),
            Number::F64(n) => write!(f, "{}", n),
            Number::Decimal(d) => write!(f, "{}", d),
        }
    }
}

// Conversions from primitive types
impl From<i8> for Number {
    fn from(n: i8) -> Self {
        Number::I8(n)
    }
}

impl From<i16> for Number {
    fn from(n: i16) -> Self {
        Number::I16(n)
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::I32(n)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::I64(n)
    }
}

impl From<isize> for Number {
    fn from(n: isize) -> Self {
        Number::I64(n as i64)
    }
}

impl From<u8> for Number {
    fn from(n: u8) -> Self {
        Number::U64(n as u64)
    }
}

impl From<u16> for Number {
    fn from(n: u16) -> Self {
        Number::U64(n as u64)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::U64(n as u64)
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::U64(n)
    }
}

impl From<usize> for Number {
    fn from(n: usize) -> Self {
        Number::U64(n as u64)
    }
}

impl From<f32> for Number {
    fn from(n: f32) -> Self {
        Number::F32(n)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::F64(n)
    }
}

impl From<Decimal> for Number {
    fn from(d: Decimal) -> Self {
        Number::Decimal(d)
    }
}
