//! Natural ordering between a resolved value and a literal.

use std::cmp::Ordering;

use crate::number::compare_numbers;
use crate::value::Value;

/// Compares a resolved attribute value against a literal.
///
/// Text, characters and booleans use their natural order. Enum values of
/// the same type order by discriminant. Number-like values (plain numbers
/// and counters) compare in the literal's numeric domain, see
/// [`compare_numbers`].
///
/// Returns `None` if the two values have no common ordering.
///
/// ```
/// use std::cmp::Ordering;
/// use gather::ordering::natural_cmp;
/// use gather::Value;
///
/// assert_eq!(natural_cmp(&Value::from(46u32), &Value::from(40i64)), Some(Ordering::Greater));
/// assert_eq!(natural_cmp(&Value::from("Amit"), &Value::from("Sushant")), Some(Ordering::Less));
/// assert_eq!(natural_cmp(&Value::from("46"), &Value::from(40i64)), None);
/// ```
pub fn natural_cmp(field: &Value<'_>, literal: &Value<'_>) -> Option<Ordering> {
    match (field, literal) {
        (Value::Text(a), Value::Text(b)) => Some(a.as_ref().cmp(b.as_ref())),
        (Value::Char(a), Value::Char(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Enum(a), Value::Enum(b)) if a.same_type(*b) => {
            Some(a.discriminant().cmp(&b.discriminant()))
        }
        _ => compare_numbers(field, literal).ok(),
    }
}
