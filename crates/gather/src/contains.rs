//! Membership tests over lists and primitive arrays.

use crate::value::{Array, Value};

/// Returns `true` if `container` holds an element equal to `needle`.
///
/// Lists compare elements with [`Value`] equality. Numeric arrays first
/// convert a number-like needle to the array's element width, truncating as
/// needed. Boolean and character arrays only hold needles of their own kind.
/// A null needle, or a container that is not list-like, never matches.
///
/// ```
/// use gather::contains::contains;
/// use gather::{Array, Value};
///
/// let ages = Value::from(Array::from(vec![12i8, 36]));
/// assert!(contains(&ages, &Value::from(36i64)));
/// assert!(contains(&ages, &Value::from(36.9f64)));
/// assert!(!contains(&ages, &Value::from("36")));
/// ```
pub fn contains(container: &Value<'_>, needle: &Value<'_>) -> bool {
    if needle.is_null() {
        return false;
    }
    match container {
        Value::List(items) => items.iter().any(|item| item == needle),
        Value::Array(array) => array_contains(array, needle),
        _ => false,
    }
}

fn array_contains(array: &Array<'_>, needle: &Value<'_>) -> bool {
    match array {
        Array::Bool(items) => needle.as_bool().is_some_and(|b| items.contains(&b)),
        Array::Char(items) => matches!(needle, Value::Char(c) if items.contains(c)),
        numeric => {
            let Some(n) = needle.as_number() else {
                return false;
            };
            match numeric {
                Array::I8(items) => items.contains(&(n.to_i64() as i8)),
                Array::I16(items) => items.contains(&(n.to_i64() as i16)),
                Array::I32(items) => items.contains(&(n.to_i64() as i32)),
                Array::I64(items) => items.contains(&n.to_i64()),
                Array::U8(items) => items.contains(&(n.to_i64() as u8)),
                Array::F32(items) => items.contains(&(n.to_f64() as f32)),
                Array::F64(items) => items.contains(&n.to_f64()),
                Array::Bool(_) | Array::Char(_) => false,
            }
        }
    }
}

/// Tests a container against every element of `values`.
///
/// With `require_all` the result is `true` only if the container holds each
/// element; otherwise it is `true` if the container holds at least one.
/// Every element is tested. An empty or absent container, and a `values`
/// argument that is absent or not list-like, yield `false`. An empty
/// `values` list yields `require_all`.
///
/// ```
/// use gather::contains::contains_all_or_any;
/// use gather::Value;
///
/// let tags = Value::list(["rust", "query"]);
/// assert!(contains_all_or_any(&tags, &Value::list(["rust"]), true));
/// assert!(!contains_all_or_any(&tags, &Value::list(["rust", "java"]), true));
/// assert!(contains_all_or_any(&tags, &Value::list(["rust", "java"]), false));
/// ```
pub fn contains_all_or_any(container: &Value<'_>, values: &Value<'_>, require_all: bool) -> bool {
    let populated = match container {
        Value::List(items) => !items.is_empty(),
        Value::Array(array) => !array.is_empty(),
        _ => false,
    };
    if !populated {
        return false;
    }

    let Some(required) = values.elements() else {
        return false;
    };
    required.fold(require_all, |result, item| {
        let found = contains(container, &item);
        if require_all {
            result & found
        } else {
            result | found
        }
    })
}
