//! Gather - In-process query and aggregation engine for record collections.
//!
//! Gather filters, counts and aggregates in-memory sequences of records,
//! resolving attribute values by name at evaluation time. It supports:
//!
//! - Attribute lookup by name or dotted path through nested records
//! - Equality, ordering, null and property checks
//! - Wildcard (`?`, `*`) and full-string regex matching
//! - Membership and containment over lists and primitive arrays
//! - Numeric comparison across integer, float and decimal widths
//! - Streaming aggregates: count, unique, sum, min, max, average
//!
//! # Quick Start
//!
//! ```rust
//! use gather::{Aggregate, Domain, Number, Query, Record};
//!
//! #[derive(Record)]
//! struct Worker {
//!     name: String,
//!     age: u32,
//!     active: bool,
//!     salary: u32,
//! }
//!
//! let workers = vec![
//!     Worker { name: "Sandeep Gupta".into(), age: 36, active: true, salary: 40 },
//!     Worker { name: "Abhishek Gupta".into(), age: 32, active: true, salary: 50 },
//!     Worker { name: "Amit Modi".into(), age: 36, active: false, salary: 50 },
//!     Worker { name: "Sushant Gupta".into(), age: 46, active: false, salary: 70 },
//! ];
//!
//! let guptas = Query::filter("name").like("*Gupta");
//! assert_eq!(guptas.count(&workers), 3);
//!
//! let inactive = Query::filter("salary").greater_than_or_equals(50).and("active").is(false);
//! assert_eq!(inactive.find(&workers).len(), 2);
//!
//! let total = Aggregate::Sum(Domain::Integral).run(&workers, "age").unwrap();
//! assert_eq!(total, Some(Number::I64(150)));
//! ```
//!
//! # Query Semantics
//!
//! A query is an ordered list of criteria folded left to right, starting
//! from `false`:
//!
//! ```text
//! acc = false
//! for each criterion c:
//!     r   = c.evaluate(record), negated if c is inverted
//!     acc = acc OR r    (c joins with OR)
//!     acc = acc AND r   (c joins with AND)
//! ```
//!
//! There is no precedence and no short-circuit. An empty query matches
//! every record; a null record matches nothing.
//!
//! # Operations
//!
//! | Operation | Matches when |
//! |-----------|--------------|
//! | `Equals`, `EqualsIgnoreCase` | value equals the literal |
//! | `IsNull` | value is null or the attribute is missing |
//! | `HasProperty` | the attribute exists |
//! | `WildcardMatch`, `RegexMatch` | value text matches the pattern |
//! | `LessThan` .. `GreaterThanOrEquals` | value orders against the literal |
//! | `In` | value is an element of the literal |
//! | `CollectionHasValue` / `AllValues` / `AnyValue` | literal elements are in the value |

mod aggregate;
pub mod contains;
mod criterion;
mod error;
mod number;
mod op;
pub mod ordering;
pub mod pattern;
mod query;
mod record;
mod resolve;
mod value;

// Re-export public API
pub use aggregate::{
    aggregate, distinct, Aggregate, Average, Count, Distinct, Domain, Max, Min, Numeric, Reducer,
    Sum, Unique,
};
pub use criterion::Criterion;
pub use error::{GatherError, Result};
pub use number::{compare_numbers, Number};
pub use op::{Join, Op};
pub use query::{Clause, Query};
pub use record::{AsValue, Attribute, GatherEnum, Location, Record, RecordSchema, RecordType};
pub use resolve::{has_attribute, resolve};
pub use value::{Array, ArrayValues, Counter, Elements, EnumValue, Value};

#[cfg(feature = "derive")]
pub use gather_macros::Record;
