//! Proc macros for Gather.
//!
//! This crate provides `#[derive(Record)]`, which exposes the fields of a
//! struct to the gather query engine. It is re-exported from `gather` under
//! the default `derive` feature; depend on `gather` rather than on this
//! crate directly.

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Record` trait for queryable structs.
///
/// Every named field is exposed under its own name and converted with
/// `AsValue`, unless annotated otherwise.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `skip` | Exclude this field from queries |
/// | `rename = "..."` | Use a custom name for queries |
/// | `nested` | Field is a `Record` (or `Option` of one), reachable with dotted paths |
/// | `parent` | Field is an embedded `RecordSchema` type (or `Option`, `Box`, `Arc` of one) whose attributes are inherited |
/// | `enumeration` | Field is an enum implementing `GatherEnum` |
///
/// # Generated Code
///
/// The macro generates:
///
/// 1. Attribute name constants (e.g., `Worker::NAME`, `Worker::IS_ACTIVE`)
/// 2. Implementation of `RecordSchema::schema()`, `Record::attributes()` and `Record::read()`
///
/// Own attributes are listed before inherited ones, so an own field
/// shadows a parent field with the same name. Inherited attributes come from
/// the parent's type, so an absent parent reads them as null.
///
/// # Example
///
/// ```ignore
/// use gather::{GatherEnum, Query, Record};
///
/// #[derive(Clone, Copy)]
/// enum Shift { Day, Night }
///
/// impl GatherEnum for Shift {
///     fn discriminant(&self) -> u32 { *self as u32 }
/// }
///
/// #[derive(Record)]
/// struct Address {
///     city: String,
/// }
///
/// #[derive(Record)]
/// struct Person {
///     name: String,
///     #[gather(nested)]
///     address: Option<Address>,
/// }
///
/// #[derive(Record)]
/// struct Worker {
///     #[gather(parent)]
///     person: Person,
///     #[gather(rename = "isActive")]
///     active: bool,
///     #[gather(enumeration)]
///     shift: Shift,
///     #[gather(skip)]
///     internal_id: u64,
/// }
///
/// let query = Query::filter("address.city").is("Pune").and(Worker::IS_ACTIVE).is(true);
/// ```
#[proc_macro_derive(Record, attributes(gather))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
