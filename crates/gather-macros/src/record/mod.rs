//! Implementation of the `#[derive(Record)]` macro.
//!
//! This module generates `Record` impls and attribute name constants from
//! struct definitions and their `#[gather(...)]` field annotations.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
