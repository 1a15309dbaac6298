//! Attribute resolution by name or dotted path.
//!
//! The attributes of each record type are indexed once, on first use, and
//! the index is shared by every later lookup on that type from any thread.

use std::any::TypeId;
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::record::{Location, Record};
use crate::value::Value;

static ATTRIBUTE_INDEX: Lazy<RwLock<HashMap<TypeId, Arc<AttributeIndex>>>> =
    Lazy::new(Default::default);

/// Name to location map for one record type.
#[derive(Debug, Default)]
struct AttributeIndex {
    locations: HashMap<Cow<'static, str>, Location>,
}

impl AttributeIndex {
    fn build<R: Record + ?Sized>(record: &R) -> Self {
        let mut locations = HashMap::new();
        for attribute in record.attributes() {
            let (name, location) = attribute.into_parts();
            locations.entry(name).or_insert(location);
        }
        AttributeIndex { locations }
    }

    fn get(&self, name: &str) -> Option<&[usize]> {
        self.locations.get(name).map(Vec::as_slice)
    }
}

fn index_for<R: Record + ?Sized>(record: &R) -> Arc<AttributeIndex> {
    let record_type = record.record_type();
    let cached = ATTRIBUTE_INDEX
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&record_type.id())
        .cloned();
    if let Some(index) = cached {
        return index;
    }

    let index = Arc::new(AttributeIndex::build(record));
    tracing::debug!(
        record_type = record_type.name(),
        attributes = index.locations.len(),
        "indexed record attributes"
    );
    let mut cache = ATTRIBUTE_INDEX
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    // another thread may have indexed the type meanwhile; both are identical
    Arc::clone(cache.entry(record_type.id()).or_insert(index))
}

/// Looks up a plain attribute name on a record.
fn resolve_attribute<'a, R: Record + ?Sized>(record: &'a R, name: &str) -> Option<Value<'a>> {
    if record.is_null() || name.is_empty() {
        return None;
    }
    let index = index_for(record);
    let location = index.get(name)?;
    let value = record.read(location);
    if value.is_none() {
        tracing::warn!(
            record_type = record.record_type().name(),
            attribute = name,
            ?location,
            "listed attribute could not be read"
        );
    }
    value
}

/// Resolves an attribute name or dotted path against a record.
///
/// Returns `None` when the attribute does not exist, which is distinct from
/// `Some(Value::Null)` for an attribute holding no value. A dotted path such
/// as `"address.city"` descends through nested records; if any intermediate
/// attribute is missing, null, or not a record, the whole path is missing.
///
/// # Example
///
/// ```
/// use gather::{resolve, AsValue, Attribute, Record, Value};
///
/// struct City {
///     name: String,
/// }
///
/// impl Record for City {
///     fn attributes(&self) -> Vec<Attribute> {
///         vec![Attribute::field("name", 0)]
///     }
///
///     fn read(&self, location: &[usize]) -> Option<Value<'_>> {
///         match location {
///             [0] => Some(self.name.as_value()),
///             _ => None,
///         }
///     }
/// }
///
/// struct Office {
///     city: City,
/// }
///
/// impl Record for Office {
///     fn attributes(&self) -> Vec<Attribute> {
///         vec![Attribute::field("city", 0)]
///     }
///
///     fn read(&self, location: &[usize]) -> Option<Value<'_>> {
///         match location {
///             [0] => Some(Value::from_record(&self.city)),
///             _ => None,
///         }
///     }
/// }
///
/// let office = Office { city: City { name: "Pune".into() } };
/// assert_eq!(resolve(&office, "city.name"), Some(Value::from("Pune")));
/// assert_eq!(resolve(&office, "city.zip"), None);
/// ```
pub fn resolve<'a, R: Record + ?Sized>(record: &'a R, path: &str) -> Option<Value<'a>> {
    if path.trim().is_empty() {
        return None;
    }

    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = resolve_attribute(record, first)?;
    for segment in segments {
        let nested = current.as_record()?;
        current = resolve_attribute(nested, segment)?;
    }
    Some(current)
}

/// Returns `true` if the record has the attribute, whatever its value.
pub fn has_attribute<R: Record + ?Sized>(record: &R, path: &str) -> bool {
    resolve(record, path).is_some()
}

#[cfg(test)]
pub(crate) fn is_indexed(id: TypeId) -> bool {
    ATTRIBUTE_INDEX
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .contains_key(&id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{AsValue, Attribute, RecordSchema, RecordType};

    struct Address {
        city: String,
        zip: Option<String>,
    }

    impl Record for Address {
        fn attributes(&self) -> Vec<Attribute> {
            vec![Attribute::field("city", 0), Attribute::field("zip", 1)]
        }

        fn read(&self, location: &[usize]) -> Option<Value<'_>> {
            match location {
                [0] => Some(self.city.as_value()),
                [1] => Some(self.zip.as_value()),
                _ => None,
            }
        }
    }

    struct Person {
        name: String,
        address: Option<Address>,
    }

    impl RecordSchema for Person {
        fn schema() -> Vec<Attribute> {
            vec![Attribute::field("name", 0), Attribute::field("address", 1)]
        }
    }

    impl Record for Person {
        fn attributes(&self) -> Vec<Attribute> {
            Self::schema()
        }

        fn read(&self, location: &[usize]) -> Option<Value<'_>> {
            match location {
                [0] => Some(self.name.as_value()),
                [1] => Some(Value::from_record(&self.address)),
                _ => None,
            }
        }
    }

    struct Employee {
        name: String,
        person: Person,
    }

    impl Record for Employee {
        fn attributes(&self) -> Vec<Attribute> {
            let mut attributes = vec![Attribute::field("name", 0)];
            attributes.extend(Person::schema().into_iter().map(|a| a.inherited(1)));
            attributes
        }

        fn read(&self, location: &[usize]) -> Option<Value<'_>> {
            match location {
                [0] => Some(self.name.as_value()),
                [1, rest @ ..] => self.person.read(rest),
                _ => None,
            }
        }
    }

    fn person(address: Option<Address>) -> Person {
        Person {
            name: "Sandeep Gupta".into(),
            address,
        }
    }

    #[test]
    fn resolves_plain_attributes() {
        let p = person(None);
        assert_eq!(resolve(&p, "name"), Some(Value::from("Sandeep Gupta")));
        assert_eq!(resolve(&p, "salary"), None);
        assert!(is_indexed(RecordType::of::<Person>().id()));
    }

    #[test]
    fn blank_paths_are_not_found() {
        let p = person(None);
        assert_eq!(resolve(&p, ""), None);
        assert_eq!(resolve(&p, "   "), None);
        assert_eq!(resolve(&p, "name."), None);
        assert_eq!(resolve(&p, ".name"), None);
    }

    #[test]
    fn null_nested_record_is_null_but_present() {
        let p = person(None);
        assert_eq!(resolve(&p, "address"), Some(Value::Null));
        assert!(has_attribute(&p, "address"));
        assert_eq!(resolve(&p, "address.city"), None);
    }

    #[test]
    fn dotted_paths_descend() {
        let p = person(Some(Address {
            city: "Pune".into(),
            zip: None,
        }));
        assert_eq!(resolve(&p, "address.city"), Some(Value::from("Pune")));
        assert_eq!(resolve(&p, "address.zip"), Some(Value::Null));
        assert_eq!(resolve(&p, "address.street"), None);
        // text is not a record
        assert_eq!(resolve(&p, "name.length"), None);
    }

    #[test]
    fn inherited_attributes_resolve_and_own_attributes_win() {
        let e = Employee {
            name: "Employee".into(),
            person: person(Some(Address {
                city: "Delhi".into(),
                zip: Some("110001".into()),
            })),
        };
        assert_eq!(resolve(&e, "name"), Some(Value::from("Employee")));
        assert_eq!(resolve(&e, "address.zip"), Some(Value::from("110001")));
    }

    struct Contractor {
        agency: &'static str,
        person: Option<Person>,
    }

    impl Record for Contractor {
        fn attributes(&self) -> Vec<Attribute> {
            let mut attributes = vec![Attribute::field("agency", 0)];
            attributes.extend(
                <Option<Person>>::schema()
                    .into_iter()
                    .map(|a| a.inherited(1)),
            );
            attributes
        }

        fn read(&self, location: &[usize]) -> Option<Value<'_>> {
            match location {
                [0] => Some(self.agency.as_value()),
                [1, rest @ ..] => self.person.read(rest),
                _ => None,
            }
        }
    }

    #[test]
    fn absent_parent_is_indexed_from_its_type() {
        let absent = Contractor {
            agency: "Acme",
            person: None,
        };
        let present = Contractor {
            agency: "Acme",
            person: Some(person(None)),
        };
        // index the type through the record lacking a parent
        assert_eq!(resolve(&absent, "name"), Some(Value::Null));
        assert_eq!(resolve(&present, "name"), Some(Value::from("Sandeep Gupta")));
        assert_eq!(resolve(&absent, "address.city"), None);
    }

    #[test]
    fn null_record_has_no_attributes() {
        let absent: Option<Person> = None;
        assert_eq!(resolve(&absent, "name"), None);
        assert!(!has_attribute(&absent, "name"));
    }

    #[test]
    fn concurrent_first_use_is_safe() {
        let people: Vec<Person> = (0..8).map(|_| person(None)).collect();
        std::thread::scope(|scope| {
            for p in &people {
                scope.spawn(move || {
                    assert_eq!(resolve(p, "name"), Some(Value::from("Sandeep Gupta")));
                });
            }
        });
    }
}
