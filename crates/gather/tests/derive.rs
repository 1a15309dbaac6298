//! Queries over derived records: nesting, inheritance, renaming and the
//! less common field kinds.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use gather::{
    has_attribute, resolve, Aggregate, Domain, EnumValue, GatherEnum, Number, Query, Record,
    Value,
};
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Shift {
    Day,
    Evening,
    Night,
}

impl GatherEnum for Shift {
    fn discriminant(&self) -> u32 {
        *self as u32
    }
}

#[derive(Debug, Clone, Copy)]
enum Grade {
    Junior,
}

impl GatherEnum for Grade {
    fn discriminant(&self) -> u32 {
        *self as u32
    }
}

#[derive(Record)]
struct Address {
    city: String,
    pin: u32,
}

#[derive(Record)]
struct Person {
    name: String,
    nickname: Option<String>,
    #[gather(nested)]
    address: Option<Address>,
}

#[derive(Record)]
struct Employee {
    #[gather(parent)]
    person: Person,
    #[gather(rename = "isActive")]
    active: bool,
    #[gather(enumeration)]
    shift: Shift,
    #[gather(skip)]
    #[allow(dead_code)]
    badge: u64,
    salary: Decimal,
    tags: BTreeSet<String>,
    ratings: [f32; 3],
    initials: [char; 2],
    logins: AtomicI64,
}

fn employee(name: &str, city: Option<&str>, active: bool, shift: Shift, salary: i64) -> Employee {
    let initials: Vec<char> = name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .collect();
    Employee {
        person: Person {
            name: name.to_string(),
            nickname: None,
            address: city.map(|city| Address {
                city: city.to_string(),
                pin: 411_001,
            }),
        },
        active,
        shift,
        badge: 7,
        salary: Decimal::new(salary, 2),
        tags: ["rust", "ops"].into_iter().map(String::from).collect(),
        ratings: [4.5, 3.0, 5.0],
        initials: [initials[0], initials[1]],
        logins: AtomicI64::new(0),
    }
}

fn staff() -> Vec<Employee> {
    vec![
        employee("Sandeep Gupta", Some("Pune"), true, Shift::Day, 4_000_050),
        employee("Abhishek Gupta", Some("Delhi"), true, Shift::Night, 5_000_000),
        employee("Amit Modi", None, false, Shift::Evening, 5_000_000),
    ]
}

// ============================================================================
// Generated constants
// ============================================================================

#[test]
fn constants_follow_query_names() {
    assert_eq!(Employee::IS_ACTIVE, "isActive");
    assert_eq!(Employee::SHIFT, "shift");
    assert_eq!(Person::NICKNAME, "nickname");
    assert_eq!(Address::PIN, "pin");
}

// ============================================================================
// Attribute discovery
// ============================================================================

#[test]
fn skipped_and_renamed_fields() {
    let staff = staff();
    assert!(!has_attribute(&staff[0], "badge"));
    assert!(!has_attribute(&staff[0], "active"));
    assert!(has_attribute(&staff[0], "isActive"));
    assert_eq!(Query::has_property("badge").count(&staff), 0);
    assert_eq!(Query::filter(Employee::IS_ACTIVE).is(true).count(&staff), 2);
}

#[test]
fn parent_attributes_are_inherited() {
    let staff = staff();
    assert!(has_attribute(&staff[0], "name"));
    assert_eq!(Query::filter("name").like("*Gupta").count(&staff), 2);
    assert_eq!(
        resolve(&staff[1], "name"),
        Some(Value::from("Abhishek Gupta"))
    );
}

#[test]
fn own_attributes_shadow_inherited_ones() {
    #[derive(Record)]
    struct Contractor {
        #[gather(parent)]
        person: Person,
        name: String,
    }

    let contractor = Contractor {
        person: Person {
            name: "Amit Modi".into(),
            nickname: None,
            address: None,
        },
        name: "Acme Staffing".into(),
    };

    assert_eq!(
        resolve(&contractor, "name"),
        Some(Value::from("Acme Staffing"))
    );
    assert!(has_attribute(&contractor, "nickname"));
}

#[test]
fn absent_parent_keeps_inherited_attributes() {
    #[derive(Record)]
    struct Staff {
        role: String,
        #[gather(parent)]
        person: Option<Person>,
    }

    let staff = vec![
        Staff {
            role: "vacant".into(),
            person: None,
        },
        Staff {
            role: "lead".into(),
            person: Some(Person {
                name: "Amit".into(),
                nickname: None,
                address: None,
            }),
        },
    ];

    assert_eq!(Query::filter("name").is("Amit").count(&staff), 1);
    assert_eq!(Query::has_property("name").count(&staff), 2);
    assert_eq!(Query::filter("name").is_null().count(&staff), 1);
    assert_eq!(resolve(&staff[0], "name"), Some(Value::Null));
}

// ============================================================================
// Nested records
// ============================================================================

#[test]
fn dotted_paths_reach_nested_records() {
    let staff = staff();
    assert_eq!(Query::filter("address.city").is("Pune").count(&staff), 1);
    assert_eq!(
        Query::filter("address.pin").greater_than(400_000).count(&staff),
        2
    );
    assert_eq!(resolve(&staff[0], "address.city"), Some(Value::from("Pune")));
}

#[test]
fn absent_nested_record_is_null() {
    let staff = staff();
    assert_eq!(resolve(&staff[2], "address"), Some(Value::Null));
    assert_eq!(resolve(&staff[2], "address.city"), None);
    assert_eq!(Query::filter("address").is_null().count(&staff), 1);
    assert_eq!(Query::filter("address.city").is_null().count(&staff), 1);
    assert_eq!(Query::filter("address.city").is_not_null().count(&staff), 2);
}

#[test]
fn dotted_paths_through_scalars_resolve_to_nothing() {
    let staff = staff();
    assert_eq!(resolve(&staff[0], "name.length"), None);
    assert_eq!(resolve(&staff[0], "address."), None);
}

#[test]
fn absent_optional_scalar_is_null() {
    let staff = staff();
    assert_eq!(Query::filter("nickname").is_null().count(&staff), 3);
    assert_eq!(Query::has_property("nickname").count(&staff), 3);
}

#[test]
fn absent_record_never_matches() {
    let people: Vec<Option<Person>> = vec![
        None,
        Some(Person {
            name: "Amit Modi".into(),
            nickname: Some("amit".into()),
            address: None,
        }),
    ];
    assert_eq!(Query::new().count(&people), 1);
    assert_eq!(Query::filter("name").is_null().count(&people), 0);
    assert_eq!(Query::filter("nickname").is("amit").count(&people), 1);
}

// ============================================================================
// Field kinds
// ============================================================================

#[test]
fn enumerations_compare_by_variant() {
    let staff = staff();
    let night = EnumValue::of(&Shift::Night);
    assert_eq!(Query::filter("shift").is(night).count(&staff), 1);
    assert_eq!(
        Query::filter("shift")
            .greater_than(EnumValue::of(&Shift::Day))
            .count(&staff),
        2
    );
    // same discriminant, different enum
    assert_eq!(
        Query::filter("shift")
            .is(EnumValue::of(&Grade::Junior))
            .count(&staff),
        0
    );
    assert_eq!(Query::filter("shift").is(0).count(&staff), 0);
}

#[test]
fn decimals_compare_and_aggregate() {
    let staff = staff();
    let threshold = Decimal::new(4_500_000, 2);
    assert_eq!(Query::filter("salary").greater_than(threshold).count(&staff), 2);
    assert_eq!(
        Query::filter("salary").is(Decimal::new(5_000_000, 2)).count(&staff),
        2
    );
    assert_eq!(Query::filter("salary").is(50_000).count(&staff), 2);

    let total = Aggregate::Sum(Domain::Floating).run(&staff, "salary").unwrap();
    assert_eq!(total, Some(Number::F64(140_000.5)));
    let low = Aggregate::Min(Domain::Integral).run(&staff, "salary").unwrap();
    assert_eq!(low, Some(Number::I64(40_000)));
    let unique = Aggregate::Unique.run(&staff, "salary").unwrap();
    assert_eq!(unique, Some(Number::U64(2)));
}

#[test]
fn sets_behave_as_lists() {
    let staff = staff();
    assert_eq!(Query::filter("tags").has("rust").count(&staff), 3);
    assert_eq!(
        Query::filter("tags")
            .has_all(Value::list(["ops", "rust"]))
            .count(&staff),
        3
    );
    assert_eq!(
        Query::filter("tags")
            .has_all(Value::list(["ops", "java"]))
            .count(&staff),
        0
    );
}

#[test]
fn primitive_arrays() {
    let staff = staff();
    assert_eq!(Query::filter("ratings").has(4.5).count(&staff), 3);
    assert_eq!(Query::filter("ratings").has(4).count(&staff), 0);
    assert_eq!(Query::filter("ratings").has(3).count(&staff), 3);
    assert_eq!(Query::filter("initials").has('M').count(&staff), 1);
    assert_eq!(Query::filter("initials").has("M").count(&staff), 0);
    assert_eq!(
        Query::filter("initials")
            .has_any(Value::list(['S', 'X']))
            .count(&staff),
        1
    );
}

#[test]
fn counters_are_read_at_evaluation_time() {
    let staff = staff();
    let query = Query::filter("logins").greater_than(2);
    assert_eq!(query.count(&staff), 0);

    staff[1].logins.store(5, Ordering::SeqCst);
    assert_eq!(query.count(&staff), 1);
    assert_eq!(Query::filter("logins").is(5).count(&staff), 1);

    let total = Aggregate::Sum(Domain::Integral).run(&staff, "logins").unwrap();
    assert_eq!(total, Some(Number::I64(5)));
}

#[test]
fn shared_records_are_queried_in_place() {
    let staff: Vec<Arc<Employee>> = staff().into_iter().map(Arc::new).collect();
    let active = Query::filter("isActive").is(true);
    let found = active.find(&staff);
    assert_eq!(found.len(), 2);
    assert!(Arc::ptr_eq(found[0], &staff[0]));
}

#[test]
fn queries_run_on_other_threads() {
    let staff = Arc::new(staff());
    let query = Arc::new(Query::filter("address.city").is_not_null());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let staff = Arc::clone(&staff);
            let query = Arc::clone(&query);
            std::thread::spawn(move || query.count(staff.iter()))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 2);
    }
}
