//! Integration tests for the Queryable derive macro.
//!
//! These tests verify that `#[derive(Queryable)]` generates field access and
//! field constants that work with query sets and aggregation.

#![cfg(feature = "derive")]
#![allow(dead_code)] // Some fields are intentionally skipped for testing

use objects_query::{Aggregator, Max, QuerySet, Queryable, Value, Q};

#[derive(Debug, Clone, Queryable)]
struct Task {
    name: String,
    priority: u8,
    done: bool,
    #[query(rename = "type")]
    kind: i64,
    tags: Vec<String>,
    owner: Option<String>,
    #[query(skip)]
    internal_id: u64,
}

fn task(name: &str, kind: i64, priority: u8) -> Task {
    Task {
        name: name.to_string(),
        priority,
        done: false,
        kind,
        tags: vec!["work".to_string()],
        owner: None,
        internal_id: 7,
    }
}

#[test]
fn field_constants_generated() {
    assert_eq!(Task::NAME, "name");
    assert_eq!(Task::PRIORITY, "priority");
    assert_eq!(Task::DONE, "done");
    assert_eq!(Task::TYPE, "type");
}

#[test]
fn fields_convert_to_values() {
    let t = task("write", 1, 3);
    assert_eq!(t.field_value("name"), Some(Value::from("write")));
    assert_eq!(t.field_value("priority"), Some(Value::from(3u8)));
    assert_eq!(t.field_value("done"), Some(Value::from(false)));
    assert_eq!(t.field_value("tags"), Some(Value::from(vec!["work"])));
    assert_eq!(t.field_value("owner"), Some(Value::Null));
}

#[test]
fn renamed_field_uses_new_name() {
    let t = task("write", 4, 1);
    assert_eq!(t.field_value("type"), Some(Value::from(4)));
    assert_eq!(t.field_value("kind"), None);
}

#[test]
fn skipped_and_unknown_fields_are_absent() {
    let t = task("write", 1, 1);
    assert_eq!(t.field_value("internal_id"), None);
    assert_eq!(t.field_value("nonexistent"), None);
    assert!(!t.has_field("internal_id"));
}

#[test]
fn derived_struct_in_queryset() {
    let tasks = vec![task("a", 1, 2), task("b", 1, 1), task("c", 3, 5)];
    let mut qs = QuerySet::new(tasks);
    let mut hits = qs.filter(Q::eq(Task::TYPE, 1) & !Q::eq(Task::PRIORITY, 5));
    let names: Vec<_> = hits
        .fetch_all()
        .unwrap()
        .iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn derived_struct_in_aggregator() {
    let tasks = vec![task("a", 1, 2), task("b", 1, 1), task("c", 3, 5)];
    let rows = Aggregator::new(tasks, [Task::TYPE])
        .aggregate("mx", Max::new(Task::PRIORITY))
        .into_rows()
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("mx"), Some(&Value::from(2)));
    assert_eq!(rows[1].get("mx"), Some(&Value::from(5)));
}

#[test]
fn list_field_equality() {
    let t = task("a", 1, 1);
    let q = Q::kw([("tags", vec!["work"])]).unwrap();
    assert!(q.evaluate(&t).unwrap());
}
