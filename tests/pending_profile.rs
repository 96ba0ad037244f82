use std::sync::Arc;

use lumetric::config::{DeviceInfo, TrackerConfig};
use lumetric::emit::{CapturingSink, ProfileAction};
use lumetric::engine::Tracker;
use lumetric::value::{Increments, Properties, Value};

fn tracker() -> (Tracker, Arc<CapturingSink>) {
    let sink = CapturingSink::new();
    let tracker = Tracker::new(
        "token-1",
        &TrackerConfig::default(),
        DeviceInfo::default(),
        sink.clone(),
    )
    .expect("tracker");
    (tracker, sink)
}

fn props(entries: &[(&str, Value)]) -> Properties {
    entries
        .iter()
        .cloned()
        .map(|(key, value)| (key.to_owned(), value))
        .collect()
}

fn amounts(entries: &[(&str, i64)]) -> Increments {
    entries
        .iter()
        .map(|(key, amount)| (key.to_string(), *amount))
        .collect()
}

#[test]
fn buffered_increments_accumulate_per_key() {
    let (tracker, sink) = tracker();
    let people = tracker.people();
    people.increment(amounts(&[("n", 3)]));
    people.increment(amounts(&[("n", 4)]));
    assert!(sink.people.lock().unwrap().is_empty());

    people.identify("U1");

    let mutations = sink.people.lock().unwrap();
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0].action, ProfileAction::Increment);
    assert_eq!(mutations[0].target, "U1");
    assert_eq!(mutations[0].payload, Value::Map(props(&[("n", Value::Int(7))])));
}

#[test]
fn buffered_sets_keep_the_last_write_only() {
    let (tracker, sink) = tracker();
    let people = tracker.people();
    people.set(props(&[("x", Value::from("A"))]));
    people.set(props(&[("x", Value::from("B"))]));

    people.identify("U1");

    let mutations = sink.people.lock().unwrap();
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0].action, ProfileAction::Set);
    assert_eq!(mutations[0].payload, Value::Map(props(&[("x", Value::from("B"))])));
}

#[test]
fn buffered_set_cancels_a_pending_increment_for_the_key() {
    let (tracker, sink) = tracker();
    let people = tracker.people();
    people.increment(amounts(&[("n", 5)]));
    people.set(props(&[("n", Value::from("fresh"))]));

    people.identify("U1");

    let mutations = sink.people.lock().unwrap();
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0].action, ProfileAction::Set);
    assert_eq!(mutations[0].payload, Value::Map(props(&[("n", Value::from("fresh"))])));
}

#[test]
fn flush_emits_set_before_increment() {
    let (tracker, sink) = tracker();
    let people = tracker.people();
    people.increment(amounts(&[("visits", 2)]));
    people.set(props(&[("plan", Value::from("pro"))]));

    people.identify("U1");

    let mutations = sink.people.lock().unwrap();
    assert_eq!(mutations.len(), 2);
    assert_eq!(mutations[0].action, ProfileAction::Set);
    assert_eq!(mutations[1].action, ProfileAction::Increment);
    assert_eq!(
        mutations[1].payload,
        Value::Map(props(&[("visits", Value::Int(2))]))
    );
}

#[test]
fn identify_with_empty_buffer_emits_nothing_twice() {
    let (tracker, sink) = tracker();
    let people = tracker.people();
    people.identify("U1");
    people.identify("U2");
    assert!(sink.people.lock().unwrap().is_empty());
    assert_eq!(tracker.people_identity().as_deref(), Some("U2"));
}

#[test]
fn set_forwards_immediately_once_identified() {
    let (tracker, sink) = tracker();
    let people = tracker.people();
    people.identify("U1");
    people.set(props(&[("plan", Value::from("pro"))]));

    let mutations = sink.people.lock().unwrap();
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0].action, ProfileAction::Set);
    assert_eq!(mutations[0].target, "U1");
    assert_eq!(mutations[0].token, "token-1");
    assert!(mutations[0].time > 0);
}

#[test]
fn increment_forwards_immediately_once_identified() {
    let (tracker, sink) = tracker();
    let people = tracker.people();
    people.identify("U1");
    people.increment_one("visits", -2);

    let mutations = sink.people.lock().unwrap();
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0].action, ProfileAction::Increment);
    assert_eq!(
        mutations[0].payload,
        Value::Map(props(&[("visits", Value::Int(-2))]))
    );
}

#[test]
fn set_one_wraps_a_single_property() {
    let (tracker, sink) = tracker();
    let people = tracker.people();
    people.identify("U1");
    people.set_one("zip", "90210");

    let mutations = sink.people.lock().unwrap();
    assert_eq!(mutations[0].payload, Value::Map(props(&[("zip", Value::from("90210"))])));
}

#[test]
fn delete_user_requires_an_identity() {
    let (tracker, sink) = tracker();
    let people = tracker.people();
    people.delete_user();
    assert!(sink.people.lock().unwrap().is_empty());

    people.identify("U1");
    people.delete_user();

    let mutations = sink.people.lock().unwrap();
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0].action, ProfileAction::Delete);
    assert_eq!(mutations[0].payload, Value::Null);
}

#[test]
fn profile_mutation_wire_shape() {
    let (tracker, sink) = tracker();
    let people = tracker.people();
    people.identify("U1");
    people.set(props(&[("plan", Value::from("pro"))]));

    let mutations = sink.people.lock().unwrap();
    let json = mutations[0].to_json();
    assert_eq!(json["$set"]["plan"], "pro");
    assert_eq!(json["$token"], "token-1");
    assert_eq!(json["$distinct_id"], "U1");
    assert!(json["$time"].is_i64());
}

#[test]
fn push_registration_requires_an_identity() {
    let (tracker, sink) = tracker();
    let people = tracker.people();
    people.set_push_registration_id("reg-1");
    assert!(sink.people.lock().unwrap().is_empty());
    assert!(people.push_registration_id().is_none());
}

#[test]
fn push_registration_unions_into_the_device_list() {
    let (tracker, sink) = tracker();
    let people = tracker.people();
    people.identify("U1");
    people.set_push_registration_id("reg-1");

    assert_eq!(people.push_registration_id().as_deref(), Some("reg-1"));
    let mutations = sink.people.lock().unwrap();
    assert_eq!(mutations.len(), 1);
    assert_eq!(mutations[0].action, ProfileAction::Union);
    assert_eq!(
        mutations[0].payload,
        Value::Map(props(&[(
            "devices",
            Value::Array(vec![Value::from("reg-1")])
        )]))
    );
}

#[test]
fn clearing_push_registration_empties_the_device_list() {
    let (tracker, sink) = tracker();
    let people = tracker.people();
    people.identify("U1");
    people.set_push_registration_id("reg-1");
    people.clear_push_registration_id();

    assert!(people.push_registration_id().is_none());
    let mutations = sink.people.lock().unwrap();
    assert_eq!(mutations.len(), 2);
    assert_eq!(mutations[1].action, ProfileAction::Set);
    assert_eq!(
        mutations[1].payload,
        Value::Map(props(&[("devices", Value::Array(Vec::new()))]))
    );
}

#[test]
fn unencodable_profile_values_are_skipped() {
    let (tracker, sink) = tracker();
    let people = tracker.people();
    people.identify("U1");
    people.set(props(&[
        ("bad", Value::Double(f64::NAN)),
        ("good", Value::Int(1)),
    ]));

    let mutations = sink.people.lock().unwrap();
    assert_eq!(
        mutations[0].payload,
        Value::Map(props(&[("good", Value::Int(1))]))
    );
}
