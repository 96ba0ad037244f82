use std::sync::Arc;

use lumetric::config::{DeviceInfo, TrackerConfig};
use lumetric::emit::CapturingSink;
use lumetric::engine::Tracker;
use lumetric::value::{Properties, Value};

fn tracker_with(device: DeviceInfo) -> (Tracker, Arc<CapturingSink>) {
    let sink = CapturingSink::new();
    let tracker = Tracker::new("token-1", &TrackerConfig::default(), device, sink.clone())
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

#[test]
fn reserved_fields_are_present_with_unknown_defaults() {
    let (tracker, sink) = tracker_with(DeviceInfo::default());
    tracker.track("x", None);

    let events = sink.events.lock().unwrap();
    let record = &events[0];
    assert_eq!(record.event, "x");
    assert_eq!(record.properties.get("token"), Some(&Value::from("token-1")));
    assert!(matches!(record.properties.get("time"), Some(Value::Int(_))));
    assert_eq!(record.properties.get("distinct_id"), Some(&Value::from("UNKNOWN")));
    assert_eq!(record.properties.get("carrier"), Some(&Value::from("UNKNOWN")));
    assert_eq!(record.properties.get("model"), Some(&Value::from("UNKNOWN")));
    assert_eq!(record.properties.get("version"), Some(&Value::from("UNKNOWN")));
    assert_eq!(record.properties.get("mp_lib"), Some(&Value::from("lumetric")));
}

#[test]
fn device_fields_fill_reserved_slots() {
    let device = DeviceInfo {
        device_id: Some("device-7".to_owned()),
        carrier: Some("acme".to_owned()),
        model: Some("m1".to_owned()),
        os_version: Some("11".to_owned()),
    };
    let (tracker, sink) = tracker_with(device);
    tracker.track("x", None);

    let events = sink.events.lock().unwrap();
    let record = &events[0];
    assert_eq!(record.properties.get("distinct_id"), Some(&Value::from("device-7")));
    assert_eq!(record.properties.get("carrier"), Some(&Value::from("acme")));
    assert_eq!(record.properties.get("model"), Some(&Value::from("m1")));
    assert_eq!(record.properties.get("version"), Some(&Value::from("11")));
}

#[test]
fn super_properties_overwrite_reserved_fields() {
    let (tracker, sink) = tracker_with(DeviceInfo::default());
    tracker.register_super_properties(props(&[("mp_lib", Value::from("custom-build"))]));
    tracker.track("x", None);

    let events = sink.events.lock().unwrap();
    assert_eq!(
        events[0].properties.get("mp_lib"),
        Some(&Value::from("custom-build"))
    );
}

#[test]
fn call_properties_overwrite_super_properties() {
    let (tracker, sink) = tracker_with(DeviceInfo::default());
    tracker.register_super_properties(props(&[("time", Value::Int(99))]));
    tracker.track("x", Some(props(&[("time", Value::Int(1))])));

    let events = sink.events.lock().unwrap();
    assert_eq!(events[0].properties.get("time"), Some(&Value::Int(1)));
}

#[test]
fn events_identity_wins_distinct_id_unconditionally() {
    let (tracker, sink) = tracker_with(DeviceInfo {
        device_id: Some("device-7".to_owned()),
        ..DeviceInfo::default()
    });
    tracker.register_super_properties(props(&[("distinct_id", Value::from("spoof-super"))]));
    tracker.identify("U1");
    tracker.track("x", Some(props(&[("distinct_id", Value::from("spoof-call"))])));

    let events = sink.events.lock().unwrap();
    assert_eq!(events[0].properties.get("distinct_id"), Some(&Value::from("U1")));
}

#[test]
fn super_distinct_id_applies_while_unidentified() {
    let (tracker, sink) = tracker_with(DeviceInfo {
        device_id: Some("device-7".to_owned()),
        ..DeviceInfo::default()
    });
    tracker.register_super_properties(props(&[("distinct_id", Value::from("alias"))]));
    tracker.track("x", None);

    let events = sink.events.lock().unwrap();
    assert_eq!(events[0].properties.get("distinct_id"), Some(&Value::from("alias")));
}

#[test]
fn unencodable_call_property_does_not_suppress_the_record() {
    let (tracker, sink) = tracker_with(DeviceInfo::default());
    tracker.track(
        "x",
        Some(props(&[
            ("bad", Value::Double(f64::INFINITY)),
            ("good", Value::Int(1)),
        ])),
    );

    let events = sink.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].properties.get("good"), Some(&Value::Int(1)));
    assert!(events[0].properties.get("bad").is_none());
}

#[test]
fn empty_event_name_is_dropped() {
    let (tracker, sink) = tracker_with(DeviceInfo::default());
    tracker.track("", None);
    assert!(sink.events.lock().unwrap().is_empty());
}

#[test]
fn event_record_wire_shape() {
    let (tracker, sink) = tracker_with(DeviceInfo::default());
    tracker.track("Signed Up", Some(props(&[("plan", Value::from("pro"))])));

    let events = sink.events.lock().unwrap();
    let json = events[0].to_json();
    assert_eq!(json["event"], "Signed Up");
    assert_eq!(json["properties"]["plan"], "pro");
    assert_eq!(json["properties"]["token"], "token-1");
}
