//! Registry lifecycle, configuration loading and the property surface.

use crate::mock_sink::{Bench, RecordingSink};

use filters::app::commands::AdapterCommand;
use filters::app::events::AppEvent;
use filters::app::registry::FilterRegistry;
use filters::config::AdapterConfig;
use filters::device::id::DeviceId;
use filters::device::property::{Property, PropertyValue};
use filters::error::{ConfigIssue, FilterError};
use filters::filter::FilterKind;

const CONFIG: &str = r#"{
    "devices": [
        { "name": "Front Door", "type": "edge detector", "time": 5 },
        { "name": "hall%light", "type": "countdown", "time": 30 },
        { "name": "blinker", "type": "square wave", "time": 1 },
        { "name": "toggle", "type": "flip-flop", "time": 0 },
        { "name": "broken", "type": "monostable", "time": 1 },
        { "name": "negative", "type": "countdown", "time": -4 }
    ]
}"#;

fn id(name: &str) -> DeviceId {
    DeviceId::from_name(name).unwrap()
}

#[test]
fn config_document_builds_registry() {
    let config = AdapterConfig::from_json(CONFIG).unwrap();
    let mut sink = RecordingSink::new();
    let (registry, errors) = FilterRegistry::from_config(&config, &mut sink);

    let ids: Vec<_> = registry.ids().map(DeviceId::as_str).collect();
    assert_eq!(
        ids,
        vec![
            "filters-device-Front-Door",
            "filters-device-blinker",
            "filters-device-hall-light",
            "filters-device-toggle",
        ]
    );
    assert_eq!(sink.events.len(), 4);
    assert!(matches!(sink.events[0], AppEvent::DeviceAdded { kind: FilterKind::EdgeDetector, .. }));

    assert_eq!(errors.len(), 2);
    assert_eq!(
        errors[0],
        FilterError::Config {
            name: "broken".into(),
            issue: ConfigIssue::UnknownKind("monostable".into()),
        }
    );
    assert_eq!(
        errors[1],
        FilterError::Config {
            name: "negative".into(),
            issue: ConfigIssue::DurationOutOfRange(-4),
        }
    );
}

#[test]
fn malformed_document_is_rejected_whole() {
    assert!(AdapterConfig::from_json(r#"{ "devices": 3 }"#).is_err());
    assert!(AdapterConfig::from_json(r#"{ "devices": [ "#).is_err());
    assert!(AdapterConfig::from_json("[]").is_err());
}

#[test]
fn wrongly_typed_entries_only_lose_themselves() {
    let config = AdapterConfig::from_json(
        r#"{ "devices": [
            { "name": "good", "type": "countdown", "time": 1 },
            { "name": "bad", "type": 5, "time": 1 },
            { "name": "frac", "type": "countdown", "time": 1.5 },
            { "name": 3 }
        ] }"#,
    )
    .unwrap();
    let (registry, errors) = FilterRegistry::from_config(&config, &mut RecordingSink::new());

    assert_eq!(registry.len(), 1);
    assert!(registry.device(&id("good")).is_some());
    let issues: Vec<_> = errors
        .into_iter()
        .map(|e| match e {
            FilterError::Config { issue, .. } => issue,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(
        issues,
        vec![
            ConfigIssue::UnknownKind("5".into()),
            ConfigIssue::InvalidDuration("1.5".into()),
            ConfigIssue::InvalidName,
        ]
    );
}

#[test]
fn long_descriptive_name_registers() {
    let name = "Living room ceiling light off delay after motion sensor";
    let config = AdapterConfig::from_json(&format!(
        r#"{{ "devices": [ {{ "name": "{name}", "type": "countdown", "time": 60 }} ] }}"#
    ))
    .unwrap();
    let (registry, errors) = FilterRegistry::from_config(&config, &mut RecordingSink::new());

    assert!(errors.is_empty());
    assert_eq!(registry.device(&id(name)).unwrap().config().name, name);
}

#[test]
fn devices_start_low_and_idle() {
    let config = AdapterConfig::from_json(CONFIG).unwrap();
    let (registry, _) = FilterRegistry::from_config(&config, &mut RecordingSink::new());
    for device in registry.devices() {
        assert!(!device.output());
        assert!(!device.input());
        assert!(device.timer_handle().is_none());
    }
}

#[test]
fn description_serializes_for_the_gateway() {
    let mut bench = Bench::new();
    let dev = bench.add("porch", FilterKind::Countdown, 30);
    let description = bench.registry.device(&dev).unwrap().description();
    let json = serde_json::to_value(&description).unwrap();

    assert_eq!(json["id"], "filters-device-porch");
    assert_eq!(json["title"], "porch");
    assert_eq!(json["type"], "filter");
    assert_eq!(json["@type"], serde_json::json!(["Light", "OnOffSwitch"]));
    let props = json["properties"].as_array().unwrap();
    let names: Vec<_> = props.iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["time", "output", "input"]);
    assert_eq!(props[0]["unit"], "seconds");
    assert_eq!(props[1]["readOnly"], true);
}

// ── Property surface ─────────────────────────────────────────

#[test]
fn output_is_read_only() {
    let mut bench = Bench::new();
    let dev = bench.add("lamp", FilterKind::FlipFlop, 0);
    let err = bench
        .registry
        .set_property(
            &dev,
            Property::Output,
            PropertyValue::Bool(true),
            &mut bench.timers,
            &mut bench.sink,
        )
        .unwrap_err();
    assert_eq!(err, FilterError::ReadOnlyProperty(Property::Output));
    assert!(!bench.output(&dev));
}

#[test]
fn input_write_emits_input_then_output() {
    let mut bench = Bench::new();
    let dev = bench.add("lamp", FilterKind::FlipFlop, 0);
    bench.sink.clear();
    bench
        .registry
        .set_property(
            &dev,
            Property::Input,
            PropertyValue::Bool(true),
            &mut bench.timers,
            &mut bench.sink,
        )
        .unwrap();

    let props: Vec<_> = bench
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::PropertyChanged { property, value, .. } => Some((*property, *value)),
            _ => None,
        })
        .collect();
    assert_eq!(
        props,
        vec![
            (Property::Input, PropertyValue::Bool(true)),
            (Property::Output, PropertyValue::Bool(true)),
        ]
    );
}

#[test]
fn wrong_value_type_is_rejected() {
    let mut bench = Bench::new();
    let dev = bench.add("hall", FilterKind::Countdown, 2);
    let err = bench
        .registry
        .set_property(
            &dev,
            Property::Input,
            PropertyValue::Integer(1),
            &mut bench.timers,
            &mut bench.sink,
        )
        .unwrap_err();
    assert!(matches!(err, FilterError::PropertyType { property: Property::Input, .. }));

    let err = bench
        .registry
        .set_property(
            &dev,
            Property::Time,
            PropertyValue::Integer(-1),
            &mut bench.timers,
            &mut bench.sink,
        )
        .unwrap_err();
    assert!(matches!(err, FilterError::PropertyType { property: Property::Time, .. }));
    assert_eq!(bench.registry.device(&dev).unwrap().duration_secs(), 2);
}

#[test]
fn time_write_applies_to_the_next_timer() {
    let mut bench = Bench::new();
    let dev = bench.add("hall", FilterKind::Countdown, 2);
    bench.input(&dev, true);
    bench.input(&dev, false);

    bench
        .registry
        .set_property(
            &dev,
            Property::Time,
            PropertyValue::Integer(10),
            &mut bench.timers,
            &mut bench.sink,
        )
        .unwrap();

    // The running timer keeps its original period.
    bench.advance_secs(2);
    assert!(!bench.output(&dev));

    bench.input(&dev, true);
    bench.input(&dev, false);
    bench.advance_secs(9);
    assert!(bench.output(&dev));
    bench.advance_secs(1);
    assert!(!bench.output(&dev));
}

#[test]
fn square_wave_rejects_zero_time() {
    let mut bench = Bench::new();
    let dev = bench.add("blink", FilterKind::SquareWave, 1);
    let err = bench
        .registry
        .set_property(
            &dev,
            Property::Time,
            PropertyValue::Integer(0),
            &mut bench.timers,
            &mut bench.sink,
        )
        .unwrap_err();
    assert_eq!(err, FilterError::InvalidDuration { device: dev.clone(), secs: 0 });
    assert_eq!(
        bench.registry.device(&dev).unwrap().property(Property::Time),
        PropertyValue::Integer(1)
    );
}

#[test]
fn rewriting_stored_value_is_silent() {
    let mut bench = Bench::new();
    let dev = bench.add("hall", FilterKind::Countdown, 2);
    bench.sink.clear();
    for (property, value) in [
        (Property::Time, PropertyValue::Integer(2)),
        (Property::Input, PropertyValue::Bool(false)),
    ] {
        bench
            .registry
            .set_property(&dev, property, value, &mut bench.timers, &mut bench.sink)
            .unwrap();
    }
    assert!(bench.sink.events.is_empty());
}

// ── Lifecycle ────────────────────────────────────────────────

#[test]
fn removed_device_never_fires_again() {
    let mut bench = Bench::new();
    let dev = bench.add("blink", FilterKind::SquareWave, 1);
    bench.input(&dev, true);
    bench.advance_secs(1);

    bench
        .registry
        .handle_command(AdapterCommand::RemoveDevice(dev.clone()), &mut bench.timers, &mut bench.sink)
        .unwrap();
    assert_eq!(bench.timers.pending_count(), 0);
    bench.sink.clear();

    bench.advance_secs(5);
    assert!(bench.sink.events.is_empty());
    assert_eq!(
        bench.registry.input_changed(&dev, false, &mut bench.timers, &mut bench.sink),
        Err(FilterError::UnknownDevice(dev))
    );
}

#[test]
fn dispose_is_idempotent() {
    let mut bench = Bench::new();
    let dev = bench.add("hall", FilterKind::Countdown, 1);
    bench.registry.unload(&mut bench.timers);
    bench.registry.unload(&mut bench.timers);
    assert_eq!(bench.registry.len(), 1);

    // Devices stay usable after unload.
    bench.input(&dev, true);
    bench.input(&dev, false);
    bench.registry.unload(&mut bench.timers);
    bench.advance_secs(3);
    assert!(bench.output(&dev));
}

#[test]
fn re_adding_after_removal_starts_fresh() {
    let mut bench = Bench::new();
    let dev = bench.add("lamp", FilterKind::FlipFlop, 0);
    bench.input(&dev, true);
    bench
        .registry
        .remove_device(&dev, &mut bench.timers, &mut bench.sink)
        .unwrap();

    let again = bench.add("lamp", FilterKind::FlipFlop, 0);
    assert_eq!(again, dev);
    assert!(!bench.output(&again));
}
