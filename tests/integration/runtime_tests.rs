//! The async runtime against real reactor timers.
//!
//! Durations are zero or one second so each test finishes quickly; a
//! helper task submits `Unload` after a fixed delay to end the run.

use core::time::Duration;

use crate::mock_sink::RecordingSink;

use filters::app::commands::AdapterCommand;
use filters::app::registry::FilterRegistry;
use filters::config::FilterConfig;
use filters::device::id::DeviceId;
use filters::device::property::{Property, PropertyValue};
use filters::error::FilterError;
use filters::filter::FilterKind;
use filters::runtime::{
    EVENT_QUEUE_DEPTH, EventChannel, Executor, FilterRuntime, RuntimeEvent, run_blocking, submit,
};

fn set_input(device: &DeviceId, level: bool) -> AdapterCommand {
    AdapterCommand::SetProperty {
        device: device.clone(),
        property: Property::Input,
        value: PropertyValue::Bool(level),
    }
}

fn registry_with(name: &str, kind: FilterKind, secs: u32) -> (FilterRegistry, DeviceId, RecordingSink) {
    let mut sink = RecordingSink::new();
    let mut registry = FilterRegistry::new();
    let id = registry
        .add_device(FilterConfig::new(name, kind, secs), &mut sink)
        .unwrap();
    (registry, id, sink)
}

/// Submit `Unload` from a task on `executor` once `delay` has passed.
fn unload_after<'a>(executor: &Executor<'a>, events: &'a EventChannel, delay: Duration) {
    executor
        .spawn(async move {
            async_io_mini::Timer::after(delay).await;
            submit(events, AdapterCommand::Unload).unwrap();
        })
        .detach();
}

#[test]
fn countdown_expires_on_reactor_timer() {
    let events = EventChannel::new();
    let executor = Executor::new();
    let (registry, id, sink) = registry_with("porch", FilterKind::Countdown, 0);
    let mut runtime = FilterRuntime::new(&executor, &events, registry, sink);

    submit(&events, set_input(&id, true)).unwrap();
    submit(&events, set_input(&id, false)).unwrap();
    unload_after(&executor, &events, Duration::from_millis(200));

    run_blocking(&executor, &mut runtime);

    assert_eq!(runtime.sink().outputs_of(&id), vec![true, false]);
    assert!(runtime.registry().device(&id).unwrap().timer_handle().is_none());
    assert!(runtime.take_errors().is_empty());
}

#[test]
fn square_wave_toggles_until_unload() {
    let events = EventChannel::new();
    let executor = Executor::new();
    let (registry, id, sink) = registry_with("blink", FilterKind::SquareWave, 1);
    let mut runtime = FilterRuntime::new(&executor, &events, registry, sink);

    submit(&events, set_input(&id, true)).unwrap();
    unload_after(&executor, &events, Duration::from_millis(1500));

    run_blocking(&executor, &mut runtime);

    assert_eq!(runtime.sink().outputs_of(&id), vec![true, false]);
    assert!(runtime.registry().device(&id).unwrap().timer_handle().is_none());
    assert_eq!(runtime.live_timers(), 0);
}

#[test]
fn failed_commands_are_collected() {
    let events = EventChannel::new();
    let executor = Executor::new();
    let (registry, id, sink) = registry_with("lamp", FilterKind::FlipFlop, 0);
    let mut runtime = FilterRuntime::new(&executor, &events, registry, sink);
    let ghost = DeviceId::from_name("ghost").unwrap();

    submit(&events, set_input(&ghost, true)).unwrap();
    submit(
        &events,
        AdapterCommand::SetProperty {
            device: id.clone(),
            property: Property::Output,
            value: PropertyValue::Bool(true),
        },
    )
    .unwrap();
    submit(&events, set_input(&id, true)).unwrap();
    submit(&events, AdapterCommand::Unload).unwrap();

    run_blocking(&executor, &mut runtime);

    assert_eq!(
        runtime.take_errors(),
        vec![
            FilterError::UnknownDevice(ghost),
            FilterError::ReadOnlyProperty(Property::Output),
        ]
    );
    assert!(runtime.registry().device(&id).unwrap().output());
}

#[test]
fn full_queue_is_reported() {
    let events = EventChannel::new();
    for _ in 0..EVENT_QUEUE_DEPTH {
        submit(&events, AdapterCommand::Unload).unwrap();
    }
    assert_eq!(
        submit(&events, AdapterCommand::Unload),
        Err(FilterError::QueueFull)
    );
}

#[test]
fn dispatch_handles_one_event_directly() {
    let events = EventChannel::new();
    let executor = Executor::new();
    let (registry, id, sink) = registry_with("lamp", FilterKind::FlipFlop, 0);
    let mut runtime = FilterRuntime::new(&executor, &events, registry, sink);

    runtime
        .dispatch(RuntimeEvent::Command(set_input(&id, true)))
        .unwrap();
    let (registry, sink) = runtime.into_parts();
    assert!(registry.device(&id).unwrap().output());
    assert_eq!(sink.outputs_of(&id), vec![true]);
}
