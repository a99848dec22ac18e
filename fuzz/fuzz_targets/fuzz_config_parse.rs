//! Fuzz target: configuration document → registry
//!
//! Feeds arbitrary bytes through `AdapterConfig::from_json` and, when the
//! document parses, builds a registry from it.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - Every entry either registers a device or is reported as an error
//! - Every registered identifier carries the device prefix
//!
//! cargo fuzz run fuzz_config_parse

#![no_main]

use filters::adapters::log_sink::LogEventSink;
use filters::app::registry::FilterRegistry;
use filters::config::AdapterConfig;
use filters::device::id::DEVICE_ID_PREFIX;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = AdapterConfig::from_json(text) else {
        return;
    };

    let (registry, errors) = FilterRegistry::from_config(&config, &mut LogEventSink::new());
    assert_eq!(registry.len() + errors.len(), config.devices.len());
    for id in registry.ids() {
        assert!(id.as_str().starts_with(DEVICE_ID_PREFIX));
    }
});
