//! Fuzz target: arbitrary input / time sequences against one device
//!
//! The first byte picks the filter kind and duration; every following byte
//! is one step: bit 0 is the input level, the remaining bits how many
//! hundred milliseconds pass afterwards.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - At most one pending timer at any time
//! - Emitted output levels strictly alternate
//!
//! cargo fuzz run fuzz_event_sequence

#![no_main]

use core::time::Duration;

use filters::adapters::manual_timer::ManualTimers;
use filters::app::events::AppEvent;
use filters::app::ports::EventSink;
use filters::app::registry::FilterRegistry;
use filters::config::FilterConfig;
use filters::filter::FilterKind;
use libfuzzer_sys::fuzz_target;

struct Alternation {
    last: bool,
}

impl EventSink for Alternation {
    fn emit(&mut self, event: &AppEvent) {
        if let Some((_, level)) = event.output_change() {
            assert_ne!(level, self.last, "output emitted without a change");
            self.last = level;
        }
    }
}

fuzz_target!(|data: &[u8]| {
    let Some((&head, steps)) = data.split_first() else {
        return;
    };
    let kind = FilterKind::ALL[usize::from(head & 0b11)];
    let secs = u32::from(head >> 2) % 8 + 1;

    let mut registry = FilterRegistry::new();
    let mut timers = ManualTimers::new();
    let mut sink = Alternation { last: false };
    let id = registry
        .add_device(FilterConfig::new("fuzz", kind, secs), &mut sink)
        .expect("fresh registry accepts one device");

    for &b in steps {
        registry
            .input_changed(&id, b & 1 == 1, &mut timers, &mut sink)
            .expect("device is registered");
        timers.advance(
            Duration::from_millis(u64::from(b >> 1) * 100),
            &mut registry,
            &mut sink,
        );
        assert!(timers.pending_count() <= 1);
    }
});
