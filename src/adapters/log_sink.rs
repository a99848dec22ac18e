//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing every observable property change
//! through the `log` facade.  A host bridge that forwards changes to a
//! gateway implements the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::DeviceAdded { id, kind } => {
                info!("ADD   | {} ({})", id, kind);
            }
            AppEvent::DeviceRemoved(id) => {
                info!("DEL   | {}", id);
            }
            AppEvent::PropertyChanged {
                device,
                property,
                value,
            } => {
                info!("PROP  | {}.{} = {}", device, property, value);
            }
        }
    }
}
