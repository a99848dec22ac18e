//! Application core: filter orchestration, zero I/O.
//!
//! The registry routes commands and timer fires to devices.  Timers and
//! event delivery happen through the **port traits** defined in
//! [`ports`], so this layer runs identically against the virtual clock
//! in tests and the reactor timers at runtime.

pub mod commands;
pub mod events;
pub mod ports;
pub mod registry;
