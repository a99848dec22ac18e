//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter        | Implements | Driven by                          |
//! |----------------|------------|------------------------------------|
//! | `async_timer`  | TimerPort  | `async-io-mini` reactor timers     |
//! | `log_sink`     | EventSink  | `log` facade                       |
//! | `manual_timer` | TimerPort  | Virtual clock, advanced by caller  |

pub mod async_timer;
pub mod log_sink;
pub mod manual_timer;
