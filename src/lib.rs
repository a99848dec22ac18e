//! Binary signal filters for a home-automation gateway.
//!
//! Each configured device turns a boolean `input` into a boolean `output`
//! through one of four timer-driven behaviours (countdown, edge detector,
//! flip-flop, square wave).  The domain logic is reachable without any
//! runtime: drive a [`app::registry::FilterRegistry`] with the virtual
//! clock in [`adapters::manual_timer`], or hand it to
//! [`runtime::FilterRuntime`] for real timers.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod device;
pub mod error;
pub mod filter;
pub mod runtime;
pub mod timer;

pub use error::{FilterError, Result};
