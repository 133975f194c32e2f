//! Vehicle skeleton app library.
//!
//! Maps voice and mobile-app commands to vehicle-signal writes, relays and
//! answers vehicle speed, and publishes a heartbeat.  Everything except
//! the binary's wiring lives here so integration tests can drive it with
//! mock ports.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
pub mod link;
pub mod scheduler;
pub mod signals;
