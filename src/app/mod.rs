//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the business rules of the vehicle app: command
//! decoding, the declarative rule table, the bounded seat tracker, and the
//! service that serializes every input.  All interaction with the vehicle
//! and the message bus happens through **port traits** defined in
//! [`ports`], keeping this layer fully testable without a broker.

pub mod channels;
pub mod commands;
pub mod dispatcher;
pub mod events;
pub mod ports;
pub mod rules;
pub mod seat;
pub mod service;
