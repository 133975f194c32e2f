//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific subsystem
//! against mock adapters.  All tests run on the host with no broker, bus,
//! or serial device required.

mod aux_link_tests;
mod dispatcher_tests;
mod mock_ports;
