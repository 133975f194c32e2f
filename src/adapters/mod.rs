//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to                  |
//! |----------------|--------------------|------------------------------|
//! | `console_bus`  | MessageBusPort     | stdout (out), stdin (in)     |
//! | `sim_broker`   | SignalPort         | In-process signal store      |
//! | `config_file`  | ConfigPort         | JSON file named by env var   |

pub mod config_file;
pub mod console_bus;
pub mod sim_broker;
