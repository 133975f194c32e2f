//! Auxiliary command link.
//!
//! Newline-delimited JSON frames from the mobile-app relay.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    Link Stack                        │
//! │                                                      │
//! │  ┌───────────┐   ┌───────────┐   ┌────────────────┐  │
//! │  │ Transport │──▶│  Codec    │──▶│ Frame queue    │  │
//! │  │ (trait)   │   │ (lines)   │   │ → AppService   │  │
//! │  └───────────┘   └───────────┘   └────────────────┘  │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod channels;
pub mod codec;
pub mod io_task;
pub mod transport;
