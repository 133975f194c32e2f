//! Fuzz target: `decode_aux_frame`
//!
//! Arbitrary bytes must decode to an error or to a frame with at most one
//! command per category, never a panic.
//!
//! cargo fuzz run fuzz_aux_frame

#![no_main]

use libfuzzer_sys::fuzz_target;
use vehicle_skeleton::app::commands::{AuxCategory, decode_aux_frame};
use vehicle_skeleton::config::AppConfig;

fuzz_target!(|data: &[u8]| {
    let config = AppConfig::default();
    if let Ok(frame) = decode_aux_frame(data, &config) {
        assert!(frame.commands.len() <= AuxCategory::ALL.len());
        let present = AuxCategory::ALL
            .iter()
            .filter(|c| frame.object.contains_key(c.key()))
            .count();
        assert_eq!(present, frame.commands.len());
    }
});
