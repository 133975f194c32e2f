//! Fuzz target: `LineDecoder::feed`
//!
//! Drives arbitrary byte sequences, split at an arbitrary point, into the
//! line decoder and asserts that it never panics, never yields an empty or
//! oversized frame, and never buffers past the limit.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use vehicle_skeleton::error::FrameError;
use vehicle_skeleton::link::codec::LineDecoder;

const LIMIT: usize = 64;

fuzz_target!(|data: &[u8]| {
    let mut decoder = LineDecoder::new(LIMIT);
    let split = data.first().map_or(0, |b| *b as usize).min(data.len());
    let (head, tail) = data.split_at(split);

    let mut check = |frame: Result<&[u8], FrameError>| {
        if let Ok(line) = frame {
            assert!(!line.is_empty(), "decoder must not yield empty frames");
            assert!(line.len() <= LIMIT, "frame exceeds limit");
        }
    };
    decoder.feed(head, &mut check);
    decoder.feed(tail, &mut check);
    assert!(decoder.buffered() <= LIMIT);
});
