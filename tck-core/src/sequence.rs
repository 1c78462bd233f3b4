//! Sequence arithmetic for `seq` and `bdSeq` counters (0..=255, wrapping).

use crate::constants::MAX_SEQ;

/// Successor of `s` modulo 256.
pub const fn next_seq(s: u8) -> u8 {
    s.wrapping_add(1)
}

/// Narrow a payload sequence value to the counter range.
///
/// Payload sequence fields are `uint64` on the wire; anything above 255 is
/// out of range and yields `None`.
pub fn to_seq(value: u64) -> Option<u8> {
    if value <= u64::from(MAX_SEQ) {
        Some(value as u8)
    } else {
        None
    }
}

/// Number of messages missing between `expected` and `received`
/// (0 when `received == expected`).
pub const fn gap(expected: u8, received: u8) -> u8 {
    received.wrapping_sub(expected)
}
