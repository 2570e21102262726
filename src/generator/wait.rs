//! Spin strategy for sequence exhaustion
//!
//! Waits are sub-millisecond, so the generator spins instead of sleeping, but
//! yields the thread periodically so a stalled clock cannot peg a core.

use std::thread;

/// Spin until `get_time` reads a timestamp later than `from_timestamp`.
///
/// Yields every `yield_every` iterations; 0 disables yielding.
#[inline]
pub fn spin_until_after<F>(from_timestamp: i64, yield_every: u32, get_time: F) -> i64
where
    F: Fn() -> i64,
{
    let mut spins: u32 = 0;
    loop {
        let now = get_time();
        if now > from_timestamp {
            return now;
        }

        std::hint::spin_loop();

        spins = spins.wrapping_add(1);
        if yield_every != 0 && spins % yield_every == 0 {
            thread::yield_now();
        }
    }
}
