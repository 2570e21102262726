//! Starting sequence for each new millisecond
//!
//! A random start scatters the low bits of ids that are later sharded by
//! `id % n`. It is not a security measure.

use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceStart {
    limit: u16,
}

impl SequenceStart {
    pub const fn new(limit: u16) -> Self {
        Self { limit }
    }

    /// Uniform in `[0, limit)`, or 0 when the limit is 0
    #[inline]
    pub fn next(&self) -> u16 {
        if self.limit == 0 {
            return 0;
        }
        rand::rng().random_range(0..self.limit)
    }
}
