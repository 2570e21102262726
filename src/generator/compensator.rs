//! Clock-back tolerant generation path
//!
//! Every issued sequence is also recorded in a ring buffer indexed by
//! `timestamp mod cache_size`. When the clock regresses by no more than the
//! buffer length, the slot for the regressed millisecond is incremented and
//! reused instead of failing.

use std::cmp::Ordering;

use tracing::warn;

use super::{Allocate, Snowflake};
use crate::clock::ClockSource;
use crate::error::{Result, SnowflakeError};
use crate::layout::MAX_SEQUENCE;

#[derive(Debug)]
pub(crate) struct ClockBackCompensator {
    last_timestamp: i64,
    sequence: u16,
    cache: Box<[u16]>,
}

impl ClockBackCompensator {
    pub(crate) fn new(cache_size: usize) -> Self {
        Self {
            last_timestamp: i64::MIN,
            sequence: 0,
            cache: vec![0; cache_size].into_boxed_slice(),
        }
    }

    #[inline(always)]
    fn slot(&self, timestamp: i64) -> usize {
        timestamp.rem_euclid(self.cache.len() as i64) as usize
    }

    /// Issue an id for a millisecond behind `last_timestamp`.
    ///
    /// A full slot moves on to the next millisecond's slot. Reaching
    /// `last_timestamp` continues its sequence; going past it starts a fresh
    /// millisecond, since nothing was issued there yet.
    fn replay<C: ClockSource>(
        &mut self,
        mut now: i64,
        generator: &Snowflake<C>,
    ) -> Result<(i64, u16)> {
        let delta = self.last_timestamp - now;
        let cache_size = self.cache.len();
        warn!(
            delta,
            last_timestamp = self.last_timestamp,
            now,
            cache_size,
            "clock moved backwards, replaying cached sequence"
        );
        if delta > cache_size as i64 {
            return Err(SnowflakeError::ClockBackExceedsCache {
                delta,
                cache_size,
                last_timestamp: self.last_timestamp,
                now,
            });
        }

        loop {
            let slot = self.slot(now);
            if now > self.last_timestamp {
                generator.check_timestamp(now)?;
                self.last_timestamp = now;
                self.sequence = generator.start_sequence();
                self.cache[slot] = self.sequence;
                return Ok((now, self.sequence));
            }

            let sequence = (self.cache[slot] + 1) & MAX_SEQUENCE;
            if sequence != 0 {
                self.cache[slot] = sequence;
                if now == self.last_timestamp {
                    self.sequence = sequence;
                }
                return Ok((now, sequence));
            }
            now += 1;
        }
    }
}

impl Allocate for ClockBackCompensator {
    fn allocate<C: ClockSource>(&mut self, generator: &Snowflake<C>) -> Result<(i64, u16)> {
        let mut now = generator.now_ms()?;

        match now.cmp(&self.last_timestamp) {
            Ordering::Less => return self.replay(now, generator),
            Ordering::Equal => {
                let sequence = (self.sequence + 1) & MAX_SEQUENCE;
                if sequence == 0 {
                    now = generator.wait_next_millis(self.last_timestamp)?;
                    self.sequence = generator.start_sequence();
                } else {
                    self.sequence = sequence;
                }
            }
            Ordering::Greater => {
                self.sequence = generator.start_sequence();
            }
        }

        self.last_timestamp = now;
        let slot = self.slot(now);
        self.cache[slot] = self.sequence;
        Ok((now, self.sequence))
    }
}
