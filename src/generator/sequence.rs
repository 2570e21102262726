//! Strict generation path
//!
//! Issues strictly increasing (timestamp, sequence) pairs and refuses to
//! generate while the clock is behind the last issued timestamp.

use std::cmp::Ordering;

use tracing::warn;

use super::{Allocate, Snowflake};
use crate::clock::ClockSource;
use crate::error::{Result, SnowflakeError};
use crate::layout::MAX_SEQUENCE;

#[derive(Debug)]
pub(crate) struct SequenceAllocator {
    last_timestamp: i64,
    sequence: u16,
}

impl SequenceAllocator {
    pub(crate) const fn new() -> Self {
        Self {
            last_timestamp: i64::MIN,
            sequence: 0,
        }
    }
}

impl Allocate for SequenceAllocator {
    fn allocate<C: ClockSource>(&mut self, generator: &Snowflake<C>) -> Result<(i64, u16)> {
        let mut now = generator.now_ms()?;

        match now.cmp(&self.last_timestamp) {
            Ordering::Less => {
                let delta = self.last_timestamp - now;
                warn!(
                    delta,
                    last_timestamp = self.last_timestamp,
                    now,
                    "clock moved backwards, refusing to generate id"
                );
                return Err(SnowflakeError::ClockMovedBackwards {
                    delta,
                    last_timestamp: self.last_timestamp,
                    now,
                });
            }
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
        Ok((now, self.sequence))
    }
}
