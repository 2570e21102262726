//! Core Snowflake generator implementation
//!
//! Split into modules for testability:
//! - `sequence` - Strict path, fails on any clock regression
//! - `compensator` - Clock-back tolerant path backed by a sequence cache
//! - `start` - Per-millisecond starting sequence
//! - `wait` - Spin strategy for waiting on the next millisecond

mod compensator;
mod sequence;
mod start;
mod wait;

use parking_lot::Mutex;
use tracing::{trace, warn};

use crate::clock::{ClockSource, SystemClock};
use crate::config::SnowflakeConfig;
use crate::error::{Result, SnowflakeError};
use crate::layout::{pack, SnowflakeExtractor, MAX_TIMESTAMP_DELTA};

use compensator::ClockBackCompensator;
use sequence::SequenceAllocator;
use start::SequenceStart;
use wait::spin_until_after;

/// Which algorithm a generation call runs.
///
/// A generator should be driven through one path consistently: each path keeps
/// its own state, so ids from the two paths of one generator are not ordered
/// relative to each other and may collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GenerationPath {
    /// Fails with [`ClockMovedBackwards`] whenever the clock regresses.
    ///
    /// [`ClockMovedBackwards`]: crate::SnowflakeError::ClockMovedBackwards
    #[default]
    Strict,
    /// Keeps issuing ids during short clock regressions by replaying a ring
    /// buffer of the last sequence used per millisecond slot. Regressions
    /// longer than the cache fail with [`ClockBackExceedsCache`].
    ///
    /// The trade-off: a regression of exactly the cache size lands on a slot
    /// that was last written by a different millisecond, and ids from the two
    /// can collide. Choose this path knowing that.
    ///
    /// [`ClockBackExceedsCache`]: crate::SnowflakeError::ClockBackExceedsCache
    ClockBackTolerant,
}

/// One generation algorithm's state, run under that path's lock
pub(crate) trait Allocate {
    /// Pick the (timestamp, sequence) pair for the next id
    fn allocate<C: ClockSource>(&mut self, generator: &Snowflake<C>) -> Result<(i64, u16)>;
}

/// Snowflake id generator.
///
/// Each path owns its state behind its own mutex; the two paths never contend.
#[derive(Debug)]
pub struct Snowflake<C = SystemClock> {
    config: SnowflakeConfig,
    clock: C,
    start: SequenceStart,
    strict: Mutex<SequenceAllocator>,
    tolerant: Mutex<ClockBackCompensator>,
}

impl Snowflake<SystemClock> {
    /// Generator on the wall clock with the default epoch and cache size
    pub fn new(worker_id: u32, data_center_id: u32) -> Result<Self> {
        let config = SnowflakeConfig::builder()
            .node(worker_id, data_center_id)
            .build()?;
        Ok(Self::with_config(config))
    }

    /// Generator on the wall clock with an explicit epoch and cache size
    pub fn with_options(
        worker_id: u32,
        data_center_id: u32,
        epoch: i64,
        cache_size: usize,
    ) -> Result<Self> {
        let config = SnowflakeConfig::builder()
            .node(worker_id, data_center_id)
            .epoch(epoch)
            .cache_size(cache_size)
            .build()?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: SnowflakeConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: ClockSource> Snowflake<C> {
    pub fn with_clock(config: SnowflakeConfig, clock: C) -> Self {
        Self {
            config,
            clock,
            start: SequenceStart::new(config.sequence_start_offset()),
            strict: Mutex::new(SequenceAllocator::new()),
            tolerant: Mutex::new(ClockBackCompensator::new(config.cache_size())),
        }
    }

    /// Next id on the strict path
    #[inline]
    pub fn next_id(&self) -> Result<i64> {
        self.generate(&self.strict)
    }

    /// Next id on the clock-back tolerant path
    #[inline]
    pub fn next_id_tolerant(&self) -> Result<i64> {
        self.generate(&self.tolerant)
    }

    pub fn next_id_with(&self, path: GenerationPath) -> Result<i64> {
        match path {
            GenerationPath::Strict => self.next_id(),
            GenerationPath::ClockBackTolerant => self.next_id_tolerant(),
        }
    }

    pub fn config(&self) -> &SnowflakeConfig {
        &self.config
    }

    pub fn worker_id(&self) -> u8 {
        self.config.worker_id()
    }

    pub fn data_center_id(&self) -> u8 {
        self.config.data_center_id()
    }

    /// Decoder for ids from this generator
    pub fn extract(&self) -> SnowflakeExtractor {
        SnowflakeExtractor::new(self.config.epoch())
    }

    fn generate<A: Allocate>(&self, path: &Mutex<A>) -> Result<i64> {
        let (timestamp, sequence) = path.lock().allocate(self)?;
        Ok(self.assemble_id(timestamp, sequence))
    }

    /// Current clock reading, refused when it cannot be packed
    #[inline(always)]
    pub(crate) fn now_ms(&self) -> Result<i64> {
        self.check_timestamp(self.clock.now_millis())
    }

    /// Spin until the clock reads past `from_ts`
    pub(crate) fn wait_next_millis(&self, from_ts: i64) -> Result<i64> {
        trace!(from_ts, "sequence exhausted, waiting for next millisecond");
        let now = spin_until_after(from_ts, self.config.spin_yield_every(), || {
            self.clock.now_millis()
        });
        self.check_timestamp(now)
    }

    /// The timestamp field holds `timestamp - epoch` in 41 bits
    pub(crate) fn check_timestamp(&self, timestamp: i64) -> Result<i64> {
        let epoch = self.config.epoch();
        if timestamp < epoch || timestamp - epoch > MAX_TIMESTAMP_DELTA {
            warn!(
                now = timestamp,
                epoch,
                "clock reading outside the representable timestamp range"
            );
            return Err(SnowflakeError::TimestampOutOfRange {
                now: timestamp,
                epoch,
            });
        }
        Ok(timestamp)
    }

    #[inline(always)]
    pub(crate) fn start_sequence(&self) -> u16 {
        self.start.next()
    }

    #[inline(always)]
    fn assemble_id(&self, timestamp: i64, sequence: u16) -> i64 {
        pack(
            timestamp - self.config.epoch(),
            self.config.data_center_id(),
            self.config.worker_id(),
            sequence,
        )
    }
}
