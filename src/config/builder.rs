//! SnowflakeConfig builder for constructing configuration

use chrono::{DateTime, Utc};

use super::SnowflakeConfig;
use crate::error::{Result, SnowflakeError};
use crate::layout::MAX_SEQUENCE;
use crate::node::{MacAddressSource, NodeId, NodeIdentity};

/// Default configuration values
pub(super) const DEFAULT_EPOCH: i64 = 1_288_834_974_657; // November 4, 2010 01:42:54.657 UTC
pub(super) const DEFAULT_CACHE_SIZE: usize = 2000;
pub(super) const DEFAULT_SEQUENCE_START_OFFSET: i64 = 0;
pub(super) const DEFAULT_SPIN_YIELD_EVERY: u32 = 16;

/// Largest clock-back cache accepted, about 17 minutes of look-back
pub const MAX_CACHE_SIZE: usize = 1 << 20;

/// Builder for SnowflakeConfig
#[derive(Debug, Clone)]
pub struct SnowflakeConfigBuilder {
    worker_id: Option<u32>,
    data_center_id: Option<u32>,
    epoch: i64,
    cache_size: usize,
    sequence_start_offset: i64,
    spin_yield_every: u32,
}

impl SnowflakeConfigBuilder {
    /// Create a new SnowflakeConfigBuilder with default values
    pub fn new() -> Self {
        Self {
            worker_id: None,
            data_center_id: None,
            epoch: DEFAULT_EPOCH,
            cache_size: DEFAULT_CACHE_SIZE,
            sequence_start_offset: DEFAULT_SEQUENCE_START_OFFSET,
            spin_yield_every: DEFAULT_SPIN_YIELD_EVERY,
        }
    }

    /// Set both node ids explicitly, skipping hardware address resolution
    pub const fn node(mut self, worker_id: u32, data_center_id: u32) -> Self {
        self.worker_id = Some(worker_id);
        self.data_center_id = Some(data_center_id);
        self
    }

    /// Set the worker id (0-31)
    pub const fn worker_id(mut self, worker_id: u32) -> Self {
        self.worker_id = Some(worker_id);
        self
    }

    /// Set the data center id (0-31)
    pub const fn data_center_id(mut self, data_center_id: u32) -> Self {
        self.data_center_id = Some(data_center_id);
        self
    }

    /// Set a custom epoch in milliseconds since the Unix epoch
    pub const fn epoch(mut self, epoch: i64) -> Self {
        self.epoch = epoch;
        self
    }

    /// Set a custom epoch from a UTC instant
    pub fn epoch_at(mut self, at: DateTime<Utc>) -> Self {
        self.epoch = at.timestamp_millis();
        self
    }

    /// Number of milliseconds the clock-back tolerant path can look back,
    /// at most [`MAX_CACHE_SIZE`]
    pub const fn cache_size(mut self, cache_size: usize) -> Self {
        self.cache_size = cache_size;
        self
    }

    /// Upper bound (exclusive) of the random sequence value each millisecond
    /// starts from. 0 always starts from 0.
    pub const fn sequence_start_offset(mut self, offset: i64) -> Self {
        self.sequence_start_offset = offset;
        self
    }

    /// Yield the thread every N spins while waiting for the clock; 0 never yields
    pub const fn spin_yield_every(mut self, n: u32) -> Self {
        self.spin_yield_every = n;
        self
    }

    /// Build the final SnowflakeConfig, resolving missing node ids from this
    /// host's network interfaces
    pub fn build(self) -> Result<SnowflakeConfig> {
        self.build_with_identity(NodeIdentity::system())
    }

    /// Build the final SnowflakeConfig, resolving missing node ids through
    /// `identity`
    pub fn build_with_identity<S: MacAddressSource>(
        self,
        identity: &NodeIdentity<S>,
    ) -> Result<SnowflakeConfig> {
        if self.epoch < 0 {
            return Err(SnowflakeError::InvalidEpoch { epoch: self.epoch });
        }
        if !(1..=MAX_CACHE_SIZE).contains(&self.cache_size) {
            return Err(SnowflakeError::InvalidCacheSize {
                cache_size: self.cache_size,
                max: MAX_CACHE_SIZE,
            });
        }
        let sequence_start_offset = validate_offset(self.sequence_start_offset)?;

        let node = match (self.worker_id, self.data_center_id) {
            (Some(worker_id), Some(data_center_id)) => NodeId::new(worker_id, data_center_id)?,
            (worker_id, data_center_id) => {
                let default = identity.resolve()?;
                NodeId::new(
                    worker_id.unwrap_or(u32::from(default.worker_id())),
                    data_center_id.unwrap_or(u32::from(default.data_center_id())),
                )?
            }
        };

        Ok(SnowflakeConfig {
            node,
            epoch: self.epoch,
            cache_size: self.cache_size,
            sequence_start_offset,
            spin_yield_every: self.spin_yield_every,
        })
    }
}

impl Default for SnowflakeConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub(super) fn validate_offset(offset: i64) -> Result<u16> {
    if !(0..=i64::from(MAX_SEQUENCE)).contains(&offset) {
        return Err(SnowflakeError::InvalidSequenceOffset {
            offset,
            max: MAX_SEQUENCE,
        });
    }
    Ok(offset as u16)
}
