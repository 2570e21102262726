//! Configuration for Snowflake generators

mod builder;

pub use builder::{SnowflakeConfigBuilder, MAX_CACHE_SIZE};
use builder::validate_offset;

use crate::error::Result;
use crate::node::NodeId;

/// Immutable, validated generator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnowflakeConfig {
    node: NodeId,
    epoch: i64,
    cache_size: usize,
    sequence_start_offset: u16,
    spin_yield_every: u32,
}

impl SnowflakeConfig {
    /// Create a new configuration builder
    pub fn builder() -> SnowflakeConfigBuilder {
        SnowflakeConfigBuilder::new()
    }

    /// Same configuration with a different sequence start offset
    pub fn with_sequence_start_offset(mut self, offset: i64) -> Result<Self> {
        self.sequence_start_offset = validate_offset(offset)?;
        Ok(self)
    }

    #[inline(always)]
    pub const fn node(&self) -> NodeId {
        self.node
    }

    #[inline(always)]
    pub const fn worker_id(&self) -> u8 {
        self.node.worker_id()
    }

    #[inline(always)]
    pub const fn data_center_id(&self) -> u8 {
        self.node.data_center_id()
    }

    #[inline(always)]
    pub const fn epoch(&self) -> i64 {
        self.epoch
    }

    #[inline(always)]
    pub const fn cache_size(&self) -> usize {
        self.cache_size
    }

    #[inline(always)]
    pub const fn sequence_start_offset(&self) -> u16 {
        self.sequence_start_offset
    }

    #[inline(always)]
    pub const fn spin_yield_every(&self) -> u32 {
        self.spin_yield_every
    }
}
