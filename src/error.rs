use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T, E = SnowflakeError> = std::result::Result<T, E>;

/// Errors that can occur while configuring or running a generator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnowflakeError {
    /// Worker id does not fit its 5-bit field
    #[error("Worker ID {worker_id} is invalid. Maximum allowed value is {max}")]
    InvalidWorkerId { worker_id: u32, max: u8 },
    /// Data center id does not fit its 5-bit field
    #[error("Data center ID {data_center_id} is invalid. Maximum allowed value is {max}")]
    InvalidDataCenterId { data_center_id: u32, max: u8 },
    /// Clock-back cache must hold between 1 and `max` slots
    #[error("Sequence cache size {cache_size} is invalid. Allowed range is 1..={max}")]
    InvalidCacheSize { cache_size: usize, max: usize },
    /// Sequence start offset does not fit the sequence field
    #[error("Sequence start offset {offset} is invalid. Allowed range is 0..={max}")]
    InvalidSequenceOffset { offset: i64, max: u16 },
    /// Epoch before the Unix epoch
    #[error("Epoch {epoch} is invalid. It must not be negative")]
    InvalidEpoch { epoch: i64 },
    /// No usable hardware address to derive a default node identity from
    #[error("Unable to resolve a default node identity: {reason}")]
    NodeIdentityUnavailable { reason: String },
    /// Clock reading before the epoch, or too far past it for the 41-bit field
    #[error(
        "Timestamp {now} is outside the representable range for epoch {epoch}. \
         Refusing to generate id"
    )]
    TimestampOutOfRange { now: i64, epoch: i64 },
    /// Clock moved backwards on the strict path
    #[error(
        "Clock moved backwards. Refusing to generate id for {delta} milliseconds \
         (last timestamp {last_timestamp}, now {now})"
    )]
    ClockMovedBackwards {
        delta: i64,
        last_timestamp: i64,
        now: i64,
    },
    /// Clock moved backwards further than the clock-back cache covers
    #[error(
        "Clock moved backwards by {delta} milliseconds, beyond the {cache_size} ms sequence cache \
         (last timestamp {last_timestamp}, now {now})"
    )]
    ClockBackExceedsCache {
        delta: i64,
        cache_size: usize,
        last_timestamp: i64,
        now: i64,
    },
}

impl SnowflakeError {
    /// Construction-time failures. A generator is never built from these.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidWorkerId { .. }
                | Self::InvalidDataCenterId { .. }
                | Self::InvalidCacheSize { .. }
                | Self::InvalidSequenceOffset { .. }
                | Self::InvalidEpoch { .. }
                | Self::NodeIdentityUnavailable { .. }
        )
    }
}
