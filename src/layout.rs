//! Fixed 64-bit id layout
//!
//! ```text
//! | sign (1, always 0) | timestamp delta (41) | data center (5) | worker (5) | sequence (12) |
//! ```
//!
//! Field widths are part of the id's numeric range guarantee: with 41 delta
//! bits the sign bit can never be set.

use chrono::{DateTime, Utc};

pub const SEQUENCE_BITS: u32 = 12;
pub const WORKER_ID_BITS: u32 = 5;
pub const DATA_CENTER_ID_BITS: u32 = 5;
pub const TIMESTAMP_BITS: u32 = 41;

pub const WORKER_ID_SHIFT: u32 = SEQUENCE_BITS;
pub const DATA_CENTER_ID_SHIFT: u32 = SEQUENCE_BITS + WORKER_ID_BITS;
pub const TIMESTAMP_SHIFT: u32 = DATA_CENTER_ID_SHIFT + DATA_CENTER_ID_BITS;

pub const MAX_SEQUENCE: u16 = (1 << SEQUENCE_BITS) - 1;
pub const MAX_WORKER_ID: u8 = (1 << WORKER_ID_BITS) - 1;
pub const MAX_DATA_CENTER_ID: u8 = (1 << DATA_CENTER_ID_BITS) - 1;
pub const MAX_TIMESTAMP_DELTA: i64 = (1 << TIMESTAMP_BITS) - 1;

/// Number of distinct sequence values available per millisecond
pub const SEQUENCES_PER_MILLI: i64 = MAX_SEQUENCE as i64 + 1;

/// The four fields of an id, most significant first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdParts {
    pub delta_millis: i64,
    pub data_center_id: u8,
    pub worker_id: u8,
    pub sequence: u16,
}

/// Pack the four fields into an id.
///
/// Every field is masked to its width first, so the result is never negative.
#[inline(always)]
pub const fn pack(delta_millis: i64, data_center_id: u8, worker_id: u8, sequence: u16) -> i64 {
    ((delta_millis & MAX_TIMESTAMP_DELTA) << TIMESTAMP_SHIFT)
        | (((data_center_id & MAX_DATA_CENTER_ID) as i64) << DATA_CENTER_ID_SHIFT)
        | (((worker_id & MAX_WORKER_ID) as i64) << WORKER_ID_SHIFT)
        | ((sequence & MAX_SEQUENCE) as i64)
}

/// Exact inverse of [`pack`] for in-range fields
#[inline]
pub const fn unpack(id: i64) -> IdParts {
    IdParts {
        delta_millis: (id >> TIMESTAMP_SHIFT) & MAX_TIMESTAMP_DELTA,
        data_center_id: ((id >> DATA_CENTER_ID_SHIFT) & MAX_DATA_CENTER_ID as i64) as u8,
        worker_id: ((id >> WORKER_ID_SHIFT) & MAX_WORKER_ID as i64) as u8,
        sequence: (id & MAX_SEQUENCE as i64) as u16,
    }
}

/// Id decoder bound to the epoch the ids were generated against
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SnowflakeExtractor {
    epoch: i64,
}

impl SnowflakeExtractor {
    pub const fn new(epoch: i64) -> Self {
        Self { epoch }
    }

    #[inline(always)]
    pub const fn epoch(&self) -> i64 {
        self.epoch
    }

    #[inline(always)]
    pub const fn decompose(&self, id: i64) -> IdParts {
        unpack(id)
    }

    /// Milliseconds since the Unix epoch at which the id was issued
    #[inline(always)]
    pub const fn timestamp_millis(&self, id: i64) -> i64 {
        unpack(id).delta_millis + self.epoch
    }

    #[inline(always)]
    pub const fn data_center_id(&self, id: i64) -> u8 {
        unpack(id).data_center_id
    }

    #[inline(always)]
    pub const fn worker_id(&self, id: i64) -> u8 {
        unpack(id).worker_id
    }

    #[inline(always)]
    pub const fn sequence(&self, id: i64) -> u16 {
        unpack(id).sequence
    }

    /// Wall-clock instant encoded in the id, if representable
    pub fn datetime(&self, id: i64) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_millis(id))
    }
}
