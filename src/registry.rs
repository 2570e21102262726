//! Generators keyed by sequence start offset
//!
//! Callers that share a partition key space pick different offsets so their
//! ids do not all start each millisecond at sequence 0. The registry hands out
//! one generator per offset for as long as it lives.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use crate::clock::{ClockSource, SystemClock};
use crate::config::SnowflakeConfig;
use crate::error::Result;
use crate::generator::{GenerationPath, Snowflake};

pub struct WorkerRegistry<C = SystemClock> {
    base: SnowflakeConfig,
    clock: C,
    generators: DashMap<i64, Arc<Snowflake<C>>>,
}

impl WorkerRegistry<SystemClock> {
    /// Registry whose generators run on the wall clock
    pub fn new(base: SnowflakeConfig) -> Self {
        Self::with_clock(base, SystemClock)
    }
}

impl<C: ClockSource + Clone> WorkerRegistry<C> {
    /// Every generator built by this registry gets a clone of `clock` and
    /// `base` with its own sequence start offset.
    pub fn with_clock(base: SnowflakeConfig, clock: C) -> Self {
        Self {
            base,
            clock,
            generators: DashMap::new(),
        }
    }

    /// Generator for `offset`, built on first request.
    ///
    /// Concurrent first requests for the same offset construct exactly one
    /// generator. Construction only holds the map shard, never a generator's
    /// own locks.
    pub fn get_or_create(&self, offset: i64) -> Result<Arc<Snowflake<C>>> {
        if let Some(existing) = self.generators.get(&offset) {
            return Ok(Arc::clone(existing.value()));
        }

        let config = self.base.with_sequence_start_offset(offset)?;
        let generator = self.generators.entry(offset).or_insert_with(|| {
            debug!(
                offset,
                worker_id = config.worker_id(),
                data_center_id = config.data_center_id(),
                "creating generator"
            );
            Arc::new(Snowflake::with_clock(config, self.clock.clone()))
        });
        Ok(Arc::clone(generator.value()))
    }

    /// Generator for `offset` if one was already built
    pub fn get(&self, offset: i64) -> Option<Arc<Snowflake<C>>> {
        self.generators
            .get(&offset)
            .map(|generator| Arc::clone(generator.value()))
    }

    /// Next id on the strict path of the generator for `offset`
    pub fn next_id(&self, offset: i64) -> Result<i64> {
        self.get_or_create(offset)?.next_id()
    }

    /// Next id on the clock-back tolerant path of the generator for `offset`
    pub fn next_id_tolerant(&self, offset: i64) -> Result<i64> {
        self.get_or_create(offset)?.next_id_tolerant()
    }

    pub fn next_id_with(&self, offset: i64, path: GenerationPath) -> Result<i64> {
        self.get_or_create(offset)?.next_id_with(path)
    }

    pub fn base_config(&self) -> &SnowflakeConfig {
        &self.base
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }
}

impl<C> std::fmt::Debug for WorkerRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerRegistry")
            .field("base", &self.base)
            .field("generators", &self.generators.len())
            .finish_non_exhaustive()
    }
}
