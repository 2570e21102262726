//! Process-wide default registry
//!
//! Backs the crate-level `next_id*` functions. Its node ids come from this
//! host's hardware address, resolved the first time an id is requested.
//! Code that needs its own configuration or isolated state should build a
//! [`WorkerRegistry`] instead.

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::config::SnowflakeConfig;
use crate::error::Result;
use crate::generator::Snowflake;
use crate::registry::WorkerRegistry;

static DEFAULT_REGISTRY: OnceCell<WorkerRegistry> = OnceCell::new();

/// The default registry, built from the host's node identity on first use
pub fn default_registry() -> Result<&'static WorkerRegistry> {
    DEFAULT_REGISTRY.get_or_try_init(|| {
        let config = SnowflakeConfig::builder().build()?;
        Ok(WorkerRegistry::new(config))
    })
}

/// Default generator for `offset`
pub fn default_generator(offset: i64) -> Result<Arc<Snowflake>> {
    default_registry()?.get_or_create(offset)
}

/// Next id from the default generator on the strict path
pub fn next_id() -> Result<i64> {
    next_id_with_offset(0)
}

/// Next id from the default registry's generator for `offset`, strict path
pub fn next_id_with_offset(offset: i64) -> Result<i64> {
    default_registry()?.next_id(offset)
}

/// Next id from the default registry's generator for `offset`, clock-back
/// tolerant path
pub fn next_id_tolerant(offset: i64) -> Result<i64> {
    default_registry()?.next_id_tolerant(offset)
}
