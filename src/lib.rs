//! # snowflake-worker
//!
//! Snowflake-style 64-bit unique id generation.
//!
//! ```text
//! | 0 | 41 bits ms since epoch | 5 bits data center | 5 bits worker | 12 bits sequence |
//! ```
//!
//! Ids from one generator are:
//! - 📈 Time-sorted
//! - 🔄 Strictly increasing (strict path)
//! - 🔒 Thread-safe
//! - 🌐 Distinct across nodes with distinct (worker, data center) pairs
//!
//! Two generation paths are available. The strict path fails when the clock
//! moves backwards; the clock-back tolerant path keeps going through short
//! regressions. See [`GenerationPath`].

#![forbid(unsafe_code)]

pub mod clock;
mod config;
mod error;
mod generator;
mod global;
pub mod layout;
pub mod node;
mod registry;

#[cfg(test)]
pub mod tests;

// Re-export main types
pub use clock::{ClockSource, SystemClock};
pub use config::{SnowflakeConfig, SnowflakeConfigBuilder, MAX_CACHE_SIZE};
pub use error::{Result, SnowflakeError};
pub use generator::{GenerationPath, Snowflake};
pub use global::{default_generator, default_registry, next_id, next_id_tolerant, next_id_with_offset};
pub use layout::{pack, unpack, IdParts, SnowflakeExtractor};
pub use node::{NodeId, NodeIdentity};
pub use registry::WorkerRegistry;
