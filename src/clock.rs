//! Time sources for id generation
//!
//! Generators read the clock through [`ClockSource`] so tests can substitute a
//! clock that jumps backwards or stands still on demand.

use std::sync::Arc;

use chrono::Utc;

/// Source of the current time in milliseconds since the Unix epoch.
///
/// Implementations are shared between threads, so reads take `&self`.
pub trait ClockSource: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall clock. Subject to NTP corrections and VM migration, which is exactly
/// why the generators have to cope with it moving backwards.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    #[inline(always)]
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

impl<C: ClockSource + ?Sized> ClockSource for Arc<C> {
    #[inline(always)]
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}

impl<C: ClockSource + ?Sized> ClockSource for &C {
    #[inline(always)]
    fn now_millis(&self) -> i64 {
        (**self).now_millis()
    }
}
