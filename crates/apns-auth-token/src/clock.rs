//! Time source for issued-at claims

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

/// Supplies the current time when a token is generated without an explicit
/// issued-at hint
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current wall-clock time
    fn now(&self) -> SystemTime;
}

/// [`Clock`] backed by [`SystemTime::now`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> SystemTime {
        (**self).now()
    }
}
