use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

use rtm_model::CHECKSUM_KEY;

/// Wall clock in whole unix seconds.
pub trait Clock: Send + Sync + 'static {
    fn unix_seconds(&self) -> u64;
}

/// [`Clock`] reading [`SystemTime::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Source of restart checksums.
///
/// Values follow the clock but never repeat within a process: two restarts
/// in the same second get `t` and `t + 1`.
pub struct RestartStamp {
    clock: Arc<dyn Clock>,
    last: AtomicU64,
}

impl RestartStamp {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: AtomicU64::new(0),
        }
    }

    /// Next stamp, strictly greater than every stamp handed out before.
    pub fn next(&self) -> u64 {
        let now = self.clock.unix_seconds();
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }

    /// `podAnnotations.checksum=v<stamp>`
    pub fn next_assignment(&self) -> String {
        format!("{CHECKSUM_KEY}=v{}", self.next())
    }
}

impl Default for RestartStamp {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
