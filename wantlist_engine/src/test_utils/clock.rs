use std::sync::atomic::{AtomicI64, Ordering};

use crate::cache::Clock;

/// A clock that only moves when told to. Lets tests cross TTL boundaries without sleeping.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(epoch: i64) -> Self {
        Self { now: AtomicI64::new(epoch) }
    }

    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }

    pub fn set(&self, epoch: i64) {
        self.now.store(epoch, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_epoch(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
