use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

use crate::DiscogsApiError;

/// Client-side rate limiter for the catalog API.
///
/// Fixed one-minute window: the first call in a window starts the clock, and once the budget is spent every further
/// call fails with [`DiscogsApiError::RateLimited`] until the window rolls over. No queuing or sleeping happens here;
/// the caller decides whether to wait or to fail the request.
#[derive(Debug)]
pub struct RateLimiter {
    window: Duration,
    max_calls: u32,
    state: Mutex<WindowState>,
}

#[derive(Debug)]
struct WindowState {
    calls: u32,
    reset_at: Instant,
}

impl RateLimiter {
    pub fn new(max_calls_per_minute: u32) -> Self {
        Self::with_window(max_calls_per_minute, Duration::from_secs(60))
    }

    pub fn with_window(max_calls: u32, window: Duration) -> Self {
        let state = Mutex::new(WindowState { calls: 0, reset_at: Instant::now() + window });
        Self { window, max_calls, state }
    }

    /// Record one call against the current window, or fail if the budget is spent.
    pub fn check(&self) -> Result<(), DiscogsApiError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        if now >= state.reset_at {
            state.calls = 0;
            state.reset_at = now + self.window;
        }
        if state.calls >= self.max_calls {
            let wait_secs = state.reset_at.saturating_duration_since(now).as_secs().max(1);
            return Err(DiscogsApiError::RateLimited { wait_secs });
        }
        state.calls += 1;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn enforces_the_window_budget() {
        let limiter = RateLimiter::new(3);
        for _ in 0..3 {
            limiter.check().expect("call within budget");
        }
        match limiter.check() {
            Err(DiscogsApiError::RateLimited { wait_secs }) => assert!(wait_secs >= 1),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn window_rollover_resets_the_budget() {
        let limiter = RateLimiter::with_window(1, Duration::from_millis(10));
        limiter.check().expect("first call");
        assert!(limiter.check().is_err());
        std::thread::sleep(Duration::from_millis(15));
        limiter.check().expect("budget reset after window");
    }
}
