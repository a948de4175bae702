use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;

/// Sliding window counter. The previous window's count is weighted by how
/// much of it still overlaps the current one.
#[derive(Debug)]
struct SlidingWindow {
    window_size: Duration,
    limit: u64,
    current_window_start: Instant,
    current_count: u64,
    prev_count: u64,
    last_seen: Instant,
}

impl SlidingWindow {
    fn new(window_size: Duration, limit: u64, now: Instant) -> Self {
        Self {
            window_size,
            limit,
            current_window_start: now,
            current_count: 0,
            prev_count: 0,
            last_seen: now,
        }
    }

    /// Returns `Ok(())` when allowed, otherwise the seconds until a retry may succeed.
    fn allow(&mut self, now: Instant) -> Result<(), u64> {
        self.last_seen = now;
        let mut elapsed = now.duration_since(self.current_window_start);

        if elapsed >= self.window_size * 2 {
            self.prev_count = 0;
            self.current_count = 0;
            self.current_window_start = now;
            elapsed = Duration::ZERO;
        } else if elapsed >= self.window_size {
            self.prev_count = self.current_count;
            self.current_count = 0;
            self.current_window_start += self.window_size;
            elapsed = now.duration_since(self.current_window_start);
        }

        let weight = elapsed.as_secs_f64() / self.window_size.as_secs_f64();
        let effective = (self.prev_count as f64) * (1.0 - weight) + (self.current_count as f64);

        if effective < self.limit as f64 {
            self.current_count += 1;
            Ok(())
        } else {
            let remaining = self.window_size.saturating_sub(elapsed).as_secs();
            Err(remaining.max(1))
        }
    }
}

/// Per-key limiter for public submissions (guestbook entries, RSVPs).
#[derive(Clone)]
pub struct SubmissionLimiter {
    map: Arc<DashMap<String, Arc<Mutex<SlidingWindow>>>>,
    window_size: Duration,
    limit: u64,
}

impl SubmissionLimiter {
    pub fn new(limit: u64, window_size: Duration) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            window_size,
            limit: limit.max(1),
        }
    }

    pub fn check(&self, key: &str) -> Result<(), u64> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), u64> {
        let window = self
            .map
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SlidingWindow::new(self.window_size, self.limit, now))))
            .clone();

        let mut window = window.lock();
        window.allow(now)
    }

    /// Drops keys idle for more than two windows. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let idle_after = self.window_size * 2;
        let before = self.map.len();
        self.map.retain(|_, window| now.duration_since(window.lock().last_seen) <= idle_after);
        before - self.map.len()
    }

    pub fn tracked_keys(&self) -> usize {
        self.map.len()
    }

    pub fn window_size(&self) -> Duration {
        self.window_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_after_limit_within_window() {
        let limiter = SubmissionLimiter::new(2, Duration::from_secs(60));
        let start = Instant::now();

        assert!(limiter.check_at("203.0.113.7", start).is_ok());
        assert!(limiter.check_at("203.0.113.7", start).is_ok());
        let retry = limiter.check_at("203.0.113.7", start).unwrap_err();
        assert!(retry >= 1);

        assert!(limiter.check_at("198.51.100.2", start).is_ok());
    }

    #[test]
    fn allows_again_once_old_window_has_passed() {
        let limiter = SubmissionLimiter::new(1, Duration::from_secs(10));
        let start = Instant::now();

        assert!(limiter.check_at("guest", start).is_ok());
        assert!(limiter.check_at("guest", start + Duration::from_secs(5)).is_err());
        assert!(limiter.check_at("guest", start + Duration::from_secs(25)).is_ok());
    }
}
