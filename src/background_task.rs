use tokio::time::interval;

use crate::limiter::rate_limiter::SubmissionLimiter;

/// Periodically drops idle keys from the guestbook/RSVP submission limiter.
pub async fn start_limiter_sweep(limiter: SubmissionLimiter) {
    let mut ticker = interval(limiter.window_size());

    loop {
        ticker.tick().await;

        let removed = limiter.sweep();
        if removed > 0 {
            tracing::debug!(
                removed,
                remaining = limiter.tracked_keys(),
                "Swept idle submission limiter keys"
            );
        }
    }
}
