//! @ai:module:intent Request pacing for remote chat endpoints, including server-requested back-off
//! @ai:module:layer infrastructure
//! @ai:module:public_api RateLimiter, retry_after
//! @ai:module:stateless false

use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Longest pause a `retry-after` header can impose on one adapter.
pub const MAX_RETRY_AFTER: Duration = Duration::from_secs(120);

/// @ai:intent Paces requests to a configured rate per minute and honors 429 back-off
/// @ai:invariant a burst of up to `requests_per_minute` calls is admitted immediately
/// @ai:invariant after `back_off`, no call is admitted before the pause ends
pub struct RateLimiter {
    /// Spacing between calls once the burst allowance is used up
    interval: Duration,
    /// How far ahead of real time the schedule may run before callers wait
    burst: Duration,
    /// Theoretical time the next call would be admitted with no burst allowance
    next_free: Mutex<Instant>,
}

impl RateLimiter {
    /// @ai:intent Limiter for `requests_per_minute`; zero is treated as one
    /// @ai:effects pure
    pub fn new(requests_per_minute: u32) -> Self {
        let rpm = requests_per_minute.max(1);
        let interval = Duration::from_secs_f64(60.0 / rpm as f64);

        Self {
            interval,
            burst: interval * (rpm - 1),
            next_free: Mutex::new(Instant::now()),
        }
    }

    /// @ai:intent Reserve the next slot and sleep until it starts
    /// @ai:effects time
    pub async fn acquire(&self) {
        let slot = {
            let mut next_free = self.next_free.lock().await;
            let now = Instant::now();
            let start = (*next_free).max(now);
            *next_free = start + self.interval;

            start
                .checked_sub(self.burst)
                .map_or(now, |earliest| earliest.max(now))
        };

        let delay = slot.saturating_duration_since(Instant::now());
        if !delay.is_zero() {
            tracing::debug!("Remote request paced, waiting {:?}", delay);
            tokio::time::sleep_until(slot).await;
        }
    }

    /// @ai:intent React to a rate-limited reply: spend the burst allowance and pause
    /// @ai:post the next acquire resumes no earlier than now + pause, then at the paced interval
    /// @ai:effects time
    pub async fn back_off(&self, pause: Option<Duration>) {
        let pause = pause.unwrap_or_default().min(MAX_RETRY_AFTER);
        let resume = Instant::now() + pause;

        let mut next_free = self.next_free.lock().await;
        *next_free = (*next_free).max(resume + self.burst);

        tracing::info!("Remote endpoint asked to slow down, pausing {:?}", pause);
    }
}

/// @ai:intent Delay carried by a `retry-after` header given in whole seconds
/// @ai:effects pure
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqwest::header::HeaderValue;

    #[tokio::test]
    async fn test_burst_is_admitted_immediately() {
        let limiter = RateLimiter::new(60);

        let start = std::time::Instant::now();
        for _ in 0..10 {
            limiter.acquire().await;
        }

        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_calls_past_the_burst_are_paced() {
        let limiter = RateLimiter::new(600);

        for _ in 0..600 {
            limiter.acquire().await;
        }

        let start = std::time::Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[tokio::test]
    async fn test_zero_rate_admits_first_call() {
        let limiter = RateLimiter::new(0);

        let start = std::time::Instant::now();
        limiter.acquire().await;

        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_back_off_pauses_a_full_bucket() {
        let limiter = RateLimiter::new(600);
        limiter.back_off(Some(Duration::from_millis(300))).await;

        let start = std::time::Instant::now();
        limiter.acquire().await;

        assert!(start.elapsed() >= Duration::from_millis(280));
    }

    #[tokio::test]
    async fn test_back_off_without_delay_drains_burst() {
        let limiter = RateLimiter::new(600);
        limiter.back_off(None).await;

        let start = std::time::Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));

        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[test]
    fn test_retry_after_seconds() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(7)));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2026 07:28:00 GMT"));
        assert_eq!(retry_after(&headers), None);
    }
}
