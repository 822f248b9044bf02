//! Exponential backoff for reconnect attempts.
//!
//! Vendored in the same shape as `conductor_llm::retry::RetryConfig` rather
//! than shared across crates: the socket client's backoff loop runs forever
//! in a background task and never needs the chat-completion retry's
//! circuit-breaker half, so a local copy keeps the two concerns decoupled.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct BackoffConfig {
    pub initial: Duration,
    pub max: Duration,
    pub multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(250),
            max: Duration::from_secs(30),
            multiplier: 1.5,
        }
    }
}

/// Stateful backoff cursor: call `next()` after each failed attempt.
pub struct Backoff {
    config: BackoffConfig,
    current: Duration,
}

impl Backoff {
    pub fn new(config: BackoffConfig) -> Self {
        let current = config.initial;
        Self { config, current }
    }

    /// Returns the delay to sleep before the next attempt, then advances.
    pub fn next(&mut self) -> Duration {
        let delay = self.current;
        self.current = std::cmp::min(
            Duration::from_secs_f64(self.current.as_secs_f64() * self.config.multiplier),
            self.config.max,
        );
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.config.initial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_grows_and_caps_at_max() {
        let mut backoff = Backoff::new(BackoffConfig {
            initial: Duration::from_millis(100),
            max: Duration::from_millis(350),
            multiplier: 2.0,
        });
        assert_eq!(backoff.next(), Duration::from_millis(100));
        assert_eq!(backoff.next(), Duration::from_millis(200));
        assert_eq!(backoff.next(), Duration::from_millis(350));
        assert_eq!(backoff.next(), Duration::from_millis(350));
    }

    #[test]
    fn reset_returns_to_initial() {
        let mut backoff = Backoff::new(BackoffConfig::default());
        backoff.next();
        backoff.next();
        backoff.reset();
        assert_eq!(backoff.next(), BackoffConfig::default().initial);
    }
}
