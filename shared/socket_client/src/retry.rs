use std::time::Duration;

///
/// Exponential backoff with an upper bound on both the delay and the number of attempts.
///
/// Delay before attempt `n` (counting from 1) is `min(base_delay * 2^(n-1), max_delay)`.
///
#[derive(Debug, Clone)]
pub struct Backoff {
    base_delay: Duration,
    max_delay: Duration,
    max_attempts: u32,

    attempt: u32,
}

impl Backoff {
    pub fn new(base_delay: Duration, max_delay: Duration, max_attempts: u32) -> Self {
        Self {
            base_delay,
            max_delay,
            max_attempts,
            attempt: 0,
        }
    }

    ///
    /// Registers next attempt.
    ///
    /// ### Returns
    /// delay to wait before the attempt or `None` when all attempts were used
    ///
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempt >= self.max_attempts {
            return None;
        }

        self.attempt += 1;
        let factor = 1u32.checked_shl(self.attempt - 1).unwrap_or(u32::MAX);
        let delay = self.base_delay.saturating_mul(factor).min(self.max_delay);

        Some(delay)
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}
