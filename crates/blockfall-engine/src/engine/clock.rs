use std::time::Duration;

/// Turns monotonically increasing frame timestamps into per-tick elapsed
/// time for [`GameSession::tick`](super::GameSession::tick).
///
/// The first timestamp yields zero. An optional cap bounds a single step so a
/// suspended driver does not resume with one huge delta.
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::FrameClock;
///
/// let mut clock = FrameClock::new();
/// assert_eq!(clock.advance(Duration::from_millis(100)), Duration::ZERO);
/// assert_eq!(clock.advance(Duration::from_millis(116)), Duration::from_millis(16));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<Duration>,
    max_step: Option<Duration>,
}

impl FrameClock {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: None,
            max_step: None,
        }
    }

    #[must_use]
    pub const fn with_max_step(self, max_step: Duration) -> Self {
        Self {
            max_step: Some(max_step),
            ..self
        }
    }

    /// Records `now` and returns the time since the previous timestamp.
    ///
    /// A timestamp earlier than the previous one yields zero.
    pub fn advance(&mut self, now: Duration) -> Duration {
        let elapsed = self
            .last
            .map_or(Duration::ZERO, |last| now.saturating_sub(last));
        self.last = Some(now);
        match self.max_step {
            Some(max_step) => elapsed.min(max_step),
            None => elapsed,
        }
    }

    /// Forgets the previous timestamp; the next `advance` yields zero.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backwards_timestamp_is_zero() {
        let mut clock = FrameClock::new();
        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.advance(Duration::from_secs(4)), Duration::ZERO);
        assert_eq!(clock.advance(Duration::from_secs(6)), Duration::from_secs(2));
    }

    #[test]
    fn test_max_step_caps_delta() {
        let mut clock = FrameClock::new().with_max_step(Duration::from_millis(100));
        clock.advance(Duration::ZERO);
        assert_eq!(
            clock.advance(Duration::from_secs(30)),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::new();
        clock.advance(Duration::from_secs(1));
        clock.reset();
        assert_eq!(clock.advance(Duration::from_secs(9)), Duration::ZERO);
    }
}
