use std::time::Duration;
use tokio::time::Instant;

/// Lets at most one frame through per `interval`; everything in between is dropped.
#[derive(Debug, Clone)]
pub struct FrameThrottler {
    interval: Duration,
    last_emitted: Option<Instant>,
}

impl FrameThrottler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emitted: None,
        }
    }

    /// Returns true when the frame captured at `at` should be processed.
    /// Timestamps that go backwards are treated as zero elapsed time.
    pub fn should_process(&mut self, at: Instant) -> bool {
        let due = match self.last_emitted {
            None => true,
            Some(last) => at.saturating_duration_since(last) >= self.interval,
        };

        if due {
            self.last_emitted = Some(at);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_always_passes() {
        let mut throttler = FrameThrottler::new(Duration::from_millis(500));
        assert!(throttler.should_process(Instant::now()));
    }

    #[test]
    fn drops_frames_inside_the_interval() {
        let start = Instant::now();
        let mut throttler = FrameThrottler::new(Duration::from_millis(500));

        // 30 fps for two seconds
        let passed = (0..60)
            .map(|i| start + Duration::from_millis(i * 33))
            .filter(|at| throttler.should_process(*at))
            .count();

        // 0, 528, 1056, 1584 ms
        assert_eq!(passed, 4);
    }

    #[test]
    fn cadence_is_measured_from_last_emission() {
        let start = Instant::now();
        let mut throttler = FrameThrottler::new(Duration::from_millis(500));

        assert!(throttler.should_process(start));
        assert!(!throttler.should_process(start + Duration::from_millis(499)));
        assert!(throttler.should_process(start + Duration::from_millis(500)));
        assert!(!throttler.should_process(start + Duration::from_millis(900)));
        assert!(throttler.should_process(start + Duration::from_millis(1700)));
    }

    #[test]
    fn backwards_timestamp_is_throttled() {
        let start = Instant::now() + Duration::from_secs(10);
        let mut throttler = FrameThrottler::new(Duration::from_millis(500));

        assert!(throttler.should_process(start));
        assert!(!throttler.should_process(start - Duration::from_secs(5)));
    }
}
