//! Per-question countdown timer.
//!
//! The timer reads no clock. It is advanced by host-supplied deltas and
//! reports expiry exactly once per arm cycle.

/// Outcome of advancing the timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerTick {
    /// Timer is disarmed; nothing happened.
    Idle,
    /// Timer is still running.
    Running {
        /// Seconds left.
        remaining: f32,
    },
    /// Timer reached zero on this advance and is now disarmed.
    Expired,
}

/// Slack allowed when comparing consumed time against the limit.
///
/// Host deltas are `f32`; a limit split into equal frames (`limit / n`) can
/// sum a few ulps short of the limit.
const EXPIRY_TOLERANCE_SECONDS: f64 = 1e-4;

/// Countdown for the question currently awaiting an answer.
///
/// Consumed time is accumulated in `f64` so the expiry check depends only on
/// the total of the deltas, not on how they were split.
#[derive(Debug, Clone, Default)]
pub struct QuestionTimer {
    limit: f32,
    consumed: f64,
    armed: bool,
}

impl QuestionTimer {
    /// Create a disarmed timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm with a limit in seconds. A limit of zero or less leaves the timer disarmed.
    ///
    /// Re-arming discards any leftover time.
    pub fn arm(&mut self, limit_seconds: f32) {
        if limit_seconds > 0.0 {
            self.limit = limit_seconds;
            self.consumed = 0.0;
            self.armed = true;
        } else {
            self.disarm();
        }
    }

    /// Stop the countdown.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Advance by `delta_seconds`. Negative and NaN deltas count as zero.
    pub fn advance(&mut self, delta_seconds: f32) -> TimerTick {
        if !self.armed {
            return TimerTick::Idle;
        }

        self.consumed += f64::from(delta_seconds.max(0.0));
        if self.consumed + EXPIRY_TOLERANCE_SECONDS >= f64::from(self.limit) {
            self.consumed = f64::from(self.limit);
            self.armed = false;
            TimerTick::Expired
        } else {
            TimerTick::Running {
                remaining: self.left(),
            }
        }
    }

    fn left(&self) -> f32 {
        (f64::from(self.limit) - self.consumed).max(0.0) as f32
    }

    /// Whether a countdown is running.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Seconds left, if armed.
    pub fn remaining(&self) -> Option<f32> {
        self.armed.then(|| self.left())
    }

    /// Limit of the most recent arm cycle.
    pub fn limit(&self) -> f32 {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_positive_limit_stays_disarmed() {
        let mut timer = QuestionTimer::new();
        timer.arm(0.0);
        assert!(!timer.is_armed());
        timer.arm(-3.0);
        assert!(!timer.is_armed());
        assert_eq!(timer.advance(100.0), TimerTick::Idle);
    }

    #[test]
    fn test_expires_exactly_once() {
        let mut timer = QuestionTimer::new();
        timer.arm(5.0);

        assert_eq!(timer.advance(2.0), TimerTick::Running { remaining: 3.0 });
        assert_eq!(timer.advance(4.0), TimerTick::Expired);
        assert_eq!(timer.advance(1.0), TimerTick::Idle);
        assert_eq!(timer.remaining(), None);
    }

    #[test]
    fn test_exact_limit_expires() {
        let mut timer = QuestionTimer::new();
        timer.arm(5.0);
        assert_eq!(timer.advance(5.0), TimerTick::Expired);
    }

    #[test]
    fn test_equal_frames_summing_to_limit_expire() {
        for (limit, frames) in [(5.0f32, 50u32), (1.0, 60), (3.0, 10), (7.0, 3), (0.5, 144)] {
            let mut timer = QuestionTimer::new();
            timer.arm(limit);
            let delta = limit / frames as f32;

            let ticks: Vec<TimerTick> = (0..frames).map(|_| timer.advance(delta)).collect();
            let expired = ticks.iter().filter(|t| **t == TimerTick::Expired).count();
            assert_eq!(expired, 1, "limit {limit} in {frames} frames");
            assert_eq!(ticks.last(), Some(&TimerTick::Expired));
        }
    }

    #[test]
    fn test_tenth_second_frames_expire_at_five_seconds() {
        let mut timer = QuestionTimer::new();
        timer.arm(5.0);
        for _ in 0..49 {
            assert!(matches!(timer.advance(0.1), TimerTick::Running { .. }));
        }
        assert_eq!(timer.advance(0.1), TimerTick::Expired);
    }

    #[test]
    fn test_rearm_discards_leftover() {
        let mut timer = QuestionTimer::new();
        timer.arm(10.0);
        timer.advance(7.0);
        timer.arm(4.0);
        assert_eq!(timer.remaining(), Some(4.0));
        assert_eq!(timer.limit(), 4.0);
    }

    #[test]
    fn test_negative_and_nan_deltas_ignored() {
        let mut timer = QuestionTimer::new();
        timer.arm(2.0);
        assert_eq!(timer.advance(-1.0), TimerTick::Running { remaining: 2.0 });
        assert_eq!(timer.advance(f32::NAN), TimerTick::Running { remaining: 2.0 });
    }

    #[test]
    fn test_disarm_stops_countdown() {
        let mut timer = QuestionTimer::new();
        timer.arm(2.0);
        timer.disarm();
        assert_eq!(timer.advance(5.0), TimerTick::Idle);
    }
}
