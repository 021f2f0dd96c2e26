//! Caret blink clock.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlinkPhase {
    pub on: bool,
    /// When the caret next toggles; `None` once blinking stopped.
    pub next_toggle: Option<Instant>,
}

#[derive(Debug, Clone)]
pub struct Blink {
    period: Duration,
    max: Duration,
    start: Option<Instant>,
}

impl Blink {
    pub fn new(blinks_per_second: u16, max: Duration) -> Self {
        let period = Duration::from_secs(1) / u32::from(blinks_per_second.max(1));
        Self {
            period,
            max,
            start: None,
        }
    }

    /// Restart the cycle in the on phase.
    pub fn reset(&mut self, now: Instant) {
        self.start = Some(now);
    }

    pub fn phase(&self, now: Instant, focused: bool) -> BlinkPhase {
        if !focused {
            return BlinkPhase {
                on: false,
                next_toggle: None,
            };
        }
        let dt = self
            .start
            .map_or(self.max, |start| now.saturating_duration_since(start));
        if dt >= self.max {
            return BlinkPhase {
                on: true,
                next_toggle: None,
            };
        }
        let period = self.period.as_nanos().max(2);
        let half = period / 2;
        let dt = dt.as_nanos();
        let wait = (half - dt % half) as u64;
        BlinkPhase {
            on: dt % period < half,
            next_toggle: Some(now + Duration::from_nanos(wait)),
        }
    }
}
