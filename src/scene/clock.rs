/// The simulation clock. The render loop feeds it real frame deltas; every
/// periodic transform in the scene is derived from `now()`.
///
/// Pausing freezes the value without stopping the render loop, so a paused
/// scene can still be re-drawn with the frozen time. Time never decreases.
#[derive(Debug, Clone)]
pub struct SimClock {
    time: f64,
    paused: bool,
}

impl SimClock {
    pub fn new() -> Self {
        SimClock {
            time: 0.0,
            paused: false,
        }
    }

    pub fn now(&self) -> f64 {
        self.time
    }

    /// Advance by `dt`. Ignored while paused; negative deltas are clamped
    /// away so the clock stays non-decreasing.
    pub fn advance(&mut self, dt: f64) {
        if !self.paused {
            self.time += f64::max(dt, 0.0);
        }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Default for SimClock {
    fn default() -> Self {
        SimClock::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advances_monotonically() {
        let mut clock = SimClock::new();
        clock.advance(1.5);
        clock.advance(0.25);
        assert_eq!(clock.now(), 1.75);

        // Negative deltas must not rewind
        clock.advance(-10.0);
        assert_eq!(clock.now(), 1.75);
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut clock = SimClock::new();
        clock.advance(2.0);
        clock.pause();
        clock.advance(5.0);
        assert_eq!(clock.now(), 2.0);
        assert!(clock.is_paused());

        clock.resume();
        clock.advance(1.0);
        assert_eq!(clock.now(), 3.0);
    }
}
