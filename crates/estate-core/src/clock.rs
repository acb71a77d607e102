//! Monotonic tick counter driving the scheduler.
//!
//! Every periodic pass is derived from the tick number with a modulo
//! check, so the counter is the only temporal state the scheduler keeps.

/// Errors that can occur during clock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Tick counter. Starts at 0; the first tick processed is tick 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickClock {
    tick: u64,
}

impl TickClock {
    /// A clock at tick 0.
    pub const fn new() -> Self {
        Self { tick: 0 }
    }

    /// A clock resumed at `tick`.
    pub const fn at(tick: u64) -> Self {
        Self { tick }
    }

    /// Advance by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub const fn advance(&mut self) -> Result<u64, ClockError> {
        match self.tick.checked_add(1) {
            Some(next) => {
                self.tick = next;
                Ok(next)
            }
            None => Err(ClockError::TickOverflow),
        }
    }

    /// Current tick number.
    pub const fn tick(self) -> u64 {
        self.tick
    }

    /// Whether a pass with period `interval` falls on the current tick.
    /// An interval of 0 is never due.
    pub const fn is_due(self, interval: u64) -> bool {
        match self.tick.checked_rem(interval) {
            Some(rem) => rem == 0 && self.tick > 0,
            None => false,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn advance_increments() {
        let mut clock = TickClock::new();
        assert_eq!(clock.advance().unwrap(), 1);
        assert_eq!(clock.advance().unwrap(), 2);
        assert_eq!(clock.tick(), 2);
    }

    #[test]
    fn advance_overflow_is_an_error() {
        let mut clock = TickClock::at(u64::MAX);
        assert_eq!(clock.advance(), Err(ClockError::TickOverflow));
        assert_eq!(clock.tick(), u64::MAX);
    }

    #[test]
    fn due_on_multiples_only() {
        let mut clock = TickClock::new();
        assert!(!clock.is_due(200));
        let mut due = Vec::new();
        for _ in 0..600 {
            clock.advance().unwrap();
            if clock.is_due(200) {
                due.push(clock.tick());
            }
        }
        assert_eq!(due, vec![200, 400, 600]);
    }

    #[test]
    fn zero_interval_is_never_due() {
        let clock = TickClock::at(100);
        assert!(!clock.is_due(0));
    }
}
