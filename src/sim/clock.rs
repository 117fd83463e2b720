/// Step counter for one episode over a lagged time series.
///
/// For a series of `len` rows and a lag of `lag`, the action taken at step
/// `t` is evaluated against row `t + lag`, and the episode is done once the
/// step index reaches `len - lag - 1`.
///
/// # Examples
///
/// ```
/// use energy_gym::sim::clock::EpisodeClock;
///
/// let mut clock = EpisodeClock::new(5, 1).unwrap();
/// assert_eq!(clock.evaluation_index(), 1);
/// let mut done = Vec::new();
/// while !clock.is_done() {
///     done.push(clock.advance());
/// }
/// assert_eq!(done, vec![false, false, true]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeClock {
    /// Current step of the episode
    step: usize,
    /// Row offset between decision and evaluation
    lag: usize,
    /// Step index at which the episode is done
    terminal: usize,
}

impl EpisodeClock {
    /// Creates a clock at step zero.
    ///
    /// # Returns
    ///
    /// * `Some(clock)` - When the series allows at least one step (`len >= lag + 2`)
    /// * `None` - Otherwise
    pub fn new(len: usize, lag: usize) -> Option<Self> {
        let terminal = len.checked_sub(lag + 1).filter(|&t| t > 0)?;
        Some(Self {
            step: 0,
            lag,
            terminal,
        })
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn lag(&self) -> usize {
        self.lag
    }

    /// Step index at which the episode terminates.
    pub fn terminal(&self) -> usize {
        self.terminal
    }

    /// Row used to evaluate the action taken at the current step.
    pub fn evaluation_index(&self) -> usize {
        self.step + self.lag
    }

    pub fn is_done(&self) -> bool {
        self.step >= self.terminal
    }

    /// Advances one step and returns whether the episode is now done.
    pub fn advance(&mut self) -> bool {
        self.step += 1;
        self.is_done()
    }

    /// Returns the clock to step zero.
    pub fn rewind(&mut self) {
        self.step = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock() {
        let clock = EpisodeClock::new(10, 2).unwrap();
        assert_eq!(clock.step(), 0);
        assert_eq!(clock.terminal(), 7);
        assert_eq!(clock.evaluation_index(), 2);
    }

    #[test]
    fn test_too_short_for_lag() {
        assert!(EpisodeClock::new(2, 1).is_none());
        assert!(EpisodeClock::new(0, 0).is_none());
        assert!(EpisodeClock::new(1, 0).is_none());
        assert!(EpisodeClock::new(3, 1).is_some());
    }

    #[test]
    fn test_done_exactly_at_terminal() {
        // L = 6, G = 2 → done when step == 3
        let mut clock = EpisodeClock::new(6, 2).unwrap();
        assert!(!clock.advance());
        assert!(!clock.advance());
        assert!(clock.advance());
        assert_eq!(clock.step(), 3);
    }

    #[test]
    fn test_rewind() {
        let mut clock = EpisodeClock::new(4, 0).unwrap();
        clock.advance();
        clock.advance();
        clock.rewind();
        assert_eq!(clock.step(), 0);
        assert!(!clock.is_done());
    }
}
