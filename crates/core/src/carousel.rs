//! Hero banner rotation.
//!
//! [`HeroRotation`] tracks which slide of the hero sequence is showing. A
//! rotation timer exists only when there is more than one slide; manual
//! navigation moves the index without touching the timer, while a change in
//! the sequence length tears the timer down and starts a fresh one.

use std::time::Duration;

/// Interval between automatic slide changes.
pub const HERO_ROTATION_INTERVAL: Duration = Duration::from_secs(5);

/// Rotation state for a hero sequence of `len` slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeroRotation {
    len: usize,
    index: usize,
    generation: u64,
}

impl HeroRotation {
    /// Start at the first slide.
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self {
            len,
            index: 0,
            generation: 0,
        }
    }

    /// Start at `index`, falling back to the first slide when out of range.
    #[must_use]
    pub const fn with_index(len: usize, index: usize) -> Self {
        Self {
            len,
            index: if index < len { index } else { 0 },
            generation: 0,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the timer interval, or `None` when one slide or fewer.
    #[must_use]
    pub const fn timer_interval(&self) -> Option<Duration> {
        if self.has_controls() {
            Some(HERO_ROTATION_INTERVAL)
        } else {
            None
        }
    }

    /// Whether previous/next/dot controls are enabled.
    #[must_use]
    pub const fn has_controls(&self) -> bool {
        self.len > 1
    }

    /// Incremented every time the timer is restarted.
    #[must_use]
    pub const fn timer_generation(&self) -> u64 {
        self.generation
    }

    /// Advance one slide on a timer fire.
    pub const fn tick(&mut self) {
        if self.has_controls() {
            self.index = (self.index + 1) % self.len;
        }
    }

    /// Move to the next slide, wrapping around.
    pub const fn next(&mut self) {
        if !self.is_empty() {
            self.index = (self.index + 1) % self.len;
        }
    }

    /// Move to the previous slide, wrapping around.
    pub const fn previous(&mut self) {
        if !self.is_empty() {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    /// Jump to `index`. Out-of-range requests are ignored.
    pub const fn select(&mut self, index: usize) {
        if index < self.len {
            self.index = index;
        }
    }

    /// The sequence length changed: restart the timer and keep the index
    /// only if it is still in range.
    pub const fn set_len(&mut self, len: usize) {
        self.len = len;
        self.generation += 1;
        if self.index >= len {
            self.index = 0;
        }
    }

    /// Index the "next" control points at.
    #[must_use]
    pub const fn next_index(&self) -> usize {
        let mut peek = *self;
        peek.next();
        peek.index
    }

    /// Index the "previous" control points at.
    #[must_use]
    pub const fn previous_index(&self) -> usize {
        let mut peek = *self;
        peek.previous();
        peek.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_wrap_modulo_len() {
        for n in 2..6 {
            let mut rotation = HeroRotation::new(n);
            for k in 1..=(3 * n) {
                rotation.tick();
                assert_eq!(rotation.index(), k % n);
            }
        }
    }

    #[test]
    fn test_single_or_empty_has_no_timer() {
        for n in 0..=1 {
            let mut rotation = HeroRotation::new(n);
            assert!(rotation.timer_interval().is_none());
            rotation.tick();
            assert_eq!(rotation.index(), 0);
        }
        assert_eq!(
            HeroRotation::new(2).timer_interval(),
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn test_manual_navigation_does_not_restart_timer() {
        let mut rotation = HeroRotation::new(3);
        rotation.previous();
        assert_eq!(rotation.index(), 2);
        rotation.next();
        assert_eq!(rotation.index(), 0);
        rotation.select(1);
        assert_eq!(rotation.index(), 1);
        rotation.select(9);
        assert_eq!(rotation.index(), 1);
        assert_eq!(rotation.timer_generation(), 0);
    }

    #[test]
    fn test_set_len_restarts_timer_and_resets_out_of_range_index() {
        let mut rotation = HeroRotation::with_index(4, 3);
        rotation.set_len(2);
        assert_eq!(rotation.index(), 0);
        assert_eq!(rotation.timer_generation(), 1);

        rotation.select(1);
        rotation.set_len(5);
        assert_eq!(rotation.index(), 1);
        assert_eq!(rotation.timer_generation(), 2);
    }

    #[test]
    fn test_with_index_out_of_range() {
        assert_eq!(HeroRotation::with_index(3, 7).index(), 0);
        assert_eq!(HeroRotation::with_index(3, 2).index(), 2);
    }

    #[test]
    fn test_control_targets() {
        let rotation = HeroRotation::with_index(3, 0);
        assert_eq!(rotation.previous_index(), 2);
        assert_eq!(rotation.next_index(), 1);
    }
}
