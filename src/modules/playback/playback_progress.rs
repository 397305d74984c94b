/// Represents the current state of track playback progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackProgress {
    elapsed: f64,
    total: f64,
}

impl PlaybackProgress {
    /// Creates a new PlaybackProgress instance
    ///
    /// # Returns
    /// * `Some(PlaybackProgress)` if total duration is known (> 0)
    /// * `None` if total duration is unknown or not a number
    pub fn new(elapsed: f64, total: f64) -> Option<Self> {
        if !total.is_finite() || total <= 0.0 {
            return None;
        }

        Some(Self {
            elapsed: elapsed.clamp(0.0, total),
            total,
        })
    }

    /// Returns the ratio of progress (0.0 to 1.0)
    pub fn ratio(&self) -> f64 {
        (self.elapsed / self.total).clamp(0.0, 1.0)
    }

    /// Whole-number percentage for display
    pub fn percentage(&self) -> u8 {
        (self.ratio() * 100.0).floor() as u8
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn total(&self) -> f64 {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_total_has_no_progress() {
        assert!(PlaybackProgress::new(3.0, 0.0).is_none());
        assert!(PlaybackProgress::new(3.0, f64::NAN).is_none());
    }

    #[test]
    fn elapsed_is_clamped_to_total() {
        let progress = PlaybackProgress::new(500.0, 200.0).unwrap();
        assert_eq!(progress.elapsed(), 200.0);
        assert_eq!(progress.ratio(), 1.0);
        assert_eq!(progress.percentage(), 100);
    }

    #[test]
    fn percentage_rounds_down() {
        let progress = PlaybackProgress::new(34.0, 190.0).unwrap();
        assert_eq!(progress.percentage(), 17);
        assert_eq!(progress.total(), 190.0);
    }
}
