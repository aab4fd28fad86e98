//! Tracks the rendered width of a résumé item's thumbnail container.
//!
//! The measurements come from the container's resize observation (content-box
//! size), which the UI attaches with the element and detaches with it.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewportWidthTracker {
    width: u32,
}

impl ViewportWidthTracker {
    /// Records a measured width in CSS pixels. Returns `true` when the whole-pixel
    /// width changed; sub-pixel jitter and bogus values are ignored.
    pub fn observe(&mut self, width_px: f64) -> bool {
        if !width_px.is_finite() || width_px < 0.0 {
            return false;
        }
        let width = width_px.round() as u32;
        if width == self.width {
            return false;
        }
        self.width = width;
        true
    }

    /// Current width, zero until the first real measurement.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Width to render at, `None` while nothing has been measured.
    pub fn target(&self) -> Option<u32> {
        (self.width > 0).then_some(self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_start_unmeasured() {
        let tracker = ViewportWidthTracker::default();
        assert_eq!(tracker.width(), 0);
        assert_eq!(tracker.target(), None);
    }

    #[test]
    fn should_follow_resizes() {
        let mut tracker = ViewportWidthTracker::default();
        assert!(tracker.observe(240.0));
        assert_eq!(tracker.target(), Some(240));

        assert!(tracker.observe(512.4));
        assert_eq!(tracker.width(), 512);

        // shrinking back to nothing defers rendering again
        assert!(tracker.observe(0.0));
        assert_eq!(tracker.target(), None);
    }

    #[test]
    fn should_ignore_jitter_and_garbage() {
        let mut tracker = ViewportWidthTracker::default();
        tracker.observe(300.0);

        assert!(!tracker.observe(300.3));
        assert!(!tracker.observe(299.6));
        assert!(!tracker.observe(f64::NAN));
        assert!(!tracker.observe(-20.0));
        assert_eq!(tracker.width(), 300);
    }
}
