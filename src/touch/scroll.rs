//! Two-finger scroll: which two slots drive scrolling, and whether each moved this frame.

use super::frame::Metric;

/// Two-finger scroll is engaged with exactly two contacts and no button, or
/// three contacts while a button is held (the third is the clicking finger).
pub fn scroll_engaged(active_touches: usize, depressed: bool) -> bool {
    (active_touches == 2 && !depressed) || (active_touches == 3 && depressed)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrollSelector {
    pins: [Option<usize>; 2],
    /// Indexed by metric, then by scroll finger.
    moved: [[bool; 2]; 2],
}

impl ScrollSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one position update from `slot`.
    ///
    /// While engaged, the first slot to report becomes finger 0 and the next
    /// distinct slot becomes finger 1. Leaving the engaged state drops both.
    pub fn observe(&mut self, slot: usize, metric: Metric, engaged: bool) {
        if !engaged {
            self.reset();
            return;
        }

        match self.pins {
            [None, _] => self.pins = [Some(slot), None],
            [Some(first), None] if first != slot => self.pins[1] = Some(slot),
            _ => {}
        }

        if let Some(finger) = self.finger_index(slot) {
            self.moved[metric.index()][finger] = true;
        }
    }

    pub fn finger_index(&self, slot: usize) -> Option<usize> {
        self.pins.iter().position(|&pin| pin == Some(slot))
    }

    pub fn pins(&self) -> [Option<usize>; 2] {
        self.pins
    }

    pub fn moved(&self, metric: Metric) -> [bool; 2] {
        self.moved[metric.index()]
    }

    /// Start of a new frame: nobody has moved yet.
    pub fn clear_moved(&mut self) {
        self.moved = [[false; 2]; 2];
    }

    pub fn reset(&mut self) {
        self.pins = [None, None];
        self.clear_moved();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engaged_condition() {
        assert!(scroll_engaged(2, false));
        assert!(!scroll_engaged(2, true));
        assert!(scroll_engaged(3, true));
        assert!(!scroll_engaged(3, false));
        assert!(!scroll_engaged(1, false));
    }

    #[test]
    fn test_pins_in_first_seen_order() {
        let mut sel = ScrollSelector::new();
        sel.observe(3, Metric::X, true);
        sel.observe(3, Metric::Y, true);
        assert_eq!(sel.pins(), [Some(3), None]);

        sel.observe(1, Metric::Y, true);
        assert_eq!(sel.pins(), [Some(3), Some(1)]);
        assert_eq!(sel.moved(Metric::X), [true, false]);
        assert_eq!(sel.moved(Metric::Y), [true, true]);

        // A third slot never displaces the pins.
        sel.observe(0, Metric::X, true);
        assert_eq!(sel.pins(), [Some(3), Some(1)]);
        assert_eq!(sel.finger_index(0), None);
    }

    #[test]
    fn test_disengage_clears_everything() {
        let mut sel = ScrollSelector::new();
        sel.observe(0, Metric::X, true);
        sel.observe(1, Metric::X, true);
        sel.observe(1, Metric::Y, false);
        assert_eq!(sel, ScrollSelector::new());
    }

    #[test]
    fn test_moved_flags_reset_per_frame() {
        let mut sel = ScrollSelector::new();
        sel.observe(0, Metric::X, true);
        sel.clear_moved();
        assert_eq!(sel.moved(Metric::X), [false, false]);
        assert_eq!(sel.pins(), [Some(0), None]);
    }
}
