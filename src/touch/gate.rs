//! Decisions about what a contact is allowed to surface. Everything here is a
//! pure function of its inputs so the heuristics can be tested on their own.

use serde::Deserialize;

use super::slot::Bounds;

/// Rectangle in device coordinates where new contacts are surfaced as touches.
/// A missing edge does not constrain that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivityArea {
    pub left: Option<i32>,
    pub right: Option<i32>,
    pub top: Option<i32>,
    pub bottom: Option<i32>,
}

impl ActivityArea {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        !(self.left.is_some_and(|left| x < left)
            || self.right.is_some_and(|right| x > right)
            || self.top.is_some_and(|top| y < top)
            || self.bottom.is_some_and(|bottom| y > bottom))
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if let (Some(left), Some(right)) = (self.left, self.right) {
            if left >= right {
                return Err("activity area left edge must be less than its right edge");
            }
        }
        if let (Some(top), Some(bottom)) = (self.top, self.bottom) {
            if top >= bottom {
                return Err("activity area top edge must be less than its bottom edge");
            }
        }
        Ok(())
    }
}

/// Whether a newly born contact lies in the activity area. `None` while its
/// coordinates are still unknown.
///
/// Semi-multitouch pads only know the box spanned by all contacts: the min
/// corner must be inside, and the max corner too once more than one contact is down.
pub fn contact_in_area(
    area: &ActivityArea,
    semi_mt: bool,
    position: Option<(i32, i32)>,
    bounds: Option<Bounds>,
    active_touches: usize,
) -> Option<bool> {
    if semi_mt {
        let b = bounds?;
        return Some(
            area.contains(b.min_x, b.min_y)
                && (active_touches <= 1 || area.contains(b.max_x, b.max_y)),
        );
    }
    position.map(|(x, y)| area.contains(x, y))
}

/// What to do with the begin notification for a newly born contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchGate {
    /// Send the begin now.
    Emit,
    /// Track the contact but never surface it.
    Suppress,
    /// Coordinates unknown; decide at the next flush.
    Defer,
}

pub fn birth_gate(in_area: Option<bool>, semi_mt: bool, depressed: bool) -> TouchGate {
    match in_area {
        None => TouchGate::Defer,
        Some(_) if semi_mt => TouchGate::Suppress,
        Some(false) => TouchGate::Suppress,
        Some(true) if depressed => TouchGate::Suppress,
        Some(true) => TouchGate::Emit,
    }
}

/// While the button is down with two or more contacts, the finger that
/// pressed it is anchoring the click; its motion must not move the pointer.
pub fn press_suppresses(
    slot: usize,
    pressing_slot: Option<usize>,
    depressed: bool,
    active_touches: usize,
) -> bool {
    depressed && active_touches >= 2 && pressing_slot == Some(slot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> ActivityArea {
        ActivityArea {
            left: Some(100),
            right: Some(900),
            top: Some(50),
            bottom: None,
        }
    }

    #[test]
    fn test_area_edges() {
        let a = area();
        assert!(a.contains(100, 50));
        assert!(a.contains(900, 10_000));
        assert!(!a.contains(99, 60));
        assert!(!a.contains(901, 60));
        assert!(!a.contains(500, 49));
        assert!(ActivityArea::unbounded().contains(i32::MIN, i32::MAX));
    }

    #[test]
    fn test_area_validation() {
        assert!(area().validate().is_ok());
        let inverted = ActivityArea {
            left: Some(10),
            right: Some(5),
            ..ActivityArea::default()
        };
        assert!(inverted.validate().is_err());
    }

    #[test]
    fn test_point_check() {
        let a = area();
        assert_eq!(contact_in_area(&a, false, None, None, 1), None);
        assert_eq!(contact_in_area(&a, false, Some((500, 500)), None, 1), Some(true));
        assert_eq!(contact_in_area(&a, false, Some((0, 500)), None, 1), Some(false));
    }

    #[test]
    fn test_semi_mt_uses_bounding_box() {
        let a = area();
        let b = Bounds {
            min_x: 200,
            min_y: 100,
            max_x: 1000,
            max_y: 400,
        };
        // One contact: only the min corner matters.
        assert_eq!(contact_in_area(&a, true, None, Some(b), 1), Some(true));
        // Two contacts: the max corner is outside.
        assert_eq!(contact_in_area(&a, true, None, Some(b), 2), Some(false));
        assert_eq!(contact_in_area(&a, true, Some((500, 500)), None, 1), None);
    }

    #[test]
    fn test_birth_gate() {
        assert_eq!(birth_gate(None, false, false), TouchGate::Defer);
        assert_eq!(birth_gate(Some(true), false, false), TouchGate::Emit);
        assert_eq!(birth_gate(Some(false), false, false), TouchGate::Suppress);
        assert_eq!(birth_gate(Some(true), false, true), TouchGate::Suppress);
        assert_eq!(birth_gate(Some(true), true, false), TouchGate::Suppress);
    }

    #[test]
    fn test_press_suppression_needs_two_contacts() {
        assert!(press_suppresses(1, Some(1), true, 2));
        assert!(!press_suppresses(1, Some(1), true, 1));
        assert!(!press_suppresses(1, Some(1), false, 2));
        assert!(!press_suppresses(0, Some(1), true, 3));
        assert!(!press_suppresses(0, None, true, 3));
    }
}
