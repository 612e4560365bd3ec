//! Per-slot contact records.

use std::collections::TryReserveError;

use super::frame::Metric;

/// Last known coordinates of a contact. Either half may still be unknown
/// right after a birth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }

    pub fn get(&self, metric: Metric) -> Option<i32> {
        match metric {
            Metric::X => self.x,
            Metric::Y => self.y,
        }
    }

    pub fn set(&mut self, metric: Metric, value: i32) {
        match metric {
            Metric::X => self.x = Some(value),
            Metric::Y => self.y = Some(value),
        }
    }

    pub fn point(&self) -> Option<(i32, i32)> {
        self.x.zip(self.y)
    }
}

/// Bounding box over a set of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub min_y: i32,
    pub max_x: i32,
    pub max_y: i32,
}

impl Bounds {
    pub fn around(x: i32, y: i32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    pub fn extend(&mut self, x: i32, y: i32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }
}

/// Where a contact is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Tracking id arrived this frame; not yet counted as active.
    Born,
    /// Counted, but the begin decision waits for coordinates.
    Deferred,
    /// Counted and past the begin decision.
    Live,
    /// Tracking id -1 arrived; released when the slot is flushed.
    Closing { counted: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// Translator-assigned, unique within a session.
    pub tracking_id: u32,
    /// The value the hardware put in ABS_MT_TRACKING_ID.
    pub hardware_id: i32,
    pub position: Position,
    /// A begin went out for this tracking id and no end yet.
    pub has_open_touch_event: bool,
    pub in_active_area: bool,
    pub phase: Phase,
}

impl Contact {
    fn new(tracking_id: u32, hardware_id: i32, position: Position) -> Self {
        Self {
            tracking_id,
            hardware_id,
            position,
            has_open_touch_event: false,
            in_active_area: false,
            phase: Phase::Born,
        }
    }

    pub fn is_counted(&self) -> bool {
        match self.phase {
            Phase::Born => false,
            Phase::Deferred | Phase::Live => true,
            Phase::Closing { counted } => counted,
        }
    }

    pub fn is_closing(&self) -> bool {
        matches!(self.phase, Phase::Closing { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SlotState {
    #[default]
    Inactive,
    Active(Contact),
}

impl SlotState {
    pub fn contact(&self) -> Option<&Contact> {
        match self {
            SlotState::Inactive => None,
            SlotState::Active(contact) => Some(contact),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, SlotState::Active(_))
    }
}

/// One record per hardware slot. Slot indices are fixed for the life of the table.
#[derive(Debug, Clone)]
pub struct SlotTable {
    slots: Vec<SlotState>,
    /// Position each slot's previous contact had when it was released. The
    /// kernel only resends axes that differ from this.
    released: Vec<Option<Position>>,
}

impl SlotTable {
    pub fn new(count: usize) -> Result<Self, TryReserveError> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(count)?;
        slots.resize(count, SlotState::Inactive);
        let mut released = Vec::new();
        released.try_reserve_exact(count)?;
        released.resize(count, None);
        Ok(Self { slots, released })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&SlotState> {
        self.slots.get(slot)
    }

    pub fn contact(&self, slot: usize) -> Option<&Contact> {
        self.slots.get(slot).and_then(SlotState::contact)
    }

    pub fn contact_mut(&mut self, slot: usize) -> Option<&mut Contact> {
        match self.slots.get_mut(slot) {
            Some(SlotState::Active(contact)) => Some(contact),
            _ => None,
        }
    }

    /// Start a contact in an inactive slot. Returns false if the slot is taken.
    pub fn birth(
        &mut self,
        slot: usize,
        tracking_id: u32,
        hardware_id: i32,
        position: Position,
    ) -> bool {
        match self.slots.get_mut(slot) {
            Some(state) if !state.is_active() => {
                *state = SlotState::Active(Contact::new(tracking_id, hardware_id, position));
                true
            }
            _ => false,
        }
    }

    /// Mark an active contact for release at the next flush.
    pub fn mark_closing(&mut self, slot: usize) -> bool {
        match self.contact_mut(slot) {
            Some(contact) if !contact.is_closing() => {
                let counted = contact.is_counted();
                contact.phase = Phase::Closing { counted };
                true
            }
            _ => false,
        }
    }

    /// Return the slot to inactive, handing back what it held.
    pub fn release(&mut self, slot: usize) -> Option<Contact> {
        let state = self.slots.get_mut(slot)?;
        match std::mem::take(state) {
            SlotState::Active(contact) => {
                self.released[slot] = Some(contact.position);
                Some(contact)
            }
            SlotState::Inactive => None,
        }
    }

    /// Where the slot's last contact was released. `None` if the slot never held one.
    pub fn released_position(&self, slot: usize) -> Option<Position> {
        self.released.get(slot).copied().flatten()
    }

    pub fn active(&self) -> impl Iterator<Item = (usize, &Contact)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, state)| state.contact().map(|c| (slot, c)))
    }

    pub fn counted(&self) -> usize {
        self.active().filter(|(_, c)| c.is_counted()).count()
    }

    /// Bounding box of every active contact whose position is known.
    pub fn bounds(&self) -> Option<Bounds> {
        self.active()
            .filter_map(|(_, c)| c.position.point())
            .fold(None, |acc: Option<Bounds>, (x, y)| match acc {
                None => Some(Bounds::around(x, y)),
                Some(mut b) => {
                    b.extend(x, y);
                    Some(b)
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_birth_requires_inactive_slot() {
        let mut table = SlotTable::new(2).unwrap();
        assert!(table.birth(0, 0, 5, Position::default()));
        assert!(!table.birth(0, 1, 6, Position::default()));
        assert_eq!(table.contact(0).map(|c| c.tracking_id), Some(0));
        assert!(!table.birth(7, 2, 7, Position::default()));
    }

    #[test]
    fn test_closing_remembers_whether_counted() {
        let mut table = SlotTable::new(2).unwrap();
        table.birth(0, 0, 1, Position::default());
        table.birth(1, 1, 2, Position::default());
        table.contact_mut(1).unwrap().phase = Phase::Live;

        assert!(table.mark_closing(0));
        assert!(table.mark_closing(1));
        assert!(!table.mark_closing(1));
        assert_eq!(table.contact(0).unwrap().phase, Phase::Closing { counted: false });
        assert_eq!(table.contact(1).unwrap().phase, Phase::Closing { counted: true });
        assert_eq!(table.counted(), 1);
    }

    #[test]
    fn test_release_makes_slot_reusable() {
        let mut table = SlotTable::new(1).unwrap();
        table.birth(0, 3, 3, Position::new(1, 2));
        let contact = table.release(0).unwrap();
        assert_eq!(contact.tracking_id, 3);
        assert_eq!(table.get(0), Some(&SlotState::Inactive));
        assert!(table.release(0).is_none());
        assert!(table.birth(0, 4, 3, Position::default()));
    }

    #[test]
    fn test_release_keeps_slot_position() {
        let mut table = SlotTable::new(2).unwrap();
        assert_eq!(table.released_position(0), None);

        table.birth(0, 0, 1, Position::new(10, 20));
        table.contact_mut(0).unwrap().position.set(Metric::Y, 25);
        table.release(0);
        assert_eq!(table.released_position(0), Some(Position::new(10, 25)));
        assert_eq!(table.released_position(1), None);
        assert_eq!(table.released_position(9), None);
    }

    #[test]
    fn test_bounds_skip_unknown_positions() {
        let mut table = SlotTable::new(3).unwrap();
        assert_eq!(table.bounds(), None);
        table.birth(0, 0, 0, Position::new(10, 40));
        table.birth(1, 1, 1, Position::default());
        table.birth(2, 2, 2, Position::new(30, 20));
        assert_eq!(
            table.bounds(),
            Some(Bounds {
                min_x: 10,
                min_y: 20,
                max_x: 30,
                max_y: 40
            })
        );
    }
}
