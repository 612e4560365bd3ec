//! The snapshot handed to the pointer/scroll engine once per frame.

use std::fmt;

use super::frame::AxisMap;
use super::slot::{Bounds, Contact, Position};

/// Identifies the device a notification came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DeviceId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchEventKind {
    Begin,
    Update,
    End,
}

impl fmt::Display for TouchEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TouchEventKind::Begin => write!(f, "begin"),
            TouchEventKind::Update => write!(f, "update"),
            TouchEventKind::End => write!(f, "end"),
        }
    }
}

/// A per-contact touch notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TouchEvent {
    pub kind: TouchEventKind,
    pub tracking_id: u32,
    pub hardware_id: i32,
    pub slot: usize,
    pub axes: AxisMap,
    pub device: DeviceId,
}

/// Copy of a contact as it stood when the snapshot was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Finger {
    pub slot: usize,
    pub tracking_id: u32,
    pub hardware_id: i32,
    pub position: Position,
    pub has_open_touch_event: bool,
    pub in_active_area: bool,
}

impl Finger {
    pub fn from_contact(slot: usize, contact: &Contact) -> Self {
        Self {
            slot,
            tracking_id: contact.tracking_id,
            hardware_id: contact.hardware_id,
            position: contact.position,
            has_open_touch_event: contact.has_open_touch_event,
            in_active_area: contact.in_active_area,
        }
    }
}

/// Hardware state at one frame boundary. Owns all of its data, so it stays
/// valid while the translator goes on mutating its own tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HwState {
    /// Timestamp of the frame boundary in milliseconds.
    pub millis: u64,
    pub x: i32,
    pub y: i32,
    /// Pressure.
    pub z: i32,
    pub num_fingers: usize,
    pub finger_width: i32,

    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub multi: [bool; 8],
    pub middle: bool,

    pub scroll_fingers: [Option<Finger>; 2],
    /// The finger that was selected when the left button went down.
    pub pressing_finger: Option<Finger>,
    /// Indexed by scroll finger: whether it reported X this frame.
    pub scroll_pass_x: [bool; 2],
    pub scroll_pass_y: [bool; 2],

    /// The primary position switched to a different contact; do not compute
    /// a delta against the previous x/y.
    pub new_coords: bool,
    /// At least one event besides the frame boundary went into this snapshot.
    pub new_eventset: bool,

    /// Box spanned by the active contacts with known positions.
    pub bounds: Option<Bounds>,
    pub touch_events: Vec<TouchEvent>,
}

impl fmt::Display for HwState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>10}ms x={} y={} z={} w={} fingers={}",
            self.millis, self.x, self.y, self.z, self.finger_width, self.num_fingers
        )?;

        let buttons: String = [
            (self.left, 'L'),
            (self.middle, 'M'),
            (self.right, 'R'),
            (self.up, 'U'),
            (self.down, 'D'),
        ]
        .iter()
        .map(|&(down, c)| if down { c } else { '.' })
        .collect();
        write!(f, " buttons={}", buttons)?;

        if self.new_coords {
            write!(f, " new-coords")?;
        }
        if let [Some(a), b] = &self.scroll_fingers {
            write!(f, " scroll=[{}", a.slot)?;
            if let Some(b) = b {
                write!(f, ",{}", b.slot)?;
            }
            write!(f, "]")?;
        }
        for event in &self.touch_events {
            write!(f, " {}#{}", event.kind, event.tracking_id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_one_line() {
        let state = HwState {
            millis: 42,
            x: 100,
            y: 200,
            num_fingers: 1,
            left: true,
            touch_events: vec![TouchEvent {
                kind: TouchEventKind::Begin,
                tracking_id: 0,
                hardware_id: 5,
                slot: 0,
                axes: AxisMap::new(),
                device: DeviceId(1),
            }],
            ..HwState::default()
        };
        let line = state.to_string();
        assert!(!line.contains('\n'));
        assert!(line.contains("x=100 y=200"));
        assert!(line.contains("buttons=L...."));
        assert!(line.ends_with("begin#0"));
    }
}
