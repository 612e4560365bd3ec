//! Per-contact axis values collected while a frame is being read.

use crate::input::event::{
    ABS_MT_BLOB_ID, ABS_MT_DISTANCE, ABS_MT_ORIENTATION, ABS_MT_POSITION_X, ABS_MT_POSITION_Y,
    ABS_MT_PRESSURE, ABS_MT_TOOL_TYPE, ABS_MT_TOUCH_MAJOR, ABS_MT_TOUCH_MINOR, ABS_MT_WIDTH_MAJOR,
    ABS_MT_WIDTH_MINOR,
};

/// A coordinate axis of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    X = 0,
    Y = 1,
}

impl Metric {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Per-contact axes carried in touch notifications. Slot and tracking id are
/// protocol bookkeeping and never appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MtAxis {
    TouchMajor,
    TouchMinor,
    WidthMajor,
    WidthMinor,
    Orientation,
    PositionX,
    PositionY,
    ToolType,
    BlobId,
    Pressure,
    Distance,
}

impl MtAxis {
    pub const COUNT: usize = 11;

    pub const ALL: [MtAxis; MtAxis::COUNT] = [
        MtAxis::TouchMajor,
        MtAxis::TouchMinor,
        MtAxis::WidthMajor,
        MtAxis::WidthMinor,
        MtAxis::Orientation,
        MtAxis::PositionX,
        MtAxis::PositionY,
        MtAxis::ToolType,
        MtAxis::BlobId,
        MtAxis::Pressure,
        MtAxis::Distance,
    ];

    pub fn from_code(code: u16) -> Option<Self> {
        let axis = match code {
            ABS_MT_TOUCH_MAJOR => MtAxis::TouchMajor,
            ABS_MT_TOUCH_MINOR => MtAxis::TouchMinor,
            ABS_MT_WIDTH_MAJOR => MtAxis::WidthMajor,
            ABS_MT_WIDTH_MINOR => MtAxis::WidthMinor,
            ABS_MT_ORIENTATION => MtAxis::Orientation,
            ABS_MT_POSITION_X => MtAxis::PositionX,
            ABS_MT_POSITION_Y => MtAxis::PositionY,
            ABS_MT_TOOL_TYPE => MtAxis::ToolType,
            ABS_MT_BLOB_ID => MtAxis::BlobId,
            ABS_MT_PRESSURE => MtAxis::Pressure,
            ABS_MT_DISTANCE => MtAxis::Distance,
            _ => return None,
        };
        Some(axis)
    }

    pub fn code(self) -> u16 {
        match self {
            MtAxis::TouchMajor => ABS_MT_TOUCH_MAJOR,
            MtAxis::TouchMinor => ABS_MT_TOUCH_MINOR,
            MtAxis::WidthMajor => ABS_MT_WIDTH_MAJOR,
            MtAxis::WidthMinor => ABS_MT_WIDTH_MINOR,
            MtAxis::Orientation => ABS_MT_ORIENTATION,
            MtAxis::PositionX => ABS_MT_POSITION_X,
            MtAxis::PositionY => ABS_MT_POSITION_Y,
            MtAxis::ToolType => ABS_MT_TOOL_TYPE,
            MtAxis::BlobId => ABS_MT_BLOB_ID,
            MtAxis::Pressure => ABS_MT_PRESSURE,
            MtAxis::Distance => ABS_MT_DISTANCE,
        }
    }

    /// The coordinate this axis drives, if it is a position axis.
    pub fn metric(self) -> Option<Metric> {
        match self {
            MtAxis::PositionX => Some(Metric::X),
            MtAxis::PositionY => Some(Metric::Y),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Sparse axis -> value mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisMap {
    values: [Option<i32>; MtAxis::COUNT],
}

impl AxisMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, axis: MtAxis) -> Option<i32> {
        self.values[axis.index()]
    }

    pub fn set(&mut self, axis: MtAxis, value: i32) {
        self.values[axis.index()] = Some(value);
    }

    pub fn with(mut self, axis: MtAxis, value: i32) -> Self {
        self.set(axis, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    pub fn clear(&mut self) {
        self.values = [None; MtAxis::COUNT];
    }

    pub fn position(&self) -> Option<(i32, i32)> {
        self.get(MtAxis::PositionX).zip(self.get(MtAxis::PositionY))
    }
}

/// The two maps the translator keeps: values touched in the current frame for
/// the selected slot, and the last value seen per axis on the device.
#[derive(Debug, Clone, Default)]
pub struct FrameAccumulator {
    frame: AxisMap,
    last_known: AxisMap,
}

impl FrameAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value in both maps.
    pub fn record(&mut self, axis: MtAxis, value: i32) {
        self.frame.set(axis, value);
        self.last_known.set(axis, value);
    }

    /// Record a value only in the persistent map. Used when the frame copy is withheld.
    pub fn remember(&mut self, axis: MtAxis, value: i32) {
        self.last_known.set(axis, value);
    }

    /// A contact that was just born inherits every value seen so far.
    pub fn inherit_last_known(&mut self) {
        self.frame = self.last_known;
    }

    pub fn frame(&self) -> &AxisMap {
        &self.frame
    }

    pub fn last_known(&self) -> &AxisMap {
        &self.last_known
    }

    pub fn clear_frame(&mut self) {
        self.frame.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_codes_round_trip() {
        for axis in MtAxis::ALL {
            assert_eq!(MtAxis::from_code(axis.code()), Some(axis));
        }
        assert_eq!(MtAxis::from_code(0x2f), None); // slot
        assert_eq!(MtAxis::from_code(0x39), None); // tracking id
    }

    #[test]
    fn test_axis_map_is_sparse() {
        let map = AxisMap::new()
            .with(MtAxis::PositionY, 20)
            .with(MtAxis::TouchMajor, 3);
        assert!(!map.is_empty());
        assert_eq!(map.get(MtAxis::PositionX), None);
        assert_eq!(map.get(MtAxis::PositionY), Some(20));
        assert_eq!(map.get(MtAxis::TouchMajor), Some(3));
        assert_eq!(map.position(), None);
        assert_eq!(map.with(MtAxis::PositionX, 5).position(), Some((5, 20)));
    }

    #[test]
    fn test_frame_resets_but_last_known_persists() {
        let mut acc = FrameAccumulator::new();
        acc.record(MtAxis::PositionX, 100);
        acc.remember(MtAxis::TouchMajor, 7);

        assert_eq!(acc.frame().get(MtAxis::PositionX), Some(100));
        assert_eq!(acc.frame().get(MtAxis::TouchMajor), None);
        acc.clear_frame();
        assert!(acc.frame().is_empty());
        assert_eq!(acc.last_known().get(MtAxis::PositionX), Some(100));
        assert_eq!(acc.last_known().get(MtAxis::TouchMajor), Some(7));
    }

    #[test]
    fn test_birth_inherits_queued_values() {
        let mut acc = FrameAccumulator::new();
        acc.record(MtAxis::TouchMajor, 9);
        acc.clear_frame();

        acc.inherit_last_known();
        assert_eq!(acc.frame().get(MtAxis::TouchMajor), Some(9));
    }
}
