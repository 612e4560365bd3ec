use super::{AxisRange, DeviceProfile};
use crate::input::event::*;

/// Generic five-slot multitouch clickpad (Synaptics/Elan class, type-B protocol).
///
/// Ranges follow what a typical i2c-hid clickpad reports: ~42 units/mm,
/// pressure and touch-major per contact, one physical button under the pad.
pub const CLICKPAD: DeviceProfile = DeviceProfile {
    name: "clickpad",

    input_event_size: NATIVE_EVENT_SIZE,

    axes: &[
        (ABS_X, AxisRange::new(1266, 5676).with_fuzz(8).with_resolution(42)),
        (ABS_Y, AxisRange::new(1094, 4762).with_fuzz(8).with_resolution(42)),
        (ABS_PRESSURE, AxisRange::new(0, 255)),
        (ABS_TOOL_WIDTH, AxisRange::new(0, 15)),
        (ABS_MT_SLOT, AxisRange::new(0, 4)),
        (ABS_MT_TOUCH_MAJOR, AxisRange::new(0, 15)),
        (ABS_MT_TOUCH_MINOR, AxisRange::new(0, 15)),
        (ABS_MT_ORIENTATION, AxisRange::new(0, 1)),
        (ABS_MT_POSITION_X, AxisRange::new(1266, 5676).with_resolution(42)),
        (ABS_MT_POSITION_Y, AxisRange::new(1094, 4762).with_resolution(42)),
        (ABS_MT_TOOL_TYPE, AxisRange::new(0, 2)),
        (ABS_MT_TRACKING_ID, AxisRange::new(0, 65535)),
        (ABS_MT_PRESSURE, AxisRange::new(0, 255)),
    ],

    keys: &[
        BTN_LEFT,
        BTN_TOOL_FINGER,
        BTN_TOUCH,
        BTN_TOOL_DOUBLETAP,
        BTN_TOOL_TRIPLETAP,
        BTN_TOOL_QUADTAP,
    ],

    props: &[INPUT_PROP_POINTER, INPUT_PROP_BUTTONPAD],
};
