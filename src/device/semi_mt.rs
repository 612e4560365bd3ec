use super::{AxisRange, DeviceProfile};
use crate::input::event::*;

/// Older two-slot Synaptics pad that only reports the bounding box of its contacts.
pub const SEMI_MT: DeviceProfile = DeviceProfile {
    name: "semi-mt",

    input_event_size: NATIVE_EVENT_SIZE,

    axes: &[
        (ABS_X, AxisRange::new(1472, 5472).with_fuzz(8)),
        (ABS_Y, AxisRange::new(1408, 4448).with_fuzz(8)),
        (ABS_PRESSURE, AxisRange::new(0, 255)),
        (ABS_TOOL_WIDTH, AxisRange::new(0, 15)),
        (ABS_MT_SLOT, AxisRange::new(0, 1)),
        (ABS_MT_POSITION_X, AxisRange::new(1472, 5472)),
        (ABS_MT_POSITION_Y, AxisRange::new(1408, 4448)),
        (ABS_MT_TRACKING_ID, AxisRange::new(0, 65535)),
    ],

    keys: &[
        BTN_LEFT,
        BTN_RIGHT,
        BTN_TOOL_FINGER,
        BTN_TOUCH,
        BTN_TOOL_DOUBLETAP,
        BTN_TOOL_TRIPLETAP,
    ],

    props: &[INPUT_PROP_POINTER, INPUT_PROP_SEMI_MT],
};
