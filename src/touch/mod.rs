//! Multitouch state: slots, frames, scroll selection and the translator that ties them together.

pub mod frame;
pub mod gate;
pub mod hwstate;
pub mod scroll;
pub mod slot;
pub mod translator;

pub use frame::{AxisMap, Metric, MtAxis};
pub use gate::ActivityArea;
pub use hwstate::{DeviceId, Finger, HwState, TouchEvent, TouchEventKind};
pub use slot::{Bounds, Position};
pub use translator::{EventTranslator, TouchpadParams};
