use std::collections::TryReserveError;
use std::fmt;

/// Why a translator could not be opened for a device.
#[derive(Debug)]
pub enum OpenError {
    /// The capability table does not describe a touchpad.
    NotATouchpad,
    /// The slot table could not be allocated.
    SlotAllocation { slots: usize, source: TryReserveError },
    /// The input_event record size is not one the kernel produces.
    InvalidEventSize(usize),
}

impl fmt::Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenError::NotATouchpad => write!(
                f,
                "device is not a touchpad (needs X/Y, pressure or BTN_TOUCH, BTN_TOOL_FINGER and no pen)"
            ),
            OpenError::SlotAllocation { slots, source } => {
                write!(f, "failed to allocate {} touch slots: {}", slots, source)
            }
            OpenError::InvalidEventSize(size) => {
                write!(f, "invalid input_event size {} (expected 16 or 24)", size)
            }
        }
    }
}

impl std::error::Error for OpenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OpenError::SlotAllocation { source, .. } => Some(source),
            _ => None,
        }
    }
}
