pub mod dump;
pub mod event;
pub mod reader;

pub use event::{parse_input_event, RawEvent};
pub use reader::{EventReader, ReadOutcome};
