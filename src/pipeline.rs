//! Event source -> translator -> behavior engine.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::thread;

use crate::error::OpenError;
use crate::input::event::{INPUT_EVENT_SIZE_32, INPUT_EVENT_SIZE_64};
use crate::input::reader::IDLE_POLL;
use crate::input::{EventReader, RawEvent, ReadOutcome};
use crate::touch::{EventTranslator, HwState};

/// Frames between progress lines.
const PROGRESS_INTERVAL: u64 = 500;

/// Receives one snapshot per frame. This is where pointer motion, clicks
/// and scrolling get computed; none of that lives in this crate.
pub trait HwStateSink {
    fn handle_state(&mut self, state: HwState);
}

impl<F: FnMut(HwState)> HwStateSink for F {
    fn handle_state(&mut self, state: HwState) {
        self(state)
    }
}

/// Open an event device (or capture file) for reading `event_size`-byte records.
pub fn open_device(
    path: &Path,
    event_size: usize,
) -> Result<EventReader<File>, Box<dyn std::error::Error + Send + Sync>> {
    if event_size != INPUT_EVENT_SIZE_32 && event_size != INPUT_EVENT_SIZE_64 {
        return Err(OpenError::InvalidEventSize(event_size).into());
    }
    let file = File::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    log::info!("Reading {} ({}-byte events)", path.display(), event_size);
    Ok(EventReader::new(file, event_size))
}

pub struct Pipeline<R> {
    reader: EventReader<R>,
    translator: EventTranslator,
    batch: Vec<RawEvent>,
    frames: u64,
}

impl<R: Read> Pipeline<R> {
    pub fn new(reader: EventReader<R>, translator: EventTranslator) -> Self {
        Self {
            reader,
            translator,
            batch: Vec::new(),
            frames: 0,
        }
    }

    /// Frames delivered so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// One read from the source; every completed frame goes to `sink`.
    pub fn pump(&mut self, sink: &mut impl HwStateSink) -> ReadOutcome {
        self.batch.clear();
        let outcome = self.reader.read_batch(&mut self.batch);

        for ev in &self.batch {
            if let Some(state) = self.translator.translate(ev) {
                self.frames += 1;
                log_frame_progress(self.frames, &state);
                sink.handle_state(state);
            }
        }
        outcome
    }

    /// Pump until the source ends. Returns the number of frames delivered.
    pub fn run(&mut self, sink: &mut impl HwStateSink) -> u64 {
        loop {
            match self.pump(sink) {
                ReadOutcome::Events(_) | ReadOutcome::Discarded => {}
                ReadOutcome::NoData => thread::sleep(IDLE_POLL),
                ReadOutcome::EndOfStream => break,
            }
        }
        log::info!("Event stream ended after {} frames", self.frames);
        self.frames
    }
}

fn log_frame_progress(frames: u64, state: &HwState) {
    if frames == 1 {
        log::info!("First frame decoded (events are flowing)");
    }
    if frames % PROGRESS_INTERVAL == 0 {
        log::debug!("Frames decoded: {} ({} fingers down)", frames, state.num_fingers);
    }
}
