//! Pull input_event records out of a byte stream (an evdev node, a pipe, or a capture file).

use std::io::{ErrorKind, Read};
use std::time::Duration;

use super::event::{parse_input_event, RawEvent};

/// Number of records requested per read.
const READ_BATCH: usize = 64;

/// How long to wait when a non-blocking source has nothing to read.
pub const IDLE_POLL: Duration = Duration::from_millis(5);

/// What one call to [`EventReader::read_batch`] produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOutcome {
    /// This many events were appended to the output.
    Events(usize),
    /// Nothing available right now (EAGAIN). Not an error.
    NoData,
    /// The read did not contain a whole number of records and was dropped.
    Discarded,
    /// The stream ended or failed for good.
    EndOfStream,
}

#[derive(Debug)]
pub struct EventReader<R> {
    inner: R,
    event_size: usize,
    buf: Vec<u8>,
}

impl<R: Read> EventReader<R> {
    pub fn new(inner: R, event_size: usize) -> Self {
        Self {
            inner,
            event_size,
            buf: vec![0u8; event_size * READ_BATCH],
        }
    }

    /// Read up to one batch of events into `out`.
    pub fn read_batch(&mut self, out: &mut Vec<RawEvent>) -> ReadOutcome {
        let len = loop {
            match self.inner.read(&mut self.buf) {
                Ok(len) => break len,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::WouldBlock => return ReadOutcome::NoData,
                Err(e) => {
                    log::error!("Read error: {}", e);
                    return ReadOutcome::EndOfStream;
                }
            }
        };

        if len == 0 {
            return ReadOutcome::EndOfStream;
        }

        if len % self.event_size != 0 {
            log::warn!(
                "Read error, invalid number of bytes ({} is not a multiple of {}); dropping read",
                len,
                self.event_size
            );
            return ReadOutcome::Discarded;
        }

        let before = out.len();
        out.extend(
            self.buf[..len]
                .chunks_exact(self.event_size)
                .filter_map(parse_input_event),
        );
        ReadOutcome::Events(out.len() - before)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Cursor};

    use super::*;
    use crate::input::event::{ABS_MT_SLOT, EV_ABS, INPUT_EVENT_SIZE_32};

    fn record_32(code: u16, value: i32) -> Vec<u8> {
        let mut buf = vec![0u8; 8];
        buf.extend_from_slice(&EV_ABS.to_le_bytes());
        buf.extend_from_slice(&code.to_le_bytes());
        buf.extend_from_slice(&value.to_le_bytes());
        buf
    }

    struct Failing(ErrorKind);

    impl Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::from(self.0))
        }
    }

    #[test]
    fn test_reads_whole_records() {
        let mut bytes = record_32(ABS_MT_SLOT, 1);
        bytes.extend(record_32(ABS_MT_SLOT, 2));
        let mut reader = EventReader::new(Cursor::new(bytes), INPUT_EVENT_SIZE_32);
        let mut out = Vec::new();

        assert_eq!(reader.read_batch(&mut out), ReadOutcome::Events(2));
        assert_eq!(out[1].value(), 2);
        assert_eq!(reader.read_batch(&mut out), ReadOutcome::EndOfStream);
    }

    #[test]
    fn test_partial_record_discards_whole_read() {
        let mut bytes = record_32(ABS_MT_SLOT, 1);
        bytes.extend_from_slice(&[0u8; 5]);
        let mut reader = EventReader::new(Cursor::new(bytes), INPUT_EVENT_SIZE_32);
        let mut out = Vec::new();

        assert_eq!(reader.read_batch(&mut out), ReadOutcome::Discarded);
        assert!(out.is_empty());
    }

    #[test]
    fn test_would_block_is_not_an_error() {
        let mut reader = EventReader::new(Failing(ErrorKind::WouldBlock), INPUT_EVENT_SIZE_32);
        let mut out = Vec::new();
        assert_eq!(reader.read_batch(&mut out), ReadOutcome::NoData);
    }

    #[test]
    fn test_other_errors_end_the_stream() {
        let mut reader = EventReader::new(Failing(ErrorKind::BrokenPipe), INPUT_EVENT_SIZE_32);
        let mut out = Vec::new();
        assert_eq!(reader.read_batch(&mut out), ReadOutcome::EndOfStream);
    }
}
