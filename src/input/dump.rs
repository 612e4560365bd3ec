//! Print raw input events for debugging.
//! Run: mt-hwstate dump --device /dev/input/eventN

use std::io::{Read, Write};
use std::thread;

use super::event::{RawEvent, EV_ABS, EV_KEY, EV_SYN};
use super::reader::{EventReader, ReadOutcome, IDLE_POLL};

pub fn code_name(ty: u16, code: u16) -> String {
    match ty {
        EV_SYN => "SYN_REPORT".to_string(),
        EV_KEY => {
            let key = match code {
                0x100..=0x107 => return format!("BTN_{}", code - 0x100),
                0x110 => "LEFT",
                0x111 => "RIGHT",
                0x112 => "MIDDLE",
                0x115 => "FORWARD",
                0x116 => "BACK",
                0x140 => "TOOL_PEN",
                0x145 => "TOOL_FINGER",
                0x14a => "TOUCH",
                0x14d => "TOOL_DOUBLETAP",
                0x14e => "TOOL_TRIPLETAP",
                0x14f => "TOOL_QUADTAP",
                _ => return format!("KEY/{}", code),
            };
            format!("BTN_{}", key)
        }
        EV_ABS => {
            let abs = match code {
                0x00 => "X",
                0x01 => "Y",
                0x18 => "PRESSURE",
                0x1c => "TOOL_WIDTH",
                0x2f => "MT_SLOT",
                0x30 => "MT_TOUCH_MAJOR",
                0x31 => "MT_TOUCH_MINOR",
                0x32 => "MT_WIDTH_MAJOR",
                0x33 => "MT_WIDTH_MINOR",
                0x34 => "MT_ORIENTATION",
                0x35 => "MT_POSITION_X",
                0x36 => "MT_POSITION_Y",
                0x37 => "MT_TOOL_TYPE",
                0x38 => "MT_BLOB_ID",
                0x39 => "MT_TRACKING_ID",
                0x3a => "MT_PRESSURE",
                0x3b => "MT_DISTANCE",
                _ => "?",
            };
            format!("ABS_{}({})", abs, code)
        }
        _ => format!("type{} code{}", ty, code),
    }
}

pub fn format_event(n: u64, ev: &RawEvent) -> String {
    format!(
        "{:6}  {:>10}ms  {}  value={}",
        n,
        ev.time_ms,
        code_name(ev.ty(), ev.code()),
        ev.value()
    )
}

/// Stream every event from `reader` to `out` until the source ends.
pub fn run_dump<R: Read>(
    reader: &mut EventReader<R>,
    out: &mut impl Write,
) -> Result<u64, Box<dyn std::error::Error + Send + Sync>> {
    let mut batch = Vec::with_capacity(64);
    let mut n = 0u64;
    loop {
        batch.clear();
        match reader.read_batch(&mut batch) {
            ReadOutcome::Events(_) => {
                for ev in &batch {
                    n += 1;
                    writeln!(out, "{}", format_event(n, ev))?;
                }
            }
            ReadOutcome::NoData => thread::sleep(IDLE_POLL),
            ReadOutcome::Discarded => continue,
            ReadOutcome::EndOfStream => return Ok(n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::event::{
        abs_event, key_event, ABS_MT_TRACKING_ID, BTN_LEFT, INPUT_EVENT_SIZE_64,
    };
    use std::io;
    use std::time::Instant;

    /// Reports "no data" a few times before handing out one SYN_REPORT record.
    struct SlowSource {
        idle_reads: usize,
        record: Option<[u8; INPUT_EVENT_SIZE_64]>,
    }

    impl Read for SlowSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.idle_reads > 0 {
                self.idle_reads -= 1;
                return Err(io::Error::from(io::ErrorKind::WouldBlock));
            }
            match self.record.take() {
                Some(record) => {
                    buf[..record.len()].copy_from_slice(&record);
                    Ok(record.len())
                }
                None => Ok(0),
            }
        }
    }

    #[test]
    fn test_code_names() {
        assert_eq!(code_name(EV_SYN, 0), "SYN_REPORT");
        assert_eq!(code_name(EV_KEY, 0x110), "BTN_LEFT");
        assert_eq!(code_name(EV_KEY, 0x103), "BTN_3");
        assert_eq!(code_name(EV_KEY, 0x1ff), "KEY/511");
        assert_eq!(code_name(EV_ABS, 0x39), "ABS_MT_TRACKING_ID(57)");
    }

    #[test]
    fn test_format_event() {
        let line = format_event(7, &abs_event(ABS_MT_TRACKING_ID, -1));
        assert!(line.ends_with("ABS_MT_TRACKING_ID(57)  value=-1"));
        assert!(format_event(1, &key_event(BTN_LEFT, 1)).contains("BTN_LEFT"));
    }

    #[test]
    fn test_dump_waits_out_idle_source() {
        let source = SlowSource {
            idle_reads: 3,
            record: Some([0u8; INPUT_EVENT_SIZE_64]),
        };
        let mut reader = EventReader::new(source, INPUT_EVENT_SIZE_64);
        let mut out = Vec::new();

        let started = Instant::now();
        let count = run_dump(&mut reader, &mut out).unwrap();

        assert!(started.elapsed() >= IDLE_POLL * 3);
        assert_eq!(count, 1);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("SYN_REPORT"));
    }
}
