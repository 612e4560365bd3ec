//! Parse Linux input_event records from raw bytes (32-bit ABI: 16 bytes, 64-bit ABI: 24 bytes).

use evdevil::event::{EventType, InputEvent};

/// timeval (2 x i32) + type 2 + code 2 + value 4.
pub const INPUT_EVENT_SIZE_32: usize = 16;
/// timeval (2 x i64) + type 2 + code 2 + value 4.
pub const INPUT_EVENT_SIZE_64: usize = 24;

#[cfg(target_pointer_width = "64")]
pub const NATIVE_EVENT_SIZE: usize = INPUT_EVENT_SIZE_64;
#[cfg(not(target_pointer_width = "64"))]
pub const NATIVE_EVENT_SIZE: usize = INPUT_EVENT_SIZE_32;

pub const EV_SYN: u16 = 0x00;
pub const EV_KEY: u16 = 0x01;
pub const EV_ABS: u16 = 0x03;
pub const SYN_REPORT: u16 = 0;

pub const ABS_X: u16 = 0x00;
pub const ABS_Y: u16 = 0x01;
pub const ABS_PRESSURE: u16 = 0x18; // 24
pub const ABS_TOOL_WIDTH: u16 = 0x1c; // 28
pub const ABS_MT_SLOT: u16 = 0x2f; // 47
pub const ABS_MT_TOUCH_MAJOR: u16 = 0x30;
pub const ABS_MT_TOUCH_MINOR: u16 = 0x31;
pub const ABS_MT_WIDTH_MAJOR: u16 = 0x32;
pub const ABS_MT_WIDTH_MINOR: u16 = 0x33;
pub const ABS_MT_ORIENTATION: u16 = 0x34;
pub const ABS_MT_POSITION_X: u16 = 0x35; // 53
pub const ABS_MT_POSITION_Y: u16 = 0x36; // 54
pub const ABS_MT_TOOL_TYPE: u16 = 0x37;
pub const ABS_MT_BLOB_ID: u16 = 0x38;
pub const ABS_MT_TRACKING_ID: u16 = 0x39; // 57
pub const ABS_MT_PRESSURE: u16 = 0x3a;
pub const ABS_MT_DISTANCE: u16 = 0x3b;
pub const ABS_CNT: usize = 0x40;

pub const BTN_0: u16 = 0x100;
pub const BTN_3: u16 = 0x103;
pub const BTN_7: u16 = 0x107;
pub const BTN_LEFT: u16 = 0x110;
pub const BTN_RIGHT: u16 = 0x111;
pub const BTN_MIDDLE: u16 = 0x112;
pub const BTN_FORWARD: u16 = 0x115;
pub const BTN_BACK: u16 = 0x116;
pub const BTN_TOOL_PEN: u16 = 0x140;
pub const BTN_TOOL_FINGER: u16 = 0x145;
pub const BTN_TOUCH: u16 = 0x14a;
pub const BTN_TOOL_DOUBLETAP: u16 = 0x14d;
pub const BTN_TOOL_TRIPLETAP: u16 = 0x14e;
pub const BTN_TOOL_QUADTAP: u16 = 0x14f;
pub const KEY_CNT: usize = 0x300;

pub const INPUT_PROP_POINTER: u16 = 0x00;
pub const INPUT_PROP_BUTTONPAD: u16 = 0x02;
pub const INPUT_PROP_SEMI_MT: u16 = 0x03;

/// One decoded input_event together with its kernel timestamp.
#[derive(Debug, Clone, Copy)]
pub struct RawEvent {
    pub time_ms: u64,
    pub event: InputEvent,
}

impl RawEvent {
    pub fn new(time_ms: u64, ty: u16, code: u16, value: i32) -> Self {
        Self {
            time_ms,
            event: InputEvent::new(EventType::from_raw(ty), code, value),
        }
    }

    pub fn ty(&self) -> u16 {
        self.event.event_type().raw()
    }

    pub fn code(&self) -> u16 {
        self.event.raw_code()
    }

    pub fn value(&self) -> i32 {
        self.event.raw_value()
    }

    pub fn is_frame_boundary(&self) -> bool {
        self.ty() == EV_SYN && self.code() == SYN_REPORT
    }
}

/// Parse one input_event from a record of exactly 16 or 24 bytes (little-endian).
/// Returns None for any other length.
pub fn parse_input_event(buf: &[u8]) -> Option<RawEvent> {
    match buf.len() {
        INPUT_EVENT_SIZE_32 => Some(parse_input_event_32(buf)),
        INPUT_EVENT_SIZE_64 => Some(parse_input_event_64(buf)),
        _ => None,
    }
}

fn parse_input_event_32(buf: &[u8]) -> RawEvent {
    let sec = i32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]) as i64;
    let usec = i32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]) as i64;
    let ty = u16::from_le_bytes([buf[8], buf[9]]);
    let code = u16::from_le_bytes([buf[10], buf[11]]);
    let value = i32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]);

    RawEvent::new(timeval_millis(sec, usec), ty, code, value)
}

fn parse_input_event_64(buf: &[u8]) -> RawEvent {
    let mut sec = [0u8; 8];
    let mut usec = [0u8; 8];
    sec.copy_from_slice(&buf[0..8]);
    usec.copy_from_slice(&buf[8..16]);
    let ty = u16::from_le_bytes([buf[16], buf[17]]);
    let code = u16::from_le_bytes([buf[18], buf[19]]);
    let value = i32::from_le_bytes([buf[20], buf[21], buf[22], buf[23]]);

    RawEvent::new(
        timeval_millis(i64::from_le_bytes(sec), i64::from_le_bytes(usec)),
        ty,
        code,
        value,
    )
}

fn timeval_millis(sec: i64, usec: i64) -> u64 {
    let ms = sec.saturating_mul(1000).saturating_add(usec / 1000);
    ms.max(0) as u64
}

/// Build an absolute-axis event (EV_ABS).
pub fn abs_event(code: u16, value: i32) -> RawEvent {
    RawEvent::new(0, EV_ABS, code, value)
}

/// Build a key event (EV_KEY).
pub fn key_event(code: u16, value: i32) -> RawEvent {
    RawEvent::new(0, EV_KEY, code, value)
}

/// Build a SYN_REPORT frame boundary.
pub fn sync_event(time_ms: u64) -> RawEvent {
    RawEvent::new(time_ms, EV_SYN, SYN_REPORT, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_64(sec: i64, usec: i64, ty: u16, code: u16, value: i32) -> Vec<u8> {
        let mut buf = Vec::with_capacity(INPUT_EVENT_SIZE_64);
        buf.extend_from_slice(&sec.to_le_bytes());
        buf.extend_from_slice(&usec.to_le_bytes());
        buf.extend_from_slice(&ty.to_le_bytes());
        buf.extend_from_slice(&code.to_le_bytes());
        buf.extend_from_slice(&value.to_le_bytes());
        buf
    }

    #[test]
    fn test_parse_64bit_record() {
        let buf = record_64(12, 345_000, EV_ABS, ABS_MT_POSITION_X, -17);
        let ev = parse_input_event(&buf).unwrap();
        assert_eq!(ev.time_ms, 12_345);
        assert_eq!(ev.ty(), EV_ABS);
        assert_eq!(ev.code(), ABS_MT_POSITION_X);
        assert_eq!(ev.value(), -17);
    }

    #[test]
    fn test_parse_32bit_record() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&3i32.to_le_bytes());
        buf.extend_from_slice(&500_000i32.to_le_bytes());
        buf.extend_from_slice(&EV_KEY.to_le_bytes());
        buf.extend_from_slice(&BTN_LEFT.to_le_bytes());
        buf.extend_from_slice(&1i32.to_le_bytes());

        let ev = parse_input_event(&buf).unwrap();
        assert_eq!(ev.time_ms, 3_500);
        assert_eq!(ev.ty(), EV_KEY);
        assert_eq!(ev.code(), BTN_LEFT);
        assert_eq!(ev.value(), 1);
    }

    #[test]
    fn test_parse_rejects_odd_length() {
        assert!(parse_input_event(&[0u8; 20]).is_none());
        assert!(parse_input_event(&[]).is_none());
    }

    #[test]
    fn test_frame_boundary() {
        assert!(sync_event(0).is_frame_boundary());
        assert!(!abs_event(ABS_MT_SLOT, 0).is_frame_boundary());
    }
}
