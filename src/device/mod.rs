//! Device capability table: which axes, keys and properties a touchpad reports,
//! plus per-axis ranges. Filled once at open time and read-only afterwards.

mod clickpad;
mod semi_mt;

use std::fmt;

pub use clickpad::CLICKPAD;
pub use semi_mt::SEMI_MT;

use crate::input::event::{
    ABS_CNT, ABS_MT_PRESSURE, ABS_MT_SLOT, ABS_MT_TOUCH_MAJOR,
    ABS_MT_TRACKING_ID, ABS_PRESSURE, ABS_TOOL_WIDTH, ABS_X, ABS_Y, BTN_0, BTN_LEFT, BTN_MIDDLE,
    BTN_RIGHT, BTN_TOOL_DOUBLETAP, BTN_TOOL_FINGER, BTN_TOOL_PEN, BTN_TOOL_TRIPLETAP, BTN_TOUCH,
    INPUT_PROP_SEMI_MT, KEY_CNT,
};

/// Slot count used when the device advertises neither a slot nor a tracking-id range.
pub const DEFAULT_SLOT_COUNT: usize = 10;

/// Fixed-size bit set over event codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSet<const WORDS: usize> {
    words: [u64; WORDS],
}

impl<const WORDS: usize> BitSet<WORDS> {
    pub const fn new() -> Self {
        Self { words: [0; WORDS] }
    }

    pub const fn capacity() -> usize {
        WORDS * 64
    }

    pub fn insert(&mut self, bit: u16) {
        let bit = bit as usize;
        if bit < Self::capacity() {
            self.words[bit / 64] |= 1 << (bit % 64);
        }
    }

    pub fn contains(&self, bit: u16) -> bool {
        let bit = bit as usize;
        bit < Self::capacity() && (self.words[bit / 64] >> (bit % 64)) & 1 == 1
    }
}

impl<const WORDS: usize> Default for BitSet<WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

pub type AbsBits = BitSet<{ ABS_CNT / 64 }>;
pub type KeyBits = BitSet<{ KEY_CNT / 64 }>;
pub type PropBits = BitSet<1>;

/// Range metadata for one absolute axis (the parts of `input_absinfo` we use).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
    pub fuzz: i32,
    pub resolution: i32,
}

impl AxisRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self {
            min,
            max,
            fuzz: 0,
            resolution: 0,
        }
    }

    pub const fn with_fuzz(mut self, fuzz: i32) -> Self {
        self.fuzz = fuzz;
        self
    }

    pub const fn with_resolution(mut self, resolution: i32) -> Self {
        self.resolution = resolution;
        self
    }
}

impl fmt::Display for AxisRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

/// Static description of a touchpad model.
#[derive(Debug, Clone, Copy)]
pub struct DeviceProfile {
    pub name: &'static str,

    // Raw input_event size the device node produces (bytes)
    pub input_event_size: usize,

    pub axes: &'static [(u16, AxisRange)],
    pub keys: &'static [u16],
    pub props: &'static [u16],
}

impl DeviceProfile {
    pub const ALL: [&'static DeviceProfile; 2] = [&CLICKPAD, &SEMI_MT];

    /// Profile used when none is configured.
    pub fn default_profile() -> &'static Self {
        &CLICKPAD
    }

    pub fn by_name(name: &str) -> Option<&'static Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

}

/// The capability table consulted by the translator.
#[derive(Debug, Clone)]
pub struct Capabilities {
    abs: AbsBits,
    keys: KeyBits,
    props: PropBits,
    absinfo: [Option<AxisRange>; ABS_CNT],
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::new()
    }
}

impl Capabilities {
    pub fn new() -> Self {
        Self {
            abs: AbsBits::new(),
            keys: KeyBits::new(),
            props: PropBits::new(),
            absinfo: [None; ABS_CNT],
        }
    }

    pub fn from_profile(profile: &DeviceProfile) -> Self {
        let mut caps = Self::new();
        for &(code, range) in profile.axes {
            caps.set_abs(code, range);
        }
        for &key in profile.keys {
            caps.keys.insert(key);
        }
        for &prop in profile.props {
            caps.props.insert(prop);
        }
        caps
    }

    pub fn with_abs(mut self, code: u16, range: AxisRange) -> Self {
        self.set_abs(code, range);
        self
    }

    pub fn with_key(mut self, code: u16) -> Self {
        self.keys.insert(code);
        self
    }

    pub fn with_prop(mut self, prop: u16) -> Self {
        self.props.insert(prop);
        self
    }

    fn set_abs(&mut self, code: u16, range: AxisRange) {
        if (code as usize) < ABS_CNT {
            self.abs.insert(code);
            self.absinfo[code as usize] = Some(range);
        }
    }

    pub fn has_abs(&self, code: u16) -> bool {
        self.abs.contains(code)
    }

    pub fn has_key(&self, code: u16) -> bool {
        self.keys.contains(code)
    }

    pub fn has_prop(&self, prop: u16) -> bool {
        self.props.contains(prop)
    }

    pub fn axis(&self, code: u16) -> Option<AxisRange> {
        self.absinfo.get(code as usize).copied().flatten()
    }

    pub fn has_pressure(&self) -> bool {
        self.has_abs(ABS_PRESSURE)
    }

    /// True when any per-contact axis (touch major through MT pressure) is present.
    pub fn has_touch(&self) -> bool {
        (ABS_MT_TOUCH_MAJOR..=ABS_MT_PRESSURE).any(|code| self.has_abs(code))
    }

    pub fn is_semi_mt(&self) -> bool {
        self.has_touch() && self.has_prop(INPUT_PROP_SEMI_MT)
    }

    /// Number of hardware slots: the slot axis range, else the tracking-id range, else a default.
    pub fn num_slots(&self) -> usize {
        [ABS_MT_SLOT, ABS_MT_TRACKING_ID]
            .into_iter()
            .filter_map(|code| self.axis(code))
            .find(|range| range.max > 0)
            .map(|range| range.max as usize + 1)
            .unwrap_or(DEFAULT_SLOT_COUNT)
    }

    /// Synaptics-like touchpad check: X/Y, pressure or touch, a finger tool and no pen.
    pub fn is_touchpad(&self) -> bool {
        self.has_abs(ABS_X)
            && self.has_abs(ABS_Y)
            && (self.has_pressure() || self.has_key(BTN_TOUCH))
            && self.has_key(BTN_TOOL_FINGER)
            && !self.has_key(BTN_TOOL_PEN)
    }

    /// Kernel fuzz on X/Y, usable directly as hysteresis. Zero fuzz is not trusted.
    pub fn hysteresis(&self) -> (Option<i32>, Option<i32>) {
        let fuzz = |code| self.axis(code).map(|r| r.fuzz).filter(|&f| f > 0);
        (fuzz(ABS_X), fuzz(ABS_Y))
    }

    pub fn button_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        for (code, name) in [
            (BTN_LEFT, "left"),
            (BTN_RIGHT, "right"),
            (BTN_MIDDLE, "middle"),
            (BTN_TOOL_DOUBLETAP, "double"),
            (BTN_TOOL_TRIPLETAP, "triple"),
        ] {
            if self.has_key(code) {
                names.push(name);
            }
        }
        if (BTN_0..BTN_0 + 4).any(|code| self.has_key(code)) {
            names.push("scroll-buttons");
        }
        names
    }

    /// Log what the table says, the way a probe would report it.
    pub fn log_summary(&self, name: &str) {
        if let (Some(x), Some(y)) = (self.axis(ABS_X), self.axis(ABS_Y)) {
            log::info!("{}: x-axis range {}, y-axis range {}", name, x, y);
        }
        match self.axis(ABS_PRESSURE) {
            Some(p) => log::info!("{}: pressure range {}", name, p),
            None => log::info!("{}: device does not report pressure, will use touch data", name),
        }
        if let Some(w) = self.axis(ABS_TOOL_WIDTH) {
            log::info!("{}: finger width range {}", name, w);
        }
        log::info!("{}: buttons: {}", name, self.button_names().join(" "));
        if self.has_touch() {
            let mt_axes = (ABS_MT_TOUCH_MAJOR..=ABS_MT_PRESSURE)
                .filter(|&code| self.has_abs(code))
                .count();
            log::info!(
                "{}: {} MT axes, {} slots{}",
                name,
                mt_axes,
                self.num_slots(),
                if self.is_semi_mt() { ", semi-multitouch" } else { "" }
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::event::{ABS_MT_POSITION_Y, BTN_3};

    #[test]
    fn test_bitset_insert_contains() {
        let mut bits = KeyBits::new();
        assert!(!bits.contains(BTN_LEFT));
        bits.insert(BTN_LEFT);
        bits.insert(BTN_TOOL_FINGER);
        assert!(bits.contains(BTN_LEFT));
        assert!(bits.contains(BTN_TOOL_FINGER));
        assert!(!bits.contains(BTN_TOUCH));
        // Out of range bits are ignored.
        bits.insert(u16::MAX);
        assert!(!bits.contains(u16::MAX));
    }

    #[test]
    fn test_slot_count_discovery() {
        let caps = Capabilities::new().with_abs(ABS_MT_SLOT, AxisRange::new(0, 4));
        assert_eq!(caps.num_slots(), 5);

        let caps = Capabilities::new().with_abs(ABS_MT_TRACKING_ID, AxisRange::new(0, 1));
        assert_eq!(caps.num_slots(), 2);

        let caps = Capabilities::new().with_abs(ABS_MT_SLOT, AxisRange::new(0, 0));
        assert_eq!(caps.num_slots(), DEFAULT_SLOT_COUNT);
    }

    #[test]
    fn test_touchpad_check() {
        let base = Capabilities::new()
            .with_abs(ABS_X, AxisRange::new(0, 100))
            .with_abs(ABS_Y, AxisRange::new(0, 100))
            .with_key(BTN_TOOL_FINGER);
        assert!(!base.is_touchpad());

        let pad = base.clone().with_key(BTN_TOUCH);
        assert!(pad.is_touchpad());

        let tablet = pad.with_key(BTN_TOOL_PEN);
        assert!(!tablet.is_touchpad());
    }

    #[test]
    fn test_semi_mt_requires_touch_axes() {
        let caps = Capabilities::new().with_prop(INPUT_PROP_SEMI_MT);
        assert!(!caps.is_semi_mt());
        let caps = caps.with_abs(ABS_MT_POSITION_Y, AxisRange::new(0, 10));
        assert!(caps.is_semi_mt());
    }

    #[test]
    fn test_hysteresis_ignores_zero_fuzz() {
        let caps = Capabilities::new()
            .with_abs(ABS_X, AxisRange::new(0, 100).with_fuzz(8))
            .with_abs(ABS_Y, AxisRange::new(0, 100));
        assert_eq!(caps.hysteresis(), (Some(8), None));
    }

    #[test]
    fn test_builtin_profiles() {
        for profile in DeviceProfile::ALL {
            let caps = Capabilities::from_profile(profile);
            assert!(caps.is_touchpad(), "{} should be a touchpad", profile.name);
            assert!(caps.has_touch());
        }
        assert!(Capabilities::from_profile(&SEMI_MT).is_semi_mt());
        assert!(!Capabilities::from_profile(&CLICKPAD).is_semi_mt());
        assert_eq!(DeviceProfile::by_name("Semi-MT").map(|p| p.name), Some("semi-mt"));
        assert!(DeviceProfile::by_name("trackpoint").is_none());
    }

    #[test]
    fn test_button_names() {
        let caps = Capabilities::new().with_key(BTN_LEFT).with_key(BTN_3);
        assert_eq!(caps.button_names(), vec!["left", "scroll-buttons"]);
    }
}
