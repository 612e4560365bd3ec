//! Type-B multitouch event stream -> one [`HwState`] per frame.
//!
//! Events arrive one at a time. Axis values for the selected slot are collected
//! in a [`FrameAccumulator`] and settled into the slot table ("flushed") when the
//! slot changes or the frame ends. Flushing is where contacts are born, updated
//! and released, and where begin/update/end notifications are produced.
//!
//! Two views of the finger count exist at once: the slot table (precise) and
//! the BTN_TOOL_{FINGER,DOUBLETAP,TRIPLETAP} keys (legacy). The precise count
//! lags by up to one flush: a contact is counted when its slot is first flushed
//! after birth and uncounted when flushed after death.

use crate::device::Capabilities;
use crate::error::OpenError;
use crate::input::event::*;
use crate::input::RawEvent;

use super::frame::{FrameAccumulator, Metric, MtAxis};
use super::gate::{self, ActivityArea, TouchGate};
use super::hwstate::{DeviceId, Finger, HwState, TouchEvent, TouchEventKind};
use super::scroll::{scroll_engaged, ScrollSelector};
use super::slot::{Contact, Phase, Position, SlotTable};

/// Pressure threshold used when BTN_TOUCH has to stand in for ABS_PRESSURE.
pub const DEFAULT_FINGER_HIGH: i32 = 30;

/// Per-device settings supplied at open time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TouchpadParams {
    pub device: DeviceId,
    pub area: ActivityArea,
    /// BTN_TOUCH without a pressure axis reports `finger_high + 1`.
    pub finger_high: i32,
    /// Used only when the capability table has no usable X/Y fuzz.
    pub hysteresis: (i32, i32),
    pub force_semi_mt: bool,
    /// Slot the kernel had selected when the device was opened.
    pub initial_slot: Option<usize>,
}

impl Default for TouchpadParams {
    fn default() -> Self {
        Self {
            device: DeviceId::default(),
            area: ActivityArea::unbounded(),
            finger_high: DEFAULT_FINGER_HIGH,
            hysteresis: (0, 0),
            force_semi_mt: false,
            initial_slot: Some(0),
        }
    }
}

/// BTN_TOOL_* finger-count keys.
#[derive(Debug, Clone, Copy, Default)]
struct LegacyFingers {
    one: bool,
    two: bool,
    three: bool,
}

impl LegacyFingers {
    fn count(&self) -> Option<usize> {
        if self.one {
            Some(1)
        } else if self.two {
            Some(2)
        } else if self.three {
            Some(3)
        } else {
            None
        }
    }
}

pub struct EventTranslator {
    caps: Capabilities,
    params: TouchpadParams,
    has_touch: bool,
    semi_mt: bool,

    slots: SlotTable,
    frame: FrameAccumulator,
    scroll: ScrollSelector,

    current_slot: Option<usize>,
    active_touches: usize,
    depressed: bool,
    pressing_slot: Option<usize>,
    last_sender: Option<usize>,
    next_tracking_id: u32,
    legacy: LegacyFingers,

    /// Running hardware state; snapshots are copies of it.
    hw: HwState,
    touch_events: Vec<TouchEvent>,
    /// The next event starts a new event set.
    new_eventset: bool,
    /// Something other than a frame boundary arrived since the last snapshot.
    dirty: bool,
}

impl EventTranslator {
    pub fn open(caps: Capabilities, mut params: TouchpadParams) -> Result<Self, OpenError> {
        if !caps.is_touchpad() {
            return Err(OpenError::NotATouchpad);
        }

        caps.log_summary(&format!("touchpad {}", params.device.0));

        let has_touch = caps.has_touch();
        let semi_mt = has_touch && (caps.is_semi_mt() || params.force_semi_mt);
        let slot_count = if has_touch { caps.num_slots() } else { 0 };
        let slots = SlotTable::new(slot_count).map_err(|source| OpenError::SlotAllocation {
            slots: slot_count,
            source,
        })?;

        let (fuzz_x, fuzz_y) = caps.hysteresis();
        params.hysteresis = (
            fuzz_x.unwrap_or(params.hysteresis.0),
            fuzz_y.unwrap_or(params.hysteresis.1),
        );

        let current_slot = params.initial_slot.filter(|&slot| slot < slot_count);
        if has_touch && current_slot != params.initial_slot {
            log::warn!(
                "Initial slot {:?} out of range ({} slots), waiting for a slot event",
                params.initial_slot,
                slot_count
            );
        }

        Ok(Self {
            caps,
            params,
            has_touch,
            semi_mt,
            slots,
            frame: FrameAccumulator::new(),
            scroll: ScrollSelector::new(),
            current_slot,
            active_touches: 0,
            depressed: false,
            pressing_slot: None,
            last_sender: None,
            next_tracking_id: 0,
            legacy: LegacyFingers::default(),
            hw: HwState::default(),
            touch_events: Vec::new(),
            new_eventset: false,
            dirty: false,
        })
    }

    pub fn params(&self) -> &TouchpadParams {
        &self.params
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.caps
    }

    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    pub fn active_touches(&self) -> usize {
        self.active_touches
    }

    pub fn is_semi_mt(&self) -> bool {
        self.semi_mt
    }

    /// Apply one event. Returns a snapshot when the event closes a frame.
    pub fn translate(&mut self, ev: &RawEvent) -> Option<HwState> {
        if self.new_eventset {
            self.new_eventset = false;
            self.scroll.clear_moved();
        }

        match ev.ty() {
            EV_SYN if ev.is_frame_boundary() => return Some(self.finish_frame(ev.time_ms)),
            EV_KEY => {
                self.dirty = true;
                self.process_key(ev.code(), ev.value());
            }
            EV_ABS => {
                self.dirty = true;
                self.process_abs(ev.code(), ev.value());
            }
            _ => {}
        }
        None
    }

    fn finish_frame(&mut self, millis: u64) -> HwState {
        self.flush_slot();
        debug_assert_eq!(self.active_touches, self.slots.counted());

        self.hw.num_fingers = self.finger_count();

        let snapshot = HwState {
            millis,
            scroll_fingers: self.scroll.pins().map(|pin| pin.and_then(|s| self.finger(s))),
            pressing_finger: if self.depressed {
                self.pressing_slot.and_then(|s| self.finger(s))
            } else {
                None
            },
            scroll_pass_x: self.scroll.moved(Metric::X),
            scroll_pass_y: self.scroll.moved(Metric::Y),
            new_eventset: self.dirty,
            bounds: self.slots.bounds(),
            touch_events: std::mem::take(&mut self.touch_events),
            ..self.hw.clone()
        };

        self.dirty = false;
        self.new_eventset = true;
        snapshot
    }

    /// Precise count while it is trustworthy (fewer than two contacts),
    /// otherwise whatever the BTN_TOOL_* keys say.
    fn finger_count(&self) -> usize {
        if self.has_touch && self.active_touches < 2 {
            return self.active_touches;
        }
        self.legacy
            .count()
            .unwrap_or(if self.has_touch { self.active_touches } else { 0 })
    }

    fn finger(&self, slot: usize) -> Option<Finger> {
        self.slots
            .contact(slot)
            .map(|contact| Finger::from_contact(slot, contact))
    }

    fn process_key(&mut self, code: u16, value: i32) {
        let down = value != 0;
        match code {
            BTN_LEFT => {
                self.hw.left = down;
                self.depressed = down;
                self.pressing_slot = self.current_slot;
            }
            BTN_RIGHT => self.hw.right = down,
            BTN_MIDDLE => self.hw.middle = down,
            BTN_FORWARD => self.hw.up = down,
            BTN_BACK => self.hw.down = down,
            BTN_0..=BTN_7 => self.hw.multi[(code - BTN_0) as usize] = down,
            BTN_TOOL_FINGER => self.legacy.one = down,
            BTN_TOOL_DOUBLETAP => self.legacy.two = down,
            BTN_TOOL_TRIPLETAP => self.legacy.three = down,
            BTN_TOUCH => {
                if !self.caps.has_pressure() {
                    self.hw.z = if down { self.params.finger_high + 1 } else { 0 };
                }
            }
            _ => {}
        }
    }

    fn process_abs(&mut self, code: u16, value: i32) {
        match code {
            ABS_PRESSURE => self.hw.z = value,
            ABS_TOOL_WIDTH => self.hw.finger_width = value,
            ABS_X if !self.has_touch => self.hw.x = value,
            ABS_Y if !self.has_touch => self.hw.y = value,
            ABS_MT_SLOT => self.select_slot(value),
            ABS_MT_TRACKING_ID => self.process_tracking_id(value),
            _ => {
                if let Some(axis) = MtAxis::from_code(code) {
                    match axis.metric() {
                        Some(metric) => self.process_position(axis, metric, value),
                        None => self.process_contact_axis(axis, value),
                    }
                }
            }
        }
    }

    fn select_slot(&mut self, value: i32) {
        if !self.has_touch {
            log::debug!("Ignoring slot {} on a device without multitouch", value);
            return;
        }
        let slot = match usize::try_from(value) {
            Ok(slot) if slot < self.slots.len() => slot,
            _ => {
                log::warn!(
                    "Ignoring out of range slot {} ({} slots)",
                    value,
                    self.slots.len()
                );
                return;
            }
        };

        self.flush_slot();
        self.current_slot = Some(slot);
    }

    fn process_tracking_id(&mut self, value: i32) {
        let Some(slot) = self.current_slot else {
            return;
        };

        if value < 0 {
            if self.slots.mark_closing(slot) && self.last_sender == Some(slot) {
                self.last_sender = None;
            }
            return;
        }

        if self.slots.contact(slot).is_some_and(Contact::is_closing) {
            // Released and reused within one frame: settle the release first.
            self.flush_slot();
        }

        if let Some(contact) = self.slots.contact(slot) {
            log::warn!(
                "Ignoring new tracking ID {} for existing touch {} in slot {}",
                value,
                contact.tracking_id,
                slot
            );
            return;
        }

        let tracking_id = self.next_tracking_id;
        self.next_tracking_id = self.next_tracking_id.wrapping_add(1);

        // Unchanged axes are not resent for the new contact, so start from where
        // this slot's previous contact left off.
        let position = self.slots.released_position(slot).unwrap_or_else(|| {
            let known = self.frame.last_known();
            Position {
                x: known.get(MtAxis::PositionX),
                y: known.get(MtAxis::PositionY),
            }
        });
        self.slots.birth(slot, tracking_id, value, position);
        self.frame.inherit_last_known();
        log::debug!("S={:2} touch {} born (hardware id {})", slot, tracking_id, value);
    }

    fn process_contact_axis(&mut self, axis: MtAxis, value: i32) {
        if self.current_slot.is_some() {
            self.frame.record(axis, value);
        }
    }

    fn process_position(&mut self, axis: MtAxis, metric: Metric, value: i32) {
        let Some(slot) = self.current_slot else {
            return;
        };
        let Some(contact) = self.slots.contact_mut(slot) else {
            self.frame.remember(axis, value);
            log::debug!("S={:2} {:?}={:6} on an inactive slot", slot, metric, value);
            return;
        };
        contact.position.set(metric, value);
        let position = contact.position;

        if gate::press_suppresses(slot, self.pressing_slot, self.depressed, self.active_touches) {
            self.frame.remember(axis, value);
            log::debug!("S={:2} {:?}={:6} withheld (pressing finger)", slot, metric, value);
            return;
        }
        self.frame.record(axis, value);

        if self.last_sender != Some(slot) {
            // Switching contacts: restart from this contact's own coordinates.
            self.hw.new_coords = true;
            if let Some(x) = position.x {
                self.hw.x = x;
            }
            if let Some(y) = position.y {
                self.hw.y = y;
            }
        } else {
            self.hw.new_coords = false;
        }
        self.last_sender = Some(slot);

        match metric {
            Metric::X => self.hw.x = value,
            Metric::Y => self.hw.y = value,
        }

        self.scroll.observe(
            slot,
            metric,
            scroll_engaged(self.active_touches, self.depressed),
        );
    }

    /// Settle the selected slot's pending birth, update or release.
    fn flush_slot(&mut self) {
        if let Some(slot) = self.current_slot {
            if let Some(contact) = self.slots.contact(slot).copied() {
                self.flush_contact(slot, contact);
            }
        }
        self.frame.clear_frame();
    }

    fn flush_contact(&mut self, slot: usize, contact: Contact) {
        match contact.phase {
            Phase::Closing { counted } => {
                if contact.has_open_touch_event && !self.semi_mt {
                    self.push_touch_event(TouchEventKind::End, slot, &contact);
                }
                if counted {
                    self.active_touches = self.active_touches.saturating_sub(1);
                }
                self.slots.release(slot);
                log::debug!("S={:2} touch {} released", slot, contact.tracking_id);
            }
            Phase::Born | Phase::Deferred => {
                if contact.phase == Phase::Born {
                    self.active_touches += 1;
                }
                self.decide_begin(slot);
            }
            Phase::Live => {
                if contact.has_open_touch_event && !self.semi_mt && !self.frame.frame().is_empty() {
                    self.push_touch_event(TouchEventKind::Update, slot, &contact);
                }
            }
        }
    }

    fn decide_begin(&mut self, slot: usize) {
        let bounds = self.slots.bounds();
        let Some(contact) = self.slots.contact_mut(slot) else {
            return;
        };

        let in_area = gate::contact_in_area(
            &self.params.area,
            self.semi_mt,
            contact.position.point(),
            bounds,
            self.active_touches,
        );
        contact.in_active_area = in_area.unwrap_or(false);

        match gate::birth_gate(in_area, self.semi_mt, self.depressed) {
            TouchGate::Emit => {
                contact.phase = Phase::Live;
                contact.has_open_touch_event = true;
                let contact = *contact;
                self.push_touch_event(TouchEventKind::Begin, slot, &contact);
            }
            TouchGate::Suppress => {
                contact.phase = Phase::Live;
                log::debug!("S={:2} touch {} not surfaced", slot, contact.tracking_id);
            }
            TouchGate::Defer => {
                contact.phase = Phase::Deferred;
                log::debug!(
                    "S={:2} touch {} has no coordinates yet, deferring begin",
                    slot,
                    contact.tracking_id
                );
            }
        }
    }

    fn push_touch_event(&mut self, kind: TouchEventKind, slot: usize, contact: &Contact) {
        self.touch_events.push(TouchEvent {
            kind,
            tracking_id: contact.tracking_id,
            hardware_id: contact.hardware_id,
            slot,
            axes: *self.frame.frame(),
            device: self.params.device,
        });
    }
}
