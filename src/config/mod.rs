mod cli;
mod file;

pub use cli::{Cli, Command};

use std::path::PathBuf;

use crate::device::{Capabilities, DeviceProfile};
use crate::input::event::{INPUT_EVENT_SIZE_32, INPUT_EVENT_SIZE_64};
use crate::touch::translator::DEFAULT_FINGER_HIGH;
use crate::touch::{ActivityArea, DeviceId, TouchpadParams};

const DEFAULT_DEVICE: &str = "/dev/input/event0";

/// Merged configuration from CLI args and TOML file.
#[derive(Debug, Clone)]
pub struct Config {
    pub device: PathBuf,
    pub profile: String,
    pub event_size: Option<usize>,
    pub semi_mt: bool,
    pub area: ActivityArea,
    pub finger_high: i32,
    pub device_id: u32,
    pub hysteresis: i32,
    pub initial_slot: usize,
}

impl Config {
    /// Load configuration by merging TOML file with CLI overrides.
    pub fn load(cli: &Cli) -> Self {
        let file_config = cli
            .config
            .as_ref()
            .and_then(|p| file::load_from_path(p))
            .or_else(file::load_from_default_paths)
            .unwrap_or_default();

        let file_area = file_config.area;
        let area = ActivityArea {
            left: cli.area_left.or(file_area.left),
            right: cli.area_right.or(file_area.right),
            top: cli.area_top.or(file_area.top),
            bottom: cli.area_bottom.or(file_area.bottom),
        };

        Self {
            device: cli
                .device
                .clone()
                .or(file_config.device)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DEVICE)),
            profile: cli
                .profile
                .clone()
                .or(file_config.profile)
                .unwrap_or_else(|| DeviceProfile::default_profile().name.into()),
            event_size: cli.event_size.or(file_config.event_size),
            semi_mt: cli.semi_mt || file_config.semi_mt,
            area,
            finger_high: cli
                .finger_high
                .or(file_config.finger_high)
                .unwrap_or(DEFAULT_FINGER_HIGH),
            device_id: cli.device_id.or(file_config.device_id).unwrap_or(0),
            hysteresis: file_config.hysteresis.unwrap_or(0),
            initial_slot: file_config.initial_slot.unwrap_or(0),
        }
    }

    pub fn profile(&self) -> Option<&'static DeviceProfile> {
        DeviceProfile::by_name(&self.profile)
    }

    /// Record size: configured, else the profile's, else the native ABI's.
    pub fn event_size(&self) -> usize {
        self.event_size.unwrap_or_else(|| {
            self.profile()
                .unwrap_or_else(DeviceProfile::default_profile)
                .input_event_size
        })
    }

    pub fn capabilities(&self) -> Option<Capabilities> {
        self.profile().map(Capabilities::from_profile)
    }

    pub fn params(&self) -> TouchpadParams {
        TouchpadParams {
            device: DeviceId(self.device_id),
            area: self.area,
            finger_high: self.finger_high,
            hysteresis: (self.hysteresis, self.hysteresis),
            force_semi_mt: self.semi_mt,
            initial_slot: Some(self.initial_slot),
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        if self.profile().is_none() {
            return Err("Unknown device profile (expected clickpad or semi-mt)");
        }
        let size = self.event_size();
        if size != INPUT_EVENT_SIZE_32 && size != INPUT_EVENT_SIZE_64 {
            return Err("Event size must be 16 or 24 bytes");
        }
        self.area.validate()?;
        if self.hysteresis < 0 {
            return Err("Hysteresis must not be negative");
        }
        Ok(())
    }
}
