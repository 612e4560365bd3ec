use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mt-hwstate")]
#[command(about = "Decode a multitouch evdev stream into per-frame touchpad state")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Event device or capture file to read
    #[arg(long, env = "MTHW_DEVICE")]
    pub device: Option<PathBuf>,

    /// Built-in capability profile (clickpad, semi-mt)
    #[arg(long)]
    pub profile: Option<String>,

    /// Size of one input_event record: 16 (32-bit ABI) or 24 (64-bit ABI)
    #[arg(long)]
    pub event_size: Option<usize>,

    /// Treat the device as semi-multitouch even if it does not say so
    #[arg(long)]
    pub semi_mt: bool,

    /// Left edge of the area where new contacts are surfaced
    #[arg(long, allow_hyphen_values = true)]
    pub area_left: Option<i32>,

    /// Right edge of the activity area
    #[arg(long, allow_hyphen_values = true)]
    pub area_right: Option<i32>,

    /// Top edge of the activity area
    #[arg(long, allow_hyphen_values = true)]
    pub area_top: Option<i32>,

    /// Bottom edge of the activity area
    #[arg(long, allow_hyphen_values = true)]
    pub area_bottom: Option<i32>,

    /// Pressure reported for BTN_TOUCH on devices without a pressure axis (minus one)
    #[arg(long)]
    pub finger_high: Option<i32>,

    /// Identifier stamped on touch notifications
    #[arg(long)]
    pub device_id: Option<u32>,

    /// Path to config file
    #[arg(long, env = "MTHW_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print one hardware-state line per frame (default)
    Decode,
    /// Dump raw input events for debugging
    Dump,
}
