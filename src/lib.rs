//! Decode a type-B multitouch evdev stream into per-frame hardware state.

pub mod config;
pub mod device;
pub mod error;
pub mod input;
pub mod pipeline;
pub mod touch;
