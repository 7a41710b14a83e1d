//! Firmware library - boot and UART bring-up logic
//!
//! Everything that can run without the real SoC lives here so it can be tested on the host.
//! Tests run in a std environment, while the firmware binary remains no_std.

#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod cpu;
pub mod logging;
pub mod memory;
pub mod mmio;
pub mod resources;
pub mod uart;
pub mod vectors;
