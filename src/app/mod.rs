//! Application core: session control and operator I/O, zero hardware.
//!
//! This module contains the interaction rules for the calibration console:
//! the menu state machine, command decoding, line input, and the live-read
//! loop.  All interaction with hardware happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without a real
//! load cell or serial port.

pub mod commands;
pub mod events;
pub mod input;
pub mod live_read;
pub mod ports;
pub mod render;
pub mod service;
