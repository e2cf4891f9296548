//! ScaleCal library.
//!
//! Interactive calibration console for HX711 strain-gauge load cells.
//! The application core (`app`, `calibration`) talks to hardware only
//! through the port traits in [`app::ports`]; `adapters` holds the host
//! implementations used by the `scalecal` binary.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod calibration;
pub mod config;
pub mod error;
pub mod units;
