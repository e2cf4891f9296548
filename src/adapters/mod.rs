//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements          | Connects to               |
//! |-----------------|---------------------|---------------------------|
//! | `console`       | ConsolePort         | stdin / stdout            |
//! |                 | EventSink           | rendered operator text    |
//! | `sim_load_cell` | LoadCellPort        | simulated HX711 bridge    |
//! | `time`          | ClockPort           | `std::time::Instant`      |
//! |                 | DelayNs             | `std::thread::sleep`      |
//!
//! A firmware build supplies its own `LoadCellPort` (an HX711 driver) and a
//! UART `ConsolePort`; the application core does not change.

pub mod console;
pub mod sim_load_cell;
pub mod time;
