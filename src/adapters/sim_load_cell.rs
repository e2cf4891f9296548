//! Simulated HX711 load cell.
//!
//! Stands in for the bridge amplifier on host builds.  Raw counts are
//! `zero_offset + load_lb * counts_per_lb` plus a small repeating jitter so
//! averaging has something to do.  Tare and scale behave like the HX711
//! reference library: `read_units = (raw - offset) / scale`.

use log::debug;

use crate::app::ports::LoadCellPort;
use crate::config::SimConfig;
use crate::units::KG_PER_LB;

/// Samples averaged by [`tare`](LoadCellPort::tare), as in the HX711 library.
const TARE_SAMPLES: u8 = 10;

/// Repeating noise pattern in raw counts.
const JITTER: [i32; 6] = [0, 3, -2, 1, -3, 1];

pub struct SimulatedLoadCell {
    counts_per_lb: f32,
    zero_offset: i32,
    load_kg: f32,
    ready_after_polls: u32,
    polls: u32,
    offset: i32,
    scale: f32,
    sample: usize,
}

impl SimulatedLoadCell {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            counts_per_lb: config.counts_per_lb,
            zero_offset: config.zero_offset_counts,
            load_kg: config.load_kg,
            ready_after_polls: config.ready_after_polls,
            polls: 0,
            offset: 0,
            scale: 1.0,
            sample: 0,
        }
    }

    /// Put `kg` on the platform (0.0 = empty).
    pub fn set_load_kg(&mut self, kg: f32) {
        self.load_kg = kg;
    }

    /// Current tare offset in raw counts.
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Current divisor.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    fn ideal_counts(&self) -> i32 {
        let load_counts = self.load_kg / KG_PER_LB * self.counts_per_lb;
        self.zero_offset.saturating_add(load_counts as i32)
    }
}

impl LoadCellPort for SimulatedLoadCell {
    fn is_ready(&mut self) -> bool {
        self.polls = self.polls.saturating_add(1);
        self.polls > self.ready_after_polls
    }

    fn set_scale(&mut self, factor: f32) {
        self.scale = factor;
    }

    fn tare(&mut self) {
        self.offset = self.read_raw_average(TARE_SAMPLES);
        debug!("sim: tare offset {}", self.offset);
    }

    fn read_raw(&mut self) -> i32 {
        let jitter = JITTER[self.sample % JITTER.len()];
        self.sample = self.sample.wrapping_add(1);
        self.ideal_counts().saturating_add(jitter)
    }

    fn read_units(&mut self) -> f32 {
        let raw = self.read_raw();
        raw.saturating_sub(self.offset) as f32 / self.scale
    }
}
