//! Where the per-event statistics go
//!
//! The aggregator pushes one observation per metric and cell into a
//! `StatsSink`, addressing accumulators by name. What an accumulator does
//! with the observation (binning, averaging, storage) is up to the sink.

pub mod book;
mod histogram;

pub use histogram::{Accumulator, HistogramBook, Profile};

use std::collections::BTreeSet;

pub trait StatsSink {
    /// Add one observation to a 1-D distribution
    fn fill_1d(&mut self, name: &str, x: f64);
    /// Add one observation to a 2-D distribution
    fn fill_2d(&mut self, name: &str, x: f64, y: f64);
    /// Add `y` to the running mean of `name` at `x`
    fn fill_profile(&mut self, name: &str, x: f64, y: f64);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fill {
    One(f64),
    Two(f64, f64),
    Profile(f64, f64),
}

/// Sink which keeps every observation, in order of arrival
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    pub observations: Vec<(String, Fill)>,
}

impl Recorder {
    pub fn new() -> Self { Self::default() }

    /// All observations made under `name`
    pub fn fills(&self, name: &str) -> Vec<Fill> {
        self.observations.iter()
            .filter(|(n, _)| n == name)
            .map(|&(_, fill)| fill)
            .collect()
    }

    pub fn count(&self, name: &str) -> usize { self.fills(name).len() }

    pub fn names(&self) -> BTreeSet<&str> {
        self.observations.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool { self.observations.is_empty() }
}

impl StatsSink for Recorder {
    fn fill_1d(&mut self, name: &str, x: f64) {
        self.observations.push((name.to_owned(), Fill::One(x)));
    }

    fn fill_2d(&mut self, name: &str, x: f64, y: f64) {
        self.observations.push((name.to_owned(), Fill::Two(x, y)));
    }

    fn fill_profile(&mut self, name: &str, x: f64, y: f64) {
        self.observations.push((name.to_owned(), Fill::Profile(x, y)));
    }
}
