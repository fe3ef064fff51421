//! Correlation of MTD hits across the simulation, digitization and
//! reconstruction stages, and per-cell statistics over many events.
//!
//! Per event and detector region, four mergers fold the hit collections into
//! a [`record::CellTable`] keyed by cell id; the [`aggregator::Aggregator`]
//! then filters the cells and pushes their observations into a
//! [`sink::StatsSink`].

pub mod types;
pub mod event;
pub mod record;
pub mod merge;
pub mod timewalk;
pub mod region;
pub mod sink;
pub mod aggregator;
pub mod config;
pub mod io;
pub mod utils;

pub use aggregator::{Aggregator, Settings};
pub use region::{Barrel, Endcap, Region};
