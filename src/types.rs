pub use units::todo::{Chargef32, Energyf32, Lengthf32, Timef32};

/// Raw identifier of one readout cell, shared by all stages of one event
pub type CellId = detid::RawId;

/// Identifier of the simulated track which produced a hit
pub type TrackId = i32;

/// Simulated energy losses are given in GeV; everything downstream is in MeV
pub const MEV_PER_GEV: Energyf32 = 1000.0;
