//! Per-cell aggregate of the four reconstruction stages of one event

use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Index, IndexMut};

use crate::types::{CellId, Chargef32, Energyf32, Lengthf32, Timef32, TrackId};

/// One of the two readout ends of a cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side { Zero, One }

impl Side {
    pub const BOTH: [Side; 2] = [Side::Zero, Side::One];

    pub fn index(self) -> usize {
        match self {
            Side::Zero => 0,
            Side::One  => 1,
        }
    }

    /// Name of the per-side version of `metric`: `h_e_digi` -> `h_e_digi_0`
    pub fn metric(self, metric: &str) -> String { format!("{metric}_{}", self.index()) }
}

/// A pair of values, one for each `Side`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PerSide<T>([T; 2]);

impl<T> PerSide<T> {
    pub fn new(zero: T, one: T) -> Self { Self([zero, one]) }
}

impl<T> Index<Side> for PerSide<T> {
    type Output = T;
    fn index(&self, side: Side) -> &T { &self.0[side.index()] }
}

impl<T> IndexMut<Side> for PerSide<T> {
    fn index_mut(&mut self, side: Side) -> &mut T { &mut self.0[side.index()] }
}

/// Time and local position of the earliest sim hit in a cell
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FirstSimHit {
    pub time: Timef32,
    pub x: Lengthf32,
    pub y: Lengthf32,
    pub z: Lengthf32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellRecord {
    /// Sum over sim hits inside the integration window [MeV]
    pub sim_energy: Energyf32,
    /// Latched once, from the earliest sim hit; `None` if no sim hit was seen
    pub first_sim: Option<FirstSimHit>,

    pub digi_charge: PerSide<u32>,
    pub digi_time1 : PerSide<u32>,
    pub digi_time2 : PerSide<u32>,

    pub ureco_charge: PerSide<Chargef32>,
    pub ureco_time  : PerSide<Timef32>,

    pub reco_energy: Energyf32,
    pub reco_time  : Timef32,
}

impl CellRecord {
    // Cells without sim hits report zeros, like every other unset field.
    pub fn sim_time(&self) -> Timef32   { self.first_sim.map_or(0.0, |h| h.time) }
    pub fn sim_x   (&self) -> Lengthf32 { self.first_sim.map_or(0.0, |h| h.x) }
    pub fn sim_y   (&self) -> Lengthf32 { self.first_sim.map_or(0.0, |h| h.y) }
    pub fn sim_z   (&self) -> Lengthf32 { self.first_sim.map_or(0.0, |h| h.z) }

    pub fn energy_residual(&self) -> Energyf32 { self.reco_energy - self.sim_energy }
    pub fn   time_residual(&self) -> Timef32   { self.reco_time   - self.sim_time()  }

    /// Reco time with the mean of the per-side time-walk corrections added
    pub fn walked_reco_time(&self, corrections: PerSide<Timef32>) -> Timef32 {
        self.reco_time + 0.5 * (corrections[Side::Zero] + corrections[Side::One])
    }
}

/// Per-event counts of cells with a contribution at each stage
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Occupancy {
    /// Distinct valid cells with at least one sim hit
    pub sim: usize,
    /// Digi frames with non-zero charge, per side
    pub digi: PerSide<usize>,
    /// Uncalibrated hits with positive amplitude, per side
    pub ureco: PerSide<usize>,
    /// Reco hits with positive energy
    pub reco: usize,
}

/// Everything known about the cells of one event.
///
/// Created empty for each event, filled by the mergers, consumed when the
/// statistics are emitted.
#[derive(Clone, Debug, Default)]
pub struct CellTable {
    pub records: BTreeMap<CellId, CellRecord>,
    /// Distinct tracks which deposited energy, only for cells with sim hits
    pub tracks: BTreeMap<CellId, BTreeSet<TrackId>>,
    pub occupancy: Occupancy,
}

impl CellTable {
    /// Record of cell `id`, created on first reference
    pub fn record(&mut self, id: CellId) -> &mut CellRecord {
        self.records.entry(id).or_default()
    }

    pub fn get(&self, id: CellId) -> Option<&CellRecord> { self.records.get(&id) }

    pub fn n_tracks(&self, id: CellId) -> usize { self.tracks.get(&id).map_or(0, BTreeSet::len) }

    pub fn is_empty(&self) -> bool { self.records.is_empty() && self.tracks.is_empty() }
}
