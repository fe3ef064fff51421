//! Per-event driver: merge the four stages, then emit statistics
//!
//! An event goes through two phases. `collect` builds a fresh `CellTable`
//! from the event's collections; `emit` consumes it, pushing observations
//! into a `StatsSink`. Nothing survives from one event to the next.

use std::marker::PhantomData;

use tracing::debug;

use units::Time;

use crate::event::{AccessError, EventSource};
use crate::merge::{merge_digis, merge_reco_hits, merge_sim_hits, merge_ureco_hits};
use crate::record::{CellRecord, CellTable, Occupancy, PerSide, Side};
use crate::region::Region;
use crate::sink::StatsSink;
use crate::timewalk::TimeWalk;
use crate::types::{Energyf32, Timef32};

/// Cuts applied in one detector region
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    /// Sim hits arriving later do not contribute energy
    pub integration_window: Time,
    /// Cells with less reco energy [MeV] are not reported at all
    pub minimum_energy: Energyf32,
}

pub struct Aggregator<R: Region> {
    settings: Settings,
    timewalk: TimeWalk,
    region: PhantomData<R>,
}

impl<R: Region> Aggregator<R> {
    pub fn new(settings: Settings, timewalk: TimeWalk) -> Self {
        Self { settings, timewalk, region: PhantomData }
    }

    /// Merge and emit one event. Returns the event's occupancy.
    pub fn analyze(&self, event: &impl EventSource, sink: &mut impl StatsSink) -> Result<Occupancy, AccessError> {
        let table = self.collect(event)?;
        let occupancy = table.occupancy;
        self.emit(table, sink);
        Ok(occupancy)
    }

    /// Fold the event's four collections into a new table, in pipeline order
    pub fn collect(&self, event: &impl EventSource) -> Result<CellTable, AccessError> {
        let detector = R::DETECTOR;
        let mut table = CellTable::default();
        merge_sim_hits  (&mut table, event.sim_hits  (detector)?, self.settings.integration_window);
        merge_digis     (&mut table, event.digis     (detector)?);
        merge_ureco_hits(&mut table, event.ureco_hits(detector)?);
        merge_reco_hits (&mut table, event.reco_hits (detector)?);
        debug!(?detector, cells = table.records.len(), occupancy = ?table.occupancy, "event merged");
        Ok(table)
    }

    /// Push the event's statistics into `sink`, discarding the table
    pub fn emit(&self, table: CellTable, sink: &mut impl StatsSink) {
        emit_multiplicities(&table, sink);
        for (&id, record) in &table.records {
            // Below threshold: nothing at all about this cell
            if record.reco_energy < self.settings.minimum_energy { continue }
            let index = R::cell_index(id);
            let cell = Cell {
                phi    : index.iphi as f64,
                eta    : index.ieta as f64,
                abs_eta: index.ieta.abs() as f64,
            };
            emit_sim(record, cell, sink);
            let corrections = self.emit_sides(record, cell, sink);
            emit_reco(record, cell, corrections, sink);
        }
    }

    /// Digi and uncalibrated-reco statistics, side by side. Returns the
    /// time-walk correction of each side, zero for sides without a pulse.
    fn emit_sides(&self, r: &CellRecord, cell: Cell, sink: &mut impl StatsSink) -> PerSide<Timef32> {
        let mut corrections = PerSide::<Timef32>::default();
        for side in Side::BOTH {
            if r.digi_charge[side] == 0 { continue }
            emit_digi(r, side, cell, sink);

            if r.ureco_charge[side] == 0.0 { continue }
            emit_ureco(r, side, cell, sink);

            let (charge, time) = (r.ureco_charge[side], r.ureco_time[side]);
            if let Some(correction) = self.timewalk.correction(charge) { corrections[side] = correction; }
            if let Some(corrected)  = self.timewalk.corrected(time, charge) {
                sink.fill_1d(&side.metric("h_t_ureco_uncorr"), corrected as f64);
            }
        }
        corrections
    }
}

/// Spatial coordinates of a cell, as fill values
#[derive(Clone, Copy)]
struct Cell {
    phi: f64,
    eta: f64,
    abs_eta: f64,
}

fn emit_multiplicities(table: &CellTable, sink: &mut impl StatsSink) {
    for tracks in table.tracks.values() {
        sink.fill_1d("h_n_sim_trk", tracks.len() as f64);
    }
    let occupancy = &table.occupancy;
    sink.fill_1d("h_n_sim_cell", occupancy.sim as f64);
    for side in Side::BOTH {
        sink.fill_1d(&side.metric("h_n_digi" ), occupancy.digi [side] as f64);
        sink.fill_1d(&side.metric("h_n_ureco"), occupancy.ureco[side] as f64);
    }
    sink.fill_1d("h_n_reco", occupancy.reco as f64);
}

fn emit_sim(r: &CellRecord, Cell { phi, eta, abs_eta }: Cell, sink: &mut impl StatsSink) {
    let e = r.sim_energy as f64;
    let t = r.sim_time() as f64;

    sink.fill_1d("h_e_sim", e);
    sink.fill_1d("h_t_sim", t);
    sink.fill_1d("h_x_sim", r.sim_x() as f64);
    sink.fill_1d("h_y_sim", r.sim_y() as f64);
    sink.fill_1d("h_z_sim", r.sim_z() as f64);

    sink.fill_2d("h_occupancy_sim", phi, eta);
    sink.fill_1d("h_phi_sim", phi);
    sink.fill_1d("h_eta_sim", eta);

    for (kind, x, y) in [("t_e", e, t), ("e_eta", abs_eta, e), ("t_eta", abs_eta, t), ("e_phi", phi, e), ("t_phi", phi, t)] {
        sink.fill_2d     (&format!("h_{kind}_sim"), x, y);
        sink.fill_profile(&format!("p_{kind}_sim"), x, y);
    }
}

fn emit_digi(r: &CellRecord, side: Side, Cell { phi, eta, abs_eta }: Cell, sink: &mut impl StatsSink) {
    let m = |name: &str| side.metric(name);
    let q  = r.digi_charge[side] as f64;
    let t1 = r.digi_time1 [side] as f64;
    let t2 = r.digi_time2 [side] as f64;

    sink.fill_1d(&m("h_e_digi") , q);
    sink.fill_1d(&m("h_t1_digi"), t1);
    sink.fill_1d(&m("h_t2_digi"), t2);

    sink.fill_2d(&m("h_occupancy_digi"), phi, eta);
    sink.fill_1d(&m("h_phi_digi"), phi);
    sink.fill_1d(&m("h_eta_digi"), eta);

    for (kind, x, y) in [
        ("t1_e"  , q      , t1), ("t2_e"  , q      , t2),
        ("e_eta" , abs_eta, q ), ("t1_eta", abs_eta, t1), ("t2_eta", abs_eta, t2),
        ("e_phi" , phi    , q ), ("t1_phi", phi    , t1), ("t2_phi", phi    , t2),
    ] {
        sink.fill_2d     (&m(&format!("h_{kind}_digi")), x, y);
        sink.fill_profile(&m(&format!("p_{kind}_digi")), x, y);
    }
}

fn emit_ureco(r: &CellRecord, side: Side, Cell { phi, eta, .. }: Cell, sink: &mut impl StatsSink) {
    let m = |name: &str| side.metric(name);
    let q = r.ureco_charge[side] as f64;
    let t = r.ureco_time  [side] as f64;

    sink.fill_1d(&m("h_e_ureco"), q);
    sink.fill_1d(&m("h_t_ureco"), t);
    sink.fill_2d(&m("h_occupancy_ureco"), phi, eta);
    sink.fill_2d     (&m("h_t_amp_ureco"), q, t);
    sink.fill_profile(&m("p_t_amp_ureco"), q, t);
}

fn emit_reco(r: &CellRecord, Cell { phi, eta, .. }: Cell, corrections: PerSide<Timef32>, sink: &mut impl StatsSink) {
    if r.reco_energy == 0.0 { return }
    let sim_e = r.sim_energy as f64;
    let sim_t = r.sim_time() as f64;

    sink.fill_2d("h_occupancy_reco", phi, eta);

    sink.fill_1d("h_e_reco", r.reco_energy as f64);
    sink.fill_1d("h_t_reco", r.reco_time   as f64);

    sink.fill_1d("h_e_res", r.energy_residual() as f64);
    sink.fill_1d("h_t_res", r.time_residual  () as f64);

    sink.fill_2d("h_t_reco_sim", sim_t, r.reco_time   as f64);
    sink.fill_2d("h_e_reco_sim", sim_e, r.reco_energy as f64);

    let walked = r.walked_reco_time(corrections) as f64;
    sink.fill_1d("h_t_reco_uncorr", walked);
    sink.fill_1d("h_t_res_uncorr" , walked - sim_t);
}
