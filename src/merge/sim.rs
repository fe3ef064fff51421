use std::cmp::Ordering;

use itertools::Itertools;

use units::{ns, Time};

use crate::event::SimHit;
use crate::record::{CellTable, FirstSimHit};
use crate::types::{CellId, Timef32, MEV_PER_GEV};

/// Accumulate simulated energy deposits into per-cell records.
///
/// Hits are visited per cell in order of increasing time of flight, so that
/// the first hit seen in a cell is its earliest one, whatever the input
/// order. That hit alone provides the cell's time and position. Only hits
/// arriving before `integration_window` contribute energy, which emulates
/// the gate of the readout electronics; a cell whose hits all arrive late
/// still gets a record (with zero energy).
///
/// Hits with the invalid cell id are ignored. The sort is stable, so hits of
/// one cell with exactly equal times keep their input order.
pub fn merge_sim_hits(table: &mut CellTable, hits: &[SimHit], integration_window: Time) {
    let sorted = hits.iter()
        .filter(|hit| hit.cell_id != detid::INVALID)
        .map(|hit| (hit, hit.cell_id, hit.tof))
        .sorted_by(by_cell_then_time);

    for (hit, id, tof) in sorted {
        table.tracks.entry(id).or_default().insert(hit.track_id);

        let record = table.record(id);
        if ns(tof) < integration_window {
            record.sim_energy += MEV_PER_GEV * hit.energy_loss;
        }
        if record.first_sim.is_none() {
            let &SimHit { x, y, z, .. } = hit;
            record.first_sim = Some(FirstSimHit { time: tof, x, y, z });
        }
    }
    table.occupancy.sim = table.tracks.len();
}

fn by_cell_then_time<H>(a: &(H, CellId, Timef32), b: &(H, CellId, Timef32)) -> Ordering {
    a.1.cmp(&b.1)
        .then_with(|| a.2.total_cmp(&b.2))
}
