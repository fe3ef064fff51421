use crate::event::RecHit;
use crate::record::CellTable;

/// Copy calibrated energy and time, already combined over both sides, into
/// the cells' records. Last write wins on duplicate ids.
pub fn merge_reco_hits(table: &mut CellTable, hits: &[RecHit]) {
    for &RecHit { cell_id, energy, time, .. } in hits {
        let record = table.record(cell_id);
        record.reco_energy = energy;
        record.reco_time   = time;
        if energy > 0.0 { table.occupancy.reco += 1; }
    }
}
