use crate::event::{DigiFrame, DigiSample};
use crate::record::{CellTable, Side};

/// Copy the two digitized samples of each frame into its cell's record.
///
/// Values are overwritten, not accumulated: should an id appear twice in the
/// collection, the last frame wins. A side counts as occupied when its
/// charge is non-zero.
pub fn merge_digis(table: &mut CellTable, frames: &[DigiFrame]) {
    for frame in frames {
        let record = table.record(frame.cell_id);
        for side in Side::BOTH {
            let DigiSample { charge, toa, toa2 } = frame.samples[side.index()];
            record.digi_charge[side] = charge;
            record.digi_time1 [side] = toa;
            record.digi_time2 [side] = toa2;
        }
        for side in Side::BOTH {
            if frame.samples[side.index()].charge > 0 { table.occupancy.digi[side] += 1; }
        }
    }
}
