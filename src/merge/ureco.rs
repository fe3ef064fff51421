use crate::event::UncalibratedRecHit;
use crate::record::{CellTable, Side};

/// Copy the per-side pulse amplitudes and times into the cells' records.
///
/// Stored as measured: the time-walk correction is applied only when the
/// statistics are emitted. Last write wins on duplicate ids.
pub fn merge_ureco_hits(table: &mut CellTable, hits: &[UncalibratedRecHit]) {
    for hit in hits {
        let record = table.record(hit.cell_id);
        for side in Side::BOTH {
            record.ureco_charge[side] = hit.amplitude[side.index()];
            record.ureco_time  [side] = hit.time     [side.index()];
        }
        for side in Side::BOTH {
            if hit.amplitude[side.index()] > 0.0 { table.occupancy.ureco[side] += 1; }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::fixtures::ureco;
    use crate::record::PerSide;

    #[test]
    fn amplitudes_and_times_per_side() {
        let mut table = CellTable::default();
        merge_ureco_hits(&mut table, &[
            ureco(1, [50.0, 0.0], [2.0, 0.0]),
            ureco(2, [10.0, 5.0], [3.0, 4.0]),
        ]);
        let r = table.get(2).unwrap();
        assert_eq!(r.ureco_charge, PerSide::new(10.0, 5.0));
        assert_eq!(r.ureco_time  , PerSide::new( 3.0, 4.0));
        assert_eq!(table.occupancy.ureco, PerSide::new(2, 1));
    }

    #[test]
    fn last_hit_wins_but_both_are_counted() {
        let mut table = CellTable::default();
        merge_ureco_hits(&mut table, &[
            ureco(3, [40.0, 30.0], [1.0, 1.5]),
            ureco(3, [60.0,  0.0], [2.0, 0.0]),
        ]);
        let r = table.get(3).unwrap();
        assert_eq!(r.ureco_charge, PerSide::new(60.0, 0.0));
        assert_eq!(r.ureco_time  , PerSide::new( 2.0, 0.0));
        assert_eq!(table.records.len(), 1);
        assert_eq!(table.occupancy.ureco, PerSide::new(2, 1));
    }
}
