//! Read hit tables from, and write statistics to, HDF5 files
//!
//! Input layout: one group per detector region (`btl`, `etl`), each holding
//! the four tables `sim_hits`, `digis`, `ureco_hits` and `reco_hits`. Rows of
//! all events are stored together; each row carries its `event_id`.

use std::collections::BTreeMap;
use std::path::Path;

use itertools::Itertools;

use crate::event::{Collection, Collections, Detector, DigiFrame, EventData, RecHit, SimHit, UncalibratedRecHit};
use crate::sink::book::{Binning, Shape};
use crate::sink::{Accumulator, HistogramBook};

pub fn read_table<T: hdf5::H5Type>(filename: &dyn AsRef<Path>, dataset: &str) -> hdf5::Result<Vec<T>> {
    let file = ::hdf5::File::open(filename)?;
    read_rows(&file, dataset)
}

fn read_rows<T: hdf5::H5Type>(file: &hdf5::File, dataset: &str) -> hdf5::Result<Vec<T>> {
    file.dataset(dataset)?.read_raw::<T>()
}

fn path(detector: Detector, collection: Collection) -> String {
    format!("{}/{}", detector.group(), collection.dataset())
}

/// Read the hit tables of `detectors`, and split them into events.
///
/// Every requested collection is present in every returned event, empty if
/// the event has no rows in that table. Events come in ascending id order.
pub fn read_events(filename: &dyn AsRef<Path>, detectors: &[Detector]) -> hdf5::Result<Vec<EventData>> {
    let file = ::hdf5::File::open(filename)?;
    let mut events = BTreeMap::new();
    for &detector in detectors {
        let mut scatter = Scatter { events: &mut events, detectors, detector };
        scatter.rows(read_rows::<SimHit>(&file, &path(detector, Collection::SimHits))?,
                     |h| h.event_id, |c| &mut c.sim);
        scatter.rows(read_rows::<DigiFrame>(&file, &path(detector, Collection::Digis))?,
                     |h| h.event_id, |c| &mut c.digi);
        scatter.rows(read_rows::<UncalibratedRecHit>(&file, &path(detector, Collection::UncalibratedRecHits))?,
                     |h| h.event_id, |c| &mut c.ureco);
        scatter.rows(read_rows::<RecHit>(&file, &path(detector, Collection::RecHits))?,
                     |h| h.event_id, |c| &mut c.reco);
    }
    Ok(events.into_values().collect())
}

/// Distributes the rows of one table over the events they belong to
struct Scatter<'e, 'd> {
    events: &'e mut BTreeMap<u32, EventData>,
    detectors: &'d [Detector],
    detector: Detector,
}

impl Scatter<'_, '_> {
    fn rows<T>(
        &mut self,
        rows: Vec<T>,
        event_id: impl Fn(&T) -> u32,
        slot: impl Fn(&mut Collections) -> &mut Option<Vec<T>>,
    ) {
        let detector = self.detector;
        for (id, rows) in rows.into_iter().into_group_map_by(|row| event_id(row)) {
            *slot(self.event(id).collections_mut(detector)) = Some(rows);
        }
    }

    fn event(&mut self, id: u32) -> &mut EventData {
        let detectors = self.detectors;
        self.events.entry(id).or_insert_with(|| {
            let mut event = EventData::new(id);
            for &d in detectors { *event.collections_mut(d) = Collections::empty(); }
            event
        })
    }
}

/// Write the four tables of one detector region. Missing collections are
/// written as empty tables.
pub fn write_collections(file: &hdf5::File, detector: Detector, collections: &Collections) -> hdf5::Result<()> {
    let group = file.create_group(detector.group())?;
    let Collections { sim, digi, ureco, reco } = collections;
    write_rows(&group, Collection::SimHits            , sim  .as_deref().unwrap_or(&[]))?;
    write_rows(&group, Collection::Digis              , digi .as_deref().unwrap_or(&[]))?;
    write_rows(&group, Collection::UncalibratedRecHits, ureco.as_deref().unwrap_or(&[]))?;
    write_rows(&group, Collection::RecHits            , reco .as_deref().unwrap_or(&[]))?;
    Ok(())
}

fn write_rows<T: hdf5::H5Type>(group: &hdf5::Group, collection: Collection, rows: &[T]) -> hdf5::Result<()> {
    group.new_dataset_builder()
        .with_data(rows)
        .create(collection.dataset())?;
    Ok(())
}

/// Store every accumulator of `book` in its own subgroup of `group`
pub fn write_book(file: &hdf5::File, group: &str, book: &HistogramBook) -> hdf5::Result<()> {
    let top = file.create_group(group)?;
    for (name, accumulator) in book.iter() {
        let g = top.create_group(name)?;
        let binning: Vec<f64> = match accumulator.shape() {
            Shape::H1(x) | Shape::Profile(x) => axis(x).to_vec(),
            Shape::H2(x, y) => [axis(x), axis(y)].concat(),
        };
        write_f64s(&g, "binning", &binning)?;
        write_f64s(&g, "values", &accumulator.values())?;
        if let Accumulator::Profile(_, profile) = accumulator {
            let [sum, sum2, entries, mean] = profile.columns();
            for (column, data) in [("sum", sum), ("sum2", sum2), ("entries", entries), ("mean", mean)] {
                write_f64s(&g, column, &data)?;
            }
        }
    }
    Ok(())
}

fn axis(Binning { bins, min, max }: Binning) -> [f64; 3] { [bins as f64, min, max] }

fn write_f64s(group: &hdf5::Group, name: &str, data: &[f64]) -> hdf5::Result<()> {
    group.new_dataset_builder().with_data(data).create(name)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::fixtures::{digi, reco, sim, ureco};
    use crate::sink::book::Booking;
    use crate::sink::StatsSink;
    #[allow(unused)] use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn events_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let file_path = dir.path().join("events.h5");

        let barrel = Collections {
            sim  : Some(vec![SimHit { event_id: 3, ..sim(11, 1, 0.002, 1.0) },
                             SimHit { event_id: 1, ..sim(12, 2, 0.001, 2.0) },
                             SimHit { event_id: 3, ..sim(13, 1, 0.003, 3.0) }]),
            digi : Some(vec![DigiFrame { event_id: 1, ..digi(12, (5, 6, 7), (0, 0, 0)) }]),
            ureco: Some(vec![UncalibratedRecHit { event_id: 3, ..ureco(11, [1.0, 2.0], [3.0, 4.0]) }]),
            reco : Some(vec![RecHit { event_id: 3, ..reco(11, 1.5, 2.5) },
                             RecHit { event_id: 2, ..reco(14, 0.5, 0.5) }]),
        };
        {
            let file = hdf5::File::create(&file_path)?;
            write_collections(&file, Detector::Barrel, &barrel)?;
        }

        let sims = read_table::<SimHit>(&file_path, "btl/sim_hits")?;
        assert_eq!(Some(sims), barrel.sim);

        let events = read_events(&file_path, &[Detector::Barrel])?;
        let ids: Vec<_> = events.iter().map(|e| e.event_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let event3 = &events[2].barrel;
        let cells: Vec<_> = event3.sim.as_ref().unwrap().iter().map(|h| h.cell_id).collect();
        assert_eq!(cells, vec![11, 13]);
        assert_eq!(event3.digi, Some(vec![]));
        assert_eq!(event3.ureco.as_ref().unwrap().len(), 1);

        let event2 = &events[1].barrel;
        assert_eq!(event2.sim, Some(vec![]));
        assert_eq!(event2.reco.as_ref().unwrap()[0].cell_id, 14);

        // Endcap was not requested
        assert_eq!(events[0].endcap, Collections::default());
        Ok(())
    }

    #[test]
    fn missing_region_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let file_path = dir.path().join("barrel-only.h5");
        {
            let file = hdf5::File::create(&file_path)?;
            let barrel = Collections {
                sim  : Some(vec![sim(1, 1, 0.001, 1.0)]),
                digi : Some(vec![digi(1, (1, 1, 1), (1, 1, 1))]),
                ureco: Some(vec![ureco(1, [1.0, 1.0], [1.0, 1.0])]),
                reco : Some(vec![reco(1, 1.0, 1.0)]),
            };
            write_collections(&file, Detector::Barrel, &barrel)?;
        }
        assert!(read_events(&file_path, &[Detector::Barrel]).is_ok());
        assert!(read_events(&file_path, &[Detector::Barrel, Detector::Endcap]).is_err());
        Ok(())
    }

    #[test]
    fn book_layout() -> Result<(), Box<dyn std::error::Error>> {
        let booking = Booking {
            entries: vec![
                ("h".into(), Shape::H1(Binning::new(4, 0.0, 4.0))),
                ("m".into(), Shape::H2(Binning::new(2, 0.0, 2.0), Binning::new(3, 0.0, 3.0))),
                ("p".into(), Shape::Profile(Binning::new(2, 0.0, 2.0))),
            ],
        };
        let mut book = HistogramBook::new(&booking);
        book.fill_1d("h", 2.5);
        book.fill_2d("m", 1.5, 0.5);
        book.fill_profile("p", 0.5, 3.0);
        book.fill_profile("p", 0.5, 5.0);

        let dir = tempfile::tempdir()?;
        let file_path = dir.path().join("book.h5");
        {
            let file = hdf5::File::create(&file_path)?;
            write_book(&file, "btl", &book)?;
        }
        let file = hdf5::File::open(&file_path)?;
        let read = |name: &str| file.dataset(name).and_then(|d| d.read_raw::<f64>());

        assert_eq!(read("btl/h/binning")?, vec![4.0, 0.0, 4.0]);
        assert_eq!(read("btl/h/values")?, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(read("btl/m/binning")?, vec![2.0, 0.0, 2.0, 3.0, 0.0, 3.0]);
        assert_eq!(read("btl/m/values")?.iter().sum::<f64>(), 1.0);
        assert_eq!(read("btl/p/mean")?, vec![0.0, 4.0, 0.0, 0.0]);
        assert_eq!(read("btl/p/entries")?, vec![0.0, 2.0, 0.0, 0.0]);
        assert_eq!(read("btl/p/sum2")?, vec![0.0, 34.0, 0.0, 0.0]);
        Ok(())
    }
}
