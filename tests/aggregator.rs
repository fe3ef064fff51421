//! Whole-event behaviour of the aggregator, observed through the sink

use float_eq::assert_float_eq;
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};

use detid::{barrel_index, BarrelId, EndcapId, Zside};
use mtdana::event::{AccessError, Collection, Collections, Detector, DigiFrame, DigiSample,
                    EventData, RecHit, SimHit, UncalibratedRecHit};
use mtdana::sink::{book::Booking, Fill, HistogramBook, Recorder};
use mtdana::timewalk::TimeWalk;
use mtdana::{Aggregator, Barrel, Endcap, Region, Settings};
use units::ns;

const CELL: u32 = 0xAB01;

fn aggregator<R: Region>(window_ns: f32, minimum_energy: f32) -> Aggregator<R> {
    let settings = Settings { integration_window: ns(window_ns), minimum_energy };
    Aggregator::new(settings, TimeWalk::default())
}

fn sim_hit(cell_id: u32, track_id: i32, energy_loss: f32, tof: f32) -> SimHit {
    SimHit { event_id: 0, cell_id, track_id, energy_loss, tof, x: 0.5, y: -3.0, z: 0.25 }
}

fn digi_frame(cell_id: u32, q0: u32, q1: u32) -> DigiFrame {
    let sample = |charge| DigiSample { charge, toa: 80, toa2: 88 };
    DigiFrame { event_id: 0, cell_id, samples: [sample(q0), sample(q1)] }
}

fn ureco_hit(cell_id: u32, amplitude: [f32; 2], time: [f32; 2]) -> UncalibratedRecHit {
    UncalibratedRecHit { event_id: 0, cell_id, amplitude, time }
}

fn rec_hit(cell_id: u32, energy: f32, time: f32) -> RecHit {
    RecHit { event_id: 0, cell_id, energy, time }
}

fn barrel_event(collections: Collections) -> EventData {
    let mut event = EventData::new(0);
    event.barrel = collections;
    event
}

/// One cell, side 1 dead, everything else present
#[fixture]
fn single_cell() -> EventData {
    barrel_event(Collections {
        sim  : Some(vec![sim_hit(CELL, 1, 0.002, 1.0)]),
        digi : Some(vec![digi_frame(CELL, 50, 0)]),
        ureco: Some(vec![ureco_hit(CELL, [50.0, 0.0], [2.0, 0.0])]),
        reco : Some(vec![rec_hit(CELL, 2.5, 2.1)]),
    })
}

fn one(sink: &Recorder, name: &str) -> f64 {
    match sink.fills(name).as_slice() {
        [Fill::One(x)] => *x,
        other => panic!("expected a single 1-D fill of {name}, got {other:?}"),
    }
}

#[rstest]
fn end_to_end(single_cell: EventData) {
    let mut sink = Recorder::new();
    aggregator::<Barrel>(5.0, 0.1).analyze(&single_cell, &mut sink).unwrap();

    // Survives the energy filter
    assert_float_eq!(one(&sink, "h_e_sim"), 2.0, abs <= 1e-6);
    assert_float_eq!(one(&sink, "h_t_sim"), 1.0, abs <= 1e-6);

    let index = barrel_index(CELL);
    assert_eq!(sink.fills("h_occupancy_sim"), vec![Fill::Two(index.iphi as f64, index.ieta as f64)]);

    // Side 1 has no charge: nothing at digi or ureco level
    for name in sink.names() {
        assert!(!(name.ends_with("_1") && !name.starts_with("h_n_")), "unexpected side-1 emission {name}");
    }
    assert_eq!(sink.count("h_e_digi_0"), 1);
    assert_eq!(sink.count("h_e_ureco_0"), 1);

    let walk = 2.21103 * 50_f32.powf(-0.933552);
    assert_float_eq!(one(&sink, "h_t_ureco_uncorr_0"), (2.0 + walk) as f64, abs <= 1e-6);

    assert_float_eq!(one(&sink, "h_e_res"), 0.5, abs <= 1e-6);
    assert_float_eq!(one(&sink, "h_t_res"), 1.1, abs <= 1e-6);
    assert_float_eq!(one(&sink, "h_t_reco_uncorr"), (2.1 + 0.5 * walk) as f64, abs <= 1e-6);
    assert_float_eq!(one(&sink, "h_t_res_uncorr"), (1.1 + 0.5 * walk) as f64, abs <= 1e-6);

    // Multiplicities
    assert_eq!(one(&sink, "h_n_sim_trk"), 1.0);
    assert_eq!(one(&sink, "h_n_sim_cell"), 1.0);
    assert_eq!(one(&sink, "h_n_digi_0"), 1.0);
    assert_eq!(one(&sink, "h_n_digi_1"), 0.0);
    assert_eq!(one(&sink, "h_n_ureco_1"), 0.0);
    assert_eq!(one(&sink, "h_n_reco"), 1.0);
}

#[rstest]
fn energy_filter_is_absolute(single_cell: EventData) {
    let mut sink = Recorder::new();
    aggregator::<Barrel>(5.0, 3.0).analyze(&single_cell, &mut sink).unwrap();
    // Only event-level multiplicities remain
    assert!(sink.names().iter().all(|name| name.starts_with("h_n_")), "{:?}", sink.names());
    assert_eq!(one(&sink, "h_n_reco"), 1.0);
}

#[test]
fn sides_are_processed_independently() {
    let event = barrel_event(Collections {
        digi : Some(vec![digi_frame(CELL, 0, 500)]),
        ureco: Some(vec![ureco_hit(CELL, [40.0, 40.0], [1.0, 1.0])]),
        reco : Some(vec![rec_hit(CELL, 1.0, 1.0)]),
        ..Collections::empty()
    });
    let mut sink = Recorder::new();
    aggregator::<Barrel>(25.0, 0.0).analyze(&event, &mut sink).unwrap();
    assert_eq!(sink.count("h_e_digi_0"), 0);
    assert_eq!(sink.count("h_e_ureco_0"), 0);
    assert_eq!(sink.count("h_t_ureco_uncorr_0"), 0);
    assert_eq!(sink.fills("h_e_digi_1"), vec![Fill::One(500.0)]);
    assert_eq!(sink.count("h_t_ureco_uncorr_1"), 1);
    assert_eq!(sink.count("p_t1_eta_digi_1"), 1);
}

#[test]
fn empty_event_has_no_cell_statistics() {
    let event = barrel_event(Collections::empty());
    let mut sink = Recorder::new();
    let occupancy = aggregator::<Barrel>(25.0, 0.0).analyze(&event, &mut sink).unwrap();
    assert_eq!(occupancy.reco, 0);
    assert_eq!(sink.count("h_n_sim_trk"), 0);
    assert_eq!(one(&sink, "h_n_sim_cell"), 0.0);
    assert!(sink.names().iter().all(|name| name.starts_with("h_n_")));
}

#[test]
fn missing_collection_is_a_hard_failure() {
    let event = barrel_event(Collections { ureco: None, ..Collections::empty() });
    let mut sink = Recorder::new();
    let error = aggregator::<Barrel>(25.0, 0.0).analyze(&event, &mut sink).unwrap_err();
    assert_eq!(error, AccessError::Missing {
        event_id: 0,
        detector: Detector::Barrel,
        collection: Collection::UncalibratedRecHits,
    });
    assert!(sink.is_empty());

    // The barrel is there, but nothing was provided for the endcap
    let error = aggregator::<Endcap>(25.0, 0.0).analyze(&barrel_event(Collections::empty()), &mut sink);
    assert!(error.is_err());
}

#[rstest]
fn events_do_not_leak_into_each_other(single_cell: EventData) {
    let agg = aggregator::<Barrel>(5.0, 0.1);
    let mut first = Recorder::new();
    agg.analyze(&single_cell, &mut first).unwrap();

    let mut second = Recorder::new();
    agg.analyze(&barrel_event(Collections::empty()), &mut second).unwrap();
    assert_eq!(one(&second, "h_n_sim_cell"), 0.0);
    assert_eq!(second.count("h_e_sim"), 0);

    let mut again = Recorder::new();
    agg.analyze(&single_cell, &mut again).unwrap();
    assert_eq!(first.observations, again.observations);
}

fn full_event(cells: &[u32]) -> Collections {
    Collections {
        sim  : Some(cells.iter().flat_map(|&c| [sim_hit(c, 1, 0.001, 2.0), sim_hit(c, 2, 0.004, 30.0)]).collect()),
        digi : Some(cells.iter().map(|&c| digi_frame(c, 300, 250)).collect()),
        ureco: Some(cells.iter().map(|&c| ureco_hit(c, [120.0, 90.0], [4.0, 4.5])).collect()),
        reco : Some(cells.iter().map(|&c| rec_hit(c, 1.2, 4.1)).collect()),
    }
}

#[test]
fn every_barrel_metric_is_booked() {
    let cells = [BarrelId::new(Zside::Plus, 3, 17, 5).raw(), BarrelId::new(Zside::Minus, 36, 42, 63).raw()];
    let event = barrel_event(full_event(&cells));
    let mut book = HistogramBook::new(&Booking::for_axes(&Barrel::axes()));
    aggregator::<Barrel>(25.0, 0.0).analyze(&event, &mut book).unwrap();
    assert_eq!(book.unbooked().count(), 0);
    assert_eq!(book.total("h_e_reco"), 2.0);
    assert_eq!(book.total("h_n_sim_trk"), 2.0);
    assert_eq!(book.value_1d("h_n_sim_trk", 2.5), Some(2.0));
    assert_float_eq!(book.profile("p_e_eta_digi_0").unwrap().mean(17.5).unwrap(), 300.0, ulps <= 1);
}

#[test]
fn endcap_is_analysed_like_the_barrel() {
    let cells = [EndcapId::new(Zside::Plus, 4, 200).raw(), EndcapId::new(Zside::Minus, 11, 7).raw()];
    let mut event = EventData::new(9);
    event.endcap = full_event(&cells);
    let mut book = HistogramBook::new(&Booking::for_axes(&Endcap::axes()));
    let occupancy = aggregator::<Endcap>(25.0, 0.0).analyze(&event, &mut book).unwrap();
    assert_eq!(occupancy.reco, 2);
    assert_eq!(book.unbooked().count(), 0);
    assert_eq!(book.value_2d("h_occupancy_reco", 200.5, 4.5), Some(1.0));
    assert_eq!(book.value_2d("h_occupancy_reco", 7.5, -10.5), Some(1.0));
}

#[test]
fn books_from_parallel_runs_add_up() {
    let booking = Booking::for_axes(&Barrel::axes());
    let agg = aggregator::<Barrel>(5.0, 0.1);
    let event = barrel_event(Collections {
        sim  : Some(vec![sim_hit(CELL, 1, 0.002, 1.0)]),
        digi : Some(vec![digi_frame(CELL, 50, 0)]),
        ureco: Some(vec![ureco_hit(CELL, [50.0, 0.0], [2.0, 0.0])]),
        reco : Some(vec![rec_hit(CELL, 2.5, 2.1)]),
    });
    let mut a = HistogramBook::new(&booking);
    let mut b = HistogramBook::new(&booking);
    agg.analyze(&event, &mut a).unwrap();
    agg.analyze(&event, &mut b).unwrap();
    a += &b;
    assert_eq!(a.total("h_e_sim"), 2.0);
    assert_eq!(a.value_1d("h_e_res", 0.5), Some(2.0));
}
