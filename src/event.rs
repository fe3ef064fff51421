//! Hit collections of one event, as delivered by the detector chain
//!
//! Each hit type is a plain `#[repr(C)]` struct so that it can be read
//! directly from (and written to) HDF5 tables. Every row carries the id of
//! the event it belongs to; the aggregation itself never looks at it.

use thiserror::Error;

use crate::types::{CellId, Chargef32, Energyf32, Lengthf32, Timef32, TrackId};

#[derive(hdf5::H5Type, Clone, Copy, PartialEq, Debug)]
#[repr(C)]
pub struct SimHit {
    pub event_id: u32,
    pub cell_id: CellId,
    pub track_id: TrackId,
    /// GeV
    pub energy_loss: Energyf32,
    /// Time of flight since the start of the event, ns
    pub tof: Timef32,
    /// Local position in the cell, mm
    pub x: Lengthf32,
    pub y: Lengthf32,
    pub z: Lengthf32,
}

/// Digitized signal on one side of a cell
#[derive(hdf5::H5Type, Clone, Copy, PartialEq, Debug, Default)]
#[repr(C)]
pub struct DigiSample {
    /// ADC counts
    pub charge: u32,
    /// Coarse and fine time of arrival, TDC counts
    pub toa: u32,
    pub toa2: u32,
}

#[derive(hdf5::H5Type, Clone, Copy, PartialEq, Debug)]
#[repr(C)]
pub struct DigiFrame {
    pub event_id: u32,
    pub cell_id: CellId,
    /// Indexed by `Side::index`
    pub samples: [DigiSample; 2],
}

#[derive(hdf5::H5Type, Clone, Copy, PartialEq, Debug)]
#[repr(C)]
pub struct UncalibratedRecHit {
    pub event_id: u32,
    pub cell_id: CellId,
    /// pC, per side
    pub amplitude: [Chargef32; 2],
    /// ns, per side
    pub time: [Timef32; 2],
}

#[derive(hdf5::H5Type, Clone, Copy, PartialEq, Debug)]
#[repr(C)]
pub struct RecHit {
    pub event_id: u32,
    pub cell_id: CellId,
    /// MeV
    pub energy: Energyf32,
    /// ns
    pub time: Timef32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Detector { Barrel, Endcap }

impl Detector {
    /// HDF5 group holding the tables of this detector region
    pub fn group(self) -> &'static str {
        match self {
            Detector::Barrel => "btl",
            Detector::Endcap => "etl",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection { SimHits, Digis, UncalibratedRecHits, RecHits }

impl Collection {
    /// HDF5 dataset name of this collection, within its detector group
    pub fn dataset(self) -> &'static str {
        match self {
            Collection::SimHits             => "sim_hits",
            Collection::Digis               => "digis",
            Collection::UncalibratedRecHits => "ureco_hits",
            Collection::RecHits             => "reco_hits",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccessError {
    #[error("event {event_id}: no {collection:?} collection for {detector:?}")]
    Missing { event_id: u32, detector: Detector, collection: Collection },
}

/// Access to the four hit collections of one event.
///
/// A collection that cannot be provided is an error, never an empty slice:
/// skipping a stage silently would produce misleadingly empty statistics.
pub trait EventSource {
    fn sim_hits  (&self, detector: Detector) -> Result<&[SimHit            ], AccessError>;
    fn digis     (&self, detector: Detector) -> Result<&[DigiFrame         ], AccessError>;
    fn ureco_hits(&self, detector: Detector) -> Result<&[UncalibratedRecHit], AccessError>;
    fn reco_hits (&self, detector: Detector) -> Result<&[RecHit            ], AccessError>;
}

/// Collections of one detector region. `None` means "not available".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Collections {
    pub sim  : Option<Vec<SimHit>>,
    pub digi : Option<Vec<DigiFrame>>,
    pub ureco: Option<Vec<UncalibratedRecHit>>,
    pub reco : Option<Vec<RecHit>>,
}

impl Collections {
    /// All four collections present, all empty
    pub fn empty() -> Self {
        Self { sim: Some(vec![]), digi: Some(vec![]), ureco: Some(vec![]), reco: Some(vec![]) }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventData {
    pub event_id: u32,
    pub barrel: Collections,
    pub endcap: Collections,
}

impl EventData {
    pub fn new(event_id: u32) -> Self { Self { event_id, ..Self::default() } }

    pub fn collections(&self, detector: Detector) -> &Collections {
        match detector {
            Detector::Barrel => &self.barrel,
            Detector::Endcap => &self.endcap,
        }
    }

    pub fn collections_mut(&mut self, detector: Detector) -> &mut Collections {
        match detector {
            Detector::Barrel => &mut self.barrel,
            Detector::Endcap => &mut self.endcap,
        }
    }

    fn lookup<'a, T>(&self, detector: Detector, collection: Collection, rows: &'a Option<Vec<T>>) -> Result<&'a [T], AccessError> {
        rows.as_deref().ok_or(AccessError::Missing { event_id: self.event_id, detector, collection })
    }
}

impl EventSource for EventData {
    fn sim_hits(&self, detector: Detector) -> Result<&[SimHit], AccessError> {
        self.lookup(detector, Collection::SimHits, &self.collections(detector).sim)
    }

    fn digis(&self, detector: Detector) -> Result<&[DigiFrame], AccessError> {
        self.lookup(detector, Collection::Digis, &self.collections(detector).digi)
    }

    fn ureco_hits(&self, detector: Detector) -> Result<&[UncalibratedRecHit], AccessError> {
        self.lookup(detector, Collection::UncalibratedRecHits, &self.collections(detector).ureco)
    }

    fn reco_hits(&self, detector: Detector) -> Result<&[RecHit], AccessError> {
        self.lookup(detector, Collection::RecHits, &self.collections(detector).reco)
    }
}
