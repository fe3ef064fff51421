//! Detector regions the aggregation is generic over

use detid::{barrel_index, endcap_index, CellIndex};

use crate::event::Detector;
use crate::sink::book::Binning;
use crate::types::CellId;

/// Binning of the spatial index axes of a region
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellAxes {
    pub phi: Binning,
    pub eta: Binning,
    pub abs_eta: Binning,
}

pub trait Region {
    const DETECTOR: Detector;
    fn cell_index(id: CellId) -> CellIndex;
    fn axes() -> CellAxes;
}

/// Barrel: crystal bars read out at both ends
#[derive(Clone, Copy, Debug)]
pub struct Barrel;

/// Endcaps: silicon sensor discs
#[derive(Clone, Copy, Debug)]
pub struct Endcap;

impl Region for Barrel {
    const DETECTOR: Detector = Detector::Barrel;
    fn cell_index(id: CellId) -> CellIndex { barrel_index(id) }
    fn axes() -> CellAxes {
        CellAxes {
            phi    : Binning::new(145,   0.0, 2305.0),
            eta    : Binning::new( 86, -43.0,   43.0),
            abs_eta: Binning::new( 43,   0.0,   43.0),
        }
    }
}

impl Region for Endcap {
    const DETECTOR: Detector = Detector::Endcap;
    fn cell_index(id: CellId) -> CellIndex { endcap_index(id) }
    fn axes() -> CellAxes {
        CellAxes {
            phi    : Binning::new(128,   0.0, 512.0),
            eta    : Binning::new( 24, -12.0,  12.0),
            abs_eta: Binning::new( 12,   0.0,  12.0),
        }
    }
}
