//! Raw cell identifiers of the timing detector
//!
//! A raw id is a `u32` packing the detector, the region (barrel or endcap),
//! the z-side and the position of the cell within its region. The fields
//! shared by both regions live in `mtd`; `barrel` and `endcap` know how to
//! turn the remaining bits into the `(iphi, ieta)` indices used for spatial
//! binning.

mod mtd;
mod barrel;
mod endcap;

pub use mtd::{RawId, Zside, RegionCode, region_of, INVALID};
pub use barrel::{BarrelId, barrel_index};
pub use endcap::{EndcapId, endcap_index};

/// Position of a cell in the `(phi, eta)` index plane.
///
/// `ieta` carries the z-side in its sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellIndex {
    pub iphi: i32,
    pub ieta: i32,
}

impl CellIndex {
    pub fn new(iphi: i32, ieta: i32) -> Self { Self { iphi, ieta } }
}
