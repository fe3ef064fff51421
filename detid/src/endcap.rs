use crate::CellIndex;
use crate::mtd::{RawId, RegionCode, Zside, common_bits, field, rod_or_ring, zside};

const MODULE_OFFSET : u32 = 7;
const MODULE_MASK   : u32 = 0x1FF;

/// Endcap cell: a sensor module on a ring of a disc.
///
/// `ring` runs over `1..=11` outwards, `module` over `1..=511` in phi.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EndcapId {
    pub zside: Zside,
    pub ring: u32,
    pub module: u32,
}

impl EndcapId {
    pub fn new(zside: Zside, ring: u32, module: u32) -> Self { Self { zside, ring, module } }

    pub fn from_raw(raw: RawId) -> Self {
        Self {
            zside : zside(raw),
            ring  : rod_or_ring(raw),
            module: field(raw, MODULE_OFFSET, MODULE_MASK),
        }
    }

    pub fn raw(self) -> RawId {
        let Self { zside, ring, module } = self;
        common_bits(RegionCode::Endcap, zside, ring) | ((module & MODULE_MASK) << MODULE_OFFSET)
    }

    pub fn index(self) -> CellIndex {
        CellIndex {
            iphi: self.module as i32,
            ieta: self.zside.sign() * self.ring as i32,
        }
    }
}

/// Decode raw endcap id into `(iphi, ieta)`
pub fn endcap_index(raw: RawId) -> CellIndex { EndcapId::from_raw(raw).index() }
