use crate::CellIndex;
use crate::mtd::{RawId, RegionCode, Zside, common_bits, field, rod_or_ring, zside};

const MODULE_OFFSET  : u32 = 10;
const MODULE_MASK    : u32 = 0x3F;
const CRYSTAL_OFFSET : u32 = 0;
const CRYSTAL_MASK   : u32 = 0x3F;

/// Crystals are bars lying along z, stacked in phi within each rod.
const CRYSTALS_PER_ROD: i32 = 64;

/// Barrel cell, broken into its fields.
///
/// `rod` runs over `1..=36` around the barrel, `module` over `1..=42` along
/// z on each side, `crystal` over `0..=63` in phi within the rod.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarrelId {
    pub zside: Zside,
    pub rod: u32,
    pub module: u32,
    pub crystal: u32,
}

impl BarrelId {
    pub fn new(zside: Zside, rod: u32, module: u32, crystal: u32) -> Self {
        Self { zside, rod, module, crystal }
    }

    pub fn from_raw(raw: RawId) -> Self {
        Self {
            zside  : zside(raw),
            rod    : rod_or_ring(raw),
            module : field(raw, MODULE_OFFSET , MODULE_MASK ),
            crystal: field(raw, CRYSTAL_OFFSET, CRYSTAL_MASK),
        }
    }

    pub fn raw(self) -> RawId {
        let Self { zside, rod, module, crystal } = self;
        common_bits(RegionCode::Barrel, zside, rod)
            | ((module  & MODULE_MASK ) << MODULE_OFFSET )
            | ((crystal & CRYSTAL_MASK) << CRYSTAL_OFFSET)
    }

    pub fn index(self) -> CellIndex {
        let iphi = (self.rod as i32 - 1) * CRYSTALS_PER_ROD + self.crystal as i32 + 1;
        let ieta = self.zside.sign() * self.module as i32;
        CellIndex { iphi, ieta }
    }
}

/// Decode raw barrel id into `(iphi, ieta)`
pub fn barrel_index(raw: RawId) -> CellIndex { BarrelId::from_raw(raw).index() }
