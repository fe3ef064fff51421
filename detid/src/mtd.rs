pub type RawId = u32;

/// Sentinel for "no cell"
pub const INVALID: RawId = 0;

const DETECTOR_OFFSET : u32 = 28;
const DETECTOR_MASK   : u32 = 0xF;
const SUBDET_OFFSET   : u32 = 25;
const SUBDET_MASK     : u32 = 0x7;
const REGION_OFFSET   : u32 = 23;
const REGION_MASK     : u32 = 0x3;
const ZSIDE_OFFSET    : u32 = 22;
const ZSIDE_MASK      : u32 = 0x1;
const ROD_RING_OFFSET : u32 = 16;
const ROD_RING_MASK   : u32 = 0x3F;

const FORWARD   : u32 = 6;
const FAST_TIME : u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Zside { Minus, Plus }

impl Zside {
    pub fn sign(self) -> i32 {
        match self {
            Zside::Minus => -1,
            Zside::Plus  =>  1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionCode { Barrel = 1, Endcap = 2 }

/// Which region a raw id belongs to, if it belongs to the timing detector at all.
pub fn region_of(raw: RawId) -> Option<RegionCode> {
    if field(raw, DETECTOR_OFFSET, DETECTOR_MASK) != FORWARD  { return None }
    if field(raw,   SUBDET_OFFSET,   SUBDET_MASK) != FAST_TIME { return None }
    match field(raw, REGION_OFFSET, REGION_MASK) {
        1 => Some(RegionCode::Barrel),
        2 => Some(RegionCode::Endcap),
        _ => None,
    }
}

pub(crate) fn field(raw: RawId, offset: u32, mask: u32) -> u32 { (raw >> offset) & mask }

pub(crate) fn zside(raw: RawId) -> Zside {
    if field(raw, ZSIDE_OFFSET, ZSIDE_MASK) == 0 { Zside::Minus } else { Zside::Plus }
}

pub(crate) fn rod_or_ring(raw: RawId) -> u32 { field(raw, ROD_RING_OFFSET, ROD_RING_MASK) }

/// Bits common to every cell in `region`
pub(crate) fn common_bits(region: RegionCode, zside: Zside, rod_or_ring: u32) -> RawId {
    let z = match zside { Zside::Minus => 0, Zside::Plus => 1 };
    (FORWARD                  << DETECTOR_OFFSET) |
    (FAST_TIME                << SUBDET_OFFSET  ) |
    ((region as u32)          << REGION_OFFSET  ) |
    (z                        << ZSIDE_OFFSET   ) |
    ((rod_or_ring & ROD_RING_MASK) << ROD_RING_OFFSET)
}
