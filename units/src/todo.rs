/// Units which are simply type aliases for `f32` rather than having an
/// implementation as a `uom` `Quantity`.
///
/// Hit records arrive from the detector chain as plain floats in fixed units
/// (energies in GeV or MeV, charges in pC, ADC/TDC counts). We keep them as
/// `f32`s, but still want some clues in the source as to what they
/// represent.

pub type Lengthf32 = f32;
pub type Timef32   = f32;
pub type Energyf32 = f32; // TODO uom Energy
pub type Chargef32 = f32; // TODO uom Charge
