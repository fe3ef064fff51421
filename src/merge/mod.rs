//! Fold each hit collection of an event into the shared `CellTable`
//!
//! The mergers only ever write into the table; none of them looks at another
//! stage's input. They run in pipeline order: sim, digi, uncalibrated reco,
//! reco.

mod sim;
mod digi;
mod ureco;
mod reco;

pub use sim::merge_sim_hits;
pub use digi::merge_digis;
pub use ureco::merge_ureco_hits;
pub use reco::merge_reco_hits;
