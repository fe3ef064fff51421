//! Charge-dependent time-walk correction of the front-end discriminator
//!
//! `correction(q) = p0 * q^p1 + p2`

use serde::Deserialize;

use crate::types::{Chargef32, Timef32};

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct TimeWalk {
    pub p0: f32,
    pub p1: f32,
    pub p2: f32,
}

impl Default for TimeWalk {
    #[allow(clippy::excessive_precision)]
    fn default() -> Self { Self { p0: 2.21103, p1: -0.933552, p2: 0.0 } }
}

impl TimeWalk {
    /// Additive time correction [ns] for a pulse of `charge` [pC].
    ///
    /// `None` for zero charge: the parametrization diverges there, and a side
    /// without charge has no pulse to correct.
    pub fn correction(&self, charge: Chargef32) -> Option<Timef32> {
        if charge == 0.0 { return None }
        let Self { p0, p1, p2 } = *self;
        Some(p0 * charge.powf(p1) + p2)
    }

    /// `time` with the correction for `charge` added
    pub fn corrected(&self, time: Timef32, charge: Chargef32) -> Option<Timef32> {
        self.correction(charge).map(|c| time + c)
    }
}
