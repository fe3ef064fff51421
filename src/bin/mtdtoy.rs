//! Write a synthetic `mtdana` input file.
//!
//! Each event has a random set of barrel and endcap cells. Every cell gets
//! one to three sim hits with exponentially distributed times of flight; the
//! later stages are derived from the earliest hit with Gaussian smearing. The
//! uncalibrated times carry the time walk which `mtdana` corrects for.

#[derive(clap::Parser, Debug, Clone)]
#[clap(name = "mtdtoy", about = "Generate synthetic MTD hit tables")]
pub struct Cli {
    /// HDF5 output file
    #[clap(short, long)]
    pub out: PathBuf,

    /// Number of events to generate
    #[clap(short = 'n', long, default_value = "1000")]
    pub events: u32,

    /// Mean number of hit cells per event and region
    #[clap(long, default_value = "20")]
    pub cells: f32,

    /// Fraction of readout sides which see no signal
    #[clap(long, default_value = "0.05")]
    pub dead_side: f64,

    /// Seed for the random number generator
    #[clap(long, default_value = "42")]
    pub seed: u64,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut rng = StdRng::seed_from_u64(args.seed);
    let toy = Toy::new(&args)?;
    let mut barrel = Tables::default();
    let mut endcap = Tables::default();
    for event_id in 0..args.events {
        toy.event(&mut rng, event_id, &mut barrel, random_barrel_cell);
        toy.event(&mut rng, event_id, &mut endcap, random_endcap_cell);
    }
    info!(events = args.events, barrel_cells = barrel.reco.len(), endcap_cells = endcap.reco.len(), "generated");

    if let Some(dir) = args.out.parent() { std::fs::create_dir_all(dir)?; }
    let file = hdf5::File::create(&args.out)?;
    write_collections(&file, Detector::Barrel, &barrel.into())?;
    write_collections(&file, Detector::Endcap, &endcap.into())?;
    println!("Wrote {} events to {}", group_digits(args.events), args.out.display());
    Ok(())
}

#[derive(Default)]
struct Tables {
    sim  : Vec<SimHit>,
    digi : Vec<DigiFrame>,
    ureco: Vec<UncalibratedRecHit>,
    reco : Vec<RecHit>,
}

impl From<Tables> for Collections {
    fn from(Tables { sim, digi, ureco, reco }: Tables) -> Self {
        Collections { sim: Some(sim), digi: Some(digi), ureco: Some(ureco), reco: Some(reco) }
    }
}

struct Toy {
    n_cells   : Poisson<f32>,
    n_tracks  : Uniform<u32>,
    tof       : Exp<f32>,
    energy    : Exp<f32>,
    smear     : Normal<f32>,
    jitter    : Normal<f32>,
    dead_side : f64,
    timewalk  : TimeWalk,
}

/// pC of uncalibrated amplitude per MeV deposited
const AMPLITUDE_PER_MEV: f32 = 30.0;
/// ADC counts per pC
const COUNTS_PER_PC: f32 = 1.5;
/// TDC counts per ns
const COUNTS_PER_NS: f32 = 40.0;

impl Toy {
    fn new(args: &Cli) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            n_cells  : Poisson::new(args.cells)?,
            n_tracks : Uniform::new_inclusive(1, 3),
            tof      : Exp::new(1.0 / 8.0)?,   // ns
            energy   : Exp::new(1.0 / 0.003)?, // GeV
            smear    : Normal::new(1.0, 0.05)?,
            jitter   : Normal::new(0.0, 0.03)?, // ns
            dead_side: args.dead_side,
            timewalk : TimeWalk::default(),
        })
    }

    fn event(&self, rng: &mut impl Rng, event_id: u32, tables: &mut Tables, random_cell: fn(&mut dyn RngCore) -> RawId) {
        let n_cells = self.n_cells.sample(rng) as usize;
        let mut cells: Vec<RawId> = (0..n_cells).map(|_| random_cell(rng)).collect();
        cells.sort_unstable();
        cells.dedup();
        for cell_id in cells {
            self.cell(rng, event_id, cell_id, tables);
        }
    }

    fn cell(&self, rng: &mut impl Rng, event_id: u32, cell_id: RawId, tables: &mut Tables) {
        let n_tracks = self.n_tracks.sample(rng);
        let mut hits: Vec<SimHit> = (0..n_tracks)
            .map(|track_id| SimHit {
                event_id, cell_id,
                track_id   : track_id as i32 + 1,
                energy_loss: self.energy.sample(rng),
                tof        : self.tof.sample(rng),
                x          : rng.gen_range(-1.45..1.45),
                y          : rng.gen_range(-28.0..28.0),
                z          : rng.gen_range(-1.5..1.5),
            })
            .collect();
        let t0 = hits.iter().map(|h| h.tof).fold(f32::INFINITY, f32::min);
        let energy: f32 = hits.iter().filter(|h| h.tof < 25.0).map(|h| h.energy_loss * MEV_PER_GEV).sum();
        tables.sim.append(&mut hits);

        let mut samples = [DigiSample::default(); 2];
        let mut amplitude = [0.0; 2];
        let mut time = [0.0; 2];
        for side in 0..2 {
            if rng.gen_bool(self.dead_side) { continue }
            let q = energy * AMPLITUDE_PER_MEV * self.smear.sample(rng);
            if q <= 0.0 { continue }
            let t = t0 + self.jitter.sample(rng);
            let walk = self.timewalk.correction(q).unwrap_or(0.0);
            amplitude[side] = q;
            time[side] = t - walk;
            samples[side] = DigiSample {
                charge: (q * COUNTS_PER_PC) as u32,
                toa   : ((t - walk) * COUNTS_PER_NS).max(0.0) as u32,
                toa2  : ((t - walk) * COUNTS_PER_NS * 1.1).max(0.0) as u32,
            };
        }
        tables.digi.push(DigiFrame { event_id, cell_id, samples });
        tables.ureco.push(UncalibratedRecHit { event_id, cell_id, amplitude, time });
        tables.reco.push(RecHit {
            event_id, cell_id,
            energy: energy * self.smear.sample(rng),
            time  : t0 + self.jitter.sample(rng),
        });
    }
}

fn random_barrel_cell(rng: &mut dyn RngCore) -> RawId {
    let zside = if rng.gen_bool(0.5) { Zside::Plus } else { Zside::Minus };
    BarrelId::new(zside, rng.gen_range(1..=36), rng.gen_range(1..=42), rng.gen_range(0..64)).raw()
}

fn random_endcap_cell(rng: &mut dyn RngCore) -> RawId {
    let zside = if rng.gen_bool(0.5) { Zside::Plus } else { Zside::Minus };
    EndcapId::new(zside, rng.gen_range(1..=11), rng.gen_range(1..=511)).raw()
}

// ----- Imports -----------------------------------------------------------------------------------------
use std::error::Error;
use std::path::PathBuf;
use clap::Parser;
use rand::{Rng, RngCore, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Exp, Normal, Poisson, Uniform};
use tracing::info;
use tracing_subscriber::EnvFilter;
use detid::{BarrelId, EndcapId, RawId, Zside};
use mtdana::{
    event::{Collections, Detector, DigiFrame, DigiSample, RecHit, SimHit, UncalibratedRecHit},
    io::hdf5::write_collections,
    timewalk::TimeWalk,
    types::MEV_PER_GEV,
    utils::group_digits,
};
