mod cli;
mod progress;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = read_config_file(&args.config)?;
    info!(?config, "configuration read");

    // Before starting the potentially long computation, make sure that we can
    // write the result to the requested destination.
    if let Some(dir) = args.out.parent() { std::fs::create_dir_all(dir)?; }
    // --- Progress bar --------------------------------------------------------------
    let progress = Progress::new(&args.infiles);
    // --- Process input files -------------------------------------------------------
    let analysis = Analysis::new(&config);
    let pool = rayon::ThreadPoolBuilder::new().num_threads(args.threads).build()?;
    let tally = pool.install(|| {
        args.infiles
            .par_iter()
            .map(|file| analysis.file(file, &progress))
            .try_reduce(|| analysis.empty_tally(), |mut a, b| { a += &b; Ok(a) })
    })?;
    progress.final_report(&tally);
    // --- Write histograms to hdf5 ---------------------------------------------------
    println!("Writing histograms to {}", args.out.display());
    let file = hdf5::File::create(&args.out)?;
    write_book(&file, Detector::Barrel.group(), &tally.barrel)?;
    if let Some(endcap) = &tally.endcap {
        write_book(&file, Detector::Endcap.group(), endcap)?;
    }
    Ok(())
}

/// Aggregators of the configured regions, with the histogram bookings they fill
struct Analysis {
    barrel: (Aggregator<Barrel>, Booking),
    endcap: Option<(Aggregator<Endcap>, Booking)>,
}

impl Analysis {
    fn new(config: &Config) -> Self {
        let timewalk = config.timewalk;
        Self {
            barrel: (Aggregator::new(config.barrel.into(), timewalk), Booking::for_axes(&Barrel::axes())),
            endcap: config.endcap.map(|endcap| (Aggregator::new(endcap.into(), timewalk), Booking::for_axes(&Endcap::axes()))),
        }
    }

    fn detectors(&self) -> Vec<Detector> {
        let mut detectors = vec![Detector::Barrel];
        if self.endcap.is_some() { detectors.push(Detector::Endcap); }
        detectors
    }

    fn empty_tally(&self) -> Tally {
        Tally {
            events: 0,
            barrel_cells: 0,
            endcap_cells: 0,
            barrel: HistogramBook::new(&self.barrel.1),
            endcap: self.endcap.as_ref().map(|(_, booking)| HistogramBook::new(booking)),
        }
    }

    /// Analyse every event in `file`, stopping at the first missing table or collection
    fn file(&self, file: &Path, progress: &Progress) -> Result<Tally, FileError> {
        let fail = |message: String| FileError { file: file.to_path_buf(), message };
        let events = read_events(&file, &self.detectors()).map_err(|e| fail(e.to_string()))?;
        let mut tally = self.empty_tally();
        for event in &events {
            let occupancy = self.barrel.0.analyze(event, &mut tally.barrel).map_err(|e| fail(e.to_string()))?;
            tally.barrel_cells += occupancy.reco;
            if let (Some((aggregator, _)), Some(book)) = (&self.endcap, &mut tally.endcap) {
                let occupancy = aggregator.analyze(event, book).map_err(|e| fail(e.to_string()))?;
                tally.endcap_cells += occupancy.reco;
            }
        }
        tally.events = events.len();
        progress.file_done(file, events.len());
        Ok(tally)
    }
}

/// Statistics accumulated over some input files
pub (crate) struct Tally {
    pub events: usize,
    pub barrel_cells: usize,
    pub endcap_cells: usize,
    pub barrel: HistogramBook,
    pub endcap: Option<HistogramBook>,
}

impl std::ops::AddAssign<&Tally> for Tally {
    fn add_assign(&mut self, rhs: &Tally) {
        self.events       += rhs.events;
        self.barrel_cells += rhs.barrel_cells;
        self.endcap_cells += rhs.endcap_cells;
        self.barrel       += &rhs.barrel;
        if let (Some(mine), Some(theirs)) = (&mut self.endcap, &rhs.endcap) { *mine += theirs; }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("{}: {message}", file.display())]
struct FileError {
    file: PathBuf,
    message: String,
}

// ----- Imports -----------------------------------------------------------------------------------------
use std::error::Error;
use std::path::{Path, PathBuf};
use clap::Parser;
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;
use mtdana::{
    Aggregator, Barrel, Endcap, Region,
    config::{read_config_file, Config},
    event::Detector,
    io::hdf5::{read_events, write_book},
    sink::{HistogramBook, book::Booking},
};
use cli::Cli;
use progress::Progress;
