/// Command line interface for `mtdana` executable
#[derive(clap::Parser, Debug, Clone)]
#[clap(
    name = "mtdana",
    about = "Per-cell statistics of MTD hits, from simulation to reconstruction",
)]
pub (super) struct Cli {
    /// HDF5 input files with `btl` and `etl` hit tables
    #[clap(required = true)]
    pub infiles: Vec<PathBuf>,

    /// TOML file with per-region cuts and time-walk parameters
    #[clap(short, long)]
    pub config: PathBuf,

    /// HDF5 output file for histograms and profiles
    #[clap(short, long)]
    pub out: PathBuf,

    /// Maximum number of rayon threads processing input files
    #[clap(short = 'j', long, default_value = "2")] // HDF5 reads are serialized by a global lock
    pub threads: usize,
}

// ----- Imports -----------------------------------------------------------------------------------------
use std::path::PathBuf;
