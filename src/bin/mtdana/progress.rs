/// Progress bar and statistics for `mtdana` executable
pub (super) struct Progress(Mutex<Inner>);

struct Inner {
    n_files_given: usize,
    n_files_read: usize,
    n_events_read: u64,
    files_bar: ProgressBar,
}

impl Progress {

    pub (super) fn new(infiles: &[PathBuf]) -> Self {
        let first = infiles.first().map(|f| f.display().to_string()).unwrap_or_default();
        let bar = ProgressBar::new(infiles.len() as u64).with_message(first);
        bar.set_style(ProgressStyle::default_bar()
                      .template("Processing file: {msg}\n[{elapsed_precise}] {wide_bar} {pos}/{len} ({eta_precise})")
                      .expect("progress bar template is valid")
        );
        bar.tick();
        Self (
            Mutex::new(
                Inner {
                    n_files_given: infiles.len(),
                    n_files_read: 0,
                    n_events_read: 0,
                    files_bar: bar,
                }
            )
        )
    }

    pub (super) fn file_done(&self, file: &Path, n_events: usize) {
        let mut data = self.0.lock().unwrap();
        data.n_files_read += 1;
        data.n_events_read += n_events as u64;
        let message = format!("{}. {} events so far.", file.display(), group_digits(data.n_events_read));
        data.files_bar.set_message(message);
        data.files_bar.inc(1);
        debug!(file = %file.display(), n_events, "file analysed");
    }

    pub (super) fn final_report(&self, tally: &Tally) {
        let data = self.0.lock().unwrap();
        data.files_bar.finish_with_message("<finished processing files>");
        let Tally { events, barrel_cells, endcap_cells, .. } = tally;
        println!("{} events in {} / {} files", group_digits(events), data.n_files_read, data.n_files_given);
        println!("Reconstructed cells: {} barrel, {} endcap", group_digits(barrel_cells), group_digits(endcap_cells));
        info!(events, barrel_cells, endcap_cells, "analysis finished");
    }

}

// ----- Imports -----------------------------------------------------------------------------------------
use std::{
    sync::Mutex,
    path::{Path, PathBuf},
};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};
use mtdana::utils::group_digits;
use super::Tally;
