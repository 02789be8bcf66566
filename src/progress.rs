//! Progress reporting for downloads and extraction.
//!
//! The transfer and extraction code only talks to [`ProgressObserver`];
//! rendering is up to the implementation.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::OnceLock;

/// Receives progress events from the fetch steps.
pub trait ProgressObserver: Send + Sync {
    /// A download of `name` is about to start.
    fn on_download_started(&self, _name: &str) {}

    /// `bytes_total` is 0 when the server did not announce a length.
    fn on_download(&self, bytes_so_far: u64, bytes_total: u64);

    fn on_download_finished(&self, _bytes: u64) {}

    fn on_extract(&self, entries_so_far: usize, entries_total: usize);

    fn on_extract_finished(&self, _entries: usize) {}
}

/// Discards every event.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_download(&self, _bytes_so_far: u64, _bytes_total: u64) {}

    fn on_extract(&self, _entries_so_far: usize, _entries_total: usize) {}
}

/// Renders progress bars on stderr. Bars are created lazily on the first
/// event, so a download without `Content-Length` gets a spinner instead.
#[derive(Default)]
pub struct ConsoleProgress {
    label: OnceLock<String>,
    download: OnceLock<ProgressBar>,
    extract: OnceLock<ProgressBar>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn label(&self) -> String {
        self.label.get().cloned().unwrap_or_default()
    }

    fn download_bar(&self, bytes_total: u64) -> ProgressBar {
        let bar = if bytes_total > 0 {
            let bar = ProgressBar::new(bytes_total);
            bar.set_style(
                ProgressStyle::with_template(
                    "{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
            );
            bar
        } else {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner} {msg} {bytes} ({bytes_per_sec})")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar
        };
        bar.set_message(self.label());
        bar
    }

    fn extract_bar(entries_total: usize) -> ProgressBar {
        let bar = ProgressBar::new(entries_total as u64);
        bar.set_style(
            ProgressStyle::with_template("Extracting files [{bar:40.green/blue}] {pos}/{len} files")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar
    }
}

impl ProgressObserver for ConsoleProgress {
    fn on_download_started(&self, name: &str) {
        let _ = self.label.set(name.to_string());
    }

    fn on_download(&self, bytes_so_far: u64, bytes_total: u64) {
        let bar = self
            .download
            .get_or_init(|| self.download_bar(bytes_total));
        bar.set_position(bytes_so_far);
    }

    fn on_download_finished(&self, _bytes: u64) {
        if let Some(bar) = self.download.get() {
            bar.finish();
        }
    }

    fn on_extract(&self, entries_so_far: usize, entries_total: usize) {
        let bar = self
            .extract
            .get_or_init(|| Self::extract_bar(entries_total));
        bar.set_position(entries_so_far as u64);
    }

    fn on_extract_finished(&self, _entries: usize) {
        if let Some(bar) = self.extract.get() {
            bar.finish();
        }
    }
}
