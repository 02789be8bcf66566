//! Application layer: wires configuration into a [`CoreFetcher`] run.

pub mod config;
mod fetch;

pub use config::{Config, DEFAULT_REPO, Options};
pub use fetch::{CoreFetcher, ResolvedAsset, RunReport, Stage};

use anyhow::Result;
use log::debug;

use crate::progress::{ConsoleProgress, NoProgress, ProgressObserver};
use crate::runtime::Runtime;

/// Fetch the latest release for this host as described by `options`.
#[tracing::instrument(skip(runtime, options))]
pub async fn fetch<R: Runtime>(runtime: R, options: Options) -> Result<RunReport> {
    let config = Config::new(runtime, &options)?;
    debug!(
        "Fetching {} into {:?} via {}",
        config.repo, config.target_dir, config.github.api_url
    );

    let progress: Box<dyn ProgressObserver> = if options.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ConsoleProgress::new())
    };

    let Config {
        runtime,
        github,
        http,
        extractor,
        repo,
        target_dir,
        platforms,
    } = config;

    let fetcher = CoreFetcher::new(runtime, github, http, extractor, platforms);
    fetcher.run(&repo, &target_dir, &*progress).await
}
