use anyhow::Result;
use log::debug;
use std::path::{Path, PathBuf};

use crate::{
    archive::ArchiveExtractor,
    asset::{AssetPicker, PlatformAssetPicker},
    cleanup::{CleanupOutcome, remove_archive},
    download::download_file,
    error::FetchError,
    github::{GetReleases, GitHubRepo, ReleaseAsset},
    http::HttpClient,
    platform::{self, PlatformKey, PlatformTable},
    progress::ProgressObserver,
    runtime::Runtime,
};

/// Steps of a run, in order. A run ends in `Done` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Detecting,
    Resolving,
    Downloading,
    Extracting,
    Cleaning,
    Done,
    Failed,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Detecting => "detecting platform",
            Stage::Resolving => "resolving release",
            Stage::Downloading => "downloading",
            Stage::Extracting => "extracting",
            Stage::Cleaning => "cleaning up",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The asset chosen for this platform and the release it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAsset {
    pub tag: String,
    pub asset: ReleaseAsset,
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub platform: PlatformKey,
    pub tag: String,
    pub asset: ReleaseAsset,
    pub archive_path: PathBuf,
    pub bytes: u64,
    pub entries: usize,
    pub cleanup: CleanupOutcome,
}

/// Runs detect, resolve, download, extract and clean up, one after another.
pub struct CoreFetcher<R: Runtime, G: GetReleases, E: ArchiveExtractor> {
    pub runtime: R,
    pub github: G,
    pub http: HttpClient,
    pub extractor: E,
    pub platforms: PlatformTable,
}

impl<R: Runtime, G: GetReleases, E: ArchiveExtractor> CoreFetcher<R, G, E> {
    pub fn new(
        runtime: R,
        github: G,
        http: HttpClient,
        extractor: E,
        platforms: PlatformTable,
    ) -> Self {
        Self {
            runtime,
            github,
            http,
            extractor,
            platforms,
        }
    }

    /// Fetch the latest release of `repo` for this host into `target_dir`.
    #[tracing::instrument(skip(self, target_dir, progress))]
    pub async fn run(
        &self,
        repo: &GitHubRepo,
        target_dir: &Path,
        progress: &dyn ProgressObserver,
    ) -> Result<RunReport> {
        let mut stage = Stage::Idle;
        let result = self.run_stages(repo, target_dir, progress, &mut stage).await;

        match &result {
            Ok(_) => advance(&mut stage, Stage::Done),
            Err(e) => {
                debug!("Stopped while {}: {}", stage, e);
                advance(&mut stage, Stage::Failed);
            }
        }
        result
    }

    async fn run_stages(
        &self,
        repo: &GitHubRepo,
        target_dir: &Path,
        progress: &dyn ProgressObserver,
        stage: &mut Stage,
    ) -> Result<RunReport> {
        advance(stage, Stage::Detecting);
        let platform = platform::detect(&self.runtime, &self.platforms)?;
        println!("current system {} machine {}", platform.os, platform.arch);

        advance(stage, Stage::Resolving);
        let ResolvedAsset { tag, asset } = self.resolve(repo, &platform).await?;
        println!("Found {} in release {}", asset.name, tag);

        advance(stage, Stage::Downloading);
        let archive_path = archive_path(target_dir, &asset)?;
        let bytes = download_file(
            &self.runtime,
            &asset.browser_download_url,
            asset.size,
            &archive_path,
            &self.http,
            progress,
        )
        .await?;

        advance(stage, Stage::Extracting);
        let entries =
            self.extractor
                .extract(&self.runtime, &archive_path, target_dir, progress)?;
        println!("Extracted {} entries to {}", entries, target_dir.display());

        advance(stage, Stage::Cleaning);
        let cleanup = remove_archive(&self.runtime, &archive_path)?;
        match cleanup {
            CleanupOutcome::Removed => println!("Deleted {}", archive_path.display()),
            CleanupOutcome::AlreadyAbsent => {
                println!("The file {} does not exist", archive_path.display())
            }
        }

        Ok(RunReport {
            platform,
            tag,
            asset,
            archive_path,
            bytes,
            entries,
            cleanup,
        })
    }

    /// Look up the latest release and pick the first asset for `platform`.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, repo: &GitHubRepo, platform: &PlatformKey) -> Result<ResolvedAsset> {
        let release = self
            .github
            .get_latest_release(repo)
            .await?
            .ok_or_else(|| FetchError::ReleaseLookupFailed {
                repo: repo.to_string(),
            })?;

        let picker = PlatformAssetPicker::new(platform.clone());
        debug!(
            "Scanning {} assets of {} for {} *{}",
            release.assets.len(),
            release.tag_name,
            platform,
            picker.suffix()
        );

        let asset = picker
            .pick(&release.assets)
            .cloned()
            .ok_or_else(|| FetchError::AssetNotFound {
                repo: repo.to_string(),
                tag: release.tag_name.clone(),
                os: platform.os.clone(),
                arch: platform.arch.clone(),
            })?;

        Ok(ResolvedAsset {
            tag: release.tag_name,
            asset,
        })
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!("{} -> {}", stage, next);
    *stage = next;
}

/// `<target_dir>/<asset name>`; the name must be a bare file name.
fn archive_path(target_dir: &Path, asset: &ReleaseAsset) -> Result<PathBuf, FetchError> {
    let name = Path::new(&asset.name);
    match name.file_name() {
        Some(file_name) if file_name == name.as_os_str() => Ok(target_dir.join(file_name)),
        _ => Err(FetchError::Parse(format!(
            "asset name {:?} is not a plain file name",
            asset.name
        ))),
    }
}
