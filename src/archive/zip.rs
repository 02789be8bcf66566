use crate::progress::ProgressObserver;
use crate::runtime::Runtime;
use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use std::path::Path;
use zip::ZipArchive;

use super::ArchiveExtractor;

/// Extractor for .zip archives
pub struct ZipExtractor;

impl ArchiveExtractor for ZipExtractor {
    fn can_handle(&self, archive_path: &Path) -> bool {
        let name = archive_path.to_string_lossy().to_lowercase();
        name.ends_with(".zip")
    }

    #[tracing::instrument(skip(self, runtime, archive_path, extract_to, progress))]
    fn extract<R: Runtime>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
        progress: &dyn ProgressObserver,
    ) -> Result<usize> {
        if !self.can_handle(archive_path) {
            bail!("Unsupported archive format: {}", archive_path.display());
        }

        debug!("Extracting zip archive {:?} to {:?}...", archive_path, extract_to);
        let file = runtime
            .open(archive_path)
            .with_context(|| format!("Failed to open archive at {:?}", archive_path))?;

        let mut archive = ZipArchive::new(file).context("Failed to parse ZIP archive")?;
        runtime.create_dir_all(extract_to)?;

        let total = archive.len();
        for i in 0..total {
            let mut entry = archive
                .by_index(i)
                .with_context(|| format!("Failed to read ZIP entry {}", i))?;

            match entry.enclosed_name() {
                None => warn!("Skipping entry with unsafe path: {}", entry.name()),
                Some(entry_path) => {
                    let full_path = extract_to.join(&entry_path);
                    debug!("Extracting {:?}", full_path);

                    if entry.is_dir() {
                        runtime.create_dir_all(&full_path)?;
                    } else {
                        if let Some(parent) = full_path.parent() {
                            runtime.create_dir_all(parent)?;
                        }
                        let mut dest_file = runtime.create_file(&full_path)?;
                        std::io::copy(&mut entry, &mut dest_file)
                            .with_context(|| format!("Failed to extract file {:?}", full_path))?;
                        drop(dest_file);

                        // Archive mode plus owner write, so a later run can overwrite
                        #[cfg(unix)]
                        if let Some(mode) = entry.unix_mode()
                            && let Err(e) = runtime.set_permissions(&full_path, mode | 0o200)
                        {
                            debug!("Failed to set permissions on {:?}: {}", full_path, e);
                        }
                    }
                }
            }

            progress.on_extract(i + 1, total);
        }

        progress.on_extract_finished(total);
        info!("Extraction complete.");
        Ok(total)
    }
}
