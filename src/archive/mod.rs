mod zip;

use crate::progress::ProgressObserver;
use crate::runtime::Runtime;
use anyhow::Result;
use std::path::Path;

pub use self::zip::ZipExtractor;

/// Trait for format-specific archive extractors
pub trait ArchiveExtractor: Send + Sync {
    /// Check if this extractor can handle the given archive format
    fn can_handle(&self, archive_path: &Path) -> bool;

    /// Extract every entry of the archive beneath `extract_to`, in archive
    /// order, overwriting existing files. Returns the number of entries.
    fn extract<R: Runtime>(
        &self,
        runtime: &R,
        archive_path: &Path,
        extract_to: &Path,
        progress: &dyn ProgressObserver,
    ) -> Result<usize>;
}
