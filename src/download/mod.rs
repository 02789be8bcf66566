use crate::http::HttpClient;
use crate::progress::ProgressObserver;
use crate::runtime::Runtime;
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

/// Streams `url` into `dest`, creating missing parent directories.
///
/// `size_hint` is the expected length reported to `progress` when the
/// server does not send a `Content-Length`.
///
/// Nothing is created on disk unless the server answers with a success
/// status. If the transfer breaks off the partial file stays where it is.
#[tracing::instrument(skip(runtime, dest, http_client, progress))]
pub async fn download_file<R: Runtime>(
    runtime: &R,
    url: &str,
    size_hint: u64,
    dest: &Path,
    http_client: &HttpClient,
    progress: &dyn ProgressObserver,
) -> Result<u64> {
    info!("Downloading file from {}...", url);

    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| url.to_string());
    progress.on_download_started(&name);

    let bytes = http_client
        .download_file(
            url,
            size_hint,
            || {
                if let Some(parent) = dest.parent() {
                    runtime.create_dir_all(parent)?;
                }
                runtime
                    .create_file(dest)
                    .with_context(|| format!("Failed to create download file at {:?}", dest))
            },
            progress,
        )
        .await?;

    progress.on_download_finished(bytes);
    info!("Download complete.");
    Ok(bytes)
}
