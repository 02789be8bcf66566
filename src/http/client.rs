//! HTTP client for the release API and streamed downloads.

use anyhow::{Context, Result};
use futures_util::StreamExt;
use log::debug;
use reqwest::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::io::Write;

use super::status::classify_status;
use crate::error::FetchError;
use crate::progress::ProgressObserver;

/// Largest slice written to the destination in one call.
pub const CHUNK_SIZE: usize = 4096;

/// Thin wrapper over a configured reqwest `Client`.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Performs a GET request with the given `Accept` header and deserializes
    /// the JSON response.
    ///
    /// A non-success status comes back as a [`StatusError`](super::StatusError);
    /// a body that does not fit `T` as [`FetchError::Parse`].
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, accept: &str) -> Result<T> {
        debug!("GET JSON from {}...", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_status(status, response.headers(), url).into());
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", url))?;

        serde_json::from_str(&body)
            .map_err(|e| FetchError::Parse(format!("{} (from {})", e, url)).into())
    }

    /// Streams `url` into the writer produced by `create_writer`.
    ///
    /// The writer is only created once the server has answered with a
    /// success status. The body is written in slices of at most
    /// [`CHUNK_SIZE`] bytes and `progress` sees `(written, total)` after each
    /// one, where `total` is the `Content-Length`, or `size_hint` if the
    /// server sent none (0 when unknown). Returns the number of bytes written.
    #[tracing::instrument(skip(self, create_writer, progress))]
    pub async fn download_file<W, F>(
        &self,
        url: &str,
        size_hint: u64,
        create_writer: F,
        progress: &dyn ProgressObserver,
    ) -> Result<u64>
    where
        W: Write,
        F: FnOnce() -> Result<W>,
    {
        debug!("Downloading file from {}...", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transfer(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let reason = classify_status(status, response.headers(), url);
            return Err(FetchError::Transfer(reason.to_string()).into());
        }

        let total = response.content_length().unwrap_or(size_hint);
        let mut writer = create_writer()?;
        let mut written: u64 = 0;
        progress.on_download(written, total);

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| FetchError::Transfer(format!("reading {} failed: {}", url, e)))?;

            for piece in chunk.chunks(CHUNK_SIZE) {
                writer
                    .write_all(piece)
                    .map_err(|e| FetchError::Transfer(format!("writing chunk failed: {}", e)))?;
                written += piece.len() as u64;
                progress.on_download(written, total);
            }
        }

        writer
            .flush()
            .map_err(|e| FetchError::Transfer(format!("flushing download failed: {}", e)))?;

        debug!("Downloaded {:.2} MB", written as f64 / (1024.0 * 1024.0));

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::StatusError;
    use crate::progress::NoProgress;
    use std::sync::Mutex;

    /// Records every download event
    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<(u64, u64)>>,
    }

    impl ProgressObserver for Recorder {
        fn on_download(&self, bytes_so_far: u64, bytes_total: u64) {
            self.events.lock().unwrap().push((bytes_so_far, bytes_total));
        }

        fn on_extract(&self, _entries_so_far: usize, _entries_total: usize) {}
    }

    /// Writer that fails once it has accepted `limit` bytes
    struct FailingWriter {
        accepted: usize,
        limit: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.accepted + buf.len() > self.limit {
                return Err(std::io::Error::other("disk full"));
            }
            self.accepted += buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[derive(serde::Deserialize, Debug, PartialEq)]
    struct TestResponse {
        name: String,
        value: i32,
    }

    #[tokio::test]
    async fn test_get_json_success_sends_accept_header() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .match_header("accept", "application/vnd.github.v3+json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"name": "test", "value": 42}"#)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result: TestResponse = client
            .get_json(
                &format!("{}/test", url),
                "application/vnd.github.v3+json",
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result.name, "test");
        assert_eq!(result.value, 42);
    }

    #[tokio::test]
    async fn test_get_json_not_found_is_status_error() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/test")
            .with_status(404)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result: Result<TestResponse> = client
            .get_json(&format!("{}/test", url), "application/json")
            .await;

        mock.assert_async().await;
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StatusError>(),
            Some(StatusError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_get_json_malformed_body_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _mock = server
            .mock("GET", "/test")
            .with_status(200)
            .with_body(r#"{"name": 7}"#)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result: Result<TestResponse> = client
            .get_json(&format!("{}/test", url), "application/json")
            .await;

        assert!(matches!(
            result.unwrap_err().downcast_ref::<FetchError>(),
            Some(FetchError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_download_file_success() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/file.txt")
            .with_status(200)
            .with_body("test content")
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let bytes = client
            .download_file(
                &format!("{}/file.txt", url),
                0,
                || Ok(std::io::sink()),
                &NoProgress,
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(bytes, 12); // "test content" is 12 bytes
    }

    #[tokio::test]
    async fn test_download_file_reports_progress_in_chunks() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();
        let body = vec![7u8; CHUNK_SIZE * 2 + 100];

        let _mock = server
            .mock("GET", "/big.zip")
            .with_status(200)
            .with_body(&body)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let recorder = Recorder::default();
        let mut sink = Vec::new();
        let writer = &mut sink;
        let bytes = client
            .download_file(&format!("{}/big.zip", url), 0, move || Ok(writer), &recorder)
            .await
            .unwrap();

        assert_eq!(bytes, body.len() as u64);
        assert_eq!(sink, body);

        let events = recorder.events.lock().unwrap();
        assert_eq!(events.first().map(|e| e.0), Some(0));
        assert_eq!(events.last().map(|e| e.0), Some(body.len() as u64));
        // at least one event per CHUNK_SIZE slice
        assert!(events.len() >= 4);
        for pair in events.windows(2) {
            assert!(pair[1].0 >= pair[0].0);
            assert!(pair[1].0 - pair[0].0 <= CHUNK_SIZE as u64);
        }
    }

    #[tokio::test]
    async fn test_download_file_not_found_creates_no_writer() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let mock = server
            .mock("GET", "/file.txt")
            .with_status(404)
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result = client
            .download_file(
                &format!("{}/file.txt", url),
                0,
                || -> Result<std::io::Sink> { panic!("writer must not be created") },
                &NoProgress,
            )
            .await;

        mock.assert_async().await;
        assert!(matches!(
            result.unwrap_err().downcast_ref::<FetchError>(),
            Some(FetchError::Transfer(_))
        ));
    }

    #[tokio::test]
    async fn test_download_file_write_failure_is_transfer_error() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _mock = server
            .mock("GET", "/file.bin")
            .with_status(200)
            .with_body(vec![1u8; CHUNK_SIZE * 3])
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let result = client
            .download_file(
                &format!("{}/file.bin", url),
                0,
                || {
                    Ok(FailingWriter {
                        accepted: 0,
                        limit: CHUNK_SIZE,
                    })
                },
                &NoProgress,
            )
            .await;

        let err = result.unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert!(matches!(
            err.downcast_ref::<FetchError>(),
            Some(FetchError::Transfer(_))
        ));
    }

    #[tokio::test]
    async fn test_download_file_without_length_uses_size_hint() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let _mock = server
            .mock("GET", "/file.bin")
            .with_status(200)
            .with_chunked_body(|w| w.write_all(&[3u8; 100]))
            .create_async()
            .await;

        let client = HttpClient::new(Client::new());
        let recorder = Recorder::default();
        let bytes = client
            .download_file(
                &format!("{}/file.bin", url),
                100,
                || Ok(std::io::sink()),
                &recorder,
            )
            .await
            .unwrap();

        assert_eq!(bytes, 100);
        let events = recorder.events.lock().unwrap();
        assert!(events.iter().all(|&(_, total)| total == 100));
        assert_eq!(events.last(), Some(&(100, 100)));
    }
}
