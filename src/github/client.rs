use anyhow::Result;
use async_trait::async_trait;
use log::{debug, warn};

use super::repo::GitHubRepo;
use super::types::Release;
use crate::http::{HttpClient, StatusError};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Media type GitHub's REST API v3 answers with.
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GetReleases: Send + Sync {
    /// Fetch the latest release of `repo`.
    ///
    /// Returns `Ok(None)` when the API answers with a non-success status;
    /// transport failures and malformed bodies are errors.
    async fn get_latest_release(&self, repo: &GitHubRepo) -> Result<Option<Release>>;
}

pub struct GitHub {
    pub http: HttpClient,
    pub api_url: String,
}

impl GitHub {
    #[tracing::instrument(skip(http, api_url))]
    pub fn new(http: HttpClient, api_url: Option<String>) -> Self {
        let api_url = api_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self { http, api_url }
    }

    fn latest_release_url(&self, repo: &GitHubRepo) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url, repo.owner, repo.repo
        )
    }
}

#[async_trait]
impl GetReleases for GitHub {
    #[tracing::instrument(skip(self, repo))]
    async fn get_latest_release(&self, repo: &GitHubRepo) -> Result<Option<Release>> {
        let url = self.latest_release_url(repo);
        debug!("Fetching latest release from {}...", url);

        match self.http.get_json::<Release>(&url, GITHUB_ACCEPT).await {
            Ok(release) => Ok(Some(release)),
            Err(e) => {
                if let Some(status) = e.downcast_ref::<StatusError>() {
                    warn!("{}", status);
                    return Ok(None);
                }
                Err(e)
            }
        }
    }
}
