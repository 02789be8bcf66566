use anyhow::{Context, Result};
use log::debug;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use std::path::PathBuf;
use std::time::Duration;

use crate::{
    archive::{ArchiveExtractor, ZipExtractor},
    github::{GetReleases, GitHub, GitHubRepo},
    http::HttpClient,
    platform::PlatformTable,
    runtime::Runtime,
};

pub const DEFAULT_REPO: &str = "v2fly/v2ray-core";

const USER_AGENT: &str = concat!("corefetch/", env!("COREFETCH_VERSION"));

/// Settings collected from the command line and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// `owner/repo` of the upstream project
    pub repo: String,
    /// Where the archive is downloaded and extracted; `<cwd>/<repo>` if unset
    pub target_dir: Option<PathBuf>,
    pub api_url: Option<String>,
    /// Deadline applied to each HTTP request; none if unset
    pub timeout: Option<Duration>,
    /// Suppress progress bars
    pub quiet: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            repo: DEFAULT_REPO.to_string(),
            target_dir: None,
            api_url: None,
            timeout: None,
            quiet: false,
        }
    }
}

pub struct Config<R: Runtime, G: GetReleases, E: ArchiveExtractor> {
    pub runtime: R,
    pub github: G,
    pub http: HttpClient,
    pub extractor: E,
    pub repo: GitHubRepo,
    pub target_dir: PathBuf,
    pub platforms: PlatformTable,
}

impl<R: Runtime> Config<R, GitHub, ZipExtractor> {
    pub fn new(runtime: R, options: &Options) -> Result<Self> {
        let repo = options.repo.parse::<GitHubRepo>()?;

        let target_dir = match &options.target_dir {
            Some(dir) => dir.clone(),
            None => runtime.current_dir()?.join(&repo.repo),
        };

        let client = build_client(&runtime, options.timeout)?;
        let http = HttpClient::new(client);
        let github = GitHub::new(http.clone(), options.api_url.clone());

        Ok(Self {
            runtime,
            github,
            http,
            extractor: ZipExtractor,
            repo,
            target_dir,
            platforms: PlatformTable::default(),
        })
    }
}

/// Build the shared reqwest client: user agent, optional bearer token from
/// `GITHUB_TOKEN`, optional request deadline.
fn build_client<R: Runtime>(runtime: &R, timeout: Option<Duration>) -> Result<Client> {
    let mut headers = HeaderMap::new();
    if let Ok(token) = runtime.env_var("GITHUB_TOKEN")
        && !token.is_empty()
    {
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {}", token))
            .context("GITHUB_TOKEN is not a valid header value")?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);
        debug!("Using GITHUB_TOKEN for authentication: {}", mask(&token));
    }

    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers);
    if let Some(timeout) = timeout {
        debug!("Request timeout set to {:?}", timeout);
        builder = builder.timeout(timeout);
    }

    builder.build().context("Failed to build HTTP client")
}

fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}*********{}", head, tail)
}
