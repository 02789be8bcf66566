use anyhow::Result;
use clap::Parser;
use corefetch::application::{self, DEFAULT_REPO, Options};
use std::path::PathBuf;
use std::time::Duration;

/// corefetch - fetch the latest release archive for this machine
///
/// Looks up the latest GitHub release of OWNER/REPO, downloads the .zip asset
/// built for the current OS and architecture, extracts it into the target
/// directory and deletes the archive.
///
/// If the GITHUB_TOKEN environment variable is set, it will be used for authentication.
/// This is useful for avoiding rate limits.
///
/// Examples:
///   corefetch                      # v2fly/v2ray-core into ./v2ray-core
///   corefetch XTLS/Xray-core -d /opt/xray
#[derive(Parser, Debug)]
#[command(author, version = env!("COREFETCH_VERSION"), about)]
struct Cli {
    /// The GitHub repository in the format "owner/repo"
    #[arg(value_name = "OWNER/REPO", env = "COREFETCH_REPO", default_value = DEFAULT_REPO)]
    pub repo: String,

    /// Directory to download and extract into (defaults to ./<repo>)
    #[arg(long = "dir", short = 'd', env = "COREFETCH_DIR", value_name = "PATH")]
    pub target_dir: Option<PathBuf>,

    /// GitHub API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", env = "COREFETCH_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds (no timeout by default)
    #[arg(long = "timeout", env = "COREFETCH_TIMEOUT", value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Do not draw progress bars
    #[arg(long = "quiet", short = 'q')]
    pub quiet: bool,
}

impl Cli {
    fn into_options(self) -> Options {
        Options {
            repo: self.repo,
            target_dir: self.target_dir,
            api_url: self.api_url,
            timeout: self.timeout.map(Duration::from_secs),
            quiet: self.quiet,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = corefetch::runtime::RealRuntime;

    application::fetch(runtime, cli.into_options()).await?;
    Ok(())
}
