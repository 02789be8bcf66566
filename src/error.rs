//! Typed failures of a fetch run.
//!
//! Everything travels as `anyhow::Error`; these variants sit underneath so
//! callers can `downcast_ref::<FetchError>()` and tell the cases apart.

/// Errors that terminate a run.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The OS or architecture has no entry in the platform table
    UnsupportedPlatform { os: String, arch: String },
    /// The release endpoint answered with a non-success status
    ReleaseLookupFailed { repo: String },
    /// The latest release has no asset for this platform
    AssetNotFound {
        repo: String,
        tag: String,
        os: String,
        arch: String,
    },
    /// The download could not be started or the stream broke off
    Transfer(String),
    /// The API returned something that does not fit the expected shape
    Parse(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::UnsupportedPlatform { os, arch } => {
                write!(f, "Unsupported platform: system {} machine {}", os, arch)
            }
            FetchError::ReleaseLookupFailed { repo } => {
                write!(f, "No latest release found for {}", repo)
            }
            FetchError::AssetNotFound { repo, tag, os, arch } => {
                write!(
                    f,
                    "No .zip asset for {} {} in release {} of {}",
                    os, arch, tag, repo
                )
            }
            FetchError::Transfer(msg) => write!(f, "Transfer failed: {}", msg),
            FetchError::Parse(msg) => write!(f, "Unexpected API response: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}
