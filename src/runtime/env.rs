//! Environment and system identification.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn env_var_impl(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn current_dir_impl(&self) -> Result<PathBuf> {
        env::current_dir().context("Failed to determine current working directory")
    }

    #[cfg(unix)]
    #[tracing::instrument(skip(self))]
    pub(crate) fn os_name_impl(&self) -> Result<String> {
        let uts = nix::sys::utsname::uname().context("Failed to query uname")?;
        Ok(uts.sysname().to_string_lossy().into_owned())
    }

    #[cfg(not(unix))]
    #[tracing::instrument(skip(self))]
    pub(crate) fn os_name_impl(&self) -> Result<String> {
        Ok(env::consts::OS.to_string())
    }

    #[cfg(unix)]
    #[tracing::instrument(skip(self))]
    pub(crate) fn machine_impl(&self) -> Result<String> {
        let uts = nix::sys::utsname::uname().context("Failed to query uname")?;
        Ok(uts.machine().to_string_lossy().into_owned())
    }

    #[cfg(not(unix))]
    #[tracing::instrument(skip(self))]
    pub(crate) fn machine_impl(&self) -> Result<String> {
        Ok(env::consts::ARCH.to_string())
    }
}
