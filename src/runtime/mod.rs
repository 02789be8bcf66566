//! Runtime abstraction for system operations.
//!
//! Everything that touches the host (environment, system identification and
//! the file system) goes through [`Runtime`], so the fetch steps can be
//! exercised against a [`MockRuntime`] in tests.
//!
//! # Structure
//!
//! - `env` - Environment variables, working directory and `uname` data
//! - `fs` - File system operations (create, open, remove, permissions)

mod env;
mod fs;

use anyhow::Result;
use std::env as std_env;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

/// A readable, seekable handle; what zip archives need to be opened.
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;
    fn current_dir(&self) -> Result<PathBuf>;

    /// Operating system name as the host reports it (e.g. `Linux`, `Darwin`).
    fn os_name(&self) -> Result<String>;

    /// Machine hardware name as the host reports it (e.g. `x86_64`, `arm64`).
    fn machine(&self) -> Result<String>;

    // File System
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>>;
    fn open(&self, path: &Path) -> Result<Box<dyn ReadSeek>>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;

    /// Set file permissions (mode) on Unix systems. No-op elsewhere.
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn current_dir(&self) -> Result<PathBuf> {
        self.current_dir_impl()
    }

    fn os_name(&self) -> Result<String> {
        self.os_name_impl()
    }

    fn machine(&self) -> Result<String> {
        self.machine_impl()
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>> {
        self.create_file_impl(path)
    }

    fn open(&self, path: &Path) -> Result<Box<dyn ReadSeek>> {
        self.open_impl(path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.remove_file_impl(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()> {
        self.set_permissions_impl(path, mode)
    }
}
