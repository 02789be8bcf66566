use std::collections::HashMap;

use super::PlatformKey;
use crate::error::FetchError;

/// Immutable mapping from host-reported names to release-filename tokens.
#[derive(Debug, Clone)]
pub struct PlatformTable {
    os: HashMap<String, String>,
    arch: HashMap<String, String>,
}

impl PlatformTable {
    pub fn new<O, A, K, V>(os: O, arch: A) -> Self
    where
        O: IntoIterator<Item = (K, V)>,
        A: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            os: os.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            arch: arch.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Map an OS name and machine name to a [`PlatformKey`].
    ///
    /// Keys are matched exactly; both `uname` spellings (`Darwin`, `arm64`)
    /// and Rust target spellings (`macos`, `aarch64`) are listed in the
    /// default table.
    pub fn lookup(&self, os_name: &str, machine: &str) -> Result<PlatformKey, FetchError> {
        match (self.os.get(os_name), self.arch.get(machine)) {
            (Some(os), Some(arch)) => Ok(PlatformKey {
                os: os.clone(),
                arch: arch.clone(),
            }),
            _ => Err(FetchError::UnsupportedPlatform {
                os: os_name.to_string(),
                arch: machine.to_string(),
            }),
        }
    }
}

impl Default for PlatformTable {
    /// Vocabulary of v2ray-style asset names (`v2ray-linux-64.zip`,
    /// `v2ray-macos-arm64-v8a.zip`).
    fn default() -> Self {
        Self::new(
            [
                ("Darwin", "macos"),
                ("macos", "macos"),
                ("Linux", "linux"),
                ("linux", "linux"),
                ("Windows", "windows"),
                ("windows", "windows"),
            ],
            [
                ("arm64", "arm64"),
                ("aarch64", "arm64"),
                ("x86_64", "64"),
                ("amd64", "64"),
                ("AMD64", "64"),
            ],
        )
    }
}
