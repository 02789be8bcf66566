//! Platform detection
//!
//! Maps what the host reports about itself (`uname` sysname and machine) to
//! the tokens upstream release asset names use. The mapping is plain data in
//! a [`PlatformTable`] handed to [`detect`], so callers and tests can supply
//! their own vocabulary.

mod table;

use anyhow::Result;
use log::debug;

use crate::error::FetchError;
use crate::runtime::Runtime;

pub use table::PlatformTable;

/// OS and architecture tokens in release-filename vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformKey {
    pub os: String,
    pub arch: String,
}

impl std::fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// Detect the current platform and map it through `table`.
///
/// Fails with [`FetchError::UnsupportedPlatform`] if either name has no entry.
#[tracing::instrument(skip(runtime, table))]
pub fn detect<R: Runtime>(runtime: &R, table: &PlatformTable) -> Result<PlatformKey> {
    let os_name = runtime.os_name()?;
    let machine = runtime.machine()?;
    debug!("Host reports system {} machine {}", os_name, machine);

    Ok(table.lookup(&os_name, &machine)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::MockRuntime;

    fn runtime_reporting(os: &'static str, machine: &'static str) -> MockRuntime {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_os_name()
            .returning(move || Ok(os.to_string()));
        runtime
            .expect_machine()
            .returning(move || Ok(machine.to_string()));
        runtime
    }

    #[test]
    fn test_detect_supported_pairs() {
        let table = PlatformTable::default();
        let cases = [
            ("Linux", "x86_64", "linux", "64"),
            ("Linux", "aarch64", "linux", "arm64"),
            ("Darwin", "arm64", "macos", "arm64"),
            ("Darwin", "x86_64", "macos", "64"),
            ("windows", "x86_64", "windows", "64"),
        ];

        for (os, machine, want_os, want_arch) in cases {
            let runtime = runtime_reporting(os, machine);
            let key = detect(&runtime, &table).unwrap();
            assert_eq!(
                key,
                PlatformKey {
                    os: want_os.into(),
                    arch: want_arch.into()
                },
                "{} {}",
                os,
                machine
            );
        }
    }

    #[test]
    fn test_detect_unsupported_os() {
        let runtime = runtime_reporting("SunOS", "x86_64");
        let err = detect(&runtime, &PlatformTable::default()).unwrap_err();

        assert_eq!(
            err.downcast_ref::<FetchError>(),
            Some(&FetchError::UnsupportedPlatform {
                os: "SunOS".into(),
                arch: "x86_64".into()
            })
        );
    }

    #[test]
    fn test_detect_unsupported_arch() {
        let runtime = runtime_reporting("Linux", "riscv64");
        let err = detect(&runtime, &PlatformTable::default()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FetchError>(),
            Some(FetchError::UnsupportedPlatform { .. })
        ));
    }

    #[test]
    fn test_detect_uses_given_table() {
        let table = PlatformTable::new([("Linux", "lnx")], [("riscv64", "rv64")]);
        let runtime = runtime_reporting("Linux", "riscv64");

        let key = detect(&runtime, &table).unwrap();
        assert_eq!(key.os, "lnx");
        assert_eq!(key.arch, "rv64");
    }

    #[test]
    fn test_detect_propagates_runtime_failure() {
        let mut runtime = MockRuntime::new();
        runtime
            .expect_os_name()
            .returning(|| Err(anyhow::anyhow!("uname failed")));

        assert!(detect(&runtime, &PlatformTable::default()).is_err());
    }

    #[test]
    fn test_platform_key_display() {
        let key = PlatformKey {
            os: "macos".into(),
            arch: "arm64".into(),
        };
        assert_eq!(key.to_string(), "macos-arm64");
    }
}
