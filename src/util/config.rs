//! Configuration file support for flagprobe.
//!
//! Toolchain overrides live in two locations:
//! - Global: `~/.flagprobe/toolchain.toml` - User-wide defaults
//! - Project: `.flagprobe/toolchain.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.
//!
//! Capability requests for `flagprobe configure` are read from
//! `.flagprobe/requests.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::capability::CapabilityRequest;

/// Name of the per-project configuration directory.
pub const PROJECT_DIR: &str = ".flagprobe";

/// Toolchain configuration for compiler overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    pub toolchain: ToolchainSettings,
}

/// Toolchain settings for C/C++ probing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Path to the C compiler (e.g., /usr/bin/clang)
    pub cc: Option<PathBuf>,

    /// Path to the C++ compiler (e.g., /usr/bin/clang++)
    pub cxx: Option<PathBuf>,

    /// Compiler identifier recorded for C (e.g., "gcc", "msvc")
    pub cc_id: Option<String>,

    /// Compiler identifier recorded for C++
    pub cxx_id: Option<String>,

    /// Target triple for cross-compilation (e.g., powerpc-ibm-aix7.2)
    pub target: Option<String>,
}

impl ToolchainConfig {
    /// Load toolchain configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read toolchain config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse toolchain config: {}", path.display()))
    }

    /// Load toolchain configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!(
                    "Failed to load toolchain config from {}: {:#}",
                    path.display(),
                    e
                );
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: ToolchainConfig) {
        let other = other.toolchain;
        let tc = &mut self.toolchain;
        if other.cc.is_some() {
            tc.cc = other.cc;
        }
        if other.cxx.is_some() {
            tc.cxx = other.cxx;
        }
        if other.cc_id.is_some() {
            tc.cc_id = other.cc_id;
        }
        if other.cxx_id.is_some() {
            tc.cxx_id = other.cxx_id;
        }
        if other.target.is_some() {
            tc.target = other.target;
        }
    }
}

/// Load merged toolchain configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.flagprobe/toolchain.toml)
/// 2. Global config (~/.flagprobe/toolchain.toml)
/// 3. Defaults
pub fn load_toolchain_config(global_path: Option<&Path>, project_path: &Path) -> ToolchainConfig {
    let mut config = ToolchainConfig::default();

    if let Some(global) = global_path {
        config.merge(ToolchainConfig::load_or_default(global));
    }

    config.merge(ToolchainConfig::load_or_default(project_path));

    config
}

/// Load the toolchain configuration that applies to `project_root`.
pub fn load_toolchain_config_for(project_root: &Path) -> ToolchainConfig {
    let global = global_toolchain_config_path();
    load_toolchain_config(global.as_deref(), &project_toolchain_config_path(project_root))
}

/// Get the global config directory (~/.flagprobe).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(PROJECT_DIR))
}

/// Get the global toolchain config path (~/.flagprobe/toolchain.toml).
pub fn global_toolchain_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("toolchain.toml"))
}

/// Get the project toolchain config path (.flagprobe/toolchain.toml).
pub fn project_toolchain_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR).join("toolchain.toml")
}

/// Default location of the capability request list.
pub fn project_requests_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR).join("requests.toml")
}

/// Default location of the persisted flag buckets.
pub fn project_state_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR).join("flags.toml")
}

/// Capability requests run by `flagprobe configure`.
///
/// ```toml
/// [[request]]
/// capability = "warn-all"
/// error = true
///
/// [[request]]
/// capability = "pthread"
/// lang = "c"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestsFile {
    #[serde(rename = "request")]
    pub requests: Vec<CapabilityRequest>,
}

impl RequestsFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read requests file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse requests file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capability;
    use crate::core::language::LangSelector;
    use tempfile::TempDir;

    #[test]
    fn test_toolchain_config_default() {
        let config = ToolchainConfig::default();
        assert!(config.toolchain.cc.is_none());
        assert!(config.toolchain.cc_id.is_none());
        assert!(config.toolchain.target.is_none());
    }

    #[test]
    fn test_toolchain_config_load() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("toolchain.toml");

        std::fs::write(
            &config_path,
            r#"
[toolchain]
cc = "/opt/vc/bin/cl.exe"
cc_id = "msvc2008"
target = "i686-pc-windows-msvc"
"#,
        )
        .unwrap();

        let config = ToolchainConfig::load(&config_path).unwrap();
        assert_eq!(
            config.toolchain.cc,
            Some(PathBuf::from("/opt/vc/bin/cl.exe"))
        );
        assert_eq!(config.toolchain.cc_id.as_deref(), Some("msvc2008"));
        assert_eq!(
            config.toolchain.target.as_deref(),
            Some("i686-pc-windows-msvc")
        );
        assert!(config.toolchain.cxx.is_none());
    }

    #[test]
    fn test_toolchain_config_malformed_falls_back() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("toolchain.toml");
        std::fs::write(&config_path, "[toolchain\ncc = ").unwrap();

        assert!(ToolchainConfig::load(&config_path).is_err());
        assert_eq!(
            ToolchainConfig::load_or_default(&config_path),
            ToolchainConfig::default()
        );
    }

    #[test]
    fn test_load_toolchain_config_precedence() {
        let tmp = TempDir::new().unwrap();
        let global_path = tmp.path().join("global.toml");
        let project_path = tmp.path().join("project.toml");

        std::fs::write(
            &global_path,
            r#"
[toolchain]
cc = "/usr/bin/gcc"
cc_id = "gcc"
"#,
        )
        .unwrap();

        std::fs::write(
            &project_path,
            r#"
[toolchain]
cc = "/usr/bin/clang"
"#,
        )
        .unwrap();

        let config = load_toolchain_config(Some(&global_path), &project_path);

        assert_eq!(config.toolchain.cc, Some(PathBuf::from("/usr/bin/clang")));
        assert_eq!(config.toolchain.cc_id.as_deref(), Some("gcc"));
    }

    #[test]
    fn test_requests_file_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("requests.toml");
        std::fs::write(
            &path,
            r#"
[[request]]
capability = "warn-all"
error = true

[[request]]
capability = "ignore-warning"
uselib_store = "quiet"
lang = ["c", "c++"]
flags = ["-Wno-unused-parameter", "/wd4100"]

[[request]]
capability = "pthread"
lang = "c"
"#,
        )
        .unwrap();

        let file = RequestsFile::load(&path).unwrap();
        assert_eq!(file.requests.len(), 3);

        assert_eq!(file.requests[0].capability, Capability::WarnAll);
        assert!(file.requests[0].options.error);

        let ignore = &file.requests[1];
        assert_eq!(ignore.capability, Capability::IgnoreWarning);
        assert_eq!(ignore.options.uselib_store.as_deref(), Some("quiet"));
        assert_eq!(ignore.options.flags, ["-Wno-unused-parameter", "/wd4100"]);

        assert_eq!(
            file.requests[2].options.lang,
            Some(LangSelector::One("c".to_string()))
        );
    }

    #[test]
    fn test_requests_file_rejects_unknown_capability() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("requests.toml");
        std::fs::write(&path, "[[request]]\ncapability = \"warn-everything\"\n").unwrap();

        assert!(RequestsFile::load(&path).is_err());
    }
}
