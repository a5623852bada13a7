//! Target platform identification.
//!
//! Some capability checks depend on the destination operating system
//! (thread-safety defines, vendor compiler requirements). The OS comes from
//! the configured target triple when there is one, otherwise from the host.

use std::fmt;

/// Target triple components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTriple {
    /// CPU architecture (x86_64, aarch64, etc.)
    pub arch: String,
    /// Vendor (unknown, apple, pc, etc.)
    pub vendor: String,
    /// Operating system (linux, darwin, windows, etc.)
    pub os: String,
    /// Environment/ABI (gnu, musl, msvc, etc.)
    pub env: Option<String>,
}

impl TargetTriple {
    /// Create a new target triple.
    pub fn new(arch: &str, vendor: &str, os: &str, env: Option<&str>) -> Self {
        TargetTriple {
            arch: arch.to_string(),
            vendor: vendor.to_string(),
            os: os.to_string(),
            env: env.map(|s| s.to_string()),
        }
    }

    /// Detect the host target triple.
    pub fn host() -> Self {
        let arch = std::env::consts::ARCH;
        let os = std::env::consts::OS;

        let (vendor, env) = match os {
            "linux" => ("unknown", Some("gnu")),
            "macos" => ("apple", None),
            "windows" => ("pc", Some("msvc")),
            _ => ("unknown", None),
        };

        TargetTriple::new(arch, vendor, os, env)
    }

    /// Parse a target triple string.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        if parts.len() < 3 || parts.iter().any(|p| p.is_empty()) {
            return None;
        }

        Some(TargetTriple {
            arch: parts[0].to_string(),
            vendor: parts[1].to_string(),
            os: parts[2].to_string(),
            env: parts.get(3).map(|s| s.to_string()),
        })
    }
}

impl fmt::Display for TargetTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.env {
            Some(env) => write!(f, "{}-{}-{}-{}", self.arch, self.vendor, self.os, env),
            None => write!(f, "{}-{}-{}", self.arch, self.vendor, self.os),
        }
    }
}

/// Destination operating system, as far as capability checks care.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestOs {
    Linux,
    Darwin,
    FreeBsd,
    Aix,
    SunOs,
    HpUx,
    Windows,
    Other(String),
}

impl DestOs {
    /// Classify an OS name as it appears in a triple or `std::env::consts::OS`.
    ///
    /// Versioned names such as `solaris2.10` or `hpux11` are matched by prefix.
    pub fn from_os_name(name: &str) -> DestOs {
        let name = name.trim().to_ascii_lowercase();
        let starts = |prefix: &str| name.starts_with(prefix);

        if starts("linux") {
            DestOs::Linux
        } else if starts("darwin") || starts("macos") || starts("macosx") {
            DestOs::Darwin
        } else if starts("freebsd") {
            DestOs::FreeBsd
        } else if starts("aix") {
            DestOs::Aix
        } else if starts("solaris") || starts("sunos") || starts("illumos") {
            DestOs::SunOs
        } else if starts("hpux") {
            DestOs::HpUx
        } else if starts("windows") || starts("win32") || starts("mingw") || starts("cygwin") {
            DestOs::Windows
        } else {
            DestOs::Other(name)
        }
    }

    /// Classify the OS of a target triple.
    ///
    /// Three-component triples without a vendor (`x86_64-linux-gnu`) carry the
    /// OS in the vendor slot, so that slot is consulted when the OS slot is
    /// not recognized.
    pub fn from_triple(triple: &TargetTriple) -> DestOs {
        match DestOs::from_os_name(&triple.os) {
            DestOs::Other(_) => match DestOs::from_os_name(&triple.vendor) {
                DestOs::Other(_) => DestOs::from_os_name(&triple.os),
                os => os,
            },
            os => os,
        }
    }

    /// Destination OS of the host.
    pub fn host() -> DestOs {
        DestOs::from_os_name(std::env::consts::OS)
    }

    pub fn as_str(&self) -> &str {
        match self {
            DestOs::Linux => "linux",
            DestOs::Darwin => "darwin",
            DestOs::FreeBsd => "freebsd",
            DestOs::Aix => "aix",
            DestOs::SunOs => "sunos",
            DestOs::HpUx => "hpux",
            DestOs::Windows => "win32",
            DestOs::Other(name) => name,
        }
    }
}

impl fmt::Display for DestOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
