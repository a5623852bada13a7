//! Capability requests.
//!
//! A capability is a compiler behavior a project asks for ("emit all
//! warnings", "support POSIX threads"). Each request turns into a candidate
//! list that the probe engine walks; the working flags end up in the
//! context's buckets and the request reports a [`CapabilityStatus`].

mod errors;
mod pthread;
mod warn;

pub use errors::ConfigureError;
pub use pthread::check_pthread;
pub use warn::{decl_after_stmt, escalate_flag, ignore_warning, warn_all, warn_extra};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::builder::context::ConfigureContext;
use crate::core::language::LangSelector;
use crate::probe::ProbeOutcome;

/// Compiler behaviors that can be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    WarnAll,
    WarnExtra,
    #[serde(alias = "decl-after-statement")]
    DeclAfterStmt,
    IgnoreWarning,
    Pthread,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::WarnAll,
        Capability::WarnExtra,
        Capability::DeclAfterStmt,
        Capability::IgnoreWarning,
        Capability::Pthread,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::WarnAll => "warn-all",
            Capability::WarnExtra => "warn-extra",
            Capability::DeclAfterStmt => "decl-after-stmt",
            Capability::IgnoreWarning => "ignore-warning",
            Capability::Pthread => "pthread",
        }
    }
}

impl std::str::FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "warn-all" => Ok(Capability::WarnAll),
            "warn-extra" => Ok(Capability::WarnExtra),
            "decl-after-stmt" | "decl-after-statement" => Ok(Capability::DeclAfterStmt),
            "ignore-warning" => Ok(Capability::IgnoreWarning),
            "pthread" => Ok(Capability::Pthread),
            _ => Err(format!(
                "unknown capability '{}'; expected one of: {}",
                s,
                Capability::ALL
                    .iter()
                    .map(Capability::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options shared by every capability request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapabilityOptions {
    /// Ask for the warning to be a hard error
    pub error: bool,

    /// Profile whose buckets receive the flags (default profile if absent)
    pub uselib_store: Option<String>,

    /// Target languages (C and C++ if absent)
    pub lang: Option<LangSelector>,

    /// Caller-supplied flags (ignore-warning only)
    pub flags: Vec<String>,
}

/// One entry of a requests file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityRequest {
    pub capability: Capability,

    #[serde(flatten)]
    pub options: CapabilityOptions,
}

/// Reported result of a capability request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityStatus {
    No,
    Yes,
    Error,
}

impl CapabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityStatus::No => "no",
            CapabilityStatus::Yes => "yes",
            CapabilityStatus::Error => "error",
        }
    }

    pub fn is_available(&self) -> bool {
        *self != CapabilityStatus::No
    }
}

impl From<ProbeOutcome> for CapabilityStatus {
    fn from(outcome: ProbeOutcome) -> Self {
        match outcome {
            ProbeOutcome::NotAttempted | ProbeOutcome::No => CapabilityStatus::No,
            ProbeOutcome::Yes => CapabilityStatus::Yes,
            ProbeOutcome::ErrorEnforced => CapabilityStatus::Error,
        }
    }
}

impl fmt::Display for CapabilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run a capability request against the context.
pub fn request(
    ctx: &mut ConfigureContext,
    capability: Capability,
    options: &CapabilityOptions,
) -> Result<CapabilityStatus, ConfigureError> {
    match capability {
        Capability::WarnAll => warn_all(ctx, options),
        Capability::WarnExtra => warn_extra(ctx, options),
        Capability::DeclAfterStmt => decl_after_stmt(ctx, options),
        Capability::IgnoreWarning => ignore_warning(ctx, options),
        Capability::Pthread => check_pthread(ctx, options),
    }
}
