//! flagprobe - compiler capability probing for C/C++ build configuration
//!
//! This crate finds out which warning, error, and threading flags the
//! current C/C++ toolchain accepts by compiling small probe programs, and
//! records the working flags in per-language, per-profile flag buckets.

pub mod builder;
pub mod capability;
pub mod core;
pub mod probe;
pub mod util;

/// Test utilities and mocks for flagprobe unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a scripted compile probe and a ready-made
/// configuration context.
#[cfg(test)]
pub mod test_support;

pub use builder::ConfigureContext;
pub use capability::{
    request, Capability, CapabilityOptions, CapabilityRequest, CapabilityStatus, ConfigureError,
};
pub use core::{FlagBucketStore, Language, LanguageSet, Profile};
pub use probe::{CompileProbe, FlagProbeEngine, ProbeOutcome};
