//! Compiler backend for capability probing.
//!
//! This module detects the native C/C++ toolchain and drives it to build
//! probe programs.

pub mod context;
pub mod probe;
pub mod toolchain;

pub use context::{ConfigureContext, PthreadEnv};
pub use probe::ToolchainProbe;
pub use toolchain::{
    detect_compiler_family, detect_toolchain, CommandSpec, GccToolchain, MsvcToolchain,
    ProbeInput, Toolchain, ToolchainPlatform,
};
