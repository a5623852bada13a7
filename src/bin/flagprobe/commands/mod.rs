//! Command implementations

pub mod check;
pub mod completions;
pub mod configure;
pub mod flags;
pub mod toolchain;
