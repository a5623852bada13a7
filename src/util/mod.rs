//! Shared utilities

pub mod config;
pub mod process;
pub mod shell;

pub use config::{RequestsFile, ToolchainConfig};
pub use shell::Shell;
