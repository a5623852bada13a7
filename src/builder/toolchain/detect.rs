//! Toolchain detection functions.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::util::config::ToolchainConfig;
use crate::util::process::{find_executable, ProcessBuilder};

use super::{GccToolchain, MsvcToolchain, Toolchain, ToolchainPlatform};

/// Detect the available toolchain.
///
/// Tries to find a C compiler with the following priority:
/// 1. Toolchain config (`cc` / `cxx` settings)
/// 2. Environment variables (CC, CXX)
/// 3. On Windows: cl.exe from a Developer Command Prompt
/// 4. cc/gcc/clang on PATH
pub fn detect_toolchain(config: &ToolchainConfig) -> Result<Box<dyn Toolchain>> {
    if let Some(toolchain) = try_detect_from_config(config)? {
        return Ok(toolchain);
    }

    if let Some(toolchain) = try_detect_from_env()? {
        return Ok(toolchain);
    }

    if let Some(toolchain) = try_detect_msvc() {
        return Ok(toolchain);
    }

    if let Some(toolchain) = try_detect_on_path()? {
        return Ok(toolchain);
    }

    bail!(
        "no C compiler found\n\
         \n\
         flagprobe requires a C compiler (gcc, clang, or cl).\n\
         Set the CC environment variable, add `cc` to .flagprobe/toolchain.toml,\n\
         or install a compiler."
    )
}

/// Build a toolchain around an explicit C compiler.
fn toolchain_for(cc: PathBuf, cxx: Option<PathBuf>) -> Result<Box<dyn Toolchain>> {
    let family = detect_compiler_family(&cc)?;

    if family == ToolchainPlatform::Msvc {
        return Ok(Box::new(MsvcToolchain::new(cc)));
    }

    let cxx = cxx.unwrap_or_else(|| GccToolchain::infer_cxx(&cc));
    Ok(Box::new(GccToolchain::new(cc, cxx, family)))
}

/// Try to create a toolchain from config file settings.
fn try_detect_from_config(config: &ToolchainConfig) -> Result<Option<Box<dyn Toolchain>>> {
    let tc = &config.toolchain;

    let Some(cc) = &tc.cc else {
        return Ok(None);
    };

    if !cc.exists() && find_executable(&cc.to_string_lossy()).is_none() {
        tracing::warn!("Configured C compiler not found: {}", cc.display());
        return Ok(None);
    }

    let cxx = tc
        .cxx
        .clone()
        .or_else(|| std::env::var("CXX").ok().map(PathBuf::from));

    tracing::info!("Using toolchain from config: cc={}", cc.display());
    toolchain_for(cc.clone(), cxx).map(Some)
}

/// Try CC/CXX from the environment.
///
/// The environment is trusted as-is; a compiler that doesn't exist simply
/// fails every probe.
fn try_detect_from_env() -> Result<Option<Box<dyn Toolchain>>> {
    let Ok(cc) = std::env::var("CC") else {
        return Ok(None);
    };
    if cc.trim().is_empty() {
        return Ok(None);
    }

    let cc = find_executable(&cc).unwrap_or_else(|| PathBuf::from(&cc));
    let cxx = std::env::var("CXX").ok().map(PathBuf::from);

    tracing::debug!("Using CC from environment: {}", cc.display());
    toolchain_for(cc, cxx).map(Some)
}

/// Try to detect MSVC from an initialized Developer Command Prompt.
#[cfg(target_os = "windows")]
fn try_detect_msvc() -> Option<Box<dyn Toolchain>> {
    let cl = find_executable("cl")?;
    if std::env::var("INCLUDE").is_err() || std::env::var("LIB").is_err() {
        tracing::debug!("cl.exe found but INCLUDE/LIB are not set");
        return None;
    }
    Some(Box::new(MsvcToolchain::new(cl)))
}

#[cfg(not(target_os = "windows"))]
fn try_detect_msvc() -> Option<Box<dyn Toolchain>> {
    None
}

/// Try common compiler names on PATH.
fn try_detect_on_path() -> Result<Option<Box<dyn Toolchain>>> {
    let Some(cc) = ["cc", "gcc", "clang"]
        .iter()
        .find_map(|name| find_executable(name))
    else {
        return Ok(None);
    };

    let cxx = ["c++", "g++", "clang++"]
        .iter()
        .find_map(|name| find_executable(name));

    toolchain_for(cc, cxx).map(Some)
}

/// Detect whether the compiler is GCC, Clang, Apple Clang, or MSVC.
pub fn detect_compiler_family(cc: &Path) -> Result<ToolchainPlatform> {
    let name = cc
        .file_stem()
        .and_then(|n| n.to_str())
        .unwrap_or("")
        .to_lowercase();

    if name == "cl" {
        return Ok(ToolchainPlatform::Msvc);
    } else if name.contains("clang") {
        return Ok(detect_clang_variant(cc));
    } else if name.contains("gcc") || name.contains("g++") {
        return Ok(ToolchainPlatform::Gcc);
    }

    // Try to detect from --version output
    if let Ok(output) = ProcessBuilder::new(cc).arg("--version").exec() {
        let stdout = String::from_utf8_lossy(&output.stdout).to_lowercase();
        if stdout.contains("clang") {
            return Ok(detect_clang_variant(cc));
        } else if stdout.contains("gcc") || stdout.contains("free software foundation") {
            return Ok(ToolchainPlatform::Gcc);
        }
    }

    // Default to GCC
    Ok(ToolchainPlatform::Gcc)
}

/// Detect if Clang is Apple Clang or regular Clang.
fn detect_clang_variant(cc: &Path) -> ToolchainPlatform {
    if let Ok(output) = ProcessBuilder::new(cc).arg("--version").exec() {
        let stdout = String::from_utf8_lossy(&output.stdout).to_lowercase();
        if stdout.contains("apple") {
            return ToolchainPlatform::AppleClang;
        }
    }

    ToolchainPlatform::Clang
}
