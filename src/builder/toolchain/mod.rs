//! Toolchain abstraction for C/C++ compilers.
//!
//! This module provides a unified interface for generating probe commands
//! across different toolchains (GCC, Clang, MSVC).
//!
//! Toolchain detection priority:
//! 1. Toolchain config file (`.flagprobe/toolchain.toml` or `~/.flagprobe/toolchain.toml`)
//! 2. Environment variables (CC, CXX)
//! 3. Auto-detection (searching PATH for common compilers)

use std::path::{Path, PathBuf};

use crate::core::language::Language;

mod detect;
mod gcc;
mod msvc;

pub use detect::{detect_compiler_family, detect_toolchain};
pub use gcc::GccToolchain;
pub use msvc::MsvcToolchain;

/// A command to execute, with program and arguments.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// The program to run (e.g., "gcc", "cl.exe")
    pub program: PathBuf,
    /// Command arguments
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }
}

/// Input for a single probe build.
#[derive(Debug, Clone)]
pub struct ProbeInput {
    /// Probe source file
    pub source: PathBuf,
    /// Output object file or executable
    pub output: PathBuf,
    /// Preprocessor and compiler arguments
    pub compile_args: Vec<String>,
    /// Linker arguments (only used when linking)
    pub link_args: Vec<String>,
    /// Link an executable instead of stopping after compilation
    pub link: bool,
}

/// The platform/family of a toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolchainPlatform {
    /// GCC (GNU Compiler Collection)
    Gcc,
    /// Clang/LLVM
    Clang,
    /// Apple Clang (macOS)
    AppleClang,
    /// Microsoft Visual C++
    Msvc,
}

impl ToolchainPlatform {
    /// Compiler identifier recorded for languages built by this toolchain.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolchainPlatform::Gcc => "gcc",
            ToolchainPlatform::Clang => "clang",
            ToolchainPlatform::AppleClang => "apple-clang",
            ToolchainPlatform::Msvc => "msvc",
        }
    }
}

/// Trait for toolchain implementations.
///
/// Each toolchain knows how to spell a probe build for its compiler driver.
pub trait Toolchain: Send + Sync {
    fn platform(&self) -> ToolchainPlatform;

    /// Get the C compiler path.
    fn compiler_path(&self) -> &Path;

    /// Get the C++ compiler path.
    fn cxx_compiler_path(&self) -> &Path;

    /// Compiler driver for a language.
    fn driver(&self, lang: Language) -> &Path {
        match lang {
            Language::C => self.compiler_path(),
            Language::Cxx => self.cxx_compiler_path(),
        }
    }

    /// Generate the command that builds a probe in one driver invocation.
    fn probe_command(&self, input: &ProbeInput, lang: Language) -> CommandSpec;

    /// Get the object file extension.
    fn object_extension(&self) -> &str;

    /// Get the executable extension.
    fn exe_extension(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(link: bool) -> ProbeInput {
        ProbeInput {
            source: PathBuf::from("probe1.c"),
            output: PathBuf::from(if link { "probe1" } else { "probe1.o" }),
            compile_args: vec!["-DX=1".to_string(), "-Wall".to_string()],
            link_args: vec!["-lpthread".to_string()],
            link,
        }
    }

    fn gcc() -> GccToolchain {
        GccToolchain::new(
            PathBuf::from("gcc"),
            PathBuf::from("g++"),
            ToolchainPlatform::Gcc,
        )
    }

    fn msvc() -> MsvcToolchain {
        MsvcToolchain::new(PathBuf::from("cl"))
    }

    #[test]
    fn test_gcc_compile_only_probe() {
        let cmd = gcc().probe_command(&input(false), Language::C);
        assert_eq!(cmd.program, PathBuf::from("gcc"));
        assert_eq!(cmd.args, ["-c", "-DX=1", "-Wall", "probe1.c", "-o", "probe1.o"]);
    }

    #[test]
    fn test_gcc_link_probe_puts_libs_last() {
        let cmd = gcc().probe_command(&input(true), Language::Cxx);
        assert_eq!(cmd.program, PathBuf::from("g++"));
        assert_eq!(
            cmd.args,
            ["-DX=1", "-Wall", "probe1.c", "-o", "probe1", "-lpthread"]
        );
    }

    #[test]
    fn test_msvc_compile_only_probe() {
        let cmd = msvc().probe_command(&input(false), Language::C);
        assert_eq!(cmd.program, PathBuf::from("cl"));
        assert_eq!(
            cmd.args,
            ["/nologo", "/c", "-DX=1", "-Wall", "probe1.c", "/Foprobe1.o"]
        );
    }

    #[test]
    fn test_msvc_link_probe() {
        let cmd = msvc().probe_command(&input(true), Language::Cxx);
        assert_eq!(
            cmd.args,
            [
                "/nologo",
                "/TP",
                "-DX=1",
                "-Wall",
                "probe1.c",
                "/Feprobe1",
                "/link",
                "-lpthread"
            ]
        );
    }

    #[test]
    fn test_driver_per_language() {
        let tc = gcc();
        assert_eq!(tc.driver(Language::C), Path::new("gcc"));
        assert_eq!(tc.driver(Language::Cxx), Path::new("g++"));
        assert_eq!(msvc().driver(Language::Cxx), Path::new("cl"));
    }

    #[test]
    fn test_infer_cxx() {
        assert_eq!(GccToolchain::infer_cxx(Path::new("gcc")), PathBuf::from("g++"));
        assert_eq!(
            GccToolchain::infer_cxx(Path::new("x86_64-linux-gnu-gcc")),
            PathBuf::from("x86_64-linux-gnu-g++")
        );
        assert_eq!(GccToolchain::infer_cxx(Path::new("clang")), PathBuf::from("clang++"));
        assert_eq!(
            GccToolchain::infer_cxx(Path::new("/usr/bin/cc")),
            PathBuf::from("/usr/bin/c++")
        );
        assert_eq!(GccToolchain::infer_cxx(Path::new("xlc_r")), PathBuf::from("xlc_r++"));
    }
}
