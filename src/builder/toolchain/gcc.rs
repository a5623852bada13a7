//! GCC/Clang toolchain implementation.

use std::path::{Path, PathBuf};

use crate::core::language::Language;

use super::{CommandSpec, ProbeInput, Toolchain, ToolchainPlatform};

/// GCC-style driver (gcc, clang, and vendor `cc` compatibles).
#[derive(Debug, Clone)]
pub struct GccToolchain {
    /// Path to the C compiler
    pub cc: PathBuf,
    /// Path to the C++ compiler
    pub cxx: PathBuf,
    /// Compiler family (gcc, clang, apple-clang)
    pub family: ToolchainPlatform,
}

impl GccToolchain {
    pub fn new(cc: PathBuf, cxx: PathBuf, family: ToolchainPlatform) -> Self {
        GccToolchain { cc, cxx, family }
    }

    /// Infer C++ compiler path from C compiler path.
    ///
    /// Handles common patterns:
    /// - gcc, x86_64-linux-gnu-gcc -> g++, x86_64-linux-gnu-g++
    /// - clang -> clang++
    /// - cc, /usr/bin/cc -> c++, /usr/bin/c++
    pub fn infer_cxx(cc: &Path) -> PathBuf {
        let cc_str = cc.to_string_lossy();

        if let Some(prefix) = cc_str.strip_suffix("gcc") {
            return PathBuf::from(format!("{}g++", prefix));
        }

        if cc_str.ends_with("clang") {
            return PathBuf::from(format!("{}++", cc_str));
        }

        // Only a complete "cc" basename, not "mycc"
        let is_standalone_cc = cc_str == "cc"
            || cc_str.ends_with("/cc")
            || cc_str.ends_with("\\cc")
            || cc_str.ends_with("-cc");

        if is_standalone_cc {
            return PathBuf::from(format!("{}++", &cc_str[..cc_str.len() - 1]));
        }

        PathBuf::from(format!("{}++", cc_str))
    }
}

impl Toolchain for GccToolchain {
    fn platform(&self) -> ToolchainPlatform {
        self.family
    }

    fn compiler_path(&self) -> &Path {
        &self.cc
    }

    fn cxx_compiler_path(&self) -> &Path {
        &self.cxx
    }

    fn probe_command(&self, input: &ProbeInput, lang: Language) -> CommandSpec {
        let mut cmd = CommandSpec::new(self.driver(lang));

        if !input.link {
            cmd = cmd.arg("-c");
        }

        cmd = cmd.args(input.compile_args.iter().cloned());
        cmd = cmd.arg(input.source.display().to_string());
        cmd = cmd.arg("-o");
        cmd = cmd.arg(input.output.display().to_string());

        // Libraries must follow the objects that reference them
        if input.link {
            cmd = cmd.args(input.link_args.iter().cloned());
        }

        cmd
    }

    fn object_extension(&self) -> &str {
        "o"
    }

    fn exe_extension(&self) -> &str {
        ""
    }
}
