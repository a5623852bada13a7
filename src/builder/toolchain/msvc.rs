//! MSVC toolchain implementation.

use std::path::{Path, PathBuf};

use crate::core::language::Language;

use super::{CommandSpec, ProbeInput, Toolchain, ToolchainPlatform};

/// MSVC toolchain (Windows). `cl.exe` compiles and drives the linker.
#[derive(Debug, Clone)]
pub struct MsvcToolchain {
    /// Path to cl.exe
    pub cl: PathBuf,
}

impl MsvcToolchain {
    pub fn new(cl: PathBuf) -> Self {
        MsvcToolchain { cl }
    }
}

impl Toolchain for MsvcToolchain {
    fn platform(&self) -> ToolchainPlatform {
        ToolchainPlatform::Msvc
    }

    fn compiler_path(&self) -> &Path {
        &self.cl
    }

    fn cxx_compiler_path(&self) -> &Path {
        // MSVC uses the same cl.exe for both C and C++
        &self.cl
    }

    fn probe_command(&self, input: &ProbeInput, lang: Language) -> CommandSpec {
        let mut cmd = CommandSpec::new(&self.cl).arg("/nologo");

        if lang == Language::Cxx {
            // Force C++ compilation
            cmd = cmd.arg("/TP");
        }

        if !input.link {
            cmd = cmd.arg("/c");
        }

        cmd = cmd.args(input.compile_args.iter().cloned());
        cmd = cmd.arg(input.source.display().to_string());

        if input.link {
            cmd = cmd.arg(format!("/Fe{}", input.output.display()));
            if !input.link_args.is_empty() {
                cmd = cmd.arg("/link");
                cmd = cmd.args(input.link_args.iter().cloned());
            }
        } else {
            cmd = cmd.arg(format!("/Fo{}", input.output.display()));
        }

        cmd
    }

    fn object_extension(&self) -> &str {
        "obj"
    }

    fn exe_extension(&self) -> &str {
        "exe"
    }
}
