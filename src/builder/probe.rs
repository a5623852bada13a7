//! Compile probe backed by a real toolchain.

use std::fmt;

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::builder::toolchain::{ProbeInput, Toolchain};
use crate::probe::{CompileProbe, ProbeRequest};
use crate::util::process::ProcessBuilder;

/// Builds probe programs with the detected compiler driver.
///
/// Every probe gets its own numbered source and output file inside a scratch
/// directory that lives as long as the probe.
pub struct ToolchainProbe {
    toolchain: Box<dyn Toolchain>,
    scratch: TempDir,
    counter: usize,
}

impl fmt::Debug for ToolchainProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolchainProbe")
            .field("toolchain", &self.toolchain.platform())
            .field("scratch", &self.scratch.path())
            .field("counter", &self.counter)
            .finish()
    }
}

impl ToolchainProbe {
    pub fn new(toolchain: Box<dyn Toolchain>) -> Result<Self> {
        let scratch = tempfile::Builder::new()
            .prefix("flagprobe-")
            .tempdir()
            .context("failed to create probe directory")?;

        Ok(ToolchainProbe {
            toolchain,
            scratch,
            counter: 0,
        })
    }

    /// Write the fragment and describe the build of probe number `n`.
    fn prepare(&self, request: &ProbeRequest<'_>, n: usize) -> Result<ProbeInput> {
        let source = self.scratch.path().join(format!(
            "probe{}.{}",
            n,
            request.language.source_extension()
        ));
        std::fs::write(&source, request.fragment)
            .with_context(|| format!("failed to write {}", source.display()))?;

        let extension = if request.link {
            self.toolchain.exe_extension()
        } else {
            self.toolchain.object_extension()
        };
        let mut output = self.scratch.path().join(format!("probe{}", n));
        if !extension.is_empty() {
            output.set_extension(extension);
        }

        Ok(ProbeInput {
            source,
            output,
            compile_args: request.compile_args(),
            link_args: if request.link {
                request.link_args()
            } else {
                Vec::new()
            },
            link: request.link,
        })
    }

    fn run(&mut self, request: &ProbeRequest<'_>) -> Result<bool> {
        self.counter += 1;
        let input = self.prepare(request, self.counter)?;
        let spec = self.toolchain.probe_command(&input, request.language);

        let process = ProcessBuilder::new(&spec.program)
            .args(&spec.args)
            .cwd(self.scratch.path());
        tracing::debug!("probe: {}", process.display_command());

        let output = process.exec()?;
        if !output.status.success() {
            tracing::debug!(
                "probe failed with exit code {:?}\n{}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim_end()
            );
        }
        Ok(output.status.success())
    }
}

impl CompileProbe for ToolchainProbe {
    fn compile(&mut self, request: &ProbeRequest<'_>) -> bool {
        match self.run(request) {
            Ok(ok) => ok,
            Err(e) => {
                tracing::debug!("probe could not run: {:#}", e);
                false
            }
        }
    }
}
