//! Configure context - probe backend, flag buckets, and target information.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::probe::ToolchainProbe;
use crate::builder::toolchain::detect_toolchain;
use crate::core::bucket::FlagBucketStore;
use crate::core::family::CompilerIds;
use crate::core::language::Language;
use crate::core::platform::{DestOs, TargetTriple};
use crate::probe::{CompileProbe, FlagProbeEngine};
use crate::util::config::load_toolchain_config_for;
use crate::util::process::find_executable;
use crate::util::shell::Shell;

/// Thread flags supplied by the user through the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PthreadEnv {
    /// `PTHREAD_CFLAGS`
    pub cflags: Option<String>,
    /// `PTHREAD_LIBS`
    pub libs: Option<String>,
}

impl PthreadEnv {
    /// Read `PTHREAD_CFLAGS` and `PTHREAD_LIBS`, ignoring empty values.
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        PthreadEnv {
            cflags: read("PTHREAD_CFLAGS"),
            libs: read("PTHREAD_LIBS"),
        }
    }

    pub fn is_set(&self) -> bool {
        self.cflags.is_some() || self.libs.is_some()
    }
}

/// Everything a capability request reads and writes.
///
/// The context owns the flag buckets; requests mutate them through
/// [`ConfigureContext::engine`] and callers read them back afterwards.
pub struct ConfigureContext {
    shell: Shell,
    probe: Box<dyn CompileProbe>,
    buckets: FlagBucketStore,
    compilers: CompilerIds,
    dest_os: DestOs,
    c_program: Option<String>,
    pthread_env: PthreadEnv,
    pthread_config: Option<PathBuf>,
}

impl fmt::Debug for ConfigureContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigureContext")
            .field("buckets", &self.buckets)
            .field("compilers", &self.compilers)
            .field("dest_os", &self.dest_os)
            .field("c_program", &self.c_program)
            .field("pthread_env", &self.pthread_env)
            .field("pthread_config", &self.pthread_config)
            .finish()
    }
}

impl ConfigureContext {
    /// Context around an arbitrary probe, targeting the host with empty buckets.
    pub fn new(probe: Box<dyn CompileProbe>) -> Self {
        ConfigureContext {
            shell: Shell::default(),
            probe,
            buckets: FlagBucketStore::new(),
            compilers: CompilerIds::new(),
            dest_os: DestOs::host(),
            c_program: None,
            pthread_env: PthreadEnv::default(),
            pthread_config: None,
        }
    }

    /// Create a context for the toolchain that applies to `project_root`.
    ///
    /// Loads the toolchain config, detects the compiler, and reads the
    /// pthread environment overrides.
    pub fn from_environment(
        project_root: &Path,
        shell: Shell,
        buckets: FlagBucketStore,
    ) -> Result<Self> {
        let config = load_toolchain_config_for(project_root);
        let toolchain = detect_toolchain(&config)?;
        let settings = &config.toolchain;

        let platform_id = toolchain.platform().as_str();
        let compilers = CompilerIds::new()
            .with(
                Language::C,
                settings.cc_id.as_deref().unwrap_or(platform_id),
            )
            .with(
                Language::Cxx,
                settings.cxx_id.as_deref().unwrap_or(platform_id),
            );

        let dest_os = match settings.target.as_deref() {
            Some(target) => match TargetTriple::parse(target) {
                Some(triple) => DestOs::from_triple(&triple),
                None => {
                    tracing::warn!("ignoring malformed target triple `{}`", target);
                    DestOs::host()
                }
            },
            None => DestOs::host(),
        };

        let c_program = toolchain
            .compiler_path()
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string);

        tracing::debug!(
            "configuring with {} ({}) for {}",
            toolchain.compiler_path().display(),
            platform_id,
            dest_os
        );

        let probe = ToolchainProbe::new(toolchain)?;

        Ok(ConfigureContext::new(Box::new(probe))
            .with_shell(shell)
            .with_buckets(buckets)
            .with_compilers(compilers)
            .with_dest_os(dest_os)
            .with_c_program(c_program)
            .with_pthread_env(PthreadEnv::from_env())
            .with_pthread_config(find_executable("pthread-config")))
    }

    pub fn with_shell(mut self, shell: Shell) -> Self {
        self.shell = shell;
        self
    }

    pub fn with_buckets(mut self, buckets: FlagBucketStore) -> Self {
        self.buckets = buckets;
        self
    }

    pub fn with_compilers(mut self, compilers: CompilerIds) -> Self {
        self.compilers = compilers;
        self
    }

    pub fn with_dest_os(mut self, dest_os: DestOs) -> Self {
        self.dest_os = dest_os;
        self
    }

    /// Name of the C compiler program (`gcc`, `xlc_r`, ...).
    pub fn with_c_program(mut self, program: Option<String>) -> Self {
        self.c_program = program;
        self
    }

    pub fn with_pthread_env(mut self, env: PthreadEnv) -> Self {
        self.pthread_env = env;
        self
    }

    pub fn with_pthread_config(mut self, path: Option<PathBuf>) -> Self {
        self.pthread_config = path;
        self
    }

    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    pub fn buckets(&self) -> &FlagBucketStore {
        &self.buckets
    }

    pub fn buckets_mut(&mut self) -> &mut FlagBucketStore {
        &mut self.buckets
    }

    pub fn into_buckets(self) -> FlagBucketStore {
        self.buckets
    }

    pub fn dest_os(&self) -> &DestOs {
        &self.dest_os
    }

    pub fn c_program(&self) -> Option<&str> {
        self.c_program.as_deref()
    }

    pub fn pthread_env(&self) -> &PthreadEnv {
        &self.pthread_env
    }

    pub fn pthread_config(&self) -> Option<&Path> {
        self.pthread_config.as_deref()
    }

    /// Probe engine over this context's probe and buckets.
    pub fn engine(&mut self) -> FlagProbeEngine<'_> {
        FlagProbeEngine::new(self.probe.as_mut(), &mut self.buckets, &self.compilers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bucket::{BucketKey, Profile};
    use crate::core::language::LanguageSet;
    use crate::probe::{Candidate, ProbeOutcome, ProbeSpec};
    use crate::test_support::{mock_context, MockProbe};

    #[test]
    fn test_engine_writes_context_buckets() {
        let probe = MockProbe::accepting(&["-Wall"]);
        let mut ctx = mock_context(&probe, CompilerIds::new().with(Language::C, "gcc"));
        let candidates = Candidate::compile_list(["-Wall"]);
        let languages = LanguageSet::from_languages([Language::C]);
        let profile = Profile::unnamed();

        let outcome = ctx
            .engine()
            .run(&ProbeSpec::new(&candidates, &languages, &profile));

        assert_eq!(outcome, ProbeOutcome::Yes);
        let key = BucketKey::compile(Language::C, &profile);
        assert_eq!(ctx.buckets().get(&key), ["-Wall"]);
        assert_eq!(ctx.into_buckets().get(&key), ["-Wall"]);
    }

    #[test]
    fn test_context_defaults() {
        let probe = MockProbe::accepting_all();
        let ctx = mock_context(&probe, CompilerIds::new());
        assert!(ctx.buckets().is_empty());
        assert_eq!(ctx.dest_os(), &DestOs::host());
        assert!(ctx.c_program().is_none());
        assert!(!ctx.pthread_env().is_set());
        assert!(ctx.pthread_config().is_none());
    }

    #[test]
    fn test_pthread_env_is_set() {
        let env = PthreadEnv {
            cflags: None,
            libs: Some("-lpthread".to_string()),
        };
        assert!(env.is_set());
        assert!(!PthreadEnv::default().is_set());
    }
}
