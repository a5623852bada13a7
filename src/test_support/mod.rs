//! Test utilities and mocks for flagprobe unit tests.
//!
//! [`MockProbe`] stands in for a real compiler: it decides each probe with a
//! scripted rule and records every request it sees, so tests can assert both
//! on outcomes and on which flags reached the "compiler".
//!
//! # Example
//!
//! ```rust,ignore
//! use flagprobe::test_support::MockProbe;
//!
//! let mut probe = MockProbe::accepting(&["-Wall"]);
//! // run an engine or a capability against `probe`...
//! assert_eq!(probe.calls().len(), 1);
//! ```

use std::sync::{Arc, Mutex};

use crate::builder::context::ConfigureContext;
use crate::core::family::CompilerIds;
use crate::core::language::Language;
use crate::probe::{CompileProbe, ProbeRequest};
use crate::util::shell::{ColorChoice, Shell};

/// A probe request as seen by [`MockProbe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedProbe {
    pub fragment: String,
    pub language: Language,
    pub compile_flags: Vec<String>,
    pub link_flags: Vec<String>,
    pub link: bool,
}

impl RecordedProbe {
    /// Whether an entry equal to `flag` was passed as compile or link flag.
    pub fn has_flag(&self, flag: &str) -> bool {
        self.compile_flags.iter().chain(&self.link_flags).any(|f| f == flag)
    }
}

type Rule = Box<dyn FnMut(&ProbeRequest<'_>) -> bool>;

/// Scripted [`CompileProbe`].
///
/// The call log is shared between clones, so a test can hand one clone to a
/// [`ConfigureContext`] and inspect the log through another.
#[derive(Clone)]
pub struct MockProbe {
    rule: Arc<Mutex<Rule>>,
    calls: Arc<Mutex<Vec<RecordedProbe>>>,
}

impl MockProbe {
    /// Probe decided by an arbitrary rule.
    pub fn with_rule(rule: impl FnMut(&ProbeRequest<'_>) -> bool + 'static) -> Self {
        MockProbe {
            rule: Arc::new(Mutex::new(Box::new(rule))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Succeeds when every flag entry of the request is in `accepted`.
    ///
    /// A request without flags always succeeds.
    pub fn accepting(accepted: &[&str]) -> Self {
        let accepted: Vec<String> = accepted.iter().map(|s| s.to_string()).collect();
        MockProbe::with_rule(move |req| {
            req.compile_flags
                .iter()
                .chain(req.link_flags)
                .all(|flag| accepted.contains(flag))
        })
    }

    pub fn accepting_all() -> Self {
        MockProbe::with_rule(|_| true)
    }

    pub fn rejecting_all() -> Self {
        MockProbe::with_rule(|_| false)
    }

    /// Every request seen so far.
    pub fn calls(&self) -> Vec<RecordedProbe> {
        self.calls.lock().unwrap().clone()
    }
}

impl CompileProbe for MockProbe {
    fn compile(&mut self, request: &ProbeRequest<'_>) -> bool {
        self.calls.lock().unwrap().push(RecordedProbe {
            fragment: request.fragment.to_string(),
            language: request.language,
            compile_flags: request.compile_flags.to_vec(),
            link_flags: request.link_flags.to_vec(),
            link: request.link,
        });
        let mut rule = self.rule.lock().unwrap();
        (*rule)(request)
    }
}

/// Shell that prints nothing.
pub fn quiet_shell() -> Shell {
    Shell::from_flags(true, false, ColorChoice::Never, false)
}

/// Configuration context backed by `probe`, with a quiet shell.
pub fn mock_context(probe: &MockProbe, compilers: CompilerIds) -> ConfigureContext {
    ConfigureContext::new(Box::new(probe.clone()))
        .with_shell(quiet_shell())
        .with_compilers(compilers)
}
