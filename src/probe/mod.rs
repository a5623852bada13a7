//! Flag probing.
//!
//! A probe compiles (and optionally links) a small source fragment with a
//! set of extra flags and reports whether the compiler accepted it. The
//! [`FlagProbeEngine`] walks a candidate list through a [`CompileProbe`] and
//! records the first candidate that works.

mod engine;

pub use engine::{FlagProbeEngine, ProbeSpec};

use std::fmt;

use crate::core::language::Language;

/// Fragment used when only the flags themselves are under test.
pub const FLAG_TEST_FRAGMENT: &str = "int main(void) { return 0; }\n";

/// A single compile/link attempt.
#[derive(Debug, Clone)]
pub struct ProbeRequest<'a> {
    /// Source text of the probe program
    pub fragment: &'a str,
    /// Language to compile the fragment as
    pub language: Language,
    /// Preprocessor and compiler flag entries
    pub compile_flags: &'a [String],
    /// Linker flag entries
    pub link_flags: &'a [String],
    /// Whether to link an executable or stop after compiling
    pub link: bool,
}

impl ProbeRequest<'_> {
    /// Compile flag entries expanded into individual arguments.
    ///
    /// An entry such as `"/Wall /WX"` becomes two arguments.
    pub fn compile_args(&self) -> Vec<String> {
        split_entries(self.compile_flags)
    }

    /// Link flag entries expanded into individual arguments.
    pub fn link_args(&self) -> Vec<String> {
        split_entries(self.link_flags)
    }
}

fn split_entries(entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| entry.split_whitespace())
        .map(str::to_string)
        .collect()
}

/// Something that can try to build a probe program.
///
/// Failures of any kind, including a compiler that cannot be started, are
/// reported as `false`.
pub trait CompileProbe {
    fn compile(&mut self, request: &ProbeRequest<'_>) -> bool;
}

/// One entry of a candidate list.
///
/// A candidate contributes a compile flag, a link flag, both, or nothing at
/// all (the "does it work without extra flags" candidate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub compile: Option<String>,
    pub link: Option<String>,
}

impl Candidate {
    /// Candidate that adds a compile flag.
    pub fn compile(flag: impl Into<String>) -> Self {
        Candidate {
            compile: Some(flag.into()),
            link: None,
        }
    }

    /// Candidate that adds a link flag.
    pub fn link(flag: impl Into<String>) -> Self {
        Candidate {
            compile: None,
            link: Some(flag.into()),
        }
    }

    /// Candidate that adds nothing.
    pub fn bare() -> Self {
        Candidate {
            compile: None,
            link: None,
        }
    }

    /// Candidates for a plain list of compile flags.
    pub fn compile_list<I, S>(flags: I) -> Vec<Candidate>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        flags.into_iter().map(Candidate::compile).collect()
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.compile, &self.link) {
            (Some(c), Some(l)) => write!(f, "{} {}", c, l),
            (Some(c), None) => f.write_str(c),
            (None, Some(l)) => f.write_str(l),
            (None, None) => f.write_str("(no flags)"),
        }
    }
}

/// Result of walking a candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Every candidate was filtered out before reaching the compiler
    NotAttempted,
    /// At least one probe ran and none succeeded
    No,
    /// A candidate was accepted
    Yes,
    /// A candidate was accepted and the request asked for hard errors
    ErrorEnforced,
}

impl ProbeOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, ProbeOutcome::Yes | ProbeOutcome::ErrorEnforced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_split_into_arguments() {
        let compile = vec!["/Wall /WX".to_string(), "-DX=1".to_string()];
        let link = vec!["-L/opt/lib  -lpthread".to_string()];
        let request = ProbeRequest {
            fragment: FLAG_TEST_FRAGMENT,
            language: Language::C,
            compile_flags: &compile,
            link_flags: &link,
            link: true,
        };
        assert_eq!(request.compile_args(), ["/Wall", "/WX", "-DX=1"]);
        assert_eq!(request.link_args(), ["-L/opt/lib", "-lpthread"]);
    }

    #[test]
    fn test_candidate_display() {
        assert_eq!(Candidate::compile("-Wall").to_string(), "-Wall");
        assert_eq!(Candidate::link("-lpthread").to_string(), "-lpthread");
        assert_eq!(Candidate::bare().to_string(), "(no flags)");
        assert_eq!(
            Candidate {
                compile: Some("-pthread".to_string()),
                link: Some("-lpthread".to_string()),
            }
            .to_string(),
            "-pthread -lpthread"
        );
    }

    #[test]
    fn test_outcome_success() {
        assert!(ProbeOutcome::Yes.is_success());
        assert!(ProbeOutcome::ErrorEnforced.is_success());
        assert!(!ProbeOutcome::No.is_success());
        assert!(!ProbeOutcome::NotAttempted.is_success());
    }
}
