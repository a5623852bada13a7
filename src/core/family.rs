//! Compiler family classification.
//!
//! Flags are only ever tried against compilers that speak their syntax:
//! GCC-style warning flags never reach an MSVC-like compiler and MSVC
//! warning-number flags never reach anything else.

use std::collections::BTreeMap;
use std::fmt;

use super::language::Language;

/// Compiler identifiers that classify as MSVC-like.
pub const MSVC_LIKE_IDS: &[&str] = &["msvc", "msvc2008", "msvs", "msvs2008"];

/// Prefix of GCC-style warning flags.
const GCC_WARNING_PREFIX: &str = "-W";

/// Prefixes of MSVC warning-number flags (disable, once, error).
const MSVC_WARNING_PREFIXES: &[&str] = &["/wd", "/wo", "/we"];

/// Normalized compiler family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompilerFamily {
    /// cl.exe and its historical aliases
    MsvcLike,
    /// Everything else (gcc, clang, vendor compilers, unknown)
    #[default]
    Other,
}

impl CompilerFamily {
    /// Classify a compiler identifier such as `"gcc"` or `"msvc"`.
    pub fn classify(compiler_id: &str) -> CompilerFamily {
        let id = compiler_id.trim().to_ascii_lowercase();
        if MSVC_LIKE_IDS.contains(&id.as_str()) {
            CompilerFamily::MsvcLike
        } else {
            CompilerFamily::Other
        }
    }

    /// Whether a compile flag may be tried against this family.
    pub fn accepts(self, flag: &str) -> bool {
        match self {
            CompilerFamily::MsvcLike => !flag.starts_with(GCC_WARNING_PREFIX),
            CompilerFamily::Other => !MSVC_WARNING_PREFIXES
                .iter()
                .any(|prefix| flag.starts_with(prefix)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompilerFamily::MsvcLike => "msvc-like",
            CompilerFamily::Other => "other",
        }
    }
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compiler identifier recorded per language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerIds {
    ids: BTreeMap<Language, String>,
}

impl CompilerIds {
    pub fn new() -> Self {
        CompilerIds::default()
    }

    /// Record the compiler identifier for a language.
    pub fn set(&mut self, language: Language, id: impl Into<String>) {
        self.ids.insert(language, id.into());
    }

    /// Builder-style variant of [`CompilerIds::set`].
    pub fn with(mut self, language: Language, id: impl Into<String>) -> Self {
        self.set(language, id);
        self
    }

    pub fn get(&self, language: Language) -> Option<&str> {
        self.ids.get(&language).map(String::as_str)
    }

    /// Family of the compiler recorded for a language.
    ///
    /// A language without a recorded compiler classifies as [`CompilerFamily::Other`].
    pub fn family(&self, language: Language) -> CompilerFamily {
        self.get(language)
            .map(CompilerFamily::classify)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_msvc_aliases() {
        for id in ["msvc", "msvc2008", "msvs", "msvs2008", "MSVC"] {
            assert_eq!(CompilerFamily::classify(id), CompilerFamily::MsvcLike, "{id}");
        }
    }

    #[test]
    fn test_classify_other() {
        for id in ["gcc", "clang", "apple-clang", "suncc", "", "msvc2010"] {
            assert_eq!(CompilerFamily::classify(id), CompilerFamily::Other, "{id}");
        }
    }

    #[test]
    fn test_msvc_rejects_gcc_warning_flags() {
        let family = CompilerFamily::MsvcLike;
        assert!(!family.accepts("-Wall"));
        assert!(!family.accepts("-Werror=all"));
        assert!(family.accepts("/Wall"));
        assert!(family.accepts("/wd4996"));
        assert!(family.accepts("-pthread"));
    }

    #[test]
    fn test_other_rejects_msvc_warning_numbers() {
        let family = CompilerFamily::Other;
        assert!(!family.accepts("/wd4996"));
        assert!(!family.accepts("/wo4996"));
        assert!(!family.accepts("/we4996"));
        assert!(family.accepts("/Wall"));
        assert!(family.accepts("-Wall"));
    }

    #[test]
    fn test_compiler_ids_family_lookup() {
        let ids = CompilerIds::new()
            .with(Language::C, "gcc")
            .with(Language::Cxx, "msvc");
        assert_eq!(ids.family(Language::C), CompilerFamily::Other);
        assert_eq!(ids.family(Language::Cxx), CompilerFamily::MsvcLike);
        assert_eq!(CompilerIds::new().family(Language::C), CompilerFamily::Other);
    }
}
