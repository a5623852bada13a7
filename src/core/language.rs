//! Target languages and language selectors.
//!
//! Capability requests name their target languages as free text
//! (`"c"`, `"C++"`, `["c", "cxx"]`). This module normalizes those
//! selectors into a [`LanguageSet`] of canonical [`Language`] tags.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Source language a flag bucket belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Language {
    /// C language
    #[serde(rename = "c")]
    C,
    /// C++ language
    #[serde(rename = "c++", alias = "cxx")]
    Cxx,
}

impl Language {
    /// Every supported language, in default probing order.
    pub const ALL: [Language; 2] = [Language::C, Language::Cxx];

    /// Get the language name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "c++",
        }
    }

    /// Name of the compile flag variable for this language.
    pub fn flags_var(&self) -> &'static str {
        match self {
            Language::C => "CFLAGS",
            Language::Cxx => "CXXFLAGS",
        }
    }

    /// File extension used for probe sources.
    pub fn source_extension(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "cpp",
        }
    }

    /// Map a free-text token onto a language.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    pub fn from_token(token: &str) -> Option<Language> {
        match token.trim().to_ascii_lowercase().as_str() {
            "c" => Some(Language::C),
            "c++" | "cxx" => Some(Language::Cxx),
            _ => None,
        }
    }
}

impl std::str::FromStr for Language {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_token(s).ok_or_else(|| LanguageError::Unsupported {
            token: s.to_string(),
        })
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error produced while resolving a language selector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LanguageError {
    #[error("unsupported language `{token}`, expected one of: c, c++, cxx")]
    Unsupported { token: String },

    #[error("language list is empty")]
    Empty,
}

/// Free-text language selector as written in a capability request.
///
/// Accepts either a single token or a list of tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LangSelector {
    One(String),
    Many(Vec<String>),
}

impl LangSelector {
    fn tokens(&self) -> &[String] {
        match self {
            LangSelector::One(token) => std::slice::from_ref(token),
            LangSelector::Many(tokens) => tokens,
        }
    }
}

impl From<&str> for LangSelector {
    fn from(token: &str) -> Self {
        LangSelector::One(token.to_string())
    }
}

impl From<Vec<String>> for LangSelector {
    fn from(tokens: Vec<String>) -> Self {
        LangSelector::Many(tokens)
    }
}

/// Ordered, duplicate-free set of target languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSet(Vec<Language>);

impl LanguageSet {
    /// Resolve an optional selector. An absent selector means C and C++.
    pub fn resolve(selector: Option<&LangSelector>) -> Result<Self, LanguageError> {
        let Some(selector) = selector else {
            return Ok(LanguageSet::default());
        };

        let languages = selector
            .tokens()
            .iter()
            .map(|token| token.parse::<Language>())
            .collect::<Result<Vec<_>, _>>()?;

        if languages.is_empty() {
            return Err(LanguageError::Empty);
        }

        Ok(LanguageSet::from_languages(languages))
    }

    /// Build a set from already-canonical languages, dropping duplicates.
    pub fn from_languages(languages: impl IntoIterator<Item = Language>) -> Self {
        let mut set = Vec::new();
        for language in languages {
            if !set.contains(&language) {
                set.push(language);
            }
        }
        LanguageSet(set)
    }

    pub fn iter(&self) -> impl Iterator<Item = Language> + '_ {
        self.0.iter().copied()
    }

    /// First language of the set; auxiliary checks run against it.
    pub fn primary(&self) -> Option<Language> {
        self.0.first().copied()
    }
}

impl Default for LanguageSet {
    fn default() -> Self {
        LanguageSet(Language::ALL.to_vec())
    }
}

impl fmt::Display for LanguageSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|l| l.as_str()).collect();
        f.write_str(&names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_mapping_is_case_insensitive() {
        assert_eq!(Language::from_token("c"), Some(Language::C));
        assert_eq!(Language::from_token(" C "), Some(Language::C));
        assert_eq!(Language::from_token("C++"), Some(Language::Cxx));
        assert_eq!(Language::from_token("CXX"), Some(Language::Cxx));
        assert_eq!(Language::from_token("fortran"), None);
    }

    #[test]
    fn test_absent_selector_defaults_to_c_and_cxx() {
        let set = LanguageSet::resolve(None).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Language::C, Language::Cxx]);
    }

    #[test]
    fn test_single_token_selector() {
        let selector = LangSelector::from("c++");
        let set = LanguageSet::resolve(Some(&selector)).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Language::Cxx]);
        assert_eq!(set.primary(), Some(Language::Cxx));
    }

    #[test]
    fn test_list_selector_deduplicates_in_order() {
        let selector = LangSelector::Many(vec![
            "C++".to_string(),
            "c".to_string(),
            "cxx".to_string(),
        ]);
        let set = LanguageSet::resolve(Some(&selector)).unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![Language::Cxx, Language::C]);
    }

    #[test]
    fn test_unknown_token_fails() {
        let selector = LangSelector::Many(vec!["c".to_string(), "fortran".to_string()]);
        let err = LanguageSet::resolve(Some(&selector)).unwrap_err();
        assert_eq!(
            err,
            LanguageError::Unsupported {
                token: "fortran".to_string()
            }
        );
    }

    #[test]
    fn test_empty_list_fails() {
        let selector = LangSelector::Many(Vec::new());
        assert_eq!(
            LanguageSet::resolve(Some(&selector)).unwrap_err(),
            LanguageError::Empty
        );
    }

    #[test]
    fn test_selector_deserializes_from_string_or_list() {
        #[derive(Deserialize)]
        struct Holder {
            lang: LangSelector,
        }

        let one: Holder = toml::from_str("lang = \"c\"").unwrap();
        assert_eq!(one.lang, LangSelector::One("c".to_string()));

        let many: Holder = toml::from_str("lang = [\"c\", \"c++\"]").unwrap();
        assert_eq!(
            many.lang,
            LangSelector::Many(vec!["c".to_string(), "c++".to_string()])
        );
    }
}
