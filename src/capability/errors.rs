//! Capability request errors.

use thiserror::Error;

use crate::core::bucket::BucketStoreError;
use crate::core::language::LanguageError;

use super::Capability;

/// Configuration error returned by a capability request.
///
/// Probe failures are never errors; they end up as status "no".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigureError {
    #[error("unsupported language `{token}` (expected c, c++ or cxx)")]
    UnsupportedLanguage { token: String },

    #[error("no target languages given")]
    NoLanguages,

    #[error("`{capability}` requires at least one flag")]
    MissingFlags { capability: Capability },

    #[error(transparent)]
    Bucket(#[from] BucketStoreError),
}

impl From<LanguageError> for ConfigureError {
    fn from(err: LanguageError) -> Self {
        match err {
            LanguageError::Unsupported { token } => ConfigureError::UnsupportedLanguage { token },
            LanguageError::Empty => ConfigureError::NoLanguages,
        }
    }
}
