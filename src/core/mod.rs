//! Core data structures for flagprobe.
//!
//! This module contains the foundational types used throughout the crate:
//! - Target languages and language selectors
//! - Compiler family classification
//! - Flag buckets keyed by kind, language and profile
//! - Destination platform identification

pub mod bucket;
pub mod family;
pub mod language;
pub mod platform;

pub use bucket::{BucketKey, BucketStoreError, FlagBucketStore, FlagKind, Profile};
pub use family::{CompilerFamily, CompilerIds};
pub use language::{LangSelector, Language, LanguageError, LanguageSet};
pub use platform::{DestOs, TargetTriple};
