//! Flag buckets.
//!
//! Every flag a capability check settles on lands in a bucket addressed by
//! flag kind (which carries the language for compile flags) and profile.
//! A bucket behaves like an insertion-ordered set: appending a flag that is
//! already present is a no-op.
//!
//! Bucket names follow the usual build-variable spelling: `CFLAGS`,
//! `CXXFLAGS`, `CPPFLAGS` and `LINKFLAGS`, suffixed with `_{profile}` for
//! named profiles (`CFLAGS_pthread`).

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use super::language::Language;

/// Error raised for malformed profile or bucket names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BucketStoreError {
    #[error("invalid profile name `{name}`: use letters, digits, `_` or `-`")]
    InvalidProfile { name: String },

    #[error("unknown flag bucket `{name}`")]
    UnknownBucket { name: String },
}

/// Kind of flags a bucket holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FlagKind {
    /// Compiler flags for one language (`CFLAGS` / `CXXFLAGS`)
    Compile(Language),
    /// Preprocessor flags shared by all languages (`CPPFLAGS`)
    Preprocessor,
    /// Linker flags shared by all languages (`LINKFLAGS`)
    Link,
}

impl FlagKind {
    const ALL: [FlagKind; 4] = [
        FlagKind::Compile(Language::C),
        FlagKind::Compile(Language::Cxx),
        FlagKind::Preprocessor,
        FlagKind::Link,
    ];

    /// Build-variable name of this kind.
    pub fn var_name(&self) -> &'static str {
        match self {
            FlagKind::Compile(language) => language.flags_var(),
            FlagKind::Preprocessor => "CPPFLAGS",
            FlagKind::Link => "LINKFLAGS",
        }
    }
}

/// Named configuration profile ("store") a bucket belongs to.
///
/// The default profile has no name and no suffix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Profile(Option<String>);

impl Profile {
    /// The unnamed default profile.
    pub fn unnamed() -> Self {
        Profile(None)
    }

    /// A named profile. An empty name is the default profile.
    pub fn named(name: &str) -> Result<Self, BucketStoreError> {
        if name.is_empty() {
            return Ok(Profile(None));
        }
        let valid = name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(BucketStoreError::InvalidProfile {
                name: name.to_string(),
            });
        }
        Ok(Profile(Some(name.to_string())))
    }

    /// Profile selected by an optional `uselib_store` option.
    pub fn from_store(store: Option<&str>) -> Result<Self, BucketStoreError> {
        store.map_or(Ok(Profile::unnamed()), Profile::named)
    }

    pub fn name(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_unnamed(&self) -> bool {
        self.0.is_none()
    }

    /// Bucket-name suffix: empty, or `_{name}`.
    pub fn suffix(&self) -> String {
        match &self.0 {
            Some(name) => format!("_{}", name),
            None => String::new(),
        }
    }
}

/// Address of a single bucket.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketKey {
    pub kind: FlagKind,
    pub profile: Profile,
}

impl BucketKey {
    pub fn new(kind: FlagKind, profile: &Profile) -> Self {
        BucketKey {
            kind,
            profile: profile.clone(),
        }
    }

    pub fn compile(language: Language, profile: &Profile) -> Self {
        BucketKey::new(FlagKind::Compile(language), profile)
    }

    pub fn preprocessor(profile: &Profile) -> Self {
        BucketKey::new(FlagKind::Preprocessor, profile)
    }

    pub fn link(profile: &Profile) -> Self {
        BucketKey::new(FlagKind::Link, profile)
    }

    /// Full bucket name, e.g. `CXXFLAGS_pthread`.
    pub fn name(&self) -> String {
        format!("{}{}", self.kind.var_name(), self.profile.suffix())
    }

    /// Parse a bucket name produced by [`BucketKey::name`].
    pub fn parse(name: &str) -> Result<Self, BucketStoreError> {
        let unknown = || BucketStoreError::UnknownBucket {
            name: name.to_string(),
        };

        for kind in FlagKind::ALL {
            let Some(rest) = name.strip_prefix(kind.var_name()) else {
                continue;
            };
            if rest.is_empty() {
                return Ok(BucketKey::new(kind, &Profile::unnamed()));
            }
            if let Some(profile) = rest.strip_prefix('_') {
                if profile.is_empty() {
                    return Err(unknown());
                }
                return Ok(BucketKey::new(kind, &Profile::named(profile)?));
            }
        }

        Err(unknown())
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Accumulated flag buckets of one configuration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagBucketStore {
    buckets: BTreeMap<BucketKey, Vec<String>>,
}

impl FlagBucketStore {
    pub fn new() -> Self {
        FlagBucketStore::default()
    }

    /// Append a flag unless the bucket already holds it.
    ///
    /// Returns `true` if the flag was inserted.
    pub fn append(&mut self, key: &BucketKey, flag: &str) -> bool {
        let bucket = self.buckets.entry(key.clone()).or_default();
        if bucket.iter().any(|f| f == flag) {
            return false;
        }
        bucket.push(flag.to_string());
        true
    }

    /// Append every flag not already present, keeping order.
    pub fn extend_unique<I, S>(&mut self, key: &BucketKey, flags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for flag in flags {
            self.append(key, flag.as_ref());
        }
    }

    /// Remove a flag from a bucket. Returns `true` if it was present.
    pub fn remove(&mut self, key: &BucketKey, flag: &str) -> bool {
        let Some(bucket) = self.buckets.get_mut(key) else {
            return false;
        };
        let before = bucket.len();
        bucket.retain(|f| f != flag);
        bucket.len() != before
    }

    /// Current contents of a bucket; empty if it was never created.
    pub fn get(&self, key: &BucketKey) -> &[String] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, key: &BucketKey, flag: &str) -> bool {
        self.get(key).iter().any(|f| f == flag)
    }

    /// Flags visible to a probe using `profile`.
    ///
    /// For each kind, the default profile's flags come first, followed by the
    /// named profile's. Duplicates are dropped.
    pub fn collect(&self, kinds: &[FlagKind], profile: &Profile) -> Vec<String> {
        let mut flags: Vec<String> = Vec::new();
        for &kind in kinds {
            let mut keys = vec![BucketKey::new(kind, &Profile::unnamed())];
            if !profile.is_unnamed() {
                keys.push(BucketKey::new(kind, profile));
            }
            for key in &keys {
                for flag in self.get(key) {
                    if !flags.contains(flag) {
                        flags.push(flag.clone());
                    }
                }
            }
        }
        flags
    }

    /// Non-empty buckets in stable key order.
    pub fn iter(&self) -> impl Iterator<Item = (&BucketKey, &[String])> {
        self.buckets
            .iter()
            .filter(|(_, flags)| !flags.is_empty())
            .map(|(key, flags)| (key, flags.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Serialize to TOML: one array per non-empty bucket.
    pub fn to_toml(&self) -> Result<String> {
        let table: BTreeMap<String, Vec<String>> = self
            .iter()
            .map(|(key, flags)| (key.name(), flags.to_vec()))
            .collect();
        toml::to_string_pretty(&table).context("failed to serialize flag buckets")
    }

    /// Parse the format written by [`FlagBucketStore::to_toml`].
    pub fn from_toml(contents: &str) -> Result<Self> {
        let table: BTreeMap<String, Vec<String>> =
            toml::from_str(contents).context("failed to parse flag buckets")?;

        let mut store = FlagBucketStore::new();
        for (name, flags) in table {
            let key = BucketKey::parse(&name)?;
            store.extend_unique(&key, flags);
        }
        Ok(store)
    }

    /// Load a store from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read flag state: {}", path.display()))?;
        Self::from_toml(&contents)
            .with_context(|| format!("invalid flag state: {}", path.display()))
    }

    /// Load a store, or start empty if the file doesn't exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the store to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create state directory: {}", parent.display())
                })?;
            }
        }

        std::fs::write(path, self.to_toml()?)
            .with_context(|| format!("failed to write flag state: {}", path.display()))
    }
}
