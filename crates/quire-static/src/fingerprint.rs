//! Change detection over the source notes.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use md5::{Digest, Md5};

use crate::document::{list_documents, note_name};

/// Hex digest identifying one version of a note.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Digest of the note's path and modification time.
    pub fn compute(path: &Path, modified: SystemTime) -> Self {
        let nanos = modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();

        let mut hasher = Md5::new();
        hasher.update(format!("{}-{nanos}", path.display()).as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Fingerprint {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fingerprints keyed by note file name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintSet(BTreeMap<String, Fingerprint>);

impl FingerprintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, fingerprint: Fingerprint) {
        self.0.insert(name.into(), fingerprint);
    }

    pub fn get(&self, name: &str) -> Option<&Fingerprint> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Fingerprint)> {
        self.0.iter()
    }
}

impl<N: Into<String>, F: Into<Fingerprint>> FromIterator<(N, F)> for FingerprintSet {
    fn from_iter<I: IntoIterator<Item = (N, F)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, fp)| (name.into(), fp.into()))
                .collect(),
        )
    }
}

/// First difference found between two fingerprint sets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Deleted(String),
    Modified(String),
    Added(String),
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Change::Deleted(name) => write!(f, "{name} deleted"),
            Change::Modified(name) => write!(f, "{name} modified"),
            Change::Added(name) => write!(f, "{name} added"),
        }
    }
}

/// Fingerprint every note directly inside `source_dir`.
pub fn scan(source_dir: &Path) -> io::Result<FingerprintSet> {
    let mut set = FingerprintSet::new();

    for path in list_documents(source_dir)? {
        let modified = fs::metadata(&path)?.modified()?;
        let Some(name) = note_name(&path) else {
            continue;
        };
        set.insert(name, Fingerprint::compute(&path, modified));
    }

    Ok(set)
}

/// Whether any note was deleted, modified or added between `old` and `new`.
pub fn has_changed(old: &FingerprintSet, new: &FingerprintSet) -> bool {
    diff(old, new).is_some()
}

/// Deletions and modifications are reported before additions.
pub fn diff(old: &FingerprintSet, new: &FingerprintSet) -> Option<Change> {
    for (name, fingerprint) in old.iter() {
        match new.get(name) {
            None => return Some(Change::Deleted(name.clone())),
            Some(current) if current != fingerprint => {
                return Some(Change::Modified(name.clone()))
            }
            Some(_) => {}
        }
    }

    new.iter()
        .find(|(name, _)| old.get(name).is_none())
        .map(|(name, _)| Change::Added(name.clone()))
}
