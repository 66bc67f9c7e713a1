use super::partition::Batches;
use std::collections::HashSet;

/// Normalize a single raw name.
///
/// Returns `None` for empty or whitespace-only input.
pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Set of normalized names for one resolve call.
///
/// Keeps first-seen order so batches are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedNames {
    names: Vec<String>,
}

impl NormalizedNames {
    pub fn from_raw<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut names = Vec::new();
        for name in raw {
            if let Some(n) = normalize_name(name.as_ref()) {
                if seen.insert(n.clone()) {
                    names.push(n);
                }
            }
        }
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.names
    }

    /// Number of batches `batches(batch_size)` will yield.
    pub fn batch_count(&self, batch_size: usize) -> usize {
        let size = batch_size.max(1);
        (self.names.len() + size - 1) / size
    }

    /// Lazily split into batches of at most `batch_size` names.
    pub fn batches(&self, batch_size: usize) -> Batches<'_> {
        Batches::new(&self.names, batch_size)
    }
}

/// One batch submitted to the transport in a single remote call.
///
/// Immutable once built; names are already normalized and unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    index: usize,
    names: Vec<String>,
}

impl LookupRequest {
    pub(crate) fn new(index: usize, names: Vec<String>) -> Self {
        Self { index, names }
    }

    /// Build a standalone request, normalizing and deduplicating `raw`.
    pub fn from_names<I, S>(raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new(0, NormalizedNames::from_raw(raw).names)
    }

    /// Zero-based position of this batch within its resolve call.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}
