//! Memoization of computed matrices keyed by the active parameter set.

use std::collections::HashMap;

use crate::error::Result;
use crate::matrix::ColorMatrix;

/// Where a matrix returned by [`MatrixCache::get_or_compute`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheHit {
    /// Same key as the immediately preceding call.
    Last,
    /// Found in the persistent map.
    Stored,
    /// Freshly computed and stored.
    Computed,
}

/// Persistent key → matrix map plus a fast path for the previous key.
///
/// Entries are never evicted. The key space follows the granularity of the
/// caller's controls.
#[derive(Debug, Default, Clone)]
pub struct MatrixCache {
    entries: HashMap<String, ColorMatrix>,
    last: Option<(String, ColorMatrix)>,
}

impl MatrixCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the matrix for `key`, running `compute` only on a miss.
    ///
    /// Lookup order: the previous call's slot, then the persistent map, then
    /// `compute`. A failed computation stores nothing.
    pub fn get_or_compute<F>(&mut self, key: String, compute: F) -> Result<(ColorMatrix, CacheHit)>
    where
        F: FnOnce() -> Result<ColorMatrix>,
    {
        if let Some((last_key, matrix)) = &self.last {
            if *last_key == key {
                return Ok((*matrix, CacheHit::Last));
            }
        }

        if let Some(matrix) = self.entries.get(&key).copied() {
            self.last = Some((key, matrix));
            return Ok((matrix, CacheHit::Stored));
        }

        let matrix = compute()?;
        tracing::debug!(%key, entries = self.entries.len() + 1, "matrix cached");
        self.entries.insert(key.clone(), matrix);
        self.last = Some((key, matrix));
        Ok((matrix, CacheHit::Computed))
    }

    /// Forget the previous-call slot. The persistent map is kept.
    pub fn clear_last(&mut self) {
        self.last = None;
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
