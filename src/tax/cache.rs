//! Memoization of reverse-tax solves
//!
//! The same reverse-tax query recurs every simulated year, so solved amounts
//! are kept per argument tuple for the lifetime of the owning bracket:
//!
//! - Entries are never evicted; the map grows with every distinct query
//! - Writes are idempotent (a key always solves to the same value), so two
//!   threads racing on the same miss both store identical values
//! - Cloning the owner clones the entries into an independent cache

use super::reverse::{ReverseSolve, ReverseTaxOptions};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// Hashable form of `(final_amount, deduction, margin, epsilon, iters)`.
///
/// Floats are keyed by bit pattern with `-0.0` folded into `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReverseTaxKey {
    final_amount: u64,
    deduction: u64,
    margin: u64,
    epsilon: u64,
    iters: usize,
}

fn key_bits(value: f64) -> u64 {
    (value + 0.0).to_bits()
}

impl ReverseTaxKey {
    pub fn new(final_amount: f64, deduction: f64, margin: f64, options: ReverseTaxOptions) -> Self {
        Self {
            final_amount: key_bits(final_amount),
            deduction: key_bits(deduction),
            margin: key_bits(margin),
            epsilon: key_bits(options.epsilon),
            iters: options.iters,
        }
    }
}

/// Unbounded, append-only reverse-tax memo
#[derive(Debug, Default)]
pub struct ReverseTaxCache {
    entries: RwLock<HashMap<ReverseTaxKey, ReverseSolve>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ReverseTaxCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached solve for `key`, computing and storing it on a miss
    pub fn get_or_insert_with<F>(&self, key: ReverseTaxKey, solve: F) -> ReverseSolve
    where
        F: FnOnce() -> ReverseSolve,
    {
        if let Some(found) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return found;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        // Solve outside the lock; a concurrent miss on the same key stores the same value.
        let solved = solve();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        *entries.entry(key).or_insert(solved)
    }

    /// Look up a previously solved query
    pub fn get(&self, key: &ReverseTaxKey) -> Option<ReverseSolve> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
    }

    /// Get number of cached entries
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Get cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

impl Clone for ReverseTaxCache {
    fn clone(&self) -> Self {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner).clone();
        Self {
            entries: RwLock::new(entries),
            hits: AtomicU64::new(self.hits()),
            misses: AtomicU64::new(self.misses()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved(amount: f64) -> ReverseSolve {
        ReverseSolve {
            amount,
            iterations: 3,
            residual: 0.001,
            converged: true,
        }
    }

    #[test]
    fn test_hit_after_miss() {
        let cache = ReverseTaxCache::new();
        let key = ReverseTaxKey::new(1000.0, 0.0, 0.0, ReverseTaxOptions::default());

        let first = cache.get_or_insert_with(key, || solved(1100.0));
        let second = cache.get_or_insert_with(key, || panic!("should be cached"));

        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.misses(), 1);
        assert_eq!(cache.hits(), 1);
        assert!((cache.hit_rate() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_key_distinguishes_every_argument() {
        let options = ReverseTaxOptions::default();
        let base = ReverseTaxKey::new(1000.0, 0.0, 0.0, options);
        assert_ne!(base, ReverseTaxKey::new(1000.0, 12_550.0, 0.0, options));
        assert_ne!(base, ReverseTaxKey::new(1000.0, 0.0, 500.0, options));
        assert_ne!(
            base,
            ReverseTaxKey::new(1000.0, 0.0, 0.0, ReverseTaxOptions { epsilon: 1e-5, ..options })
        );
        assert_ne!(
            base,
            ReverseTaxKey::new(1000.0, 0.0, 0.0, ReverseTaxOptions { iters: 50, ..options })
        );
        assert_eq!(base, ReverseTaxKey::new(1000.0, -0.0, 0.0, options));
    }

    #[test]
    fn test_clone_is_independent() {
        let cache = ReverseTaxCache::new();
        let options = ReverseTaxOptions::default();
        cache.get_or_insert_with(ReverseTaxKey::new(1.0, 0.0, 0.0, options), || solved(1.0));

        let copy = cache.clone();
        copy.get_or_insert_with(ReverseTaxKey::new(2.0, 0.0, 0.0, options), || solved(2.0));

        assert_eq!(cache.len(), 1);
        assert_eq!(copy.len(), 2);
    }
}
