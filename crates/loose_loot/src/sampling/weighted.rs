//! Keyed weighted sampler with draw-without-replacement.
//!
//! A [`WeightedSampler`] holds unique keys, each with a weight and a payload.
//! [`WeightedSampler::draw`] picks keys proportionally to their weights; without
//! repeats, each pick is removed from the remaining pool before the next one.
//! Draws run against a [`FenwickTree`] so `k` picks over `n` entries cost
//! O(n + k log n). Drawing never mutates the sampler, so the same sampler can be
//! drawn from repeatedly.
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

use rand::RngCore;

use crate::error::{Error, Result};
use crate::sampling::{rand01, FenwickTree};

#[derive(Debug, Clone)]
struct Entry<K, P> {
    key: K,
    weight: f64,
    payload: P,
}

/// Weighted collection of `{key, weight, payload}` triples with unique keys.
#[derive(Debug, Clone)]
pub struct WeightedSampler<K, P = ()> {
    entries: Vec<Entry<K, P>>,
    index: HashMap<K, usize>,
}

impl<K, P> Default for WeightedSampler<K, P> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K, P> WeightedSampler<K, P>
where
    K: Eq + Hash + Clone + Display,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Insert a new entry. Fails if `key` is already present or `weight` is negative or not finite.
    ///
    /// A zero weight is accepted; such entries are kept but never drawn.
    pub fn insert(&mut self, key: K, weight: f64, payload: P) -> Result<()> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidWeight {
                key: key.to_string(),
                weight,
            });
        }
        if self.index.contains_key(&key) {
            return Err(Error::DuplicateKey {
                key: key.to_string(),
            });
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(Entry {
            key,
            weight,
            payload,
        });
        Ok(())
    }

    /// Payload stored under `key`.
    pub fn lookup(&self, key: &K) -> Option<&P> {
        self.index.get(key).map(|&i| &self.entries[i].payload)
    }

    pub fn lookup_mut(&mut self, key: &K) -> Option<&mut P> {
        self.index
            .get(key)
            .copied()
            .map(move |i| &mut self.entries[i].payload)
    }

    pub fn weight(&self, key: &K) -> Option<f64> {
        self.index.get(key).map(|&i| self.entries[i].weight)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|e| e.weight).sum()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|e| &e.key)
    }

    /// Consume the sampler, returning the payload of each key in `keys` that is present.
    pub fn into_payloads(self, keys: &[K]) -> Vec<P> {
        let mut slots: Vec<Option<P>> = self.entries.into_iter().map(|e| Some(e.payload)).collect();
        keys.iter()
            .filter_map(|k| self.index.get(k).and_then(|&i| slots[i].take()))
            .collect()
    }

    /// Draw up to `count` keys.
    ///
    /// With `allow_repeat == false` the result holds distinct keys, at most one per
    /// entry with a positive weight; asking for more than that returns all of them.
    /// With `allow_repeat == true` every pick is independent and exactly `count` keys
    /// are returned unless no entry has a positive weight.
    pub fn draw<R: RngCore>(&self, count: usize, allow_repeat: bool, rng: &mut R) -> Vec<K> {
        let weights: Vec<f64> = self.entries.iter().map(|e| e.weight).collect();
        let mut tree = FenwickTree::from_weights(&weights);
        let mut drawn = Vec::with_capacity(count.min(self.entries.len()));

        for _ in 0..count {
            let total = tree.total();
            if total <= 0.0 {
                break;
            }
            let target = rand01(rng) * total;
            let Some(idx) = tree.find(target) else {
                break;
            };
            drawn.push(self.entries[idx].key.clone());
            if !allow_repeat {
                tree.set(idx, 0.0);
            }
        }

        drawn
    }

    /// Draw a single key.
    pub fn draw_one<R: RngCore>(&self, rng: &mut R) -> Option<K> {
        self.draw(1, false, rng).into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::tests::rng_at;

    fn sampler(weights: &[(&str, f64)]) -> WeightedSampler<String, usize> {
        let mut s = WeightedSampler::new();
        for (i, (k, w)) in weights.iter().enumerate() {
            s.insert(k.to_string(), *w, i).unwrap();
        }
        s
    }

    #[test]
    fn insert_rejects_duplicate_keys() {
        let mut s = sampler(&[("a", 1.0)]);
        let err = s.insert("a".to_string(), 2.0, 9).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { ref key } if key == "a"));
        assert_eq!(s.len(), 1);
        assert_eq!(s.lookup(&"a".to_string()), Some(&0));
    }

    #[test]
    fn insert_accepts_zero_and_rejects_negative_weights() {
        let mut s: WeightedSampler<String> = WeightedSampler::new();
        assert!(s.insert("zero".into(), 0.0, ()).is_ok());
        assert!(matches!(
            s.insert("neg".into(), -0.5, ()),
            Err(Error::InvalidWeight { .. })
        ));
        assert!(s.insert("nan".into(), f64::NAN, ()).is_err());
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn lookup_missing_key_is_none() {
        let s = sampler(&[("a", 1.0)]);
        assert!(s.lookup(&"b".to_string()).is_none());
        assert!(s.weight(&"b".to_string()).is_none());
    }

    #[test]
    fn draw_one_picks_by_cumulative_weight() {
        let s = sampler(&[("a", 0.7), ("b", 0.3)]);
        assert_eq!(s.draw_one(&mut rng_at(0.0)).as_deref(), Some("a"));
        assert_eq!(s.draw_one(&mut rng_at(0.69)).as_deref(), Some("a"));
        assert_eq!(s.draw_one(&mut rng_at(0.8)).as_deref(), Some("b"));
    }

    #[test]
    fn zero_weight_never_drawn_when_positive_exists() {
        let s = sampler(&[("zero_a", 0.0), ("pos", 0.2), ("zero_b", 0.0)]);
        for fraction in [0.0, 0.3, 0.5, 0.99] {
            assert_eq!(s.draw_one(&mut rng_at(fraction)).as_deref(), Some("pos"));
        }
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..200 {
            assert_eq!(s.draw_one(&mut rng).as_deref(), Some("pos"));
        }
    }

    #[test]
    fn all_zero_weights_draw_nothing() {
        let s = sampler(&[("a", 0.0), ("b", 0.0)]);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(s.draw(2, false, &mut rng).is_empty());
        assert!(s.draw_one(&mut rng).is_none());
    }

    #[test]
    fn draw_without_repeat_returns_distinct_keys() {
        let weights: Vec<(String, f64)> = (0..50)
            .map(|i| (format!("k{i}"), 0.05 + (i % 7) as f64))
            .collect();
        let mut s: WeightedSampler<String> = WeightedSampler::new();
        for (k, w) in &weights {
            s.insert(k.clone(), *w, ()).unwrap();
        }

        let mut rng = StdRng::seed_from_u64(99);
        for count in [0, 1, 10, 50, 80] {
            let drawn = s.draw(count, false, &mut rng);
            assert_eq!(drawn.len(), count.min(50));
            let unique: HashSet<_> = drawn.iter().collect();
            assert_eq!(unique.len(), drawn.len());
        }
    }

    #[test]
    fn draw_with_repeat_returns_exact_count() {
        let s = sampler(&[("a", 1.0), ("b", 1.0)]);
        let mut rng = StdRng::seed_from_u64(4);
        let drawn = s.draw(25, true, &mut rng);
        assert_eq!(drawn.len(), 25);
        assert!(drawn.iter().all(|k| k == "a" || k == "b"));
    }

    #[test]
    fn draw_is_reproducible_for_same_seed() {
        let s = sampler(&[("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0)]);
        let mut rng_a = StdRng::seed_from_u64(123);
        let mut rng_b = StdRng::seed_from_u64(123);
        assert_eq!(s.draw(3, false, &mut rng_a), s.draw(3, false, &mut rng_b));
    }

    #[test]
    fn heavier_entries_are_drawn_more_often() {
        let s = sampler(&[("light", 1.0), ("heavy", 9.0)]);
        let mut rng = StdRng::seed_from_u64(8);
        let heavy = (0..2000)
            .filter(|_| s.draw_one(&mut rng).as_deref() == Some("heavy"))
            .count();
        assert!((1650..=1950).contains(&heavy), "heavy drawn {heavy} times");
    }

    #[test]
    fn into_payloads_follows_key_order() {
        let s = sampler(&[("a", 1.0), ("b", 1.0), ("c", 1.0)]);
        let payloads = s.into_payloads(&["c".to_string(), "a".to_string(), "x".to_string()]);
        assert_eq!(payloads, vec![2, 0]);
    }
}
