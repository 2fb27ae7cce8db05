//! Per-spawn-point item sampling.
//!
//! Builds a [`WeightedSampler`] over the spawn point's item distribution, restricted
//! to composed keys that still name an item in the (already filtered) pool, and draws
//! one key from it.
use std::collections::HashSet;

use rand::RngCore;
use tracing::debug;

use crate::loot::{Item, ItemDistribution};
use crate::sampling::WeightedSampler;

/// Ids of the items left in a filtered pool.
pub fn valid_item_ids(items: &[Item]) -> HashSet<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

/// Weighted sampler over the distribution entries whose composed key is in `items`.
///
/// Entries repeating an earlier key or carrying an invalid weight are dropped.
pub fn build_item_sampler(distribution: &[ItemDistribution], items: &[Item]) -> WeightedSampler<String> {
    let valid = valid_item_ids(items);
    let mut sampler = WeightedSampler::with_capacity(distribution.len());
    for entry in distribution {
        let key = &entry.composed_key.key;
        if !valid.contains(key.as_str()) {
            continue;
        }
        if let Err(e) = sampler.insert(key.clone(), entry.relative_probability, ()) {
            debug!("Ignoring item distribution entry: {}.", e);
        }
    }
    sampler
}

/// Draw one composed key for a spawn point, or `None` if nothing in the pool is drawable.
pub fn draw_composed_key<R: RngCore>(
    distribution: &[ItemDistribution],
    items: &[Item],
    rng: &mut R,
) -> Option<String> {
    let sampler = build_item_sampler(distribution, items);
    if sampler.is_empty() {
        return None;
    }
    sampler.draw_one(rng)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::sampling::tests::rng_at;

    fn items() -> Vec<Item> {
        vec![
            Item::new("a", "tpl_a"),
            Item::new("b", "tpl_b"),
            Item::new("b_child", "tpl_c").with_parent("b", "mod"),
        ]
    }

    #[test]
    fn sampler_only_holds_keys_present_in_pool() {
        let dist = vec![
            ItemDistribution::new("a", 1.0),
            ItemDistribution::new("gone", 5.0),
            ItemDistribution::new("b", 2.0),
        ];
        let sampler = build_item_sampler(&dist, &items());
        assert_eq!(sampler.len(), 2);
        assert!(!sampler.contains(&"gone".to_string()));
        assert_eq!(sampler.weight(&"b".to_string()), Some(2.0));
    }

    #[test]
    fn duplicate_and_negative_entries_are_dropped() {
        let dist = vec![
            ItemDistribution::new("a", 1.0),
            ItemDistribution::new("a", 9.0),
            ItemDistribution::new("b", -1.0),
        ];
        let sampler = build_item_sampler(&dist, &items());
        assert_eq!(sampler.len(), 1);
        assert_eq!(sampler.weight(&"a".to_string()), Some(1.0));
    }

    #[test]
    fn draws_by_relative_probability() {
        let dist = vec![ItemDistribution::new("a", 1.0), ItemDistribution::new("b", 3.0)];
        assert_eq!(
            draw_composed_key(&dist, &items(), &mut rng_at(0.1)).as_deref(),
            Some("a")
        );
        assert_eq!(
            draw_composed_key(&dist, &items(), &mut rng_at(0.5)).as_deref(),
            Some("b")
        );
    }

    #[test]
    fn no_valid_key_draws_nothing() {
        let dist = vec![ItemDistribution::new("not_in_pool", 1.0)];
        let mut rng = StdRng::seed_from_u64(1);
        assert!(draw_composed_key(&dist, &items(), &mut rng).is_none());
        assert!(draw_composed_key(&[], &items(), &mut rng).is_none());
    }
}
