use std::collections::HashMap;

use loose_loot::prelude::*;
use loose_loot_examples::init_tracing;
use rand::rngs::StdRng;
use rand::SeedableRng;

const DRAWS: usize = 100_000;

fn main() -> anyhow::Result<()> {
    init_tracing();

    let weights = [("bolts", 50.0), ("roubles", 30.0), ("gpu", 1.0), ("ledx", 0.5), ("junk", 18.5)];
    let mut sampler: WeightedSampler<String> = WeightedSampler::new();
    for (key, weight) in weights {
        sampler.insert(key.to_string(), weight, ())?;
    }
    let total = sampler.total_weight();

    let mut rng = StdRng::seed_from_u64(7);

    // With replacement: observed frequencies converge on weight / total.
    let mut counts: HashMap<String, usize> = HashMap::new();
    for key in sampler.draw(DRAWS, true, &mut rng) {
        *counts.entry(key).or_default() += 1;
    }
    println!("{:<10} {:>10} {:>10}", "key", "expected", "observed");
    for (key, weight) in weights {
        let observed = counts.get(key).copied().unwrap_or(0) as f64 / DRAWS as f64;
        println!("{:<10} {:>10.4} {:>10.4}", key, weight / total, observed);
    }

    // Without replacement: heavier keys tend to come first, no key repeats.
    for _ in 0..3 {
        let order = sampler.draw(weights.len(), false, &mut rng);
        println!("order: {}", order.join(" > "));
    }

    Ok(())
}
