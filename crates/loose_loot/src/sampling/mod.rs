//! Random draws used by the loot pipeline.
//!
//! Every helper takes the random source as a parameter so a seeded RNG gives
//! reproducible generation. The keyed [`WeightedSampler`] lives in [`weighted`],
//! backed by the cumulative-weight tree in [`fenwick`].
use rand::RngCore;

pub mod fenwick;
pub mod weighted;

pub use fenwick::FenwickTree;
pub use weighted::WeightedSampler;

/// Number of rerolls before [`normal`] gives up on a non-negative value.
pub const MAX_NORMAL_ATTEMPTS: usize = 100;

/// Generate a random float in the range [0, 1).
#[inline]
pub fn rand01(rng: &mut dyn RngCore) -> f64 {
    // 53 high bits fill the f64 mantissa exactly.
    ((rng.next_u64() >> 11) as f64) / ((1u64 << 53) as f64)
}

/// Draw from a normal distribution with the given mean and standard deviation.
///
/// Negative results are rerolled up to [`MAX_NORMAL_ATTEMPTS`] times, after which
/// `mean` (clamped to zero) is returned. A standard deviation of zero returns `mean`.
pub fn normal(mean: f64, std_dev: f64, rng: &mut dyn RngCore) -> f64 {
    let std_dev = if std_dev.is_finite() {
        std_dev.abs()
    } else {
        0.0
    };
    for _ in 0..MAX_NORMAL_ATTEMPTS {
        let value = mean + std_dev * standard_normal(rng);
        if value >= 0.0 {
            return value;
        }
    }
    mean.max(0.0)
}

/// Uniform integer in `[min, max]`. Returns `min` when the range is empty.
pub fn random_int_inclusive(min: i64, max: i64, rng: &mut dyn RngCore) -> i64 {
    if max <= min {
        return min;
    }
    let span = (max - min + 1) as f64;
    let offset = (rand01(rng) * span).floor() as i64;
    (min + offset).min(max)
}

/// Returns `true` with the given percentage chance (0–100).
pub fn chance_percent(percent: f64, rng: &mut dyn RngCore) -> bool {
    if percent >= 100.0 {
        return true;
    }
    if percent <= 0.0 {
        return false;
    }
    rand01(rng) * 100.0 < percent
}

fn standard_normal(rng: &mut dyn RngCore) -> f64 {
    let u1 = (1.0 - rand01(rng)).clamp(f64::MIN_POSITIVE, 1.0);
    let u2 = rand01(rng);

    let r = (-2.0 * u1.ln()).sqrt();
    let theta = 2.0 * core::f64::consts::PI * u2;

    r * theta.cos()
}
