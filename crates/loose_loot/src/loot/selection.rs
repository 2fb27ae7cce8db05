//! Spawn point selection for a map.
//!
//! Picks which spawn points receive loot:
//! - [forced_spawnpoints]: explicit forced points plus every point flagged always-spawn.
//! - [desired_spawnpoint_count]: the statistical target, `round(multiplier × normal(mean, std))`.
//! - [select_spawnpoints]: guaranteed (`probability == 1`) points plus a weighted draw
//!   without replacement over the remaining points, deduplicated by location id.
//!
//! Forced points are not counted against the target. When the data cannot meet the
//! target the selection is simply smaller; points are never fabricated.
use std::collections::HashMap;

use rand::RngCore;
use tracing::debug;

use crate::loot::events::{EventSink, LootEvent, LootEventKind};
use crate::loot::{ForcedSpawnpoint, LooseLoot, Spawnpoint, SpawnpointCount};
use crate::sampling::{normal, WeightedSampler};

/// Spawn points chosen for a map.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Statistical target for non-forced points.
    pub desired_count: usize,
    /// Points included because their probability is 1.
    pub guaranteed_count: usize,
    /// Points dropped because they are blacklisted.
    pub blacklisted_count: usize,
    /// Chosen points, unique by location id.
    pub chosen: Vec<Spawnpoint>,
}

impl Selection {
    /// Whether fewer points were found than the target asked for.
    pub fn is_short(&self) -> bool {
        self.chosen.len() < self.desired_count
    }
}

/// Explicit forced points followed by every spawn point flagged always-spawn.
pub fn forced_spawnpoints(loot: &LooseLoot) -> Vec<ForcedSpawnpoint> {
    loot.spawnpoints_forced
        .iter()
        .cloned()
        .chain(
            loot.spawnpoints
                .iter()
                .filter(|p| p.is_always_spawn())
                .cloned()
                .map(ForcedSpawnpoint::from),
        )
        .collect()
}

/// Number of non-forced spawn points to populate.
pub fn desired_spawnpoint_count<R: RngCore>(
    count: SpawnpointCount,
    multiplier: f64,
    rng: &mut R,
) -> usize {
    let drawn = normal(count.mean, count.std, rng);
    let target = (multiplier * drawn).round();
    if target.is_finite() && target > 0.0 {
        target as usize
    } else {
        0
    }
}

/// Choose the non-forced spawn points for a map.
///
/// `blacklist` holds spawn point ids (template or location ids) that never get loot.
/// Always-spawn points are skipped here; they are handled as forced loot.
pub fn select_spawnpoints<R: RngCore>(
    location: &str,
    spawnpoints: Vec<Spawnpoint>,
    desired_count: usize,
    blacklist: &[String],
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Selection {
    let mut guaranteed: Vec<Spawnpoint> = Vec::new();
    let mut pool: WeightedSampler<String, Spawnpoint> = WeightedSampler::with_capacity(spawnpoints.len());
    let mut blacklisted_count = 0;

    for point in spawnpoints {
        if is_blacklisted(&point, blacklist) {
            debug!("Ignoring loose loot location: {}.", point.template_id());
            blacklisted_count += 1;
            if sink.wants(LootEventKind::SpawnpointBlacklisted) {
                sink.send(LootEvent::SpawnpointBlacklisted {
                    location: location.to_owned(),
                    spawnpoint_id: point.template_id().to_owned(),
                });
            }
            continue;
        }

        if point.is_always_spawn() {
            continue;
        }

        if point.probability >= 1.0 {
            guaranteed.push(point);
            continue;
        }

        let key = point.location_id.clone();
        let weight = point.probability;
        if let Err(e) = pool.insert(key, weight, point) {
            debug!("Skipping spawn point in '{}': {}.", location, e);
        }
    }

    let guaranteed_count = guaranteed.len();
    let mut chosen = guaranteed;

    let random_count = desired_count.saturating_sub(chosen.len());
    if random_count > 0 && !pool.is_empty() {
        let keys = pool.draw(random_count, false, rng);
        chosen.extend(pool.into_payloads(&keys));
    }

    let chosen = dedup_by_location(chosen);

    let selection = Selection {
        desired_count,
        guaranteed_count,
        blacklisted_count,
        chosen,
    };

    if selection.is_short() {
        debug!(
            "Requested {} spawn points on '{}' but only {} are available.",
            desired_count,
            location,
            selection.chosen.len()
        );
        if sink.wants(LootEventKind::CountShortfall) {
            sink.send(LootEvent::CountShortfall {
                location: location.to_owned(),
                requested: desired_count,
                found: selection.chosen.len(),
            });
        }
    }

    selection
}

/// Keep one spawn point per location id. A later duplicate replaces the earlier one
/// in the earlier one's position.
pub fn dedup_by_location(points: Vec<Spawnpoint>) -> Vec<Spawnpoint> {
    let mut slot_of: HashMap<String, usize> = HashMap::with_capacity(points.len());
    let mut out: Vec<Spawnpoint> = Vec::with_capacity(points.len());
    for point in points {
        match slot_of.get(&point.location_id) {
            Some(&slot) => out[slot] = point,
            None => {
                slot_of.insert(point.location_id.clone(), out.len());
                out.push(point);
            }
        }
    }
    out
}

fn is_blacklisted(point: &Spawnpoint, blacklist: &[String]) -> bool {
    blacklist
        .iter()
        .any(|id| *id == point.location_id || *id == point.template_id())
}
