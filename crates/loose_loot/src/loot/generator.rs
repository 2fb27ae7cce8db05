//! High-level runner for generating a map's loose loot.
use rand::RngCore;
use tracing::{info, warn};

use crate::config::LocationConfig;
use crate::error::Result;
use crate::loot::compose::{compose_loot_item, ComposeContext};
use crate::loot::distribution::draw_composed_key;
use crate::loot::events::{EventSink, LootEvent, LootEventKind, SkipReason};
use crate::loot::filter::{filter_items, LootFilter, SeasonalEvents, SeasonalSnapshot};
use crate::loot::forced::add_forced_loot;
use crate::loot::items::ItemDatabase;
use crate::loot::selection::{desired_spawnpoint_count, forced_spawnpoints, select_spawnpoints};
use crate::loot::{LooseLoot, SpawnpointTemplate, StaticAmmo};

/// Result of generating loose loot for a map.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct LootResult {
    /// Populated spawn point templates, forced loot first.
    pub spawnpoints: Vec<SpawnpointTemplate>,
    /// Statistical target for non-forced spawn points.
    pub desired_count: usize,
    /// Templates added as forced loot.
    pub forced_count: usize,
    /// Non-forced spawn points chosen by selection.
    pub selected_count: usize,
    /// Chosen spawn points that produced no loot.
    pub skipped_count: usize,
}

impl LootResult {
    /// Creates a new empty [`LootResult`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-forced spawn points that received loot.
    pub fn placed_count(&self) -> usize {
        self.selected_count - self.skipped_count
    }
}

/// Reference data shared by every generation call.
#[derive(Clone, Copy)]
pub struct LootTables<'a> {
    /// Item templates used to compose loot.
    pub items: &'a ItemDatabase,
    /// Administrative loot blacklist.
    pub filter: &'a dyn LootFilter,
    /// Seasonal event state, queried at the start of each call.
    pub seasonal: &'a dyn SeasonalEvents,
}

impl<'a> LootTables<'a> {
    pub fn new(
        items: &'a ItemDatabase,
        filter: &'a dyn LootFilter,
        seasonal: &'a dyn SeasonalEvents,
    ) -> Self {
        Self {
            items,
            filter,
            seasonal,
        }
    }
}

pub struct LootGenerator<'a> {
    /// Configuration applied to every map.
    pub config: LocationConfig,
    /// Shared reference data.
    pub tables: LootTables<'a>,
}

impl<'a> LootGenerator<'a> {
    pub fn try_new(config: LocationConfig, tables: LootTables<'a>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, tables })
    }

    pub fn new(config: LocationConfig, tables: LootTables<'a>) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "location config must be valid"
        );

        Self { config, tables }
    }

    /// Generates loose loot for `location`, returning the populated templates.
    pub fn generate(
        &self,
        loot: &LooseLoot,
        static_ammo: &StaticAmmo,
        location: &str,
        rng: &mut impl RngCore,
    ) -> Result<LootResult> {
        generate_loose_loot(
            loot,
            static_ammo,
            location,
            &self.config,
            &self.tables,
            rng,
            None,
        )
    }

    pub fn generate_with_events(
        &self,
        loot: &LooseLoot,
        static_ammo: &StaticAmmo,
        location: &str,
        rng: &mut impl RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<LootResult> {
        generate_loose_loot(
            loot,
            static_ammo,
            location,
            &self.config,
            &self.tables,
            rng,
            Some(sink),
        )
    }
}

pub fn generate_loose_loot<R: RngCore>(
    loot: &LooseLoot,
    static_ammo: &StaticAmmo,
    location: &str,
    config: &LocationConfig,
    tables: &LootTables<'_>,
    rng: &mut R,
    sink: Option<&mut dyn EventSink>,
) -> Result<LootResult> {
    if let Some(s) = sink {
        generate_loose_loot_with_events(loot, static_ammo, location, config, tables, rng, s)
    } else {
        generate_loose_loot_with_events(loot, static_ammo, location, config, tables, rng, &mut ())
    }
}

/// Generates loose loot for one map.
///
/// Works on owned copies of the distribution's templates; `loot` is never modified.
/// Only corrupt data fails the call (see [`crate::error::Error::is_data_error`]);
/// thin data is logged, reported to `sink` and skipped.
pub fn generate_loose_loot_with_events<R: RngCore>(
    loot: &LooseLoot,
    static_ammo: &StaticAmmo,
    location: &str,
    config: &LocationConfig,
    tables: &LootTables<'_>,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<LootResult> {
    // Event state may change between calls.
    let seasonal = SeasonalSnapshot::capture(tables.seasonal);
    let ctx = ComposeContext::new(tables.items, static_ammo, config);

    let forced = forced_spawnpoints(loot);
    if sink.wants(LootEventKind::GenerationStarted) {
        sink.send(LootEvent::GenerationStarted {
            location: location.to_owned(),
            spawnpoint_count: loot.spawnpoints.len(),
            forced_count: forced.len(),
        });
    }

    let mut spawnpoints: Vec<SpawnpointTemplate> = Vec::new();
    let forced_count = add_forced_loot(&ctx, location, forced, &seasonal, &mut spawnpoints, rng, sink)?;

    let desired_count = desired_spawnpoint_count(
        loot.spawnpoint_count,
        config.multiplier_for(location),
        rng,
    );
    let selection = select_spawnpoints(
        location,
        loot.spawnpoints.clone(),
        desired_count,
        config.blacklist_for(location),
        rng,
        sink,
    );
    if sink.wants(LootEventKind::TargetComputed) {
        sink.send(LootEvent::TargetComputed {
            location: location.to_owned(),
            desired: desired_count,
            guaranteed: selection.guaranteed_count,
        });
    }

    let selected_count = selection.chosen.len();
    let mut skipped_count = 0;
    for point in selection.chosen {
        let Some(mut template) = point.template else {
            warn!(
                "Spawn point '{}' on '{}' is missing its template; skipping.",
                point.location_id, location
            );
            skip(sink, &point.location_id, SkipReason::MissingTemplate);
            skipped_count += 1;
            continue;
        };

        filter_items(&mut template.items, tables.filter, &seasonal);
        if template.items.is_empty() {
            warn!(
                "Spawn point '{}' has no items after filtering; skipping.",
                template.id
            );
            skip(sink, &template.id, SkipReason::EmptyPool);
            skipped_count += 1;
            continue;
        }

        let Some(key) = draw_composed_key(&point.item_distribution, &template.items, rng) else {
            warn!("Loot pool for spawn point '{}' is empty; skipping.", template.id);
            skip(sink, &template.id, SkipReason::NoValidItems);
            skipped_count += 1;
            continue;
        };

        let items = compose_loot_item(&ctx, &key, &template.id, &template.items, rng)?;
        // Root id changes when a tree is re-keyed.
        template.set_loot(items);

        if sink.wants(LootEventKind::LootPlaced) {
            sink.send(LootEvent::LootPlaced {
                spawnpoint_id: template.id.clone(),
                root_tpl: template.root_item().map(|i| i.tpl.clone()).unwrap_or_default(),
                item_count: template.items.len(),
            });
        }
        spawnpoints.push(template);
    }

    let result = LootResult {
        spawnpoints,
        desired_count,
        forced_count,
        selected_count,
        skipped_count,
    };

    info!(
        "Location '{}': {} forced, {} of {} desired spawn points populated ({} skipped).",
        location,
        result.forced_count,
        result.placed_count(),
        result.desired_count,
        result.skipped_count,
    );

    if sink.wants(LootEventKind::GenerationFinished) {
        sink.send(LootEvent::GenerationFinished {
            location: location.to_owned(),
            result: result.clone(),
        });
    }

    Ok(result)
}

fn skip(sink: &mut dyn EventSink, spawnpoint_id: &str, reason: SkipReason) {
    if sink.wants(LootEventKind::SpawnpointSkipped) {
        sink.send(LootEvent::SpawnpointSkipped {
            spawnpoint_id: spawnpoint_id.to_owned(),
            reason,
        });
    }
}
