#![forbid(unsafe_code)]
//! loose_loot: Probabilistic placement of loose loot across a map's spawn points.
//!
//! Modules:
//! - sampling: weighted draws with and without replacement, normal and integer helpers
//! - loot: data model, spawn point selection, item sampling, loot composition, events
//! - config: per-location multipliers, blacklists and magazine fill settings
//!
//! Generation is deterministic for a given RNG seed.
pub mod config;
pub mod error;
pub mod loot;
pub mod sampling;

/// Convenient re-exports for common types. Import with `use loose_loot::prelude::*;`.
pub mod prelude {
    pub use crate::config::LocationConfig;
    pub use crate::error::{Error, Result};
    pub use crate::loot::compose::{compose_loot_item, ComposeContext};
    pub use crate::loot::distribution::{build_item_sampler, draw_composed_key};
    pub use crate::loot::events::{
        EventSink, FnSink, LootEvent, LootEventKind, MultiSink, SkipReason, VecSink,
    };
    pub use crate::loot::filter::{
        filter_items, ItemBlacklist, LootFilter, SeasonalEvents, SeasonalSnapshot, SeasonalState,
    };
    pub use crate::loot::forced::add_forced_loot;
    pub use crate::loot::generator::{
        generate_loose_loot, generate_loose_loot_with_events, LootGenerator, LootResult,
        LootTables,
    };
    pub use crate::loot::items::{
        AmmoBoxProps, ItemCategory, ItemDatabase, ItemTemplate, MagazineProps,
    };
    pub use crate::loot::selection::{
        desired_spawnpoint_count, forced_spawnpoints, select_spawnpoints, Selection,
    };
    pub use crate::loot::{
        ComposedKey, ForcedSpawnpoint, Item, ItemDistribution, LooseLoot, Spawnpoint,
        SpawnpointCount, SpawnpointTemplate, StaticAmmo, StaticAmmoDetails, Upd,
    };
    pub use crate::sampling::{normal, rand01, FenwickTree, WeightedSampler};
}
