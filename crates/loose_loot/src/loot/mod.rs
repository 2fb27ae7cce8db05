//! Loose-loot generation: spawn point selection, item sampling, and item composition.
//!
//! A map's [`LooseLoot`] distribution lists forced spawn points, probabilistic spawn
//! points and the `{mean, std}` statistics used to pick how many of them get loot.
//! [`generator::LootGenerator`] turns it into populated [`SpawnpointTemplate`]s.
use std::collections::HashMap;

use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod compose;
pub mod distribution;
pub mod events;
pub mod filter;
pub mod forced;
pub mod generator;
pub mod ids;
pub mod items;
pub mod selection;

pub type ItemId = String;
pub type TemplateId = String;

/// Slot name for cartridges inside magazines and ammo boxes.
pub const CARTRIDGES_SLOT: &str = "cartridges";

/// Mutable per-instance item state.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Upd {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub stack_objects_count: Option<u32>,
}

/// One record of an item tree.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    #[cfg_attr(feature = "serde", serde(rename = "_id"))]
    pub id: ItemId,
    #[cfg_attr(feature = "serde", serde(rename = "_tpl"))]
    pub tpl: TemplateId,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "parentId", default, skip_serializing_if = "Option::is_none")
    )]
    pub parent_id: Option<ItemId>,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "slotId", default, skip_serializing_if = "Option::is_none")
    )]
    pub slot_id: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub location: Option<u32>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub upd: Option<Upd>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, tpl: impl Into<TemplateId>) -> Self {
        Self {
            id: id.into(),
            tpl: tpl.into(),
            parent_id: None,
            slot_id: None,
            location: None,
            upd: None,
        }
    }

    /// Attach this item to `parent_id` in `slot_id`.
    pub fn with_parent(mut self, parent_id: impl Into<ItemId>, slot_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self.slot_id = Some(slot_id.into());
        self
    }

    pub fn with_location(mut self, location: u32) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_stack_count(mut self, count: u32) -> Self {
        self.upd = Some(Upd {
            stack_objects_count: Some(count),
        });
        self
    }

    pub fn stack_count(&self) -> Option<u32> {
        self.upd.as_ref().and_then(|u| u.stack_objects_count)
    }
}

/// Occupancy rules and item pool of a spawn point.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "PascalCase"))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnpointTemplate {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_always_spawn: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_static: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub use_gravity: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub random_rotation: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub position: Vec3,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rotation: Vec3,
    #[cfg_attr(feature = "serde", serde(default))]
    pub root: ItemId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub items: Vec<Item>,
}

impl SpawnpointTemplate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.root = items.first().map(|i| i.id.clone()).unwrap_or_default();
        self.items = items;
        self
    }

    pub fn with_always_spawn(mut self, always: bool) -> Self {
        self.is_always_spawn = always;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Replace the item pool with a composed tree and point `root` at its first record.
    pub fn set_loot(&mut self, items: Vec<Item>) {
        if let Some(first) = items.first() {
            self.root = first.id.clone();
        }
        self.items = items;
    }

    /// The record `root` refers to.
    pub fn root_item(&self) -> Option<&Item> {
        self.items.iter().find(|i| i.id == self.root)
    }
}

/// Opaque identifier of a drawable item tree; matches an [`Item::id`] in the pool.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComposedKey {
    pub key: String,
}

impl ComposedKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Relative weight of one item tree at a spawn point.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDistribution {
    pub composed_key: ComposedKey,
    pub relative_probability: f64,
}

impl ItemDistribution {
    pub fn new(key: impl Into<String>, relative_probability: f64) -> Self {
        Self {
            composed_key: ComposedKey::new(key),
            relative_probability,
        }
    }
}

/// A map location that may be populated with loot.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Spawnpoint {
    pub location_id: String,
    /// Chance of the point itself being chosen, in [0, 1]. `1.0` marks a guaranteed point.
    pub probability: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub template: Option<SpawnpointTemplate>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub item_distribution: Vec<ItemDistribution>,
}

impl Spawnpoint {
    pub fn new(location_id: impl Into<String>, probability: f64, template: SpawnpointTemplate) -> Self {
        Self {
            location_id: location_id.into(),
            probability,
            template: Some(template),
            item_distribution: Vec::new(),
        }
    }

    pub fn with_distribution(mut self, item_distribution: Vec<ItemDistribution>) -> Self {
        self.item_distribution = item_distribution;
        self
    }

    pub fn is_always_spawn(&self) -> bool {
        self.template.as_ref().is_some_and(|t| t.is_always_spawn)
    }

    /// Template id used for blacklists and logging, falling back to the location id.
    pub fn template_id(&self) -> &str {
        self.template
            .as_ref()
            .map(|t| t.id.as_str())
            .unwrap_or(self.location_id.as_str())
    }
}

/// A spawn point populated regardless of the statistical draw.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct ForcedSpawnpoint {
    pub location_id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub probability: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub template: Option<SpawnpointTemplate>,
}

impl ForcedSpawnpoint {
    pub fn new(location_id: impl Into<String>, template: SpawnpointTemplate) -> Self {
        Self {
            location_id: location_id.into(),
            probability: None,
            template: Some(template),
        }
    }
}

impl From<Spawnpoint> for ForcedSpawnpoint {
    fn from(point: Spawnpoint) -> Self {
        Self {
            location_id: point.location_id,
            probability: Some(point.probability),
            template: point.template,
        }
    }
}

/// Mean and standard deviation of the number of spawn points to populate.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpawnpointCount {
    pub mean: f64,
    pub std: f64,
}

impl SpawnpointCount {
    pub fn new(mean: f64, std: f64) -> Self {
        Self { mean, std }
    }
}

/// Loose-loot distribution of a single map.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LooseLoot {
    pub spawnpoint_count: SpawnpointCount,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spawnpoints_forced: Vec<ForcedSpawnpoint>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub spawnpoints: Vec<Spawnpoint>,
}

/// One candidate cartridge for a caliber.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct StaticAmmoDetails {
    pub tpl: TemplateId,
    pub relative_probability: f64,
}

impl StaticAmmoDetails {
    pub fn new(tpl: impl Into<TemplateId>, relative_probability: f64) -> Self {
        Self {
            tpl: tpl.into(),
            relative_probability,
        }
    }
}

/// Caliber to candidate cartridges.
pub type StaticAmmo = HashMap<String, Vec<StaticAmmoDetails>>;
