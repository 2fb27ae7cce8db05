//! Per-map loose-loot configuration.
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::loot::TemplateId;

/// Multiplier used for maps without an explicit entry.
pub const DEFAULT_LOOSE_LOOT_MULTIPLIER: f64 = 1.0;

/// Configuration for loose-loot generation across maps.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct LocationConfig {
    /// Map name to spawn point count multiplier.
    pub loose_loot_multiplier: HashMap<String, f64>,
    /// Map name to spawn point template ids that never receive loot.
    pub loose_loot_blacklist: HashMap<String, Vec<String>>,
    /// Map name to item templates that spawn at only one of their forced positions.
    pub forced_loot_single_spawn_by_id: HashMap<String, Vec<TemplateId>>,
    /// Chance (0–100) that a loose magazine spawns loaded.
    pub magazine_loot_has_ammo_chance_percent: f64,
    /// Minimum fill (0–100) of a loaded loose magazine.
    pub min_fill_loose_magazine_percent: f64,
    /// Item templates spawned without their child items.
    pub tpls_to_strip_child_items_from: Vec<TemplateId>,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            loose_loot_multiplier: HashMap::new(),
            loose_loot_blacklist: HashMap::new(),
            forced_loot_single_spawn_by_id: HashMap::new(),
            magazine_loot_has_ammo_chance_percent: 50.0,
            min_fill_loose_magazine_percent: 50.0,
            tpls_to_strip_child_items_from: Vec::new(),
        }
    }
}

impl LocationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the spawn point count multiplier for `location`.
    pub fn with_multiplier(mut self, location: impl Into<String>, multiplier: f64) -> Self {
        self.loose_loot_multiplier.insert(location.into(), multiplier);
        self
    }

    /// Sets the blacklisted spawn point ids for `location`.
    pub fn with_blacklist<I, S>(mut self, location: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.loose_loot_blacklist
            .insert(location.into(), ids.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the single-spawn forced item templates for `location`.
    pub fn with_forced_single_spawn<I, S>(mut self, location: impl Into<String>, tpls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TemplateId>,
    {
        self.forced_loot_single_spawn_by_id
            .insert(location.into(), tpls.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the loose magazine ammo chance and minimum fill, both in percent.
    pub fn with_magazine_fill(mut self, has_ammo_chance: f64, min_fill: f64) -> Self {
        self.magazine_loot_has_ammo_chance_percent = has_ammo_chance;
        self.min_fill_loose_magazine_percent = min_fill;
        self
    }

    /// Adds an item template whose children are stripped on spawn.
    pub fn with_stripped_children(mut self, tpl: impl Into<TemplateId>) -> Self {
        self.tpls_to_strip_child_items_from.push(tpl.into());
        self
    }

    /// Multiplier for `location`, or [`DEFAULT_LOOSE_LOOT_MULTIPLIER`].
    pub fn multiplier_for(&self, location: &str) -> f64 {
        self.loose_loot_multiplier
            .get(location)
            .copied()
            .unwrap_or(DEFAULT_LOOSE_LOOT_MULTIPLIER)
    }

    /// Blacklisted spawn point ids for `location`.
    pub fn blacklist_for(&self, location: &str) -> &[String] {
        self.loose_loot_blacklist
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Single-spawn forced item templates for `location`.
    pub fn forced_single_spawn_for(&self, location: &str) -> &[TemplateId] {
        self.forced_loot_single_spawn_by_id
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn strips_children_of(&self, tpl: &str) -> bool {
        self.tpls_to_strip_child_items_from.iter().any(|t| t == tpl)
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        for (location, multiplier) in &self.loose_loot_multiplier {
            if !multiplier.is_finite() || *multiplier < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "loose_loot_multiplier for '{location}' must be finite and >= 0"
                )));
            }
        }
        if !(0.0..=100.0).contains(&self.magazine_loot_has_ammo_chance_percent) {
            return Err(Error::InvalidConfig(
                "magazine_loot_has_ammo_chance_percent must be within 0..=100".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.min_fill_loose_magazine_percent) {
            return Err(Error::InvalidConfig(
                "min_fill_loose_magazine_percent must be within 0..=100".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlisted_map_uses_default_multiplier_and_empty_lists() {
        let config = LocationConfig::new().with_multiplier("factory4_day", 2.5);
        assert_eq!(config.multiplier_for("factory4_day"), 2.5);
        assert_eq!(config.multiplier_for("bigmap"), DEFAULT_LOOSE_LOOT_MULTIPLIER);
        assert!(config.blacklist_for("bigmap").is_empty());
        assert!(config.forced_single_spawn_for("bigmap").is_empty());
    }

    #[test]
    fn builder_sets_lists() {
        let config = LocationConfig::new()
            .with_blacklist("woods", ["loot_1", "loot_2"])
            .with_forced_single_spawn("woods", ["tpl_key"])
            .with_stripped_children("tpl_armor")
            .with_magazine_fill(75.0, 25.0);
        assert_eq!(config.blacklist_for("woods"), ["loot_1", "loot_2"]);
        assert_eq!(config.forced_single_spawn_for("woods"), ["tpl_key"]);
        assert!(config.strips_children_of("tpl_armor"));
        assert!(!config.strips_children_of("tpl_gun"));
        assert_eq!(config.magazine_loot_has_ammo_chance_percent, 75.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_values() {
        let negative = LocationConfig::new().with_multiplier("m", -1.0);
        assert!(matches!(negative.validate(), Err(Error::InvalidConfig(_))));

        let nan = LocationConfig::new().with_multiplier("m", f64::NAN);
        assert!(nan.validate().is_err());

        let chance = LocationConfig::new().with_magazine_fill(120.0, 10.0);
        assert!(chance.validate().is_err());

        let fill = LocationConfig::new().with_magazine_fill(10.0, -5.0);
        assert!(fill.validate().is_err());
    }
}
