//! Item pool filtering: administrative blacklist and out-of-season items.
//!
//! Both collaborators are traits so hosts can back them with live services;
//! [`ItemBlacklist`] and [`SeasonalState`] are plain in-memory implementations.
//! The generator queries them at the start of every call and never caches the answers.
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::loot::{Item, TemplateId};

/// Decides whether an item template may appear as loot.
pub trait LootFilter {
    fn is_lootable_item_blacklisted(&self, tpl: &str) -> bool;
}

/// Reports seasonal event state.
pub trait SeasonalEvents {
    /// Whether any seasonal event is currently running.
    fn seasonal_event_enabled(&self) -> bool;

    /// Item templates that belong to events that are not running.
    fn inactive_seasonal_event_items(&self) -> HashSet<TemplateId>;
}

/// Set of blacklisted item templates.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Default)]
pub struct ItemBlacklist {
    tpls: HashSet<TemplateId>,
}

impl ItemBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tpl(mut self, tpl: impl Into<TemplateId>) -> Self {
        self.tpls.insert(tpl.into());
        self
    }

    pub fn insert(&mut self, tpl: impl Into<TemplateId>) -> bool {
        self.tpls.insert(tpl.into())
    }
}

impl<T: Into<TemplateId>> FromIterator<T> for ItemBlacklist {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            tpls: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl LootFilter for ItemBlacklist {
    fn is_lootable_item_blacklisted(&self, tpl: &str) -> bool {
        self.tpls.contains(tpl)
    }
}

/// Nothing is blacklisted.
impl LootFilter for () {
    #[inline]
    fn is_lootable_item_blacklisted(&self, _tpl: &str) -> bool {
        false
    }
}

/// Snapshot of seasonal event state.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Default)]
pub struct SeasonalState {
    pub active: bool,
    pub inactive_items: HashSet<TemplateId>,
}

impl SeasonalState {
    /// An event is running; no items are held back.
    pub fn active() -> Self {
        Self {
            active: true,
            inactive_items: HashSet::new(),
        }
    }

    /// No event is running; `items` are held back.
    pub fn inactive<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TemplateId>,
    {
        Self {
            active: false,
            inactive_items: items.into_iter().map(Into::into).collect(),
        }
    }
}

impl SeasonalEvents for SeasonalState {
    fn seasonal_event_enabled(&self) -> bool {
        self.active
    }

    fn inactive_seasonal_event_items(&self) -> HashSet<TemplateId> {
        self.inactive_items.clone()
    }
}

/// Seasonal rules resolved once per generation call.
#[derive(Debug, Clone, Default)]
pub struct SeasonalSnapshot {
    pub event_active: bool,
    pub inactive_items: HashSet<TemplateId>,
}

impl SeasonalSnapshot {
    pub fn capture(events: &dyn SeasonalEvents) -> Self {
        Self {
            event_active: events.seasonal_event_enabled(),
            inactive_items: events.inactive_seasonal_event_items(),
        }
    }

    /// Whether `tpl` must be held back because its event is not running.
    pub fn excludes(&self, tpl: &str) -> bool {
        !self.event_active && self.inactive_items.contains(tpl)
    }
}

/// Remove blacklisted and out-of-season items from `items`, returning how many were removed.
///
/// Running it again on its own output removes nothing.
pub fn filter_items(
    items: &mut Vec<Item>,
    filter: &dyn LootFilter,
    seasonal: &SeasonalSnapshot,
) -> usize {
    let before = items.len();
    items.retain(|item| !filter.is_lootable_item_blacklisted(&item.tpl));
    if !seasonal.event_active {
        items.retain(|item| !seasonal.inactive_items.contains(&item.tpl));
    }
    before - items.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<Item> {
        vec![
            Item::new("1", "tpl_ok"),
            Item::new("2", "tpl_banned"),
            Item::new("3", "tpl_christmas_tree"),
            Item::new("4", "tpl_ok"),
        ]
    }

    #[test]
    fn removes_blacklisted_templates() {
        let mut items = pool();
        let blacklist = ItemBlacklist::new().with_tpl("tpl_banned");
        let removed = filter_items(&mut items, &blacklist, &SeasonalSnapshot::capture(&SeasonalState::active()));
        assert_eq!(removed, 1);
        assert!(items.iter().all(|i| i.tpl != "tpl_banned"));
        assert!(items.iter().any(|i| i.tpl == "tpl_christmas_tree"));
    }

    #[test]
    fn removes_seasonal_items_only_when_event_inactive() {
        let inactive = SeasonalSnapshot::capture(&SeasonalState::inactive(["tpl_christmas_tree"]));
        let mut items = pool();
        assert_eq!(filter_items(&mut items, &(), &inactive), 1);
        assert!(items.iter().all(|i| i.tpl != "tpl_christmas_tree"));

        let mut running = SeasonalState::inactive(["tpl_christmas_tree"]);
        running.active = true;
        let mut items = pool();
        assert_eq!(filter_items(&mut items, &(), &SeasonalSnapshot::capture(&running)), 0);
    }

    #[test]
    fn filtering_is_idempotent() {
        let blacklist: ItemBlacklist = ["tpl_banned"].into_iter().collect();
        let seasonal = SeasonalSnapshot::capture(&SeasonalState::inactive(["tpl_christmas_tree"]));
        let mut items = pool();
        filter_items(&mut items, &blacklist, &seasonal);
        let once = items.clone();
        assert_eq!(filter_items(&mut items, &blacklist, &seasonal), 0);
        assert_eq!(items, once);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn snapshot_excludes_only_inactive_season() {
        let snap = SeasonalSnapshot::capture(&SeasonalState::inactive(["x"]));
        assert!(snap.excludes("x"));
        assert!(!snap.excludes("y"));
        assert!(!SeasonalSnapshot::capture(&SeasonalState::active()).excludes("x"));
    }
}
