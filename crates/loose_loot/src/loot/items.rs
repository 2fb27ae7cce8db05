//! Item template database consulted when composing loot.
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::loot::TemplateId;

/// Base class of an item template, as far as loot composition cares.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum ItemCategory {
    Money,
    Ammo,
    AmmoBox,
    Magazine,
    Weapon,
    Armor,
    #[default]
    Other,
}

impl ItemCategory {
    /// Stackable loose items whose stack size is randomized on spawn.
    pub fn is_stackable_loot(self) -> bool {
        matches!(self, ItemCategory::Money | ItemCategory::Ammo)
    }
}

/// Cartridge slot of a magazine.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MagazineProps {
    pub capacity: u32,
    /// Compatible cartridge templates, in preference order.
    pub cartridges: Vec<TemplateId>,
}

/// Fixed contents of an ammo box.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AmmoBoxProps {
    pub cartridge_tpl: TemplateId,
    pub count: u32,
}

/// Static definition of an item.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct ItemTemplate {
    pub id: TemplateId,
    pub name: String,
    pub category: ItemCategory,
    pub stack_max_size: u32,
    pub stack_min_random: u32,
    pub stack_max_random: u32,
    /// Caliber of a cartridge template.
    pub caliber: Option<String>,
    pub magazine: Option<MagazineProps>,
    pub ammo_box: Option<AmmoBoxProps>,
}

impl Default for ItemTemplate {
    fn default() -> Self {
        Self {
            id: TemplateId::new(),
            name: String::new(),
            category: ItemCategory::Other,
            stack_max_size: 1,
            stack_min_random: 1,
            stack_max_random: 1,
            caliber: None,
            magazine: None,
            ammo_box: None,
        }
    }
}

impl ItemTemplate {
    pub fn new(id: impl Into<TemplateId>, category: ItemCategory) -> Self {
        Self {
            id: id.into(),
            category,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set stack size limits: the hard maximum and the randomized spawn range.
    pub fn with_stack(mut self, max_size: u32, min_random: u32, max_random: u32) -> Self {
        self.stack_max_size = max_size;
        self.stack_min_random = min_random;
        self.stack_max_random = max_random;
        self
    }

    pub fn with_caliber(mut self, caliber: impl Into<String>) -> Self {
        self.caliber = Some(caliber.into());
        self
    }

    pub fn with_magazine(mut self, capacity: u32, cartridges: Vec<TemplateId>) -> Self {
        self.magazine = Some(MagazineProps {
            capacity,
            cartridges,
        });
        self
    }

    pub fn with_ammo_box(mut self, cartridge_tpl: impl Into<TemplateId>, count: u32) -> Self {
        self.ammo_box = Some(AmmoBoxProps {
            cartridge_tpl: cartridge_tpl.into(),
            count,
        });
        self
    }
}

/// Lookup table of [`ItemTemplate`]s by id.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Default)]
pub struct ItemDatabase {
    templates: HashMap<TemplateId, ItemTemplate>,
}

impl ItemDatabase {
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            templates: HashMap::with_capacity(cap),
        }
    }

    /// Insert or replace a template.
    pub fn insert(&mut self, template: ItemTemplate) -> &mut Self {
        self.templates.insert(template.id.clone(), template);
        self
    }

    pub fn with_template(mut self, template: ItemTemplate) -> Self {
        self.insert(template);
        self
    }

    pub fn get(&self, tpl: &str) -> Option<&ItemTemplate> {
        self.templates.get(tpl)
    }

    /// Like [`ItemDatabase::get`] but reports a missing template as [`Error::UnknownTemplate`].
    pub fn require(&self, tpl: &str) -> Result<&ItemTemplate> {
        self.get(tpl).ok_or_else(|| Error::UnknownTemplate {
            tpl: tpl.to_owned(),
        })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl FromIterator<ItemTemplate> for ItemDatabase {
    fn from_iter<I: IntoIterator<Item = ItemTemplate>>(iter: I) -> Self {
        let mut db = ItemDatabase::new();
        for template in iter {
            db.insert(template);
        }
        db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_reports_unknown_template() {
        let db = ItemDatabase::new().with_template(ItemTemplate::new("known", ItemCategory::Other));
        assert!(db.require("known").is_ok());
        let err = db.require("missing").unwrap_err();
        assert!(matches!(err, Error::UnknownTemplate { ref tpl } if tpl == "missing"));
    }

    #[test]
    fn builders_fill_props() {
        let mag = ItemTemplate::new("mag", ItemCategory::Magazine)
            .with_name("30-round mag")
            .with_magazine(30, vec!["ammo_a".into()]);
        assert_eq!(mag.magazine.as_ref().map(|m| m.capacity), Some(30));
        assert_eq!(mag.stack_max_size, 1);

        let money = ItemTemplate::new("rub", ItemCategory::Money).with_stack(500000, 100, 5000);
        assert!(money.category.is_stackable_loot());
        assert_eq!(money.stack_max_random, 5000);
    }

    #[test]
    fn collects_from_iterator_replacing_duplicates() {
        let db: ItemDatabase = [
            ItemTemplate::new("a", ItemCategory::Other).with_name("first"),
            ItemTemplate::new("a", ItemCategory::Other).with_name("second"),
            ItemTemplate::new("b", ItemCategory::Weapon),
        ]
        .into_iter()
        .collect();
        assert_eq!(db.len(), 2);
        assert_eq!(db.get("a").unwrap().name, "second");
    }
}
