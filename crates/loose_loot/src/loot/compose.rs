//! Turning a drawn composed key into a concrete item tree.
//!
//! Stackable money and ammo get a randomized stack size, ammo boxes are filled with
//! their fixed cartridge, loose magazines may be loaded with a cartridge drawn from
//! the static-ammo table, and everything else (weapons with attachments, armor with
//! plates, plain items) is cloned from the spawn point's pool with fresh ids.
use rand::RngCore;
use tracing::{debug, warn};

use crate::config::LocationConfig;
use crate::error::{Error, Result};
use crate::loot::ids::{collect_tree, generate_id, replace_ids, validate_tree};
use crate::loot::items::{ItemCategory, ItemDatabase, ItemTemplate};
use crate::loot::{Item, ItemId, StaticAmmo, TemplateId, CARTRIDGES_SLOT};
use crate::sampling::{chance_percent, random_int_inclusive, WeightedSampler};

/// Read-only reference data needed to compose loot.
#[derive(Clone, Copy)]
pub struct ComposeContext<'a> {
    pub items: &'a ItemDatabase,
    pub static_ammo: &'a StaticAmmo,
    pub config: &'a LocationConfig,
}

impl<'a> ComposeContext<'a> {
    pub fn new(items: &'a ItemDatabase, static_ammo: &'a StaticAmmo, config: &'a LocationConfig) -> Self {
        Self {
            items,
            static_ammo,
            config,
        }
    }
}

/// Compose the item tree for `key`, which must name an item in `pool`.
///
/// The first record of the result is the root. Fails with
/// [`Error::UnresolvedComposedKey`] if `key` is not in the pool and with
/// [`Error::UnknownTemplate`] if a template cannot be found.
pub fn compose_loot_item<R: RngCore>(
    ctx: &ComposeContext<'_>,
    key: &str,
    spawnpoint_id: &str,
    pool: &[Item],
    rng: &mut R,
) -> Result<Vec<Item>> {
    let chosen = pool
        .iter()
        .find(|i| i.id == key)
        .ok_or_else(|| Error::UnresolvedComposedKey {
            key: key.to_owned(),
            spawnpoint: spawnpoint_id.to_owned(),
        })?;
    let template = ctx.items.require(&chosen.tpl)?;

    let mut tree = match template.category {
        category if category.is_stackable_loot() => {
            vec![Item::new(generate_id(rng), &template.id).with_stack_count(random_stack_count(template, rng))]
        }
        ItemCategory::AmmoBox => {
            let root = Item::new(generate_id(rng), &template.id);
            let cartridges = fill_ammo_box(ctx.items, template, &root.id, rng)?;
            std::iter::once(root).chain(cartridges).collect()
        }
        ItemCategory::Magazine => {
            let root = Item::new(generate_id(rng), &template.id);
            let cartridges =
                if chance_percent(ctx.config.magazine_loot_has_ammo_chance_percent, rng) {
                    fill_magazine(ctx, template, &root.id, rng)?
                } else {
                    Vec::new()
                };
            std::iter::once(root).chain(cartridges).collect()
        }
        _ => {
            let tree = collect_tree(pool, key).ok_or_else(|| Error::UnresolvedComposedKey {
                key: key.to_owned(),
                spawnpoint: spawnpoint_id.to_owned(),
            })?;
            let mut tree = replace_ids(tree, rng);
            if ctx.config.strips_children_of(&chosen.tpl) {
                tree.truncate(1);
            }
            tree
        }
    };

    if let Some(root) = tree.first_mut() {
        root.parent_id = None;
        root.slot_id = None;
    }
    validate_tree(&tree)?;
    Ok(tree)
}

/// Random stack size for a money or ammo spawn.
pub fn random_stack_count<R: RngCore>(template: &ItemTemplate, rng: &mut R) -> u32 {
    if template.stack_max_size <= 1 {
        return 1;
    }
    let count = random_int_inclusive(
        i64::from(template.stack_min_random),
        i64::from(template.stack_max_random),
        rng,
    );
    (count.max(1) as u32).min(template.stack_max_size)
}

/// Cartridge stacks for an ammo box.
pub fn fill_ammo_box<R: RngCore>(
    items: &ItemDatabase,
    ammo_box: &ItemTemplate,
    box_id: &str,
    rng: &mut R,
) -> Result<Vec<Item>> {
    let Some(props) = ammo_box.ammo_box.as_ref() else {
        warn!("Ammo box '{}' has no cartridge definition; spawning empty.", ammo_box.id);
        return Ok(Vec::new());
    };
    let cartridge = items.require(&props.cartridge_tpl)?;
    Ok(cartridge_stacks(box_id, &cartridge.id, props.count, cartridge.stack_max_size, rng))
}

/// Cartridge stacks loaded into a loose magazine.
pub fn fill_magazine<R: RngCore>(
    ctx: &ComposeContext<'_>,
    magazine: &ItemTemplate,
    magazine_id: &str,
    rng: &mut R,
) -> Result<Vec<Item>> {
    let Some(props) = magazine.magazine.as_ref().filter(|p| p.capacity > 0 && !p.cartridges.is_empty())
    else {
        debug!("Magazine '{}' has no usable cartridge slot; spawning empty.", magazine.id);
        return Ok(Vec::new());
    };

    // Caliber of a random compatible cartridge decides which ammo table to draw from.
    let pick = random_int_inclusive(0, props.cartridges.len() as i64 - 1, rng) as usize;
    let caliber = ctx
        .items
        .get(&props.cartridges[pick])
        .and_then(|t| t.caliber.as_deref());
    let cartridge_tpl = draw_ammo_tpl(ctx.static_ammo, caliber, &props.cartridges, rng);
    let cartridge = ctx.items.require(&cartridge_tpl)?;

    let min_fill = ctx.config.min_fill_loose_magazine_percent / 100.0;
    let min_count = ((min_fill * f64::from(props.capacity)).round() as i64).clamp(0, i64::from(props.capacity));
    let count = random_int_inclusive(min_count, i64::from(props.capacity), rng) as u32;

    Ok(cartridge_stacks(
        magazine_id,
        &cartridge.id,
        count,
        cartridge.stack_max_size,
        rng,
    ))
}

/// Draw a cartridge for `caliber` from the static-ammo table, limited to `compatible`.
///
/// Falls back to the first compatible cartridge when the caliber is unknown or none of
/// its entries fit.
pub fn draw_ammo_tpl<R: RngCore>(
    static_ammo: &StaticAmmo,
    caliber: Option<&str>,
    compatible: &[TemplateId],
    rng: &mut R,
) -> TemplateId {
    let fallback = || compatible.first().cloned().unwrap_or_default();
    let Some(candidates) = caliber.and_then(|c| static_ammo.get(c)) else {
        return fallback();
    };

    let mut sampler: WeightedSampler<TemplateId> = WeightedSampler::with_capacity(candidates.len());
    for ammo in candidates {
        if !compatible.contains(&ammo.tpl) {
            continue;
        }
        if let Err(e) = sampler.insert(ammo.tpl.clone(), ammo.relative_probability, ()) {
            debug!("Ignoring static ammo entry: {}.", e);
        }
    }
    sampler.draw_one(rng).unwrap_or_else(fallback)
}

/// Split `total` rounds into stacks of at most `max_stack`, children of `parent_id`.
fn cartridge_stacks<R: RngCore>(
    parent_id: &str,
    cartridge_tpl: &str,
    total: u32,
    max_stack: u32,
    rng: &mut R,
) -> Vec<Item> {
    let max_stack = max_stack.max(1);
    let mut stacks = Vec::with_capacity(total.div_ceil(max_stack) as usize);
    let mut remaining = total;
    let mut location = 0;
    while remaining > 0 {
        let size = remaining.min(max_stack);
        let id: ItemId = generate_id(rng);
        stacks.push(
            Item::new(id, cartridge_tpl)
                .with_parent(parent_id, CARTRIDGES_SLOT)
                .with_location(location)
                .with_stack_count(size),
        );
        remaining -= size;
        location += 1;
    }
    stacks
}
