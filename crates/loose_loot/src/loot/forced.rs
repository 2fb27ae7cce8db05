//! Forced loot: spawn points populated regardless of the statistical draw.
use rand::RngCore;
use tracing::{debug, warn};

use crate::error::Result;
use crate::loot::compose::{compose_loot_item, ComposeContext};
use crate::loot::events::{EventSink, LootEvent, LootEventKind, SkipReason};
use crate::loot::filter::SeasonalSnapshot;
use crate::loot::{ForcedSpawnpoint, SpawnpointTemplate};
use crate::sampling::WeightedSampler;

/// Compose loot for every forced spawn point and append the templates to `out`.
///
/// Item templates listed in the map's single-spawn config are placed at only one of
/// their forced positions, chosen by weight. Out-of-season items are skipped, and a
/// template id already present in `out` is never added twice. Returns the number of
/// templates added.
pub fn add_forced_loot<R: RngCore>(
    ctx: &ComposeContext<'_>,
    location: &str,
    forced: Vec<ForcedSpawnpoint>,
    seasonal: &SeasonalSnapshot,
    out: &mut Vec<SpawnpointTemplate>,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<usize> {
    let start = out.len();
    let single_spawn = ctx.config.forced_single_spawn_for(location);

    for tpl in single_spawn {
        let mut positions: WeightedSampler<String, SpawnpointTemplate> = WeightedSampler::new();
        for point in &forced {
            let Some(template) = point.template.as_ref() else {
                continue;
            };
            if first_item_tpl(template) != Some(tpl.as_str()) {
                continue;
            }
            if let Err(e) = positions.insert(
                template.id.clone(),
                point.probability.unwrap_or(1.0),
                template.clone(),
            ) {
                debug!("Skipping forced position on '{}': {}.", location, e);
            }
        }

        if positions.is_empty() {
            warn!(
                "Unable to find forced loot '{}' on '{}'; skipping.",
                tpl, location
            );
            if sink.wants(LootEventKind::Warning) {
                sink.send(LootEvent::Warning {
                    context: location.to_owned(),
                    message: format!("no forced spawn point holds single-spawn item '{tpl}'"),
                });
            }
            continue;
        }

        let keys = positions.draw(1, false, rng);
        for mut template in positions.into_payloads(&keys) {
            place(ctx, &mut template, rng)?;
            push_unique(out, template, sink);
        }
    }

    for point in forced {
        let Some(mut template) = point.template else {
            warn!(
                "Forced spawn point '{}' has no template; skipping.",
                point.location_id
            );
            send_skip(sink, &point.location_id, SkipReason::MissingTemplate);
            continue;
        };
        let Some(first_tpl) = first_item_tpl(&template).map(str::to_owned) else {
            warn!("Forced spawn point '{}' has no items; skipping.", template.id);
            send_skip(sink, &template.id, SkipReason::EmptyPool);
            continue;
        };

        if single_spawn.contains(&first_tpl) {
            continue;
        }
        if seasonal.excludes(&first_tpl) {
            debug!(
                "Skipping seasonal forced loot '{}' at '{}'.",
                first_tpl, template.id
            );
            send_skip(sink, &template.id, SkipReason::OutOfSeason);
            continue;
        }

        place(ctx, &mut template, rng)?;
        push_unique(out, template, sink);
    }

    Ok(out.len() - start)
}

fn first_item_tpl(template: &SpawnpointTemplate) -> Option<&str> {
    template.items.first().map(|i| i.tpl.as_str())
}

/// Compose the template's first item and make it the template's only loot.
fn place<R: RngCore>(ctx: &ComposeContext<'_>, template: &mut SpawnpointTemplate, rng: &mut R) -> Result<()> {
    let Some(key) = template.items.first().map(|i| i.id.clone()) else {
        return Ok(());
    };
    let items = compose_loot_item(ctx, &key, &template.id, &template.items, rng)?;
    template.set_loot(items);
    Ok(())
}

fn push_unique(out: &mut Vec<SpawnpointTemplate>, template: SpawnpointTemplate, sink: &mut dyn EventSink) {
    if out.iter().any(|t| t.id == template.id) {
        debug!(
            "Forced loot location '{}' already exists; skipping.",
            template.id
        );
        return;
    }
    if sink.wants(LootEventKind::ForcedLootAdded) {
        sink.send(LootEvent::ForcedLootAdded {
            spawnpoint_id: template.id.clone(),
            root_tpl: template.root_item().map(|i| i.tpl.clone()).unwrap_or_default(),
        });
    }
    out.push(template);
}

fn send_skip(sink: &mut dyn EventSink, spawnpoint_id: &str, reason: SkipReason) {
    if sink.wants(LootEventKind::SpawnpointSkipped) {
        sink.send(LootEvent::SpawnpointSkipped {
            spawnpoint_id: spawnpoint_id.to_owned(),
            reason,
        });
    }
}
