use loose_loot::prelude::*;
use loose_loot_examples::{data_path, init_tracing, load_json, load_ron};
use rand::rngs::StdRng;
use rand::SeedableRng;

const LOCATION: &str = "factory4_day";

fn main() -> anyhow::Result<()> {
    init_tracing();

    let loot: LooseLoot = load_json(data_path("factory4_day.json"))?;
    let items: ItemDatabase = load_json(data_path("items.json"))?;
    let static_ammo: StaticAmmo = load_json(data_path("static_ammo.json"))?;
    let config: LocationConfig = load_ron(data_path("location_config.ron"))?;

    let seasonal = SeasonalState::active();
    let blacklist = ItemBlacklist::new().with_tpl("57347ca924597744596b4e71");
    let tables = LootTables::new(&items, &blacklist, &seasonal);

    let mut sink = FnSink::new(|event: LootEvent| match event {
        LootEvent::TargetComputed { desired, guaranteed, .. } => {
            println!("target: {desired} ({guaranteed} guaranteed)");
        }
        LootEvent::ForcedLootAdded { spawnpoint_id, root_tpl } => {
            println!("forced  {spawnpoint_id}: {root_tpl}");
        }
        LootEvent::LootPlaced {
            spawnpoint_id,
            root_tpl,
            item_count,
        } => {
            println!("placed  {spawnpoint_id}: {root_tpl} ({item_count} records)");
        }
        LootEvent::SpawnpointSkipped { spawnpoint_id, reason } => {
            println!("skipped {spawnpoint_id}: {}", reason.as_str());
        }
        LootEvent::SpawnpointBlacklisted { spawnpoint_id, .. } => {
            println!("blacklisted {spawnpoint_id}");
        }
        _ => {}
    });

    let mut rng = StdRng::seed_from_u64(2024);
    generate_loose_loot_with_events(
        &loot,
        &static_ammo,
        LOCATION,
        &config,
        &tables,
        &mut rng,
        &mut sink,
    )?;

    Ok(())
}
