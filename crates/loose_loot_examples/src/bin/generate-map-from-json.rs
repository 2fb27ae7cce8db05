use loose_loot::prelude::*;
use loose_loot_examples::{
    data_path, init_tracing, load_json, load_ron, print_summary, spawnpoints_json,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

const LOCATION: &str = "factory4_day";

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Optional seed as the first argument.
    let seed = match std::env::args().nth(1).filter(|arg| arg != "--json") {
        Some(arg) => arg.parse()?,
        None => 42,
    };

    let loot: LooseLoot = load_json(data_path("factory4_day.json"))?;
    let items: ItemDatabase = load_json(data_path("items.json"))?;
    let static_ammo: StaticAmmo = load_json(data_path("static_ammo.json"))?;
    let config: LocationConfig = load_ron(data_path("location_config.ron"))?;

    // No event running: the ornament stays in storage.
    let seasonal = SeasonalState::inactive(["5df8a72c86f77412640e2e83"]);
    let tables = LootTables::new(&items, &(), &seasonal);
    let generator = LootGenerator::try_new(config, tables)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let result = generator.generate(&loot, &static_ammo, LOCATION, &mut rng)?;
    print_summary(LOCATION, &result);

    // Full templates with `--json`; redirect stdout to keep them.
    if std::env::args().any(|arg| arg == "--json") {
        println!("{}", spawnpoints_json(&result)?);
    }

    Ok(())
}
