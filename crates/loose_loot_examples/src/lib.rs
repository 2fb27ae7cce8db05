#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use loose_loot::prelude::LootResult;
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Path of a bundled data file.
pub fn data_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(name)
}

pub fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

pub fn load_ron<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    ron::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// One-line totals for a generated map.
pub fn summary_line(location: &str, result: &LootResult) -> String {
    format!(
        "{location}: {} forced, {}/{} desired placed, {} skipped",
        result.forced_count,
        result.placed_count(),
        result.desired_count,
        result.skipped_count
    )
}

/// Prints one line per populated spawn point and logs the totals.
pub fn print_summary(location: &str, result: &LootResult) {
    for template in &result.spawnpoints {
        let root = template.root_item().map(|i| i.tpl.as_str()).unwrap_or("-");
        let stack = template
            .root_item()
            .and_then(|i| i.stack_count())
            .map(|c| format!(" x{c}"))
            .unwrap_or_default();
        println!(
            "{:<24} {}{} ({} records)",
            template.id,
            root,
            stack,
            template.items.len()
        );
    }
    info!("{}", summary_line(location, result));
}

/// Pretty JSON of the populated spawn point templates.
pub fn spawnpoints_json(result: &LootResult) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&result.spawnpoints)?)
}

#[cfg(test)]
mod tests {
    use loose_loot::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn bundled_result(seed: u64) -> LootResult {
        let loot: LooseLoot = load_json(data_path("factory4_day.json")).unwrap();
        let items: ItemDatabase = load_json(data_path("items.json")).unwrap();
        let static_ammo: StaticAmmo = load_json(data_path("static_ammo.json")).unwrap();
        let config: LocationConfig = load_ron(data_path("location_config.ron")).unwrap();
        let seasonal = SeasonalState::active();
        let tables = LootTables::new(&items, &(), &seasonal);
        let mut rng = StdRng::seed_from_u64(seed);
        generate_loose_loot(&loot, &static_ammo, "factory4_day", &config, &tables, &mut rng, None)
            .unwrap()
    }

    #[test]
    fn summary_line_reports_totals() {
        let result = bundled_result(42);
        let line = summary_line("factory4_day", &result);
        assert!(line.starts_with("factory4_day: 1 forced, "));
        assert!(line.contains(&format!("/{} desired", result.desired_count)));
    }

    #[test]
    fn spawnpoints_json_reads_back() {
        let result = bundled_result(7);
        let json = spawnpoints_json(&result).unwrap();
        let templates: Vec<SpawnpointTemplate> = serde_json::from_str(&json).unwrap();
        assert_eq!(templates, result.spawnpoints);
    }
}
