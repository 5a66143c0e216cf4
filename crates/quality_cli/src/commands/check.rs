use anyhow::{Context, Result};
use quality_core::config::fields;
use std::path::Path;

use crate::output;

/// The thematic fields a configuration is expected to cover.
const THEMATIC_FIELDS: &[&str] = &[
    fields::STATUS,
    fields::INTERVENTION_TYPE,
    fields::PROCUREMENT_PLATFORM,
    fields::UNIT_OF_MEASURE,
    fields::ASSET_CLASS,
    fields::FACILITY_TYPE,
    fields::FUNDING_SOURCE,
    fields::MANAGING_UNIT,
];

pub fn execute(config_path: &str) -> Result<()> {
    let config = quality_config::parse_file(Path::new(config_path))
        .with_context(|| format!("Failed to load configuration: {config_path}"))?;

    output::print_success(&format!("Configuration OK: {config_path}"));

    println!("\nWhitelist coverage:");
    for field in THEMATIC_FIELDS {
        match config.whitelists.get(field) {
            Some(values) => println!("  {field:<22} {} value(s)", values.len()),
            None => println!("  {field:<22} (not configured, checks disabled)"),
        }
    }

    println!("\nThresholds:");
    println!("  year window          {}..={}", config.earliest_year, config.latest_year);
    println!("  max duration         {} days", config.max_duration_days);
    println!("  similarity threshold {}", config.similarity_threshold);
    println!(
        "  bounding box         lon [{}, {}], lat [{}, {}]",
        config.bounding_box.min_lon,
        config.bounding_box.max_lon,
        config.bounding_box.min_lat,
        config.bounding_box.max_lat
    );
    println!("  grouping             {} (fallback '{}')", config.group_field, config.group_fallback);
    println!(
        "  volatile fields      {}",
        config.volatile_fields.join(", ")
    );

    Ok(())
}
