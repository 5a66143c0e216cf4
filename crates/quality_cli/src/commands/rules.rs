use anyhow::{Result, anyhow};
use colored::*;
use quality_core::{Dimension, RuleCatalog};

pub fn execute(dimension: Option<&str>) -> Result<()> {
    let catalog = RuleCatalog::standard();

    let filter = match dimension {
        Some(raw) => Some(parse_dimension(raw)?),
        None => None,
    };

    for dim in Dimension::all() {
        if filter.is_some_and(|f| f != dim) {
            continue;
        }
        println!("\n{}", dim.label().bold());
        for rule in catalog.for_dimension(dim) {
            println!(
                "  {}  {:<8}  {:<34}  {}",
                rule.id,
                rule.severity.to_string(),
                rule.name,
                rule.description
            );
        }
    }

    Ok(())
}

fn parse_dimension(raw: &str) -> Result<Dimension> {
    let needle = raw.to_lowercase();
    Dimension::all()
        .into_iter()
        .find(|d| d.label().to_lowercase().contains(&needle))
        .ok_or_else(|| {
            anyhow!(
                "Unknown dimension '{raw}'. Expected one of: {}",
                Dimension::all()
                    .map(|d| d.label().to_string())
                    .join(", ")
            )
        })
}
