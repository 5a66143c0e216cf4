//! File loaders: record batches and administrative boundary layers.
//!
//! Records arrive as a JSON array of flat objects; a `geometry` member in
//! GeoJSON point/line/polygon shape becomes the record geometry. An
//! unreadable geometry degrades that record to attribute-only validation
//! instead of aborting the batch.

use anyhow::{Context, Result, anyhow};
use geo::{Geometry, LineString, Point, Polygon};
use quality_core::{AdminBoundaries, BoundaryLayer, NamedArea};
use quality_validator::{FieldValue, Record, RecordSet};
use serde_json::Value;
use std::path::Path;

/// The JSON member carrying the record geometry.
const GEOMETRY_KEY: &str = "geometry";

/// Loads a record batch from a JSON file.
pub fn load_records(path: &Path) -> Result<RecordSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse records file: {}", path.display()))?;

    let Value::Array(rows) = value else {
        return Err(anyhow!("Records file must contain a JSON array"));
    };

    let mut bad_geometries = 0usize;
    let mut records = RecordSet::empty();
    for (idx, row) in rows.into_iter().enumerate() {
        let Value::Object(members) = row else {
            return Err(anyhow!("Record {} is not a JSON object", idx + 1));
        };

        let mut record = Record::new();
        for (name, value) in members {
            if name == GEOMETRY_KEY {
                match to_geometry(&value) {
                    Some(geometry) => record = record.with_geometry(geometry),
                    None => bad_geometries += 1,
                }
                continue;
            }
            record = record.with(name, to_field_value(value));
        }
        records.push(record);
    }

    if bad_geometries > 0 {
        tracing::warn!(
            records = bad_geometries,
            "unreadable geometries: those records degrade to attribute-only validation"
        );
    }

    Ok(records)
}

fn to_field_value(value: Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Bool(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Int(i),
            None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => FieldValue::Text(s),
        Value::Array(items) => {
            FieldValue::List(items.into_iter().map(to_field_value).collect())
        }
        // Nested objects are not part of the flat record model
        Value::Object(_) => FieldValue::Null,
    }
}

/// Converts a GeoJSON-shaped value into a geometry.
fn to_geometry(value: &Value) -> Option<Geometry<f64>> {
    let kind = value.get("type")?.as_str()?;
    let coordinates = value.get("coordinates")?;
    match kind {
        "Point" => {
            let (x, y) = to_position(coordinates)?;
            Some(Geometry::Point(Point::new(x, y)))
        }
        "LineString" => {
            let line = to_positions(coordinates)?;
            Some(Geometry::LineString(LineString::from(line)))
        }
        "Polygon" => {
            let rings = coordinates.as_array()?;
            let exterior = to_positions(rings.first()?)?;
            let interiors: Option<Vec<LineString<f64>>> = rings[1..]
                .iter()
                .map(|ring| to_positions(ring).map(LineString::from))
                .collect();
            Some(Geometry::Polygon(Polygon::new(
                LineString::from(exterior),
                interiors?,
            )))
        }
        _ => None,
    }
}

fn to_position(value: &Value) -> Option<(f64, f64)> {
    let pair = value.as_array()?;
    if pair.len() < 2 {
        return None;
    }
    Some((pair[0].as_f64()?, pair[1].as_f64()?))
}

fn to_positions(value: &Value) -> Option<Vec<(f64, f64)>> {
    value.as_array()?.iter().map(to_position).collect()
}

/// Loads the two administrative boundary layers from a JSON file.
///
/// Expected shape:
/// `{"districts": [{"name": "...", "polygon": [[lon, lat], ...]}], "neighborhoods": [...]}`.
/// Either layer may be absent; the corresponding containment rule is then
/// disabled.
pub fn load_boundaries(path: &Path) -> Result<AdminBoundaries> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read boundaries file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse boundaries file: {}", path.display()))?;

    let mut boundaries = AdminBoundaries::none();
    if let Some(layer) = load_layer(&value, "districts")? {
        boundaries = boundaries.with_districts(layer);
    }
    if let Some(layer) = load_layer(&value, "neighborhoods")? {
        boundaries = boundaries.with_neighborhoods(layer);
    }
    Ok(boundaries)
}

fn load_layer(value: &Value, key: &str) -> Result<Option<BoundaryLayer>> {
    let Some(entries) = value.get(key) else {
        return Ok(None);
    };
    let entries = entries
        .as_array()
        .ok_or_else(|| anyhow!("'{key}' must be an array"))?;

    let mut areas = Vec::with_capacity(entries.len());
    for entry in entries {
        let name = entry
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("area in '{key}' is missing its name"))?;
        let ring = entry
            .get("polygon")
            .and_then(to_positions)
            .ok_or_else(|| anyhow!("area '{name}' has no usable polygon"))?;
        areas.push(NamedArea::new(name, Polygon::new(LineString::from(ring), vec![])));
    }
    Ok(Some(BoundaryLayer::new(areas)))
}
