//! Record model for validation.
//!
//! A record is a flat attribute map plus an optional geometry. The validator
//! never mutates records; it only reads. Blank text counts as missing, and
//! numeric coercion is deliberately permissive: spreadsheet exports routinely
//! deliver `85`, `"85"` and `"85.0"` for the same value.

use geo::Geometry;
use quality_core::RuleConfig;
use std::collections::{BTreeMap, HashMap};

/// A scalar (or small-list) attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Null/missing value
    Null,
    /// Text value
    Text(String),
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Small list of values
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Returns true if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Returns true if this value is null, blank text, or an empty list.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Null => true,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Text(_) => "text",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Bool(_) => "bool",
            FieldValue::List(_) => "list",
        }
    }

    /// Attempts to read this value as trimmed text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => {
                let t = s.trim();
                (!t.is_empty()).then_some(t)
            }
            _ => None,
        }
    }

    /// Permissive numeric coercion.
    ///
    /// Accepts values that are already numeric, numeric strings, and decimal
    /// strings with a trailing `.0`. Anything else is `None`; the caller
    /// decides whether that warrants a "not numeric" issue.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            FieldValue::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    None
                } else {
                    t.parse::<f64>().ok()
                }
            }
            _ => None,
        }
    }

    /// Renders the value for display in issue messages.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::List(items) => items
                .iter()
                .map(FieldValue::display)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Canonical form used by the duplicate fingerprint.
    ///
    /// Numeric-coercible values normalize to the same text (`85`, `"85"` and
    /// `"85.0"` all become `85`); everything else falls back to trimmed
    /// display form.
    pub fn canonical(&self) -> String {
        if let Some(n) = self.as_number() {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                return format!("{}", n as i64);
            }
            return n.to_string();
        }
        self.display().trim().to_string()
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// One business record: attributes plus an optional geometry.
#[derive(Debug, Clone, Default)]
pub struct Record {
    attrs: HashMap<String, FieldValue>,
    geometry: Option<Geometry<f64>>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record from an attribute map.
    pub fn from_attrs(attrs: HashMap<String, FieldValue>) -> Self {
        Self {
            attrs,
            geometry: None,
        }
    }

    /// Sets one attribute (builder style, handy in tests and loaders).
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.attrs.insert(field.into(), value.into());
        self
    }

    /// Attaches a geometry.
    pub fn with_geometry(mut self, geometry: Geometry<f64>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Raw attribute lookup.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.attrs.get(field)
    }

    /// Attribute lookup that treats blanks as missing.
    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.attrs.get(field).filter(|v| !v.is_blank())
    }

    /// Trimmed text of an attribute, if present and non-blank.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.value(field).and_then(FieldValue::as_text)
    }

    /// Numeric coercion of an attribute, if present and coercible.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.value(field).and_then(FieldValue::as_number)
    }

    /// Whether the attribute is present and non-blank.
    pub fn has(&self, field: &str) -> bool {
        self.value(field).is_some()
    }

    /// The attached geometry, if any.
    pub fn geometry(&self) -> Option<&Geometry<f64>> {
        self.geometry.as_ref()
    }

    /// All attributes.
    pub fn attrs(&self) -> &HashMap<String, FieldValue> {
        &self.attrs
    }

    /// Identifying key: the first configured identifier attribute present.
    pub fn key(&self, config: &RuleConfig) -> Option<String> {
        config
            .identifier_fields
            .iter()
            .find_map(|f| self.text(f))
            .map(str::to_string)
    }

    /// Grouping value, substituting the configured sentinel when absent.
    pub fn group(&self, config: &RuleConfig) -> String {
        self.text(&config.group_field)
            .map(str::to_string)
            .unwrap_or_else(|| config.group_fallback.clone())
    }

    /// Scalar attributes flattened to strings, for report snapshots.
    pub fn flatten(&self) -> BTreeMap<String, String> {
        self.attrs
            .iter()
            .filter(|(_, v)| !v.is_blank())
            .map(|(k, v)| (k.clone(), v.display()))
            .collect()
    }
}

/// A collection of records to validate.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    /// Creates an empty record set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a record set from records.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the set holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Appends a record.
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quality_core::config::fields;

    #[test]
    fn test_permissive_numeric_coercion() {
        assert_eq!(FieldValue::Int(85).as_number(), Some(85.0));
        assert_eq!(FieldValue::Float(85.5).as_number(), Some(85.5));
        assert_eq!(FieldValue::from("85").as_number(), Some(85.0));
        assert_eq!(FieldValue::from("85.0").as_number(), Some(85.0));
        assert_eq!(FieldValue::from(" 85 ").as_number(), Some(85.0));
        assert_eq!(FieldValue::from("N/A").as_number(), None);
        assert_eq!(FieldValue::Bool(true).as_number(), None);
    }

    #[test]
    fn test_canonical_normalizes_numerics() {
        assert_eq!(FieldValue::Int(85).canonical(), "85");
        assert_eq!(FieldValue::from("85").canonical(), "85");
        assert_eq!(FieldValue::from("85.0").canonical(), "85");
        assert_eq!(FieldValue::Float(85.5).canonical(), "85.5");
        assert_eq!(FieldValue::from(" texto ").canonical(), "texto");
    }

    #[test]
    fn test_blank_counts_as_missing() {
        let record = Record::new()
            .with("a", "")
            .with("b", "   ")
            .with("c", "value");
        assert!(!record.has("a"));
        assert!(!record.has("b"));
        assert!(record.has("c"));
        assert!(!record.has("missing"));
    }

    #[test]
    fn test_record_key_prefers_first_identifier() {
        let config = RuleConfig::default();
        let record = Record::new()
            .with(fields::PROJECT_ID, "OBR-42")
            .with(fields::CONTRACT_REF, "CT-2024-001");
        assert_eq!(record.key(&config).as_deref(), Some("OBR-42"));

        let record = Record::new().with(fields::CONTRACT_REF, "CT-2024-001");
        assert_eq!(record.key(&config).as_deref(), Some("CT-2024-001"));

        let record = Record::new().with("other", "x");
        assert_eq!(record.key(&config), None);
    }

    #[test]
    fn test_group_fallback_sentinel() {
        let config = RuleConfig::default();
        let record = Record::new().with(fields::MANAGING_UNIT, "Secretaría de Salud");
        assert_eq!(record.group(&config), "Secretaría de Salud");

        let record = Record::new();
        assert_eq!(record.group(&config), "Unassigned");
    }
}
