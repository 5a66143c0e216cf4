//! Builder for rule configurations.
//!
//! Starts from the built-in defaults, so `build()` is total; callers only
//! name what they change.

use crate::config::{BoundingBox, RuleConfig, StatusPolicy};

/// Fluent builder for a [`RuleConfig`].
///
/// # Example
///
/// ```rust
/// use quality_core::RuleConfigBuilder;
///
/// let config = RuleConfigBuilder::new()
///     .whitelist("status", ["Sin iniciar", "En ejecución", "Terminado"])
///     .bounding_box(-76.0, 6.0, -75.0, 7.0)
///     .year_window(2005, 2035)
///     .build();
/// assert_eq!(config.earliest_year, 2005);
/// ```
#[derive(Debug, Default)]
pub struct RuleConfigBuilder {
    config: RuleConfig,
}

impl RuleConfigBuilder {
    /// Starts from the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from defaults with every thematic catalog removed.
    pub fn without_whitelists() -> Self {
        Self {
            config: RuleConfig::with_empty_whitelists(),
        }
    }

    /// Replaces the allowed-value catalog for one field.
    pub fn whitelist<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .whitelists
            .set(field, values.into_iter().map(Into::into).collect());
        self
    }

    /// Replaces the status policy.
    pub fn status_policy(mut self, policy: StatusPolicy) -> Self {
        self.config.status_policy = policy;
        self
    }

    /// Replaces the required-field list.
    pub fn required_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.required_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the volatile-field exclusion list used by duplicate
    /// detection.
    pub fn volatile_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.volatile_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the PA001 bounding box (lon/lat order).
    pub fn bounding_box(mut self, min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        self.config.bounding_box = BoundingBox::new(min_lon, min_lat, max_lon, max_lat);
        self
    }

    /// Sets the expected coordinate reference system.
    pub fn expected_crs(mut self, crs: impl Into<String>) -> Self {
        self.config.expected_crs = crs.into();
        self
    }

    /// Sets the acceptable year window for LC007 / TQ003.
    pub fn year_window(mut self, earliest: i32, latest: i32) -> Self {
        self.config.earliest_year = earliest;
        self.config.latest_year = latest;
        self
    }

    /// Sets the TQ005 duration bound in days.
    pub fn max_duration_days(mut self, days: i64) -> Self {
        self.config.max_duration_days = days;
        self
    }

    /// Sets the fuzzy-suggestion threshold.
    pub fn similarity_threshold(mut self, threshold: f64) -> Self {
        self.config.similarity_threshold = threshold;
        self
    }

    /// Sets the grouping attribute and its fallback sentinel.
    pub fn grouping(mut self, field: impl Into<String>, fallback: impl Into<String>) -> Self {
        self.config.group_field = field.into();
        self.config.group_fallback = fallback.into();
        self
    }

    /// Finalizes the configuration.
    pub fn build(self) -> RuleConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builder_overrides() {
        let config = RuleConfigBuilder::new()
            .whitelist("status", ["A", "B"])
            .bounding_box(-1.0, -1.0, 1.0, 1.0)
            .year_window(2010, 2020)
            .grouping("department", "None")
            .build();

        assert_eq!(config.whitelists.get("status").unwrap(), &["A", "B"]);
        assert_eq!(config.earliest_year, 2010);
        assert_eq!(config.group_field, "department");
        // Untouched settings keep their defaults
        assert_eq!(config.similarity_threshold, 0.6);
    }

    #[test]
    fn test_without_whitelists() {
        let config = RuleConfigBuilder::without_whitelists().build();
        assert!(config.whitelists.is_empty());
    }
}
