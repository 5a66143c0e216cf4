//! Administrative boundary layers for the containment rules.
//!
//! Two independent polygon layers (a coarse and a fine subdivision) back the
//! point-within-declared-area checks. A missing layer disables only the
//! corresponding rule; every other rule stays active.

use geo::{Contains, Point, Polygon};

/// One named administrative area.
#[derive(Debug, Clone)]
pub struct NamedArea {
    pub name: String,
    pub polygon: Polygon<f64>,
}

impl NamedArea {
    pub fn new(name: impl Into<String>, polygon: Polygon<f64>) -> Self {
        Self {
            name: name.into(),
            polygon,
        }
    }
}

/// A polygon layer keyed by area name.
#[derive(Debug, Clone, Default)]
pub struct BoundaryLayer {
    areas: Vec<NamedArea>,
}

impl BoundaryLayer {
    pub fn new(areas: Vec<NamedArea>) -> Self {
        Self { areas }
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    fn find(&self, name: &str) -> Option<&NamedArea> {
        let wanted = name.trim();
        self.areas
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(wanted))
    }

    /// Whether `point` falls inside the area called `name`.
    ///
    /// Returns `None` when the layer knows no such area; the caller must not
    /// score an unknown name as a containment failure.
    pub fn contains(&self, name: &str, point: &Point<f64>) -> Option<bool> {
        self.find(name).map(|a| a.polygon.contains(point))
    }

    /// The first area containing `point`, if any.
    pub fn locate(&self, point: &Point<f64>) -> Option<&str> {
        self.areas
            .iter()
            .find(|a| a.polygon.contains(point))
            .map(|a| a.name.as_str())
    }
}

/// The two administrative layers used by the positional rules.
#[derive(Debug, Clone, Default)]
pub struct AdminBoundaries {
    pub districts: Option<BoundaryLayer>,
    pub neighborhoods: Option<BoundaryLayer>,
}

impl AdminBoundaries {
    /// No layers: both containment rules are disabled.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_districts(mut self, layer: BoundaryLayer) -> Self {
        self.districts = Some(layer);
        self
    }

    pub fn with_neighborhoods(mut self, layer: BoundaryLayer) -> Self {
        self.neighborhoods = Some(layer);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::LineString;

    fn square(name: &str, x0: f64, y0: f64, x1: f64, y1: f64) -> NamedArea {
        let exterior = LineString::from(vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)]);
        NamedArea::new(name, Polygon::new(exterior, vec![]))
    }

    #[test]
    fn test_contains_known_area() {
        let layer = BoundaryLayer::new(vec![square("Centro", 0.0, 0.0, 2.0, 2.0)]);
        assert_eq!(layer.contains("Centro", &Point::new(1.0, 1.0)), Some(true));
        assert_eq!(layer.contains("centro", &Point::new(1.0, 1.0)), Some(true));
        assert_eq!(layer.contains("Centro", &Point::new(5.0, 5.0)), Some(false));
    }

    #[test]
    fn test_unknown_area_is_none() {
        let layer = BoundaryLayer::new(vec![square("Centro", 0.0, 0.0, 2.0, 2.0)]);
        assert_eq!(layer.contains("Norte", &Point::new(1.0, 1.0)), None);
    }

    #[test]
    fn test_locate() {
        let layer = BoundaryLayer::new(vec![
            square("Centro", 0.0, 0.0, 2.0, 2.0),
            square("Norte", 0.0, 2.0, 2.0, 4.0),
        ]);
        assert_eq!(layer.locate(&Point::new(1.0, 3.0)), Some("Norte"));
        assert_eq!(layer.locate(&Point::new(9.0, 9.0)), None);
    }
}
