use geo_types::{MultiPolygon, Polygon};

use crate::geometry::signed_area;

/// Collapses a multi-part geometry to its single largest-area part.
/// A single-part input passes through unchanged; an empty collection
/// yields `None`.
pub fn largest_part(geometry: &MultiPolygon<f64>) -> Option<&Polygon<f64>> {
    geometry
        .0
        .iter()
        .max_by(|a, b| part_area(a).total_cmp(&part_area(b)))
}

fn part_area(polygon: &Polygon<f64>) -> f64 {
    signed_area(&polygon.exterior().0).abs()
}
