use geo_types::Coord;
use serde_json::{Value, json};

use crate::error::ServiceError;
use crate::geometry::{open_ring, signed_area};

/// Maximum coordinate precision, in significant digits, of the catalog
/// string format.
pub const MAX_PRECISION: usize = 15;

/// Serializes a ring as the catalog's flat coordinate string:
/// counter-clockwise winding, closed by repeating the first point,
/// `x1,y1,x2,y2,...` with no brackets or whitespace.
pub fn encode_ring(coords: &[Coord<f64>]) -> String {
    let mut ring: Vec<Coord<f64>> = open_ring(coords).to_vec();
    if signed_area(&ring) < 0.0 {
        ring.reverse();
    }
    if let Some(&first) = ring.first() {
        ring.push(first);
    }
    let mut parts = Vec::with_capacity(ring.len() * 2);
    for coord in ring.iter() {
        parts.push(format_coord(coord.x));
        parts.push(format_coord(coord.y));
    }
    parts.join(",")
}

/// Encodes axis-aligned bounds as the 4-number `w,s,e,n` catalog string.
pub fn encode_bbox(west: f64, south: f64, east: f64, north: f64) -> String {
    [west, south, east, north]
        .iter()
        .map(|v| format_coord(*v))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses a flat comma-delimited coordinate string into (x, y) pairs.
/// An odd element count or a non-numeric element is malformed.
pub fn decode_flat(list_str: &str) -> Result<Vec<(f64, f64)>, ServiceError> {
    let mut values = Vec::new();
    for item in list_str.split(',') {
        let value: f64 = item.trim().parse().map_err(|_| {
            ServiceError::MalformedGeometry(format!(
                "invalid coordinate value '{item}' in flat geometry string"
            ))
        })?;
        values.push(value);
    }
    if values.len() % 2 != 0 {
        return Err(ServiceError::MalformedGeometry(format!(
            "flat geometry string has an odd element count ({})",
            values.len()
        )));
    }
    Ok(values.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect())
}

/// Expands a 4-number `w,s,e,n` bounding-box string into its closed corner
/// ring: bottom-left, top-left, top-right, bottom-right, bottom-left.
pub fn bbox_corners(bbox_str: &str) -> Result<Vec<(f64, f64)>, ServiceError> {
    let pairs = decode_flat(bbox_str)?;
    if pairs.len() != 2 {
        return Err(ServiceError::MalformedGeometry(format!(
            "bounding box string must hold exactly 4 numbers, got {}",
            pairs.len() * 2
        )));
    }
    let bottom_left = pairs[0];
    let top_right = pairs[1];
    let top_left = (bottom_left.0, top_right.1);
    let bottom_right = (top_right.0, bottom_left.1);
    Ok(vec![
        bottom_left,
        top_left,
        top_right,
        bottom_right,
        bottom_left,
    ])
}

/// Wraps decoded ring(s) as a GeoJSON Polygon geometry. A second ring
/// punches a hole in the exterior.
pub fn polygon_geometry(exterior: Vec<(f64, f64)>, interior: Option<Vec<(f64, f64)>>) -> Value {
    let mut rings = vec![close_pairs(exterior)];
    if let Some(interior) = interior {
        rings.push(close_pairs(interior));
    }
    json!({
        "type": "Polygon",
        "coordinates": rings,
    })
}

/// A GeoJSON Feature tagged with a `type` property naming which of the
/// stored geometries it renders.
pub fn tagged_feature(geometry: Value, kind: &str) -> Value {
    json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": { "type": kind },
    })
}

/// One FeatureCollection holding the three stored geometries of a record,
/// tagged `bbox`, `Convex Hull` and `Visvalingam`.
pub fn record_feature_collection(
    bbox: &str,
    convex_hull: &str,
    visvalingam: &str,
) -> Result<Value, ServiceError> {
    let bbox_polygon = json!({
        "type": "Polygon",
        "coordinates": [bbox_corners(bbox)?],
    });
    let hull_polygon = polygon_geometry(decode_flat(convex_hull)?, None);
    let visvalingam_polygon = polygon_geometry(decode_flat(visvalingam)?, None);
    Ok(json!({
        "type": "FeatureCollection",
        "features": [
            tagged_feature(bbox_polygon, "bbox"),
            tagged_feature(hull_polygon, "Convex Hull"),
            tagged_feature(visvalingam_polygon, "Visvalingam"),
        ],
    }))
}

fn close_pairs(mut pairs: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
    if let Some(&first) = pairs.first() {
        if pairs.last() != Some(&first) {
            pairs.push(first);
        }
    }
    pairs
}

// Round to MAX_PRECISION significant digits, then print the shortest
// round-trip decimal form.
fn format_coord(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = format!("{:.*e}", MAX_PRECISION - 1, value)
        .parse::<f64>()
        .unwrap_or(value);
    format!("{rounded}")
}
