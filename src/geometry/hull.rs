use geo_types::{Coord, MultiPolygon};

/// Convex hull over every exterior vertex of a multi-part geometry,
/// returned as an open counter-clockwise ring. Fewer than three distinct
/// input points yield a degenerate (sub-triangle) result the caller must
/// reject.
pub fn convex_hull(geometry: &MultiPolygon<f64>) -> Vec<Coord<f64>> {
    let mut points: Vec<Coord<f64>> = Vec::new();
    for polygon in geometry.0.iter() {
        points.extend_from_slice(crate::geometry::open_ring(&polygon.exterior().0));
    }
    monotone_chain(points)
}

/// Axis-aligned bounds of a point set as (west, south, east, north).
pub fn bounding_box(points: &[Coord<f64>]) -> Option<(f64, f64, f64, f64)> {
    let first = points.first()?;
    let mut west = first.x;
    let mut south = first.y;
    let mut east = first.x;
    let mut north = first.y;
    for point in points.iter().skip(1) {
        west = west.min(point.x);
        south = south.min(point.y);
        east = east.max(point.x);
        north = north.max(point.y);
    }
    Some((west, south, east, north))
}

// Andrew's monotone chain. Collinear points on the hull boundary are
// dropped.
fn monotone_chain(mut points: Vec<Coord<f64>>) -> Vec<Coord<f64>> {
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points.dedup();
    if points.len() < 3 {
        return points;
    }

    let mut lower: Vec<Coord<f64>> = Vec::new();
    for &point in points.iter() {
        while lower.len() >= 2
            && cross(lower[lower.len() - 2], lower[lower.len() - 1], point) <= 0.0
        {
            lower.pop();
        }
        lower.push(point);
    }

    let mut upper: Vec<Coord<f64>> = Vec::new();
    for &point in points.iter().rev() {
        while upper.len() >= 2
            && cross(upper[upper.len() - 2], upper[upper.len() - 1], point) <= 0.0
        {
            upper.pop();
        }
        upper.push(point);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

fn cross(o: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}
