use geo_types::Coord;

pub mod encode;
pub mod hull;
pub mod reduce;
pub mod visvalingam;

/// Signed shoelace area of a ring. Positive for counter-clockwise winding.
/// Accepts either an open ring or one closed by a repeated first point.
pub fn signed_area(coords: &[Coord<f64>]) -> f64 {
    let coords = open_ring(coords);
    if coords.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..coords.len() {
        let a = coords[i];
        let b = coords[(i + 1) % coords.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Strips the closing duplicate vertex if the ring carries one.
pub fn open_ring(coords: &[Coord<f64>]) -> &[Coord<f64>] {
    if coords.len() > 1 && coords.first() == coords.last() {
        &coords[..coords.len() - 1]
    } else {
        coords
    }
}
