use geo_types::{Coord, LineString, MultiPolygon, Polygon};

use fts::geometry::hull::{bounding_box, convex_hull};
use fts::geometry::reduce::largest_part;
use fts::geometry::signed_area;
use fts::geometry::visvalingam::{simplify, target_vertex_count};

fn square(origin: f64, size: f64) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            (origin, origin),
            (origin + size, origin),
            (origin + size, origin + size),
            (origin, origin + size),
            (origin, origin),
        ]),
        Vec::new(),
    )
}

#[test]
fn largest_part_picks_maximum_area() {
    let geometry = MultiPolygon(vec![square(0.0, 1.0), square(10.0, 3.0), square(20.0, 2.0)]);
    let part = largest_part(&geometry).expect("part");
    assert_eq!(part.exterior().0[0], Coord { x: 10.0, y: 10.0 });
}

#[test]
fn largest_part_passes_single_part_through() {
    let geometry = MultiPolygon(vec![square(0.0, 1.0)]);
    let part = largest_part(&geometry).expect("part");
    assert_eq!(part, &square(0.0, 1.0));
}

#[test]
fn largest_part_of_empty_collection_is_none() {
    assert!(largest_part(&MultiPolygon(vec![])).is_none());
}

#[test]
fn convex_hull_drops_interior_vertices_and_winds_ccw() {
    // A square with a dent vertex inside the hull.
    let polygon = Polygon::new(
        LineString::from(vec![
            (0.0, 0.0),
            (2.0, 0.0),
            (1.0, 1.0),
            (2.0, 2.0),
            (0.0, 2.0),
            (0.0, 0.0),
        ]),
        Vec::new(),
    );
    let hull = convex_hull(&MultiPolygon(vec![polygon]));
    assert_eq!(hull.len(), 4);
    assert!(signed_area(&hull) > 0.0, "hull must be counter-clockwise");
}

#[test]
fn convex_hull_spans_all_parts() {
    let geometry = MultiPolygon(vec![square(0.0, 1.0), square(5.0, 1.0)]);
    let hull = convex_hull(&geometry);
    let (west, south, east, north) = bounding_box(&hull).expect("bounds");
    assert_eq!((west, south, east, north), (0.0, 0.0, 6.0, 6.0));
}

#[test]
fn target_count_caps_long_boundaries_at_budget() {
    assert_eq!(target_vertex_count(1000, 100), 99);
    assert!(target_vertex_count(100_000, 100) <= 100);
}

#[test]
fn target_count_tracks_short_boundaries() {
    // tanh(L/V) ~ L/V for small L, so short rings keep most vertices.
    let target = target_vertex_count(10, 300);
    assert!(target >= 9 && target <= 10);
}

#[test]
fn simplify_removes_least_area_vertex_first() {
    // The collinear midpoint on the bottom edge contributes zero area.
    let ring: Vec<Coord<f64>> = vec![
        Coord { x: 0.0, y: 0.0 },
        Coord { x: 1.0, y: 0.0 },
        Coord { x: 2.0, y: 0.0 },
        Coord { x: 2.0, y: 2.0 },
        Coord { x: 0.0, y: 2.0 },
        Coord { x: 0.0, y: 0.0 },
    ];
    let simplified = simplify(&ring, 5);
    assert_eq!(simplified.len(), 5);
    assert!(!simplified.contains(&Coord { x: 1.0, y: 0.0 }));
}

#[test]
fn simplify_hits_target_and_stays_closed() {
    let mut ring: Vec<Coord<f64>> = (0..20)
        .map(|i| {
            let angle = (i as f64) * std::f64::consts::TAU / 20.0;
            Coord {
                x: angle.cos(),
                y: angle.sin(),
            }
        })
        .collect();
    ring.push(ring[0]);

    let simplified = simplify(&ring, 10);
    assert_eq!(simplified.len(), 10);
    assert_eq!(simplified.first(), simplified.last());
}

#[test]
fn simplify_under_target_is_identity() {
    let ring: Vec<Coord<f64>> = vec![
        Coord { x: 0.0, y: 0.0 },
        Coord { x: 1.0, y: 0.0 },
        Coord { x: 1.0, y: 1.0 },
        Coord { x: 0.0, y: 0.0 },
    ];
    assert_eq!(simplify(&ring, 10), ring);
}

#[test]
fn simplified_ring_respects_budget_property() {
    for length in [10usize, 50, 200, 1000] {
        let mut ring: Vec<Coord<f64>> = (0..length)
            .map(|i| {
                let angle = (i as f64) * std::f64::consts::TAU / (length as f64);
                Coord {
                    x: angle.cos() * (1.0 + 0.1 * ((i % 7) as f64)),
                    y: angle.sin(),
                }
            })
            .collect();
        ring.push(ring[0]);

        let budget = 64;
        let target = target_vertex_count(ring.len(), budget);
        let simplified = simplify(&ring, target);
        assert!(
            simplified.len() <= target.max(2) + 1,
            "length {length}: {} > {}",
            simplified.len(),
            target + 1
        );
    }
}
