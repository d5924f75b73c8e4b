use geo_types::Coord;

use fts::error::ServiceError;
use fts::geometry::encode::{
    bbox_corners, decode_flat, encode_bbox, encode_ring, record_feature_collection,
};

fn coords(pairs: &[(f64, f64)]) -> Vec<Coord<f64>> {
    pairs.iter().map(|&(x, y)| Coord { x, y }).collect()
}

#[test]
fn encode_ring_reorients_clockwise_input() {
    // Clockwise square; encoding must flip it counter-clockwise and close it.
    let ring = coords(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)]);
    let encoded = encode_ring(&ring);
    assert_eq!(encoded, "1,0,1,1,0,1,0,0,1,0");
}

#[test]
fn encode_ring_keeps_counter_clockwise_input() {
    let ring = coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    let encoded = encode_ring(&ring);
    assert_eq!(encoded, "0,0,1,0,1,1,0,1,0,0");
}

#[test]
fn decode_then_encode_is_idempotent_for_normalized_strings() {
    let flat = "0,0,1,0,1,1,0,1,0,0";
    let pairs = decode_flat(flat).expect("decode");
    let ring = coords(&pairs);
    assert_eq!(encode_ring(&ring), flat);
}

#[test]
fn decode_flat_pairs_consecutive_values() {
    let pairs = decode_flat("1,2,3,4").expect("decode");
    assert_eq!(pairs, vec![(1.0, 2.0), (3.0, 4.0)]);
}

#[test]
fn decode_flat_rejects_odd_element_count() {
    let err = decode_flat("1,2,3").unwrap_err();
    assert!(matches!(err, ServiceError::MalformedGeometry(_)));
    assert_eq!(err.status(), 422);
}

#[test]
fn decode_flat_rejects_non_numeric_values() {
    let err = decode_flat("1,2,north,4").unwrap_err();
    assert!(matches!(err, ServiceError::MalformedGeometry(_)));
}

#[test]
fn bbox_expands_to_closed_corner_ring() {
    let corners = bbox_corners("-1,-2,3,4").expect("bbox");
    assert_eq!(
        corners,
        vec![
            (-1.0, -2.0),
            (-1.0, 4.0),
            (3.0, 4.0),
            (3.0, -2.0),
            (-1.0, -2.0),
        ]
    );
}

#[test]
fn bbox_rejects_wrong_arity() {
    let err = bbox_corners("1,2,3,4,5,6").unwrap_err();
    assert!(matches!(err, ServiceError::MalformedGeometry(_)));
}

#[test]
fn coordinates_round_to_fifteen_significant_digits() {
    let bbox = encode_bbox(0.123456789012345678, -121.93338712410432987, 0.0, 1.0);
    assert_eq!(bbox, "0.123456789012346,-121.933387124104,0,1");
}

#[test]
fn feature_collection_holds_three_tagged_closed_rings() {
    let collection = record_feature_collection(
        "-121.9,36.3,-118.6,38.7",
        "0,0,1,0,1,1,0,1,0,0",
        "0,0,2,0,2,2,0,2,0,0",
    )
    .expect("collection");

    assert_eq!(collection["type"], "FeatureCollection");
    let features = collection["features"].as_array().expect("features");
    assert_eq!(features.len(), 3);

    let tags: Vec<&str> = features
        .iter()
        .map(|f| f["properties"]["type"].as_str().expect("tag"))
        .collect();
    assert_eq!(tags, vec!["bbox", "Convex Hull", "Visvalingam"]);

    for feature in features {
        let ring = feature["geometry"]["coordinates"][0]
            .as_array()
            .expect("ring");
        assert_eq!(ring.first(), ring.last(), "ring must be closed");
    }
}

#[test]
fn bbox_feature_corners_match_stored_bounds() {
    let collection = record_feature_collection(
        "-121.9,36.3,-118.6,38.7",
        "0,0,1,0,1,1,0,1,0,0",
        "0,0,2,0,2,2,0,2,0,0",
    )
    .expect("collection");

    let ring = collection["features"][0]["geometry"]["coordinates"][0]
        .as_array()
        .expect("ring");
    assert_eq!(ring[0], serde_json::json!([-121.9, 36.3]));
    assert_eq!(ring[1], serde_json::json!([-121.9, 38.7]));
    assert_eq!(ring[2], serde_json::json!([-118.6, 38.7]));
    assert_eq!(ring[3], serde_json::json!([-118.6, 36.3]));
}
