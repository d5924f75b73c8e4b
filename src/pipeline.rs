use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::ServiceError;
use crate::geometry::{encode, hull, open_ring, reduce, signed_area, visvalingam};
use crate::store::Store;

/// One raw input record: identifier, display name, multi-part geometry.
#[derive(Debug, Clone)]
pub struct RawFeature {
    pub huc: String,
    pub region: String,
    pub geometry: MultiPolygon<f64>,
}

/// The three catalog-encoded geometry strings derived for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplifiedRecord {
    pub huc: String,
    pub region: String,
    pub convex_hull: String,
    pub visvalingam: String,
    pub bbox: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    pub huc: String,
    pub reason: String,
}

/// Batch outcome: how many records were written and which were skipped.
/// A non-empty skip list is the operator's signal to investigate, not an
/// abort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub processed: usize,
    pub skipped: usize,
    pub skips: Vec<SkippedRecord>,
}

/// Runs the full offline pipeline: read raw features, simplify each in
/// parallel, persist the survivors in one batch write.
pub fn run(
    input: &Path,
    db: &Path,
    max_vertices: usize,
    no_progress: bool,
) -> Result<BatchReport> {
    let features = read_feature_collection(input)?;
    info!(count = features.len(), "simplifying features");

    let progress = if no_progress {
        ProgressBar::hidden()
    } else {
        make_progress_bar(features.len() as u64)
    };

    let outcomes: Vec<Result<SimplifiedRecord, SkippedRecord>> = features
        .par_iter()
        .map(|feature| {
            let outcome = simplify_record(feature, max_vertices).map_err(|err| SkippedRecord {
                huc: feature.huc.clone(),
                reason: err.to_string(),
            });
            progress.inc(1);
            outcome
        })
        .collect();
    progress.finish_and_clear();

    let mut records = Vec::with_capacity(outcomes.len());
    let mut skips = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(record) => records.push(record),
            Err(skip) => {
                warn!(huc = %skip.huc, reason = %skip.reason, "skipping record");
                skips.push(skip);
            }
        }
    }

    let mut store = Store::open_write(db)?;
    store.init_schema()?;
    store.write_records(&records)?;
    info!(
        processed = records.len(),
        skipped = skips.len(),
        "batch load complete"
    );

    Ok(BatchReport {
        processed: records.len(),
        skipped: skips.len(),
        skips,
    })
}

/// Derives the three encoded geometries for a single record: reduce to the
/// largest part, hull + bounds over the full geometry, Visvalingam over
/// the reduced boundary under the tanh-tapered vertex budget.
pub fn simplify_record(
    feature: &RawFeature,
    max_vertices: usize,
) -> Result<SimplifiedRecord, ServiceError> {
    let part = reduce::largest_part(&feature.geometry).ok_or_else(|| {
        ServiceError::MalformedGeometry("geometry has no polygon parts".to_string())
    })?;

    let hull_ring = hull::convex_hull(&feature.geometry);
    if open_ring(&hull_ring).len() < 3 {
        return Err(ServiceError::MalformedGeometry(
            "convex hull collapsed to fewer than 3 vertices".to_string(),
        ));
    }
    let (west, south, east, north) = hull::bounding_box(&hull_ring).ok_or_else(|| {
        ServiceError::MalformedGeometry("geometry has no vertices".to_string())
    })?;

    let boundary = &part.exterior().0;
    let target = visvalingam::target_vertex_count(boundary.len(), max_vertices);
    let simplified = visvalingam::simplify(boundary, target);
    if open_ring(&simplified).len() < 3 || signed_area(&simplified) == 0.0 {
        return Err(ServiceError::MalformedGeometry(
            "simplification produced a degenerate zero-area polygon".to_string(),
        ));
    }

    Ok(SimplifiedRecord {
        huc: feature.huc.clone(),
        region: feature.region.clone(),
        convex_hull: encode::encode_ring(&hull_ring),
        visvalingam: encode::encode_ring(&simplified),
        bbox: encode::encode_bbox(west, south, east, north),
    })
}

/// Reads raw records from a GeoJSON FeatureCollection with `HUC` and
/// `Region` properties and Polygon/MultiPolygon geometries.
pub fn read_feature_collection(path: &Path) -> Result<Vec<RawFeature>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read input: {}", path.display()))?;
    let doc: Value = serde_json::from_str(&text).context("parse input GeoJSON")?;
    let features = doc
        .get("features")
        .and_then(Value::as_array)
        .context("input is not a GeoJSON FeatureCollection")?;

    let mut out = Vec::with_capacity(features.len());
    for (index, feature) in features.iter().enumerate() {
        let properties = feature
            .get("properties")
            .and_then(Value::as_object)
            .with_context(|| format!("feature {index} has no properties"))?;
        let huc = properties
            .get("HUC")
            .and_then(Value::as_str)
            .with_context(|| format!("feature {index} has no HUC property"))?;
        let region = properties
            .get("Region")
            .and_then(Value::as_str)
            .with_context(|| format!("feature {index} has no Region property"))?;
        let geometry = feature
            .get("geometry")
            .with_context(|| format!("feature {index} has no geometry"))?;
        out.push(RawFeature {
            huc: huc.to_string(),
            region: region.to_string(),
            geometry: parse_multipolygon(geometry)
                .with_context(|| format!("feature {index} ({huc})"))?,
        });
    }
    Ok(out)
}

fn parse_multipolygon(geometry: &Value) -> Result<MultiPolygon<f64>> {
    let kind = geometry
        .get("type")
        .and_then(Value::as_str)
        .context("geometry has no type")?;
    let coordinates = geometry
        .get("coordinates")
        .context("geometry has no coordinates")?;
    match kind {
        "Polygon" => Ok(MultiPolygon(vec![parse_polygon(coordinates)?])),
        "MultiPolygon" => {
            let parts = coordinates
                .as_array()
                .context("MultiPolygon coordinates must be an array")?;
            let polygons = parts
                .iter()
                .map(parse_polygon)
                .collect::<Result<Vec<_>>>()?;
            Ok(MultiPolygon(polygons))
        }
        other => anyhow::bail!("unsupported geometry type: {other}"),
    }
}

fn parse_polygon(rings: &Value) -> Result<Polygon<f64>> {
    let rings = rings
        .as_array()
        .context("Polygon coordinates must be an array of rings")?;
    let mut parsed = rings.iter().map(parse_ring);
    let exterior = parsed
        .next()
        .context("Polygon has no exterior ring")??;
    let interiors = parsed.collect::<Result<Vec<_>>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn parse_ring(ring: &Value) -> Result<LineString<f64>> {
    let positions = ring.as_array().context("ring must be an array")?;
    let mut coords = Vec::with_capacity(positions.len());
    for position in positions {
        let pair = position.as_array().context("position must be an array")?;
        if pair.len() < 2 {
            anyhow::bail!("position must hold at least x and y");
        }
        let x = pair[0].as_f64().context("x must be a number")?;
        let y = pair[1].as_f64().context("y must be a number")?;
        coords.push(Coord { x, y });
    }
    Ok(LineString(coords))
}

fn make_progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-"),
    );
    bar
}
