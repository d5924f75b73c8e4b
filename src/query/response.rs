use serde_json::{Map, Value, json};

use crate::error::ServiceError;
use crate::geometry::encode;
use crate::query::executor::{FeatureRow, QueryOutcome, ResultRows};
use crate::query::request::{PolygonFormat, SearchKind, SearchRequest};

/// Turns fetched rows plus the hit count into the response envelope.
/// Zero rows is NotFound; a page smaller than the hit count downgrades the
/// status to 206 and attaches `results_count`.
pub fn assemble(
    request: &SearchRequest,
    outcome: QueryOutcome,
    elapsed_ms: f64,
) -> Result<Value, ServiceError> {
    let results_count = outcome.rows.len() as u64;
    if results_count == 0 {
        return Err(ServiceError::NotFound {
            parameter: request.kind.parameter(),
            value: request.kind.value().to_string(),
        });
    }

    let partial = outcome.hits > results_count;
    let status = if partial {
        "206 PARTIAL CONTENT"
    } else {
        "200 OK"
    };

    let mut envelope = Map::new();
    envelope.insert("status".to_string(), json!(status));
    envelope.insert("time".to_string(), json!(format!("{elapsed_ms} ms.")));
    envelope.insert("hits".to_string(), json!(outcome.hits));
    if partial {
        envelope.insert("results_count".to_string(), json!(results_count));
    }
    envelope.insert("search on".to_string(), search_echo(request));

    let results = match outcome.rows {
        ResultRows::Features(rows) => rows
            .iter()
            .map(|row| feature_result(row, request.polygon_format))
            .collect::<Result<Vec<_>, _>>()?,
        ResultRows::PassThrough(rows) => rows
            .into_iter()
            .map(passthrough_result)
            .collect::<Result<Vec<_>, _>>()?,
    };
    envelope.insert("results".to_string(), Value::Array(results));

    Ok(Value::Object(envelope))
}

/// Echo of the resolved predicate and pagination, for client-side
/// traceability. The HUC/region echo carries the polygon format; the
/// pass-through echo carries the river name filter instead.
fn search_echo(request: &SearchRequest) -> Value {
    match &request.kind {
        SearchKind::Huc { .. } | SearchKind::Region { .. } => json!({
            "parameter": request.kind.parameter(),
            "exact": request.exact,
            "polygon_format": request.polygon_format.as_str(),
            "page_number": request.page_number,
            "page_size": request.page_size,
        }),
        SearchKind::Reach { river_name, .. } | SearchKind::Node { river_name, .. } => json!({
            "parameter": request.kind.parameter(),
            "river_name": river_name,
            "exact": request.exact,
            "page_number": request.page_number,
            "page_size": request.page_size,
        }),
        SearchKind::RiverName { name, .. } => json!({
            "parameter": request.kind.parameter(),
            "river_name": name,
            "exact": request.exact,
            "page_number": request.page_number,
            "page_size": request.page_size,
        }),
    }
}

fn feature_result(row: &FeatureRow, format: PolygonFormat) -> Result<Value, ServiceError> {
    let mut result = Map::new();
    result.insert("Region Name".to_string(), json!(row.region));
    result.insert("HUC".to_string(), json!(row.huc));
    result.insert(
        "USGS Polygon".to_string(),
        json!({
            "Object URL": object_url(&row.huc),
            "Source": source_url(&row.huc),
        }),
    );

    match format {
        PolygonFormat::Flat => {
            result.insert("Bounding Box".to_string(), json!(row.bbox));
            result.insert("Convex Hull Polygon".to_string(), json!(row.convex_hull));
            result.insert("Visvalingam Polygon".to_string(), json!(row.visvalingam));
        }
        PolygonFormat::Geojson => {
            let collection = encode::record_feature_collection(
                &row.bbox,
                &row.convex_hull,
                &row.visvalingam,
            )?;
            result.insert("geojson".to_string(), collection);
        }
    }
    Ok(Value::Object(result))
}

// Stored columns pass through verbatim, except a geojson-named text
// column, which is parsed into structured GeoJSON.
fn passthrough_result(mut row: Map<String, Value>) -> Result<Value, ServiceError> {
    let parsed = match row.get("geojson") {
        Some(Value::String(raw)) => Some(serde_json::from_str::<Value>(raw).map_err(|err| {
            ServiceError::MalformedGeometry(format!(
                "stored geojson column is not valid JSON: {err}"
            ))
        })?),
        _ => None,
    };
    if let Some(parsed) = parsed {
        row.insert("geojson".to_string(), parsed);
    }
    Ok(Value::Object(row))
}

fn object_url(huc: &str) -> String {
    format!("https://podaac-feature-translation-service.s3-us-west-2.amazonaws.com/{huc}.zip")
}

// Source archives are staged per two-digit HU2 prefix.
fn source_url(huc: &str) -> String {
    let prefix = huc.get(..2).unwrap_or(huc);
    format!(
        "ftp://rockyftp.cr.usgs.gov/vdelivery/Datasets/Staged/Hydrography/WBD/HU2/Shape/WBD_{prefix}_HU2_Shape.zip"
    )
}
