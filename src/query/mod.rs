use std::collections::BTreeMap;
use std::time::Instant;

use serde_json::Value;

use crate::error::ServiceError;
use crate::store::Store;

pub mod executor;
pub mod request;
pub mod response;

pub use request::{PolygonFormat, SearchKind, SearchRequest};

/// Full online path for one request: resolve, count + fetch, assemble.
/// Errors are returned structured; the caller renders them at the request
/// boundary and never retries.
pub fn run(store: &Store, params: &BTreeMap<String, String>) -> Result<Value, ServiceError> {
    let request = SearchRequest::from_params(params)?;
    let start = Instant::now();
    let outcome = executor::execute(store, &request)?;
    let elapsed_ms = round_millis(start.elapsed().as_secs_f64() * 1000.0);
    response::assemble(&request, outcome, elapsed_ms)
}

fn round_millis(ms: f64) -> f64 {
    (ms * 1000.0).round() / 1000.0
}
