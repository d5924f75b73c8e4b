use std::collections::BTreeMap;

use crate::error::ServiceError;

/// Geometry rendering requested for HUC/region results. The
/// reach/node/river-name path always returns structured GeoJSON and
/// ignores this modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonFormat {
    Flat,
    Geojson,
}

impl PolygonFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolygonFormat::Flat => "flat",
            PolygonFormat::Geojson => "geojson",
        }
    }
}

/// The five identifier kinds a request can resolve to. Recognition
/// priority is fixed: huc, region, reach, node, name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchKind {
    Huc {
        huc: String,
    },
    Region {
        region: String,
    },
    Reach {
        reach: String,
        river_name: Option<String>,
    },
    Node {
        node: String,
        river_name: Option<String>,
    },
    RiverName {
        name: String,
        include_reaches: bool,
        include_nodes: bool,
    },
}

impl SearchKind {
    /// Parameter name echoed back in the response envelope.
    pub fn parameter(&self) -> &'static str {
        match self {
            SearchKind::Huc { .. } => "HUC",
            SearchKind::Region { .. } => "region",
            SearchKind::Reach { .. } => "reach",
            SearchKind::Node { .. } => "node",
            SearchKind::RiverName { .. } => "name",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            SearchKind::Huc { huc } => huc,
            SearchKind::Region { region } => region,
            SearchKind::Reach { reach, .. } => reach,
            SearchKind::Node { node, .. } => node,
            SearchKind::RiverName { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub kind: SearchKind,
    pub exact: bool,
    pub polygon_format: PolygonFormat,
    pub page_number: u64,
    pub page_size: u64,
}

impl SearchRequest {
    /// Resolves a raw identifier-bearing parameter map into a typed
    /// request. The first recognized identifier wins; modifiers are
    /// validated here so an invalid request never reaches the store.
    pub fn from_params(params: &BTreeMap<String, String>) -> Result<Self, ServiceError> {
        let exact = params
            .get("exact")
            .map(|value| value.to_lowercase() == "true")
            .unwrap_or(false);

        let polygon_format = match params.get("polygon_format").map(|s| s.to_lowercase()) {
            None => PolygonFormat::Flat,
            Some(value) if value.is_empty() || value == "flat" => PolygonFormat::Flat,
            Some(value) if value == "geojson" => PolygonFormat::Geojson,
            Some(value) => {
                return Err(ServiceError::InvalidParameter(format!(
                    "Invalid polygon_format. Should be 'flat' or 'geojson', but '{value}' was given."
                )));
            }
        };

        let page_number = parse_page(params.get("page_number"), "page_number", 1)?;
        let page_size = parse_page(params.get("page_size"), "page_size", 100)?;

        let kind = if let Some(huc) = params.get("huc") {
            SearchKind::Huc { huc: huc.clone() }
        } else if let Some(region) = params.get("region") {
            SearchKind::Region {
                region: decode_spaces(region),
            }
        } else if let Some(reach) = params.get("reach") {
            SearchKind::Reach {
                reach: decode_spaces(reach),
                river_name: params.get("river_name").map(|name| decode_spaces(name)),
            }
        } else if let Some(node) = params.get("node") {
            SearchKind::Node {
                node: decode_spaces(node),
                river_name: params.get("river_name").map(|name| decode_spaces(name)),
            }
        } else if let Some(name) = params.get("name") {
            let include_reaches = include_flag(params.get("reaches"));
            let include_nodes = include_flag(params.get("nodes"));
            if !include_reaches && !include_nodes {
                return Err(ServiceError::InvalidCombination);
            }
            SearchKind::RiverName {
                name: decode_spaces(name),
                include_reaches,
                include_nodes,
            }
        } else {
            return Err(ServiceError::InvalidParameter(
                "The specified URL is invalid (does not exist).".to_string(),
            ));
        };

        Ok(Self {
            kind,
            exact,
            polygon_format,
            page_number,
            page_size,
        })
    }

    pub fn offset(&self) -> u64 {
        self.page_size * (self.page_number - 1)
    }
}

// Compatibility shim for percent-encoded separators arriving un-decoded.
// Only literal "%20" sequences are touched; matching stays case-sensitive
// and untrimmed otherwise.
fn decode_spaces(value: &str) -> String {
    value.split("%20").collect::<Vec<_>>().join(" ")
}

fn include_flag(value: Option<&String>) -> bool {
    match value {
        Some(value) => value.to_lowercase() != "false",
        None => true,
    }
}

fn parse_page(
    value: Option<&String>,
    field: &str,
    default: u64,
) -> Result<u64, ServiceError> {
    match value {
        None => Ok(default),
        Some(raw) if raw.is_empty() => Ok(default),
        Some(raw) => match raw.parse::<u64>() {
            Ok(parsed) if parsed >= 1 => Ok(parsed),
            _ => Err(ServiceError::InvalidParameter(format!(
                "{field} must be a number, 1 or greater."
            ))),
        },
    }
}
