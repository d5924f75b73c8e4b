use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "fts", version, about = "HUC/river feature translation CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (error|warn|info|debug|trace)
    #[arg(long, default_value = "info")]
    pub log: String,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve an identifier against the feature database and print the
    /// response envelope as JSON.
    Query(QueryArgs),
    /// Simplify raw watershed polygons into the feature database.
    Simplify(SimplifyArgs),
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Feature database (SQLite)
    pub db: PathBuf,

    #[arg(long)]
    pub huc: Option<String>,

    #[arg(long)]
    pub region: Option<String>,

    #[arg(long)]
    pub reach: Option<String>,

    #[arg(long)]
    pub node: Option<String>,

    /// River name lookup (pairs with --reaches/--nodes)
    #[arg(long)]
    pub name: Option<String>,

    /// Secondary river-name filter for --reach/--node lookups
    #[arg(long)]
    pub river_name: Option<String>,

    /// "true" for an exact match, anything else for a prefix match
    #[arg(long)]
    pub exact: Option<String>,

    /// flat|geojson (HUC/region results only)
    #[arg(long)]
    pub polygon_format: Option<String>,

    #[arg(long)]
    pub page_number: Option<String>,

    #[arg(long)]
    pub page_size: Option<String>,

    /// "false" to exclude reaches from river-name results
    #[arg(long)]
    pub reaches: Option<String>,

    /// "false" to exclude nodes from river-name results
    #[arg(long)]
    pub nodes: Option<String>,
}

#[derive(Debug, Args)]
pub struct SimplifyArgs {
    /// GeoJSON FeatureCollection of raw watershed polygons
    pub input: PathBuf,

    /// Feature database (SQLite) to write into
    #[arg(long)]
    pub db: PathBuf,

    /// Maximum vertex budget for the simplified polygon
    #[arg(long, default_value_t = 300)]
    pub max_vertices: usize,

    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}
