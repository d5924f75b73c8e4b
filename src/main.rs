use std::collections::BTreeMap;

use anyhow::Result;
use clap::Parser;
use serde_json::json;

use fts::cli::{Cli, Command, QueryArgs};
use fts::pipeline;
use fts::query;
use fts::store::Store;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    match cli.command {
        Command::Query(args) => {
            let store = match Store::open_read(&args.db) {
                Ok(store) => store,
                Err(err) => {
                    // Fail fast before serving anything.
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            };
            let params = query_params(&args);
            match query::run(&store, &params) {
                Ok(envelope) => {
                    println!("{}", serde_json::to_string_pretty(&envelope)?);
                }
                Err(err) => {
                    let body = json!({ "error": err.to_string() });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                    std::process::exit(1);
                }
            }
        }
        Command::Simplify(args) => {
            let report = pipeline::run(&args.input, &args.db, args.max_vertices, args.no_progress)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn query_params(args: &QueryArgs) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    let fields = [
        ("huc", &args.huc),
        ("region", &args.region),
        ("reach", &args.reach),
        ("node", &args.node),
        ("name", &args.name),
        ("river_name", &args.river_name),
        ("exact", &args.exact),
        ("polygon_format", &args.polygon_format),
        ("page_number", &args.page_number),
        ("page_size", &args.page_size),
        ("reaches", &args.reaches),
        ("nodes", &args.nodes),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            params.insert(key.to_string(), value.clone());
        }
    }
    params
}

fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
