use clap::Parser;

use fts::cli::{Cli, Command};

#[test]
fn parse_query_minimal() {
    let cli = Cli::parse_from(["fts", "query", "features.db", "--huc", "1804"]);
    match cli.command {
        Command::Query(args) => {
            assert_eq!(args.db.as_os_str(), "features.db");
            assert_eq!(args.huc.as_deref(), Some("1804"));
            assert_eq!(args.region, None);
            assert_eq!(args.exact, None);
            assert_eq!(args.polygon_format, None);
            assert_eq!(args.page_number, None);
            assert_eq!(args.page_size, None);
        }
        _ => panic!("expected query command"),
    }
}

#[test]
fn parse_query_options() {
    let cli = Cli::parse_from([
        "fts",
        "query",
        "features.db",
        "--name",
        "San%20Joaquin",
        "--exact",
        "true",
        "--polygon-format",
        "geojson",
        "--page-number",
        "2",
        "--page-size",
        "50",
        "--reaches",
        "false",
    ]);
    match cli.command {
        Command::Query(args) => {
            assert_eq!(args.name.as_deref(), Some("San%20Joaquin"));
            assert_eq!(args.exact.as_deref(), Some("true"));
            assert_eq!(args.polygon_format.as_deref(), Some("geojson"));
            assert_eq!(args.page_number.as_deref(), Some("2"));
            assert_eq!(args.page_size.as_deref(), Some("50"));
            assert_eq!(args.reaches.as_deref(), Some("false"));
            assert_eq!(args.nodes, None);
        }
        _ => panic!("expected query command"),
    }
}

#[test]
fn parse_simplify_defaults() {
    let cli = Cli::parse_from(["fts", "simplify", "huc.geojson", "--db", "features.db"]);
    match cli.command {
        Command::Simplify(args) => {
            assert_eq!(args.input.as_os_str(), "huc.geojson");
            assert_eq!(args.db.as_os_str(), "features.db");
            assert_eq!(args.max_vertices, 300);
            assert!(!args.no_progress);
        }
        _ => panic!("expected simplify command"),
    }
}

#[test]
fn parse_simplify_options() {
    let cli = Cli::parse_from([
        "fts",
        "--log",
        "debug",
        "simplify",
        "huc.geojson",
        "--db",
        "features.db",
        "--max-vertices",
        "120",
        "--no-progress",
    ]);
    assert_eq!(cli.log, "debug");
    match cli.command {
        Command::Simplify(args) => {
            assert_eq!(args.max_vertices, 120);
            assert!(args.no_progress);
        }
        _ => panic!("expected simplify command"),
    }
}
