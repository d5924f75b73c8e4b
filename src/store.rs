use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags, params};

use crate::error::ServiceError;
use crate::pipeline::SimplifiedRecord;

/// Explicitly constructed store client over the feature database. Opening
/// is the fail-fast initialization step: a missing or unopenable database
/// surfaces before any request is served.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Opens the database read-only for the query path.
    pub fn open_read(path: &Path) -> Result<Self, ServiceError> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|err| {
                ServiceError::StoreUnavailable(format!(
                    "could not open feature database {}: {err}",
                    path.display()
                ))
            })?;
        apply_read_pragmas(&conn)
            .map_err(|err| ServiceError::StoreUnavailable(err.to_string()))?;
        Ok(Self { conn })
    }

    /// Opens (or creates) the database for the offline load path.
    pub fn open_write(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open feature database: {}", path.display()))?;
        Ok(Self { conn })
    }

    pub fn init_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "
                CREATE TABLE IF NOT EXISTS huc_table (
                    HUC TEXT PRIMARY KEY,
                    Region TEXT NOT NULL,
                    convex_hull TEXT NOT NULL,
                    visvalingam TEXT NOT NULL,
                    bbox TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS reaches (
                    x REAL,
                    y REAL,
                    reach_id TEXT PRIMARY KEY,
                    reach_len REAL,
                    wse REAL,
                    width REAL,
                    facc REAL,
                    river_name TEXT,
                    geojson TEXT,
                    shp_origin TEXT,
                    netcdf_origin TEXT
                );
                CREATE TABLE IF NOT EXISTS nodes (
                    x REAL,
                    y REAL,
                    node_id TEXT PRIMARY KEY,
                    node_len REAL,
                    reach_id TEXT,
                    wse REAL,
                    width REAL,
                    river_name TEXT,
                    geojson TEXT,
                    shp_origin TEXT,
                    netcdf_origin TEXT
                );
                CREATE INDEX IF NOT EXISTS reach_river_name_idx ON reaches(river_name);
                CREATE INDEX IF NOT EXISTS node_river_name_idx ON nodes(river_name);
                ",
            )
            .context("failed to create feature schema")?;
        Ok(())
    }

    /// Writes a batch of simplified records. Each record's three geometry
    /// encodings land in a single statement, so the query path never
    /// observes a partially written row; the surrounding transaction makes
    /// the batch itself all-or-nothing.
    pub fn write_records(&mut self, records: &[SimplifiedRecord]) -> Result<()> {
        let tx = self.conn.transaction().context("begin load transaction")?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT OR REPLACE INTO huc_table
                     (HUC, Region, convex_hull, visvalingam, bbox)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )
                .context("prepare record insert")?;
            for record in records {
                stmt.execute(params![
                    record.huc,
                    record.region,
                    record.convex_hull,
                    record.visvalingam,
                    record.bbox,
                ])
                .with_context(|| format!("insert record {}", record.huc))?;
            }
        }
        tx.commit().context("commit load transaction")?;
        Ok(())
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

fn apply_read_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        PRAGMA query_only = ON;
        PRAGMA temp_store = MEMORY;
        PRAGMA cache_size = -200000;
        ",
    )
}
