use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, params_from_iter};
use serde_json::{Map, Value};

use crate::error::ServiceError;
use crate::query::request::{SearchKind, SearchRequest};
use crate::store::Store;

/// One row of the HUC feature table, in canonical column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRow {
    pub huc: String,
    pub region: String,
    pub convex_hull: String,
    pub visvalingam: String,
    pub bbox: String,
}

/// Fetched rows, shaped per path: HUC/region rows are typed, the
/// reach/node/river-name path passes every stored column through.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultRows {
    Features(Vec<FeatureRow>),
    PassThrough(Vec<Map<String, Value>>),
}

impl ResultRows {
    pub fn len(&self) -> usize {
        match self {
            ResultRows::Features(rows) => rows.len(),
            ResultRows::PassThrough(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub hits: u64,
    pub rows: ResultRows,
}

/// Two-phase execution: count (non-exact only) then paginated fetch.
/// The phases are separate round trips; a write landing between them can
/// skew `hits` against the fetched page, which is accepted.
pub fn execute(store: &Store, request: &SearchRequest) -> Result<QueryOutcome, ServiceError> {
    match &request.kind {
        SearchKind::Huc { huc } => feature_query(store, request, "HUC", huc),
        SearchKind::Region { region } => feature_query(store, request, "Region", region),
        SearchKind::Reach { reach, river_name } => {
            id_query(store, request, "reaches", "reach_id", reach, river_name.as_deref())
        }
        SearchKind::Node { node, river_name } => {
            id_query(store, request, "nodes", "node_id", node, river_name.as_deref())
        }
        SearchKind::RiverName {
            name,
            include_reaches,
            include_nodes,
        } => river_query(store, request, name, *include_reaches, *include_nodes),
    }
}

const FEATURE_COLUMNS: &str = "HUC, Region, convex_hull, visvalingam, bbox";

fn feature_query(
    store: &Store,
    request: &SearchRequest,
    column: &str,
    value: &str,
) -> Result<QueryOutcome, ServiceError> {
    let conn = store.conn();
    if request.exact {
        let sql =
            format!("SELECT {FEATURE_COLUMNS} FROM huc_table WHERE {column} = ?1");
        let rows = feature_rows(conn, &sql, vec![SqlValue::from(value.to_string())])?;
        // Exact lookups are assumed unique; hits stays 1 even if the key
        // matches several rows.
        return Ok(QueryOutcome {
            hits: 1,
            rows: ResultRows::Features(rows),
        });
    }

    let pattern = format!("{value}%");
    let hits: u64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM huc_table WHERE {column} LIKE ?1"),
        [&pattern],
        |row| row.get::<_, i64>(0).map(|count| count as u64),
    )?;
    // Shorter codes sort first so broader hydrologic units lead the page.
    let sql = format!(
        "SELECT {FEATURE_COLUMNS} FROM huc_table WHERE {column} LIKE ?1 \
         ORDER BY LENGTH(HUC), HUC LIMIT ?2 OFFSET ?3"
    );
    let rows = feature_rows(
        conn,
        &sql,
        vec![
            SqlValue::from(pattern),
            SqlValue::from(request.page_size as i64),
            SqlValue::from(request.offset() as i64),
        ],
    )?;
    Ok(QueryOutcome {
        hits,
        rows: ResultRows::Features(rows),
    })
}

fn id_query(
    store: &Store,
    request: &SearchRequest,
    table: &str,
    id_column: &str,
    value: &str,
    river_name: Option<&str>,
) -> Result<QueryOutcome, ServiceError> {
    let conn = store.conn();
    if request.exact {
        let (sql, params) = match river_name {
            Some(name) => (
                format!(
                    "SELECT * FROM {table} WHERE {id_column} = ?1 AND river_name LIKE ?2"
                ),
                vec![
                    SqlValue::from(value.to_string()),
                    SqlValue::from(format!("{name}%")),
                ],
            ),
            None => (
                format!("SELECT * FROM {table} WHERE {id_column} = ?1"),
                vec![SqlValue::from(value.to_string())],
            ),
        };
        let rows = passthrough_rows(conn, &sql, params)?;
        return Ok(QueryOutcome {
            hits: 1,
            rows: ResultRows::PassThrough(rows),
        });
    }

    let pattern = format!("{value}%");
    let (count_sql, count_params) = match river_name {
        Some(name) => (
            format!(
                "SELECT COUNT(*) FROM {table} WHERE {id_column} LIKE ?1 AND river_name LIKE ?2"
            ),
            vec![
                SqlValue::from(pattern.clone()),
                SqlValue::from(format!("{name}%")),
            ],
        ),
        None => (
            format!("SELECT COUNT(*) FROM {table} WHERE {id_column} LIKE ?1"),
            vec![SqlValue::from(pattern.clone())],
        ),
    };
    let hits: u64 =
        conn.query_row(&count_sql, params_from_iter(count_params), |row| {
            row.get::<_, i64>(0).map(|count| count as u64)
        })?;

    let (fetch_sql, fetch_params) = match river_name {
        Some(name) => (
            format!(
                "SELECT * FROM {table} WHERE {id_column} LIKE ?1 AND river_name LIKE ?2 \
                 ORDER BY {id_column} LIMIT ?3 OFFSET ?4"
            ),
            vec![
                SqlValue::from(pattern),
                SqlValue::from(format!("{name}%")),
                SqlValue::from(request.page_size as i64),
                SqlValue::from(request.offset() as i64),
            ],
        ),
        None => (
            format!(
                "SELECT * FROM {table} WHERE {id_column} LIKE ?1 \
                 ORDER BY {id_column} LIMIT ?2 OFFSET ?3"
            ),
            vec![
                SqlValue::from(pattern),
                SqlValue::from(request.page_size as i64),
                SqlValue::from(request.offset() as i64),
            ],
        ),
    };
    let rows = passthrough_rows(conn, &fetch_sql, fetch_params)?;
    Ok(QueryOutcome {
        hits,
        rows: ResultRows::PassThrough(rows),
    })
}

fn river_query(
    store: &Store,
    request: &SearchRequest,
    name: &str,
    include_reaches: bool,
    include_nodes: bool,
) -> Result<QueryOutcome, ServiceError> {
    let conn = store.conn();
    let op = if request.exact { "=" } else { "LIKE" };
    let pattern = if request.exact {
        name.to_string()
    } else {
        format!("{name}%")
    };
    let limit = SqlValue::from(request.page_size as i64);
    let offset = SqlValue::from(request.offset() as i64);

    // The river-name path always counts, exact included, because even an
    // exact name fans out across reaches and nodes.
    let (count_sql, count_params, fetch_sql, fetch_params) =
        if include_reaches && include_nodes {
            (
                format!(
                    "SELECT COUNT(*) FROM reaches, nodes \
                     WHERE reaches.reach_id = nodes.reach_id \
                     AND reaches.river_name {op} ?1 AND nodes.river_name {op} ?2"
                ),
                vec![
                    SqlValue::from(pattern.clone()),
                    SqlValue::from(pattern.clone()),
                ],
                format!(
                    "SELECT reaches.*, nodes.* FROM reaches, nodes \
                     WHERE reaches.reach_id = nodes.reach_id \
                     AND reaches.river_name {op} ?1 AND nodes.river_name {op} ?2 \
                     ORDER BY node_id LIMIT ?3 OFFSET ?4"
                ),
                vec![
                    SqlValue::from(pattern.clone()),
                    SqlValue::from(pattern),
                    limit,
                    offset,
                ],
            )
        } else if include_nodes {
            (
                format!("SELECT COUNT(*) FROM nodes WHERE river_name {op} ?1"),
                vec![SqlValue::from(pattern.clone())],
                format!(
                    "SELECT * FROM nodes WHERE river_name {op} ?1 \
                     ORDER BY node_id LIMIT ?2 OFFSET ?3"
                ),
                vec![SqlValue::from(pattern), limit, offset],
            )
        } else {
            (
                format!("SELECT COUNT(*) FROM reaches WHERE river_name {op} ?1"),
                vec![SqlValue::from(pattern.clone())],
                format!(
                    "SELECT * FROM reaches WHERE river_name {op} ?1 \
                     ORDER BY reach_id LIMIT ?2 OFFSET ?3"
                ),
                vec![SqlValue::from(pattern), limit, offset],
            )
        };

    let hits: u64 =
        conn.query_row(&count_sql, params_from_iter(count_params), |row| {
            row.get::<_, i64>(0).map(|count| count as u64)
        })?;
    let rows = passthrough_rows(conn, &fetch_sql, fetch_params)?;
    Ok(QueryOutcome {
        hits,
        rows: ResultRows::PassThrough(rows),
    })
}

fn feature_rows(
    conn: &Connection,
    sql: &str,
    params: Vec<SqlValue>,
) -> Result<Vec<FeatureRow>, ServiceError> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params_from_iter(params))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(FeatureRow {
            huc: row.get(0)?,
            region: row.get(1)?,
            convex_hull: row.get(2)?,
            visvalingam: row.get(3)?,
            bbox: row.get(4)?,
        });
    }
    Ok(out)
}

fn passthrough_rows(
    conn: &Connection,
    sql: &str,
    params: Vec<SqlValue>,
) -> Result<Vec<Map<String, Value>>, ServiceError> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt
        .column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let mut rows = stmt.query(params_from_iter(params))?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut map = Map::new();
        for (index, column) in columns.iter().enumerate() {
            map.insert(column.clone(), sql_to_json(row.get_ref(index)?));
        }
        out.push(map);
    }
    Ok(out)
}

fn sql_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(int) => Value::from(int),
        ValueRef::Real(real) => serde_json::Number::from_f64(real)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(text) => Value::from(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(_) => Value::Null,
    }
}
