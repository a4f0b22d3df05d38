//! Persistence helpers around the read-only vehicle-registry SQLite file.
//! Every function in this module tries to encapsulate one query so the rest of
//! the codebase can stay focused on UI state management. The registry is
//! produced and maintained by an external process; nothing in here ever writes
//! to it, and the connection is opened read-only to make that a hard
//! guarantee rather than a convention.

use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, OpenFlags, Row};
use thiserror::Error;

use crate::models::PlateRecord;

/// Column list shared by every record query. Keeping the projection in one
/// constant pins the column-index mapping used by `record_from_row`.
const RECORD_COLUMNS: &str = "ActualNB, CodeDesc, Prenom, Nom, TelProp, AgeProp, \
     BirthPlace, NomMere, Addresse, MarqueDesc, TypeDesc, PRODDATE, Chassis, Moteur";

/// Failures the store layer can produce. The variants deliberately mirror the
/// places they occur so the presentation layer can decide how loud each one
/// should be: an unopenable file ends the session, a failed category load only
/// costs the filter dropdown, and a failed search is reported without being
/// confused with an empty result.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The registry file could not be opened (missing, unreadable, corrupt).
    #[error("failed to open registry database at {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    /// The distinct-category query failed.
    #[error("failed to load category list: {0}")]
    Categories(#[source] rusqlite::Error),
    /// The record search itself failed.
    #[error("search query failed: {0}")]
    Search(#[source] rusqlite::Error),
    /// A search was requested without a plate number. The UI blocks this
    /// before calling, so hitting the variant means a programmatic caller
    /// skipped the guard.
    #[error("a plate number is required")]
    EmptyPlate,
}

/// Open the registry file for the lifetime of one session. The read-only flag
/// makes SQLite refuse both writes and creation of a missing file, so a bad
/// path surfaces here instead of producing an empty shadow database. The
/// connection is released by `Drop` on every exit path.
pub fn open_database(path: &Path) -> Result<Connection, StoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;
    Connection::open_with_flags(path, flags).map_err(|source| StoreError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Retrieve the distinct category labels present in the registry, sorted for
/// the dropdown. Blank and NULL labels are filtered out here so the UI never
/// has to special-case them. Safe to call repeatedly; the result simply
/// reflects whatever the data file holds at that moment.
pub fn fetch_categories(conn: &Connection) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn
        .prepare(
            "SELECT DISTINCT CodeDesc FROM CARMDI
             WHERE CodeDesc IS NOT NULL AND CodeDesc <> ''
             ORDER BY CodeDesc",
        )
        .map_err(StoreError::Categories)?;

    let mut rows = stmt.query([]).map_err(StoreError::Categories)?;

    let mut categories = Vec::new();
    while let Some(row) = rows.next().map_err(StoreError::Categories)? {
        categories.push(column_text(row, 0).map_err(StoreError::Categories)?);
    }

    Ok(categories)
}

/// Normalized search input: the plate number is required, the category is an
/// optional second predicate. The constructor does the trimming so every
/// caller (UI or programmatic) goes through the same normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub plate_number: String,
    pub category: Option<String>,
}

impl SearchQuery {
    /// Build a query from raw user input. A blank category collapses to
    /// `None`, which omits the category predicate entirely.
    pub fn new(plate_number: &str, category: Option<&str>) -> Self {
        let category = category
            .map(str::trim)
            .filter(|category| !category.is_empty())
            .map(str::to_string);
        Self {
            plate_number: plate_number.trim().to_string(),
            category,
        }
    }
}

/// Find every record matching the query. Both predicates are exact-equality
/// and compose conjunctively through [`SqlFilter`]. An empty plate number is
/// rejected rather than treated as a match-everything wildcard; the registry
/// is large enough that an unfiltered dump is never what anyone meant.
pub fn search_plates(
    conn: &Connection,
    query: &SearchQuery,
) -> Result<Vec<PlateRecord>, StoreError> {
    if query.plate_number.is_empty() {
        return Err(StoreError::EmptyPlate);
    }

    let mut filter = SqlFilter::new();
    filter.equals("ActualNB", &query.plate_number);
    if let Some(category) = &query.category {
        filter.equals("CodeDesc", category);
    }

    let sql = filter.apply(&format!("SELECT {RECORD_COLUMNS} FROM CARMDI"));
    let mut stmt = conn.prepare(&sql).map_err(StoreError::Search)?;

    let records = stmt
        .query_map(params_from_iter(filter.params()), record_from_row)
        .map_err(StoreError::Search)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::Search)?;

    Ok(records)
}

/// Small composable WHERE-clause builder: a list of `column = ?N` fragments
/// plus the bound parameters in matching positional order. User input only
/// ever travels through the parameter list, never through the SQL text.
struct SqlFilter {
    clauses: Vec<String>,
    params: Vec<String>,
}

impl SqlFilter {
    fn new() -> Self {
        Self {
            clauses: Vec::new(),
            params: Vec::new(),
        }
    }

    /// Add an exact-equality predicate. The placeholder index is derived from
    /// the parameter count so clause order and parameter order cannot drift
    /// apart.
    fn equals(&mut self, column: &str, value: &str) {
        self.clauses.push(format!("{column} = ?{}", self.params.len() + 1));
        self.params.push(value.to_string());
    }

    /// Append the accumulated predicates to a base SELECT. With no clauses the
    /// base statement is returned untouched.
    fn apply(&self, base: &str) -> String {
        if self.clauses.is_empty() {
            base.to_string()
        } else {
            format!("{base} WHERE {}", self.clauses.join(" AND "))
        }
    }

    fn params(&self) -> impl Iterator<Item = &String> {
        self.params.iter()
    }
}

/// Hydrate a [`PlateRecord`] from a row selected with [`RECORD_COLUMNS`].
fn record_from_row(row: &Row<'_>) -> rusqlite::Result<PlateRecord> {
    Ok(PlateRecord {
        plate_number: column_text(row, 0)?,
        category: column_text(row, 1)?,
        first_name: column_text(row, 2)?,
        last_name: column_text(row, 3)?,
        phone: column_text(row, 4)?,
        birth_details: column_text(row, 5)?,
        birth_place: column_text(row, 6)?,
        mother_name: column_text(row, 7)?,
        address: column_text(row, 8)?,
        make: column_text(row, 9)?,
        model: column_text(row, 10)?,
        production_date: column_text(row, 11)?,
        chassis: column_text(row, 12)?,
        engine: column_text(row, 13)?,
    })
}

/// Read any column as text. The registry mixes storage classes (years and
/// phone numbers show up as INTEGER, the rest as TEXT, with NULL holes
/// throughout), so the usual typed `row.get` would fail on real data.
fn column_text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => String::new(),
        ValueRef::Integer(value) => value.to_string(),
        ValueRef::Real(value) => value.to_string(),
        ValueRef::Text(text) => String::from_utf8_lossy(text).into_owned(),
        ValueRef::Blob(blob) => String::from_utf8_lossy(blob).into_owned(),
    })
}
