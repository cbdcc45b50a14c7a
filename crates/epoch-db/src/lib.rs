//! Storage layer for the epoch time tracker.
//!
//! Persists the timeline and stored drift adjustments using `rusqlite`, and
//! implements the [`TimelineRepository`] and [`AdjustmentsRepository`]
//! interfaces from `epoch-core`.
//!
//! # Thread Safety
//!
//! [`Database`] wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! Wrap it in a `Mutex` or open one `Database` per thread for shared access.
//!
//! # Schema
//!
//! ## Times
//!
//! Timeline entries are keyed by minutes since midnight, so there is at most
//! one entry per clock minute and `ORDER BY minute_of_day` is chronological.
//!
//! ## Code Identity
//!
//! Optional code fields are stored as `NULL` when unset. Because `NULL`s never
//! compare equal in a SQLite key, the `adjustments` table is keyed by a
//! canonical text rendering of the identity (see `identity_key`).

use std::path::Path;

use epoch_core::{
    AdjustmentsRepository, Duration, InvalidTime, RawDuration, Time, TimelineRepository,
    TimestampedEntry, Tlp, TlpKey,
};
use rusqlite::{Connection, OptionalExtension, Row, params};
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored timeline row does not hold a valid clock time.
    #[error("invalid stored time {minute_of_day} (minutes since midnight)")]
    InvalidStoredTime {
        minute_of_day: i64,
        #[source]
        source: InvalidTime,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// Columns holding a code, in the order [`tlp_from_row`] reads them.
const TLP_COLUMNS: &str = "tlp_code, description, customer, product, code, slg, dlg, prj";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        tracing::debug!(path = %path.display(), "opened database");
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- Timeline: one row per clock minute
            -- minute_of_day: minutes since midnight (0..1440)
            CREATE TABLE IF NOT EXISTS timeline (
                minute_of_day INTEGER PRIMARY KEY,
                tlp_code INTEGER NOT NULL,
                description TEXT NOT NULL,
                customer INTEGER,
                product INTEGER,
                code INTEGER,
                slg INTEGER,
                dlg INTEGER,
                prj INTEGER
            );

            -- Adjustments: starting drift per code identity
            -- tlp_key: canonical identity string, see identity_key()
            CREATE TABLE IF NOT EXISTS adjustments (
                tlp_key TEXT PRIMARY KEY,
                tlp_code INTEGER NOT NULL,
                description TEXT NOT NULL,
                customer INTEGER,
                product INTEGER,
                code INTEGER,
                slg INTEGER,
                dlg INTEGER,
                prj INTEGER,
                drift_minutes INTEGER NOT NULL
            );
            ",
        )?;
        Ok(())
    }
}

impl TimelineRepository for Database {
    type Error = DbError;

    fn add_entry(&mut self, entry: TimestampedEntry) -> Result<(), DbError> {
        let key = entry.tlp.key();
        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO timeline (minute_of_day, {TLP_COLUMNS})
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
            ),
            params![
                entry.time.minute_of_day(),
                key.tlp_code,
                entry.tlp.description(),
                key.customer,
                key.product,
                key.code,
                key.slg,
                key.dlg,
                key.prj,
            ],
        )?;
        Ok(())
    }

    fn entries(&self) -> Result<Vec<TimestampedEntry>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT minute_of_day, {TLP_COLUMNS} FROM timeline ORDER BY minute_of_day"
        ))?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, tlp_from_row(row, 1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(minute_of_day, tlp)| {
                let time = Time::from_minute_of_day(minute_of_day).map_err(|source| {
                    DbError::InvalidStoredTime {
                        minute_of_day,
                        source,
                    }
                })?;
                Ok(TimestampedEntry::new(tlp, time))
            })
            .collect()
    }

    fn remove_entry_at(&mut self, time: Time) -> Result<bool, DbError> {
        let removed = self.conn.execute(
            "DELETE FROM timeline WHERE minute_of_day = ?",
            params![time.minute_of_day()],
        )?;
        Ok(removed > 0)
    }

    fn update_entry_tlp(&mut self, entry: TimestampedEntry) -> Result<bool, DbError> {
        let key = entry.tlp.key();
        let updated = self.conn.execute(
            "
            UPDATE timeline
            SET tlp_code = ?, description = ?, customer = ?, product = ?,
                code = ?, slg = ?, dlg = ?, prj = ?
            WHERE minute_of_day = ?
            ",
            params![
                key.tlp_code,
                entry.tlp.description(),
                key.customer,
                key.product,
                key.code,
                key.slg,
                key.dlg,
                key.prj,
                entry.time.minute_of_day(),
            ],
        )?;
        Ok(updated > 0)
    }

    fn clear(&mut self) -> Result<(), DbError> {
        self.conn.execute("DELETE FROM timeline", [])?;
        Ok(())
    }
}

impl AdjustmentsRepository for Database {
    type Error = DbError;

    fn all(&self) -> Result<Vec<RawDuration>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TLP_COLUMNS}, drift_minutes FROM adjustments ORDER BY tlp_key"
        ))?;
        let adjustments = stmt
            .query_map([], adjustment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(adjustments)
    }

    fn get(&self, key: &TlpKey) -> Result<Option<RawDuration>, DbError> {
        let adjustment = self
            .conn
            .query_row(
                &format!(
                    "SELECT {TLP_COLUMNS}, drift_minutes FROM adjustments WHERE tlp_key = ?"
                ),
                params![identity_key(key)],
                adjustment_from_row,
            )
            .optional()?;
        Ok(adjustment)
    }

    fn remove(&mut self, key: &TlpKey) -> Result<bool, DbError> {
        let removed = self.conn.execute(
            "DELETE FROM adjustments WHERE tlp_key = ?",
            params![identity_key(key)],
        )?;
        Ok(removed > 0)
    }

    fn set(&mut self, adjustment: RawDuration) -> Result<(), DbError> {
        upsert_adjustment(&self.conn, &adjustment)?;
        Ok(())
    }

    /// Stores all adjustments in a single transaction.
    fn set_all(&mut self, adjustments: Vec<RawDuration>) -> Result<(), DbError> {
        if adjustments.is_empty() {
            return Ok(());
        }
        let tx = self.conn.transaction()?;
        for adjustment in &adjustments {
            upsert_adjustment(&tx, adjustment)?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn upsert_adjustment(conn: &Connection, adjustment: &RawDuration) -> rusqlite::Result<usize> {
    let key = adjustment.tlp.key();
    conn.execute(
        &format!(
            "INSERT OR REPLACE INTO adjustments (tlp_key, {TLP_COLUMNS}, drift_minutes)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        ),
        params![
            identity_key(key),
            key.tlp_code,
            adjustment.tlp.description(),
            key.customer,
            key.product,
            key.code,
            key.slg,
            key.dlg,
            key.prj,
            adjustment.duration.total_minutes(),
        ],
    )
}

/// Canonical text form of a code identity, `-` marking unset fields.
fn identity_key(key: &TlpKey) -> String {
    let field = |value: Option<i64>| value.map_or_else(|| "-".to_string(), |v| v.to_string());
    format!(
        "{}|{}|{}|{}|{}|{}|{}",
        key.tlp_code,
        field(key.customer),
        field(key.product),
        field(key.code),
        field(key.slg),
        field(key.dlg),
        field(key.prj),
    )
}

/// Reads the [`TLP_COLUMNS`] starting at column `start`.
fn tlp_from_row(row: &Row<'_>, start: usize) -> rusqlite::Result<Tlp> {
    let key = TlpKey {
        tlp_code: row.get(start)?,
        customer: row.get(start + 2)?,
        product: row.get(start + 3)?,
        code: row.get(start + 4)?,
        slg: row.get(start + 5)?,
        dlg: row.get(start + 6)?,
        prj: row.get(start + 7)?,
    };
    let description: String = row.get(start + 1)?;
    Ok(Tlp::from_key(key, description))
}

fn adjustment_from_row(row: &Row<'_>) -> rusqlite::Result<RawDuration> {
    let tlp = tlp_from_row(row, 0)?;
    let drift_minutes: i64 = row.get(8)?;
    Ok(RawDuration::new(tlp, Duration::from_minutes(drift_minutes)))
}
