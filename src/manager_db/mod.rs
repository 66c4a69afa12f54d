pub mod errors;
pub mod models;
#[cfg(test)]
pub mod fixture;

use std::path::PathBuf;
use std::time::Duration;
use log::{debug, error};
use rusqlite::{params, Connection, InterruptHandle, OpenFlags};
use tokio::sync::oneshot;
use crate::initialization::DBConfig;
use crate::manager_db::errors::DBError;
use crate::manager_db::models::{LatestSnapshot, TimeSeriesPoint};
use crate::request::DayWindow;

/// Everything read from the store for one request
///
#[derive(Debug)]
pub struct DayData {
    pub series: Vec<TimeSeriesPoint>,
    pub latest: Option<LatestSnapshot>,
}

/// Read-only access to the weather store
///
/// Holds no connection itself, every request opens its own [`Session`].
#[derive(Debug, Clone)]
pub struct Store {
    db_path: PathBuf,
    connect_timeout: Duration,
    query_timeout: Duration,
}

impl Store {
    /// Creates a new instance of Store
    ///
    /// # Arguments
    ///
    /// * 'config' - the db section of the configuration
    pub fn new(config: &DBConfig) -> Self {
        Store {
            db_path: config.db_path.clone(),
            connect_timeout: config.connect_timeout(),
            query_timeout: config.query_timeout(),
        }
    }

    /// Opens a read-only session against the store
    ///
    /// The connect timeout bounds how long SQLite waits for locks held by the writer. A probe
    /// statement is run so that a missing or foreign file fails here and not at query time.
    pub fn connect(&self) -> Result<Session, DBError> {
        let conn = Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        ).map_err(|e| DBError::Connect(e.to_string()))?;

        conn.busy_timeout(self.connect_timeout)
            .map_err(|e| DBError::Connect(e.to_string()))?;
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(|e| DBError::Connect(e.to_string()))?;

        debug!("opened session on {}", self.db_path.display());
        Ok(Session { conn })
    }

    /// Reads the series for the given day and the latest snapshot on a blocking thread
    ///
    /// The work is bounded by the query timeout. If the timeout fires, or the returned future
    /// is dropped, the running statement is interrupted and the session released.
    ///
    /// # Arguments
    ///
    /// * 'window' - validated day bounds
    pub async fn fetch_day(&self, window: DayWindow) -> Result<DayData, DBError> {
        let store = self.clone();
        let date = window.date.clone();
        let (tx, rx) = oneshot::channel();
        let mut guard = InterruptGuard { handle: rx, armed: true };

        let task = tokio::task::spawn_blocking(move || store.read_day(&window, tx));

        let result = match tokio::time::timeout(self.query_timeout, task).await {
            Ok(joined) => joined?,
            Err(_) => {
                error!("store access for {} exceeded {:?}", date, self.query_timeout);
                Err(DBError::Timeout(self.query_timeout))
            }
        };

        if result.is_ok() {
            guard.armed = false;
        }
        result
    }

    /// Blocking part of [`Store::fetch_day`]
    ///
    /// The interrupt handle is handed over once connected. If nobody is left to receive it the
    /// request already timed out or was dropped, and no query is run.
    fn read_day(&self, window: &DayWindow, tx: oneshot::Sender<InterruptHandle>) -> Result<DayData, DBError> {
        let session = self.connect()?;
        if tx.send(session.conn.get_interrupt_handle()).is_err() {
            debug!("request for {} gone before querying, skipping", window.date);
            return Err(DBError::Timeout(self.query_timeout));
        }

        let series = session.time_series(&window.from, &window.to)?;
        let latest = session.latest_snapshot()?;

        Ok(DayData { series, latest })
    }
}

/// Interrupts the statement running on the session when dropped while still armed
///
struct InterruptGuard {
    handle: oneshot::Receiver<InterruptHandle>,
    armed: bool,
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        if self.armed {
            if let Ok(handle) = self.handle.try_recv() {
                debug!("interrupting in-flight store query");
                handle.interrupt();
            }
        }
    }
}

/// A connection scoped to one request, closed when dropped
///
pub struct Session {
    conn: Connection,
}

impl Session {
    /// Returns readings with `time` within the inclusive bounds, oldest first
    ///
    /// # Arguments
    ///
    /// * 'from' - lower bound, `YYYY-MM-DD HH:MM:SS`
    /// * 'to' - upper bound, `YYYY-MM-DD HH:MM:SS`
    pub fn time_series(&self, from: &str, to: &str) -> Result<Vec<TimeSeriesPoint>, DBError> {
        let mut stmt = self.conn.prepare(
            "SELECT time, temperature, wind_speed
                FROM weather_data
                WHERE time BETWEEN ?1 AND ?2
                ORDER BY time ASC;",
        ).map_err(|e| DBError::Prepare(e.to_string()))?;
        let mut rows = stmt.query(params![from, to])?;

        let mut result: Vec<TimeSeriesPoint> = Vec::new();
        while let Some(row) = rows.next()? {
            result.push(TimeSeriesPoint::from_row(row)?);
        }

        Ok(result)
    }

    /// Returns the most recent reading in the whole store, or None if the store is empty
    ///
    pub fn latest_snapshot(&self) -> Result<Option<LatestSnapshot>, DBError> {
        let mut stmt = self.conn.prepare(
            "SELECT time, wind_direction, wind_speed, rainfall, pressure, humidity, altitude, temperature
                FROM weather_data
                ORDER BY time DESC LIMIT 1;",
        ).map_err(|e| DBError::Prepare(e.to_string()))?;
        let mut rows = stmt.query([])?;

        match rows.next()? {
            Some(row) => Ok(Some(LatestSnapshot::from_row(row)?)),
            None => Ok(None),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!("released store session");
    }
}
