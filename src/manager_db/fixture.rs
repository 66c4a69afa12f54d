use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use rusqlite::{params, Connection};
use crate::initialization::DBConfig;
use crate::manager_db::Store;

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// Throwaway weather store in the system temp directory, removed on drop
///
pub struct TestDb {
    path: PathBuf,
    conn: Connection,
}

impl TestDb {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!(
            "weatherapi-test-{}-{}.db",
            std::process::id(),
            NEXT_ID.fetch_add(1, Ordering::SeqCst),
        ));
        let _ = std::fs::remove_file(&path);

        let conn = Connection::open(&path).unwrap();
        conn.execute(
            "CREATE TABLE weather_data (
                time text not null primary key,
                temperature real null,
                wind_speed real null,
                wind_direction text null,
                rainfall real null,
                pressure real null,
                humidity real null,
                altitude real null
            )",
            [],
        ).unwrap();

        TestDb { path, conn }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn store(&self) -> Store {
        self.store_at(self.path.clone())
    }

    pub fn store_at(&self, db_path: PathBuf) -> Store {
        Store::new(&DBConfig { db_path, connect_timeout_secs: 5, query_timeout_secs: 10 })
    }

    pub fn store_with_timeouts(&self, connect_timeout_secs: u64, query_timeout_secs: u64) -> Store {
        Store::new(&DBConfig { db_path: self.path.clone(), connect_timeout_secs, query_timeout_secs })
    }

    /// Holds an exclusive write lock with an uncommitted insert until the fixture is dropped
    pub fn lock_exclusive(&self) {
        self.conn.execute_batch(
            "BEGIN EXCLUSIVE;
             INSERT INTO weather_data (time, temperature) VALUES ('2024-01-01 12:30:00', 1.0);",
        ).unwrap();
    }

    pub fn execute(&self, sql: &str) {
        self.conn.execute(sql, []).unwrap();
    }

    pub fn insert(&self, time: &str, temperature: Option<f64>, wind_speed: Option<f64>) {
        self.conn.execute(
            "INSERT INTO weather_data (time, temperature, wind_speed) VALUES (?1, ?2, ?3)",
            params![time, temperature, wind_speed],
        ).unwrap();
    }

    /// Inserts one full reading per hour of the given date
    pub fn insert_hourly(&self, date: &str) {
        for hour in 0..24 {
            self.conn.execute(
                "INSERT INTO weather_data (time, temperature, wind_speed, wind_direction, rainfall, pressure, humidity, altitude)
                    VALUES (?1, ?2, ?3, 'S', 0.0, 1010.0, 70.0, 42.0)",
                params![format!("{} {:02}:00:00", date, hour), -2.0 + hour as f64 * 0.5, hour as f64],
            ).unwrap();
        }
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
