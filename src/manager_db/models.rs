use rusqlite::Row;
use rusqlite::types::ValueRef;
use serde::Serialize;
use crate::manager_db::errors::DBError;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TimeSeriesPoint {
    pub time: String,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LatestSnapshot {
    pub time: String,
    pub wind_direction: Option<String>,
    pub wind_speed: Option<f64>,
    pub rainfall: Option<f64>,
    pub pressure: Option<f64>,
    pub humidity: Option<f64>,
    pub altitude: Option<f64>,
    pub temperature: Option<f64>,
}

impl TimeSeriesPoint {
    /// Maps a `time, temperature, wind_speed` row
    pub fn from_row(row: &Row) -> Result<Self, DBError> {
        Ok(TimeSeriesPoint {
            time: column_time(row, 0, "time")?,
            temperature: column_f64(row, 1, "temperature")?,
            wind_speed: column_f64(row, 2, "wind_speed")?,
        })
    }
}

impl LatestSnapshot {
    /// Maps a `time, wind_direction, wind_speed, rainfall, pressure, humidity, altitude,
    /// temperature` row
    pub fn from_row(row: &Row) -> Result<Self, DBError> {
        Ok(LatestSnapshot {
            time: column_time(row, 0, "time")?,
            wind_direction: column_text(row, 1, "wind_direction")?,
            wind_speed: column_f64(row, 2, "wind_speed")?,
            rainfall: column_f64(row, 3, "rainfall")?,
            pressure: column_f64(row, 4, "pressure")?,
            humidity: column_f64(row, 5, "humidity")?,
            altitude: column_f64(row, 6, "altitude")?,
            temperature: column_f64(row, 7, "temperature")?,
        })
    }
}

/// Reads the timestamp column as stored, only text is accepted
fn column_time(row: &Row, idx: usize, name: &str) -> Result<String, DBError> {
    coerce_time(row.get_ref(idx)?, name)
}

fn coerce_time(value: ValueRef, name: &str) -> Result<String, DBError> {
    match value {
        ValueRef::Text(t) => std::str::from_utf8(t)
            .map(|s| s.to_string())
            .map_err(|e| DBError::Decode(format!("{}: {}", name, e))),
        other => Err(DBError::Decode(format!("{}: expected a timestamp, got {:?}", name, other.data_type()))),
    }
}

/// Reads a nullable numeric column, parsing text representations and failing on anything
/// that is not a number
fn column_f64(row: &Row, idx: usize, name: &str) -> Result<Option<f64>, DBError> {
    coerce_f64(row.get_ref(idx)?, name)
}

fn coerce_f64(value: ValueRef, name: &str) -> Result<Option<f64>, DBError> {
    match value {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(i) => Ok(Some(i as f64)),
        ValueRef::Real(r) => Ok(Some(r)),
        ValueRef::Text(t) => {
            let text = std::str::from_utf8(t)
                .map_err(|e| DBError::Decode(format!("{}: {}", name, e)))?;
            match text.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Some(v)),
                _ => Err(DBError::Decode(format!("{}: {:?} is not a number", name, text))),
            }
        }
        ValueRef::Blob(_) => Err(DBError::Decode(format!("{}: expected a number, got a blob", name))),
    }
}

fn column_text(row: &Row, idx: usize, name: &str) -> Result<Option<String>, DBError> {
    coerce_text(row.get_ref(idx)?, name)
}

fn coerce_text(value: ValueRef, name: &str) -> Result<Option<String>, DBError> {
    match value {
        ValueRef::Null => Ok(None),
        ValueRef::Text(t) => std::str::from_utf8(t)
            .map(|s| Some(s.to_string()))
            .map_err(|e| DBError::Decode(format!("{}: {}", name, e))),
        ValueRef::Integer(i) => Ok(Some(i.to_string())),
        ValueRef::Real(r) => Ok(Some(r.to_string())),
        ValueRef::Blob(_) => Err(DBError::Decode(format!("{}: expected text, got a blob", name))),
    }
}
