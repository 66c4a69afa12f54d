use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum DBError {
    Connect(String),
    Prepare(String),
    Query(String),
    Decode(String),
    Timeout(Duration),
}

impl DBError {
    /// Machine readable kind reported to API clients
    pub fn kind(&self) -> &'static str {
        match self {
            DBError::Connect(_) => "db_connect",
            DBError::Prepare(_) => "prepare_failed",
            DBError::Query(_) => "query_failed",
            DBError::Decode(_) => "decode_failed",
            DBError::Timeout(_) => "query_timeout",
        }
    }

    pub fn message(&self) -> String {
        match self {
            DBError::Connect(e) | DBError::Prepare(e) | DBError::Query(e) | DBError::Decode(e) => e.clone(),
            DBError::Timeout(d) => format!("store access exceeded {} seconds", d.as_secs()),
        }
    }
}

impl fmt::Display for DBError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DBError::Connect(e) => write!(f, "DBError::Connect: {}", e),
            DBError::Prepare(e) => write!(f, "DBError::Prepare: {}", e),
            DBError::Query(e) => write!(f, "DBError::Query: {}", e),
            DBError::Decode(e) => write!(f, "DBError::Decode: {}", e),
            DBError::Timeout(d) => write!(f, "DBError::Timeout: after {:?}", d),
        }
    }
}

impl From<rusqlite::Error> for DBError {
    fn from(e: rusqlite::Error) -> Self { DBError::Query(e.to_string()) }
}
impl From<tokio::task::JoinError> for DBError {
    fn from(e: tokio::task::JoinError) -> Self { DBError::Query(e.to_string()) }
}
