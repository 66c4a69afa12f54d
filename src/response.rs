use std::fmt;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::{error, warn};
use serde::Serialize;
use crate::manager_db::errors::DBError;
use crate::manager_db::models::{LatestSnapshot, TimeSeriesPoint};
use crate::manager_db::DayData;
use crate::request::{ValidationError, INVALID_DATE_MESSAGE};

#[derive(Serialize, Debug)]
pub struct DataResponse {
    pub series: Vec<TimeSeriesPoint>,
    pub latest: Option<LatestSnapshot>,
}

impl From<DayData> for DataResponse {
    fn from(data: DayData) -> Self {
        DataResponse { series: data.series, latest: data.latest }
    }
}

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Any failure of the data pipeline, as reported to API clients
///
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    Store(DBError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(e) => write!(f, "{}", e),
            ApiError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self { ApiError::Validation(e) }
}
impl From<DBError> for ApiError {
    fn from(e: DBError) -> Self { ApiError::Store(e) }
}

impl ApiError {
    pub fn body(&self) -> ErrorBody {
        match self {
            ApiError::Validation(_) => ErrorBody {
                error: INVALID_DATE_MESSAGE.to_string(),
                message: None,
            },
            ApiError::Store(e) => ErrorBody {
                error: e.kind().to_string(),
                message: Some(e.message()),
            },
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Validation(e) => warn!("rejected request: {}", e),
            ApiError::Store(e) => error!("failed to read weather data: {}", e),
        }
        HttpResponse::build(self.status_code()).json(self.body())
    }
}

/// Merges the store results into a response, or passes the first failure through
///
/// # Arguments
///
/// * 'data' - the outcome of the store stage
pub fn assemble(data: Result<DayData, DBError>) -> Result<DataResponse, ApiError> {
    Ok(DataResponse::from(data?))
}
