use actix_web::{get, web, HttpResponse};
use chrono::Local;
use log::info;
use serde::Deserialize;
use crate::request::validate_date;
use crate::response::{assemble, ApiError};
use crate::AppState;

#[derive(Deserialize, Debug)]
struct DataParams {
    date: Option<String>,
}

// date=2024-01-01
#[get("/api/data")]
async fn data(params: web::Query<DataParams>, state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    info!("{:?}", params);

    let window = validate_date(params.date.as_deref(), Local::now().date_naive())?;
    let response = assemble(state.store.fetch_day(window).await)?;

    Ok(HttpResponse::Ok().json(response))
}

pub fn config_endpoints(cfg: &mut web::ServiceConfig) {
    cfg.service(data);
}
