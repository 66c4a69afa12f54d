mod errors;
mod handlers;
mod initialization;
mod logging;
mod manager_db;
mod request;
mod response;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use log::info;
use crate::errors::UnrecoverableError;
use crate::initialization::config;
use crate::manager_db::Store;

struct AppState {
    store: Store,
}

#[actix_web::main]
async fn main() -> Result<(), UnrecoverableError> {
    let config = config()?;
    let store = Store::new(&config.db);

    info!("serving weather data from {} on {}:{}",
        config.db.db_path.display(), config.web_server.bind_address, config.web_server.bind_port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(web::Data::new(AppState { store: store.clone() }))
            .configure(handlers::config_endpoints)
    })
        .bind((config.web_server.bind_address.as_str(), config.web_server.bind_port))?
        .run()
        .await?;

    Ok(())
}
