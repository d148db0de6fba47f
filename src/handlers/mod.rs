pub mod auth;
pub mod dashboard;
pub mod donation;

use actix_web::web;

use crate::errors::AppError;

/// Every route, plus extractor configs that turn malformed input into `AppError`.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| AppError::bad_request(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| AppError::bad_request(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|_, _| AppError::NotFound.into()),
    )
    .service(web::scope("/auth").configure(auth::init_routes));
    donation::init_routes(cfg);
    dashboard::init_routes(cfg);
}
