pub mod config;
pub mod db;
pub mod handlers;
pub mod service;
pub mod models;
pub mod dto;
pub mod errors;

use actix_web::{HttpServer, App, web};
use chrono::Utc;
use config::Config;
use db::init_store;
use dotenv::dotenv;
use log::info;
use service::{auth::AuthMiddleware, log::{init_logger, LoggerMiddleware}, session::SessionStore};


#[actix_web::main]
async fn main() -> std::io::Result<()>{
    dotenv().ok();
    init_logger();
    let config = Config::from_env();
    let store = web::Data::new(init_store(Utc::now()));
    let sessions = web::Data::new(SessionStore::new());
    let addr = config.server_addr();
    info!("listening on {}:{}", addr.0, addr.1);
    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(sessions.clone())
            .app_data(web::Data::new(config.clone()))
            .wrap(AuthMiddleware {
                sessions: sessions.clone(),
                secret: config.jwt_secret.clone(),
            })
            .wrap(LoggerMiddleware)
            .configure(handlers::init_routes)
    })
    .bind(addr)?
    .run()
    .await
}
