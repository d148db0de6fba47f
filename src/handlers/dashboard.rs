use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;

use crate::{config::Config, db::Store, dto::DonationQuery, service};

#[get("/donor")]
pub async fn donor(req: HttpRequest, store: web::Data<Store>) -> impl Responder {
    let auth = match service::auth::current(&req) {
        Ok(auth) => auth,
        Err(err) => return HttpResponse::from_error(err),
    };
    match service::dashboard::donor(&auth, &store, Utc::now()).await {
        Ok(dashboard) => HttpResponse::Ok().json(dashboard),
        Err(err) => HttpResponse::from_error(err),
    }
}

#[get("/recipient")]
pub async fn recipient(req: HttpRequest, store: web::Data<Store>) -> impl Responder {
    let auth = match service::auth::current(&req) {
        Ok(auth) => auth,
        Err(err) => return HttpResponse::from_error(err),
    };
    match service::dashboard::recipient(&auth, &store, Utc::now()).await {
        Ok(dashboard) => HttpResponse::Ok().json(dashboard),
        Err(err) => HttpResponse::from_error(err),
    }
}

#[get("/admin")]
pub async fn admin(req: HttpRequest, store: web::Data<Store>) -> impl Responder {
    let auth = match service::auth::current(&req) {
        Ok(auth) => auth,
        Err(err) => return HttpResponse::from_error(err),
    };
    match service::dashboard::admin(&auth, &store).await {
        Ok(overview) => HttpResponse::Ok().json(overview),
        Err(err) => HttpResponse::from_error(err),
    }
}

#[get("/map")]
pub async fn map(
    query: web::Query<DonationQuery>,
    store: web::Data<Store>,
    config: web::Data<Config>,
) -> impl Responder {
    match service::map::markers(&query, &store, &config, Utc::now()).await {
        Ok(res) => HttpResponse::Ok().json(res),
        Err(err) => HttpResponse::from_error(err),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(donor)
        .service(recipient)
        .service(admin)
        .service(map);
}
