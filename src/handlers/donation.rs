use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};
use chrono::Utc;
use log::error;
use uuid::Uuid;

use crate::{
    config::Config,
    db::Store,
    dto::{DonationQuery, DonationView, NewDonationDto},
    service,
};

#[get("/donations")]
pub async fn get_all(query: web::Query<DonationQuery>, store: web::Data<Store>) -> impl Responder {
    match service::donation::list(&query, &store, Utc::now()).await {
        Ok(donations) => HttpResponse::Ok().json(donations),
        Err(err) => HttpResponse::from_error(err),
    }
}

#[post("/donation/new")]
pub async fn create(
    req: HttpRequest,
    dto: web::Json<NewDonationDto>,
    store: web::Data<Store>,
    config: web::Data<Config>,
) -> impl Responder {
    let auth = match service::auth::current(&req) {
        Ok(auth) => auth,
        Err(err) => return HttpResponse::from_error(err),
    };
    match service::donation::create(&auth, dto.into_inner(), &store, &config).await {
        Ok(donation) => HttpResponse::Created().json(DonationView::new(donation, Utc::now())),
        Err(err) => {
            error!("[{:} : {:}] donation rejected: {}", file!(), line!(), err);
            HttpResponse::from_error(err)
        }
    }
}

#[get("/donation/{id}")]
pub async fn get_by_id(
    id: web::Path<Uuid>,
    store: web::Data<Store>,
    config: web::Data<Config>,
) -> impl Responder {
    match service::donation::get_by_id(id.into_inner(), &store, &config, Utc::now()).await {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(err) => HttpResponse::from_error(err),
    }
}

#[post("/donation/{id}/accept")]
pub async fn accept(
    req: HttpRequest,
    id: web::Path<Uuid>,
    store: web::Data<Store>,
    config: web::Data<Config>,
) -> impl Responder {
    let auth = match service::auth::current(&req) {
        Ok(auth) => auth,
        Err(err) => return HttpResponse::from_error(err),
    };
    match service::donation::accept(&auth, id.into_inner(), &store, &config).await {
        Ok(donation) => HttpResponse::Ok().json(DonationView::new(donation, Utc::now())),
        Err(err) => HttpResponse::from_error(err),
    }
}

#[post("/donation/{id}/complete-pickup")]
pub async fn complete_pickup(
    req: HttpRequest,
    id: web::Path<Uuid>,
    store: web::Data<Store>,
    config: web::Data<Config>,
) -> impl Responder {
    let auth = match service::auth::current(&req) {
        Ok(auth) => auth,
        Err(err) => return HttpResponse::from_error(err),
    };
    match service::donation::complete_pickup(&auth, id.into_inner(), &store, &config).await {
        Ok(donation) => HttpResponse::Ok().json(DonationView::new(donation, Utc::now())),
        Err(err) => HttpResponse::from_error(err),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_all)
        .service(create)
        .service(get_by_id)
        .service(accept)
        .service(complete_pickup);
}
