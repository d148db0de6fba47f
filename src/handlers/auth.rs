use actix_web::{cookie::Cookie, get, post, put, web, HttpRequest, HttpResponse, Responder};
use log::{error, info};

use crate::{
    config::Config,
    db::Store,
    dto::{LoginUserRequest, NewUserDto, UpdateUserDto},
    service::{self, session::SessionStore},
};

const AUTH_FLAG_COOKIE: &str = "isAuthenticated";

fn auth_flag() -> Cookie<'static> {
    Cookie::build(AUTH_FLAG_COOKIE, "true").path("/").finish()
}

#[post("/login")]
pub async fn login(
    dto: web::Json<LoginUserRequest>,
    store: web::Data<Store>,
    sessions: web::Data<SessionStore>,
    config: web::Data<Config>,
) -> impl Responder {
    let response = service::user::login(dto.into_inner(), &store, &sessions, &config).await;
    match response {
        Ok(val) => {
            info!("RESPONSE /AUTH/LOGIN: {}", val.user.id);
            HttpResponse::Ok().cookie(auth_flag()).json(val)
        },
        Err(err) => {
            error!("[{:} : {:}] login failed: {}", file!(), line!(), err);
            HttpResponse::from_error(err)
        }
    }
}

#[post("/register")]
pub async fn register(
    dto: web::Json<NewUserDto>,
    store: web::Data<Store>,
    sessions: web::Data<SessionStore>,
    config: web::Data<Config>,
) -> impl Responder {
    let response = service::user::register(dto.into_inner(), &store, &sessions, &config).await;
    match response {
        Ok(val) => {
            info!("RESPONSE /AUTH/REGISTER: {}", val.user.id);
            HttpResponse::Created().cookie(auth_flag()).json(val)
        },
        Err(err) => {
            error!("[{:} : {:}] registration failed: {}", file!(), line!(), err);
            HttpResponse::from_error(err)
        }
    }
}

#[post("/logout")]
pub async fn logout(req: HttpRequest, sessions: web::Data<SessionStore>) -> impl Responder {
    let auth = match service::auth::current(&req) {
        Ok(auth) => auth,
        Err(err) => return HttpResponse::from_error(err),
    };
    match service::user::logout(&auth, &sessions).await {
        Ok(_) => {
            let mut flag = auth_flag();
            flag.make_removal();
            HttpResponse::Ok().cookie(flag).json("signed out")
        },
        Err(err) => HttpResponse::from_error(err),
    }
}

#[get("/me")]
pub async fn me(req: HttpRequest) -> impl Responder {
    let auth = match service::auth::current(&req) {
        Ok(auth) => auth,
        Err(err) => return HttpResponse::from_error(err),
    };
    match auth.user() {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(err) => HttpResponse::from_error(err),
    }
}

#[put("/me")]
pub async fn update_me(
    req: HttpRequest,
    dto: web::Json<UpdateUserDto>,
    store: web::Data<Store>,
    sessions: web::Data<SessionStore>,
) -> impl Responder {
    let auth = match service::auth::current(&req) {
        Ok(auth) => auth,
        Err(err) => return HttpResponse::from_error(err),
    };
    match service::user::update(&auth, dto.into_inner(), &store, &sessions).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(err) => HttpResponse::from_error(err),
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(login)
        .service(register)
        .service(logout)
        .service(me)
        .service(update_me);
}
