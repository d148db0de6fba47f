use std::future::{ready, Ready};
use std::rc::Rc;
use std::sync::Arc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use log::warn;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{errors::AppError, models::User};

use super::session::{Session, SessionStore};

/// Attached to the request by `AuthMiddleware` when a valid bearer token is present.
#[derive(Clone)]
pub struct UserAuthData {
    pub session_id: Uuid,
    pub session: Arc<Session>,
    pub cancel: CancellationToken,
}

impl UserAuthData {
    pub fn user(&self) -> Result<&User, AppError> {
        self.session.user().ok_or(AppError::Unauthorized)
    }
}

pub fn current(req: &HttpRequest) -> Result<UserAuthData, AppError> {
    req.extensions()
        .get::<UserAuthData>()
        .cloned()
        .ok_or(AppError::Unauthorized)
}

/// Resolves `Authorization: Bearer <jwt>` into a live session. Requests without
/// the header pass through anonymous; a bad or stale token is rejected.
#[derive(Clone)]
pub struct AuthMiddleware {
    pub sessions: web::Data<SessionStore>,
    pub secret: String,
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
    where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            sessions: self.sessions.clone(),
            secret: self.secret.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    sessions: web::Data<SessionStore>,
    secret: String,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
    where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let token = match jwt::parse_request(&req, "Bearer") {
            Some(token) => token,
            None => return Box::pin(service.call(req)),
        };
        let claims = match jwt::decode_claims(&self.secret, &token) {
            Ok(data) => data.claims,
            Err(err) => {
                warn!("rejecting bearer token: {}", err);
                return Box::pin(async move { Err(actix_web::Error::from(AppError::DecodeError)) });
            }
        };
        let sessions = self.sessions.clone();
        Box::pin(async move {
            match sessions.get(claims.session_id).await {
                Some((session, cancel)) => {
                    req.extensions_mut().insert(UserAuthData {
                        session_id: claims.session_id,
                        session,
                        cancel,
                    });
                    service.call(req).await
                }
                None => Err(actix_web::Error::from(AppError::Unauthorized)),
            }
        })
    }
}

pub mod jwt {
    use std::time::Duration;

    use actix_web::dev::ServiceRequest;
    use chrono::Utc;
    use jsonwebtoken::{decode, encode, errors::Error, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation};
    use uuid::Uuid;

    use crate::dto::Claims;

    pub fn create(secret: &str, session_id: &Uuid, user_id: &Uuid, ttl: Duration) -> Result<String, Error> {
        let exp = Utc::now().timestamp() as usize + ttl.as_secs() as usize;
        let claims = Claims::new(session_id, user_id, exp);
        let key = EncodingKey::from_secret(secret.as_ref());
        encode(&Header::new(Algorithm::HS256), &claims, &key)
    }

    /// Fails on a bad signature as well as on an expired `exp`.
    pub fn decode_claims(secret: &str, token: &str) -> Result<TokenData<Claims>, Error> {
        let key = DecodingKey::from_secret(secret.as_ref());
        decode::<Claims>(token, &key, &Validation::new(Algorithm::HS256))
    }

    pub fn parse_request(req: &ServiceRequest, prefix: &str) -> Option<String> {
        let auth_value = req.headers().get("Authorization")?.to_str().ok()?;
        let token = auth_value.strip_prefix(prefix)?.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }

}
