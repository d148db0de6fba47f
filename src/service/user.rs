use log::info;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    config::Config,
    db::{self, Store},
    dto::{AuthUserResponse, LoginUserRequest, NewUserDto, UpdateUserDto},
    errors::AppError,
    models::{Location, User, UserRole},
};

use super::{auth::{jwt, UserAuthData}, latency, session::SessionStore};

/// Identity handed out when someone signs in with an unknown email.
fn mock_identity(email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        name: "John Doe".to_string(),
        email: email.to_string(),
        role: Some(UserRole::Donor),
        verified: true,
        avatar: None,
        organization: None,
        location: None,
    }
}

async fn open_session(user: User, sessions: &SessionStore, config: &Config) -> Result<AuthUserResponse, AppError> {
    let (session_id, _) = sessions.open(user.clone(), config.session_ttl).await;
    let token = jwt::create(&config.jwt_secret, &session_id, &user.id, config.session_ttl)
        .map_err(|_| AppError::InternalError)?;
    Ok(AuthUserResponse { token, user })
}

pub async fn login(
    dto: LoginUserRequest,
    store: &Store,
    sessions: &SessionStore,
    config: &Config,
) -> Result<AuthUserResponse, AppError> {
    latency::round_trip(config.simulated_latency, &CancellationToken::new()).await?;
    let mut missing = Vec::new();
    if dto.email.trim().is_empty() {
        missing.push("email");
    }
    if dto.password.is_empty() {
        missing.push("password");
    }
    if !missing.is_empty() {
        return Err(AppError::missing_fields(&missing));
    }
    let email = dto.email.trim();
    let user = match db::user::get_by_email(email, store).await {
        Some(user) => user,
        None => db::user::create(mock_identity(email), store).await,
    };
    info!("user {} signed in", user.id);
    open_session(user, sessions, config).await
}

pub async fn register(
    dto: NewUserDto,
    store: &Store,
    sessions: &SessionStore,
    config: &Config,
) -> Result<AuthUserResponse, AppError> {
    latency::round_trip(config.simulated_latency, &CancellationToken::new()).await?;
    let NewUserDto { name, email, password, confirm_password, role, organization, address } = dto;
    let mut missing = Vec::new();
    for (field, value) in [
        ("name", &name),
        ("email", &email),
        ("password", &password),
        ("confirmPassword", &confirm_password),
    ] {
        if value.trim().is_empty() {
            missing.push(field);
        }
    }
    if role.is_none() {
        missing.push("role");
    }
    if !missing.is_empty() {
        return Err(AppError::missing_fields(&missing));
    }
    if password != confirm_password {
        return Err(AppError::bad_request("passwords do not match"));
    }
    let email = email.trim().to_string();
    if db::user::exists(&email, store).await {
        return Err(AppError::bad_request("email is already registered"));
    }
    let user = User {
        id: Uuid::new_v4(),
        name: name.trim().to_string(),
        email,
        role,
        verified: false,
        avatar: None,
        organization: organization.filter(|o| !o.trim().is_empty()),
        location: address.filter(|a| !a.trim().is_empty()).map(|address| Location {
            lat: config.map_center.lat,
            lng: config.map_center.lng,
            address,
        }),
    };
    let user = db::user::create(user, store).await;
    info!("user {} registered as {:?}", user.id, user.role);
    open_session(user, sessions, config).await
}

pub async fn logout(auth: &UserAuthData, sessions: &SessionStore) -> Result<(), AppError> {
    if sessions.close(auth.session_id).await {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

pub async fn update(
    auth: &UserAuthData,
    changes: UpdateUserDto,
    store: &Store,
    sessions: &SessionStore,
) -> Result<User, AppError> {
    let current = auth.user()?;
    let blank: Vec<&str> = [("name", &changes.name), ("email", &changes.email)]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(false, |v| v.trim().is_empty()))
        .map(|(field, _)| field)
        .collect();
    if !blank.is_empty() {
        return Err(AppError::missing_fields(&blank));
    }
    if let Some(email) = &changes.email {
        if let Some(other) = db::user::get_by_email(email, store).await {
            if other.id != current.id {
                return Err(AppError::bad_request("email is already registered"));
            }
        }
    }
    let session = sessions
        .update(auth.session_id, &changes)
        .await
        .ok_or(AppError::Unauthorized)?;
    let user = session.user().cloned().ok_or(AppError::Unauthorized)?;
    db::user::replace(user.clone(), store).await;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config() -> Config {
        Config {
            simulated_latency: Duration::ZERO,
            ..Config::default()
        }
    }

    #[actix_rt::test]
    async fn login_with_known_email_reuses_directory_entry() {
        let store = db::init_store(chrono::Utc::now());
        let sessions = SessionStore::new();
        let res = login(
            LoginUserRequest {
                email: "recipient1@zerowaste.example".to_string(),
                password: "x".to_string(),
            },
            &store,
            &sessions,
            &config(),
        )
        .await
        .unwrap();
        assert_eq!(res.user.name, "Community Shelter");
        assert_eq!(res.user.role, Some(UserRole::Recipient));
    }

    #[actix_rt::test]
    async fn login_with_unknown_email_gets_mock_donor() {
        let store = db::init_store(chrono::Utc::now());
        let sessions = SessionStore::new();
        let res = login(
            LoginUserRequest {
                email: "new@example.com".to_string(),
                password: "x".to_string(),
            },
            &store,
            &sessions,
            &config(),
        )
        .await
        .unwrap();
        assert_eq!(res.user.role, Some(UserRole::Donor));
        assert!(res.user.verified);
        assert!(db::user::exists("new@example.com", &store).await);
    }

    #[actix_rt::test]
    async fn login_requires_both_fields() {
        let store = db::init_store(chrono::Utc::now());
        let sessions = SessionStore::new();
        let err = login(LoginUserRequest::default(), &store, &sessions, &config())
            .await
            .unwrap_err();
        assert_eq!(err, AppError::missing_fields(&["email", "password"]));
    }

    #[actix_rt::test]
    async fn register_checks_password_confirmation() {
        let store = db::init_store(chrono::Utc::now());
        let sessions = SessionStore::new();
        let dto = NewUserDto {
            name: "Harbour Kitchen".to_string(),
            email: "kitchen@example.com".to_string(),
            password: "one".to_string(),
            confirm_password: "two".to_string(),
            role: Some(UserRole::Volunteer),
            ..Default::default()
        };
        let err = register(dto.clone(), &store, &sessions, &config()).await.unwrap_err();
        assert!(matches!(err, AppError::BadClientData { .. }));

        let ok = NewUserDto {
            confirm_password: "one".to_string(),
            ..dto
        };
        let res = register(ok.clone(), &store, &sessions, &config()).await.unwrap();
        assert!(!res.user.verified);
        assert_eq!(res.user.role, Some(UserRole::Volunteer));

        let dup = register(ok, &store, &sessions, &config()).await.unwrap_err();
        assert!(matches!(dup, AppError::BadClientData { .. }));
    }

    #[actix_rt::test]
    async fn update_rejects_blank_name_and_email() {
        let store = db::init_store(chrono::Utc::now());
        let sessions = SessionStore::new();
        let res = login(
            LoginUserRequest {
                email: "donor2@zerowaste.example".to_string(),
                password: "x".to_string(),
            },
            &store,
            &sessions,
            &config(),
        )
        .await
        .unwrap();
        let claims = jwt::decode_claims(&config().jwt_secret, &res.token).unwrap().claims;
        let (session, cancel) = sessions.get(claims.session_id).await.unwrap();
        let auth = UserAuthData {
            session_id: claims.session_id,
            session,
            cancel,
        };
        let changes = UpdateUserDto {
            name: Some(String::new()),
            email: Some(" ".to_string()),
            ..Default::default()
        };
        let err = update(&auth, changes, &store, &sessions).await.unwrap_err();
        assert_eq!(err, AppError::missing_fields(&["name", "email"]));
        let (current, _) = sessions.get(claims.session_id).await.unwrap();
        assert_eq!(current.user().unwrap().name, res.user.name);
    }

    #[actix_rt::test]
    async fn register_lists_missing_role() {
        let store = db::init_store(chrono::Utc::now());
        let sessions = SessionStore::new();
        let dto = NewUserDto {
            name: "A".to_string(),
            email: "a@example.com".to_string(),
            password: "p".to_string(),
            confirm_password: "p".to_string(),
            ..Default::default()
        };
        let err = register(dto, &store, &sessions, &config()).await.unwrap_err();
        assert_eq!(err, AppError::missing_fields(&["role"]));
    }
}
