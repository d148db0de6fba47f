use crate::models::User;

use super::Store;

pub async fn create(user: User, store: &Store) -> User {
    let mut users = store.users.write().await;
    users.push(user.clone());
    user
}

pub async fn get_all(store: &Store) -> Vec<User> {
    store.users.read().await.clone()
}

pub async fn get_by_email(email: &str, store: &Store) -> Option<User> {
    let users = store.users.read().await;
    users
        .iter()
        .find(|u| u.email.eq_ignore_ascii_case(email))
        .cloned()
}

pub async fn exists(email: &str, store: &Store) -> bool {
    get_by_email(email, store).await.is_some()
}

/// Replaces the directory entry for `user.id`, returning whether one existed.
pub async fn replace(user: User, store: &Store) -> bool {
    let mut users = store.users.write().await;
    match users.iter_mut().find(|u| u.id == user.id) {
        Some(slot) => {
            *slot = user;
            true
        }
        None => false,
    }
}
