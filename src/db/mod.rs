pub mod user;
pub mod donation;
pub mod seed;

use chrono::{DateTime, Utc};
use log::info;
use tokio::sync::RwLock;

use crate::models::{Donation, User};

/// In-memory stand-in for a database. Shared between workers through `web::Data`.
pub struct Store {
    donations: RwLock<Vec<Donation>>,
    users: RwLock<Vec<User>>,
}

impl Store {
    pub fn new(donations: Vec<Donation>, users: Vec<User>) -> Self {
        Store {
            donations: RwLock::new(donations),
            users: RwLock::new(users),
        }
    }
}

pub fn init_store(now: DateTime<Utc>) -> Store {
    let donations = seed::sample_donations(now);
    let users = seed::sample_users();
    info!(
        "seeded in-memory store with {} donations and {} users",
        donations.len(),
        users.len()
    );
    Store::new(donations, users)
}
