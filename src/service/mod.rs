pub mod auth;
pub mod dashboard;
pub mod derive;
pub mod donation;
pub mod filter;
pub mod latency;
pub mod log;
pub mod map;
pub mod session;
pub mod user;
pub mod workflow;
