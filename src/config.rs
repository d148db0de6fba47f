use std::env;
use std::time::Duration;

use dotenv::dotenv;
use log::warn;

use crate::models::Location;

const DEFAULT_JWT_SECRET: &str = "zerowaste-dev-secret";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret: String,
    pub session_ttl: Duration,
    /// Artificial delay standing in for a network round trip.
    pub simulated_latency: Duration,
    pub map_center: Location,
    pub map_access_token: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 8080,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            session_ttl: Duration::from_secs(24 * 60 * 60),
            simulated_latency: Duration::from_millis(1000),
            map_center: Location {
                lat: 51.515,
                lng: -0.09,
                address: "London".to_string(),
            },
            map_access_token: "placeholder".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        let defaults = Config::default();
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET is not set, falling back to the development secret");
            defaults.jwt_secret.clone()
        });
        Config {
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            jwt_secret,
            session_ttl: parse_var("SESSION_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.session_ttl),
            simulated_latency: parse_var("SIMULATED_LATENCY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.simulated_latency),
            map_center: Location {
                lat: parse_var("MAP_CENTER_LAT").unwrap_or(defaults.map_center.lat),
                lng: parse_var("MAP_CENTER_LNG").unwrap_or(defaults.map_center.lng),
                address: defaults.map_center.address,
            },
            map_access_token: env::var("MAP_ACCESS_TOKEN").unwrap_or(defaults.map_access_token),
        }
    }

    pub fn server_addr(&self) -> (String, u16) {
        (self.server_host.clone(), self.server_port)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring malformed value for {}: {:?}", key, raw);
            None
        }
    }
}
