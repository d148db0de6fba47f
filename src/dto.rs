use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::{Donation, DonationStatus, FoodType, Location, PerishableType, User, UserRole},
    service::{
        derive::{self, ExpiryBucket},
        filter::{DonationFilter, StatusVisibility},
    },
};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginUserRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NewUserDto {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Option<UserRole>,
    pub organization: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUserResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub exp: usize,
}

impl Claims {
    pub fn new(session_id: &Uuid, user_id: &Uuid, exp: usize) -> Self {
        Self {
            session_id: *session_id,
            user_id: *user_id,
            exp,
        }
    }
}

/// Partial profile update. Absent fields keep their current value; the role is
/// fixed at registration and unknown keys such as `role` are ignored.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub organization: Option<String>,
    pub location: Option<Location>,
}

impl UpdateUserDto {
    pub fn apply(&self, user: &User) -> User {
        let mut updated = user.clone();
        if let Some(v) = &self.name {
            updated.name = v.clone();
        }
        if let Some(v) = &self.email {
            updated.email = v.clone();
        }
        if let Some(v) = &self.avatar {
            updated.avatar = Some(v.clone());
        }
        if let Some(v) = &self.organization {
            updated.organization = Some(v.clone());
        }
        if let Some(v) = &self.location {
            updated.location = Some(v.clone());
        }
        updated
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NewDonationDto {
    pub title: String,
    pub description: String,
    pub quantity: String,
    pub food_type: Option<FoodType>,
    pub perishable_type: Option<PerishableType>,
    pub expiry: Option<DateTime<Utc>>,
    pub pickup_deadline: Option<DateTime<Utc>>,
    pub image: Option<String>,
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Query string shared by the listing and the map.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DonationQuery {
    pub search: String,
    pub address: String,
    pub food_type: Option<String>,
    pub perishable_type: Option<String>,
    pub show_available: Option<bool>,
    pub show_near_expiry: Option<bool>,
    pub show_expired: Option<bool>,
}

impl DonationQuery {
    pub fn to_filter(&self, defaults: StatusVisibility) -> Result<DonationFilter, AppError> {
        Ok(DonationFilter {
            search: self.search.clone(),
            address: self.address.clone(),
            food_type: parse_selector("foodType", &self.food_type)?,
            perishable_type: parse_selector("perishableType", &self.perishable_type)?,
            visibility: StatusVisibility::from_toggles(
                self.show_available
                    .unwrap_or(defaults.contains(StatusVisibility::AVAILABLE)),
                self.show_near_expiry
                    .unwrap_or(defaults.contains(StatusVisibility::NEAR_EXPIRY)),
                self.show_expired
                    .unwrap_or(defaults.contains(StatusVisibility::EXPIRED)),
            ),
        })
    }
}

/// `all` or nothing means no constraint; anything else must name a variant.
fn parse_selector<T: DeserializeOwned>(name: &str, raw: &Option<String>) -> Result<Option<T>, AppError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => serde_json::from_value(serde_json::Value::String(value.to_string()))
            .map(Some)
            .map_err(|_| AppError::bad_request(format!("unknown {} {:?}", name, value))),
    }
}

/// A donation plus everything the views derive from it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationView {
    #[serde(flatten)]
    pub donation: Donation,
    pub time_remaining: String,
    pub expiring_soon: bool,
    pub expired: bool,
    pub bucket: ExpiryBucket,
    pub status_color: &'static str,
    pub food_type_label: &'static str,
    pub perishable_type_label: &'static str,
}

impl DonationView {
    pub fn new(donation: Donation, now: DateTime<Utc>) -> Self {
        DonationView {
            time_remaining: derive::time_remaining(donation.expiry, now),
            expiring_soon: derive::is_expiring_soon(donation.expiry, now),
            expired: donation.is_expired(now),
            bucket: derive::expiry_bucket(donation.expiry, now),
            status_color: derive::status_color(donation.status),
            food_type_label: derive::food_type_label(donation.food_type),
            perishable_type_label: derive::perishable_type_label(donation.perishable_type),
            donation,
        }
    }

    pub fn many(donations: Vec<Donation>, now: DateTime<Utc>) -> Vec<Self> {
        donations.into_iter().map(|d| DonationView::new(d, now)).collect()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationDetail {
    #[serde(flatten)]
    pub view: DonationView,
    pub map_image_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapMarker {
    pub id: Uuid,
    pub title: String,
    pub lat: f64,
    pub lng: f64,
    pub color: &'static str,
    pub bucket: ExpiryBucket,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapResponse {
    pub count: usize,
    pub center: Location,
    pub image_url: String,
    pub markers: Vec<MapMarker>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorDashboard {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub donations: Vec<DonationView>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipientDashboard {
    pub available_count: usize,
    pub accepted_count: usize,
    pub available: Vec<DonationView>,
    pub my_pickups: Vec<DonationView>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactStats {
    pub food_saved_kg: u32,
    pub people_served: u32,
    pub emission_prevented_kg: u32,
    pub donations_completed: u32,
    pub active_ngos: u32,
    pub active_volunteers: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: DonationStatus,
    pub count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOverview {
    pub impact: ImpactStats,
    pub status_counts: Vec<StatusCount>,
    pub total_donations: usize,
    pub users: Vec<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_update_cannot_change_role() {
        let changes: UpdateUserDto =
            serde_json::from_value(serde_json::json!({ "role": "admin", "organization": "Pantry" })).unwrap();
        let user = User {
            id: Uuid::new_v4(),
            name: "Corner Cafe".to_string(),
            email: "cafe@example.com".to_string(),
            role: Some(UserRole::Donor),
            verified: true,
            avatar: None,
            organization: None,
            location: None,
        };
        let updated = changes.apply(&user);
        assert_eq!(updated.role, Some(UserRole::Donor));
        assert_eq!(updated.organization.as_deref(), Some("Pantry"));
    }

    #[test]
    fn all_selector_means_unconstrained() {
        let query = DonationQuery {
            food_type: Some("all".to_string()),
            perishable_type: Some("non-perishable".to_string()),
            ..Default::default()
        };
        let filter = query.to_filter(StatusVisibility::all()).unwrap();
        assert_eq!(filter.food_type, None);
        assert_eq!(filter.perishable_type, Some(PerishableType::NonPerishable));
    }

    #[test]
    fn unknown_selector_is_rejected() {
        let query = DonationQuery {
            food_type: Some("vegan".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            query.to_filter(StatusVisibility::all()),
            Err(AppError::BadClientData { .. })
        ));
    }

    #[test]
    fn toggles_fall_back_to_defaults() {
        let query = DonationQuery {
            show_expired: Some(true),
            show_available: Some(false),
            ..Default::default()
        };
        let filter = query.to_filter(StatusVisibility::MAP_DEFAULT).unwrap();
        assert_eq!(
            filter.visibility,
            StatusVisibility::NEAR_EXPIRY | StatusVisibility::EXPIRED
        );
    }
}
