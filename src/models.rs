use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    #[display(fmt = "donor")]
    Donor,
    #[display(fmt = "recipient")]
    Recipient,
    #[display(fmt = "admin")]
    Admin,
    #[display(fmt = "volunteer")]
    Volunteer,
}

impl UserRole {
    /// Roles allowed to accept and collect donations.
    pub fn can_receive(&self) -> bool {
        matches!(self, UserRole::Recipient | UserRole::Volunteer)
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoodType {
    #[display(fmt = "veg")]
    Veg,
    #[display(fmt = "non-veg")]
    NonVeg,
    #[display(fmt = "mixed")]
    Mixed,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PerishableType {
    #[display(fmt = "perishable")]
    Perishable,
    #[display(fmt = "non-perishable")]
    NonPerishable,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DonationStatus {
    #[display(fmt = "pending")]
    Pending,
    #[display(fmt = "accepted")]
    Accepted,
    #[display(fmt = "picked")]
    Picked,
    #[display(fmt = "delivered")]
    Delivered,
    #[display(fmt = "expired")]
    Expired,
    #[display(fmt = "cancelled")]
    Cancelled,
}

impl DonationStatus {
    pub const ALL: [DonationStatus; 6] = [
        DonationStatus::Pending,
        DonationStatus::Accepted,
        DonationStatus::Picked,
        DonationStatus::Delivered,
        DonationStatus::Expired,
        DonationStatus::Cancelled,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

/// Id plus display name of a user referenced from a donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyRef {
    pub id: Uuid,
    pub name: String,
}

impl From<&User> for PartyRef {
    fn from(user: &User) -> Self {
        PartyRef {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub quantity: String,
    pub food_type: FoodType,
    pub perishable_type: PerishableType,
    pub expiry: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub status: DonationStatus,
    pub donor: PartyRef,
    /// Only set once the donation has left `pending`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient: Option<PartyRef>,
    pub location: Location,
    pub created_at: DateTime<Utc>,
    pub pickup_deadline: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl Donation {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry <= now
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.donor.id == user_id
    }

    pub fn is_received_by(&self, user_id: Uuid) -> bool {
        self.recipient.as_ref().map(|r| r.id == user_id).unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Option<UserRole>,
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl User {
    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == Some(role)
    }
}
