use bitflags::bitflags;
use chrono::{DateTime, Utc};

use crate::models::{Donation, FoodType, PerishableType};

use super::derive::{expiry_bucket, ExpiryBucket};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct StatusVisibility: u8 {
        const AVAILABLE = 0b001;
        const NEAR_EXPIRY = 0b010;
        const EXPIRED = 0b100;
    }
}

impl StatusVisibility {
    /// What the map shows before the user touches the toggles.
    pub const MAP_DEFAULT: StatusVisibility =
        StatusVisibility::AVAILABLE.union(StatusVisibility::NEAR_EXPIRY);

    pub fn from_toggles(available: bool, near_expiry: bool, expired: bool) -> Self {
        let mut flags = StatusVisibility::empty();
        flags.set(StatusVisibility::AVAILABLE, available);
        flags.set(StatusVisibility::NEAR_EXPIRY, near_expiry);
        flags.set(StatusVisibility::EXPIRED, expired);
        flags
    }

    pub fn shows(&self, bucket: ExpiryBucket) -> bool {
        let flag = match bucket {
            ExpiryBucket::Available => StatusVisibility::AVAILABLE,
            ExpiryBucket::NearExpiry => StatusVisibility::NEAR_EXPIRY,
            ExpiryBucket::Expired => StatusVisibility::EXPIRED,
        };
        self.contains(flag)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonationFilter {
    pub search: String,
    pub address: String,
    pub food_type: Option<FoodType>,
    pub perishable_type: Option<PerishableType>,
    pub visibility: StatusVisibility,
}

impl Default for DonationFilter {
    fn default() -> Self {
        DonationFilter {
            search: String::new(),
            address: String::new(),
            food_type: None,
            perishable_type: None,
            visibility: StatusVisibility::all(),
        }
    }
}

impl DonationFilter {
    pub fn matches(&self, donation: &Donation, now: DateTime<Utc>) -> bool {
        self.matches_search(donation)
            && self.matches_address(donation)
            && self.food_type.map_or(true, |t| donation.food_type == t)
            && self.perishable_type.map_or(true, |t| donation.perishable_type == t)
            && self.visibility.shows(expiry_bucket(donation.expiry, now))
    }

    fn matches_search(&self, donation: &Donation) -> bool {
        let needle = self.search.to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&donation.title, &donation.description, &donation.donor.name]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_address(&self, donation: &Donation) -> bool {
        if self.address.trim().is_empty() {
            return true;
        }
        let needle = self.address.to_lowercase();
        donation.location.address.to_lowercase().contains(&needle)
    }

    /// Keeps the relative order of `donations`.
    pub fn apply<'a, I>(&self, donations: I, now: DateTime<Utc>) -> Vec<Donation>
    where
        I: IntoIterator<Item = &'a Donation>,
    {
        donations
            .into_iter()
            .filter(|d| self.matches(d, now))
            .cloned()
            .collect()
    }
}
