use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Donation, DonationStatus, FoodType, PerishableType};

const MS_PER_HOUR: i64 = 60 * 60 * 1000;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Which visibility bucket a donation falls into. Every donation is in exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpiryBucket {
    Available,
    NearExpiry,
    Expired,
}

pub fn expiry_bucket(expiry: DateTime<Utc>, now: DateTime<Utc>) -> ExpiryBucket {
    let delta = (expiry - now).num_milliseconds();
    if delta <= 0 {
        ExpiryBucket::Expired
    } else if delta < MS_PER_DAY {
        ExpiryBucket::NearExpiry
    } else {
        ExpiryBucket::Available
    }
}

/// Whole hours until `expiry`, rounded towards negative infinity.
pub fn hours_until(expiry: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (expiry - now).num_milliseconds().div_euclid(MS_PER_HOUR)
}

pub fn time_remaining(expiry: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = (expiry - now).num_milliseconds();
    if delta <= 0 {
        return "Expired".to_string();
    }
    let days = delta / MS_PER_DAY;
    if days > 0 {
        return format!("{} {} left", days, plural(days, "day"));
    }
    let hours = delta / MS_PER_HOUR;
    format!("{} {} left", hours, plural(hours, "hour"))
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        unit.to_string()
    } else {
        format!("{}s", unit)
    }
}

pub fn is_expiring_soon(expiry: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let hours = hours_until(expiry, now);
    hours > 0 && hours <= 24
}

pub fn status_color(status: DonationStatus) -> &'static str {
    match status {
        DonationStatus::Pending => "bg-blue-100 text-blue-800",
        DonationStatus::Accepted => "bg-yellow-100 text-yellow-800",
        DonationStatus::Picked => "bg-orange-100 text-orange-800",
        DonationStatus::Delivered => "bg-green-100 text-green-800",
        DonationStatus::Expired => "bg-red-100 text-red-800",
        DonationStatus::Cancelled => "bg-gray-100 text-gray-800",
    }
}

pub fn food_type_label(food_type: FoodType) -> &'static str {
    match food_type {
        FoodType::Veg => "Vegetarian",
        FoodType::NonVeg => "Non-Vegetarian",
        FoodType::Mixed => "Mixed",
    }
}

pub fn perishable_type_label(perishable_type: PerishableType) -> &'static str {
    match perishable_type {
        PerishableType::Perishable => "Perishable",
        PerishableType::NonPerishable => "Non-Perishable",
    }
}

pub fn marker_color(donation: &Donation, now: DateTime<Utc>) -> &'static str {
    if donation.is_expired(now) {
        return "#d32f2f";
    }
    if is_expiring_soon(donation.expiry, now) {
        return "#ff9800";
    }
    match donation.status {
        DonationStatus::Pending => "#4caf50",
        DonationStatus::Accepted => "#2196f3",
        DonationStatus::Picked => "#9c27b0",
        DonationStatus::Delivered | DonationStatus::Expired | DonationStatus::Cancelled => {
            "#757575"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn expiring_soon_window_is_exclusive_of_zero_and_25_hours() {
        let now = now();
        assert!(!is_expiring_soon(now, now));
        assert!(!is_expiring_soon(now + Duration::minutes(30), now));
        assert!(is_expiring_soon(now + Duration::hours(1), now));
        assert!(is_expiring_soon(now + Duration::hours(24), now));
        assert!(!is_expiring_soon(now + Duration::hours(25), now));
        assert!(!is_expiring_soon(now - Duration::hours(3), now));
    }

    #[test]
    fn past_expiry_reads_expired() {
        let now = now();
        assert_eq!(time_remaining(now - Duration::seconds(1), now), "Expired");
        assert_eq!(time_remaining(now - Duration::days(40), now), "Expired");
        assert_eq!(time_remaining(now, now), "Expired");
    }

    #[test]
    fn time_remaining_floors_days_then_hours() {
        let now = now();
        assert_eq!(time_remaining(now + Duration::hours(49), now), "2 days left");
        assert_eq!(time_remaining(now + Duration::hours(24), now), "1 day left");
        assert_eq!(time_remaining(now + Duration::minutes(150), now), "2 hours left");
        assert_eq!(time_remaining(now + Duration::minutes(61), now), "1 hour left");
        assert_eq!(time_remaining(now + Duration::minutes(10), now), "0 hours left");
    }

    #[test]
    fn bucket_boundary_belongs_to_expired() {
        let now = now();
        assert_eq!(expiry_bucket(now, now), ExpiryBucket::Expired);
        assert_eq!(
            expiry_bucket(now + Duration::milliseconds(1), now),
            ExpiryBucket::NearExpiry
        );
        assert_eq!(
            expiry_bucket(now + Duration::hours(24), now),
            ExpiryBucket::Available
        );
    }

    #[test]
    fn labels_cover_every_variant() {
        assert_eq!(food_type_label(FoodType::NonVeg), "Non-Vegetarian");
        assert_eq!(perishable_type_label(PerishableType::NonPerishable), "Non-Perishable");
        for status in DonationStatus::ALL {
            assert!(status_color(status).starts_with("bg-"));
        }
    }
}
