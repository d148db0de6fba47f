use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::models::{
    Donation, DonationStatus, FoodType, Location, PartyRef, PerishableType, User, UserRole,
};

/// Stable id for a seeded record, so restarts keep the same urls.
pub fn seed_id(key: &str) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, format!("zerowaste:{}", key).as_bytes())
}

fn party(key: &str, name: &str) -> PartyRef {
    PartyRef {
        id: seed_id(key),
        name: name.to_string(),
    }
}

fn london(lat: f64, lng: f64, address: &str) -> Location {
    Location {
        lat,
        lng,
        address: address.to_string(),
    }
}

fn user(key: &str, name: &str, role: UserRole, organization: Option<&str>) -> User {
    User {
        id: seed_id(key),
        name: name.to_string(),
        email: format!("{}@zerowaste.example", key),
        role: Some(role),
        verified: true,
        avatar: None,
        organization: organization.map(str::to_string),
        location: None,
    }
}

pub fn sample_users() -> Vec<User> {
    vec![
        user("donor1", "Local Farm Co-op", UserRole::Donor, Some("Local Farm Co-op")),
        user("donor2", "Elite Catering", UserRole::Donor, Some("Elite Catering")),
        user("donor3", "Neighborhood Food Drive", UserRole::Donor, None),
        user("donor4", "Bistro Deluxe", UserRole::Donor, Some("Bistro Deluxe")),
        user("donor5", "FreshMart Grocery", UserRole::Donor, Some("FreshMart")),
        user("recipient1", "Community Shelter", UserRole::Recipient, Some("Community Shelter")),
        user("recipient2", "Food Bank Network", UserRole::Recipient, Some("Food Bank Network")),
        user("admin", "ZeroWaste Admin", UserRole::Admin, None),
    ]
}

/// The five listings every fresh process starts with, timed relative to `now`.
pub fn sample_donations(now: DateTime<Utc>) -> Vec<Donation> {
    vec![
        Donation {
            id: seed_id("donation:1"),
            title: "Fresh Vegetables from Weekend Market".to_string(),
            description: "Various vegetables including carrots, tomatoes, and lettuce that we couldn't sell at our weekend market stall.".to_string(),
            quantity: "5 kg".to_string(),
            food_type: FoodType::Veg,
            perishable_type: PerishableType::Perishable,
            expiry: now + Duration::days(2),
            image: Some("https://images.unsplash.com/photo-1518843875459-f738682238a6?q=80&w=3842&auto=format&fit=crop".to_string()),
            status: DonationStatus::Pending,
            donor: party("donor1", "Local Farm Co-op"),
            recipient: None,
            location: london(51.505, -0.09, "123 Market Street, London"),
            created_at: now - Duration::hours(2),
            pickup_deadline: now + Duration::hours(8),
            feedback: None,
            rating: None,
        },
        Donation {
            id: seed_id("donation:2"),
            title: "Catered Event Leftovers".to_string(),
            description: "High-quality leftovers from a corporate event. Various dishes including sandwiches, wraps, and fruit platters.".to_string(),
            quantity: "10 servings".to_string(),
            food_type: FoodType::NonVeg,
            perishable_type: PerishableType::Perishable,
            expiry: now + Duration::days(1),
            image: Some("https://images.unsplash.com/photo-1621996346565-e3dbc646d9a9?q=80&w=3880&auto=format&fit=crop".to_string()),
            status: DonationStatus::Pending,
            donor: party("donor2", "Elite Catering"),
            recipient: None,
            location: london(51.515, -0.1, "45 Convention Ave, London"),
            created_at: now - Duration::hours(5),
            pickup_deadline: now + Duration::hours(4),
            feedback: None,
            rating: None,
        },
        Donation {
            id: seed_id("donation:3"),
            title: "Canned Goods Collection".to_string(),
            description: "Assorted canned foods including beans, corn, soup, and tuna. All unexpired.".to_string(),
            quantity: "20 cans".to_string(),
            food_type: FoodType::Mixed,
            perishable_type: PerishableType::NonPerishable,
            expiry: now + Duration::days(365),
            image: Some("https://images.unsplash.com/photo-1584473457406-6240486418e9?q=80&w=3687&auto=format&fit=crop".to_string()),
            status: DonationStatus::Pending,
            donor: party("donor3", "Neighborhood Food Drive"),
            recipient: None,
            location: london(51.525, -0.08, "78 Community Lane, London"),
            created_at: now - Duration::days(3),
            pickup_deadline: now + Duration::days(7),
            feedback: None,
            rating: None,
        },
        Donation {
            id: seed_id("donation:4"),
            title: "Restaurant End-of-Day Items".to_string(),
            description: "Fresh bread, pastries, and prepared meals from our restaurant that would otherwise be thrown away.".to_string(),
            quantity: "15 servings".to_string(),
            food_type: FoodType::Mixed,
            perishable_type: PerishableType::Perishable,
            expiry: now + Duration::days(1),
            image: Some("https://images.unsplash.com/photo-1509722747041-616f39b57569?q=80&w=3870&auto=format&fit=crop".to_string()),
            status: DonationStatus::Accepted,
            donor: party("donor4", "Bistro Deluxe"),
            recipient: Some(party("recipient1", "Community Shelter")),
            location: london(51.495, -0.11, "210 Cuisine Street, London"),
            created_at: now - Duration::hours(12),
            pickup_deadline: now + Duration::hours(2),
            feedback: None,
            rating: None,
        },
        Donation {
            id: seed_id("donation:5"),
            title: "Grocery Store Produce".to_string(),
            description: "Fresh fruits and vegetables that are still good but can't be sold due to slight blemishes or excess inventory.".to_string(),
            quantity: "8 kg".to_string(),
            food_type: FoodType::Veg,
            perishable_type: PerishableType::Perishable,
            expiry: now + Duration::days(3),
            image: Some("https://images.unsplash.com/photo-1610348725531-843dff563e2c?q=80&w=3870&auto=format&fit=crop".to_string()),
            status: DonationStatus::Picked,
            donor: party("donor5", "FreshMart Grocery"),
            recipient: Some(party("recipient2", "Food Bank Network")),
            location: london(51.535, -0.095, "567 Market Road, London"),
            created_at: now - Duration::days(1),
            pickup_deadline: now - Duration::hours(2),
            feedback: None,
            rating: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_present_only_off_pending() {
        for donation in sample_donations(Utc::now()) {
            assert_eq!(
                donation.recipient.is_some(),
                donation.status != DonationStatus::Pending,
                "{}",
                donation.title
            );
        }
    }

    #[test]
    fn seeded_donors_exist_in_directory() {
        let users = sample_users();
        for donation in sample_donations(Utc::now()) {
            assert!(users.iter().any(|u| u.id == donation.donor.id));
        }
        assert_eq!(seed_id("donor1"), seed_id("donor1"));
    }
}
