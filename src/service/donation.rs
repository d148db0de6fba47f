use chrono::{DateTime, Utc};
use log::{info, warn};
use uuid::Uuid;

use crate::{
    config::Config,
    db::{self, Store},
    dto::{DonationDetail, DonationQuery, DonationView, NewDonationDto},
    errors::AppError,
    models::{Donation, DonationStatus, FoodType, Location, PartyRef, PerishableType, UserRole},
};

use super::{auth::UserAuthData, derive, filter::StatusVisibility, latency, map, workflow};

pub async fn list(query: &DonationQuery, store: &Store, now: DateTime<Utc>) -> Result<Vec<DonationView>, AppError> {
    let filter = query.to_filter(StatusVisibility::all())?;
    let donations = db::donation::get_all(store).await;
    Ok(DonationView::many(filter.apply(&donations, now), now))
}

pub async fn get_by_id(id: Uuid, store: &Store, config: &Config, now: DateTime<Utc>) -> Result<DonationDetail, AppError> {
    match db::donation::get_by_id(id, store).await {
        Some(donation) => {
            let color = derive::marker_color(&donation, now);
            let map_image_url = map::pin_url(&donation.location, color, &config.map_access_token);
            Ok(DonationDetail {
                view: DonationView::new(donation, now),
                map_image_url,
            })
        }
        None => {
            warn!("donation {} not found", id);
            Err(AppError::NotFound)
        }
    }
}

fn validate(
    dto: &NewDonationDto,
    now: DateTime<Utc>,
) -> Result<(FoodType, PerishableType, DateTime<Utc>), AppError> {
    let mut missing = Vec::new();
    if dto.title.trim().is_empty() {
        missing.push("title");
    }
    if dto.food_type.is_none() {
        missing.push("foodType");
    }
    if dto.perishable_type.is_none() {
        missing.push("perishableType");
    }
    if dto.address.trim().is_empty() {
        missing.push("address");
    }
    if dto.expiry.is_none() {
        missing.push("expiry");
    }
    match (dto.food_type, dto.perishable_type, dto.expiry) {
        (Some(food_type), Some(perishable_type), Some(expiry)) if missing.is_empty() => {
            if expiry <= now {
                return Err(AppError::bad_request("expiry must be in the future"));
            }
            Ok((food_type, perishable_type, expiry))
        }
        _ => Err(AppError::missing_fields(&missing)),
    }
}

pub async fn create(
    auth: &UserAuthData,
    dto: NewDonationDto,
    store: &Store,
    config: &Config,
) -> Result<Donation, AppError> {
    let donor = auth.user()?;
    if !donor.has_role(UserRole::Donor) {
        return Err(AppError::Forbidden);
    }
    let (food_type, perishable_type, expiry) = validate(&dto, Utc::now())?;
    latency::round_trip(config.simulated_latency, &auth.cancel).await?;

    let now = Utc::now();
    let fallback = donor.location.as_ref().unwrap_or(&config.map_center);
    let donation = Donation {
        id: Uuid::new_v4(),
        title: dto.title.trim().to_string(),
        description: dto.description,
        quantity: dto.quantity,
        food_type,
        perishable_type,
        expiry,
        image: dto.image,
        status: DonationStatus::Pending,
        donor: PartyRef::from(donor),
        recipient: None,
        location: Location {
            lat: dto.lat.unwrap_or(fallback.lat),
            lng: dto.lng.unwrap_or(fallback.lng),
            address: dto.address.trim().to_string(),
        },
        created_at: now,
        pickup_deadline: dto.pickup_deadline.unwrap_or(expiry),
        feedback: None,
        rating: None,
    };
    let donation = db::donation::create(donation, store).await;
    info!("donation {} posted by {}", donation.id, donation.donor.id);
    Ok(donation)
}

/// Checks the move up front, waits the simulated round trip, then commits
/// against whatever is stored at that point.
pub async fn accept(auth: &UserAuthData, id: Uuid, store: &Store, config: &Config) -> Result<Donation, AppError> {
    let actor = auth.user()?;
    let donation = db::donation::get_by_id(id, store).await.ok_or(AppError::NotFound)?;
    workflow::accept(&donation, actor, Utc::now())?;
    latency::round_trip(config.simulated_latency, &auth.cancel).await?;
    let accepted = db::donation::update_with(id, store, |current| {
        workflow::accept(current, actor, Utc::now())
    })
    .await?;
    info!("donation {} accepted by {}", id, actor.id);
    Ok(accepted)
}

pub async fn complete_pickup(auth: &UserAuthData, id: Uuid, store: &Store, config: &Config) -> Result<Donation, AppError> {
    let actor = auth.user()?;
    let donation = db::donation::get_by_id(id, store).await.ok_or(AppError::NotFound)?;
    let allowed = donation.is_owned_by(actor.id)
        || donation.is_received_by(actor.id)
        || actor.has_role(UserRole::Admin);
    if !allowed {
        return Err(AppError::Forbidden);
    }
    workflow::complete_pickup(&donation)?;
    latency::round_trip(config.simulated_latency, &auth.cancel).await?;
    let picked = db::donation::update_with(id, store, workflow::complete_pickup).await?;
    info!("donation {} picked up", id);
    Ok(picked)
}
