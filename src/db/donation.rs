use uuid::Uuid;

use crate::{errors::AppError, models::{Donation, DonationStatus}};

use super::Store;

pub enum Filter {
    Donor(Uuid),
    Recipient(Uuid),
    Status(DonationStatus),
}

pub async fn create(donation: Donation, store: &Store) -> Donation {
    let mut donations = store.donations.write().await;
    donations.push(donation.clone());
    donation
}

// /donation/{id}
pub async fn get_by_id(id: Uuid, store: &Store) -> Option<Donation> {
    let donations = store.donations.read().await;
    donations.iter().find(|d| d.id == id).cloned()
}

pub async fn get_all(store: &Store) -> Vec<Donation> {
    store.donations.read().await.clone()
}

pub async fn filter(filter: Filter, store: &Store) -> Vec<Donation> {
    let donations = store.donations.read().await;
    donations
        .iter()
        .filter(|d| match &filter {
            Filter::Donor(donor_id) => d.donor.id == *donor_id,
            Filter::Recipient(recipient_id) => d.is_received_by(*recipient_id),
            Filter::Status(status) => d.status == *status,
        })
        .cloned()
        .collect()
}

/// Applies `change` to the stored record while holding the write lock, so the
/// check and the write see the same state. Nothing is written if `change` fails.
pub async fn update_with<F>(id: Uuid, store: &Store, change: F) -> Result<Donation, AppError>
where
    F: FnOnce(&Donation) -> Result<Donation, AppError>,
{
    let mut donations = store.donations.write().await;
    let slot = donations
        .iter_mut()
        .find(|d| d.id == id)
        .ok_or(AppError::NotFound)?;
    let updated = change(&*slot)?;
    *slot = updated.clone();
    Ok(updated)
}

pub async fn count_by_status(store: &Store) -> Vec<(DonationStatus, usize)> {
    let donations = store.donations.read().await;
    DonationStatus::ALL
        .iter()
        .map(|status| {
            (
                *status,
                donations.iter().filter(|d| d.status == *status).count(),
            )
        })
        .collect()
}
