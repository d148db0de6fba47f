//! Donation status transitions: `pending -> accepted -> picked`.
//!
//! These functions never mutate their input. They return the next version of
//! the record, or the reason the move is not allowed.

use chrono::{DateTime, Utc};

use crate::{
    errors::{AppError, Transition},
    models::{Donation, DonationStatus, PartyRef, User},
};

pub fn accept(donation: &Donation, actor: &User, now: DateTime<Utc>) -> Result<Donation, AppError> {
    if donation.status != DonationStatus::Pending {
        return Err(AppError::InvalidTransition {
            transition: Transition::Accept,
            from: donation.status,
        });
    }
    if !actor.role.map_or(false, |r| r.can_receive()) {
        return Err(AppError::Forbidden);
    }
    if donation.is_expired(now) {
        return Err(AppError::DonationExpired {
            transition: Transition::Accept,
        });
    }
    Ok(Donation {
        status: DonationStatus::Accepted,
        recipient: Some(PartyRef::from(actor)),
        ..donation.clone()
    })
}

pub fn complete_pickup(donation: &Donation) -> Result<Donation, AppError> {
    if donation.status != DonationStatus::Accepted {
        return Err(AppError::InvalidTransition {
            transition: Transition::CompletePickup,
            from: donation.status,
        });
    }
    Ok(Donation {
        status: DonationStatus::Picked,
        ..donation.clone()
    })
}
