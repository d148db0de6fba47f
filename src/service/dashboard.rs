use chrono::{DateTime, Utc};

use crate::{
    db::{self, donation::Filter, Store},
    dto::{AdminOverview, DonationView, DonorDashboard, ImpactStats, RecipientDashboard, StatusCount},
    errors::AppError,
    models::{DonationStatus, UserRole},
};

use super::auth::UserAuthData;

/// Headline numbers shown on the admin overview. Not derived from the store.
pub const IMPACT_STATS: ImpactStats = ImpactStats {
    food_saved_kg: 1248,
    people_served: 3745,
    emission_prevented_kg: 2496,
    donations_completed: 187,
    active_ngos: 23,
    active_volunteers: 45,
};

pub async fn donor(auth: &UserAuthData, store: &Store, now: DateTime<Utc>) -> Result<DonorDashboard, AppError> {
    let user = auth.user()?;
    if !user.has_role(UserRole::Donor) {
        return Err(AppError::Forbidden);
    }
    let donations = db::donation::filter(Filter::Donor(user.id), store).await;
    let count = |wanted: &[DonationStatus]| donations.iter().filter(|d| wanted.contains(&d.status)).count();
    Ok(DonorDashboard {
        total: donations.len(),
        active: count(&[DonationStatus::Pending, DonationStatus::Accepted]),
        completed: count(&[DonationStatus::Picked, DonationStatus::Delivered]),
        donations: DonationView::many(donations, now),
    })
}

pub async fn recipient(auth: &UserAuthData, store: &Store, now: DateTime<Utc>) -> Result<RecipientDashboard, AppError> {
    let user = auth.user()?;
    if !user.role.map_or(false, |r| r.can_receive()) {
        return Err(AppError::Forbidden);
    }
    let available = db::donation::filter(Filter::Status(DonationStatus::Pending), store).await;
    let my_pickups: Vec<_> = db::donation::filter(Filter::Recipient(user.id), store)
        .await
        .into_iter()
        .filter(|d| matches!(d.status, DonationStatus::Accepted | DonationStatus::Picked))
        .collect();
    Ok(RecipientDashboard {
        available_count: available.len(),
        accepted_count: my_pickups
            .iter()
            .filter(|d| d.status == DonationStatus::Accepted)
            .count(),
        available: DonationView::many(available, now),
        my_pickups: DonationView::many(my_pickups, now),
    })
}

pub async fn admin(auth: &UserAuthData, store: &Store) -> Result<AdminOverview, AppError> {
    let user = auth.user()?;
    if !user.has_role(UserRole::Admin) {
        return Err(AppError::Forbidden);
    }
    let status_counts: Vec<StatusCount> = db::donation::count_by_status(store)
        .await
        .into_iter()
        .map(|(status, count)| StatusCount { status, count })
        .collect();
    Ok(AdminOverview {
        impact: IMPACT_STATS,
        total_donations: status_counts.iter().map(|c| c.count).sum(),
        status_counts,
        users: db::user::get_all(store).await,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed;
    use crate::service::session::SessionStore;

    async fn auth_for(sessions: &SessionStore, key: &str) -> UserAuthData {
        let user = seed::sample_users()
            .into_iter()
            .find(|u| u.id == seed::seed_id(key))
            .unwrap();
        let (session_id, session) = sessions.open(user, std::time::Duration::from_secs(60)).await;
        let (_, cancel) = sessions.get(session_id).await.unwrap();
        UserAuthData { session_id, session, cancel }
    }

    #[actix_rt::test]
    async fn donor_sees_only_own_listings() {
        let now = Utc::now();
        let store = db::init_store(now);
        let sessions = SessionStore::new();
        let auth = auth_for(&sessions, "donor4").await;
        let res = donor(&auth, &store, now).await.unwrap();
        assert_eq!(res.total, 1);
        assert_eq!(res.active, 1);
        assert_eq!(res.completed, 0);
        assert_eq!(res.donations[0].donation.title, "Restaurant End-of-Day Items");
    }

    #[actix_rt::test]
    async fn recipient_dashboard_splits_available_and_pickups() {
        let now = Utc::now();
        let store = db::init_store(now);
        let sessions = SessionStore::new();
        let auth = auth_for(&sessions, "recipient1").await;
        let res = recipient(&auth, &store, now).await.unwrap();
        assert_eq!(res.available_count, 3);
        assert_eq!(res.accepted_count, 1);
        assert_eq!(res.my_pickups.len(), 1);
    }

    #[actix_rt::test]
    async fn admin_overview_is_admin_only() {
        let now = Utc::now();
        let store = db::init_store(now);
        let sessions = SessionStore::new();
        let donor_auth = auth_for(&sessions, "donor1").await;
        assert!(matches!(admin(&donor_auth, &store).await, Err(AppError::Forbidden)));

        let admin_auth = auth_for(&sessions, "admin").await;
        let res = admin(&admin_auth, &store).await.unwrap();
        assert_eq!(res.total_donations, 5);
        assert_eq!(res.impact.food_saved_kg, 1248);
        let pending = res
            .status_counts
            .iter()
            .find(|c| c.status == DonationStatus::Pending)
            .unwrap();
        assert_eq!(pending.count, 3);
    }
}
