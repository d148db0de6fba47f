use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{dto::UpdateUserDto, models::User};

/// Immutable view of who is signed in. Every change yields a new snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn anonymous() -> Self {
        Session { user: None }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn login(&self, user: User) -> Session {
        Session { user: Some(user) }
    }

    pub fn logout(&self) -> Session {
        Session::anonymous()
    }

    /// Merges `changes` into the signed-in user. Anonymous sessions stay anonymous.
    pub fn update(&self, changes: &UpdateUserDto) -> Session {
        match &self.user {
            Some(user) => Session {
                user: Some(changes.apply(user)),
            },
            None => self.clone(),
        }
    }
}

struct SessionEntry {
    session: Arc<Session>,
    cancel: CancellationToken,
    expires_at: Instant,
}

impl SessionEntry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Live sessions keyed by the id carried in the bearer token.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session that lives for `ttl`. Expired entries are swept on the way in.
    pub async fn open(&self, user: User, ttl: Duration) -> (Uuid, Arc<Session>) {
        let session_id = Uuid::new_v4();
        let session = Arc::new(Session::anonymous().login(user));
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| {
            let live = entry.is_live(now);
            if !live {
                entry.cancel.cancel();
            }
            live
        });
        if sessions.len() < before {
            debug!("swept {} expired sessions", before - sessions.len());
        }
        sessions.insert(
            session_id,
            SessionEntry {
                session: session.clone(),
                cancel: CancellationToken::new(),
                expires_at: now + ttl,
            },
        );
        info!("session {} opened", session_id);
        (session_id, session)
    }

    /// Expired sessions read as absent even before they are swept.
    pub async fn get(&self, session_id: Uuid) -> Option<(Arc<Session>, CancellationToken)> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&session_id)
            .filter(|entry| entry.is_live(Instant::now()))
            .map(|entry| (entry.session.clone(), entry.cancel.clone()))
    }

    pub async fn update(&self, session_id: Uuid, changes: &UpdateUserDto) -> Option<Arc<Session>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions
            .get_mut(&session_id)
            .filter(|entry| entry.is_live(Instant::now()))?;
        entry.session = Arc::new(entry.session.update(changes));
        Some(entry.session.clone())
    }

    /// Drops the session and cancels whatever it still has in flight.
    pub async fn close(&self, session_id: Uuid) -> bool {
        match self.sessions.write().await.remove(&session_id) {
            Some(entry) => {
                entry.cancel.cancel();
                info!("session {} closed", session_id);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed;

    const HOUR: Duration = Duration::from_secs(60 * 60);

    fn someone() -> User {
        seed::sample_users().remove(0)
    }

    #[test]
    fn snapshots_are_not_mutated() {
        let anon = Session::anonymous();
        let signed_in = anon.login(someone());
        assert!(!anon.is_authenticated());
        assert!(signed_in.is_authenticated());

        let changes = UpdateUserDto {
            name: Some("Renamed Farm".to_string()),
            ..Default::default()
        };
        let renamed = signed_in.update(&changes);
        assert_eq!(signed_in.user().unwrap().name, "Local Farm Co-op");
        assert_eq!(renamed.user().unwrap().name, "Renamed Farm");
        assert_eq!(renamed.user().unwrap().id, signed_in.user().unwrap().id);

        assert!(!renamed.logout().is_authenticated());
        assert!(renamed.is_authenticated());
    }

    #[test]
    fn update_on_anonymous_is_a_no_op() {
        let changes = UpdateUserDto {
            name: Some("Ghost".to_string()),
            ..Default::default()
        };
        assert_eq!(Session::anonymous().update(&changes), Session::anonymous());
    }

    #[actix_rt::test]
    async fn close_cancels_in_flight_work() {
        let store = SessionStore::new();
        let (id, session) = store.open(someone(), HOUR).await;
        assert!(session.is_authenticated());

        let (_, cancel) = store.get(id).await.unwrap();
        assert!(!cancel.is_cancelled());
        assert!(store.close(id).await);
        assert!(cancel.is_cancelled());
        assert!(store.get(id).await.is_none());
        assert!(!store.close(id).await);
    }

    #[actix_rt::test]
    async fn update_replaces_stored_snapshot() {
        let store = SessionStore::new();
        let (id, before) = store.open(someone(), HOUR).await;
        let changes = UpdateUserDto {
            organization: Some("Farm Collective".to_string()),
            ..Default::default()
        };
        let after = store.update(id, &changes).await.unwrap();
        assert_eq!(before.user().unwrap().organization.as_deref(), Some("Local Farm Co-op"));
        assert_eq!(after.user().unwrap().organization.as_deref(), Some("Farm Collective"));
        let (current, _) = store.get(id).await.unwrap();
        assert_eq!(current, after);
    }

    #[actix_rt::test]
    async fn expired_sessions_are_gone() {
        let store = SessionStore::new();
        let (stale, _) = store.open(someone(), Duration::ZERO).await;
        assert!(store.get(stale).await.is_none());
        let changes = UpdateUserDto::default();
        assert!(store.update(stale, &changes).await.is_none());

        for _ in 0..100 {
            store.open(someone(), Duration::ZERO).await;
        }
        let (live, _) = store.open(someone(), HOUR).await;
        let sessions = store.sessions.read().await;
        assert_eq!(sessions.len(), 1);
        assert!(sessions.contains_key(&live));
    }
}
