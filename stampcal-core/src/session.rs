//! Signed-in session: one identity and the mirror scoped to it.
//!
//! The identity is resolved once when the session starts and reused for
//! every write. Signing out consumes the session, dropping the mirror.

use std::sync::Arc;

use tracing::info;

use crate::error::{StampcalError, StampcalResult, StoreError};
use crate::mirror::Mirror;
use crate::remote::{Identity, RemoteStore};
use crate::validation;

pub struct Session {
    store: Arc<dyn RemoteStore>,
    mirror: Mirror,
}

impl Session {
    /// Continue a session the store already holds.
    ///
    /// Fails with [`StampcalError::NotSignedIn`] when there is none.
    pub async fn resume(store: Arc<dyn RemoteStore>) -> StampcalResult<Self> {
        let identity = match store.current_identity().await {
            Ok(identity) => identity,
            Err(StoreError::Unauthenticated) => return Err(StampcalError::NotSignedIn),
            Err(e) => return Err(e.into()),
        };
        info!(user = %identity.id, "session started");

        let mirror = Mirror::open(Arc::clone(&store), identity).await;
        Ok(Session { store, mirror })
    }

    pub async fn sign_in(
        store: Arc<dyn RemoteStore>,
        email: &str,
        password: &str,
    ) -> StampcalResult<Self> {
        let (email, password) = validation::credentials(email, password)?;
        store.create_session(email, password).await?;
        Self::resume(store).await
    }

    /// Create an account and sign into it.
    ///
    /// The password must be at least
    /// [`MIN_PASSWORD_LEN`](validation::MIN_PASSWORD_LEN) characters.
    pub async fn sign_up(
        store: Arc<dyn RemoteStore>,
        email: &str,
        password: &str,
    ) -> StampcalResult<Self> {
        let (email, password) = validation::new_credentials(email, password)?;
        let identity = store.create_account(email, password).await?;
        info!(user = %identity.id, "account created");
        Self::sign_in(store, email, password).await
    }

    pub async fn sign_out(self) -> StampcalResult<()> {
        self.store.delete_session().await?;
        info!(user = %self.identity().id, "signed out");
        Ok(())
    }

    pub fn identity(&self) -> &Identity {
        self.mirror.owner()
    }

    pub fn mirror(&self) -> &Mirror {
        &self.mirror
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::remote::Collection;
    use crate::remote::memory::MemoryStore;
    use crate::theme::Theme;

    #[tokio::test]
    async fn resume_without_session_is_not_signed_in() {
        let store = Arc::new(MemoryStore::default());

        let err = Session::resume(store).await.err().unwrap();
        assert!(matches!(err, StampcalError::NotSignedIn));
    }

    #[tokio::test]
    async fn sign_up_then_write_uses_cached_identity() {
        let store = Arc::new(MemoryStore::default());
        let session = Session::sign_up(store.clone(), "me@example.com", "hunter22")
            .await
            .unwrap();
        let identity_calls = store.calls().identity;

        let calendar = session
            .mirror()
            .create_calendar("Habits", &Theme::default())
            .await
            .unwrap();
        session.mirror().create_stamp("Run", "🏃").await.unwrap();

        assert_eq!(store.calls().identity, identity_calls);
        assert_eq!(calendar.owner_id, session.identity().id);
        assert_eq!(store.count(Collection::Calendars), 1);
    }

    #[tokio::test]
    async fn sign_in_with_wrong_password_fails() {
        let store = Arc::new(MemoryStore::default());
        store.create_account("me@example.com", "right").await.unwrap();

        let err = Session::sign_in(store, "me@example.com", "wrong")
            .await
            .err()
            .unwrap();
        assert!(matches!(err, StampcalError::Store(StoreError::Unauthenticated)));
    }

    #[tokio::test]
    async fn blank_credentials_never_reach_store() {
        let store = Arc::new(MemoryStore::default());

        let err = Session::sign_in(store.clone(), " ", "pw").await.err().unwrap();
        assert!(matches!(
            err,
            StampcalError::Validation(ValidationError::EmptyCredentials)
        ));
        assert_eq!(store.calls().total(), 0);
    }

    #[tokio::test]
    async fn short_password_is_rejected_before_sign_up() {
        let store = Arc::new(MemoryStore::default());

        let err = Session::sign_up(store.clone(), "me@example.com", "abc")
            .await
            .err()
            .unwrap();
        assert!(matches!(
            err,
            StampcalError::Validation(ValidationError::ShortPassword(6))
        ));
        assert_eq!(store.calls().total(), 0);

        // The account was never created, so signing in still fails.
        let err = Session::sign_in(store, "me@example.com", "abc")
            .await
            .err()
            .unwrap();
        assert!(matches!(err, StampcalError::Store(StoreError::Unauthenticated)));
    }

    #[tokio::test]
    async fn sign_out_ends_remote_session() {
        let store = Arc::new(MemoryStore::signed_in_as("u1"));
        let session = Session::resume(store.clone()).await.unwrap();

        session.sign_out().await.unwrap();

        let err = Session::resume(store).await.err().unwrap();
        assert!(matches!(err, StampcalError::NotSignedIn));
    }
}
