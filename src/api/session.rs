use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Authentication state for one signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    two_factor_pending: bool,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// A first factor was accepted and a verification code is still owed.
    pub fn requires_two_factor(&self) -> bool {
        self.two_factor_pending
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn authorize(&mut self, token: String) {
        self.token = Some(token);
        self.two_factor_pending = false;
    }

    pub fn await_two_factor(&mut self, temporary_token: String) {
        self.token = Some(temporary_token);
        self.two_factor_pending = true;
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.two_factor_pending = false;
    }
}

/// Shared handle to a [`Session`], passed to the API client and view-models.
#[derive(Clone, Debug, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Session>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.write().await
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_authenticated()
    }

    pub async fn snapshot(&self) -> Session {
        self.inner.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_transitions() {
        let mut s = Session::default();
        assert!(!s.is_authenticated());

        s.await_two_factor("temp-auth-token".into());
        assert!(s.is_authenticated());
        assert!(s.requires_two_factor());

        s.authorize("auth-token-1".into());
        assert!(!s.requires_two_factor());
        assert_eq!(s.token(), Some("auth-token-1"));

        s.clear();
        assert!(!s.is_authenticated());
        assert_eq!(s.token(), None);
    }

    #[tokio::test]
    async fn test_handle_shares_state() {
        let handle = SessionHandle::new();
        let other = handle.clone();
        handle.write().await.authorize("auth-token-2".into());
        assert!(other.is_authenticated().await);
    }
}
