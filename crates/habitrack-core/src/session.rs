//! Explicit session context and the auth session stream.
//!
//! Operations never read a global "current user": callers build a
//! [`SessionContext`] and pass it in.

use chrono::NaiveDate;
use tokio::sync::watch;

use crate::date::local_today;
use crate::error::{CoreError, Result};

/// Who is acting, and which calendar day counts as "today".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user_id: String,
    pub today: NaiveDate,
}

impl SessionContext {
    pub fn new(user_id: impl Into<String>, today: NaiveDate) -> Self {
        Self {
            user_id: user_id.into(),
            today,
        }
    }

    /// Context for `user_id` on the local calendar date.
    pub fn now(user_id: impl Into<String>) -> Self {
        Self::new(user_id, local_today())
    }

    /// Context for whoever is signed in to `auth`.
    ///
    /// # Errors
    /// Returns [`CoreError::NotAuthenticated`] when nobody is signed in.
    pub fn from_auth(auth: &AuthSession, today: NaiveDate) -> Result<Self> {
        auth.current_user()
            .map(|user| Self::new(user, today))
            .ok_or(CoreError::NotAuthenticated)
    }
}

/// Holder of the signed-in user (`None` when signed out).
#[derive(Debug)]
pub struct AuthSession {
    tx: watch::Sender<Option<String>>,
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthSession {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn sign_in(&self, user_id: impl Into<String>) {
        let user_id = user_id.into();
        tracing::debug!(user = %user_id, "signed in");
        self.tx.send_replace(Some(user_id));
    }

    pub fn sign_out(&self) {
        tracing::debug!("signed out");
        self.tx.send_replace(None);
    }

    pub fn current_user(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    /// Subscribe to auth changes. The stream first yields the current state.
    pub fn subscribe(&self) -> SessionStream {
        SessionStream {
            rx: self.tx.subscribe(),
            primed: false,
        }
    }
}

/// Stream of `currentUser | null` values.
///
/// Rapid successive changes may be coalesced into the latest one.
pub struct SessionStream {
    rx: watch::Receiver<Option<String>>,
    primed: bool,
}

impl SessionStream {
    /// Next auth state, or `None` once the [`AuthSession`] is dropped.
    pub async fn next(&mut self) -> Option<Option<String>> {
        if !self.primed {
            self.primed = true;
            return Some(self.rx.borrow_and_update().clone());
        }
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}
