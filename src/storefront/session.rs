//! Authenticated-session tracking for the storefront client.

use std::fmt;

use async_trait::async_trait;
use tokio::{sync::watch, task::JoinHandle};
use uuid::Uuid;

#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub access_token: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Push-style stream of session changes. Dropping it unsubscribes.
pub struct SessionSubscription {
    rx: watch::Receiver<Option<Session>>,
}

impl SessionSubscription {
    pub fn new(rx: watch::Receiver<Option<Session>>) -> Self {
        Self { rx }
    }

    /// Wait for the next change. `None` once the provider has gone away.
    pub async fn next(&mut self) -> Option<Option<Session>> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn current_session(&self) -> Option<Session>;

    fn subscribe(&self) -> SessionSubscription;
}

/// In-process session source. Sign-in and sign-out publish here.
#[derive(Debug, Clone)]
pub struct SessionHub {
    tx: watch::Sender<Option<Session>>,
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHub {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    pub fn publish(&self, session: Session) {
        tracing::debug!(user_id = %session.user_id, "session published");
        self.tx.send_replace(Some(session));
    }

    pub fn clear(&self) {
        tracing::debug!("session cleared");
        self.tx.send_replace(None);
    }
}

#[async_trait]
impl SessionProvider for SessionHub {
    async fn current_session(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> SessionSubscription {
        SessionSubscription::new(self.tx.subscribe())
    }
}

/// Tracks whether the storefront user is signed in.
///
/// Seeded from the provider's current session, then kept current by a
/// background listener that is aborted when the gate is dropped.
pub struct SessionGate {
    state: watch::Receiver<Option<Session>>,
    listener: JoinHandle<()>,
}

impl SessionGate {
    pub async fn start(provider: &dyn SessionProvider) -> Self {
        // Subscribe before the initial fetch so no change falls in between.
        let mut subscription = provider.subscribe();
        let initial = provider.current_session().await;
        let (tx, state) = watch::channel(initial);

        let listener = tokio::spawn(async move {
            while let Some(session) = subscription.next().await {
                tracing::debug!(authenticated = session.is_some(), "session changed");
                tx.send_replace(session);
            }
        });

        Self { state, listener }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    pub fn current(&self) -> Option<Session> {
        self.state.borrow().clone()
    }

    /// Observe the gate's own view of the session.
    pub fn watch(&self) -> watch::Receiver<Option<Session>> {
        self.state.clone()
    }
}

impl Drop for SessionGate {
    fn drop(&mut self) {
        self.listener.abort();
    }
}
