// Session store
//
// Single mutable slot holding the current authentication artifact.
// Writers swap whole `Arc<Session>` values, so readers always observe
// either the previous session or the new one, never a partial update.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::Utc;
use secrecy::SecretString;
use tracing::info;

/// An authenticated session issued by the remote side.
#[derive(Debug, Clone)]
pub struct Session {
    /// Opaque token (`hash`) sent back on every authenticated call.
    pub auth_token: SecretString,
    pub refresh_token: Option<SecretString>,
    /// Local clock at the moment the login succeeded.
    pub issued_at_epoch_millis: i64,
    pub authenticated: bool,
    /// The account the token was issued for.
    pub username: String,
    /// Country tag the login was performed with.
    pub country: String,
}

impl Session {
    /// Build a session stamped with the current time.
    pub fn issue(
        username: impl Into<String>,
        country: impl Into<String>,
        auth_token: impl Into<String>,
        refresh_token: Option<String>,
    ) -> Self {
        Self {
            auth_token: SecretString::from(auth_token.into()),
            refresh_token: refresh_token
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
            issued_at_epoch_millis: Utc::now().timestamp_millis(),
            authenticated: true,
            username: username.into(),
            country: country.into(),
        }
    }
}

/// Holds at most one live [`Session`].
///
/// `install` and `clear` are the only writers; both are a single atomic
/// pointer swap and never suspend.
#[derive(Debug)]
pub struct SessionStore {
    slot: ArcSwapOption<Session>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            slot: ArcSwapOption::empty(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.slot
            .load()
            .as_ref()
            .is_some_and(|session| session.authenticated)
    }

    /// Snapshot of the current session, if any.
    pub fn current(&self) -> Option<Arc<Session>> {
        self.slot.load_full()
    }

    /// Replace whatever is stored with `session`.
    pub fn install(&self, session: Session) {
        info!(user = %session.username, "session installed");
        self.slot.store(Some(Arc::new(session)));
    }

    /// Drop the stored session. Returns `true` if one was present.
    pub fn clear(&self) -> bool {
        let had_session = self.slot.swap(None).is_some();
        if had_session {
            info!("session cleared");
        }
        had_session
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn starts_unauthenticated() {
        let store = SessionStore::new();
        assert!(!store.is_authenticated());
        assert!(store.current().is_none());
    }

    #[test]
    fn install_then_clear() {
        let store = SessionStore::new();
        store.install(Session::issue("alice", "GB", "hash-1", Some("refresh".into())));
        assert!(store.is_authenticated());

        let session = store.current().unwrap();
        assert_eq!(session.auth_token.expose_secret(), "hash-1");
        assert_eq!(
            session.refresh_token.as_ref().unwrap().expose_secret(),
            "refresh"
        );
        assert!(session.issued_at_epoch_millis > 0);

        assert!(store.clear());
        assert!(!store.is_authenticated());
        assert!(!store.clear());
    }

    #[test]
    fn install_replaces_whole_session() {
        let store = SessionStore::new();
        store.install(Session::issue("alice", "GB", "old", None));
        let before = store.current().unwrap();

        store.install(Session::issue("bob", "ES", "new", None));
        let after = store.current().unwrap();

        // The earlier snapshot is untouched by the replacement.
        assert_eq!(before.username, "alice");
        assert_eq!(before.auth_token.expose_secret(), "old");
        assert_eq!(after.username, "bob");
        assert_eq!(after.auth_token.expose_secret(), "new");
        assert_eq!(after.country, "ES");
    }

    #[test]
    fn empty_refresh_token_is_dropped() {
        let session = Session::issue("alice", "GB", "hash", Some(String::new()));
        assert!(session.refresh_token.is_none());
    }
}
