//! Persisted session credentials.
//!
//! The [`TokenStore`] is the single owner of the access token, refresh token
//! and current-user profile. Values live in a [`KeyValueStore`] so a session
//! survives restarts; the profile is also published on a watch channel.

use std::sync::Arc;

use hrm_domain::{CurrentUser, Session, TokenPair};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::ports::{KeyValueStore, StorageError, StorageWrite};

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "accessToken";
/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
/// Storage key of the serialized user profile.
pub const CURRENT_USER_KEY: &str = "currentUser";

/// Session credentials backed by durable storage.
pub struct TokenStore {
    storage: Arc<dyn KeyValueStore>,
    user: watch::Sender<Option<CurrentUser>>,
}

impl TokenStore {
    /// Opens the store, seeding the current user from storage.
    ///
    /// A profile that cannot be read or parsed is treated as absent.
    pub async fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let user = match storage.get(CURRENT_USER_KEY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw)
                .inspect_err(|e| warn!(error = %e, "ignoring unreadable stored user profile"))
                .ok(),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "could not read stored user profile");
                None
            }
        };

        Self {
            storage,
            user: watch::Sender::new(user),
        }
    }

    /// Returns the access token, if a session exists.
    pub async fn access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY).await
    }

    /// Returns the refresh token, if a session exists.
    pub async fn refresh_token(&self) -> Option<String> {
        self.read(REFRESH_TOKEN_KEY).await
    }

    /// Returns both tokens when both are stored.
    pub async fn tokens(&self) -> Option<TokenPair> {
        let access = self.access_token().await?;
        let refresh = self.refresh_token().await?;
        Some(TokenPair::new(access, refresh))
    }

    /// Returns a snapshot of the whole session.
    pub async fn session(&self) -> Option<Session> {
        let tokens = self.tokens().await?;
        Some(Session {
            tokens,
            current_user: self.current_user(),
        })
    }

    /// Stores a new access token, and the refresh token when one is given.
    ///
    /// Both values are written in one batch.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub async fn set_tokens(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
    ) -> Result<(), StorageError> {
        let mut changes = vec![StorageWrite::Set(ACCESS_TOKEN_KEY, access_token)];
        if let Some(refresh_token) = refresh_token {
            changes.push(StorageWrite::Set(REFRESH_TOKEN_KEY, refresh_token));
        }
        self.storage.write(&changes).await
    }

    /// Stores the tokens and profile of a new session in one batch, then
    /// publishes the profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be encoded or the write
    /// fails. Nothing is stored or published in that case.
    pub async fn start_session(
        &self,
        tokens: &TokenPair,
        user: CurrentUser,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&user)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage
            .write(&[
                StorageWrite::Set(ACCESS_TOKEN_KEY, &tokens.access_token),
                StorageWrite::Set(REFRESH_TOKEN_KEY, &tokens.refresh_token),
                StorageWrite::Set(CURRENT_USER_KEY, &raw),
            ])
            .await?;
        self.user.send_replace(Some(user));
        Ok(())
    }

    /// Stores and publishes the user profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be encoded or stored. The new
    /// value is not published in that case.
    pub async fn set_current_user(&self, user: Option<CurrentUser>) -> Result<(), StorageError> {
        match &user {
            Some(profile) => {
                let raw = serde_json::to_string(profile)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                self.storage.set(CURRENT_USER_KEY, &raw).await?;
            }
            None => self.storage.remove(CURRENT_USER_KEY).await?,
        }
        self.user.send_replace(user);
        Ok(())
    }

    /// Returns the latest user profile without waiting.
    #[must_use]
    pub fn current_user(&self) -> Option<CurrentUser> {
        self.user.borrow().clone()
    }

    /// Subscribes to user profile changes.
    #[must_use]
    pub fn subscribe(&self) -> UserSubscription {
        UserSubscription {
            receiver: self.user.subscribe(),
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.user.receiver_count()
    }

    /// Removes all session values and publishes a signed-out user.
    ///
    /// Subscribers are notified even if the storage write fails, so the
    /// in-process session always ends. Calling it twice is harmless.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub async fn clear(&self) -> Result<(), StorageError> {
        let result = self
            .storage
            .write(&[
                StorageWrite::Remove(ACCESS_TOKEN_KEY),
                StorageWrite::Remove(REFRESH_TOKEN_KEY),
                StorageWrite::Remove(CURRENT_USER_KEY),
            ])
            .await;
        self.user.send_replace(None);
        debug!("session cleared");
        result
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "could not read session value");
                None
            }
        }
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("current_user", &*self.user.borrow())
            .finish_non_exhaustive()
    }
}

/// Subscription to the current-user channel.
///
/// Dropping the handle (or calling [`unsubscribe`](Self::unsubscribe))
/// ends the subscription.
#[derive(Debug)]
pub struct UserSubscription {
    receiver: watch::Receiver<Option<CurrentUser>>,
}

impl UserSubscription {
    /// Returns the latest published profile and marks it as seen.
    pub fn latest(&mut self) -> Option<CurrentUser> {
        self.receiver.borrow_and_update().clone()
    }

    /// Waits for the next published profile.
    ///
    /// Returns `None` once the store has been dropped. Intermediate values
    /// may be skipped; the latest one is always delivered.
    pub async fn changed(&mut self) -> Option<Option<CurrentUser>> {
        self.receiver.changed().await.ok()?;
        Some(self.latest())
    }

    /// Ends the subscription.
    pub fn unsubscribe(self) {}
}
