//! Request pipeline stage that keeps requests authenticated.
//!
//! [`RequestAuthenticator`] wraps the raw transport. It attaches the stored
//! access token to every request and, when the API answers 401, exchanges
//! the refresh token for a new access token and resends the request once.
//! If the refresh fails the session is cleared and the caller receives
//! [`HttpClientError::SessionExpired`].
//!
//! Only one refresh runs at a time. A request that hits a 401 while a
//! refresh is already in flight gets its 401 back unchanged; it is neither
//! queued nor retried.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hrm_domain::{ApiRequest, ApiResponse, AuthError};
use tracing::{debug, info, warn};

use super::TokenStore;
use crate::ports::{HttpClient, HttpClientError, HttpFuture, SessionApi};

/// Refresh coordination state of an authenticator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    /// No refresh in progress.
    #[default]
    Idle,
    /// A refresh call is in flight.
    Refreshing,
}

/// Authenticating wrapper around an [`HttpClient`].
pub struct RequestAuthenticator<C, A> {
    transport: C,
    session_api: A,
    tokens: Arc<TokenStore>,
    state: Mutex<RefreshState>,
}

impl<C: HttpClient, A: SessionApi> RequestAuthenticator<C, A> {
    /// Creates an authenticator over `transport`.
    ///
    /// `session_api` must not route through this authenticator.
    pub fn new(transport: C, session_api: A, tokens: Arc<TokenStore>) -> Self {
        Self {
            transport,
            session_api,
            tokens,
            state: Mutex::new(RefreshState::Idle),
        }
    }

    /// Current refresh state.
    #[must_use]
    pub fn state(&self) -> RefreshState {
        *self.lock_state()
    }

    /// The token store this authenticator reads from.
    #[must_use]
    pub const fn token_store(&self) -> &Arc<TokenStore> {
        &self.tokens
    }

    /// The session API used for refreshes.
    #[must_use]
    pub const fn session_api(&self) -> &A {
        &self.session_api
    }

    /// Sends a request with the current access token.
    ///
    /// # Errors
    ///
    /// Returns [`HttpClientError::SessionExpired`] if the API rejected the
    /// access token and the session could not be refreshed. Transport
    /// errors are passed through.
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, HttpClientError> {
        let outgoing = match self.tokens.access_token().await {
            Some(token) => request.with_bearer(&token),
            None => request.clone(),
        };

        let response = self.transport.execute(outgoing).await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }

        let Some(guard) = self.begin_refresh() else {
            debug!(url = %request.url, "refresh already in flight, returning 401");
            return Ok(response);
        };

        let refreshed = self.refresh().await;
        drop(guard);

        match refreshed {
            Ok(access_token) => {
                debug!(url = %request.url, "resending request with refreshed token");
                self.transport.execute(request.with_bearer(&access_token)).await
            }
            Err(error) => {
                warn!(error = %error, "session refresh failed, signing out");
                if let Err(e) = self.tokens.clear().await {
                    warn!(error = %e, "could not remove stored session");
                }
                Err(HttpClientError::SessionExpired(error))
            }
        }
    }

    /// Exchanges the refresh token and stores the result.
    async fn refresh(&self) -> Result<String, AuthError> {
        let refresh_token = self
            .tokens
            .refresh_token()
            .await
            .ok_or(AuthError::MissingRefreshToken)?;

        info!("access token rejected, refreshing session");
        let refreshed = self.session_api.refresh_token(&refresh_token).await?;

        if let Err(e) = self
            .tokens
            .set_tokens(&refreshed.access_token, refreshed.refresh_token.as_deref())
            .await
        {
            warn!(error = %e, "could not store refreshed tokens");
        }
        info!("session refreshed");
        Ok(refreshed.access_token)
    }

    /// Moves to `Refreshing`, or returns `None` if a refresh is in flight.
    fn begin_refresh(&self) -> Option<RefreshGuard<'_>> {
        let mut state = self.lock_state();
        if *state == RefreshState::Refreshing {
            return None;
        }
        *state = RefreshState::Refreshing;
        Some(RefreshGuard { state: &self.state })
    }

    fn lock_state(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: HttpClient, A: SessionApi> HttpClient for RequestAuthenticator<C, A> {
    fn execute(&self, request: ApiRequest) -> HttpFuture<'_> {
        Box::pin(self.send(request))
    }
}

impl<C, A> std::fmt::Debug for RequestAuthenticator<C, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestAuthenticator")
            .field("tokens", &self.tokens)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Returns the authenticator to `Idle` when the refresh settles.
struct RefreshGuard<'a> {
    state: &'a Mutex<RefreshState>,
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = RefreshState::Idle;
    }
}
