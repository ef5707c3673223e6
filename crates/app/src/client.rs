use std::sync::Arc;

use hrm_application::ports::{HttpClientError, KeyValueStore, Notifier};
use hrm_application::{
    AuthService, BranchService, DepartmentService, RequestAuthenticator, TokenStore,
};
use hrm_infrastructure::{
    ClientConfig, FileKeyValueStore, HttpSessionApi, ReqwestHttpClient, TokioFileSystem,
};

/// Session API over the raw transport.
pub type SessionApiClient = HttpSessionApi<ReqwestHttpClient>;

/// Transport that attaches and refreshes the session token.
pub type Authenticated = Arc<RequestAuthenticator<ReqwestHttpClient, SessionApiClient>>;

/// Fully wired client.
///
/// Login and refresh calls use the raw transport; every other call goes
/// through the shared [`RequestAuthenticator`].
pub struct HrmClient {
    /// Settings the client was built from.
    pub config: ClientConfig,
    /// Session credentials.
    pub tokens: Arc<TokenStore>,
    /// Authentication flows.
    pub auth: AuthService<SessionApiClient>,
    /// Authenticated transport for ad-hoc requests.
    pub authenticator: Authenticated,
    /// Branch management.
    pub branches: BranchService<Authenticated>,
    /// Department management.
    pub departments: DepartmentService<Authenticated>,
}

impl HrmClient {
    /// Builds a client persisting its session under `config.state_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub async fn open(
        config: ClientConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, HttpClientError> {
        let storage = Arc::new(FileKeyValueStore::new(TokioFileSystem::new(), &config.state_dir));
        Self::with_storage(config, storage, notifier).await
    }

    /// Builds a client over the given session storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub async fn with_storage(
        config: ClientConfig,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, HttpClientError> {
        let transport = ReqwestHttpClient::new(config.timeout_ms)?;
        let tokens = Arc::new(TokenStore::load(storage).await);

        let session_api = || HttpSessionApi::new(transport.clone(), config.api_url.clone());
        let authenticator = Arc::new(RequestAuthenticator::new(
            transport.clone(),
            session_api(),
            Arc::clone(&tokens),
        ));

        Ok(Self {
            auth: AuthService::new(session_api(), Arc::clone(&tokens), Arc::clone(&notifier)),
            branches: BranchService::new(
                Arc::clone(&authenticator),
                &config.api_url,
                Arc::clone(&notifier),
            ),
            departments: DepartmentService::new(
                Arc::clone(&authenticator),
                &config.api_url,
                notifier,
            ),
            authenticator,
            tokens,
            config,
        })
    }
}
