//! Application state and dependency injection.

use pathway_postgres::PgClient;

use crate::service::{
    Authenticator, PasswordHasher, Result, ServiceConfig, SessionKeys, TokenService,
};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection). The store
/// handle is constructed explicitly at startup and dropped at shutdown;
/// no component holds mutable state across requests.
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    pg_client: PgClient,
    authenticator: Authenticator,
    password_hasher: PasswordHasher,
    token_service: TokenService,
    session_keys: SessionKeys,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Loads the session key pair and constructs the store handle; the
    /// connection pool itself connects lazily on first use.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let pg_client = config.connect_postgres()?;
        let password_hasher = config.create_password_hasher();
        let session_keys = config.load_session_keys().await?;
        session_keys.validate_keys()?;

        let token_service = TokenService::new(
            session_keys.clone(),
            config.access_ttl(),
            config.refresh_ttl(),
        );
        let authenticator = Authenticator::new(pg_client.clone(), password_hasher.clone());

        Ok(Self {
            pg_client,
            authenticator,
            password_hasher,
            token_service,
            session_keys,
        })
    }

    /// Returns the store handle, e.g. for running migrations at startup.
    #[inline]
    pub fn pg_client(&self) -> &PgClient {
        &self.pg_client
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+ $(,)?) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(pg_client: PgClient);
impl_di!(authenticator: Authenticator);
impl_di!(password_hasher: PasswordHasher);
impl_di!(token_service: TokenService);
impl_di!(session_keys: SessionKeys);
