//! Authentication backends.
//!
//! Both client variants sit behind [`AuthBackend`]: the plain-JSON login endpoint
//! ([`FetchAuthBackend`]) and the managed user pool with signup and email
//! confirmation ([`ManagedAuthBackend`]). [`AuthClient`] picks one at runtime from
//! [`ClientConfig`].

mod fetch;
mod managed;

pub use fetch::FetchAuthBackend;
pub use managed::ManagedAuthBackend;

use crate::config::{AuthProvider, ClientConfig};
use crate::error::{ConfigError, ServiceError};
use crate::memory::MemoryBackend;
use crate::models::{Credentials, SignUpRequest};

/// Shown when a managed sign-in is rejected.
pub const INCORRECT_CREDENTIALS: &str = "Incorrect username or password";

/// Shown when a plain-JSON login is rejected.
pub const LOGIN_FAILED: &str = "Login failed.";

/// Async trait for the identity calls the auth controller issues.
pub trait AuthBackend {
    fn sign_in(
        &self,
        credentials: &Credentials,
    ) -> impl std::future::Future<Output = Result<(), ServiceError>>;
    fn sign_up(
        &self,
        request: &SignUpRequest,
    ) -> impl std::future::Future<Output = Result<(), ServiceError>>;
    fn confirm_sign_up(
        &self,
        username: &str,
        code: &str,
    ) -> impl std::future::Future<Output = Result<(), ServiceError>>;

    /// The single message every failed sign-in collapses to.
    fn login_failure_message(&self) -> &'static str {
        INCORRECT_CREDENTIALS
    }
}

/// The configured authentication backend.
#[derive(Clone, Debug)]
pub enum AuthClient {
    Fetch(FetchAuthBackend),
    Managed(ManagedAuthBackend),
    Memory(MemoryBackend),
}

impl AuthClient {
    /// Build the backend selected by `auth.provider`.
    ///
    /// `memory` is the backend shared with the receipt side in offline mode.
    pub fn from_config(config: &ClientConfig, memory: &MemoryBackend) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(match config.auth.provider {
            AuthProvider::Fetch => Self::Fetch(FetchAuthBackend::new(&config.api.base_url)),
            AuthProvider::Managed => Self::Managed(ManagedAuthBackend::new(
                &config.auth.managed.endpoint,
                &config.auth.managed.client_id,
            )),
            AuthProvider::Memory => Self::Memory(memory.clone()),
        })
    }

    /// Whether this backend can register new accounts.
    pub fn supports_signup(&self) -> bool {
        !matches!(self, Self::Fetch(_))
    }
}

impl AuthBackend for AuthClient {
    async fn sign_in(&self, credentials: &Credentials) -> Result<(), ServiceError> {
        match self {
            Self::Fetch(backend) => backend.sign_in(credentials).await,
            Self::Managed(backend) => backend.sign_in(credentials).await,
            Self::Memory(backend) => backend.sign_in(credentials).await,
        }
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<(), ServiceError> {
        match self {
            Self::Fetch(backend) => backend.sign_up(request).await,
            Self::Managed(backend) => backend.sign_up(request).await,
            Self::Memory(backend) => backend.sign_up(request).await,
        }
    }

    async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<(), ServiceError> {
        match self {
            Self::Fetch(backend) => backend.confirm_sign_up(username, code).await,
            Self::Managed(backend) => backend.confirm_sign_up(username, code).await,
            Self::Memory(backend) => backend.confirm_sign_up(username, code).await,
        }
    }

    fn login_failure_message(&self) -> &'static str {
        match self {
            Self::Fetch(backend) => backend.login_failure_message(),
            Self::Managed(backend) => backend.login_failure_message(),
            Self::Memory(backend) => backend.login_failure_message(),
        }
    }
}
