//! Plain-JSON login against the receipt API.

use reqwest::Client;
use tracing::debug;

use super::{AuthBackend, LOGIN_FAILED};
use crate::error::ServiceError;
use crate::http::{endpoint, ensure_success};
use crate::models::{Credentials, SignUpRequest};

/// `POST {api}/login` with `{email, password}`; any 2xx is a successful login.
///
/// The endpoint has no registration flow, so signup and confirmation always
/// fail with [`ServiceError::Unsupported`].
#[derive(Clone, Debug)]
pub struct FetchAuthBackend {
    http: Client,
    login_url: String,
}

impl FetchAuthBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            login_url: endpoint(base_url, "login"),
        }
    }
}

impl AuthBackend for FetchAuthBackend {
    async fn sign_in(&self, credentials: &Credentials) -> Result<(), ServiceError> {
        debug!(url = %self.login_url, email = %credentials.email, "posting login");
        let response = self
            .http
            .post(&self.login_url)
            .json(credentials)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn sign_up(&self, _request: &SignUpRequest) -> Result<(), ServiceError> {
        Err(ServiceError::Unsupported("sign up"))
    }

    async fn confirm_sign_up(&self, _username: &str, _code: &str) -> Result<(), ServiceError> {
        Err(ServiceError::Unsupported("sign-up confirmation"))
    }

    fn login_failure_message(&self) -> &'static str {
        LOGIN_FAILED
    }
}
