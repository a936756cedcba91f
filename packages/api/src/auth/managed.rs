//! # Managed user pool
//!
//! Talks to a Cognito-style identity provider over its JSON protocol: every call
//! is a `POST` to the pool endpoint with the operation named in `X-Amz-Target`
//! and a PascalCase JSON body.
//!
//! | Operation | Target | Body |
//! |-----------|--------|------|
//! | sign in | `InitiateAuth` | `AuthFlow = USER_PASSWORD_AUTH`, `AuthParameters {USERNAME, PASSWORD}` |
//! | sign up | `SignUp` | `Username`, `Password`, `UserAttributes [{Name: "email", Value}]` |
//! | confirm | `ConfirmSignUp` | `Username`, `ConfirmationCode` |
//!
//! Failures come back as `{"__type": "NotAuthorizedException", "message": "..."}`;
//! the type becomes the `code` of [`ServiceError::Rejected`] and the message is kept for
//! display.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::AuthBackend;
use crate::error::ServiceError;
use crate::models::{Credentials, SignUpRequest};

const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";
const AMZ_JSON: &str = "application/x-amz-json-1.1";

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuth<'a> {
    auth_flow: &'static str,
    client_id: &'a str,
    auth_parameters: AuthParameters<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct AuthParameters<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    #[serde(default)]
    authentication_result: Option<IgnoredAny>,
    #[serde(default)]
    challenge_name: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SignUp<'a> {
    client_id: &'a str,
    username: &'a str,
    password: &'a str,
    user_attributes: Vec<Attribute<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct Attribute<'a> {
    name: &'static str,
    value: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ConfirmSignUp<'a> {
    client_id: &'a str,
    username: &'a str,
    confirmation_code: &'a str,
}

#[derive(Deserialize)]
struct ProviderError {
    #[serde(default, rename = "__type")]
    kind: Option<String>,
    #[serde(default, alias = "Message")]
    message: Option<String>,
}

/// Identity-provider backend with signup and email confirmation.
#[derive(Clone, Debug)]
pub struct ManagedAuthBackend {
    http: Client,
    endpoint: String,
    client_id: String,
}

impl ManagedAuthBackend {
    pub fn new(endpoint: &str, client_id: &str) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.to_string(),
            client_id: client_id.to_string(),
        }
    }

    async fn call<B, R>(&self, operation: &str, body: &B) -> Result<R, ServiceError>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        debug!(operation, "calling identity provider");
        let body = serde_json::to_vec(body).map_err(|e| ServiceError::Decode(e.to_string()))?;
        let response = self
            .http
            .post(&self.endpoint)
            .header("X-Amz-Target", format!("{TARGET_PREFIX}.{operation}"))
            .header(CONTENT_TYPE, AMZ_JSON)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(provider_error(status.as_u16(), &bytes));
        }

        let bytes: &[u8] = if bytes.is_empty() { b"{}" } else { &bytes };
        serde_json::from_slice(bytes).map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

/// Decode an identity-provider error body. The type may carry a namespace
/// prefix (`com.amazonaws...#CodeMismatchException`); only the last part is kept.
fn provider_error(status: u16, body: &[u8]) -> ServiceError {
    let parsed = serde_json::from_slice::<ProviderError>(body).ok();
    let (code, message) = match parsed {
        Some(err) => (
            err.kind
                .map(|kind| kind.rsplit('#').next().unwrap_or(&kind).to_string()),
            err.message,
        ),
        None => (None, None),
    };
    ServiceError::Rejected {
        status: Some(status),
        code,
        message,
    }
}

impl AuthBackend for ManagedAuthBackend {
    async fn sign_in(&self, credentials: &Credentials) -> Result<(), ServiceError> {
        let response: InitiateAuthResponse = self
            .call(
                "InitiateAuth",
                &InitiateAuth {
                    auth_flow: "USER_PASSWORD_AUTH",
                    client_id: &self.client_id,
                    auth_parameters: AuthParameters {
                        username: &credentials.email,
                        password: credentials.password.expose(),
                    },
                },
            )
            .await?;

        if response.authentication_result.is_some() {
            return Ok(());
        }
        // MFA and forced password resets are not handled by this client.
        let challenge = response.challenge_name.unwrap_or_default();
        Err(ServiceError::Rejected {
            status: None,
            code: Some(challenge.clone()),
            message: Some(format!("Sign-in requires an unsupported step: {challenge}")),
        })
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<(), ServiceError> {
        let _: IgnoredAny = self
            .call(
                "SignUp",
                &SignUp {
                    client_id: &self.client_id,
                    username: &request.username,
                    password: request.password.expose(),
                    user_attributes: vec![Attribute {
                        name: "email",
                        value: &request.attributes.email,
                    }],
                },
            )
            .await?;
        Ok(())
    }

    async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<(), ServiceError> {
        let _: IgnoredAny = self
            .call(
                "ConfirmSignUp",
                &ConfirmSignUp {
                    client_id: &self.client_id,
                    username,
                    confirmation_code: code,
                },
            )
            .await?;
        Ok(())
    }
}
