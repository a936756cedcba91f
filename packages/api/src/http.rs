//! Helpers shared by the HTTP backends.

use serde::Deserialize;

use crate::error::ServiceError;

/// Join a base URL and a path segment without doubling the slash.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default, alias = "Message", alias = "error")]
    message: Option<String>,
}

/// Pass a 2xx response through; turn anything else into [`ServiceError::Rejected`].
///
/// A JSON body with a `message` field is kept as the service-supplied message.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|body| body.message);

    Err(ServiceError::Rejected {
        status: Some(status.as_u16()),
        code: None,
        message,
    })
}
