//! # Wire models
//!
//! | Type | Direction | Shape |
//! |------|-----------|-------|
//! | [`Credentials`] | client → `POST {api}/login` | `{"email", "password"}` |
//! | [`SignUpRequest`] | client → identity provider | `{username, password, attributes: {email}}` |
//! | [`SearchQuery`] | client → `POST {api}/search` | `{"query"}` |
//! | [`ReceiptRecord`] | `POST {api}/search` → client | `{"vendor_name", "transaction_date", "total_amount"}` |
//! | [`UploadRequest`] | client → `POST {storage}` | multipart field `file` |
//! | [`UploadReceipt`] | `POST {storage}` → client | optional `{"message", "s3_url"}` |
//!
//! Passwords are wrapped in [`Password`] so they never show up in `Debug` output
//! or log lines.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A password held only for the lifetime of a request.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// The plaintext, for building a request body.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

impl From<&str> for Password {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Email and password as typed into a login or signup form.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: Password,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<Password>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Registration payload. The email doubles as the username.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SignUpRequest {
    pub username: String,
    pub password: Password,
    pub attributes: SignUpAttributes,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SignUpAttributes {
    pub email: String,
}

impl From<&Credentials> for SignUpRequest {
    fn from(credentials: &Credentials) -> Self {
        Self {
            username: credentials.email.clone(),
            password: credentials.password.clone(),
            attributes: SignUpAttributes {
                email: credentials.email.clone(),
            },
        }
    }
}

/// Free-text search sent to the receipt service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// One indexed receipt as returned by the search endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub vendor_name: String,
    /// Date as the service formats it, e.g. "2024-01-01".
    pub transaction_date: String,
    /// Numeric string, e.g. "4.50". Bare JSON numbers are accepted too.
    #[serde(deserialize_with = "string_or_number")]
    pub total_amount: String,
}

impl ReceiptRecord {
    pub fn new(
        vendor_name: impl Into<String>,
        transaction_date: impl Into<String>,
        total_amount: impl Into<String>,
    ) -> Self {
        Self {
            vendor_name: vendor_name.into(),
            transaction_date: transaction_date.into(),
            total_amount: total_amount.into(),
        }
    }
}

impl fmt::Display for ReceiptRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vendor: {}, Date: {}, Total: {}",
            self.vendor_name, self.transaction_date, self.total_amount
        )
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Amount::deserialize(deserializer)? {
        Amount::Text(text) => text,
        Amount::Number(number) => number.to_string(),
    })
}

/// A single file picked for upload.
#[derive(Clone, PartialEq)]
pub struct UploadRequest {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadRequest {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Only the first file of a selection is uploaded.
    pub fn first_of(selection: impl IntoIterator<Item = UploadRequest>) -> Option<Self> {
        selection.into_iter().next()
    }
}

impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Body of a successful upload, when the storage endpoint sends one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub s3_url: Option<String>,
}
