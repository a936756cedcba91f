use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::auth::AuthBackend;
use crate::error::ServiceError;
use crate::models::{
    Credentials, Password, ReceiptRecord, SearchQuery, SignUpRequest, UploadReceipt,
    UploadRequest,
};
use crate::receipts::ReceiptBackend;

const DEFAULT_CONFIRMATION_CODE: &str = "123456";

/// How many times each backend operation has been called.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub sign_in: u32,
    pub sign_up: u32,
    pub confirm_sign_up: u32,
    pub search: u32,
    pub upload: u32,
}

#[derive(Debug)]
struct Account {
    password: Password,
    confirmed: bool,
}

#[derive(Debug)]
struct MemoryState {
    accounts: HashMap<String, Account>,
    confirmation_code: String,
    receipts: Vec<ReceiptRecord>,
    uploads: Vec<String>,
    offline: bool,
    calls: CallCounts,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            accounts: HashMap::new(),
            confirmation_code: DEFAULT_CONFIRMATION_CODE.to_string(),
            receipts: Vec::new(),
            uploads: Vec::new(),
            offline: false,
            calls: CallCounts::default(),
        }
    }
}

/// In-memory auth and receipt backend for testing and offline development.
///
/// Clones share state, so one instance can serve both the auth and the receipt
/// side of a session.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to add an already confirmed account.
    pub fn with_account(self, email: &str, password: &str) -> Self {
        self.state.borrow_mut().accounts.insert(
            email.to_string(),
            Account {
                password: Password::new(password),
                confirmed: true,
            },
        );
        self
    }

    /// Builder method to seed indexed receipts, in the order search returns them.
    pub fn with_receipts(self, receipts: Vec<ReceiptRecord>) -> Self {
        self.state.borrow_mut().receipts = receipts;
        self
    }

    /// Builder method to set the code every signup must be confirmed with.
    pub fn with_confirmation_code(self, code: &str) -> Self {
        self.state.borrow_mut().confirmation_code = code.to_string();
        self
    }

    /// While offline every call fails with a transport error.
    pub fn set_offline(&self, offline: bool) {
        self.state.borrow_mut().offline = offline;
    }

    pub fn calls(&self) -> CallCounts {
        self.state.borrow().calls
    }

    /// Filenames received by `upload`, oldest first.
    pub fn uploads(&self) -> Vec<String> {
        self.state.borrow().uploads.clone()
    }

    fn reachable(&self) -> Result<(), ServiceError> {
        if self.state.borrow().offline {
            Err(ServiceError::Transport("network unreachable".to_string()))
        } else {
            Ok(())
        }
    }
}

fn matches_query(record: &ReceiptRecord, needle: &str) -> bool {
    [
        &record.vendor_name,
        &record.transaction_date,
        &record.total_amount,
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

impl AuthBackend for MemoryBackend {
    async fn sign_in(&self, credentials: &Credentials) -> Result<(), ServiceError> {
        self.state.borrow_mut().calls.sign_in += 1;
        self.reachable()?;

        let state = self.state.borrow();
        match state.accounts.get(&credentials.email) {
            Some(account) if account.password == credentials.password => {
                if account.confirmed {
                    Ok(())
                } else {
                    Err(ServiceError::rejected(
                        "UserNotConfirmedException",
                        "User is not confirmed.",
                    ))
                }
            }
            _ => Err(ServiceError::rejected(
                "NotAuthorizedException",
                "Incorrect username or password.",
            )),
        }
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<(), ServiceError> {
        self.state.borrow_mut().calls.sign_up += 1;
        self.reachable()?;

        let mut state = self.state.borrow_mut();
        if state.accounts.contains_key(&request.username) {
            return Err(ServiceError::rejected(
                "UsernameExistsException",
                "An account with the given email already exists.",
            ));
        }
        if request.password.expose().len() < 6 {
            return Err(ServiceError::rejected(
                "InvalidPasswordException",
                "Password did not conform with policy: Password not long enough",
            ));
        }
        state.accounts.insert(
            request.username.clone(),
            Account {
                password: request.password.clone(),
                confirmed: false,
            },
        );
        Ok(())
    }

    async fn confirm_sign_up(&self, username: &str, code: &str) -> Result<(), ServiceError> {
        self.state.borrow_mut().calls.confirm_sign_up += 1;
        self.reachable()?;

        let mut state = self.state.borrow_mut();
        let expected = state.confirmation_code.clone();
        let Some(account) = state.accounts.get_mut(username) else {
            return Err(ServiceError::rejected(
                "UserNotFoundException",
                "Username/client id combination not found.",
            ));
        };
        if code != expected {
            return Err(ServiceError::rejected(
                "CodeMismatchException",
                "Invalid verification code provided, please try again.",
            ));
        }
        account.confirmed = true;
        Ok(())
    }
}

impl ReceiptBackend for MemoryBackend {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ReceiptRecord>, ServiceError> {
        self.state.borrow_mut().calls.search += 1;
        self.reachable()?;

        let needle = query.query.trim().to_lowercase();
        let state = self.state.borrow();
        Ok(state
            .receipts
            .iter()
            .filter(|record| needle.is_empty() || matches_query(record, &needle))
            .cloned()
            .collect())
    }

    async fn upload(&self, request: UploadRequest) -> Result<UploadReceipt, ServiceError> {
        self.state.borrow_mut().calls.upload += 1;
        self.reachable()?;

        let url = format!("memory://receipts/{}", request.filename);
        let mut state = self.state.borrow_mut();
        // Nothing extracts fields here, so the upload shows up as a bare placeholder.
        state
            .receipts
            .push(ReceiptRecord::new(request.filename.clone(), "pending", "0.00"));
        state.uploads.push(request.filename);
        Ok(UploadReceipt {
            message: Some("Receipt uploaded successfully!".to_string()),
            s3_url: Some(url),
        })
    }
}
