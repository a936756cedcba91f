//! A backend whose calls stay pending until the test releases them.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use api::{
    AuthBackend, Credentials, ReceiptBackend, ReceiptRecord, SearchQuery, ServiceError,
    SignUpRequest, UploadReceipt, UploadRequest,
};
use tokio::sync::oneshot;

type Pending<T> = oneshot::Receiver<Result<T, ServiceError>>;
type Gates<T> = Rc<RefCell<HashMap<String, VecDeque<Pending<T>>>>>;

/// Each call takes the oldest gate registered under its key and waits on it,
/// so gates for the same key are handed out in call order.
/// Sign-in is keyed by password, sign-up by email, confirmation by code,
/// search by query text.
#[derive(Clone, Default)]
pub(crate) struct GatedBackend {
    sign_ins: Gates<()>,
    sign_ups: Gates<()>,
    confirmations: Gates<()>,
    searches: Gates<Vec<ReceiptRecord>>,
}

fn gate<T>(gates: &Gates<T>, key: &str) -> oneshot::Sender<Result<T, ServiceError>> {
    let (tx, rx) = oneshot::channel();
    gates
        .borrow_mut()
        .entry(key.to_string())
        .or_default()
        .push_back(rx);
    tx
}

async fn wait<T>(gates: &Gates<T>, key: &str) -> Result<T, ServiceError> {
    let rx = gates
        .borrow_mut()
        .get_mut(key)
        .and_then(VecDeque::pop_front)
        .unwrap_or_else(|| panic!("no gate registered for {key:?}"));
    rx.await
        .unwrap_or_else(|_| Err(ServiceError::Transport("gate dropped".to_string())))
}

impl GatedBackend {
    pub(crate) fn gate_sign_in(
        &self,
        password: &str,
    ) -> oneshot::Sender<Result<(), ServiceError>> {
        gate(&self.sign_ins, password)
    }

    pub(crate) fn gate_sign_up(&self, email: &str) -> oneshot::Sender<Result<(), ServiceError>> {
        gate(&self.sign_ups, email)
    }

    pub(crate) fn gate_confirmation(
        &self,
        code: &str,
    ) -> oneshot::Sender<Result<(), ServiceError>> {
        gate(&self.confirmations, code)
    }

    pub(crate) fn gate_search(
        &self,
        query: &str,
    ) -> oneshot::Sender<Result<Vec<ReceiptRecord>, ServiceError>> {
        gate(&self.searches, query)
    }
}

impl AuthBackend for GatedBackend {
    async fn sign_in(&self, credentials: &Credentials) -> Result<(), ServiceError> {
        wait(&self.sign_ins, credentials.password.expose()).await
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<(), ServiceError> {
        wait(&self.sign_ups, &request.username).await
    }

    async fn confirm_sign_up(&self, _username: &str, code: &str) -> Result<(), ServiceError> {
        wait(&self.confirmations, code).await
    }
}

impl ReceiptBackend for GatedBackend {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<ReceiptRecord>, ServiceError> {
        wait(&self.searches, &query.query).await
    }

    async fn upload(&self, _request: UploadRequest) -> Result<UploadReceipt, ServiceError> {
        Ok(UploadReceipt::default())
    }
}
