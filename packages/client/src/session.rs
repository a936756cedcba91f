//! One page load's worth of controllers, sharing a single [`ViewHandle`].

use api::{AuthClient, ClientConfig, ConfigError, MemoryBackend, OrderingPolicy, ReceiptClient};
use tracing::info;

use crate::auth::AuthController;
use crate::search::SearchController;
use crate::upload::UploadController;
use crate::view::{ViewHandle, ViewState};

pub struct ClientSession<A, R> {
    view: ViewHandle,
    auth: AuthController<A>,
    upload: UploadController<R>,
    search: SearchController<R>,
}

impl<A, R: Clone> Clone for ClientSession<A, R> {
    fn clone(&self) -> Self {
        Self {
            view: self.view.clone(),
            auth: self.auth.clone(),
            upload: self.upload.clone(),
            search: self.search.clone(),
        }
    }
}

impl<A, R: Clone> ClientSession<A, R> {
    /// Upload and search share the receipt backend; auth writes the view.
    pub fn new(auth_backend: A, receipts: R, ordering: OrderingPolicy) -> Self {
        let view = ViewHandle::new();
        Self {
            auth: AuthController::new(auth_backend, view.clone(), ordering),
            upload: UploadController::new(receipts.clone()),
            search: SearchController::new(receipts, ordering),
            view,
        }
    }
}

impl<A, R> ClientSession<A, R> {
    pub fn view(&self) -> ViewState {
        self.view.get()
    }

    pub fn auth(&self) -> &AuthController<A> {
        &self.auth
    }

    pub fn upload(&self) -> &UploadController<R> {
        &self.upload
    }

    pub fn search(&self) -> &SearchController<R> {
        &self.search
    }
}

/// The session the app runs with: backends picked from configuration.
pub type AppSession = ClientSession<AuthClient, ReceiptClient>;

impl AppSession {
    /// Memory-backed auth and receipts share one store, so an account created
    /// through signup can search what it uploads.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let memory = MemoryBackend::new();
        let auth = AuthClient::from_config(config, &memory)?;
        let receipts = ReceiptClient::from_config(config, &memory)?;
        info!(
            provider = ?config.auth.provider,
            ordering = ?config.search.ordering,
            "client session ready"
        );
        Ok(Self::new(auth, receipts, config.search.ordering))
    }

    /// Offline session on a fresh in-memory store.
    pub fn in_memory(ordering: OrderingPolicy) -> Self {
        let memory = MemoryBackend::new();
        Self::new(
            AuthClient::Memory(memory.clone()),
            ReceiptClient::Memory(memory),
            ordering,
        )
    }
}
