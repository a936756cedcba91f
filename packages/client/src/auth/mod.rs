//! Authentication controller: login plus the signup/confirmation machine.

mod signup;

pub use signup::{
    ConfirmationOutcome, SignupOutcome, SignupSession, SignupStep, CONFIRMATION_FAILED,
    CONFIRMATION_GUIDANCE, SIGNUP_FAILED,
};

use std::cell::RefCell;
use std::rc::Rc;

use api::{AuthBackend, Credentials, OrderingPolicy};
use tracing::{debug, info, warn};

use crate::error::{ErrorScope, ErrorSlot, ErrorState, FailureKind};
use crate::sequence::Sequencer;
use crate::view::{ViewHandle, ViewState};

type Hook = Rc<dyn Fn()>;

/// Result of one login submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    Failure(ErrorState),
    /// A newer submission's response was already applied; this one was dropped.
    Superseded,
}

struct AuthInner<B> {
    backend: B,
    view: ViewHandle,
    error: ErrorSlot,
    login_seq: Sequencer,
    signup_seq: Sequencer,
    signup: RefCell<SignupSession>,
    on_authenticated: RefCell<Option<Hook>>,
    on_signup_complete: RefCell<Option<Hook>>,
}

/// Owns credential submission, the signup step and the `Auth` error scope.
///
/// Cloning gives another handle on the same controller.
pub struct AuthController<B> {
    inner: Rc<AuthInner<B>>,
}

impl<B> Clone for AuthController<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<B> AuthController<B> {
    pub fn new(backend: B, view: ViewHandle, ordering: OrderingPolicy) -> Self {
        Self {
            inner: Rc::new(AuthInner {
                backend,
                view,
                error: ErrorSlot::new(ErrorScope::Auth),
                login_seq: Sequencer::new(ordering),
                signup_seq: Sequencer::new(ordering),
                signup: RefCell::new(SignupSession::default()),
                on_authenticated: RefCell::new(None),
                on_signup_complete: RefCell::new(None),
            }),
        }
    }

    pub fn backend(&self) -> &B {
        &self.inner.backend
    }

    /// Called once, when a login first reveals the workspace.
    pub fn on_authenticated(&self, hook: impl Fn() + 'static) {
        *self.inner.on_authenticated.borrow_mut() = Some(Rc::new(hook));
    }

    /// Called once per signup, when the confirmation code is accepted.
    pub fn on_signup_complete(&self, hook: impl Fn() + 'static) {
        *self.inner.on_signup_complete.borrow_mut() = Some(Rc::new(hook));
    }

    pub fn error(&self) -> Option<ErrorState> {
        self.inner.error.get()
    }

    pub fn view(&self) -> ViewState {
        self.inner.view.get()
    }

    fn fire(hook: &RefCell<Option<Hook>>) {
        // Clone out first so the hook may replace itself.
        let hook = hook.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
    }
}

impl<B: AuthBackend> AuthController<B> {
    /// Issue one sign-in call.
    ///
    /// On success the view switches to the workspace in a single assignment and
    /// the auth error is cleared. On failure the view is untouched and the error
    /// is the backend's one collapsed login message.
    pub async fn submit_login(&self, credentials: Credentials) -> LoginOutcome {
        let inner = &self.inner;
        let ticket = inner.login_seq.issue();
        debug!(seq = ticket.seq(), email = %credentials.email, "issuing sign-in");

        let result = inner.backend.sign_in(&credentials).await;

        if !inner.login_seq.admit(ticket) {
            debug!(
                seq = ticket.seq(),
                policy = ?inner.login_seq.policy(),
                "dropping stale sign-in response"
            );
            return LoginOutcome::Superseded;
        }

        match result {
            Ok(()) => {
                inner.error.clear();
                if inner.view.reveal_workspace() {
                    info!(email = %credentials.email, "signed in");
                    Self::fire(&inner.on_authenticated);
                }
                LoginOutcome::Success
            }
            Err(err) => {
                warn!(seq = ticket.seq(), error = %err, "sign-in failed");
                let kind = FailureKind::classify(ErrorScope::Auth, &err);
                LoginOutcome::Failure(
                    inner
                        .error
                        .set(kind, inner.backend.login_failure_message()),
                )
            }
        }
    }
}
