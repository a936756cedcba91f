use api::{AuthBackend, Credentials, Password, ServiceError, SignUpRequest};
use tracing::{debug, info, warn};

use super::AuthController;
use crate::error::{ErrorScope, ErrorState, FailureKind};
use crate::sequence::Ticket;

/// Fallback when registration fails without a service message.
pub const SIGNUP_FAILED: &str = "Error signing up";
/// Fallback when confirmation fails without a service message.
pub const CONFIRMATION_FAILED: &str = "Error confirming sign up";
/// Shown alongside the confirmation code input.
pub const CONFIRMATION_GUIDANCE: &str = "Please check your email for the confirmation code.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SignupStep {
    #[default]
    AwaitingSignup,
    AwaitingConfirmation,
    /// Terminal until the user navigates away.
    Confirmed,
}

/// Data collected across the two signup steps.
#[derive(Clone, Debug, Default)]
pub struct SignupSession {
    email: String,
    password: Password,
    confirmation_code: Option<String>,
    step: SignupStep,
}

impl SignupSession {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &Password {
        &self.password
    }

    /// The last code submitted, only while a confirmation is pending.
    pub fn confirmation_code(&self) -> Option<&str> {
        match self.step {
            SignupStep::AwaitingConfirmation => self.confirmation_code.as_deref(),
            _ => None,
        }
    }

    pub fn step(&self) -> SignupStep {
        self.step
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignupOutcome {
    /// Registered; a confirmation code is on its way.
    CodeSent,
    Failure(ErrorState),
    /// Not in [`SignupStep::AwaitingSignup`]; nothing was sent.
    NotReady,
    Superseded,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    Confirmed,
    Failure(ErrorState),
    /// Not in [`SignupStep::AwaitingConfirmation`]; nothing was sent.
    NotReady,
    Superseded,
}

impl<B> AuthController<B> {
    pub fn signup_step(&self) -> SignupStep {
        self.inner.signup.borrow().step
    }

    pub fn signup_session(&self) -> SignupSession {
        self.inner.signup.borrow().clone()
    }

    /// Forget any signup in progress, e.g. when leaving the signup page.
    /// Responses still in flight are discarded when they arrive.
    pub fn reset_signup(&self) {
        self.inner.signup_seq.invalidate();
        *self.inner.signup.borrow_mut() = SignupSession::default();
        self.inner.error.clear();
    }

    /// The server has already acted on a successful signup or confirmation and
    /// will reject a repeat, so a success is never hidden by a newer failure.
    fn admit_signup_response(&self, ticket: Ticket, result: &Result<(), ServiceError>) -> bool {
        match result {
            Ok(()) => self.inner.signup_seq.admit_success(ticket),
            Err(_) => self.inner.signup_seq.admit(ticket),
        }
    }

    fn signup_failure(&self, err: &ServiceError, fallback: &str) -> ErrorState {
        let message = err.service_message().unwrap_or(fallback);
        self.inner
            .error
            .set(FailureKind::classify(ErrorScope::Auth, err), message)
    }
}

impl<B: AuthBackend> AuthController<B> {
    /// Step one: register the account and wait for a confirmation code.
    pub async fn submit_signup(&self, credentials: Credentials) -> SignupOutcome {
        let inner = &self.inner;
        if self.signup_step() != SignupStep::AwaitingSignup {
            debug!(step = ?self.signup_step(), "ignoring sign-up submission");
            return SignupOutcome::NotReady;
        }

        let ticket = inner.signup_seq.issue();
        debug!(seq = ticket.seq(), email = %credentials.email, "issuing sign-up");
        let request = SignUpRequest::from(&credentials);

        let result = inner.backend.sign_up(&request).await;

        // A response for a step we already left never moves the machine.
        if !self.admit_signup_response(ticket, &result)
            || self.signup_step() != SignupStep::AwaitingSignup
        {
            debug!(seq = ticket.seq(), "dropping stale sign-up response");
            return SignupOutcome::Superseded;
        }

        match result {
            Ok(()) => {
                *inner.signup.borrow_mut() = SignupSession {
                    email: credentials.email,
                    password: credentials.password,
                    confirmation_code: None,
                    step: SignupStep::AwaitingConfirmation,
                };
                inner.error.clear();
                info!(email = %request.username, "sign-up accepted, awaiting confirmation");
                SignupOutcome::CodeSent
            }
            Err(err) => {
                warn!(seq = ticket.seq(), error = %err, "sign-up failed");
                SignupOutcome::Failure(self.signup_failure(&err, SIGNUP_FAILED))
            }
        }
    }

    /// Step two: confirm the account with the emailed code.
    pub async fn submit_confirmation(
        &self,
        email: impl Into<String>,
        code: impl Into<String>,
    ) -> ConfirmationOutcome {
        let inner = &self.inner;
        if self.signup_step() != SignupStep::AwaitingConfirmation {
            debug!(step = ?self.signup_step(), "ignoring confirmation submission");
            return ConfirmationOutcome::NotReady;
        }

        let email = email.into();
        let code = code.into();
        inner.signup.borrow_mut().confirmation_code = Some(code.clone());
        let ticket = inner.signup_seq.issue();
        debug!(seq = ticket.seq(), email = %email, "issuing sign-up confirmation");

        let result = inner.backend.confirm_sign_up(&email, &code).await;

        if !self.admit_signup_response(ticket, &result)
            || self.signup_step() != SignupStep::AwaitingConfirmation
        {
            debug!(seq = ticket.seq(), "dropping stale confirmation response");
            return ConfirmationOutcome::Superseded;
        }

        match result {
            Ok(()) => {
                *inner.signup.borrow_mut() = SignupSession {
                    step: SignupStep::Confirmed,
                    ..SignupSession::default()
                };
                inner.error.clear();
                info!(email = %email, "sign-up confirmed");
                Self::fire(&inner.on_signup_complete);
                ConfirmationOutcome::Confirmed
            }
            Err(err) => {
                warn!(seq = ticket.seq(), error = %err, "sign-up confirmation failed");
                ConfirmationOutcome::Failure(self.signup_failure(&err, CONFIRMATION_FAILED))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use api::{FetchAuthBackend, MemoryBackend, OrderingPolicy};

    use super::*;
    use crate::testing::GatedBackend;
    use crate::view::{ViewHandle, ViewState};

    fn controller(backend: MemoryBackend) -> AuthController<MemoryBackend> {
        AuthController::new(backend, ViewHandle::new(), OrderingPolicy::LatestRequest)
    }

    #[tokio::test]
    async fn signup_then_confirmation_completes_once() {
        let auth = controller(MemoryBackend::new());
        let completed = Rc::new(Cell::new(0));
        let counter = Rc::clone(&completed);
        auth.on_signup_complete(move || counter.set(counter.get() + 1));

        let outcome = auth
            .submit_signup(Credentials::new("u@x.com", "secret"))
            .await;
        assert_eq!(outcome, SignupOutcome::CodeSent);
        assert_eq!(auth.signup_step(), SignupStep::AwaitingConfirmation);
        assert_eq!(auth.signup_session().email(), "u@x.com");

        let outcome = auth.submit_confirmation("u@x.com", "123456").await;
        assert_eq!(outcome, ConfirmationOutcome::Confirmed);
        assert_eq!(completed.get(), 1);
        assert_eq!(auth.signup_step(), SignupStep::Confirmed);

        // Confirmed is terminal: the session data is gone and nothing more is sent.
        let session = auth.signup_session();
        assert_eq!(session.email(), "");
        assert!(session.password().is_empty());
        assert_eq!(
            auth.submit_confirmation("u@x.com", "123456").await,
            ConfirmationOutcome::NotReady
        );
        assert_eq!(completed.get(), 1);
        assert_eq!(auth.backend().calls().confirm_sign_up, 1);
        // Signing up never touches the view.
        assert_eq!(auth.view(), ViewState::INITIAL);
    }

    #[tokio::test]
    async fn confirmation_before_signup_is_a_no_op() {
        let auth = controller(MemoryBackend::new());

        let outcome = auth.submit_confirmation("u@x.com", "123456").await;

        assert_eq!(outcome, ConfirmationOutcome::NotReady);
        assert_eq!(auth.signup_step(), SignupStep::AwaitingSignup);
        assert_eq!(auth.backend().calls().confirm_sign_up, 0);
        assert!(auth.error().is_none());
    }

    #[tokio::test]
    async fn signup_is_not_resubmitted_while_confirming() {
        let auth = controller(MemoryBackend::new());
        auth.submit_signup(Credentials::new("u@x.com", "secret"))
            .await;

        let outcome = auth
            .submit_signup(Credentials::new("other@x.com", "secret"))
            .await;

        assert_eq!(outcome, SignupOutcome::NotReady);
        assert_eq!(auth.backend().calls().sign_up, 1);
        assert_eq!(auth.signup_session().email(), "u@x.com");
    }

    #[tokio::test]
    async fn signup_failure_prefers_service_message() {
        let auth = controller(MemoryBackend::new().with_account("u@x.com", "secret"));

        let outcome = auth
            .submit_signup(Credentials::new("u@x.com", "secret"))
            .await;

        let SignupOutcome::Failure(error) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(error.message, "An account with the given email already exists.");
        assert_eq!(error.kind, FailureKind::Auth);
        assert_eq!(auth.signup_step(), SignupStep::AwaitingSignup);
    }

    #[tokio::test]
    async fn wrong_code_keeps_awaiting_confirmation() {
        let auth = controller(MemoryBackend::new());
        auth.submit_signup(Credentials::new("u@x.com", "secret"))
            .await;

        let outcome = auth.submit_confirmation("u@x.com", "000000").await;

        let ConfirmationOutcome::Failure(error) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(
            error.message,
            "Invalid verification code provided, please try again."
        );
        assert_eq!(auth.signup_step(), SignupStep::AwaitingConfirmation);
        assert_eq!(auth.signup_session().confirmation_code(), Some("000000"));

        // A second attempt replaces the error and succeeds.
        let outcome = auth.submit_confirmation("u@x.com", "123456").await;
        assert_eq!(outcome, ConfirmationOutcome::Confirmed);
        assert!(auth.error().is_none());
    }

    #[tokio::test]
    async fn fetch_backend_falls_back_to_generic_messages() {
        let auth = AuthController::new(
            FetchAuthBackend::new("http://127.0.0.1:1"),
            ViewHandle::new(),
            OrderingPolicy::LatestRequest,
        );

        let outcome = auth
            .submit_signup(Credentials::new("u@x.com", "secret"))
            .await;

        let SignupOutcome::Failure(error) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(error.message, SIGNUP_FAILED);
    }

    #[tokio::test]
    async fn offline_confirmation_uses_fallback() {
        let backend = MemoryBackend::new();
        let auth = controller(backend.clone());
        auth.submit_signup(Credentials::new("u@x.com", "secret"))
            .await;
        backend.set_offline(true);

        let outcome = auth.submit_confirmation("u@x.com", "123456").await;

        let ConfirmationOutcome::Failure(error) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(error.message, CONFIRMATION_FAILED);
        assert_eq!(error.kind, FailureKind::Transport);
    }

    #[tokio::test]
    async fn reset_discards_in_flight_signup() {
        let backend = GatedBackend::default();
        let auth = AuthController::new(
            backend.clone(),
            ViewHandle::new(),
            OrderingPolicy::LatestResponse,
        );
        let gate = backend.gate_sign_up("u@x.com");

        let pending = auth.submit_signup(Credentials::new("u@x.com", "secret"));
        futures::pin_mut!(pending);
        assert!(futures::poll!(pending.as_mut()).is_pending());

        auth.reset_signup();
        gate.send(Ok(())).unwrap();

        assert_eq!(pending.await, SignupOutcome::Superseded);
        assert_eq!(auth.signup_step(), SignupStep::AwaitingSignup);
    }

    #[tokio::test]
    async fn late_signup_response_cannot_regress_the_step() {
        let backend = GatedBackend::default();
        let auth = AuthController::new(
            backend.clone(),
            ViewHandle::new(),
            OrderingPolicy::LatestResponse,
        );
        let first = backend.gate_sign_up("first@x.com");
        let second = backend.gate_sign_up("second@x.com");

        let a = auth.submit_signup(Credentials::new("first@x.com", "secret"));
        let b = auth.submit_signup(Credentials::new("second@x.com", "secret"));
        futures::pin_mut!(a, b);
        assert!(futures::poll!(a.as_mut()).is_pending());
        assert!(futures::poll!(b.as_mut()).is_pending());

        second.send(Ok(())).unwrap();
        assert_eq!(b.await, SignupOutcome::CodeSent);
        first
            .send(Err(ServiceError::rejected("UsernameExistsException", "taken")))
            .unwrap();
        assert_eq!(a.await, SignupOutcome::Superseded);

        assert_eq!(auth.signup_step(), SignupStep::AwaitingConfirmation);
        assert_eq!(auth.signup_session().email(), "second@x.com");
        assert!(auth.error().is_none());
    }

    #[tokio::test]
    async fn confirmation_landing_after_reset_fires_nothing() {
        let backend = GatedBackend::default();
        let auth = AuthController::new(
            backend.clone(),
            ViewHandle::new(),
            OrderingPolicy::LatestRequest,
        );
        let completed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&completed);
        auth.on_signup_complete(move || flag.set(true));

        backend.gate_sign_up("u@x.com").send(Ok(())).unwrap();
        auth.submit_signup(Credentials::new("u@x.com", "secret"))
            .await;
        let gate = backend.gate_confirmation("123456");

        let pending = auth.submit_confirmation("u@x.com", "123456");
        futures::pin_mut!(pending);
        assert!(futures::poll!(pending.as_mut()).is_pending());

        auth.reset_signup();
        gate.send(Ok(())).unwrap();

        assert_eq!(pending.await, ConfirmationOutcome::Superseded);
        assert!(!completed.get());
        assert_eq!(auth.signup_step(), SignupStep::AwaitingSignup);
    }

    fn already_confirmed() -> ServiceError {
        ServiceError::rejected(
            "NotAuthorizedException",
            "User cannot be confirmed. Current status is CONFIRMED",
        )
    }

    /// Two confirmations with the same code are in flight. The older one
    /// succeeds and the newer one is rejected because the account is already
    /// confirmed. Returns the controller and how often completion fired.
    async fn overlapping_confirmations(
        policy: OrderingPolicy,
        newer_lands_first: bool,
    ) -> (AuthController<GatedBackend>, u32) {
        let backend = GatedBackend::default();
        let auth = AuthController::new(backend.clone(), ViewHandle::new(), policy);
        let completed = Rc::new(Cell::new(0));
        let counter = Rc::clone(&completed);
        auth.on_signup_complete(move || counter.set(counter.get() + 1));

        backend.gate_sign_up("u@x.com").send(Ok(())).unwrap();
        auth.submit_signup(Credentials::new("u@x.com", "secret"))
            .await;
        let older = backend.gate_confirmation("123456");
        let newer = backend.gate_confirmation("123456");

        {
            let a = auth.submit_confirmation("u@x.com", "123456");
            let b = auth.submit_confirmation("u@x.com", "123456");
            futures::pin_mut!(a, b);
            assert!(futures::poll!(a.as_mut()).is_pending());
            assert!(futures::poll!(b.as_mut()).is_pending());

            if newer_lands_first {
                newer.send(Err(already_confirmed())).unwrap();
                assert!(matches!(b.await, ConfirmationOutcome::Failure(_)));
                older.send(Ok(())).unwrap();
                assert_eq!(a.await, ConfirmationOutcome::Confirmed);
            } else {
                older.send(Ok(())).unwrap();
                assert_eq!(a.await, ConfirmationOutcome::Confirmed);
                newer.send(Err(already_confirmed())).unwrap();
                assert_eq!(b.await, ConfirmationOutcome::Superseded);
            }
        }

        (auth, completed.get())
    }

    #[tokio::test]
    async fn double_confirm_completes_whichever_response_lands_first() {
        for policy in [OrderingPolicy::LatestRequest, OrderingPolicy::LatestResponse] {
            for newer_lands_first in [true, false] {
                let (auth, fired) = overlapping_confirmations(policy, newer_lands_first).await;

                assert_eq!(fired, 1, "{policy:?}, newer_lands_first={newer_lands_first}");
                assert_eq!(auth.signup_step(), SignupStep::Confirmed);
                assert!(auth.error().is_none());
            }
        }
    }

    /// Two sign-ups for the same email are in flight. The older one creates
    /// the account and the newer one is told the account already exists.
    async fn overlapping_signups(
        policy: OrderingPolicy,
        newer_lands_first: bool,
    ) -> AuthController<GatedBackend> {
        let backend = GatedBackend::default();
        let auth = AuthController::new(backend.clone(), ViewHandle::new(), policy);
        let older = backend.gate_sign_up("u@x.com");
        let newer = backend.gate_sign_up("u@x.com");
        let exists = || {
            ServiceError::rejected(
                "UsernameExistsException",
                "An account with the given email already exists.",
            )
        };

        {
            let a = auth.submit_signup(Credentials::new("u@x.com", "secret"));
            let b = auth.submit_signup(Credentials::new("u@x.com", "secret"));
            futures::pin_mut!(a, b);
            assert!(futures::poll!(a.as_mut()).is_pending());
            assert!(futures::poll!(b.as_mut()).is_pending());

            if newer_lands_first {
                newer.send(Err(exists())).unwrap();
                assert!(matches!(b.await, SignupOutcome::Failure(_)));
                older.send(Ok(())).unwrap();
                assert_eq!(a.await, SignupOutcome::CodeSent);
            } else {
                older.send(Ok(())).unwrap();
                assert_eq!(a.await, SignupOutcome::CodeSent);
                newer.send(Err(exists())).unwrap();
                assert_eq!(b.await, SignupOutcome::Superseded);
            }
        }

        auth
    }

    #[tokio::test]
    async fn double_signup_moves_on_whichever_response_lands_first() {
        for policy in [OrderingPolicy::LatestRequest, OrderingPolicy::LatestResponse] {
            for newer_lands_first in [true, false] {
                let auth = overlapping_signups(policy, newer_lands_first).await;

                assert_eq!(
                    auth.signup_step(),
                    SignupStep::AwaitingConfirmation,
                    "{policy:?}, newer_lands_first={newer_lands_first}"
                );
                assert_eq!(auth.signup_session().email(), "u@x.com");
                assert!(auth.error().is_none());
            }
        }
    }

    #[tokio::test]
    async fn older_signup_failure_after_newer_failure_is_dropped() {
        let backend = GatedBackend::default();
        let auth = AuthController::new(
            backend.clone(),
            ViewHandle::new(),
            OrderingPolicy::LatestRequest,
        );
        let older = backend.gate_sign_up("u@x.com");
        let newer = backend.gate_sign_up("u@x.com");

        let a = auth.submit_signup(Credentials::new("u@x.com", "secret"));
        let b = auth.submit_signup(Credentials::new("u@x.com", "secret"));
        futures::pin_mut!(a, b);
        assert!(futures::poll!(a.as_mut()).is_pending());
        assert!(futures::poll!(b.as_mut()).is_pending());

        newer
            .send(Err(ServiceError::rejected("InvalidPasswordException", "newer")))
            .unwrap();
        b.await;
        older
            .send(Err(ServiceError::rejected("InvalidPasswordException", "older")))
            .unwrap();

        assert_eq!(a.await, SignupOutcome::Superseded);
        assert_eq!(auth.error().unwrap().message, "newer");
    }
}
