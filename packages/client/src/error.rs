//! Per-scope error state.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use api::ServiceError;

/// The workflow an error belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorScope {
    Auth,
    Upload,
    Search,
}

impl fmt::Display for ErrorScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auth => "auth",
            Self::Upload => "upload",
            Self::Search => "search",
        })
    }
}

/// What actually went wrong underneath the user-facing message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// Credentials, signup or confirmation rejected by the identity provider.
    Auth,
    /// Network or service failure on any call.
    Transport,
    /// Input the client refused to send.
    Validation,
}

impl FailureKind {
    /// Classify a wire error for the given scope. Outside the auth scope a
    /// rejection is a service error, not a credential problem.
    pub fn classify(scope: ErrorScope, err: &ServiceError) -> Self {
        if err.is_transport() {
            return Self::Transport;
        }
        match scope {
            ErrorScope::Auth => Self::Auth,
            ErrorScope::Upload | ErrorScope::Search => Self::Transport,
        }
    }
}

/// The active error of one scope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorState {
    pub scope: ErrorScope,
    pub kind: FailureKind,
    pub message: String,
}

/// Holds at most one [`ErrorState`]; setting a new one replaces the old.
#[derive(Clone, Debug)]
pub(crate) struct ErrorSlot {
    scope: ErrorScope,
    current: Rc<RefCell<Option<ErrorState>>>,
}

impl ErrorSlot {
    pub(crate) fn new(scope: ErrorScope) -> Self {
        Self {
            scope,
            current: Rc::new(RefCell::new(None)),
        }
    }

    pub(crate) fn set(&self, kind: FailureKind, message: impl Into<String>) -> ErrorState {
        let state = ErrorState {
            scope: self.scope,
            kind,
            message: message.into(),
        };
        *self.current.borrow_mut() = Some(state.clone());
        state
    }

    pub(crate) fn clear(&self) {
        self.current.borrow_mut().take();
    }

    pub(crate) fn get(&self) -> Option<ErrorState> {
        self.current.borrow().clone()
    }
}
