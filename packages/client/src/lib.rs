//! # Client crate — the receipt manager's interaction state machine
//!
//! The controllers here decide when a network call is issued, which state it
//! moves through, and how its result or failure is surfaced. They are written
//! against the `api` crate's [`AuthBackend`](api::AuthBackend) and
//! [`ReceiptBackend`](api::ReceiptBackend) traits and know nothing about
//! rendering; the `ui` crate mirrors their snapshots into Dioxus signals.
//!
//! | Type | Owns |
//! |------|------|
//! | [`AuthController`] | login, the two-phase signup/confirmation machine, `Auth` errors |
//! | [`UploadController`] | one-shot multipart uploads, `Upload` errors |
//! | [`SearchController`] | the displayed result set, `Search` errors |
//! | [`ViewHandle`] | which surfaces are visible; written once, by a successful login |
//! | [`ClientSession`] | the wiring of all of the above for one page load |
//!
//! Everything runs on one thread. State sits in `Rc`/`Cell`/`RefCell` and is only
//! touched between awaits. Overlapping submissions of the same operation are
//! ordered by a [`Sequencer`] according to the configured [`OrderingPolicy`].

mod auth;
mod error;
mod notice;
mod search;
mod sequence;
mod session;
mod upload;
mod view;

#[cfg(test)]
mod testing;

pub use auth::{
    AuthController, ConfirmationOutcome, LoginOutcome, SignupOutcome, SignupSession, SignupStep,
    CONFIRMATION_FAILED, CONFIRMATION_GUIDANCE, SIGNUP_FAILED,
};
pub use error::{ErrorScope, ErrorState, FailureKind};
pub use notice::{Notice, NoticeLevel};
pub use search::{SearchController, SearchOutcome, SearchResults, SEARCH_FAILED};
pub use sequence::{OrderingPolicy, Sequencer, Ticket};
pub use session::{AppSession, ClientSession};
pub use upload::{
    UploadController, UploadOutcome, NO_FILE_SELECTED, UPLOAD_FAILED, UPLOAD_SUCCEEDED,
};
pub use view::{ViewHandle, ViewState};
