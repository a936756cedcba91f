//! This crate contains all shared UI for the receipt manager.
//!
//! Components read their controllers from the [`SessionProvider`] context and
//! copy controller snapshots (errors, signup step, results) into signals after
//! each submission.

mod error_banner;
pub use error_banner::ErrorBanner;

mod session;
pub use session::{
    use_session, use_view, Notifier, SessionContext, SessionProvider, Toast, ACCOUNT_CONFIRMED,
};

mod notice_toast;
pub use notice_toast::NoticeToast;

mod login_form;
pub use login_form::LoginForm;

mod signup_form;
pub use signup_form::SignupForm;

mod upload_form;
pub use upload_form::UploadForm;

mod search_panel;
pub use search_panel::SearchPanel;

mod workspace;
pub use workspace::Workspace;

pub(crate) const INPUT_CLASS: &str = "w-full bg-white border border-neutral-300 rounded px-3 py-2 text-sm text-neutral-800 outline-none focus:border-primary-500";
pub(crate) const BUTTON_CLASS: &str = "px-4 py-2 rounded bg-primary-500 text-white text-sm font-medium cursor-pointer hover:opacity-90";
