//! Session context shared by every receipt component.

use api::ClientConfig;
use client::{AppSession, Notice, ViewState};
use dioxus::prelude::*;
use tracing::error;

/// Shown once the confirmation code is accepted.
pub const ACCOUNT_CONFIRMED: &str = "Account confirmed. You can now log in.";

/// A notice on screen, tagged so a stale dismiss timer leaves a newer one alone.
#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub notice: Notice,
}

/// Pushes transient notices to the toast area. Cheap to copy into handlers.
#[derive(Clone, Copy)]
pub struct Notifier {
    toast: Signal<Option<Toast>>,
}

impl Notifier {
    pub fn notify(&self, notice: Notice) {
        let mut toast = self.toast;
        let id = toast.peek().as_ref().map_or(0, |shown| shown.id + 1);
        toast.set(Some(Toast { id, notice }));
    }
}

#[derive(Clone)]
pub struct SessionContext {
    pub session: AppSession,
    /// Mirrors the session's view; flipped by the `on_authenticated` hook.
    pub view: Signal<ViewState>,
    pub toast: Signal<Option<Toast>>,
    pub dismiss_after_ms: u32,
}

impl SessionContext {
    pub fn notifier(&self) -> Notifier {
        Notifier { toast: self.toast }
    }
}

pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}

pub fn use_view() -> Signal<ViewState> {
    use_session().view
}

/// Builds the controllers for `config` and provides them to `children`.
/// An unusable config falls back to an offline session.
#[component]
pub fn SessionProvider(config: ClientConfig, children: Element) -> Element {
    let view = use_signal(ViewState::default);
    let toast = use_signal(|| None::<Toast>);

    use_context_provider(move || {
        let session = AppSession::from_config(&config).unwrap_or_else(|err| {
            error!(error = %err, "invalid client configuration, running offline");
            AppSession::in_memory(config.search.ordering)
        });

        session.auth().on_authenticated(move || {
            let mut shown = view;
            shown.set(ViewState::AUTHENTICATED);
        });
        let notifier = Notifier { toast };
        session
            .auth()
            .on_signup_complete(move || notifier.notify(Notice::success(ACCOUNT_CONFIRMED)));

        SessionContext {
            session,
            view,
            toast,
            dismiss_after_ms: config.notices.dismiss_after_ms,
        }
    });

    rsx! {
        {children}
    }
}
