use api::Credentials;
use dioxus::prelude::*;

use crate::error_banner::ErrorBanner;
use crate::session::use_session;
use crate::{BUTTON_CLASS, INPUT_CLASS};

/// Email/password login. A successful login flips the shared view, which
/// swaps this form for the workspace.
#[component]
pub fn LoginForm() -> Element {
    let auth = use_session().session.auth().clone();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| auth.error());

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let auth = auth.clone();
        spawn(async move {
            auth.submit_login(Credentials::new(email(), password()))
                .await;
            error.set(auth.error());
        });
    };

    rsx! {
        form {
            class: "flex flex-col gap-3 w-full max-w-[320px]",
            onsubmit: handle_login,

            h2 { class: "m-0 text-lg font-semibold text-neutral-800", "Log in" }

            ErrorBanner { error: error() }

            input {
                class: INPUT_CLASS,
                r#type: "email",
                placeholder: "Email",
                required: true,
                value: email(),
                oninput: move |evt: FormEvent| email.set(evt.value()),
            }

            input {
                class: INPUT_CLASS,
                r#type: "password",
                placeholder: "Password",
                required: true,
                value: password(),
                oninput: move |evt: FormEvent| password.set(evt.value()),
            }

            button { class: BUTTON_CLASS, r#type: "submit", "Log in" }
        }
    }
}
