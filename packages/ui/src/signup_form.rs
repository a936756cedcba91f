use api::Credentials;
use client::{ConfirmationOutcome, ErrorState, SignupStep, CONFIRMATION_GUIDANCE};
use dioxus::prelude::*;

use crate::error_banner::ErrorBanner;
use crate::session::use_session;
use crate::{BUTTON_CLASS, INPUT_CLASS};

/// Two-step account creation: register, then enter the emailed code.
///
/// Leaving the page discards whatever step was in progress.
#[component]
pub fn SignupForm(on_complete: EventHandler<()>) -> Element {
    let auth = use_session().session.auth().clone();
    let mut step = use_signal(|| auth.signup_step());
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut code = use_signal(String::new);
    let mut error = use_signal(|| None::<ErrorState>);

    use_drop({
        let auth = auth.clone();
        move || auth.reset_signup()
    });

    let handle_signup = {
        let auth = auth.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let auth = auth.clone();
            spawn(async move {
                auth.submit_signup(Credentials::new(email(), password()))
                    .await;
                step.set(auth.signup_step());
                error.set(auth.error());
            });
        }
    };

    let handle_confirm = {
        let auth = auth.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let auth = auth.clone();
            spawn(async move {
                let username = auth.signup_session().email().to_string();
                let outcome = auth.submit_confirmation(username, code()).await;
                step.set(auth.signup_step());
                error.set(auth.error());
                if outcome == ConfirmationOutcome::Confirmed {
                    on_complete.call(());
                }
            });
        }
    };

    let body = match step() {
        SignupStep::AwaitingSignup => rsx! {
            form {
                class: "flex flex-col gap-3",
                onsubmit: handle_signup,

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

                button { class: BUTTON_CLASS, r#type: "submit", "Sign up" }
            }
        },
        SignupStep::AwaitingConfirmation => rsx! {
            form {
                class: "flex flex-col gap-3",
                onsubmit: handle_confirm,

                p { class: "m-0 text-sm text-neutral-600", "{CONFIRMATION_GUIDANCE}" }

                input {
                    class: INPUT_CLASS,
                    r#type: "text",
                    placeholder: "Confirmation code",
                    required: true,
                    value: code(),
                    oninput: move |evt: FormEvent| code.set(evt.value()),
                }

                button { class: BUTTON_CLASS, r#type: "submit", "Confirm" }
            }
        },
        SignupStep::Confirmed => rsx! {
            p { class: "m-0 text-sm text-neutral-600", "Account confirmed." }
        },
    };

    rsx! {
        div {
            class: "flex flex-col gap-3 w-full max-w-[320px]",

            h2 { class: "m-0 text-lg font-semibold text-neutral-800", "Create Account" }

            if !auth.backend().supports_signup() {
                p {
                    class: "m-0 text-sm text-amber-700",
                    "This sign-in service does not support creating accounts here."
                }
            }

            ErrorBanner { error: error() }

            {body}
        }
    }
}
