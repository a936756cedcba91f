//! Signup page; returns to the login page once the account is confirmed.

use dioxus::prelude::*;
use ui::SignupForm;

use crate::Route;

#[component]
pub fn Signup() -> Element {
    let nav = use_navigator();

    rsx! {
        div {
            class: "flex flex-col items-center justify-center min-h-screen p-8 bg-white",

            SignupForm {
                on_complete: move |_| {
                    nav.push(Route::Home {});
                },
            }

            p {
                class: "mt-6 text-sm text-neutral-600",
                "Already have an account? "
                Link {
                    class: "text-primary-500 no-underline",
                    to: Route::Home {},
                    "Log in"
                }
            }
        }
    }
}
