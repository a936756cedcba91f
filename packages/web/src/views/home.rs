//! Landing page: the login form until a login succeeds, then the workspace.

use dioxus::prelude::*;
use ui::{use_view, LoginForm, Workspace};

use crate::Route;

#[component]
pub fn Home() -> Element {
    let view = use_view();

    rsx! {
        div {
            class: "flex flex-col items-center min-h-screen p-8 bg-white",

            h1 {
                class: "mb-8 text-neutral-800 font-bold text-[1.75rem]",
                "Receipt Manager"
            }

            if view().login_visible {
                LoginForm {}
                p {
                    class: "mt-6 text-sm text-neutral-600",
                    "Don't have an account? "
                    Link {
                        class: "text-primary-500 no-underline",
                        to: Route::Signup {},
                        "Sign up"
                    }
                }
            } else {
                Workspace {}
            }
        }
    }
}
