use client::ErrorState;
use dioxus::prelude::*;

/// Inline, persistent error region for one scope.
#[component]
pub fn ErrorBanner(error: Option<ErrorState>) -> Element {
    let Some(error) = error else {
        return rsx! {};
    };

    rsx! {
        div {
            class: "px-2.5 py-2.5 bg-red-50 border border-red-200 rounded text-red-600 text-[0.8125rem]",
            role: "alert",
            "data-scope": "{error.scope}",
            "{error.message}"
        }
    }
}
