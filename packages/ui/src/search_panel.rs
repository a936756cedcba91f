use client::{SearchOutcome, SearchResults};
use dioxus::prelude::*;

use crate::error_banner::ErrorBanner;
use crate::session::use_session;
use crate::{BUTTON_CLASS, INPUT_CLASS};

/// Free-text search over stored receipts, with the result list below.
#[component]
pub fn SearchPanel() -> Element {
    let ctx = use_session();
    let search = ctx.session.search().clone();
    let notifier = ctx.notifier();
    let mut query = use_signal(String::new);
    let mut results = use_signal(|| search.results());
    let mut error = use_signal(|| search.error());

    let handle_search = move |evt: FormEvent| {
        evt.prevent_default();
        let search = search.clone();
        spawn(async move {
            if let SearchOutcome::Failed { notice, .. } = search.submit_search(query()).await {
                notifier.notify(notice);
            }
            results.set(search.results());
            error.set(search.error());
        });
    };

    rsx! {
        div {
            class: "flex flex-col gap-3",

            form {
                class: "flex gap-2",
                onsubmit: handle_search,

                input {
                    class: "{INPUT_CLASS} flex-1",
                    r#type: "text",
                    placeholder: "Search receipts",
                    value: query(),
                    oninput: move |evt: FormEvent| query.set(evt.value()),
                }

                button { class: BUTTON_CLASS, r#type: "submit", "Search" }
            }

            ErrorBanner { error: error() }

            if let SearchResults::Results { records, .. } = results() {
                div {
                    h3 {
                        class: "m-0 mb-2 text-base font-semibold text-neutral-800",
                        "Search Results:"
                    }
                    ul {
                        class: "m-0 p-0 list-none flex flex-col gap-1 text-sm text-neutral-700",
                        for (index, record) in records.iter().enumerate() {
                            li { key: "{index}", "{record}" }
                        }
                    }
                }
            }
        }
    }
}
