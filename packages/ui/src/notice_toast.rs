use dioxus::prelude::*;

use crate::session::use_session;

/// Shows the current notice and clears it after the configured delay.
#[component]
pub fn NoticeToast() -> Element {
    let ctx = use_session();
    let mut toast = ctx.toast;
    let dismiss_after_ms = ctx.dismiss_after_ms;

    use_effect(move || {
        let Some(shown) = toast() else {
            return;
        };
        spawn(async move {
            #[cfg(target_arch = "wasm32")]
            gloo_timers::future::TimeoutFuture::new(dismiss_after_ms).await;
            #[cfg(not(target_arch = "wasm32"))]
            tokio::time::sleep(std::time::Duration::from_millis(dismiss_after_ms.into())).await;

            // A newer notice owns its own timer.
            let still_shown = toast.peek().as_ref().map(|current| current.id) == Some(shown.id);
            if still_shown {
                toast.set(None);
            }
        });
    });

    let Some(current) = toast() else {
        return rsx! {};
    };
    let class = if current.notice.is_failure() {
        "fixed bottom-4 right-4 px-4 py-2.5 rounded shadow bg-red-600 text-white text-sm"
    } else {
        "fixed bottom-4 right-4 px-4 py-2.5 rounded shadow bg-emerald-600 text-white text-sm"
    };

    rsx! {
        div {
            class: "{class}",
            role: "status",
            "{current.notice.message}"
        }
    }
}
