use dioxus::prelude::*;

use crate::search_panel::SearchPanel;
use crate::session::use_view;
use crate::upload_form::UploadForm;

/// Upload and search, shown once logged in.
#[component]
pub fn Workspace() -> Element {
    let view = use_view();

    rsx! {
        div {
            class: "flex flex-col gap-8 w-full max-w-[560px]",
            if view().upload_visible {
                UploadForm {}
            }
            if view().search_visible {
                SearchPanel {}
            }
        }
    }
}
