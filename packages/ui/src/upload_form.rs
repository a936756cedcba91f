use api::UploadRequest;
use dioxus::html::FileData;
use dioxus::prelude::*;
use tracing::warn;

use crate::error_banner::ErrorBanner;
use crate::session::use_session;
use crate::{BUTTON_CLASS, INPUT_CLASS};

/// A file chosen in the picker, read only when the form is submitted.
pub(crate) trait PickedFile {
    fn name(&self) -> String;
    fn content_type(&self) -> Option<String>;
    fn read_bytes(&self) -> impl std::future::Future<Output = Result<Vec<u8>, String>>;
}

impl PickedFile for FileData {
    fn name(&self) -> String {
        FileData::name(self)
    }

    fn content_type(&self) -> Option<String> {
        FileData::content_type(self)
    }

    async fn read_bytes(&self) -> Result<Vec<u8>, String> {
        FileData::read_bytes(self)
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|err| err.to_string())
    }
}

/// Turn the picked file into the request to send. An unreadable file counts
/// as no selection.
pub(crate) async fn read_picked<F: PickedFile>(picked: Option<&F>) -> Option<UploadRequest> {
    let file = picked?;
    match file.read_bytes().await {
        Ok(bytes) => {
            let request = UploadRequest::new(file.name(), bytes);
            Some(match file.content_type() {
                Some(content_type) => request.with_content_type(content_type),
                None => request,
            })
        }
        Err(err) => {
            warn!(file = %file.name(), error = %err, "could not read selected file");
            None
        }
    }
}

/// Single-file receipt upload.
#[component]
pub fn UploadForm() -> Element {
    let ctx = use_session();
    let upload = ctx.session.upload().clone();
    let notifier = ctx.notifier();
    let mut picked = use_signal(|| None::<FileData>);
    let mut error = use_signal(|| upload.error());

    // Only the first file of a selection is ever sent.
    let handle_change = move |evt: FormEvent| {
        picked.set(evt.files().into_iter().next());
    };

    let handle_upload = move |evt: FormEvent| {
        evt.prevent_default();
        let upload = upload.clone();
        spawn(async move {
            let file = picked();
            let selection = read_picked(file.as_ref()).await;
            let outcome = upload.submit_selection(selection).await;
            notifier.notify(outcome.notice().clone());
            error.set(upload.error());
        });
    };

    rsx! {
        form {
            class: "flex flex-col gap-3",
            onsubmit: handle_upload,

            h2 { class: "m-0 text-lg font-semibold text-neutral-800", "Upload Receipt" }

            ErrorBanner { error: error() }

            input {
                class: INPUT_CLASS,
                r#type: "file",
                accept: "image/*,application/pdf",
                onchange: handle_change,
            }

            button { class: BUTTON_CLASS, r#type: "submit", "Upload" }
        }
    }
}
