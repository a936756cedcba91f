//! Single-file receipt upload.

use api::{ReceiptBackend, UploadRequest};
use tracing::{info, warn};

use crate::error::{ErrorScope, ErrorSlot, ErrorState, FailureKind};
use crate::notice::Notice;

pub const UPLOAD_SUCCEEDED: &str = "Receipt uploaded successfully!";
pub const UPLOAD_FAILED: &str = "Upload failed.";
pub const NO_FILE_SELECTED: &str = "Please choose a receipt file to upload.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded {
        notice: Notice,
        /// Where the storage service put the file, when it says.
        location: Option<String>,
    },
    Failed { notice: Notice, error: ErrorState },
}

impl UploadOutcome {
    pub fn notice(&self) -> &Notice {
        match self {
            Self::Uploaded { notice, .. } | Self::Failed { notice, .. } => notice,
        }
    }
}

/// Sends one file per submission. Uploads are independent of each other, so
/// there is no sequencing here.
#[derive(Clone)]
pub struct UploadController<R> {
    backend: R,
    error: ErrorSlot,
}

impl<R> UploadController<R> {
    pub fn new(backend: R) -> Self {
        Self {
            backend,
            error: ErrorSlot::new(ErrorScope::Upload),
        }
    }

    pub fn error(&self) -> Option<ErrorState> {
        self.error.get()
    }
}

impl<R: ReceiptBackend> UploadController<R> {
    /// Upload the first file of a selection. An empty selection fails
    /// without touching the network.
    pub async fn submit_selection(
        &self,
        selection: impl IntoIterator<Item = UploadRequest>,
    ) -> UploadOutcome {
        match UploadRequest::first_of(selection) {
            Some(request) => self.submit_upload(request).await,
            None => {
                warn!("upload submitted without a file");
                UploadOutcome::Failed {
                    notice: Notice::failure(NO_FILE_SELECTED),
                    error: self.error.set(FailureKind::Validation, NO_FILE_SELECTED),
                }
            }
        }
    }

    pub async fn submit_upload(&self, request: UploadRequest) -> UploadOutcome {
        let filename = request.filename.clone();
        match self.backend.upload(request).await {
            Ok(receipt) => {
                self.error.clear();
                info!(%filename, location = ?receipt.s3_url, "receipt uploaded");
                UploadOutcome::Uploaded {
                    notice: Notice::success(UPLOAD_SUCCEEDED),
                    location: receipt.s3_url,
                }
            }
            Err(err) => {
                warn!(%filename, error = %err, "upload failed");
                let kind = FailureKind::classify(ErrorScope::Upload, &err);
                UploadOutcome::Failed {
                    notice: Notice::failure(UPLOAD_FAILED),
                    error: self.error.set(kind, UPLOAD_FAILED),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use api::MemoryBackend;

    use super::*;
    use crate::notice::NoticeLevel;

    #[tokio::test]
    async fn successful_upload_reports_location() {
        let backend = MemoryBackend::new();
        let upload = UploadController::new(backend.clone());

        let request =
            UploadRequest::new("lunch.jpg", vec![1, 2, 3]).with_content_type("image/jpeg");

        let outcome = upload.submit_upload(request).await;

        assert_eq!(
            outcome,
            UploadOutcome::Uploaded {
                notice: Notice::success("Receipt uploaded successfully!"),
                location: Some("memory://receipts/lunch.jpg".to_string()),
            }
        );
        assert_eq!(backend.uploads(), vec!["lunch.jpg".to_string()]);
        assert!(upload.error().is_none());
    }

    #[tokio::test]
    async fn only_the_first_selected_file_is_sent() {
        let backend = MemoryBackend::new();
        let upload = UploadController::new(backend.clone());

        upload
            .submit_selection([
                UploadRequest::new("a.png", vec![0]),
                UploadRequest::new("b.png", vec![1]),
            ])
            .await;

        assert_eq!(backend.uploads(), vec!["a.png".to_string()]);
    }

    #[tokio::test]
    async fn empty_selection_is_a_validation_failure() {
        let backend = MemoryBackend::new();
        let upload = UploadController::new(backend.clone());

        let outcome = upload.submit_selection(Vec::new()).await;

        let UploadOutcome::Failed { notice, error } = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(notice.level, NoticeLevel::Failure);
        assert_eq!(error.kind, FailureKind::Validation);
        assert_eq!(error.scope, ErrorScope::Upload);
        assert_eq!(backend.calls().upload, 0);
    }

    #[tokio::test]
    async fn transport_failure_sets_upload_error() {
        let backend = MemoryBackend::new();
        backend.set_offline(true);
        let upload = UploadController::new(backend);

        let outcome = upload
            .submit_upload(UploadRequest::new("a.png", vec![0]))
            .await;

        assert_eq!(outcome.notice(), &Notice::failure("Upload failed."));
        let error = upload.error().unwrap();
        assert_eq!(error.message, "Upload failed.");
        assert_eq!(error.kind, FailureKind::Transport);
    }
}
