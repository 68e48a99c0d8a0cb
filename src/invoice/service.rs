//! Application-level invoice state and submission flow

use super::backend::{InvoiceBackend, SubmissionError};
use super::model::{
    GeneratedPdf, IncompleteInvoice, InvoiceApiRequest, InvoiceApiResponse, InvoiceFormData,
    InvoiceSubmissionResult,
};
use super::pdf::{self, PdfError};
use crate::state::FormValue;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("a submission is already in progress")]
    AlreadySubmitting,
    #[error("invoice is incomplete: {0}")]
    Incomplete(#[from] IncompleteInvoice),
    #[error(transparent)]
    Pdf(#[from] PdfError),
}

impl InvoiceError {
    fn user_message(&self) -> String {
        match self {
            Self::AlreadySubmitting => "A submission is already in progress".to_string(),
            Self::Incomplete(err) => format!("Failed to generate invoice: {err}"),
            Self::Pdf(_) => "Failed to generate invoice".to_string(),
        }
    }
}

/// A backend call running in the background
#[derive(Debug)]
pub struct PendingSubmission {
    handle: JoinHandle<Result<InvoiceApiResponse, SubmissionError>>,
}

impl PendingSubmission {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the backend response
    pub async fn outcome(self) -> Result<InvoiceApiResponse, SubmissionError> {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(err) => Err(SubmissionError::Interrupted(err.to_string())),
        }
    }
}

/// Holds what the form has published plus the submission lifecycle:
/// submitting flag, last result and last generated PDF.
pub struct InvoicesService {
    backend: Arc<dyn InvoiceBackend>,
    form_data: FormValue,
    is_valid: bool,
    is_submitting: bool,
    submission_result: Option<InvoiceSubmissionResult>,
    generated_pdf: Option<GeneratedPdf>,
    in_flight_pdf: Option<GeneratedPdf>,
}

impl InvoicesService {
    pub fn new(backend: Arc<dyn InvoiceBackend>) -> Self {
        Self {
            backend,
            form_data: FormValue::default(),
            is_valid: false,
            is_submitting: false,
            submission_result: None,
            generated_pdf: None,
            in_flight_pdf: None,
        }
    }

    pub fn update_form_data(&mut self, data: FormValue) {
        self.form_data = data;
    }

    pub fn update_form_validation(&mut self, is_valid: bool) {
        self.is_valid = is_valid;
    }

    pub fn form_data(&self) -> &FormValue {
        &self.form_data
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn can_submit(&self) -> bool {
        self.is_valid && !self.is_submitting
    }

    pub fn submission_result(&self) -> Option<&InvoiceSubmissionResult> {
        self.submission_result.as_ref()
    }

    #[cfg(test)]
    pub fn current_pdf(&self) -> Option<&GeneratedPdf> {
        self.generated_pdf.as_ref()
    }

    /// Generate the PDF and start the backend call.
    ///
    /// On failure the error is also recorded as the submission result.
    pub fn submit_invoice(&mut self) -> Result<PendingSubmission, InvoiceError> {
        if self.is_submitting {
            return Err(InvoiceError::AlreadySubmitting);
        }
        self.is_submitting = true;
        self.submission_result = None;

        let prepared = InvoiceFormData::try_from(&self.form_data)
            .map_err(InvoiceError::from)
            .and_then(|data| {
                let pdf = pdf::generate_invoice_pdf(&data)?;
                Ok((data, pdf))
            });
        let (data, pdf) = match prepared {
            Ok(prepared) => prepared,
            Err(err) => {
                tracing::warn!("Invoice generation failed: {err}");
                self.is_submitting = false;
                self.submission_result = Some(InvoiceSubmissionResult::failure(err.user_message()));
                return Err(err);
            }
        };

        let request = InvoiceApiRequest {
            personal_details: data.personal_details,
            invoice_details: data.invoice_details,
            invoice_pdf_file: pdf.clone(),
        };
        self.in_flight_pdf = Some(pdf);

        let backend = Arc::clone(&self.backend);
        let handle = tokio::spawn(async move { backend.submit_invoice(request).await });
        Ok(PendingSubmission { handle })
    }

    /// Record the backend outcome and leave the submitting state
    pub fn finish_submission(
        &mut self,
        outcome: Result<InvoiceApiResponse, SubmissionError>,
    ) -> InvoiceSubmissionResult {
        let pdf = self.in_flight_pdf.take();
        let result = match outcome {
            Ok(response) => {
                if response.success {
                    self.generated_pdf = pdf;
                }
                InvoiceSubmissionResult::from(response)
            }
            Err(err) => {
                tracing::warn!("Invoice submission failed: {err}");
                InvoiceSubmissionResult::failure(err.user_message())
            }
        };
        tracing::info!(
            "Invoice submission finished: success={} id={:?}",
            result.success,
            result.invoice_id
        );
        self.is_submitting = false;
        self.submission_result = Some(result.clone());
        result
    }

    /// Reset after a successful submission, keeping the PDF for download
    pub fn reset_with_pdf(&mut self) {
        self.form_data = FormValue::default();
        self.is_valid = false;
        self.submission_result = None;
        self.is_submitting = false;
    }

    /// Reset everything including the generated PDF
    pub fn reset_form(&mut self) {
        self.reset_with_pdf();
        self.generated_pdf = None;
    }

    pub fn clear_submission_result(&mut self) {
        self.submission_result = None;
        self.generated_pdf = None;
    }

    /// Write the generated PDF into `dir`. Returns `None` without a PDF.
    pub fn download_pdf(&self, dir: &Path) -> std::io::Result<Option<PathBuf>> {
        let Some(pdf) = &self.generated_pdf else {
            return Ok(None);
        };
        fs::create_dir_all(dir)?;
        let path = dir.join(&pdf.file_name);
        fs::write(&path, &pdf.bytes)?;
        tracing::info!("Invoice PDF written to {}", path.display());
        Ok(Some(path))
    }

    /// Write the generated PDF to a preview location in the temp dir
    pub fn preview_pdf(&self) -> std::io::Result<Option<PathBuf>> {
        self.download_pdf(&std::env::temp_dir().join("invoice-tui-preview"))
    }
}
