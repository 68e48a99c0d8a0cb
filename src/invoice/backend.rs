//! Invoice submission backends

use super::model::{InvoiceApiRequest, InvoiceApiResponse, SubmittedInvoice};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Latency of the simulated backend
pub const MOCK_LATENCY: Duration = Duration::from_millis(1500);

const DEFAULT_FAILURE_MESSAGE: &str =
    "An error occurred while submitting invoice. Please retry or contact support.";

/// Transport-level submission failures
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SubmissionError {
    #[error("network error: {0}")]
    Network(String),
    #[error("backend returned HTTP {status}")]
    Http { status: u16 },
    #[error("submission task ended unexpectedly: {0}")]
    Interrupted(String),
}

impl SubmissionError {
    /// Message shown to the user for this failure
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::Network(_) => "Network error — please check your internet connection.",
            Self::Http { status } => match status {
                400 => "Invalid request. Please check your input and try again.",
                401 => "Authentication required. Please log in and try again.",
                403 => "Access denied. You do not have permission to perform this action.",
                404 => "Service not found. Please contact support.",
                409 => "Invoice number already exists. Please use a different number.",
                422 => "Validation failed. Please check your input data.",
                500 => "Server error. Please try again later or contact support.",
                503 => "Service temporarily unavailable. Please try again in a few minutes.",
                _ => "An unexpected error occurred",
            },
            Self::Interrupted(_) => DEFAULT_FAILURE_MESSAGE,
        };
        message.to_string()
    }
}

/// Destination for submitted invoices
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceBackend: Send + Sync {
    /// Submit an invoice with its generated PDF
    async fn submit_invoice(
        &self,
        request: InvoiceApiRequest,
    ) -> Result<InvoiceApiResponse, SubmissionError>;
}

/// Offline backend that accepts every invoice after a fixed delay
#[derive(Debug, Clone)]
pub struct MockedBackend {
    latency: Duration,
}

impl MockedBackend {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for MockedBackend {
    fn default() -> Self {
        Self::new(MOCK_LATENCY)
    }
}

/// `INVOICE-` followed by nine uppercase alphanumerics
pub fn generate_mock_invoice_id() -> String {
    let simple = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("INVOICE-{}", &simple[..9])
}

#[async_trait]
impl InvoiceBackend for MockedBackend {
    async fn submit_invoice(
        &self,
        request: InvoiceApiRequest,
    ) -> Result<InvoiceApiResponse, SubmissionError> {
        tracing::info!(
            "Submitting invoice {} ({} byte PDF) to mocked backend",
            request.invoice_details.invoice_number,
            request.invoice_pdf_file.bytes.len()
        );
        tokio::time::sleep(self.latency).await;
        Ok(InvoiceApiResponse {
            success: true,
            message: "Invoice submitted successfully".to_string(),
            data: Some(SubmittedInvoice {
                id: generate_mock_invoice_id(),
                submitted_at: Utc::now().to_rfc3339(),
            }),
            errors: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::model::{GeneratedPdf, InvoiceDetails, PersonalDetails};
    use chrono::NaiveDate;

    fn request() -> InvoiceApiRequest {
        InvoiceApiRequest {
            personal_details: PersonalDetails {
                full_name: "Jane Doe".to_string(),
                email_address: "jane@example.com".to_string(),
                phone_number: None,
            },
            invoice_details: InvoiceDetails {
                invoice_number: "INV2024".to_string(),
                amount: 10.0,
                invoice_date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            },
            invoice_pdf_file: GeneratedPdf {
                file_name: "invoice-INV2024.pdf".to_string(),
                bytes: b"%PDF-1.5".to_vec(),
            },
        }
    }

    #[test]
    fn test_mock_invoice_id_format() {
        let id = generate_mock_invoice_id();
        let suffix = id.strip_prefix("INVOICE-").unwrap();
        assert_eq!(suffix.len(), 9);
        assert!(suffix
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(
            SubmissionError::Http { status: 409 }.user_message(),
            "Invoice number already exists. Please use a different number."
        );
        assert_eq!(
            SubmissionError::Http { status: 503 }.user_message(),
            "Service temporarily unavailable. Please try again in a few minutes."
        );
        assert_eq!(
            SubmissionError::Http { status: 418 }.user_message(),
            "An unexpected error occurred"
        );
        assert_eq!(
            SubmissionError::Network("reset".into()).user_message(),
            "Network error — please check your internet connection."
        );
    }

    #[tokio::test]
    async fn test_mocked_backend_accepts_after_latency() {
        let latency = Duration::from_millis(20);
        let backend = MockedBackend::new(latency);
        let started = tokio::time::Instant::now();
        let response = backend.submit_invoice(request()).await.unwrap();
        assert!(started.elapsed() >= latency);
        assert!(response.success);
        assert_eq!(response.message, "Invoice submitted successfully");
        assert!(response
            .data
            .is_some_and(|d| d.id.starts_with("INVOICE-")));
    }
}
