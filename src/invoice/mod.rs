//! Invoice orchestration: data model, PDF generation and submission

mod backend;
mod model;
mod pdf;
mod service;

pub use backend::{InvoiceBackend, MockedBackend};
pub use service::{InvoicesService, PendingSubmission};

#[cfg(test)]
pub use backend::{MockInvoiceBackend, SubmissionError};
#[cfg(test)]
pub use model::{InvoiceApiResponse, InvoiceSubmissionResult, SubmittedInvoice};
