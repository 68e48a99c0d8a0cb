//! Invoice data types exchanged with the backend

use crate::state::{parse_invoice_date, parse_leading_number, FormValue};
use chrono::NaiveDate;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetails {
    pub full_name: String,
    pub email_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetails {
    pub invoice_number: String,
    pub amount: f64,
    pub invoice_date: NaiveDate,
}

/// A complete, submittable invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFormData {
    pub personal_details: PersonalDetails,
    pub invoice_details: InvoiceDetails,
    /// PNG data URL
    pub signature: String,
}

/// Why a form value cannot be turned into [`InvoiceFormData`]
#[derive(Debug, Error, PartialEq)]
pub enum IncompleteInvoice {
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("amount {0:?} is not a number")]
    Amount(String),
    #[error("invoice date {0:?} is not a date")]
    Date(String),
}

impl TryFrom<&FormValue> for InvoiceFormData {
    type Error = IncompleteInvoice;

    fn try_from(value: &FormValue) -> Result<Self, Self::Error> {
        let personal = &value.personal_details;
        let invoice = &value.invoice_details;
        let non_empty = |s: &str, name: &'static str| {
            let s = s.trim();
            if s.is_empty() {
                Err(IncompleteInvoice::Missing(name))
            } else {
                Ok(s.to_string())
            }
        };

        let amount = parse_leading_number(&invoice.amount)
            .ok_or_else(|| IncompleteInvoice::Amount(invoice.amount.clone()))?;
        let invoice_date = parse_invoice_date(&invoice.invoice_date)
            .map(|dt| dt.date())
            .ok_or_else(|| IncompleteInvoice::Date(invoice.invoice_date.clone()))?;

        Ok(Self {
            personal_details: PersonalDetails {
                full_name: non_empty(&personal.full_name, "full name")?,
                email_address: non_empty(&personal.email_address, "email address")?,
                phone_number: personal
                    .phone_number
                    .as_deref()
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string),
            },
            invoice_details: InvoiceDetails {
                invoice_number: non_empty(&invoice.invoice_number, "invoice number")?,
                amount,
                invoice_date,
            },
            signature: value
                .signature
                .clone()
                .filter(|s| !s.is_empty())
                .ok_or(IncompleteInvoice::Missing("signature"))?,
        })
    }
}

/// A generated invoice document
#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPdf {
    pub file_name: String,
    #[serde(serialize_with = "serialize_base64")]
    pub bytes: Vec<u8>,
}

fn serialize_base64<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&STANDARD.encode(bytes))
}

impl std::fmt::Debug for GeneratedPdf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedPdf")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Payload sent to the invoices backend
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceApiRequest {
    pub personal_details: PersonalDetails,
    pub invoice_details: InvoiceDetails,
    pub invoice_pdf_file: GeneratedPdf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedInvoice {
    pub id: String,
    pub submitted_at: String,
}

/// Backend response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<SubmittedInvoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// Outcome of a submission as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSubmissionResult {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,
}

impl From<InvoiceApiResponse> for InvoiceSubmissionResult {
    fn from(response: InvoiceApiResponse) -> Self {
        Self {
            success: response.success,
            message: response.message,
            invoice_id: response.data.map(|d| d.id),
        }
    }
}

impl InvoiceSubmissionResult {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            invoice_id: None,
        }
    }
}
