//! Form domain layer
//!
//! Type-safe invoice form handling: field values, validators, debounced
//! publication of the aggregate value and validity.

mod debounce;
mod field;
mod form_state;
mod validators;

pub use field::{FieldId, FormField};
pub use form_state::{FormEvent, FormValue, InvoiceForm};

#[cfg(test)]
pub use form_state::{InvoiceDetailsValue, PersonalDetailsValue};
pub use validators::{parse_invoice_date, parse_leading_number};
