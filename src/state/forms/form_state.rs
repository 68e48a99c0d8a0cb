//! Invoice form state: field groups, validation and change publication

use super::debounce::{Debouncer, Distinct, FORM_DEBOUNCE};
use super::field::{FieldId, FormField};
use super::validators::{self, ValidationError, MIN_AMOUNT};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Raw personal-details values as typed by the user
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDetailsValue {
    pub full_name: String,
    pub email_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// Raw invoice-details values as typed by the user
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetailsValue {
    pub invoice_number: String,
    pub amount: String,
    pub invoice_date: String,
}

/// Aggregate value of the whole form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValue {
    pub personal_details: PersonalDetailsValue,
    pub invoice_details: InvoiceDetailsValue,
    pub signature: Option<String>,
}

/// Notifications published by the form
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    ValueChanged(FormValue),
    ValidityChanged(bool),
}

/// Name, email and phone
#[derive(Debug, Clone)]
pub struct PersonalDetailsGroup {
    pub full_name: FormField,
    pub email_address: FormField,
    pub phone_number: FormField,
}

impl PersonalDetailsGroup {
    fn new() -> Self {
        Self {
            full_name: FormField::new(FieldId::FullName),
            email_address: FormField::new(FieldId::EmailAddress),
            phone_number: FormField::new(FieldId::PhoneNumber),
        }
    }

    fn errors(&self, id: FieldId) -> Vec<ValidationError> {
        match id {
            FieldId::FullName => {
                let v = self.full_name.as_text();
                collect([
                    validators::required(v),
                    validators::min_length(v, 2),
                    validators::max_length(v, 100),
                ])
            }
            FieldId::EmailAddress => {
                let v = self.email_address.as_text();
                collect([
                    validators::required(v),
                    validators::email(v),
                    validators::max_length(v, 150),
                ])
            }
            FieldId::PhoneNumber => collect([validators::phone_number(self.phone_number.as_text())]),
            _ => Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        [FieldId::FullName, FieldId::EmailAddress, FieldId::PhoneNumber]
            .iter()
            .all(|id| self.errors(*id).is_empty())
    }

    fn value(&self) -> PersonalDetailsValue {
        let phone = self.phone_number.as_text();
        PersonalDetailsValue {
            full_name: self.full_name.value.clone(),
            email_address: self.email_address.value.clone(),
            phone_number: (!phone.is_empty()).then(|| phone.to_string()),
        }
    }

    fn reset(&mut self) {
        self.full_name.reset();
        self.email_address.reset();
        self.phone_number.reset();
    }
}

/// Invoice number, amount and date
#[derive(Debug, Clone)]
pub struct InvoiceDetailsGroup {
    pub invoice_number: FormField,
    pub amount: FormField,
    pub invoice_date: FormField,
}

impl InvoiceDetailsGroup {
    fn new() -> Self {
        Self {
            invoice_number: FormField::new(FieldId::InvoiceNumber),
            amount: FormField::new(FieldId::Amount),
            invoice_date: FormField::new(FieldId::InvoiceDate),
        }
    }

    fn errors(&self, id: FieldId, now: NaiveDateTime) -> Vec<ValidationError> {
        match id {
            FieldId::InvoiceNumber => {
                let v = self.invoice_number.as_text();
                collect([
                    validators::required(v),
                    validators::alphanumeric(v),
                    validators::min_length(v, 4),
                    validators::max_length(v, 15),
                ])
            }
            FieldId::Amount => {
                let v = self.amount.as_text();
                collect([
                    validators::required(v),
                    validators::positive_number(v),
                    validators::min_amount(v, MIN_AMOUNT),
                ])
            }
            FieldId::InvoiceDate => {
                let v = self.invoice_date.as_text();
                collect([
                    validators::required(v),
                    validators::not_future_date(v, now),
                ])
            }
            _ => Vec::new(),
        }
    }

    pub fn is_valid_at(&self, now: NaiveDateTime) -> bool {
        [FieldId::InvoiceNumber, FieldId::Amount, FieldId::InvoiceDate]
            .iter()
            .all(|id| self.errors(*id, now).is_empty())
    }

    fn value(&self) -> InvoiceDetailsValue {
        InvoiceDetailsValue {
            invoice_number: self.invoice_number.value.clone(),
            amount: self.amount.value.clone(),
            invoice_date: self.invoice_date.value.clone(),
        }
    }

    fn reset(&mut self) {
        self.invoice_number.reset();
        self.amount.reset();
        self.invoice_date.reset();
    }
}

/// The signature value owned by the form
#[derive(Debug, Clone, Default)]
pub struct SignatureControl {
    pub value: Option<String>,
    pub touched: bool,
    pub dirty: bool,
}

impl SignatureControl {
    fn errors(&self) -> Vec<ValidationError> {
        match self.value.as_deref() {
            Some(v) if !v.is_empty() => Vec::new(),
            _ => vec![ValidationError::SignatureRequired],
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

fn collect<const N: usize>(results: [Option<ValidationError>; N]) -> Vec<ValidationError> {
    results.into_iter().flatten().collect()
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// The invoice form: three validated groups republished as one value.
///
/// Value changes are published after 300ms of quiet and only when the value
/// differs from the previous publication. Validity is published on every
/// change in which it differs from the previous publication.
#[derive(Debug, Clone)]
pub struct InvoiceForm {
    pub personal_details: PersonalDetailsGroup,
    pub invoice_details: InvoiceDetailsGroup,
    pub signature: SignatureControl,
    value_changes: Debouncer<FormValue>,
    validity: Distinct<bool>,
    events: Vec<FormEvent>,
}

impl InvoiceForm {
    pub fn new() -> Self {
        Self {
            personal_details: PersonalDetailsGroup::new(),
            invoice_details: InvoiceDetailsGroup::new(),
            signature: SignatureControl::default(),
            value_changes: Debouncer::new(FORM_DEBOUNCE),
            validity: Distinct::default(),
            events: Vec::new(),
        }
    }

    pub fn field(&self, id: FieldId) -> Option<&FormField> {
        match id {
            FieldId::FullName => Some(&self.personal_details.full_name),
            FieldId::EmailAddress => Some(&self.personal_details.email_address),
            FieldId::PhoneNumber => Some(&self.personal_details.phone_number),
            FieldId::InvoiceNumber => Some(&self.invoice_details.invoice_number),
            FieldId::Amount => Some(&self.invoice_details.amount),
            FieldId::InvoiceDate => Some(&self.invoice_details.invoice_date),
            FieldId::Signature => None,
        }
    }

    fn field_mut(&mut self, id: FieldId) -> Option<&mut FormField> {
        match id {
            FieldId::FullName => Some(&mut self.personal_details.full_name),
            FieldId::EmailAddress => Some(&mut self.personal_details.email_address),
            FieldId::PhoneNumber => Some(&mut self.personal_details.phone_number),
            FieldId::InvoiceNumber => Some(&mut self.invoice_details.invoice_number),
            FieldId::Amount => Some(&mut self.invoice_details.amount),
            FieldId::InvoiceDate => Some(&mut self.invoice_details.invoice_date),
            FieldId::Signature => None,
        }
    }

    /// Replace a text field's value
    #[cfg(test)]
    pub fn set_value(&mut self, id: FieldId, value: impl Into<String>, now: Instant) {
        let value = value.into();
        let changed = match self.field_mut(id) {
            Some(field) if field.value != value => {
                field.set_text(value);
                true
            }
            _ => false,
        };
        if changed {
            self.on_change(now);
        }
    }

    /// Append a typed character to a text field
    pub fn input_char(&mut self, id: FieldId, c: char, now: Instant) {
        if self.field_mut(id).is_some_and(|f| f.push_char(c)) {
            self.on_change(now);
        }
    }

    /// Delete the last character of a text field
    pub fn backspace(&mut self, id: FieldId, now: Instant) {
        if self.field_mut(id).is_some_and(|f| f.pop_char()) {
            self.on_change(now);
        }
    }

    /// Store the serialized signature (None when the pad is blank)
    pub fn set_signature(&mut self, value: Option<String>, now: Instant) {
        self.signature.touched = true;
        if self.signature.value != value {
            self.signature.value = value;
            self.signature.dirty = true;
            self.on_change(now);
        }
    }

    pub fn mark_touched(&mut self, id: FieldId) {
        match self.field_mut(id) {
            Some(field) => field.mark_touched(),
            None => self.signature.touched = true,
        }
    }

    /// Active errors of a field, validated against the current local time
    pub fn errors(&self, id: FieldId) -> Vec<ValidationError> {
        self.errors_at(id, local_now())
    }

    pub fn errors_at(&self, id: FieldId, now: NaiveDateTime) -> Vec<ValidationError> {
        match id {
            FieldId::FullName | FieldId::EmailAddress | FieldId::PhoneNumber => {
                self.personal_details.errors(id)
            }
            FieldId::InvoiceNumber | FieldId::Amount | FieldId::InvoiceDate => {
                self.invoice_details.errors(id, now)
            }
            FieldId::Signature => self.signature.errors(),
        }
    }

    /// Message to display under a field, once the user has interacted with it
    pub fn visible_error(&self, id: FieldId) -> Option<String> {
        let interacted = match self.field(id) {
            Some(field) => field.is_interacted(),
            None => self.signature.touched || self.signature.dirty,
        };
        if !interacted {
            return None;
        }
        validators::error_message(id.label(), &self.errors(id))
    }

    pub fn is_valid(&self) -> bool {
        let now = local_now();
        self.personal_details.is_valid()
            && self.invoice_details.is_valid_at(now)
            && self.signature.errors().is_empty()
    }

    /// Current aggregate value
    pub fn value(&self) -> FormValue {
        FormValue {
            personal_details: self.personal_details.value(),
            invoice_details: self.invoice_details.value(),
            signature: self.signature.value.clone(),
        }
    }

    fn on_change(&mut self, now: Instant) {
        let value = self.value();
        self.value_changes.push(value, now);
        let valid = self.is_valid();
        if let Some(valid) = self.validity.next(valid) {
            self.events.push(FormEvent::ValidityChanged(valid));
        }
    }

    /// Publish the debounced value if its quiet period has elapsed
    pub fn poll(&mut self, now: Instant) {
        if let Some(value) = self.value_changes.poll(now) {
            tracing::debug!("Form value published");
            self.events.push(FormEvent::ValueChanged(value));
        }
    }

    /// How long the caller may sleep before the next `poll` is useful
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        self.value_changes.time_until_due(now)
    }

    /// Drain published events in order
    pub fn take_events(&mut self) -> Vec<FormEvent> {
        std::mem::take(&mut self.events)
    }

    /// Clear every field back to pristine and publish the empty value and
    /// `false` immediately.
    pub fn reset(&mut self) {
        self.personal_details.reset();
        self.invoice_details.reset();
        self.signature.reset();

        let empty = FormValue::default();
        self.value_changes.reset_to(empty.clone());
        self.validity.set(false);
        self.events.push(FormEvent::ValueChanged(empty));
        self.events.push(FormEvent::ValidityChanged(false));
    }
}

impl Default for InvoiceForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNATURE: &str = "data:image/png;base64,iVBORw0KGgo=";

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn today() -> String {
        Local::now().date_naive().to_string()
    }

    fn filled_form(now: Instant) -> InvoiceForm {
        let mut form = InvoiceForm::new();
        form.set_value(FieldId::FullName, "Jane Doe", now);
        form.set_value(FieldId::EmailAddress, "jane@example.com", now);
        form.set_value(FieldId::InvoiceNumber, "INV2024", now);
        form.set_value(FieldId::Amount, "125.50", now);
        form.set_value(FieldId::InvoiceDate, today(), now);
        form.set_signature(Some(SIGNATURE.to_string()), now);
        form
    }

    mod validity {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_new_form_is_invalid() {
            let form = InvoiceForm::new();
            assert!(!form.is_valid());
        }

        #[test]
        fn test_filled_form_is_valid() {
            let form = filled_form(Instant::now());
            assert!(form.is_valid());
        }

        #[test]
        fn test_missing_signature_is_invalid() {
            let now = Instant::now();
            let mut form = filled_form(now);
            form.set_signature(None, now);
            assert!(!form.is_valid());
            assert_eq!(
                form.errors(FieldId::Signature),
                vec![ValidationError::SignatureRequired]
            );
        }

        #[test]
        fn test_optional_phone_must_match_when_present() {
            let now = Instant::now();
            let mut form = filled_form(now);
            form.set_value(FieldId::PhoneNumber, "12", now);
            assert!(!form.is_valid());
            form.set_value(FieldId::PhoneNumber, "+1 555 123 4567", now);
            assert!(form.is_valid());
        }

        #[test]
        fn test_validity_events_are_distinct() {
            let now = Instant::now();
            let mut form = InvoiceForm::new();
            form.input_char(FieldId::FullName, 'J', now);
            form.input_char(FieldId::FullName, 'a', now);
            assert_eq!(form.take_events(), vec![FormEvent::ValidityChanged(false)]);

            let mut form = filled_form(now);
            let events = form.take_events();
            assert_eq!(
                events,
                vec![
                    FormEvent::ValidityChanged(false),
                    FormEvent::ValidityChanged(true)
                ]
            );
            form.input_char(FieldId::FullName, 'e', now);
            assert!(form.take_events().is_empty());
        }
    }

    mod publication {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_value_is_debounced() {
            let start = Instant::now();
            let mut form = InvoiceForm::new();
            for (i, c) in "Jane".chars().enumerate() {
                let t = start + ms(i as u64 * 50);
                form.input_char(FieldId::FullName, c, t);
                form.poll(t);
            }
            let values: Vec<_> = form
                .take_events()
                .into_iter()
                .filter(|e| matches!(e, FormEvent::ValueChanged(_)))
                .collect();
            assert!(values.is_empty());

            form.poll(start + ms(150 + 300));
            let events = form.take_events();
            assert_eq!(events.len(), 1);
            match &events[0] {
                FormEvent::ValueChanged(value) => {
                    assert_eq!(value.personal_details.full_name, "Jane")
                }
                other => panic!("unexpected event {other:?}"),
            }
        }

        #[test]
        fn test_rapid_signature_updates_emit_once() {
            let start = Instant::now();
            let mut form = InvoiceForm::new();
            for i in 0..20u64 {
                form.set_signature(Some(format!("{SIGNATURE}{i}")), start + ms(i * 10));
            }
            form.take_events();
            form.poll(start + ms(190 + 300));
            let events = form.take_events();
            assert_eq!(events.len(), 1);
            assert!(matches!(
                &events[0],
                FormEvent::ValueChanged(v) if v.signature.as_deref() == Some("data:image/png;base64,iVBORw0KGgo=19")
            ));
        }

        #[test]
        fn test_unchanged_value_is_not_republished() {
            let start = Instant::now();
            let mut form = InvoiceForm::new();
            form.input_char(FieldId::Amount, '5', start);
            form.poll(start + ms(300));
            form.take_events();

            form.input_char(FieldId::Amount, '0', start + ms(400));
            form.backspace(FieldId::Amount, start + ms(450));
            form.poll(start + ms(800));
            assert!(form
                .take_events()
                .iter()
                .all(|e| !matches!(e, FormEvent::ValueChanged(_))));
        }

        #[test]
        fn test_empty_phone_is_omitted() {
            let form = filled_form(Instant::now());
            let json = serde_json::to_value(form.value()).unwrap();
            assert!(json["personalDetails"].get("phoneNumber").is_none());
            assert_eq!(json["invoiceDetails"]["invoiceNumber"], "INV2024");
        }
    }

    mod reset {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_reset_emits_empty_and_invalid() {
            let now = Instant::now();
            let mut form = filled_form(now);
            form.take_events();
            form.reset();
            assert_eq!(
                form.take_events(),
                vec![
                    FormEvent::ValueChanged(FormValue::default()),
                    FormEvent::ValidityChanged(false)
                ]
            );
            assert_eq!(form.value(), FormValue::default());
            assert!(!form.personal_details.full_name.touched);
            assert!(!form.personal_details.full_name.dirty);
        }

        #[test]
        fn test_reset_is_idempotent() {
            let mut form = filled_form(Instant::now());
            form.take_events();
            form.reset();
            let first = form.take_events();
            form.reset();
            let second = form.take_events();
            assert_eq!(first, second);
        }

        #[test]
        fn test_reset_cancels_pending_publication() {
            let now = Instant::now();
            let mut form = filled_form(now);
            form.reset();
            form.take_events();
            form.poll(now + ms(1000));
            assert!(form.take_events().is_empty());
        }
    }

    mod messages {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_errors_hidden_until_interaction() {
            let mut form = InvoiceForm::new();
            assert_eq!(form.visible_error(FieldId::FullName), None);
            form.mark_touched(FieldId::FullName);
            assert_eq!(
                form.visible_error(FieldId::FullName).as_deref(),
                Some("Full Name is required")
            );
        }

        #[test]
        fn test_signature_message() {
            let mut form = InvoiceForm::new();
            form.mark_touched(FieldId::Signature);
            assert_eq!(
                form.visible_error(FieldId::Signature).as_deref(),
                Some("Signature is required")
            );
        }

        #[test]
        fn test_invoice_number_length_message() {
            let now = Instant::now();
            let mut form = InvoiceForm::new();
            form.set_value(FieldId::InvoiceNumber, "AB1", now);
            assert_eq!(
                form.visible_error(FieldId::InvoiceNumber).as_deref(),
                Some("Minimum length is 4 characters")
            );
        }
    }
}
