//! Form field value objects

use serde::{Deserialize, Serialize};

/// Identifies one input of the invoice form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    FullName,
    EmailAddress,
    PhoneNumber,
    InvoiceNumber,
    Amount,
    InvoiceDate,
    Signature,
}

impl FieldId {
    /// Text inputs in focus order
    pub const TEXT_FIELDS: [FieldId; 6] = [
        FieldId::FullName,
        FieldId::EmailAddress,
        FieldId::PhoneNumber,
        FieldId::InvoiceNumber,
        FieldId::Amount,
        FieldId::InvoiceDate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullName => "Full Name",
            Self::EmailAddress => "Email Address",
            Self::PhoneNumber => "Phone Number",
            Self::InvoiceNumber => "Invoice Number",
            Self::Amount => "Amount",
            Self::InvoiceDate => "Invoice Date",
            Self::Signature => "Signature",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Self::FullName => "Jane Doe",
            Self::EmailAddress => "jane@example.com",
            Self::PhoneNumber => "(optional)",
            Self::InvoiceNumber => "INV2024001",
            Self::Amount => "0.00",
            Self::InvoiceDate => "YYYY-MM-DD",
            Self::Signature => "Sign with your mouse",
        }
    }

    /// Characters accepted from the keyboard for this field
    pub fn accepts(&self, c: char) -> bool {
        match self {
            Self::Amount => c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'),
            Self::InvoiceDate => c.is_ascii_digit() || matches!(c, '-' | ':' | 'T' | 'Z' | '+'),
            Self::Signature => false,
            _ => !c.is_control(),
        }
    }
}

/// A single text input with its interaction state
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    pub id: FieldId,
    pub value: String,
    /// Focus has left the field at least once
    pub touched: bool,
    /// The value has been edited
    pub dirty: bool,
}

impl FormField {
    pub fn new(id: FieldId) -> Self {
        Self {
            id,
            value: String::new(),
            touched: false,
            dirty: false,
        }
    }

    pub fn label(&self) -> &'static str {
        self.id.label()
    }

    pub fn as_text(&self) -> &str {
        &self.value
    }

    #[cfg(test)]
    pub fn set_text(&mut self, value: String) {
        if self.value != value {
            self.value = value;
            self.dirty = true;
        }
    }

    /// Push a character to the field value. Returns false if rejected.
    pub fn push_char(&mut self, c: char) -> bool {
        if !self.id.accepts(c) {
            return false;
        }
        self.value.push(c);
        self.dirty = true;
        true
    }

    /// Remove the last character. Returns false if the field was empty.
    pub fn pop_char(&mut self) -> bool {
        let popped = self.value.pop().is_some();
        if popped {
            self.dirty = true;
        }
        popped
    }

    pub fn mark_touched(&mut self) {
        self.touched = true;
    }

    /// Back to empty, untouched and pristine
    pub fn reset(&mut self) {
        self.value.clear();
        self.touched = false;
        self.dirty = false;
    }

    pub fn is_interacted(&self) -> bool {
        self.touched || self.dirty
    }

    /// Value or empty-state text for rendering
    pub fn display_value(&self, is_active: bool) -> String {
        if self.value.is_empty() && !is_active {
            self.id.placeholder().to_string()
        } else {
            self.value.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_pristine() {
        let field = FormField::new(FieldId::FullName);
        assert_eq!(field.as_text(), "");
        assert!(!field.touched);
        assert!(!field.dirty);
        assert_eq!(field.label(), "Full Name");
    }

    #[test]
    fn test_push_and_pop_mark_dirty() {
        let mut field = FormField::new(FieldId::FullName);
        assert!(field.push_char('J'));
        assert!(field.dirty);
        assert!(field.pop_char());
        assert!(!field.pop_char());
        assert_eq!(field.as_text(), "");
    }

    #[test]
    fn test_amount_rejects_letters() {
        let mut field = FormField::new(FieldId::Amount);
        assert!(!field.push_char('x'));
        assert!(field.push_char('1'));
        assert!(field.push_char('.'));
        assert!(field.push_char('5'));
        assert_eq!(field.as_text(), "1.5");
    }

    #[test]
    fn test_set_same_text_stays_pristine() {
        let mut field = FormField::new(FieldId::InvoiceNumber);
        field.set_text(String::new());
        assert!(!field.dirty);
        field.set_text("AB12".to_string());
        assert!(field.dirty);
    }

    #[test]
    fn test_reset_clears_flags() {
        let mut field = FormField::new(FieldId::EmailAddress);
        field.push_char('a');
        field.mark_touched();
        field.reset();
        assert_eq!(field, FormField::new(FieldId::EmailAddress));
    }

    #[test]
    fn test_display_value_placeholder() {
        let field = FormField::new(FieldId::InvoiceDate);
        assert_eq!(field.display_value(false), "YYYY-MM-DD");
        assert_eq!(field.display_value(true), "");
    }
}
