//! Field validators and error messages for the invoice form

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Smallest accepted invoice amount
pub const MIN_AMOUNT: f64 = 0.01;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s\-()]{7,}$").expect("valid phone regex"));

static ALPHANUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("valid alphanumeric regex"));

static EMAIL_LOCAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*$")
        .expect("valid email local-part regex")
});

static EMAIL_DOMAIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid email domain regex")
});

/// Leading numeric prefix, the way a lenient float parser reads "12.5kg"
static NUMBER_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid number regex")
});

/// Why a field failed validation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ValidationError {
    Required,
    Email,
    Pattern,
    Min,
    InvalidPhoneNumber,
    InvalidAlphanumeric,
    NotPositive,
    #[serde(rename_all = "camelCase")]
    MinAmount {
        required_min: f64,
        actual_value: f64,
    },
    FutureDate,
    SignatureRequired,
    #[serde(rename = "minlength", rename_all = "camelCase")]
    MinLength { required_length: usize },
    #[serde(rename = "maxlength", rename_all = "camelCase")]
    MaxLength { required_length: usize },
}

impl ValidationError {
    /// Symbolic tag of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Email => "email",
            Self::Pattern => "pattern",
            Self::Min => "min",
            Self::InvalidPhoneNumber => "invalidPhoneNumber",
            Self::InvalidAlphanumeric => "invalidAlphanumeric",
            Self::NotPositive => "notPositive",
            Self::MinAmount { .. } => "minAmount",
            Self::FutureDate => "futureDate",
            Self::SignatureRequired => "signatureRequired",
            Self::MinLength { .. } => "minlength",
            Self::MaxLength { .. } => "maxlength",
        }
    }

    /// Display precedence: lower ranks win when a field has several errors
    fn rank(&self) -> u8 {
        match self {
            Self::Required => 0,
            Self::Email
            | Self::Pattern
            | Self::Min
            | Self::InvalidPhoneNumber
            | Self::InvalidAlphanumeric
            | Self::NotPositive
            | Self::MinAmount { .. }
            | Self::FutureDate
            | Self::SignatureRequired => 1,
            Self::MinLength { .. } | Self::MaxLength { .. } => 2,
        }
    }

    /// Human-readable message for a field labelled `label`
    pub fn message(&self, label: &str) -> String {
        match self {
            Self::Required => format!("{label} is required"),
            Self::Email => "Invalid email format".to_string(),
            Self::Pattern => "Invalid format".to_string(),
            Self::Min => "Value must be greater than 0".to_string(),
            Self::InvalidPhoneNumber => "Invalid phone number format".to_string(),
            Self::InvalidAlphanumeric => "Only letters and numbers are allowed".to_string(),
            Self::NotPositive => "Amount must be greater than zero".to_string(),
            Self::MinAmount { required_min, .. } => format!("Minimum amount is ${required_min}"),
            Self::FutureDate => "Date cannot be in the future".to_string(),
            Self::SignatureRequired => "Signature is required".to_string(),
            Self::MinLength { required_length } => {
                format!("Minimum length is {required_length} characters")
            }
            Self::MaxLength { required_length } => {
                format!("Maximum length is {required_length} characters")
            }
        }
    }
}

/// Pick the message to show for a field with the given active errors.
///
/// Returns `None` when the field has no errors. Order among errors of the
/// same rank follows validator order.
pub fn error_message(label: &str, errors: &[ValidationError]) -> Option<String> {
    errors.iter().min_by_key(|e| e.rank()).map(|e| e.message(label))
}

fn is_blank(value: &str) -> bool {
    value.is_empty()
}

pub fn required(value: &str) -> Option<ValidationError> {
    is_blank(value).then_some(ValidationError::Required)
}

pub fn min_length(value: &str, min: usize) -> Option<ValidationError> {
    let len = value.chars().count();
    (!is_blank(value) && len < min).then_some(ValidationError::MinLength {
        required_length: min,
    })
}

pub fn max_length(value: &str, max: usize) -> Option<ValidationError> {
    (value.chars().count() > max).then_some(ValidationError::MaxLength {
        required_length: max,
    })
}

/// Email syntax check (local@domain, 254 chars overall, 64 chars local part)
pub fn email(value: &str) -> Option<ValidationError> {
    if is_blank(value) {
        return None;
    }
    let valid = value.len() <= 254
        && value.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && local.len() <= 64
                && EMAIL_LOCAL_RE.is_match(local)
                && EMAIL_DOMAIN_RE.is_match(domain)
        });
    (!valid).then_some(ValidationError::Email)
}

pub fn phone_number(value: &str) -> Option<ValidationError> {
    if is_blank(value) {
        return None;
    }
    (!PHONE_RE.is_match(value.trim())).then_some(ValidationError::InvalidPhoneNumber)
}

pub fn alphanumeric(value: &str) -> Option<ValidationError> {
    if is_blank(value) {
        return None;
    }
    (!ALPHANUMERIC_RE.is_match(value.trim())).then_some(ValidationError::InvalidAlphanumeric)
}

/// Parse the leading number of `value`, ignoring leading whitespace and any
/// trailing garbage. Returns `None` when there is no leading number.
pub fn parse_leading_number(value: &str) -> Option<f64> {
    let trimmed = value.trim_start();
    NUMBER_PREFIX_RE
        .find(trimmed)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

pub fn positive_number(value: &str) -> Option<ValidationError> {
    if is_blank(value) {
        return None;
    }
    match parse_leading_number(value) {
        Some(n) if n > 0.0 => None,
        _ => Some(ValidationError::NotPositive),
    }
}

pub fn min_amount(value: &str, min: f64) -> Option<ValidationError> {
    if is_blank(value) {
        return None;
    }
    let num = parse_leading_number(value).unwrap_or(f64::NAN);
    if num >= min {
        None
    } else {
        Some(ValidationError::MinAmount {
            required_min: min,
            actual_value: num,
        })
    }
}

/// Parse an invoice date given as `YYYY-MM-DD` or an RFC 3339 timestamp.
/// Timestamps are converted to local time.
pub fn parse_invoice_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Local).naive_local())
}

/// Reject dates after the end of the day containing `now`
pub fn not_future_date(value: &str, now: NaiveDateTime) -> Option<ValidationError> {
    if is_blank(value) {
        return None;
    }
    let Some(selected) = parse_invoice_date(value) else {
        return Some(ValidationError::Pattern);
    };
    let end_of_today = now
        .date()
        .and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or(now);
    (selected > end_of_today).then_some(ValidationError::FutureDate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn amount_errors(value: &str) -> Vec<ValidationError> {
        [
            required(value),
            positive_number(value),
            min_amount(value, MIN_AMOUNT),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn invoice_number_errors(value: &str) -> Vec<ValidationError> {
        [
            required(value),
            alphanumeric(value),
            min_length(value, 4),
            max_length(value, 15),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    mod amount {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_zero_is_not_positive() {
            let errors = amount_errors("0");
            assert!(errors.contains(&ValidationError::NotPositive));
        }

        #[test]
        fn test_negative_is_not_positive() {
            let errors = amount_errors("-5");
            assert!(errors.contains(&ValidationError::NotPositive));
        }

        #[test]
        fn test_non_numeric_is_not_positive() {
            let errors = amount_errors("abc");
            assert!(errors.contains(&ValidationError::NotPositive));
            assert!(errors
                .iter()
                .any(|e| matches!(e, ValidationError::MinAmount { actual_value, .. } if actual_value.is_nan())));
        }

        #[test]
        fn test_below_minimum_is_only_min_amount() {
            let errors = amount_errors("0.005");
            assert_eq!(
                errors,
                vec![ValidationError::MinAmount {
                    required_min: 0.01,
                    actual_value: 0.005
                }]
            );
        }

        #[test]
        fn test_minimum_and_above_are_valid() {
            assert!(amount_errors("0.01").is_empty());
            assert!(amount_errors("10").is_empty());
        }

        #[test]
        fn test_empty_amount_is_only_required() {
            assert_eq!(amount_errors(""), vec![ValidationError::Required]);
        }

        #[test]
        fn test_leading_number_parse() {
            assert_eq!(parse_leading_number("  12.5kg"), Some(12.5));
            assert_eq!(parse_leading_number(".5"), Some(0.5));
            assert_eq!(parse_leading_number("1e2"), Some(100.0));
            assert_eq!(parse_leading_number("abc"), None);
        }
    }

    mod invoice_date {
        use super::*;
        use pretty_assertions::assert_eq;

        fn now() -> NaiveDateTime {
            NaiveDate::from_ymd_opt(2024, 6, 15)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap()
        }

        #[test]
        fn test_today_is_valid() {
            assert_eq!(not_future_date("2024-06-15", now()), None);
        }

        #[test]
        fn test_yesterday_is_valid() {
            assert_eq!(not_future_date("2024-06-14", now()), None);
        }

        #[test]
        fn test_tomorrow_is_future() {
            assert_eq!(
                not_future_date("2024-06-16", now()),
                Some(ValidationError::FutureDate)
            );
        }

        #[test]
        fn test_late_today_timestamp_is_valid() {
            let late = now().date().and_hms_opt(23, 59, 0).unwrap();
            let value = late
                .and_local_timezone(Local)
                .single()
                .map(|dt| dt.to_rfc3339())
                .unwrap();
            assert_eq!(not_future_date(&value, now()), None);
        }

        #[test]
        fn test_relative_to_real_clock() {
            let now = Local::now().naive_local();
            let today = now.date();
            let tomorrow = today + Duration::days(1);
            assert_eq!(not_future_date(&today.to_string(), now), None);
            assert_eq!(
                not_future_date(&tomorrow.to_string(), now),
                Some(ValidationError::FutureDate)
            );
        }

        #[test]
        fn test_unparseable_is_pattern() {
            assert_eq!(
                not_future_date("15th of June", now()),
                Some(ValidationError::Pattern)
            );
        }
    }

    mod invoice_number {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_four_alphanumeric_chars_is_valid() {
            assert!(invoice_number_errors("AB12").is_empty());
        }

        #[test]
        fn test_three_chars_is_minlength() {
            assert_eq!(
                invoice_number_errors("AB1"),
                vec![ValidationError::MinLength { required_length: 4 }]
            );
        }

        #[test]
        fn test_dash_is_invalid_alphanumeric() {
            assert_eq!(
                invoice_number_errors("AB-12"),
                vec![ValidationError::InvalidAlphanumeric]
            );
        }

        #[test]
        fn test_sixteen_chars_is_maxlength() {
            assert_eq!(
                invoice_number_errors("ABCDEFGHIJ123456"),
                vec![ValidationError::MaxLength {
                    required_length: 15
                }]
            );
        }
    }

    mod contact {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_email_syntax() {
            assert_eq!(email("jane.doe@example.com"), None);
            assert_eq!(email("jane@localhost"), None);
            assert_eq!(email("jane"), Some(ValidationError::Email));
            assert_eq!(email("jane@"), Some(ValidationError::Email));
            assert_eq!(email("@example.com"), Some(ValidationError::Email));
            assert_eq!(email("jane doe@example.com"), Some(ValidationError::Email));
        }

        #[test]
        fn test_phone_pattern() {
            assert_eq!(phone_number(""), None);
            assert_eq!(phone_number("+1 (555) 123-4567"), None);
            assert_eq!(phone_number("  5551234  "), None);
            assert_eq!(
                phone_number("555-12"),
                Some(ValidationError::InvalidPhoneNumber)
            );
            assert_eq!(
                phone_number("call me maybe"),
                Some(ValidationError::InvalidPhoneNumber)
            );
        }

        #[test]
        fn test_length_counts_characters() {
            assert_eq!(min_length("Zoë", 2), None);
            assert_eq!(
                min_length("Z", 2),
                Some(ValidationError::MinLength { required_length: 2 })
            );
            assert_eq!(min_length("", 2), None);
        }
    }

    mod messages {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_no_errors_no_message() {
            assert_eq!(error_message("Amount", &[]), None);
        }

        #[test]
        fn test_required_wins() {
            let errors = [
                ValidationError::MinLength { required_length: 2 },
                ValidationError::Required,
            ];
            assert_eq!(
                error_message("Full Name", &errors).as_deref(),
                Some("Full Name is required")
            );
        }

        #[test]
        fn test_domain_beats_length() {
            let errors = [
                ValidationError::MinLength { required_length: 4 },
                ValidationError::InvalidAlphanumeric,
            ];
            assert_eq!(
                error_message("Invoice Number", &errors).as_deref(),
                Some("Only letters and numbers are allowed")
            );
        }

        #[test]
        fn test_not_positive_before_min_amount() {
            let errors = amount_errors("0");
            assert_eq!(
                error_message("Amount", &errors).as_deref(),
                Some("Amount must be greater than zero")
            );
        }

        #[test]
        fn test_min_amount_message() {
            let errors = amount_errors("0.005");
            assert_eq!(
                error_message("Amount", &errors).as_deref(),
                Some("Minimum amount is $0.01")
            );
        }

        #[test]
        fn test_length_messages() {
            assert_eq!(
                ValidationError::MaxLength {
                    required_length: 100
                }
                .message("Full Name"),
                "Maximum length is 100 characters"
            );
        }

        #[test]
        fn test_kind_tags_serialize() {
            let json = serde_json::to_value(ValidationError::MinLength { required_length: 4 })
                .unwrap();
            assert_eq!(json["kind"], "minlength");
            assert_eq!(json["requiredLength"], 4);
            assert_eq!(ValidationError::MinLength { required_length: 4 }.kind(), "minlength");
        }
    }
}
