use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::dom::Dom;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s()\-]{10,}$").expect("phone pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    Select,
}

/// Constraints read from a field's markup. Never cached: markup edits apply
/// on the next validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRules {
    pub required: bool,
    pub kind: FieldKind,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

/// Display text is the message shown next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Please fill this field")]
    Required,
    #[error("Please select an option")]
    SelectRequired,
    #[error("Please enter a valid email (e.g., name@company.com)")]
    Email,
    #[error("Please enter a valid phone number (10+ digits)")]
    Phone,
    #[error("Please enter at least {0} characters")]
    TooShort(usize),
    #[error("Please keep it under {0} characters")]
    TooLong(usize),
}

impl FieldRules {
    pub fn read<D: Dom>(dom: &D, field: &D::Node) -> Self {
        let kind = if dom.tag_name(field) == "select" {
            FieldKind::Select
        } else {
            let declared = dom
                .attribute(field, "type")
                .or_else(|| dom.attribute(field, "data-type"))
                .unwrap_or_default();
            match declared.to_ascii_lowercase().as_str() {
                "email" => FieldKind::Email,
                "tel" | "phone" => FieldKind::Phone,
                _ => FieldKind::Text,
            }
        };
        Self {
            required: dom.has_attribute(field, "required"),
            kind,
            min_length: dom.attribute(field, "minlength").as_deref().and_then(parse_length),
            max_length: dom.attribute(field, "maxlength").as_deref().and_then(parse_length),
        }
    }

    /// First violated rule for an already trimmed value.
    pub fn check(&self, value: &str) -> Option<FieldError> {
        if value.is_empty() {
            return match (self.required, self.kind) {
                (false, _) => None,
                (true, FieldKind::Select) => Some(FieldError::SelectRequired),
                (true, _) => Some(FieldError::Required),
            };
        }
        match self.kind {
            FieldKind::Email if !EMAIL.is_match(value) => return Some(FieldError::Email),
            FieldKind::Phone if !PHONE.is_match(value) => return Some(FieldError::Phone),
            _ => {}
        }
        // Browsers measure value length in UTF-16 code units.
        let length = value.encode_utf16().count();
        if let Some(min) = self.min_length.filter(|min| length < *min) {
            return Some(FieldError::TooShort(min));
        }
        if let Some(max) = self.max_length.filter(|max| length > *max) {
            return Some(FieldError::TooLong(max));
        }
        None
    }
}

/// Leading decimal digits of `raw`; zero or nothing means "no limit".
fn parse_length(raw: &str) -> Option<usize> {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok().filter(|n| *n > 0)
}
