//! Synchronous per-field form validation.
//!
//! Validators run on every change for touched fields and on submit for all
//! fields. Submission is blocked unless every validator passes; a partial
//! failure keeps the valid field values and reports errors per field.
//! Validators return structured errors; translating them into display
//! text is the page layer's job.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-empty check only.
    Text,
    /// Non-empty plus email-shape check.
    Email,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    InvalidEmail,
}

/// Validate a single value against its field kind.
pub fn validate(kind: FieldKind, value: &str) -> Option<FieldError> {
    if value.trim().is_empty() {
        return Some(FieldError::Required);
    }
    match kind {
        FieldKind::Text => None,
        FieldKind::Email => {
            if EMAIL_RE.is_match(value.trim()) {
                None
            } else {
                Some(FieldError::InvalidEmail)
            }
        }
    }
}

#[derive(Debug, Clone)]
struct Field {
    kind: FieldKind,
    value: String,
    touched: bool,
    error: Option<FieldError>,
}

/// Validation state for one dynamic form.
#[derive(Debug)]
pub struct DynamicForm {
    fields: BTreeMap<&'static str, Field>,
    submitted: bool,
}

impl DynamicForm {
    pub fn new(fields: &[(&'static str, FieldKind)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(name, kind)| {
                    (
                        *name,
                        Field {
                            kind: *kind,
                            value: String::new(),
                            touched: false,
                            error: None,
                        },
                    )
                })
                .collect(),
            submitted: false,
        }
    }

    /// Record a keystroke. Marks the field touched and revalidates it.
    pub fn set_value(&mut self, name: &str, value: &str) {
        if let Some(field) = self.fields.get_mut(name) {
            field.value = value.to_string();
            field.touched = true;
            field.error = validate(field.kind, &field.value);
        }
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|f| f.value.as_str())
    }

    pub fn error(&self, name: &str) -> Option<FieldError> {
        self.fields.get(name).and_then(|f| f.error)
    }

    pub fn touched(&self, name: &str) -> bool {
        self.fields.get(name).map(|f| f.touched).unwrap_or(false)
    }

    /// Validate all fields. Transitions to submitted only when every
    /// validator passes; otherwise field errors are left in place and
    /// valid values are preserved.
    pub fn submit(&mut self) -> bool {
        let mut ok = true;
        for field in self.fields.values_mut() {
            field.touched = true;
            field.error = validate(field.kind, &field.value);
            ok &= field.error.is_none();
        }
        if ok {
            self.submitted = true;
        }
        ok
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Field names with a current validation error.
    pub fn errors(&self) -> Vec<(&'static str, FieldError)> {
        self.fields
            .iter()
            .filter_map(|(name, f)| f.error.map(|e| (*name, e)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> DynamicForm {
        DynamicForm::new(&[("name", FieldKind::Text), ("email", FieldKind::Email)])
    }

    #[test]
    fn email_shape_is_enforced() {
        assert_eq!(validate(FieldKind::Email, ""), Some(FieldError::Required));
        assert_eq!(
            validate(FieldKind::Email, "not-an-email"),
            Some(FieldError::InvalidEmail)
        );
        assert_eq!(validate(FieldKind::Email, "a b@c.d"), Some(FieldError::InvalidEmail));
        assert_eq!(validate(FieldKind::Email, "qa@qa-sandbox.com"), None);
    }

    #[test]
    fn untouched_fields_show_no_error_until_submit() {
        let mut f = form();
        assert_eq!(f.error("email"), None);

        assert!(!f.submit());
        assert_eq!(f.error("email"), Some(FieldError::Required));
        assert_eq!(f.error("name"), Some(FieldError::Required));
        assert!(!f.is_submitted());
    }

    #[test]
    fn keystroke_revalidates_touched_field() {
        let mut f = form();
        f.set_value("email", "not-an-email");
        assert_eq!(f.error("email"), Some(FieldError::InvalidEmail));
        f.set_value("email", "qa@qa-sandbox.com");
        assert_eq!(f.error("email"), None);
    }

    #[test]
    fn partial_failure_keeps_valid_values() {
        let mut f = form();
        f.set_value("name", "Ada");
        f.set_value("email", "not-an-email");

        assert!(!f.submit());
        assert_eq!(f.value("name"), Some("Ada"));
        assert_eq!(f.error("name"), None);
        assert_eq!(f.error("email"), Some(FieldError::InvalidEmail));
        assert!(!f.is_submitted());
    }

    #[test]
    fn all_valid_fields_submit() {
        let mut f = form();
        f.set_value("name", "Ada");
        f.set_value("email", "ada@qa-sandbox.com");
        assert!(f.submit());
        assert!(f.is_submitted());
        assert!(f.errors().is_empty());
    }
}
