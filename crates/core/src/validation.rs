//! Field-level validation errors.
//!
//! Validation never stops at the first failure: every rule runs and each
//! failure contributes one [`FieldError`], so a client can fix all fields in a
//! single round trip.

use serde::Serialize;

/// A single failed rule: which field, and the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Ordered list of field errors (rule order, not alphabetical).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for the common one-error case.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(vec![FieldError::new(field, message)])
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl core::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut first = true;
        for e in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_list_is_empty() {
        let errs = ValidationErrors::new();
        assert!(errs.is_empty());
        assert!(!errs.contains_field("title"));
    }

    #[test]
    fn collected_errors_keep_rule_order() {
        let mut errs = ValidationErrors::new();
        errs.push("title", "Please provide a Title");
        errs.push("description", "Please provide a Description");

        assert_eq!(errs.len(), 2);
        let fields: Vec<&str> = errs.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "description"]);
        assert_eq!(
            errs.to_string(),
            "title: Please provide a Title; description: Please provide a Description"
        );
    }

    #[test]
    fn serializes_as_array_of_pairs() {
        let errs = ValidationErrors::single("password", "Please provide a Password");
        let json = serde_json::to_value(&errs).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "field": "password", "message": "Please provide a Password" }])
        );
    }
}
