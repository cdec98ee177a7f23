use serde::Serialize;
use std::collections::BTreeMap;
use validator::ValidationErrors;

/// Key under which errors that belong to the whole form are collected.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Per-field error messages for a submitted form, rendered next to each input.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn add_non_field(&mut self, message: impl Into<String>) {
        self.add(NON_FIELD_ERRORS, message);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Folds validator output into this map. Errors without a message fall back to their code.
    pub fn extend_from(&mut self, errors: &ValidationErrors) {
        for (field, errs) in errors.field_errors() {
            for e in errs.iter() {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                self.add(field.to_string(), message);
            }
        }
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut out = FieldErrors::new();
        out.extend_from(errors);
        out
    }
}
