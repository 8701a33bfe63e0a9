//! Request schemas.
//!
//! Every inbound payload or query string is turned into a typed value here,
//! before any store access. A failed parse reports every offending field at
//! once, each with all of the rules it broke.

use serde::Serialize;
use std::fmt;

pub mod event;
pub mod feedback;
pub mod note;
pub mod pet;
mod rules;
pub mod status;
pub mod user;

pub use rules::{parse_id, Body, QueryParams};

/// All rules one field violated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub messages: Vec<String>,
}

/// Ordered collection of field violations, grouped by field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut violations = Self::new();
        violations.add(field, message);
        violations
    }

    /// Record a broken rule, appending to the field's entry when it exists.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        match self.0.iter_mut().find(|v| v.field == field) {
            Some(existing) => existing.messages.push(message),
            None => self.0.push(FieldViolation {
                field: field.to_string(),
                messages: vec![message],
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldViolation> {
        self.0.iter()
    }

    pub fn get(&self, field: &str) -> Option<&FieldViolation> {
        self.0.iter().find(|v| v.field == field)
    }

    /// `Ok(value)` when nothing was recorded, otherwise every violation.
    pub fn into_result<T>(self, value: T) -> Result<T, Violations> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{}: {}", violation.field, violation.messages.join(", "))?;
        }
        Ok(())
    }
}

impl IntoIterator for Violations {
    type Item = FieldViolation;
    type IntoIter = std::vec::IntoIter<FieldViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_group_by_field() {
        let mut violations = Violations::new();
        violations.add("petName", "too short");
        violations.add("rarity", "required");
        violations.add("petName", "bad characters");

        assert_eq!(violations.len(), 2);
        assert_eq!(
            violations.get("petName").unwrap().messages,
            vec!["too short".to_string(), "bad characters".to_string()]
        );
        assert_eq!(violations.to_string(), "petName: too short, bad characters; rarity: required");
    }

    #[test]
    fn test_into_result() {
        assert_eq!(Violations::new().into_result(5), Ok(5));
        assert!(Violations::single("id", "bad").into_result(5).is_err());
    }

    #[test]
    fn test_serializes_as_list() {
        let json = serde_json::to_value(Violations::single("page", "Page must be at least 1")).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "field": "page", "messages": ["Page must be at least 1"] }])
        );
    }
}
