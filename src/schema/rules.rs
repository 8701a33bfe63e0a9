//! Field-level rules shared by every resource schema.
//!
//! JSON bodies are never coerced: a number sent as a string is a type error.
//! Query strings are always text and are coerced to the target type first.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::str::FromStr;

use crate::model::{Id, PageRequest, Patch, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};
use crate::schema::Violations;

pub type Body = Map<String, Value>;
pub type QueryParams = HashMap<String, String>;

pub(crate) const REQUIRED: &str = "Required";

/// Name of the JSON type, as reported in type mismatch messages.
fn received(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The request body must be a JSON object.
pub(crate) fn as_object<'a>(body: &'a Value, violations: &mut Violations) -> Option<&'a Body> {
    match body {
        Value::Object(map) => Some(map),
        other => {
            violations.add(
                "body",
                format!("Expected object, received {}", received(other)),
            );
            None
        }
    }
}

enum Raw<'a> {
    Missing,
    Null,
    Present(&'a Value),
}

fn lookup<'a>(body: &'a Body, field: &str) -> Raw<'a> {
    match body.get(field) {
        None => Raw::Missing,
        Some(Value::Null) => Raw::Null,
        Some(value) => Raw::Present(value),
    }
}

/// Length, pattern and format constraints for a text field.
#[derive(Default)]
pub(crate) struct TextRule {
    min: Option<(usize, &'static str)>,
    max: Option<(usize, &'static str)>,
    pattern: Option<(&'static Regex, &'static str)>,
    url: Option<&'static str>,
}

impl TextRule {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn min(mut self, len: usize, message: &'static str) -> Self {
        self.min = Some((len, message));
        self
    }

    pub(crate) fn max(mut self, len: usize, message: &'static str) -> Self {
        self.max = Some((len, message));
        self
    }

    pub(crate) fn pattern(mut self, regex: &'static Regex, message: &'static str) -> Self {
        self.pattern = Some((regex, message));
        self
    }

    pub(crate) fn url(mut self, message: &'static str) -> Self {
        self.url = Some(message);
        self
    }

    /// Record every broken rule; returns whether the value passed all of them.
    pub(crate) fn check(&self, field: &str, value: &str, violations: &mut Violations) -> bool {
        let before = violations.get(field).map_or(0, |v| v.messages.len());
        let len = value.chars().count();

        if let Some((min, message)) = self.min {
            if len < min {
                violations.add(field, message);
            }
        }
        if let Some((max, message)) = self.max {
            if len > max {
                violations.add(field, message);
            }
        }
        if let Some((regex, message)) = self.pattern {
            if !regex.is_match(value) {
                violations.add(field, message);
            }
        }
        if let Some(message) = self.url {
            if url::Url::parse(value).is_err() {
                violations.add(field, message);
            }
        }

        violations.get(field).map_or(0, |v| v.messages.len()) == before
    }
}

/// Inclusive bounds for an integer field.
#[derive(Default)]
pub(crate) struct IntRule {
    min: Option<(i64, &'static str)>,
    max: Option<(i64, &'static str)>,
}

impl IntRule {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn min(mut self, bound: i64, message: &'static str) -> Self {
        self.min = Some((bound, message));
        self
    }

    pub(crate) fn max(mut self, bound: i64, message: &'static str) -> Self {
        self.max = Some((bound, message));
        self
    }

    fn check(&self, field: &str, value: i64, violations: &mut Violations) -> bool {
        let mut ok = true;
        if let Some((min, message)) = self.min {
            if value < min {
                violations.add(field, message);
                ok = false;
            }
        }
        if let Some((max, message)) = self.max {
            if value > max {
                violations.add(field, message);
                ok = false;
            }
        }
        ok
    }
}

fn positive_id_rule(positive: &'static str) -> IntRule {
    IntRule::new()
        .min(1, positive)
        .max(i64::from(Id::MAX), "Value must not exceed 2147483647")
}

// ---------------------------------------------------------------------------
// JSON body fields
// ---------------------------------------------------------------------------

fn text_value(field: &str, value: &Value, violations: &mut Violations) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        other => {
            violations.add(
                field,
                format!("Expected string, received {}", received(other)),
            );
            None
        }
    }
}

fn checked_text(
    field: &str,
    value: &Value,
    rule: &TextRule,
    violations: &mut Violations,
) -> Option<String> {
    let text = text_value(field, value, violations)?;
    rule.check(field, &text, violations).then_some(text)
}

pub(crate) fn required_text(
    body: &Body,
    field: &str,
    rule: &TextRule,
    violations: &mut Violations,
) -> Option<String> {
    match lookup(body, field) {
        Raw::Missing => {
            violations.add(field, REQUIRED);
            None
        }
        Raw::Null => {
            violations.add(field, "Expected string, received null");
            None
        }
        Raw::Present(value) => checked_text(field, value, rule, violations),
    }
}

/// Absent means "not provided"; explicit null is rejected.
pub(crate) fn optional_text(
    body: &Body,
    field: &str,
    rule: &TextRule,
    violations: &mut Violations,
) -> Option<String> {
    match lookup(body, field) {
        Raw::Missing => None,
        Raw::Null => {
            violations.add(field, "Expected string, received null");
            None
        }
        Raw::Present(value) => checked_text(field, value, rule, violations),
    }
}

/// Absent, null and a value are three distinct outcomes.
pub(crate) fn nullable_text(
    body: &Body,
    field: &str,
    rule: &TextRule,
    violations: &mut Violations,
) -> Patch<String> {
    match lookup(body, field) {
        Raw::Missing => Patch::Unset,
        Raw::Null => Patch::Null,
        Raw::Present(value) => match checked_text(field, value, rule, violations) {
            Some(text) => Patch::Value(text),
            None => Patch::Unset,
        },
    }
}

fn json_integer(value: &Value) -> Result<i64, String> {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(int);
            }
            match number.as_f64() {
                Some(float) if float.fract() == 0.0 => Ok(float as i64),
                Some(_) => Err("Expected integer, received float".to_string()),
                None => Err("Expected number, received nan".to_string()),
            }
        }
        other => Err(format!("Expected number, received {}", received(other))),
    }
}

fn checked_int(
    field: &str,
    value: &Value,
    rule: &IntRule,
    violations: &mut Violations,
) -> Option<i64> {
    match json_integer(value) {
        Ok(int) => rule.check(field, int, violations).then_some(int),
        Err(message) => {
            violations.add(field, message);
            None
        }
    }
}

pub(crate) fn required_int(
    body: &Body,
    field: &str,
    rule: &IntRule,
    violations: &mut Violations,
) -> Option<i64> {
    match lookup(body, field) {
        Raw::Missing => {
            violations.add(field, REQUIRED);
            None
        }
        Raw::Null => {
            violations.add(field, "Expected number, received null");
            None
        }
        Raw::Present(value) => checked_int(field, value, rule, violations),
    }
}

pub(crate) fn optional_int(
    body: &Body,
    field: &str,
    rule: &IntRule,
    violations: &mut Violations,
) -> Option<i64> {
    match lookup(body, field) {
        Raw::Missing => None,
        Raw::Null => {
            violations.add(field, "Expected number, received null");
            None
        }
        Raw::Present(value) => checked_int(field, value, rule, violations),
    }
}

/// A foreign key in a JSON body: a positive integer that fits an [`Id`].
pub(crate) fn required_id(
    body: &Body,
    field: &str,
    positive: &'static str,
    violations: &mut Violations,
) -> Option<Id> {
    required_int(body, field, &positive_id_rule(positive), violations)
        .and_then(|id| Id::try_from(id).ok())
}

fn checked_timestamp(
    field: &str,
    value: &Value,
    message: &'static str,
    violations: &mut Violations,
) -> Option<DateTime<Utc>> {
    let text = text_value(field, value, violations)?;
    // UTC with a literal `Z` designator only; numeric offsets are rejected
    let parsed = text
        .strip_suffix('Z')
        .filter(|stamp| stamp.contains('T'))
        .and_then(|_| DateTime::parse_from_rfc3339(&text).ok());
    match parsed {
        Some(timestamp) => Some(timestamp.with_timezone(&Utc)),
        None => {
            violations.add(field, message);
            None
        }
    }
}

pub(crate) fn required_timestamp(
    body: &Body,
    field: &str,
    message: &'static str,
    violations: &mut Violations,
) -> Option<DateTime<Utc>> {
    match lookup(body, field) {
        Raw::Missing => {
            violations.add(field, REQUIRED);
            None
        }
        Raw::Null => {
            violations.add(field, "Expected string, received null");
            None
        }
        Raw::Present(value) => checked_timestamp(field, value, message, violations),
    }
}

pub(crate) fn optional_timestamp(
    body: &Body,
    field: &str,
    message: &'static str,
    violations: &mut Violations,
) -> Option<DateTime<Utc>> {
    match lookup(body, field) {
        Raw::Missing => None,
        Raw::Null => {
            violations.add(field, "Expected string, received null");
            None
        }
        Raw::Present(value) => checked_timestamp(field, value, message, violations),
    }
}

pub(crate) fn nullable_timestamp(
    body: &Body,
    field: &str,
    message: &'static str,
    violations: &mut Violations,
) -> Patch<DateTime<Utc>> {
    match lookup(body, field) {
        Raw::Missing => Patch::Unset,
        Raw::Null => Patch::Null,
        Raw::Present(value) => match checked_timestamp(field, value, message, violations) {
            Some(timestamp) => Patch::Value(timestamp),
            None => Patch::Unset,
        },
    }
}

fn enum_message(allowed: &[&str], got: &str) -> String {
    let expected = allowed
        .iter()
        .map(|option| format!("'{}'", option))
        .collect::<Vec<_>>()
        .join(" | ");
    format!("Invalid enum value. Expected {}, received '{}'", expected, got)
}

fn checked_enum<T: FromStr>(
    field: &str,
    text: &str,
    allowed: &[&str],
    violations: &mut Violations,
) -> Option<T> {
    match text.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            violations.add(field, enum_message(allowed, text));
            None
        }
    }
}

pub(crate) fn required_enum<T: FromStr>(
    body: &Body,
    field: &str,
    allowed: &[&str],
    violations: &mut Violations,
) -> Option<T> {
    match lookup(body, field) {
        Raw::Missing => {
            violations.add(field, REQUIRED);
            None
        }
        Raw::Null => {
            violations.add(field, enum_message(allowed, "null"));
            None
        }
        Raw::Present(value) => {
            let text = text_value(field, value, violations)?;
            checked_enum(field, &text, allowed, violations)
        }
    }
}

// ---------------------------------------------------------------------------
// Query string fields
// ---------------------------------------------------------------------------

/// Text to integer coercion for query parameters. Blank text counts as zero.
fn coerce_integer(raw: &str) -> Result<i64, &'static str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Ok(int);
    }
    match trimmed.parse::<f64>() {
        Ok(float) if !float.is_finite() => Err("Expected number, received nan"),
        Ok(float) if float.fract() != 0.0 => Err("Expected integer, received float"),
        Ok(float) => Ok(float as i64),
        Err(_) => Err("Expected number, received nan"),
    }
}

pub(crate) fn query_int(
    query: &QueryParams,
    field: &str,
    rule: &IntRule,
    violations: &mut Violations,
) -> Option<i64> {
    let raw = query.get(field)?;
    match coerce_integer(raw) {
        Ok(int) => rule.check(field, int, violations).then_some(int),
        Err(message) => {
            violations.add(field, message);
            None
        }
    }
}

pub(crate) fn query_id(
    query: &QueryParams,
    field: &str,
    positive: &'static str,
    violations: &mut Violations,
) -> Option<Id> {
    query_int(query, field, &positive_id_rule(positive), violations)
        .and_then(|id| Id::try_from(id).ok())
}

/// `page` and `limit`, defaulted when absent.
pub(crate) fn page_request(query: &QueryParams, violations: &mut Violations) -> PageRequest {
    let page_rule = IntRule::new()
        .min(1, "Page must be at least 1")
        .max(i64::from(u32::MAX), "Page is out of range");
    let limit_rule = IntRule::new()
        .min(1, "Limit must be at least 1")
        .max(i64::from(MAX_LIMIT), "Limit must not exceed 100");

    let page = query_int(query, "page", &page_rule, violations)
        .and_then(|page| u32::try_from(page).ok())
        .unwrap_or(DEFAULT_PAGE);
    let limit = query_int(query, "limit", &limit_rule, violations)
        .and_then(|limit| u32::try_from(limit).ok())
        .unwrap_or(DEFAULT_LIMIT);

    PageRequest::new(page, limit)
}

pub(crate) fn query_text(
    query: &QueryParams,
    field: &str,
    rule: &TextRule,
    violations: &mut Violations,
) -> Option<String> {
    let raw = query.get(field)?;
    rule.check(field, raw, violations).then(|| raw.clone())
}

/// Free-text search terms; an empty term means "no filter".
pub(crate) fn query_search(
    query: &QueryParams,
    max: usize,
    message: &'static str,
    violations: &mut Violations,
) -> Option<String> {
    query_text(query, "search", &TextRule::new().max(max, message), violations)
        .filter(|term| !term.is_empty())
}

/// Truthiness of the raw text: any non-empty value is `true`, so
/// `?flag=false` still switches the flag on. Only `?flag=` is `false`.
pub(crate) fn query_bool(query: &QueryParams, field: &str) -> Option<bool> {
    query.get(field).map(|raw| !raw.is_empty())
}

pub(crate) fn query_enum<T: FromStr>(
    query: &QueryParams,
    field: &str,
    allowed: &[&str],
    violations: &mut Violations,
) -> Option<T> {
    let raw = query.get(field)?;
    checked_enum(field, raw, allowed, violations)
}

/// Parse an `{id}` path segment.
pub fn parse_id(raw: &str) -> Result<Id, Violations> {
    let mut violations = Violations::new();
    let rule = positive_id_rule("ID must be a positive integer");
    match coerce_integer(raw) {
        Ok(int) => {
            if rule.check("id", int, &mut violations) {
                if let Ok(id) = Id::try_from(int) {
                    return Ok(id);
                }
            }
        }
        Err(message) => violations.add("id", message),
    }
    Err(violations)
}
