//! Field normalizers.
//!
//! Each normalizer turns raw user input into its canonical storage form or
//! rejects it with a [`FieldError`] tagged by field name. They are pure; the
//! caller combines them with [`collect_fields`] so every invalid field of a
//! submission is reported together.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

pub const NAME_MIN_CHARS: usize = 2;
pub const DESCRIPTION_MIN_CHARS: usize = 5;
pub const CPF_DIGITS: usize = 11;

static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern")
});

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field failure of one submitted entity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Validation failed: {}", join_messages(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Combines three field results without short-circuiting.
///
/// Either every canonical value comes back or the failures of every rejected
/// field do, in argument order; the error list is never empty.
pub fn collect_fields<A, B, C>(
    a: Result<A, FieldError>,
    b: Result<B, FieldError>,
    c: Result<C, FieldError>,
) -> Result<(A, B, C), ValidationErrors> {
    match (a, b, c) {
        (Ok(a), Ok(b), Ok(c)) => Ok((a, b, c)),
        (a, b, c) => Err(ValidationErrors(
            [a.err(), b.err(), c.err()].into_iter().flatten().collect(),
        )),
    }
}

/// Price as it arrives on the wire: already numeric, or text typed by a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPrice {
    Number(f64),
    Text(String),
}

impl Default for RawPrice {
    fn default() -> Self {
        RawPrice::Text(String::new())
    }
}

impl From<f64> for RawPrice {
    fn from(v: f64) -> Self {
        RawPrice::Number(v)
    }
}

impl From<&str> for RawPrice {
    fn from(v: &str) -> Self {
        RawPrice::Text(v.to_string())
    }
}

fn min_chars(field: &str, label: &str, raw: &str, min: usize) -> Result<String, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(field, format!("{label} is required")));
    }
    if trimmed.chars().count() < min {
        return Err(FieldError::new(
            field,
            format!("{label} must have at least {min} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Trimmed name, at least two characters.
pub fn normalize_name(raw: &str) -> Result<String, FieldError> {
    min_chars("name", "Name", raw, NAME_MIN_CHARS)
}

/// Trimmed description, at least five characters.
pub fn normalize_description(raw: &str) -> Result<String, FieldError> {
    min_chars("description", "Description", raw, DESCRIPTION_MIN_CHARS)
}

/// Syntactic `local@domain.tld` check; the value is kept as typed.
pub fn normalize_email(raw: &str) -> Result<String, FieldError> {
    if EMAIL_SHAPE.is_match(raw) {
        Ok(raw.to_string())
    } else {
        Err(FieldError::new("email", "Invalid email"))
    }
}

/// Digits only; exactly eleven must remain.
pub fn normalize_cpf(raw: &str) -> Result<String, FieldError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == CPF_DIGITS {
        Ok(digits)
    } else {
        Err(FieldError::new("cpf", "CPF must have 11 digits"))
    }
}

/// Input-time price text: keeps digits and separators, turns commas into the
/// decimal point and folds every period after the first into the fraction.
pub fn format_price_input(raw: &str) -> String {
    let dotted: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    match dotted.split_once('.') {
        Some((int, frac)) => format!("{}.{}", int, frac.replace('.', "")),
        None => dotted,
    }
}

/// Price text to a non-negative number.
pub fn normalize_price(raw: &str) -> Result<f64, FieldError> {
    let canonical = format_price_input(raw);
    match canonical.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(invalid_price()),
    }
}

pub fn normalize_price_value(raw: &RawPrice) -> Result<f64, FieldError> {
    match raw {
        RawPrice::Number(v) if v.is_finite() && *v >= 0.0 => Ok(*v),
        RawPrice::Number(_) => Err(invalid_price()),
        RawPrice::Text(s) => normalize_price(s),
    }
}

fn invalid_price() -> FieldError {
    FieldError::new("price", "Price must be a non-negative number")
}

/// Display mask `000.000.000-00`, applied progressively while typing.
///
/// Input carrying more than eleven digits is returned unchanged.
pub fn mask_cpf(raw: &str) -> String {
    let digits: Vec<char> = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() > CPF_DIGITS {
        return raw.to_string();
    }
    let mut out = String::with_capacity(14);
    for (i, d) in digits.iter().enumerate() {
        match i {
            3 | 6 => out.push('.'),
            9 => out.push('-'),
            _ => {}
        }
        out.push(*d);
    }
    out
}
