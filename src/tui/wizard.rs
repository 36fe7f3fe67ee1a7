//! Declarative multi-field input flows.
//!
//! A flow is a list of field specs consumed by one generic collect
//! routine. Cancellation and finishing early are ordinary values, not
//! errors; a validation failure aborts the whole flow so nothing is ever
//! half-committed.

use crate::error::Result;

/// One field of a flow. The default is taken on empty input and on
/// finish-early; validation only runs on what the user actually typed.
pub struct FieldSpec {
    pub label: &'static str,
    pub default: String,
    pub parse: fn(&str) -> Result<()>,
}

impl FieldSpec {
    pub fn new(label: &'static str, default: impl Into<String>, parse: fn(&str) -> Result<()>) -> Self {
        FieldSpec {
            label,
            default: default.into(),
            parse,
        }
    }

    /// A field without validation.
    pub fn free(label: &'static str, default: impl Into<String>) -> Self {
        FieldSpec::new(label, default, |_| Ok(()))
    }
}

/// What the user did at one prompt.
pub enum Entry {
    Text(String),
    Cancel,
    FinishEarly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// One collected value per field, defaults filled in.
    Complete(Vec<String>),
    Cancelled,
}

/// Drive a flow: ask for each field in order. Esc discards everything
/// collected so far, Tab accepts defaults for all remaining fields, and a
/// validation failure propagates the format error (full-abort semantics).
pub fn fill(
    fields: &[FieldSpec],
    mut ask: impl FnMut(&FieldSpec) -> Result<Entry>,
) -> Result<Outcome> {
    let mut values = Vec::with_capacity(fields.len());
    for (i, field) in fields.iter().enumerate() {
        match ask(field)? {
            Entry::Cancel => return Ok(Outcome::Cancelled),
            Entry::FinishEarly => {
                values.extend(fields[i..].iter().map(|f| f.default.clone()));
                return Ok(Outcome::Complete(values));
            }
            Entry::Text(text) => {
                let value = if text.is_empty() {
                    field.default.clone()
                } else {
                    (field.parse)(&text)?;
                    text
                };
                values.push(value);
            }
        }
    }
    Ok(Outcome::Complete(values))
}
