//! Raw reservation form input and per-field validation feedback

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Form field names used by the reservation edit form
pub mod fields {
    pub const BEGIN: &str = "begin";
    pub const END: &str = "end";
    pub const RESOURCE: &str = "resource";
    pub const USER: &str = "user";
    pub const RESERVER_SSN: &str = "reserver_ssn";
    pub const RESERVER_NAME: &str = "reserver_name";
    pub const RESERVER_EMAIL_ADDRESS: &str = "reserver_email_address";
    pub const RESERVER_PHONE_NUMBER: &str = "reserver_phone_number";
    pub const RESERVER_ADDRESS_STREET: &str = "reserver_address_street";
    pub const RESERVER_ADDRESS_ZIP: &str = "reserver_address_zip";
    pub const RESERVER_ADDRESS_CITY: &str = "reserver_address_city";
    pub const DESCRIPTION: &str = "description";

    /// Key used for errors that do not belong to a single field
    pub const NON_FIELD_ERRORS: &str = "non_field_errors";
}

/// Snapshot of the edit form taken for one save attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationDraft {
    values: BTreeMap<String, String>,
    required: BTreeSet<String>,
}

impl ReservationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from serialized `name=value` pairs; a repeated name keeps the last value
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values,
            required: BTreeSet::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_field(name, value);
        self
    }

    pub fn with_required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Mark or unmark a field as mandatory (optional form sections toggle this)
    pub fn set_required(&mut self, name: impl Into<String>, required: bool) {
        let name = name.into();
        if required {
            self.required.insert(name);
        } else {
            self.required.remove(&name);
        }
    }

    /// Value of a field, empty when the form does not carry it
    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.contains(name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.required.iter().map(String::as_str)
    }

    pub fn begin_text(&self) -> &str {
        self.value(fields::BEGIN)
    }

    pub fn end_text(&self) -> &str {
        self.value(fields::END)
    }

    pub fn resource_id(&self) -> &str {
        self.value(fields::RESOURCE)
    }

    pub fn user_id(&self) -> &str {
        self.value(fields::USER)
    }
}

/// Structured field errors reported by the reservation backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Error not tied to a specific field
    pub fn general(message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(fields::NON_FIELD_ERRORS, message);
        errors
    }

    /// Decode an error body such as `{"begin": ["..."], "detail": "..."}`
    pub fn from_json(body: &Value) -> Self {
        let mut errors = Self::new();
        match body {
            Value::Object(map) => {
                for (field, value) in map {
                    match value {
                        Value::Array(items) => {
                            for item in items {
                                errors.add(field.clone(), json_message(item));
                            }
                        }
                        other => errors.add(field.clone(), json_message(other)),
                    }
                }
            }
            Value::Null => {}
            other => errors.add(fields::NON_FIELD_ERRORS, json_message(other)),
        }
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn json_message(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Visual validation state of the form inputs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFeedback {
    invalid: BTreeSet<String>,
    messages: BTreeMap<String, String>,
}

impl FieldFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_invalid(&mut self, field: impl Into<String>) {
        self.invalid.insert(field.into());
    }

    pub fn set_message(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(field.into(), message.into());
    }

    /// Remove the invalid marking and message of a field
    pub fn clear(&mut self, field: &str) {
        self.invalid.remove(field);
        self.messages.remove(field);
    }

    pub fn is_invalid(&self, field: &str) -> bool {
        self.invalid.contains(field)
    }

    pub fn message(&self, field: &str) -> Option<&str> {
        self.messages.get(field).map(String::as_str)
    }

    pub fn invalid_fields(&self) -> impl Iterator<Item = &str> {
        self.invalid.iter().map(String::as_str)
    }

    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty() && self.messages.is_empty()
    }

    /// Show backend errors next to their inputs
    pub fn apply_field_errors(&mut self, errors: &FieldErrors) {
        for (field, messages) in errors.iter() {
            self.mark_invalid(field);
            self.set_message(field, messages.join(" "));
        }
    }
}
