//! Reservation list filter criteria

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved key holding the filter panel visibility flag
pub const SHOW_KEY: &str = "show";

/// Value of a single filter constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Int(i64),
    Text(String),
}

impl FilterValue {
    /// `''` and `0` mean "no constraint" and are never stored
    pub fn is_blank(&self) -> bool {
        match self {
            FilterValue::Int(v) => *v == 0,
            FilterValue::Text(s) => s.is_empty(),
        }
    }

    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(FilterValue::Text(s.clone())),
            Value::Number(n) => n.as_i64().map(FilterValue::Int),
            _ => None,
        }
    }
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::Int(v) => write!(f, "{}", v),
            FilterValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// How raw input for a filter field is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterKind {
    /// Stored as entered
    #[default]
    Text,
    /// Whole number
    Integer,
    /// Decimal metres, stored as integer centimetres
    Float,
}

impl FilterKind {
    /// Turn raw input into a stored value. `None` means the input does not
    /// describe a constraint.
    pub fn normalize(self, raw: &str) -> Option<FilterValue> {
        let value = match self {
            FilterKind::Text => Some(FilterValue::Text(raw.to_string())),
            FilterKind::Integer => raw.trim().parse::<i64>().ok().map(FilterValue::Int),
            FilterKind::Float => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| FilterValue::Int((v * 100.0).round() as i64)),
        };
        value.filter(|v| !v.is_blank())
    }
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// The persisted set of filter constraints plus the panel visibility flag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default, skip_serializing_if = "is_false")]
    pub show: bool,
    #[serde(flatten)]
    constraints: BTreeMap<String, FilterValue>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lenient decode of a stored blob.
    ///
    /// Returns `None` when the blob is not a JSON object. Entries that are not
    /// strings or integers, and blank entries, are dropped.
    pub fn from_json(raw: &str) -> Option<Self> {
        let Value::Object(map) = serde_json::from_str::<Value>(raw).ok()? else {
            return None;
        };

        let mut set = FilterSet::new();
        for (name, value) in map {
            if name == SHOW_KEY {
                set.show = value.as_bool().unwrap_or(false);
                continue;
            }
            match FilterValue::from_json(&value) {
                Some(v) => set.insert(name, v),
                None => tracing::debug!("Dropping unsupported stored filter value for {}", name),
            }
        }
        Some(set)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.constraints.get(name)
    }

    /// Store a constraint, or remove it when the value is blank
    pub fn insert(&mut self, name: impl Into<String>, value: FilterValue) {
        let name = name.into();
        if value.is_blank() {
            self.constraints.remove(&name);
        } else {
            self.constraints.insert(name, value);
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<FilterValue> {
        self.constraints.remove(name)
    }

    pub fn clear_constraints(&mut self) {
        self.constraints.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.constraints.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Centimetre constraint rendered back as metres with two decimals
    pub fn meters(&self, name: &str) -> String {
        let cm = match self.get(name) {
            Some(FilterValue::Int(v)) => *v as f64,
            Some(FilterValue::Text(s)) => match s.trim().parse::<f64>() {
                Ok(v) => v,
                Err(_) => return String::new(),
            },
            None => return String::new(),
        };
        if cm == 0.0 {
            return String::new();
        }
        format!("{:.2}", cm / 100.0)
    }
}
