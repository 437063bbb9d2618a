//! Localized text values (`{"fi": "...", "sv": "..."}`)

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Text keyed by language code
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    /// Single-language value
    pub fn new(lang: impl Into<String>, text: impl Into<String>) -> Self {
        let mut values = BTreeMap::new();
        values.insert(lang.into(), text.into());
        Self(values)
    }

    /// Text for `lang`, or an empty string when that language is missing
    pub fn get(&self, lang: &str) -> &str {
        self.0.get(lang).map(String::as_str).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| v.is_empty())
    }
}
