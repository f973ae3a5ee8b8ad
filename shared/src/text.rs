use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::world::TextId;

/// Shown whenever a text id has no entry in the catalog.
pub const MISSING_TEXT: &str = "Text not found";

/// Flat id -> template mapping for one language.
///
/// Templates may reference their arguments as `%1`..`%9`; each argument is
/// itself a text id resolved through the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextCatalog {
    entries: HashMap<TextId, String>,
}

impl TextCatalog {
    pub fn new(entries: HashMap<TextId, String>) -> Self {
        Self { entries }
    }

    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("text catalog parse error: {e}"))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve `id`, substituting `%N` placeholders from `args`.
    pub fn resolve(&self, id: TextId, args: &[TextId]) -> String {
        let Some(template) = self.entries.get(&id) else {
            return MISSING_TEXT.to_string();
        };

        let mut out = String::with_capacity(template.len());
        let mut chars = template.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' || !chars.peek().is_some_and(char::is_ascii_digit) {
                out.push(c);
                continue;
            }

            let mut position = 0usize;
            while let Some(digit) = chars.peek().and_then(|d| d.to_digit(10)) {
                position = position * 10 + digit as usize;
                chars.next();
            }
            match position.checked_sub(1).and_then(|idx| args.get(idx)) {
                Some(&arg) => out.push_str(&self.resolve(arg, &[])),
                None => out.push_str(MISSING_TEXT),
            }
        }
        out
    }
}
