use serde::{Deserialize, Serialize};

use crate::preference::Preference;

/// Source text of one code example together with its highlighting language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSample {
    pub source: String,
    pub language: String,
}

/// One syntax rendition inside a tab group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub label: Preference,
    pub content: CodeSample,
}

impl Variant {
    pub fn new(label: Preference, source: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            label,
            content: CodeSample {
                source: source.into(),
                language: language.into(),
            },
        }
    }

    /// JavaScript variant, the common case on tutorial pages.
    pub fn js(label: Preference, source: impl Into<String>) -> Self {
        Self::new(label, source, "javascript")
    }
}

/// Index of the variant to show for `preference`: the matching label, or the
/// first variant when the group has no rendition for it.
pub fn resolve_index(variants: &[Variant], preference: Preference) -> usize {
    variants
        .iter()
        .position(|v| v.label == preference)
        .unwrap_or(0)
}
