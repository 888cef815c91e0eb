// SPDX-License-Identifier: PMPL-1.0-or-later
//! Structured payload extractors, one per checklist.
//!
//! Extractors summarize the elements a downstream reviewer needs to judge
//! quality rather than presence. Every element summary carries a `selector`
//! (its CSS path) so rule findings can be matched against it, and every key
//! is always present: optional values serialize as `null`, lists as `[]`.

pub mod forms;
pub mod nontext;
pub mod semantic;

use crate::dom::DocumentHandle;
use crate::error::Result;
use crate::finding::Checklist;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Trait implemented by all extractors
pub trait Extractor: Send + Sync {
    /// Human-readable name of this extractor
    fn name(&self) -> &str;

    /// Checklist whose payload this extractor produces
    fn checklist(&self) -> Checklist;

    /// Walk the document and build the payload
    fn extract(&self, doc: &DocumentHandle<'_>) -> Result<Value>;
}

/// All extractors in checklist order
pub fn extractors() -> Vec<Box<dyn Extractor>> {
    vec![
        Box::new(semantic::SemanticExtractor),
        Box::new(forms::FormExtractor),
        Box::new(nontext::NonTextExtractor),
    ]
}

/// The three payloads, keyed by checklist id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payloads {
    by_checklist: BTreeMap<Checklist, Value>,
}

impl Payloads {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, checklist: Checklist) -> Option<&Value> {
        self.by_checklist.get(&checklist)
    }

    pub fn get_mut(&mut self, checklist: Checklist) -> Option<&mut Value> {
        self.by_checklist.get_mut(&checklist)
    }

    pub fn insert(&mut self, checklist: Checklist, payload: Value) {
        self.by_checklist.insert(checklist, payload);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Checklist, &Value)> {
        self.by_checklist.iter()
    }

    pub fn len(&self) -> usize {
        self.by_checklist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_checklist.is_empty()
    }
}

/// Run one checklist's extractor
pub fn extract_checklist(doc: &DocumentHandle<'_>, checklist: Checklist) -> Result<Value> {
    match checklist {
        Checklist::CL01 => semantic::SemanticExtractor.extract(doc),
        Checklist::CL02 => forms::FormExtractor.extract(doc),
        Checklist::CL03 => nontext::NonTextExtractor.extract(doc),
    }
}

/// Run every extractor
pub fn extract_all(doc: &DocumentHandle<'_>) -> Result<Payloads> {
    let mut payloads = Payloads::new();
    for extractor in extractors() {
        let payload = extractor.extract(doc)?;
        debug!(extractor = extractor.name(), "Extracted payload");
        payloads.insert(extractor.checklist(), payload);
    }
    Ok(payloads)
}

/// Trimmed, whitespace-collapsed text or `None` when blank
pub(crate) fn clean(value: Option<&str>) -> Option<String> {
    value
        .map(crate::dom::collapse_whitespace)
        .filter(|v| !v.is_empty())
}

/// Non-empty string or `None`
pub(crate) fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// At most `max` characters
pub(crate) fn clip(value: &str, max: usize) -> String {
    crate::dom::truncate_chars(value, max)
}

/// Last path segment of a URL, clipped
pub(crate) fn basename(src: &str, max: usize) -> String {
    clip(src.rsplit('/').next().unwrap_or(src), max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn test_extract_all_keys() {
        let doc = Document::parse_str("<p>empty</p>").unwrap();
        let h = doc.handle();
        let payloads = extract_all(&h).unwrap();
        assert_eq!(payloads.len(), 3);

        let json = serde_json::to_value(&payloads).unwrap();
        assert!(json.get("CL01").is_some());
        assert!(json.get("CL02").is_some());
        assert!(json.get("CL03").is_some());
    }

    #[test]
    fn test_empty_document_keeps_keys() {
        let doc = Document::parse_str("").unwrap();
        let h = doc.handle();
        let payloads = extract_all(&h).unwrap();
        let cl03 = payloads.get(Checklist::CL03).unwrap();
        for key in ["informative", "decorative", "missing", "actionable", "complex"] {
            assert_eq!(cl03["images"][key], Value::Array(vec![]), "{}", key);
        }
        let cl01 = payloads.get(Checklist::CL01).unwrap();
        assert_eq!(cl01["language"], Value::Null);
        assert_eq!(cl01["page_title"]["title"], Value::Null);
    }

    #[test]
    fn test_helpers() {
        assert_eq!(clean(Some("  a \n b ")), Some("a b".to_string()));
        assert_eq!(clean(Some("   ")), None);
        assert_eq!(basename("https://x.org/img/cat.png", 60), "cat.png");
        assert_eq!(clip("abcdef", 3), "abc");
    }
}
