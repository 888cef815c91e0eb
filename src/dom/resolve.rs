// SPDX-License-Identifier: PMPL-1.0-or-later
//! Reference resolution and accessible-name computation.
//!
//! A broken reference is an ordinary outcome here, not an error: rules decide
//! pass or fail from it.

use super::{attr, attr_nonblank, closest, text, text_excluding, DocumentHandle, Node};
use serde::{Deserialize, Serialize};

/// Outcome of resolving an id reference
#[derive(Debug, Clone, PartialEq)]
pub enum Reference<'a> {
    Resolved(Node<'a>),
    /// Non-empty id with no matching element
    Broken(String),
    /// Attribute missing or empty
    Absent,
}

impl<'a> Reference<'a> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Reference::Resolved(_))
    }

    pub fn target(&self) -> Option<Node<'a>> {
        match self {
            Reference::Resolved(node) => Some(*node),
            _ => None,
        }
    }
}

/// Where an accessible name came from, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSource {
    LabelFor,
    WrappingLabel,
    AriaLabelledby,
    AriaLabel,
    Title,
    /// Only a placeholder; not a programmatic label
    PlaceholderOnly,
    #[serde(rename = "none")]
    Unnamed,
}

impl LabelSource {
    /// Sources that count as a programmatic label association
    pub fn is_programmatic(&self) -> bool {
        match self {
            LabelSource::LabelFor
            | LabelSource::WrappingLabel
            | LabelSource::AriaLabelledby
            | LabelSource::AriaLabel => true,
            LabelSource::Title | LabelSource::PlaceholderOnly | LabelSource::Unnamed => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LabelSource::LabelFor => "label_for",
            LabelSource::WrappingLabel => "wrapping_label",
            LabelSource::AriaLabelledby => "aria_labelledby",
            LabelSource::AriaLabel => "aria_label",
            LabelSource::Title => "title",
            LabelSource::PlaceholderOnly => "placeholder_only",
            LabelSource::Unnamed => "none",
        }
    }
}

impl std::fmt::Display for LabelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Computed accessible name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessibleName {
    pub text: String,
    pub source: LabelSource,
}

impl AccessibleName {
    fn new(text: String, source: LabelSource) -> Self {
        Self { text, source }
    }

    fn unnamed() -> Self {
        Self::new(String::new(), LabelSource::Unnamed)
    }

    /// The name, unless it only came from a placeholder or nowhere
    pub fn effective_label(&self) -> Option<&str> {
        match self.source {
            LabelSource::PlaceholderOnly | LabelSource::Unnamed => None,
            _ => Some(&self.text),
        }
    }
}

impl<'a> DocumentHandle<'a> {
    /// Resolve a single id value
    pub fn resolve_id_ref(&self, id: Option<&str>) -> Reference<'a> {
        let id = match id.map(str::trim) {
            Some(id) if !id.is_empty() => id,
            _ => return Reference::Absent,
        };
        match self.id_index().get(id) {
            Some(node) => Reference::Resolved(node),
            None => Reference::Broken(id.to_string()),
        }
    }

    /// Resolve a whitespace-separated id list, one reference per token
    pub fn resolve_id_refs(&self, value: Option<&str>) -> Vec<Reference<'a>> {
        value
            .map(|v| {
                v.split_whitespace()
                    .map(|token| self.resolve_id_ref(Some(token)))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn resolve_describedby(&self, el: &Node<'a>) -> Vec<Reference<'a>> {
        self.resolve_id_refs(attr(el, "aria-describedby"))
    }

    /// Resolved targets' text joined in token order, `None` when empty
    pub fn referenced_text(&self, value: Option<&str>) -> Option<String> {
        let joined = self
            .resolve_id_refs(value)
            .iter()
            .filter_map(Reference::target)
            .map(|node| text(&node))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!joined.is_empty()).then_some(joined)
    }

    /// First `<label for=id>` matching the element's id
    pub fn label_for(&self, el: &Node<'a>) -> Option<Node<'a>> {
        let id = attr_nonblank(el, "id")?;
        self.elements()
            .iter()
            .copied()
            .find(|l| super::tag(l) == "label" && attr(l, "for").map(str::trim) == Some(id))
    }

    /// Nearest `<label>` ancestor
    pub fn wrapping_label(&self, el: &Node<'a>) -> Option<Node<'a>> {
        closest(el, &["label"])
    }

    /// Accessible name by fixed priority: label for, wrapping label,
    /// aria-labelledby, aria-label, title, then placeholder.
    pub fn accessible_name(&self, el: &Node<'a>) -> AccessibleName {
        if let Some(label) = self.label_for(el) {
            let t = text(&label);
            if !t.is_empty() {
                return AccessibleName::new(t, LabelSource::LabelFor);
            }
        }

        if let Some(label) = self.wrapping_label(el) {
            let t = text_excluding(&label, el);
            if !t.is_empty() {
                return AccessibleName::new(t, LabelSource::WrappingLabel);
            }
        }

        if let Some(t) = self.referenced_text(attr(el, "aria-labelledby")) {
            return AccessibleName::new(t, LabelSource::AriaLabelledby);
        }

        if let Some(t) = attr_nonblank(el, "aria-label") {
            return AccessibleName::new(t.to_string(), LabelSource::AriaLabel);
        }

        if let Some(t) = attr_nonblank(el, "title") {
            return AccessibleName::new(t.to_string(), LabelSource::Title);
        }

        if let Some(t) = attr_nonblank(el, "placeholder") {
            return AccessibleName::new(t.to_string(), LabelSource::PlaceholderOnly);
        }

        AccessibleName::unnamed()
    }
}

/// True when at least one reference resolves
pub fn is_delivered(refs: &[Reference<'_>]) -> bool {
    refs.iter().any(Reference::is_resolved)
}

/// Ids of broken references, in token order
pub fn broken_ids(refs: &[Reference<'_>]) -> Vec<String> {
    refs.iter()
        .filter_map(|r| match r {
            Reference::Broken(id) => Some(id.clone()),
            _ => None,
        })
        .collect()
}
