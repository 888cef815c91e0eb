// SPDX-License-Identifier: PMPL-1.0-or-later
//! Finding types produced by the rule engine.
//!
//! A finding is immutable once built. Its identity is the pair
//! `(rule_id, element)`, which the report normalizer uses for dedup.

use serde::{Deserialize, Serialize};

/// Severity levels for findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Content is missing or broken for assistive technology
    Error,
    /// Should be addressed
    Warning,
    /// Informational
    Info,
}

impl Severity {
    /// Whether this severity fails a `check` run
    pub fn is_blocking(&self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

/// WCAG conformance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WcagLevel {
    /// Level A - minimum conformance
    A,
    /// Level AA - standard conformance
    AA,
    /// Level AAA - enhanced conformance
    AAA,
}

impl std::fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WcagLevel::A => write!(f, "A"),
            WcagLevel::AA => write!(f, "AA"),
            WcagLevel::AAA => write!(f, "AAA"),
        }
    }
}

/// One of the three independent audit groupings
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Checklist {
    /// Semantic structure
    CL01,
    /// Forms
    CL02,
    /// Non-text content
    CL03,
}

impl Checklist {
    pub const ALL: [Checklist; 3] = [Checklist::CL01, Checklist::CL02, Checklist::CL03];

    /// Human-readable checklist title
    pub fn title(&self) -> &'static str {
        match self {
            Checklist::CL01 => "Semantic Structure",
            Checklist::CL02 => "Forms",
            Checklist::CL03 => "Non-text Content",
        }
    }
}

impl std::fmt::Display for Checklist {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Checklist::CL01 => write!(f, "CL01"),
            Checklist::CL02 => write!(f, "CL02"),
            Checklist::CL03 => write!(f, "CL03"),
        }
    }
}

impl std::str::FromStr for Checklist {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CL01" => Ok(Checklist::CL01),
            "CL02" => Ok(Checklist::CL02),
            "CL03" => Ok(Checklist::CL03),
            other => Err(format!("Unknown checklist: {}", other)),
        }
    }
}

/// A WCAG success criterion reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Criterion {
    pub number: &'static str,
    pub name: &'static str,
    pub level: WcagLevel,
}

impl Criterion {
    pub const fn new(number: &'static str, name: &'static str, level: WcagLevel) -> Self {
        Self { number, name, level }
    }
}

/// Serializable WCAG citation carried by a finding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WcagRef {
    pub criterion: String,
    pub name: String,
    pub level: WcagLevel,
}

impl From<Criterion> for WcagRef {
    fn from(c: Criterion) -> Self {
        Self {
            criterion: c.number.to_string(),
            name: c.name.to_string(),
            level: c.level,
        }
    }
}

/// Tag used for descriptors that refer to the page as a whole
pub const DOCUMENT_TAG: &str = "#document";

/// Where a finding points in the document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementDescriptor {
    pub tag: String,
    pub id: Option<String>,
    pub class: Option<String>,
    /// `tag:nth-of-type(k)` segments from `<html>` joined by ` > `
    pub css_path: String,
    /// Bounded outer-HTML snippet
    pub snippet: String,
}

impl ElementDescriptor {
    /// Descriptor for findings about something missing from the page
    pub fn document() -> Self {
        Self {
            tag: DOCUMENT_TAG.to_string(),
            id: None,
            class: None,
            css_path: String::new(),
            snippet: String::new(),
        }
    }

    pub fn is_document(&self) -> bool {
        self.tag == DOCUMENT_TAG
    }

    /// Short display name, e.g. `<input id="email">`
    pub fn display_name(&self) -> String {
        if self.is_document() {
            return "Page".to_string();
        }
        match (&self.id, &self.class) {
            (Some(id), _) => format!("<{} id=\"{}\">", self.tag, id),
            (None, Some(class)) => format!("<{} class=\"{}\">", self.tag, class),
            (None, None) => format!("<{}>", self.tag),
        }
    }
}

/// A deterministic rule finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Stable rule identifier (e.g., "NON_TEXT_001")
    pub rule_id: String,
    /// Human-readable rule name
    pub rule_name: String,
    pub checklist: Checklist,
    pub severity: Severity,
    pub element: ElementDescriptor,
    /// Other elements cited by the same finding (duplicate ids, landmark groups)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<ElementDescriptor>,
    pub description: String,
    pub suggestion: Option<String>,
    pub wcag: WcagRef,
}

impl Finding {
    /// Dedup identity
    pub fn identity(&self) -> (&str, &ElementDescriptor) {
        (&self.rule_id, &self.element)
    }

    /// Location string for display
    pub fn location_string(&self) -> String {
        if self.element.is_document() {
            "<document>".to_string()
        } else {
            self.element.css_path.clone()
        }
    }
}

/// A collection of findings in rule-engine order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FindingSet {
    pub findings: Vec<Finding>,
}

impl FindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    pub fn by_severity(&self, severity: Severity) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.severity == severity).collect()
    }

    pub fn by_checklist(&self, checklist: Checklist) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.checklist == checklist).collect()
    }

    pub fn by_rule(&self, rule_id: &str) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.rule_id == rule_id).collect()
    }

    pub fn errors(&self) -> Vec<&Finding> {
        self.by_severity(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<&Finding> {
        self.by_severity(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity.is_blocking())
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Findings at or below the given conformance level
    pub fn at_level(&self, max_level: WcagLevel) -> Vec<&Finding> {
        self.findings
            .iter()
            .filter(|f| f.wcag.level <= max_level)
            .collect()
    }
}

impl IntoIterator for FindingSet {
    type Item = Finding;
    type IntoIter = std::vec::IntoIter<Finding>;

    fn into_iter(self) -> Self::IntoIter {
        self.findings.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(tag: &str, id: Option<&str>) -> ElementDescriptor {
        ElementDescriptor {
            tag: tag.to_string(),
            id: id.map(String::from),
            class: None,
            css_path: format!("html > body > {}", tag),
            snippet: format!("<{}>", tag),
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(descriptor("input", Some("email")).display_name(), "<input id=\"email\">");
        assert_eq!(descriptor("img", None).display_name(), "<img>");
        assert_eq!(ElementDescriptor::document().display_name(), "Page");
    }

    #[test]
    fn test_checklist_parse() {
        assert_eq!("cl02".parse::<Checklist>().unwrap(), Checklist::CL02);
        assert!("CL04".parse::<Checklist>().is_err());
    }

    #[test]
    fn test_level_ordering() {
        assert!(WcagLevel::A < WcagLevel::AA);
        assert!(WcagLevel::AA < WcagLevel::AAA);
    }
}
