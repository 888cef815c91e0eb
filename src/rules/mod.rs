// SPDX-License-Identifier: PMPL-1.0-or-later
//! Deterministic WCAG rules, grouped into one rule set per checklist.
//!
//! Every rule is a plain function over a read-only [`DocumentHandle`]. Rules
//! share nothing but the handle's memoized id index, so any subset can be
//! run in any order. A rule reports at most one finding per element;
//! rules about something missing from the page report one finding with a
//! document-level descriptor.

pub mod forms;
pub mod nontext;
pub mod semantic;

use crate::dom::{DocumentHandle, Node};
use crate::error::AuditError;
use crate::finding::{Checklist, Criterion, ElementDescriptor, Finding, FindingSet, Severity};
use tracing::debug;

/// WCAG 2.x success criteria cited by rules and judgment prompts
pub mod sc {
    use crate::finding::{Criterion, WcagLevel};

    pub const NON_TEXT_CONTENT: Criterion = Criterion::new("1.1.1", "Non-text Content", WcagLevel::A);
    pub const AUDIO_VIDEO_PRERECORDED: Criterion =
        Criterion::new("1.2.1", "Audio-only and Video-only (Prerecorded)", WcagLevel::A);
    pub const CAPTIONS_PRERECORDED: Criterion =
        Criterion::new("1.2.2", "Captions (Prerecorded)", WcagLevel::A);
    pub const INFO_AND_RELATIONSHIPS: Criterion =
        Criterion::new("1.3.1", "Info and Relationships", WcagLevel::A);
    pub const KEYBOARD: Criterion = Criterion::new("2.1.1", "Keyboard", WcagLevel::A);
    pub const BYPASS_BLOCKS: Criterion = Criterion::new("2.4.1", "Bypass Blocks", WcagLevel::A);
    pub const PAGE_TITLED: Criterion = Criterion::new("2.4.2", "Page Titled", WcagLevel::A);
    pub const FOCUS_ORDER: Criterion = Criterion::new("2.4.3", "Focus Order", WcagLevel::A);
    pub const LINK_PURPOSE: Criterion =
        Criterion::new("2.4.4", "Link Purpose (In Context)", WcagLevel::A);
    pub const HEADINGS_AND_LABELS: Criterion =
        Criterion::new("2.4.6", "Headings and Labels", WcagLevel::AA);
    pub const LANGUAGE_OF_PAGE: Criterion =
        Criterion::new("3.1.1", "Language of Page", WcagLevel::A);
    pub const LANGUAGE_OF_PARTS: Criterion =
        Criterion::new("3.1.2", "Language of Parts", WcagLevel::AA);
    pub const ERROR_IDENTIFICATION: Criterion =
        Criterion::new("3.3.1", "Error Identification", WcagLevel::A);
    pub const LABELS_OR_INSTRUCTIONS: Criterion =
        Criterion::new("3.3.2", "Labels or Instructions", WcagLevel::A);
    pub const PARSING: Criterion = Criterion::new("4.1.1", "Parsing", WcagLevel::A);
    pub const NAME_ROLE_VALUE: Criterion =
        Criterion::new("4.1.2", "Name, Role, Value", WcagLevel::A);
}

/// Rule function signature
pub type CheckFn = fn(&Rule, &DocumentHandle<'_>) -> Vec<Finding>;

/// A registered rule: static metadata plus its check
pub struct Rule {
    /// Stable identifier, unique across all checklists
    pub id: &'static str,
    pub name: &'static str,
    pub checklist: Checklist,
    pub criterion: Criterion,
    pub severity: Severity,
    pub suggestion: &'static str,
    pub check: CheckFn,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("checklist", &self.checklist)
            .field("criterion", &self.criterion.number)
            .finish()
    }
}

impl Rule {
    /// Run this rule against a document
    pub fn evaluate(&self, doc: &DocumentHandle<'_>) -> Vec<Finding> {
        (self.check)(self, doc)
    }

    /// Finding anchored on an element
    pub fn finding<'a>(&self, doc: &DocumentHandle<'a>, el: &Node<'a>, description: impl Into<String>) -> Finding {
        self.build(doc.describe(el), Vec::new(), description.into())
    }

    /// Finding anchored on an element that also cites other elements
    pub fn finding_with_related<'a>(
        &self,
        doc: &DocumentHandle<'a>,
        el: &Node<'a>,
        related: &[Node<'a>],
        description: impl Into<String>,
    ) -> Finding {
        let related = related.iter().map(|r| doc.describe(r)).collect();
        self.build(doc.describe(el), related, description.into())
    }

    /// Finding about something absent from the whole page
    pub fn document_finding(&self, description: impl Into<String>) -> Finding {
        self.build(ElementDescriptor::document(), Vec::new(), description.into())
    }

    fn build(&self, element: ElementDescriptor, related: Vec<ElementDescriptor>, description: String) -> Finding {
        Finding {
            rule_id: self.id.to_string(),
            rule_name: self.name.to_string(),
            checklist: self.checklist,
            severity: self.severity,
            element,
            related,
            description,
            suggestion: Some(self.suggestion.to_string()),
            wcag: self.criterion.into(),
        }
    }

    /// Log that this rule could not evaluate an element. Yields no finding.
    pub(crate) fn skip<'a>(&self, doc: &DocumentHandle<'a>, el: &Node<'a>, reason: impl Into<String>) {
        let err = AuditError::RuleEvaluationSkipped {
            rule_id: self.id.to_string(),
            element: doc.describe(el).display_name(),
            reason: reason.into(),
        };
        debug!("{}", err);
    }
}

/// A checklist's rules
pub trait RuleSet: Send + Sync {
    /// Human-readable name of this rule set
    fn name(&self) -> &str;

    /// Checklist the rules belong to
    fn checklist(&self) -> Checklist;

    /// Registered rules in evaluation order
    fn rules(&self) -> &'static [Rule];

    /// Run every rule and concatenate findings in registration order
    fn check(&self, doc: &DocumentHandle<'_>) -> Vec<Finding> {
        self.rules().iter().flat_map(|rule| rule.evaluate(doc)).collect()
    }
}

/// All rule sets in checklist order
pub fn rule_sets() -> Vec<Box<dyn RuleSet>> {
    vec![
        Box::new(semantic::SemanticRules),
        Box::new(forms::FormRules),
        Box::new(nontext::NonTextRules),
    ]
}

/// Every registered rule
pub fn all_rules() -> impl Iterator<Item = &'static Rule> {
    [semantic::RULES, forms::RULES, nontext::RULES].into_iter().flatten()
}

/// Look up a rule by id
pub fn find_rule(id: &str) -> Option<&'static Rule> {
    all_rules().find(|r| r.id == id)
}

/// Run one checklist's rules
pub fn run_checklist(doc: &DocumentHandle<'_>, checklist: Checklist) -> Vec<Finding> {
    rule_sets()
        .iter()
        .filter(|set| set.checklist() == checklist)
        .flat_map(|set| set.check(doc))
        .collect()
}

/// Run every rule set
pub fn run_rules(doc: &DocumentHandle<'_>) -> FindingSet {
    let mut findings = FindingSet::new();

    for set in rule_sets() {
        let set_findings = set.check(doc);
        debug!(rule_set = set.name(), findings = set_findings.len(), "Rule set complete");
        findings.extend(set_findings);
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use std::collections::HashSet;

    #[test]
    fn test_rule_ids_unique() {
        let mut seen = HashSet::new();
        for rule in all_rules() {
            assert!(seen.insert(rule.id), "duplicate rule id {}", rule.id);
        }
        assert!(seen.len() >= 40);
    }

    #[test]
    fn test_rules_registered_under_their_set() {
        for set in rule_sets() {
            for rule in set.rules() {
                assert_eq!(rule.checklist, set.checklist(), "{}", rule.id);
            }
        }
    }

    #[test]
    fn test_find_rule() {
        let rule = find_rule("NON_TEXT_002").unwrap();
        assert_eq!(rule.checklist, Checklist::CL03);
        assert_eq!(rule.criterion.number, "1.1.1");
        assert!(find_rule("NOPE_001").is_none());
    }

    #[test]
    fn test_at_most_one_finding_per_element_per_rule() {
        let html = r##"<!DOCTYPE html><html lang="xx_bad"><head><title></title><title>B</title></head>
<body>
<div id="d">loose text</div><div id="d"></div>
<nav></nav><nav></nav><header></header><header></header>
<h3></h3><h1></h1><h1>x</h1><h4>y</h4>
<a></a><a href="#">  </a><a href="#nowhere">Skip to content</a>
<span tabindex="3" lang="!!">t</span><span tabindex="abc">u</span>
<table><tr><td>1</td></tr></table><iframe></iframe><iframe title=" "></iframe>
<form><input aria-describedby="a b c" placeholder="p" aria-invalid="true">
<fieldset></fieldset><label for="r">Req *</label><input id="r"></form>
<div onclick="go()">click</div>
<a href="/"><img src="chart.png"></a><input type="image"><map><area></map>
<object data="x.svg"></object><canvas></canvas>
</body></html>"##;
        let doc = Document::parse_str(html).unwrap();
        let h = doc.handle();
        let findings = run_rules(&h);
        let mut seen = HashSet::new();
        for f in &findings.findings {
            assert!(
                seen.insert((f.rule_id.clone(), f.element.clone())),
                "{} fired twice on {}",
                f.rule_id,
                f.element.css_path
            );
        }
        assert!(findings.len() > 20);
    }

    #[test]
    fn test_run_checklist_filters() {
        let doc = Document::parse_str("<img src='a.png'><input id='x'>").unwrap();
        let h = doc.handle();
        let cl03 = run_checklist(&h, Checklist::CL03);
        assert!(cl03.iter().all(|f| f.checklist == Checklist::CL03));
        assert!(cl03.iter().any(|f| f.rule_id == "NON_TEXT_001"));
    }
}
