// SPDX-License-Identifier: PMPL-1.0-or-later
//! Non-text content rules (CL03) - WCAG 1.1.1 Non-text Content (Level A)

use super::{sc, Rule, RuleSet};
use crate::dom::{attr_lower, attr_nonblank, closest, has_attr, tag, text, DocumentHandle, Node};
use crate::finding::{Checklist, Finding, Severity};

/// Non-text content rule set
pub struct NonTextRules;

impl RuleSet for NonTextRules {
    fn name(&self) -> &str {
        "Non-text Content Rules"
    }

    fn checklist(&self) -> Checklist {
        Checklist::CL03
    }

    fn rules(&self) -> &'static [Rule] {
        RULES
    }
}

/// Ancestors that make an image actionable
pub const INTERACTIVE_PARENTS: &[&str] = &["a", "button"];

pub static RULES: &[Rule] = &[
    Rule {
        id: "NON_TEXT_001",
        name: "Image missing alt attribute",
        checklist: Checklist::CL03,
        criterion: sc::NON_TEXT_CONTENT,
        severity: Severity::Error,
        suggestion: "Add alt text describing the image, or alt=\"\" if it is purely decorative.",
        check: img_alt_missing,
    },
    Rule {
        id: "NON_TEXT_002",
        name: "Actionable image missing alt text",
        checklist: Checklist::CL03,
        criterion: sc::NON_TEXT_CONTENT,
        severity: Severity::Error,
        suggestion: "Describe the link or button's destination or action in the image's alt text.",
        check: actionable_img_alt_missing,
    },
    Rule {
        id: "NON_TEXT_003",
        name: "Image input missing alt text",
        checklist: Checklist::CL03,
        criterion: sc::NON_TEXT_CONTENT,
        severity: Severity::Error,
        suggestion: "Add alt text to <input type=\"image\"> describing its action.",
        check: image_input_alt_missing,
    },
    Rule {
        id: "NON_TEXT_004",
        name: "Image map area missing alt text",
        checklist: Checklist::CL03,
        criterion: sc::NON_TEXT_CONTENT,
        severity: Severity::Error,
        suggestion: "Give every <area> alt text describing its link target.",
        check: area_alt_missing,
    },
    Rule {
        id: "NON_TEXT_005",
        name: "SVG embedded via object or iframe",
        checklist: Checklist::CL03,
        criterion: sc::NON_TEXT_CONTENT,
        severity: Severity::Warning,
        suggestion: "Embed the SVG inline or via <img> with alt text.",
        check: svg_embedded,
    },
    Rule {
        id: "NON_TEXT_006",
        name: "Canvas missing fallback text",
        checklist: Checklist::CL03,
        criterion: sc::NON_TEXT_CONTENT,
        severity: Severity::Error,
        suggestion: "Put fallback text inside <canvas> describing what it renders.",
        check: canvas_no_fallback,
    },
    Rule {
        id: "NON_TEXT_007",
        name: "Object missing alternative text",
        checklist: Checklist::CL03,
        criterion: sc::NON_TEXT_CONTENT,
        severity: Severity::Error,
        suggestion: "Put alternative text content inside the <object> element.",
        check: object_no_alternative,
    },
];

/// alt attribute absent or whitespace only
fn alt_missing_or_blank(el: &Node<'_>) -> bool {
    attr_nonblank(el, "alt").is_none()
}

fn img_alt_missing(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    doc.find_all(&["img"])
        .iter()
        .filter(|img| !has_attr(img, "alt"))
        .map(|img| rule.finding(doc, img, "<img> element does not have an alt attribute."))
        .collect()
}

fn actionable_img_alt_missing(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    doc.find_all(&["img"])
        .iter()
        .filter(|img| alt_missing_or_blank(img))
        .filter_map(|img| {
            let parent = closest(img, INTERACTIVE_PARENTS)?;
            Some(rule.finding(
                doc,
                img,
                format!("Image inside <{}> must have non-empty alt text.", tag(&parent)),
            ))
        })
        .collect()
}

fn image_input_alt_missing(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    doc.find_where(|el| tag(el) == "input" && attr_lower(el, "type").as_deref() == Some("image"))
        .iter()
        .filter(|input| alt_missing_or_blank(input))
        .map(|input| rule.finding(doc, input, "Form input type=\"image\" must have non-empty alt text."))
        .collect()
}

fn area_alt_missing(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    doc.find_all(&["area"])
        .iter()
        .filter(|area| alt_missing_or_blank(area))
        .map(|area| rule.finding(doc, area, "<area> element must have non-empty alt text."))
        .collect()
}

/// Embedded resource URL of an object or iframe
pub fn embed_source<'a>(el: &Node<'a>) -> Option<&'a str> {
    attr_nonblank(el, "data").or_else(|| attr_nonblank(el, "src"))
}

fn is_svg_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.to_ascii_lowercase().ends_with(".svg")
}

fn svg_embedded(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    doc.find_all(&["object", "iframe"])
        .iter()
        .filter(|el| embed_source(el).is_some_and(is_svg_url))
        .map(|el| {
            rule.finding(
                doc,
                el,
                format!("SVG embedded using <{}> instead of inline or <img>.", tag(el)),
            )
        })
        .collect()
}

fn canvas_no_fallback(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    doc.find_all(&["canvas"])
        .iter()
        .filter(|c| text(c).is_empty())
        .map(|c| rule.finding(doc, c, "<canvas> element has no fallback text content."))
        .collect()
}

fn object_no_alternative(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    doc.find_all(&["object"])
        .iter()
        .filter(|o| text(o).is_empty() && attr_nonblank(o, "aria-label").is_none())
        .map(|o| rule.finding(doc, o, "<object> element has no alternative text content."))
        .collect()
}
