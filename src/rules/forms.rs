// SPDX-License-Identifier: PMPL-1.0-or-later
//! Form rules (CL02) - WCAG 1.3.1, 3.3.1, 3.3.2 and 4.1.2.
//!
//! Labels come from the shared accessible-name computation, so a control
//! labelled only by its placeholder fails FORM_LABEL_001 and is also
//! reported by FORM_LABEL_003.

use super::{sc, Rule, RuleSet};
use crate::dom::resolve::{broken_ids, is_delivered};
use crate::dom::{attr, attr_lower, attr_nonblank, descendants_by_tag, has_attr, tag, text, DocumentHandle, Node};
use crate::finding::{Checklist, Finding, Severity};

/// Form rule set
pub struct FormRules;

impl RuleSet for FormRules {
    fn name(&self) -> &str {
        "Form Rules"
    }

    fn checklist(&self) -> Checklist {
        Checklist::CL02
    }

    fn rules(&self) -> &'static [Rule] {
        RULES
    }
}

/// Input types that are not labelled form fields
pub const EXEMPT_INPUT_TYPES: &[&str] = &["hidden", "submit", "reset", "button", "image"];

/// Tags that carry native click semantics
const NATIVE_INTERACTIVE: &[&str] = &["a", "button", "input"];

pub static RULES: &[Rule] = &[
    Rule {
        id: "FORM_LABEL_001",
        name: "Form control missing programmatic label",
        checklist: Checklist::CL02,
        criterion: sc::INFO_AND_RELATIONSHIPS,
        severity: Severity::Error,
        suggestion: "Associate a <label for=\"id\">, wrap the control in a <label>, or use aria-labelledby/aria-label.",
        check: label_missing,
    },
    Rule {
        id: "FORM_LABEL_003",
        name: "Placeholder used as only label",
        checklist: Checklist::CL02,
        criterion: sc::LABELS_OR_INSTRUCTIONS,
        severity: Severity::Warning,
        suggestion: "Keep the placeholder as a hint only and add a persistent visible label.",
        check: label_placeholder_only,
    },
    Rule {
        id: "FORM_GROUP_001",
        name: "Fieldset missing legend",
        checklist: Checklist::CL02,
        criterion: sc::INFO_AND_RELATIONSHIPS,
        severity: Severity::Warning,
        suggestion: "Add a <legend> as the first child of the <fieldset>.",
        check: group_missing_legend,
    },
    Rule {
        id: "FORM_REQUIRED_001",
        name: "Required field not programmatically designated",
        checklist: Checklist::CL02,
        criterion: sc::LABELS_OR_INSTRUCTIONS,
        severity: Severity::Warning,
        suggestion: "Add the required attribute (or aria-required=\"true\") to fields marked with *.",
        check: required_not_designated,
    },
    Rule {
        id: "FORM_INSTR_001",
        name: "aria-describedby reference not found",
        checklist: Checklist::CL02,
        criterion: sc::LABELS_OR_INSTRUCTIONS,
        severity: Severity::Error,
        suggestion: "Point aria-describedby at ids that exist on the page.",
        check: instructions_broken,
    },
    Rule {
        id: "FORM_ERROR_001",
        name: "Error message not programmatically associated",
        checklist: Checklist::CL02,
        criterion: sc::ERROR_IDENTIFICATION,
        severity: Severity::Error,
        suggestion: "Link the error message with aria-describedby or aria-errormessage.",
        check: error_not_associated,
    },
    Rule {
        id: "FORM_CUSTOM_001",
        name: "Custom interactive element missing role",
        checklist: Checklist::CL02,
        criterion: sc::NAME_ROLE_VALUE,
        severity: Severity::Error,
        suggestion: "Use a native <button>, or add a role, tabindex and keyboard handling.",
        check: custom_control_no_role,
    },
];

/// Whether an element is a labelled form field
pub fn is_form_control(el: &Node<'_>) -> bool {
    match tag(el) {
        "input" => {
            let input_type = attr_lower(el, "type").unwrap_or_else(|| "text".to_string());
            !EXEMPT_INPUT_TYPES.contains(&input_type.as_str())
        }
        "select" | "textarea" => true,
        _ => false,
    }
}

/// Labelled form fields in document order
pub fn form_controls<'a>(doc: &DocumentHandle<'a>) -> Vec<Node<'a>> {
    doc.find_where(is_form_control)
}

fn label_missing(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    form_controls(doc)
        .iter()
        .filter_map(|control| {
            let name = doc.accessible_name(control);
            if name.source.is_programmatic() {
                return None;
            }
            Some(rule.finding(
                doc,
                control,
                format!(
                    "Form control has no associated label (name source: {}).",
                    name.source
                ),
            ))
        })
        .collect()
}

fn label_placeholder_only(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    form_controls(doc)
        .iter()
        .filter(|control| attr_nonblank(control, "placeholder").is_some())
        .filter(|control| !doc.accessible_name(control).source.is_programmatic())
        .map(|control| {
            rule.finding(
                doc,
                control,
                "Placeholder text is used without a programmatically associated label.",
            )
        })
        .collect()
}

fn group_missing_legend(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    doc.find_all(&["fieldset"])
        .iter()
        .filter(|fs| descendants_by_tag(fs, &["legend"]).is_empty())
        .map(|fs| rule.finding(doc, fs, "Fieldset does not contain a legend element."))
        .collect()
}

/// Whether the control is marked required for assistive technology
pub fn is_required(el: &Node<'_>) -> bool {
    has_attr(el, "required") || attr_lower(el, "aria-required").as_deref() == Some("true")
}

fn required_not_designated(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    form_controls(doc)
        .iter()
        .filter(|control| !is_required(control))
        .filter(|control| {
            doc.label_for(control)
                .or_else(|| doc.wrapping_label(control))
                .is_some_and(|label| text(&label).contains('*'))
        })
        .map(|control| {
            rule.finding(
                doc,
                control,
                "Field appears visually required (*) but lacks the required attribute.",
            )
        })
        .collect()
}

fn instructions_broken(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    form_controls(doc)
        .iter()
        .filter_map(|control| {
            let missing = broken_ids(&doc.resolve_describedby(control));
            if missing.is_empty() {
                return None;
            }
            let quoted: Vec<String> = missing.iter().map(|id| format!("'{}'", id)).collect();
            Some(rule.finding(
                doc,
                control,
                format!("aria-describedby references missing id {}.", quoted.join(", ")),
            ))
        })
        .collect()
}

fn error_not_associated(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    form_controls(doc)
        .iter()
        .filter(|control| attr_lower(control, "aria-invalid").as_deref() == Some("true"))
        .filter(|control| {
            !is_delivered(&doc.resolve_describedby(control))
                && !is_delivered(&doc.resolve_id_refs(attr(control, "aria-errormessage")))
        })
        .map(|control| {
            rule.finding(
                doc,
                control,
                "Invalid form control has no aria-describedby or aria-errormessage linking to an error message.",
            )
        })
        .collect()
}

fn custom_control_no_role(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    doc.find_where(|el| has_attr(el, "onclick") && !NATIVE_INTERACTIVE.contains(&tag(el)))
        .iter()
        .filter(|el| attr_nonblank(el, "role").is_none())
        .map(|el| {
            rule.finding(
                doc,
                el,
                format!("<{}> has a click handler but no semantic role.", tag(el)),
            )
        })
        .collect()
}
