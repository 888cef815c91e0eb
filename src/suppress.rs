// SPDX-License-Identifier: PMPL-1.0-or-later
//! Suppression of payload entries that rules already proved broken.
//!
//! The table is the only place a rule finding can remove payload content.
//! Filtering is pure and idempotent, and touches nothing the table does not
//! name. FORM_LABEL_003 has no entry: placeholder-only fields still
//! go to judgment.

use crate::dom::Document;
use crate::extract::{extract_checklist, Payloads};
use crate::finding::{Checklist, Finding};
use crate::rules::find_rule;
use serde_json::Value;
use tracing::debug;

/// Bumped whenever an entry is added, removed or changes meaning
pub const TABLE_VERSION: u32 = 1;

/// Predicate deciding whether a payload entry is covered by a finding
pub type MatchFn = fn(&Value, &Finding) -> bool;

/// One suppression: findings of `rule_id` remove matching entries at `path`
pub struct Suppression {
    pub rule_id: &'static str,
    pub checklist: Checklist,
    /// Dotted path to an array inside the checklist payload
    pub path: &'static str,
    pub matches: MatchFn,
}

impl std::fmt::Debug for Suppression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suppression")
            .field("rule_id", &self.rule_id)
            .field("checklist", &self.checklist)
            .field("path", &self.path)
            .finish()
    }
}

pub static SUPPRESSIONS: &[Suppression] = &[
    Suppression {
        rule_id: "NON_TEXT_001",
        checklist: Checklist::CL03,
        path: "images.missing",
        matches: same_selector,
    },
    Suppression {
        rule_id: "NON_TEXT_002",
        checklist: Checklist::CL03,
        path: "images.actionable",
        matches: same_selector,
    },
    Suppression {
        rule_id: "HEAD_004",
        checklist: Checklist::CL01,
        path: "headings",
        matches: same_selector,
    },
    Suppression {
        rule_id: "IFRAME_001",
        checklist: Checklist::CL01,
        path: "iframes",
        matches: same_selector,
    },
    Suppression {
        rule_id: "IFRAME_002",
        checklist: Checklist::CL01,
        path: "iframes",
        matches: same_selector,
    },
    Suppression {
        rule_id: "LINK_001",
        checklist: Checklist::CL01,
        path: "flagged_links",
        matches: same_selector,
    },
];

/// Entry `selector` equals the finding's element path
fn same_selector(entry: &Value, finding: &Finding) -> bool {
    !finding.element.is_document()
        && entry.get("selector").and_then(Value::as_str) == Some(finding.element.css_path.as_str())
}

fn array_at_mut<'v>(value: &'v mut Value, path: &str) -> Option<&'v mut Vec<Value>> {
    path.split('.')
        .try_fold(value, |node, key| node.get_mut(key))
        .and_then(Value::as_array_mut)
}

fn array_at<'v>(value: &'v Value, path: &str) -> Option<&'v Vec<Value>> {
    path.split('.')
        .try_fold(value, |node, key| node.get(key))
        .and_then(Value::as_array)
}

/// Remove covered entries in place, returning how many were removed
pub fn filter_in_place(payload: &mut Value, checklist: Checklist, findings: &[Finding]) -> usize {
    let mut removed = 0;

    for rule in SUPPRESSIONS.iter().filter(|s| s.checklist == checklist) {
        let relevant: Vec<&Finding> = findings.iter().filter(|f| f.rule_id == rule.rule_id).collect();
        if relevant.is_empty() {
            continue;
        }
        let Some(entries) = array_at_mut(payload, rule.path) else {
            continue;
        };
        let before = entries.len();
        entries.retain(|entry| !relevant.iter().any(|f| (rule.matches)(entry, f)));
        let dropped = before - entries.len();
        if dropped > 0 {
            debug!(rule = rule.rule_id, path = rule.path, dropped, "Suppressed payload entries");
        }
        removed += dropped;
    }

    removed
}

/// Filtered copy of one checklist payload
pub fn filter(payload: &Value, checklist: Checklist, findings: &[Finding]) -> Value {
    let mut filtered = payload.clone();
    filter_in_place(&mut filtered, checklist, findings);
    filtered
}

/// Filtered copy of every payload
pub fn filter_all(payloads: &Payloads, findings: &[Finding]) -> Payloads {
    let mut filtered = Payloads::new();
    for (checklist, payload) in payloads.iter() {
        filtered.insert(*checklist, filter(payload, *checklist, findings));
    }
    filtered
}

/// Problems with the suppression table: unknown rules, rules registered
/// under another checklist, or paths that do not name a payload array
pub fn check_conformance() -> Vec<String> {
    let mut problems = Vec::new();

    let empty = match Document::parse_str("") {
        Ok(doc) => doc,
        Err(e) => return vec![format!("cannot build reference payload: {}", e)],
    };
    let handle = empty.handle();

    for entry in SUPPRESSIONS {
        match find_rule(entry.rule_id) {
            None => problems.push(format!("{}: no such rule", entry.rule_id)),
            Some(rule) if rule.checklist != entry.checklist => problems.push(format!(
                "{}: registered under {} but suppresses {}",
                entry.rule_id, rule.checklist, entry.checklist
            )),
            Some(_) => {}
        }

        match extract_checklist(&handle, entry.checklist) {
            Ok(payload) if array_at(&payload, entry.path).is_some() => {}
            Ok(_) => problems.push(format!(
                "{}: {} has no array at '{}'",
                entry.rule_id, entry.checklist, entry.path
            )),
            Err(e) => problems.push(format!("{}: extraction failed: {}", entry.rule_id, e)),
        }
    }

    problems
}
