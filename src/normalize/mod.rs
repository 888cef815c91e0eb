// SPDX-License-Identifier: PMPL-1.0-or-later
//! Finding normalizer and report aggregator.
//!
//! Rule findings and judgment results converge on one fixed 13-column row.
//! Ordering is a property of the merge: rule rows first in engine order,
//! then judgment rows by checklist and prompt index, whatever order the
//! results arrived in. Ids run from 1 with no gaps.

pub mod judgment;

use crate::config::ReportConfig;
use crate::finding::Finding;
use crate::prompts::{JudgmentOutcome, JudgmentResult};
use chrono::NaiveDate;
use judgment::{extract_rows, RowDraft};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Bump when a column is added, removed, renamed or reordered
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Column names in output order
pub const COLUMNS: [&str; 13] = [
    "ID",
    "element_name",
    "browser_combination",
    "page_title",
    "issue_title",
    "steps_to_reproduce",
    "actual_result",
    "expected_result",
    "recommendation",
    "wcag_sc",
    "category",
    "log_date",
    "reported_by",
];

/// Longest element snippet quoted in reproduction steps
const STEPS_SNIPPET_CHARS: usize = 200;

/// One unified report row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "ID")]
    pub id: usize,
    pub element_name: String,
    pub browser_combination: String,
    pub page_title: String,
    pub issue_title: String,
    pub steps_to_reproduce: String,
    pub actual_result: String,
    pub expected_result: String,
    pub recommendation: String,
    pub wcag_sc: String,
    pub category: String,
    pub log_date: String,
    pub reported_by: String,
}

/// Run-wide values shared by every row
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub page_title: String,
    pub run_date: NaiveDate,
    /// Reporter for judgment-derived rows
    pub model_label: String,
    /// Reporter for rule-derived rows
    pub programmatic_reporter: String,
    pub browser_combination: String,
}

impl ReportContext {
    pub fn new(
        page_title: impl Into<String>,
        run_date: NaiveDate,
        model_label: impl Into<String>,
        report: &ReportConfig,
    ) -> Self {
        Self {
            page_title: page_title.into(),
            run_date,
            model_label: model_label.into(),
            programmatic_reporter: report.programmatic_reporter.clone(),
            browser_combination: report.browser_combination.clone(),
        }
    }

    fn log_date(&self) -> String {
        self.run_date.format("%Y-%m-%d").to_string()
    }
}

fn rule_row(finding: &Finding, ctx: &ReportContext) -> ReportRow {
    let snippet = crate::dom::truncate_chars(&finding.element.snippet, STEPS_SNIPPET_CHARS);
    let steps = if finding.element.is_document() {
        "Inspect the page source".to_string()
    } else {
        format!("Inspect element: {}", snippet)
    };

    ReportRow {
        id: 0,
        element_name: finding.element.display_name(),
        browser_combination: ctx.browser_combination.clone(),
        page_title: ctx.page_title.clone(),
        issue_title: format!("{}: {}", finding.rule_id, finding.rule_name),
        steps_to_reproduce: steps,
        actual_result: finding.description.clone(),
        expected_result: format!(
            "Element should meet WCAG {} ({})",
            finding.wcag.criterion, finding.wcag.name
        ),
        recommendation: finding.suggestion.clone().unwrap_or_default(),
        wcag_sc: finding.wcag.criterion.clone(),
        category: format!("Programmatic / {}", finding.wcag.name),
        log_date: ctx.log_date(),
        reported_by: ctx.programmatic_reporter.clone(),
    }
}

fn draft_row(draft: RowDraft, wcag_sc: &str, ctx: &ReportContext) -> ReportRow {
    ReportRow {
        id: 0,
        element_name: draft.element_name,
        browser_combination: ctx.browser_combination.clone(),
        page_title: ctx.page_title.clone(),
        issue_title: draft.issue_title,
        steps_to_reproduce: draft.steps_to_reproduce,
        actual_result: draft.actual_result,
        expected_result: draft.expected_result,
        recommendation: draft.recommendation,
        wcag_sc: wcag_sc.to_string(),
        category: draft.category,
        log_date: ctx.log_date(),
        reported_by: ctx.model_label.clone(),
    }
}

fn error_row(result: &JudgmentResult, message: &str, wcag_sc: &str, ctx: &ReportContext) -> ReportRow {
    let spec = result.prompt.spec();
    draft_row(
        RowDraft {
            element_name: "N/A".to_string(),
            issue_title: format!("Normalizer failed for prompt {}", result.prompt),
            steps_to_reproduce: format!(
                "Re-run prompt {} ({}-{})",
                result.prompt, spec.checklist, spec.prompt_index
            ),
            actual_result: message.to_string(),
            expected_result: "Judgment response should be available and well-formed".to_string(),
            recommendation: "Review this prompt manually".to_string(),
            category: format!("{} / Error", spec.checklist.title()),
        },
        wcag_sc,
        ctx,
    )
}

fn judgment_rows(result: &JudgmentResult, ctx: &ReportContext) -> Vec<ReportRow> {
    let wcag_sc = result.prompt.spec().wcag_criteria.join(", ");

    let drafts = match &result.outcome {
        JudgmentOutcome::Parsed(value) => extract_rows(result.prompt, value),
        JudgmentOutcome::Failed(message) => {
            return vec![error_row(result, message, &wcag_sc, ctx)];
        }
    };

    match drafts {
        Ok(drafts) => drafts
            .into_iter()
            .map(|d| draft_row(d, &wcag_sc, ctx))
            .collect(),
        Err(e) => {
            warn!(prompt = result.prompt.name(), error = %e, "Could not normalize response");
            vec![error_row(result, &e.to_string(), &wcag_sc, ctx)]
        }
    }
}

/// Merge rule findings and judgment results into ordered, numbered rows
pub fn normalize(
    findings: &[Finding],
    judgments: &[JudgmentResult],
    ctx: &ReportContext,
) -> Vec<ReportRow> {
    let mut seen = HashSet::new();
    let mut rows: Vec<ReportRow> = findings
        .iter()
        .filter(|f| seen.insert(f.identity()))
        .map(|f| rule_row(f, ctx))
        .collect();
    let rule_rows = rows.len();

    let mut ordered: Vec<&JudgmentResult> = judgments.iter().collect();
    ordered.sort_by_key(|r| {
        let spec = r.prompt.spec();
        (spec.checklist, spec.prompt_index)
    });
    for result in ordered {
        rows.extend(judgment_rows(result, ctx));
    }

    for (i, row) in rows.iter_mut().enumerate() {
        row.id = i + 1;
    }

    debug!(
        rule_rows,
        judgment_rows = rows.len() - rule_rows,
        "Normalized report rows"
    );
    rows
}

/// First page title worth reporting: the document `<title>`, then the
/// first `<h1>`, then the supplied fallback (usually the file stem)
pub fn page_title_from(payloads: &crate::extract::Payloads, fallback: &str) -> String {
    payloads
        .get(crate::finding::Checklist::CL01)
        .and_then(|p| {
            p["page_title"]["title"]
                .as_str()
                .or_else(|| p["page_title"]["h1"].as_str())
        })
        .unwrap_or(fallback)
        .to_string()
}
