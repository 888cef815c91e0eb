// SPDX-License-Identifier: PMPL-1.0-or-later
//! Per-prompt extraction of report rows from judgment responses.
//!
//! Three response shapes are understood: an array of per-element verdicts,
//! an object with an `issues` list, and a checklist summary object. A
//! response of the wrong shape is an `UnrecognizedResponseShape` error.

use crate::error::{AuditError, Result};
use crate::prompts::{PromptKind, ResponseShape};
use serde_json::{Map, Value};

/// Row content before shared columns and ids are filled in
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowDraft {
    pub element_name: String,
    pub issue_title: String,
    pub steps_to_reproduce: String,
    pub actual_result: String,
    pub expected_result: String,
    pub recommendation: String,
    pub category: String,
}

/// Name of a JSON value's type, for error messages
pub fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn unrecognized(prompt: PromptKind, found: impl Into<String>) -> AuditError {
    AuditError::UnrecognizedResponseShape {
        prompt: prompt.name().to_string(),
        found: found.into(),
    }
}

/// Rows for one prompt's parsed response
pub fn extract_rows(prompt: PromptKind, response: &Value) -> Result<Vec<RowDraft>> {
    match prompt.spec().shape {
        ResponseShape::Array => {
            let items = response
                .as_array()
                .ok_or_else(|| unrecognized(prompt, shape_of(response)))?;
            let mut rows = Vec::new();
            for item in items {
                let object = item
                    .as_object()
                    .ok_or_else(|| unrecognized(prompt, format!("array item of type {}", shape_of(item))))?;
                rows.extend(array_item(prompt, object));
            }
            Ok(rows)
        }
        ResponseShape::Object => {
            let object = response
                .as_object()
                .filter(|o| o.get("issues").is_some_and(Value::is_array))
                .ok_or_else(|| unrecognized(prompt, describe(response)))?;
            Ok(issue_object(prompt, object))
        }
        ResponseShape::Summary => {
            let object = response
                .as_object()
                .filter(|o| is_summary_object(o))
                .ok_or_else(|| unrecognized(prompt, describe(response)))?;
            Ok(summary_object(prompt, object))
        }
    }
}

/// `issues` must be a list and `summary` a string; at least one is present
fn is_summary_object(object: &Map<String, Value>) -> bool {
    let issues = object.get("issues");
    let summary = object.get("summary");
    (issues.is_some() || summary.is_some())
        && issues.map_or(true, Value::is_array)
        && summary.map_or(true, Value::is_string)
}

fn describe(value: &Value) -> String {
    match value.as_object() {
        Some(o) => {
            let keys: Vec<&str> = o.keys().map(String::as_str).collect();
            format!("object with keys [{}]", keys.join(", "))
        }
        None => shape_of(value).to_string(),
    }
}

fn str_field<'v>(item: &'v Map<String, Value>, key: &str) -> &'v str {
    item.get(key).and_then(Value::as_str).unwrap_or("")
}

fn non_blank<'v>(item: &'v Map<String, Value>, key: &str) -> Option<&'v str> {
    item.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// A verdict flag that defaults to "fine" when absent
fn passes(item: &Map<String, Value>, key: &str) -> bool {
    item.get(key).and_then(Value::as_bool).unwrap_or(true)
}

/// Issue entries are strings or objects with a description
fn issue_text(issue: &Value) -> String {
    match issue {
        Value::String(s) => s.clone(),
        Value::Object(o) => ["description", "issue", "message"]
            .iter()
            .find_map(|k| o.get(*k).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| issue.to_string()),
        other => other.to_string(),
    }
}

fn issues(item: &Map<String, Value>) -> Vec<String> {
    item.get("issues")
        .and_then(Value::as_array)
        .map(|list| list.iter().map(issue_text).collect())
        .unwrap_or_default()
}

fn recommendation(item: &Map<String, Value>) -> String {
    non_blank(item, "suggested_improvement")
        .or_else(|| non_blank(item, "recommendation"))
        .unwrap_or("")
        .to_string()
}

fn array_item(prompt: PromptKind, item: &Map<String, Value>) -> Option<RowDraft> {
    match prompt {
        PromptKind::LinkClarity => {
            if passes(item, "is_clear") {
                return None;
            }
            let text = non_blank(item, "text").unwrap_or("(no text)");
            Some(RowDraft {
                element_name: format!("<a> \"{}\"", text),
                issue_title: format!("Unclear link: \"{}\"", text),
                actual_result: str_field(item, "reason").to_string(),
                expected_result: "Link text should clearly describe its destination when read alone"
                    .to_string(),
                recommendation: recommendation(item),
                category: "Semantic Structure / Links".to_string(),
                ..Default::default()
            })
        }
        PromptKind::IframeTitles => {
            if passes(item, "is_descriptive") {
                return None;
            }
            let title = non_blank(item, "title").unwrap_or("(no title)");
            Some(RowDraft {
                element_name: format!("<iframe> \"{}\"", title),
                issue_title: format!("Non-descriptive iframe title: \"{}\"", title),
                actual_result: str_field(item, "reason").to_string(),
                expected_result: "Iframe title should clearly describe the iframe content".to_string(),
                recommendation: recommendation(item),
                category: "Semantic Structure / Iframes".to_string(),
                ..Default::default()
            })
        }
        PromptKind::LabelQuality => {
            if passes(item, "is_descriptive") {
                return None;
            }
            let field_id = non_blank(item, "field_id").unwrap_or("unknown");
            let field_type = non_blank(item, "field_type").unwrap_or("input");
            let label = non_blank(item, "effective_label").unwrap_or("(no label)");
            Some(RowDraft {
                element_name: format!("<{} id=\"{}\">", field_type, field_id),
                issue_title: format!("Poor label quality: \"{}\"", label),
                actual_result: issues(item).join("; "),
                expected_result: "Form field labels should be descriptive and meaningful".to_string(),
                recommendation: recommendation(item),
                category: "Forms / Label Quality".to_string(),
                ..Default::default()
            })
        }
        PromptKind::DecorativeVerification => {
            if passes(item, "likely_decorative") {
                return None;
            }
            let src = str_field(item, "src");
            Some(RowDraft {
                element_name: format!("<img src=\"{}\" alt=\"\">", src),
                issue_title: format!("Possibly mis-marked as decorative: {}", src),
                actual_result: str_field(item, "reason").to_string(),
                expected_result: "Image marked as decorative (alt=\"\") should truly be decorative"
                    .to_string(),
                recommendation: recommendation(item),
                category: "Non-text Content / Decorative Verification".to_string(),
                ..Default::default()
            })
        }
        _ => issue_item(prompt, item),
    }
}

/// Array items that report problems through a non-empty `issues` list
fn issue_item(prompt: PromptKind, item: &Map<String, Value>) -> Option<RowDraft> {
    let found = issues(item);
    if found.is_empty() {
        return None;
    }

    let (element_name, issue_title, expected, category) = match prompt {
        PromptKind::RequiredFieldIndicators => {
            let label = non_blank(item, "effective_label").unwrap_or("(no label)");
            (
                format!("<input id=\"{}\">", non_blank(item, "field_id").unwrap_or("unknown")),
                format!("Required field not clearly indicated: \"{}\"", label),
                "Required field status should be communicated visually and programmatically",
                "Forms / Required Fields",
            )
        }
        PromptKind::InformativeAltQuality => (
            format!("<img src=\"{}\">", str_field(item, "src")),
            format!(
                "Poor alt text quality ({}): \"{}\"",
                non_blank(item, "quality").unwrap_or("poor"),
                str_field(item, "alt")
            ),
            "Alt text should accurately and concisely describe image content",
            "Non-text Content / Informative Images",
        ),
        PromptKind::ActionableImageAlt => (
            format!(
                "<img src=\"{}\"> ({})",
                str_field(item, "src"),
                non_blank(item, "context").unwrap_or("in_link")
            ),
            format!(
                "Actionable image alt issue: \"{}\"",
                non_blank(item, "alt").unwrap_or("(empty)")
            ),
            "Images in links/buttons should describe the action/destination, not appearance",
            "Non-text Content / Actionable Images",
        ),
        PromptKind::SvgAccessibility => {
            let label = non_blank(item, "aria_label")
                .or_else(|| non_blank(item, "title"))
                .unwrap_or("(unlabeled)");
            (
                format!("<svg> \"{}\"", label),
                format!("SVG accessibility issue: {}", label),
                "SVGs should have role=\"img\" and an accessible name via title + aria-labelledby",
                "Non-text Content / SVGs",
            )
        }
        PromptKind::IconFontAccessibility => {
            let classes = str_field(item, "classes");
            (
                format!("<i class=\"{}\">", classes),
                format!("Icon font issue ({}): {}", str_field(item, "pattern"), classes),
                "Icon fonts should be properly labeled or hidden from assistive technology",
                "Non-text Content / Icon Fonts",
            )
        }
        PromptKind::TableSemantics => {
            let caption = non_blank(item, "caption").unwrap_or("(no caption)");
            (
                format!("<table> \"{}\"", caption),
                format!("Table semantics issue: \"{}\"", caption),
                "Data tables should expose headers and a caption that describe their structure",
                "Semantic Structure / Tables",
            )
        }
        PromptKind::PlaceholderAsLabel => (
            format!("<input id=\"{}\">", non_blank(item, "field_id").unwrap_or("unknown")),
            format!(
                "Placeholder used as label: \"{}\"",
                non_blank(item, "placeholder").unwrap_or("(no placeholder)")
            ),
            "Form fields should have a persistent programmatic label, not only a placeholder",
            "Forms / Placeholder Labels",
        ),
        PromptKind::GroupLabels => {
            let legend = non_blank(item, "legend").unwrap_or("(no legend)");
            (
                format!("<fieldset> \"{}\"", legend),
                format!("Group label issue: \"{}\"", legend),
                "Related controls should be grouped with a descriptive legend",
                "Forms / Group Labels",
            )
        }
        PromptKind::FormInstructions => (
            format!("<input id=\"{}\">", non_blank(item, "field_id").unwrap_or("unknown")),
            format!(
                "Form instructions issue: \"{}\"",
                non_blank(item, "instructions").unwrap_or("(none)")
            ),
            "Instructions should be programmatically associated and sufficient to complete the field",
            "Forms / Instructions",
        ),
        PromptKind::ComplexDescriptions => (
            format!("<img src=\"{}\">", str_field(item, "src")),
            format!(
                "Complex image lacks adequate description: \"{}\"",
                non_blank(item, "alt").unwrap_or("(no alt)")
            ),
            "Charts and diagrams should have a long description conveying their data",
            "Non-text Content / Complex Images",
        ),
        PromptKind::MediaCaptions => {
            let kind = non_blank(item, "type").unwrap_or("media");
            (
                format!("<{} src=\"{}\">", kind, str_field(item, "src")),
                format!("Media alternative issue: {}", kind),
                "Prerecorded media should provide captions and a text alternative",
                "Non-text Content / Media",
            )
        }
        other => (
            format!("<{}>", other.name()),
            format!("{} issue", other.name()),
            "Content should meet the cited success criteria",
            other.spec().checklist.title(),
        ),
    };

    Some(RowDraft {
        element_name,
        issue_title,
        actual_result: found.join("; "),
        expected_result: expected.to_string(),
        recommendation: recommendation(item),
        category: category.to_string(),
        ..Default::default()
    })
}

fn issue_object(prompt: PromptKind, object: &Map<String, Value>) -> Vec<RowDraft> {
    let found = issues(object);
    match prompt {
        PromptKind::PageTitle => {
            let improved = str_field(object, "improved_example").to_string();
            found
                .into_iter()
                .map(|issue| RowDraft {
                    element_name: "<title>".to_string(),
                    issue_title: format!("Page Title: {}", issue),
                    expected_result: "Page title should be descriptive and match H1 content".to_string(),
                    recommendation: improved.clone(),
                    category: "Semantic Structure / Page Title".to_string(),
                    actual_result: issue,
                    ..Default::default()
                })
                .collect()
        }
        PromptKind::HeadingStructure => {
            let mut rows: Vec<RowDraft> = found
                .into_iter()
                .map(|issue| RowDraft {
                    element_name: "<h1>-<h6>".to_string(),
                    issue_title: format!("Heading Structure: {}", issue),
                    expected_result: "Headings should form a logical content outline".to_string(),
                    recommendation: issue.clone(),
                    category: "Semantic Structure / Headings".to_string(),
                    actual_result: issue,
                    ..Default::default()
                })
                .collect();
            let vague = object
                .get("vague_headings")
                .and_then(Value::as_array)
                .into_iter()
                .flatten()
                .map(issue_text);
            rows.extend(vague.map(|heading| RowDraft {
                element_name: "<h1>-<h6>".to_string(),
                issue_title: format!("Vague heading: \"{}\"", heading),
                actual_result: format!("Heading \"{}\" is vague or unclear", heading),
                expected_result: "Headings should meaningfully describe their sections".to_string(),
                recommendation: format!("Replace \"{}\" with a more descriptive heading", heading),
                category: "Semantic Structure / Headings".to_string(),
                ..Default::default()
            }));
            rows
        }
        _ => found
            .into_iter()
            .map(|issue| RowDraft {
                element_name: "<main>/<nav>/<header>/<footer>".to_string(),
                issue_title: format!("Landmark issue: {}", issue),
                expected_result: "Landmark structure should be appropriate and balanced".to_string(),
                recommendation: issue.clone(),
                category: "Semantic Structure / Landmarks".to_string(),
                actual_result: issue,
                ..Default::default()
            })
            .collect(),
    }
}

fn summary_object(prompt: PromptKind, object: &Map<String, Value>) -> Vec<RowDraft> {
    let checklist = prompt.spec().checklist;
    let category = format!("{} / Summary", checklist.title());
    let found = issues(object);

    if found.is_empty() {
        return non_blank(object, "summary")
            .map(|summary| RowDraft {
                element_name: "Page".to_string(),
                issue_title: format!("{} summary", checklist.title()),
                actual_result: summary.to_string(),
                expected_result: format!("Page should meet all {} criteria", checklist.title()),
                recommendation: recommendation(object),
                category: category.clone(),
                ..Default::default()
            })
            .into_iter()
            .collect();
    }

    found
        .into_iter()
        .map(|issue| RowDraft {
            element_name: "Page".to_string(),
            issue_title: format!("{} summary: {}", checklist.title(), issue),
            expected_result: format!("Page should meet all {} criteria", checklist.title()),
            recommendation: recommendation(object),
            category: category.clone(),
            actual_result: issue,
            ..Default::default()
        })
        .collect()
}
