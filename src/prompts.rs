// SPDX-License-Identifier: PMPL-1.0-or-later
//! Judgment prompt registry, payload slicers and the judge seam.
//!
//! Each [`PromptKind`] names one quality-judgment task over one checklist
//! payload. [`plan`] slices the (suppressed) payloads into requests,
//! [`judge_all`] hands them to a [`Judge`] and collects per-prompt outcomes.
//! A failing prompt never stops its siblings.

use crate::error::{AuditError, Result};
use crate::extract::Payloads;
use crate::finding::Checklist;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static CODE_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*\n?(.*?)```").expect("valid regex"));

/// `"value" or alternative text` inside an otherwise JSON response
static INLINE_ALTERNATIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"("(?:[^"\\]|\\.)*")\s+or\s+[^,\]\}]+"#).expect("valid regex")
});

/// Response shape a prompt asks the judge to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// A list of per-element verdicts
    Array,
    /// An object carrying an `issues` list
    Object,
    /// A whole-checklist summary object
    Summary,
}

/// One downstream judgment task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    PageTitle,
    HeadingStructure,
    LinkClarity,
    TableSemantics,
    IframeTitles,
    LandmarkStructure,
    SemanticSummary,
    LabelQuality,
    PlaceholderAsLabel,
    GroupLabels,
    RequiredFieldIndicators,
    FormInstructions,
    FormSummary,
    InformativeAltQuality,
    DecorativeVerification,
    ActionableImageAlt,
    ComplexDescriptions,
    SvgAccessibility,
    IconFontAccessibility,
    MediaCaptions,
    NontextSummary,
}

impl PromptKind {
    /// Stable name, also the response file stem
    pub fn name(self) -> &'static str {
        match self {
            PromptKind::PageTitle => "page_title",
            PromptKind::HeadingStructure => "heading_structure",
            PromptKind::LinkClarity => "link_clarity",
            PromptKind::TableSemantics => "table_semantics",
            PromptKind::IframeTitles => "iframe_titles",
            PromptKind::LandmarkStructure => "landmark_structure",
            PromptKind::SemanticSummary => "semantic_summary",
            PromptKind::LabelQuality => "label_quality",
            PromptKind::PlaceholderAsLabel => "placeholder_as_label",
            PromptKind::GroupLabels => "group_labels",
            PromptKind::RequiredFieldIndicators => "required_field_indicators",
            PromptKind::FormInstructions => "form_instructions",
            PromptKind::FormSummary => "form_summary",
            PromptKind::InformativeAltQuality => "informative_alt_quality",
            PromptKind::DecorativeVerification => "decorative_verification",
            PromptKind::ActionableImageAlt => "actionable_image_alt",
            PromptKind::ComplexDescriptions => "complex_descriptions",
            PromptKind::SvgAccessibility => "svg_accessibility",
            PromptKind::IconFontAccessibility => "icon_font_accessibility",
            PromptKind::MediaCaptions => "media_captions",
            PromptKind::NontextSummary => "nontext_summary",
        }
    }

    /// Registry entry for this prompt. `REGISTRY` lists prompts in variant
    /// declaration order, so the discriminant is the index.
    pub fn spec(self) -> &'static PromptSpec {
        &REGISTRY[self as usize]
    }
}

impl std::fmt::Display for PromptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for PromptKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        REGISTRY
            .iter()
            .map(|spec| spec.kind)
            .find(|k| k.name() == s)
            .ok_or_else(|| format!("Unknown prompt: {}", s))
    }
}

/// Produces the JSON slice a prompt sees from its checklist payload
pub type SliceFn = fn(&Value) -> Value;

/// Registry metadata for one prompt
pub struct PromptSpec {
    pub kind: PromptKind,
    pub checklist: Checklist,
    /// 1-based position within its checklist
    pub prompt_index: u8,
    pub wcag_criteria: &'static [&'static str],
    pub shape: ResponseShape,
    /// Only run when summaries are requested
    pub is_summary: bool,
    /// Skip the judge call when the slice is empty
    pub skip_if_empty: bool,
    pub slice: SliceFn,
}

impl std::fmt::Debug for PromptSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptSpec")
            .field("kind", &self.kind)
            .field("checklist", &self.checklist)
            .field("prompt_index", &self.prompt_index)
            .field("shape", &self.shape)
            .finish()
    }
}

const fn prompt(
    kind: PromptKind,
    checklist: Checklist,
    prompt_index: u8,
    wcag_criteria: &'static [&'static str],
    shape: ResponseShape,
    slice: SliceFn,
) -> PromptSpec {
    PromptSpec {
        kind,
        checklist,
        prompt_index,
        wcag_criteria,
        shape,
        is_summary: matches!(shape, ResponseShape::Summary),
        skip_if_empty: true,
        slice,
    }
}

use Checklist::{CL01, CL02, CL03};
use ResponseShape::{Array, Object, Summary};

/// Every prompt, in checklist then index order
pub static REGISTRY: &[PromptSpec] = &[
    prompt(PromptKind::PageTitle, CL01, 1, &["2.4.2"], Object, slice_page_title),
    prompt(PromptKind::HeadingStructure, CL01, 2, &["1.3.1", "2.4.6"], Object, slice_headings),
    prompt(PromptKind::LinkClarity, CL01, 3, &["2.4.4"], Array, slice_flagged_links),
    prompt(PromptKind::TableSemantics, CL01, 4, &["1.3.1"], Array, slice_tables),
    prompt(PromptKind::IframeTitles, CL01, 5, &["4.1.2"], Array, slice_iframes),
    prompt(PromptKind::LandmarkStructure, CL01, 6, &["1.3.1"], Object, slice_landmarks),
    prompt(
        PromptKind::SemanticSummary,
        CL01,
        7,
        &["1.3.1", "2.4.2", "2.4.4", "2.4.6", "3.1.1", "4.1.2"],
        Summary,
        whole,
    ),
    prompt(PromptKind::LabelQuality, CL02, 1, &["1.3.1", "2.4.6"], Array, slice_labelled_fields),
    prompt(PromptKind::PlaceholderAsLabel, CL02, 2, &["1.3.1"], Array, slice_placeholder_fields),
    prompt(PromptKind::GroupLabels, CL02, 3, &["1.3.1"], Array, slice_form_groups),
    prompt(PromptKind::RequiredFieldIndicators, CL02, 4, &["3.3.2"], Array, slice_required_fields),
    prompt(PromptKind::FormInstructions, CL02, 5, &["3.3.2"], Array, slice_instructed_fields),
    prompt(PromptKind::FormSummary, CL02, 6, &["1.3.1", "2.4.6", "3.3.2"], Summary, whole),
    prompt(PromptKind::InformativeAltQuality, CL03, 1, &["1.1.1"], Array, slice_informative_images),
    prompt(PromptKind::DecorativeVerification, CL03, 2, &["1.1.1"], Array, slice_decorative_images),
    prompt(PromptKind::ActionableImageAlt, CL03, 3, &["1.1.1", "2.4.4"], Array, slice_actionable_images),
    prompt(PromptKind::ComplexDescriptions, CL03, 4, &["1.1.1"], Array, slice_complex_images),
    prompt(PromptKind::SvgAccessibility, CL03, 5, &["1.1.1"], Array, slice_svgs),
    prompt(PromptKind::IconFontAccessibility, CL03, 6, &["1.1.1"], Array, slice_icon_fonts),
    prompt(PromptKind::MediaCaptions, CL03, 7, &["1.2.1", "1.2.2", "1.2.3"], Array, slice_media),
    prompt(
        PromptKind::NontextSummary,
        CL03,
        8,
        &["1.1.1", "1.2.1", "1.2.2", "1.2.3"],
        Summary,
        whole,
    ),
];

/// Prompts registered under one checklist
pub fn prompts_for(checklist: Checklist) -> impl Iterator<Item = &'static PromptSpec> {
    REGISTRY.iter().filter(move |s| s.checklist == checklist)
}

// Slicers

fn whole(payload: &Value) -> Value {
    payload.clone()
}

fn slice_page_title(payload: &Value) -> Value {
    payload["page_title"].clone()
}

fn slice_headings(payload: &Value) -> Value {
    json!({
        "page_title": payload["page_title"],
        "headings": payload["headings"],
    })
}

fn slice_flagged_links(payload: &Value) -> Value {
    payload["flagged_links"].clone()
}

fn slice_tables(payload: &Value) -> Value {
    payload["tables"].clone()
}

fn slice_iframes(payload: &Value) -> Value {
    payload["iframes"].clone()
}

fn slice_landmarks(payload: &Value) -> Value {
    payload["landmarks"].clone()
}

fn form_fields(payload: &Value) -> impl Iterator<Item = &Value> {
    payload["forms"]
        .as_array()
        .into_iter()
        .flatten()
        .flat_map(|form| form["fields"].as_array().into_iter().flatten())
}

/// JSON truthiness: non-null, non-false, non-empty
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(_) => true,
    }
}

fn fields_where(payload: &Value, keep: impl Fn(&Value) -> bool) -> Value {
    Value::Array(form_fields(payload).filter(|f| keep(*f)).cloned().collect())
}

fn slice_labelled_fields(payload: &Value) -> Value {
    fields_where(payload, |f| truthy(&f["effective_label"]))
}

fn slice_placeholder_fields(payload: &Value) -> Value {
    fields_where(payload, |f| f["label_source"] == "placeholder_only")
}

fn slice_required_fields(payload: &Value) -> Value {
    fields_where(payload, |f| truthy(&f["required"]))
}

fn slice_instructed_fields(payload: &Value) -> Value {
    fields_where(payload, |f| truthy(&f["instructions"]))
}

fn slice_form_groups(payload: &Value) -> Value {
    Value::Array(
        payload["forms"]
            .as_array()
            .into_iter()
            .flatten()
            .flat_map(|form| form["groups"].as_array().into_iter().flatten())
            .cloned()
            .collect(),
    )
}

fn slice_informative_images(payload: &Value) -> Value {
    payload["images"]["informative"].clone()
}

fn slice_decorative_images(payload: &Value) -> Value {
    payload["images"]["decorative"].clone()
}

fn slice_actionable_images(payload: &Value) -> Value {
    payload["images"]["actionable"].clone()
}

fn slice_complex_images(payload: &Value) -> Value {
    payload["images"]["complex"].clone()
}

fn slice_svgs(payload: &Value) -> Value {
    payload["svgs"].clone()
}

fn slice_icon_fonts(payload: &Value) -> Value {
    payload["icon_fonts"].clone()
}

fn slice_media(payload: &Value) -> Value {
    payload["media"].clone()
}

/// `[]`, `{}`, `null` and `""` carry nothing worth judging
pub fn is_empty_slice(slice: &Value) -> bool {
    match slice {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        _ => false,
    }
}

/// One prompt ready to send to a judge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgmentRequest {
    pub prompt: PromptKind,
    pub checklist: Checklist,
    pub prompt_index: u8,
    pub wcag_criteria: Vec<String>,
    pub payload_slice: Value,
}

/// Why a prompt was not planned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    SummaryNotRequested,
    EmptyPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedPrompt {
    pub prompt: PromptKind,
    pub reason: SkipReason,
}

/// Requests to send plus the prompts left out
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub requests: Vec<JudgmentRequest>,
    pub skipped: Vec<SkippedPrompt>,
}

/// Slice the payloads into judgment requests, in registry order
pub fn plan(payloads: &Payloads, include_summaries: bool) -> Plan {
    let mut plan = Plan::default();

    for spec in REGISTRY {
        if spec.is_summary && !include_summaries {
            plan.skipped.push(SkippedPrompt {
                prompt: spec.kind,
                reason: SkipReason::SummaryNotRequested,
            });
            continue;
        }

        let slice = payloads
            .get(spec.checklist)
            .map(spec.slice)
            .unwrap_or(Value::Null);

        if spec.skip_if_empty && is_empty_slice(&slice) {
            debug!(prompt = spec.kind.name(), "Skipping prompt with empty payload");
            plan.skipped.push(SkippedPrompt {
                prompt: spec.kind,
                reason: SkipReason::EmptyPayload,
            });
            continue;
        }

        plan.requests.push(JudgmentRequest {
            prompt: spec.kind,
            checklist: spec.checklist,
            prompt_index: spec.prompt_index,
            wcag_criteria: spec.wcag_criteria.iter().map(|c| c.to_string()).collect(),
            payload_slice: slice,
        });
    }

    info!(
        planned = plan.requests.len(),
        skipped = plan.skipped.len(),
        "Planned judgment prompts"
    );
    plan
}

/// The quality-judgment capability: takes a request, returns raw response text
pub trait Judge {
    fn judge(&self, request: &JudgmentRequest) -> Result<String>;
}

/// What came back for one prompt
#[derive(Debug, Clone, PartialEq)]
pub enum JudgmentOutcome {
    Parsed(Value),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct JudgmentResult {
    pub prompt: PromptKind,
    pub outcome: JudgmentOutcome,
}

impl JudgmentResult {
    pub fn parsed(prompt: PromptKind, value: Value) -> Self {
        Self {
            prompt,
            outcome: JudgmentOutcome::Parsed(value),
        }
    }

    pub fn failed(prompt: PromptKind, message: impl Into<String>) -> Self {
        Self {
            prompt,
            outcome: JudgmentOutcome::Failed(message.into()),
        }
    }
}

/// Send every request, recording failures per prompt
pub fn judge_all(judge: &dyn Judge, requests: &[JudgmentRequest]) -> Vec<JudgmentResult> {
    requests
        .iter()
        .map(|request| {
            let outcome = judge
                .judge(request)
                .and_then(|text| parse_response(&text));
            match outcome {
                Ok(value) => JudgmentResult::parsed(request.prompt, value),
                Err(e) => {
                    warn!(prompt = request.prompt.name(), error = %e, "Judgment failed");
                    JudgmentResult::failed(request.prompt, e.to_string())
                }
            }
        })
        .collect()
}

/// Body of a fenced code block, or the trimmed text
pub fn strip_code_fence(text: &str) -> &str {
    CODE_FENCE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or_else(|| text.trim())
}

/// Cut `"a" or b` back to `"a"`
pub fn repair_json(text: &str) -> String {
    INLINE_ALTERNATIVE.replace_all(text, "$1").into_owned()
}

/// Parse a judge response, retrying once after repair
pub fn parse_response(text: &str) -> Result<Value> {
    let cleaned = strip_code_fence(text);
    match serde_json::from_str(cleaned) {
        Ok(value) => Ok(value),
        Err(first) => {
            debug!(error = %first, "Response is not valid JSON, attempting repair");
            Ok(serde_json::from_str(&repair_json(cleaned))?)
        }
    }
}

/// Replays recorded responses from `<dir>/<prompt_name>.json`
///
/// A file holds either the raw response text or a saved run record with an
/// `api_result { success, response, error }` object.
#[derive(Debug, Clone)]
pub struct ResponseDir {
    dir: PathBuf,
}

impl ResponseDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, prompt: PromptKind) -> PathBuf {
        self.dir.join(format!("{}.json", prompt.name()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Judge for ResponseDir {
    fn judge(&self, request: &JudgmentRequest) -> Result<String> {
        let path = self.path_for(request.prompt);
        let failed = |message: String| AuditError::JudgmentFailed {
            prompt: request.prompt.name().to_string(),
            message,
        };

        if !path.exists() {
            return Err(failed(format!("no recorded response at {}", path.display())));
        }
        let text = std::fs::read_to_string(&path)?;

        let record = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|v| v.get("api_result").cloned());
        let Some(api_result) = record else {
            return Ok(text);
        };

        if api_result["success"] == Value::Bool(false) {
            let error = api_result["error"].as_str().unwrap_or("unknown error");
            return Err(failed(error.to_string()));
        }
        api_result["response"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| failed("recorded api_result has no response text".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::extract::extract_all;
    use std::collections::HashSet;

    fn payloads(html: &str) -> Payloads {
        let doc = Document::parse_str(html).unwrap();
        let h = doc.handle();
        extract_all(&h).unwrap()
    }

    struct Canned(&'static str);

    impl Judge for Canned {
        fn judge(&self, request: &JudgmentRequest) -> Result<String> {
            if request.prompt == PromptKind::PageTitle {
                return Err(AuditError::JudgmentFailed {
                    prompt: request.prompt.name().to_string(),
                    message: "timeout".to_string(),
                });
            }
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_registry_shape() {
        assert_eq!(REGISTRY.len(), 21);
        let names: HashSet<&str> = REGISTRY.iter().map(|s| s.kind.name()).collect();
        assert_eq!(names.len(), 21);
        assert_eq!(prompts_for(Checklist::CL01).count(), 7);
        assert_eq!(prompts_for(Checklist::CL02).count(), 6);
        assert_eq!(prompts_for(Checklist::CL03).count(), 8);

        for checklist in Checklist::ALL {
            let indices: Vec<u8> = prompts_for(checklist).map(|s| s.prompt_index).collect();
            let expected: Vec<u8> = (1..=indices.len() as u8).collect();
            assert_eq!(indices, expected);
        }
        assert_eq!(REGISTRY.iter().filter(|s| s.is_summary).count(), 3);
    }

    #[test]
    fn test_registry_indexed_by_discriminant() {
        for (i, spec) in REGISTRY.iter().enumerate() {
            assert_eq!(spec.kind as usize, i, "{} is out of place", spec.kind);
        }
        assert_eq!(PromptKind::NontextSummary as usize, REGISTRY.len() - 1);
    }

    #[test]
    fn test_kind_round_trip() {
        for spec in REGISTRY {
            assert_eq!(spec.kind.name().parse::<PromptKind>().unwrap(), spec.kind);
            assert_eq!(spec.kind.spec().kind, spec.kind);
        }
        assert!("nope".parse::<PromptKind>().is_err());
    }

    #[test]
    fn test_empty_slices() {
        assert!(is_empty_slice(&json!([])));
        assert!(is_empty_slice(&json!({})));
        assert!(is_empty_slice(&Value::Null));
        assert!(is_empty_slice(&json!("")));
        assert!(!is_empty_slice(&json!([1])));
        assert!(!is_empty_slice(&json!({"title": null})));
    }

    #[test]
    fn test_plan_skips_empty_and_summaries() {
        let p = payloads(r#"<html><head><title>Shop</title></head><body><h1>Shop</h1></body></html>"#);
        let plan = plan(&p, false);
        let planned: Vec<PromptKind> = plan.requests.iter().map(|r| r.prompt).collect();
        assert_eq!(planned, vec![PromptKind::PageTitle, PromptKind::HeadingStructure]);
        assert!(plan.skipped.contains(&SkippedPrompt {
            prompt: PromptKind::SemanticSummary,
            reason: SkipReason::SummaryNotRequested,
        }));
        assert!(plan.skipped.contains(&SkippedPrompt {
            prompt: PromptKind::LinkClarity,
            reason: SkipReason::EmptyPayload,
        }));
    }

    #[test]
    fn test_plan_with_summaries() {
        let p = payloads("<p>Hello</p>");
        let plan = plan(&p, true);
        let planned: Vec<PromptKind> = plan.requests.iter().map(|r| r.prompt).collect();
        assert!(planned.contains(&PromptKind::SemanticSummary));
        assert!(planned.contains(&PromptKind::FormSummary));
        assert!(planned.contains(&PromptKind::NontextSummary));
    }

    #[test]
    fn test_form_slicers() {
        let p = payloads(
            r#"<form>
<label for="a">Name *</label><input id="a" required>
<input placeholder="Email">
<input aria-label="Phone" aria-describedby="h"><p id="h">Digits only</p>
<fieldset><legend>Plan</legend><input type="radio" aria-label="Basic"></fieldset>
</form>"#,
        );
        let cl02 = p.get(Checklist::CL02).unwrap();
        assert_eq!(slice_labelled_fields(cl02).as_array().unwrap().len(), 3);
        assert_eq!(slice_placeholder_fields(cl02).as_array().unwrap().len(), 1);
        assert_eq!(slice_required_fields(cl02).as_array().unwrap().len(), 1);
        assert_eq!(slice_instructed_fields(cl02).as_array().unwrap().len(), 1);
        assert_eq!(slice_form_groups(cl02)[0]["legend"], "Plan");
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fence("Here:\n```\n{}\n```\nthanks"), "{}");
        assert_eq!(strip_code_fence("  [] "), "[]");
    }

    #[test]
    fn test_parse_response_repairs_alternatives() {
        let text = r#"```json
[{"text": "More", "suggested_improvement": "Read the report" or "View report"}]
```"#;
        let value = parse_response(text).unwrap();
        assert_eq!(value[0]["suggested_improvement"], "Read the report");
        assert!(parse_response("not json at all").is_err());
    }

    #[test]
    fn test_judge_all_records_failures() {
        let p = payloads(r#"<title>Shop</title><h1>Shop</h1><a href="/x">here</a>"#);
        let plan = plan(&p, false);
        let results = judge_all(&Canned("[]"), &plan.requests);
        assert_eq!(results.len(), plan.requests.len());
        assert!(matches!(results[0].outcome, JudgmentOutcome::Failed(_)));
        assert!(results[1..]
            .iter()
            .all(|r| r.outcome == JudgmentOutcome::Parsed(json!([]))));
    }

    #[test]
    fn test_response_dir_replay() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("link_clarity.json"), "```json\n[]\n```").unwrap();
        std::fs::write(
            dir.path().join("iframe_titles.json"),
            r#"{"prompt_name": "iframe_titles", "api_result": {"success": true, "response": "[{\"title\": \"x\"}]"}}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("table_semantics.json"),
            r#"{"api_result": {"success": false, "error": "rate limited"}}"#,
        )
        .unwrap();

        let judge = ResponseDir::new(dir.path());
        let request = |prompt: PromptKind| JudgmentRequest {
            prompt,
            checklist: prompt.spec().checklist,
            prompt_index: prompt.spec().prompt_index,
            wcag_criteria: vec![],
            payload_slice: json!([]),
        };
        let results = judge_all(
            &judge,
            &[
                request(PromptKind::LinkClarity),
                request(PromptKind::IframeTitles),
                request(PromptKind::TableSemantics),
                request(PromptKind::MediaCaptions),
            ],
        );
        assert_eq!(results[0].outcome, JudgmentOutcome::Parsed(json!([])));
        assert_eq!(results[1].outcome, JudgmentOutcome::Parsed(json!([{"title": "x"}])));
        assert!(matches!(&results[2].outcome, JudgmentOutcome::Failed(m) if m.contains("rate limited")));
        assert!(matches!(&results[3].outcome, JudgmentOutcome::Failed(m) if m.contains("no recorded response")));
    }
}
