// SPDX-License-Identifier: PMPL-1.0-or-later
//! Integration tests for wcagbot

use chrono::NaiveDate;
use std::fs;
use std::path::Path;
use wcagbot::config::{load_config, write_default_config, Config};
use wcagbot::dom::resolve::LabelSource;
use wcagbot::dom::{self, Document};
use wcagbot::normalize::{normalize, ReportContext, COLUMNS};
use wcagbot::prompts::{judge_all, plan, PromptKind, ResponseDir};
use wcagbot::report::{generate_report, render_rows, OutputFormat, RowFormat};
use wcagbot::{audit_bytes, audit_file, scanner, suppress, Checklist};

fn audit(html: &str) -> wcagbot::AuditResult {
    audit_bytes(html.as_bytes(), Path::new("page.html"), &Config::default()).expect("audit should succeed")
}

fn rule_ids(result: &wcagbot::AuditResult) -> Vec<&str> {
    result.findings.findings.iter().map(|f| f.rule_id.as_str()).collect()
}

#[test]
fn test_accessible_fixture() {
    let result = audit_file(Path::new("tests/fixtures/accessible.html"), &Config::default())
        .expect("audit should succeed");

    let errors = result.findings.errors();
    assert!(
        errors.is_empty(),
        "Accessible fixture should have no errors, got: {:?}",
        errors.iter().map(|f| &f.rule_id).collect::<Vec<_>>()
    );
    assert_eq!(result.page_title, "Riverside Library - Membership");

    let ids = rule_ids(&result);
    for rule in ["NAV_001", "NAV_003", "LAND_005", "LAND_006", "HEAD_001", "FORM_REQUIRED_001"] {
        assert!(!ids.contains(&rule), "unexpected {}", rule);
    }
}

#[test]
fn test_inaccessible_fixture() {
    let result = audit_file(Path::new("tests/fixtures/inaccessible.html"), &Config::default())
        .expect("audit should succeed");

    assert!(result.findings.has_errors());
    let ids = rule_ids(&result);
    for rule in [
        "PAGE_TITLE_001",
        "LANG_001",
        "LAND_001",
        "LAND_005",
        "LAND_006",
        "HEAD_001",
        "HEAD_004",
        "LINK_001",
        "LINK_002",
        "IFRAME_001",
        "PARSE_001",
        "FOCUS_001",
        "TABLE_001",
        "TABLE_002",
        "FORM_LABEL_001",
        "FORM_LABEL_003",
        "FORM_GROUP_001",
        "FORM_INSTR_001",
        "FORM_ERROR_001",
        "FORM_CUSTOM_001",
        "NON_TEXT_001",
        "NON_TEXT_002",
        "NON_TEXT_006",
    ] {
        assert!(ids.contains(&rule), "expected {} in {:?}", rule, ids);
    }

    let head_skips = result.findings.by_rule("HEAD_001");
    assert_eq!(head_skips.len(), 1);
    assert_eq!(head_skips[0].element.tag, "h4");

    let duplicates = result.findings.by_rule("PARSE_001");
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].related.len(), 3);
}

#[test]
fn test_scenario_a_actionable_image_suppressed() {
    let result = audit(r##"<a href="#"><img src="x.png"></a>"##);
    let ids = rule_ids(&result);
    assert!(ids.contains(&"NON_TEXT_002"));
    assert!(!ids.contains(&"LINK_001"));

    let images = &result.payloads.get(Checklist::CL03).unwrap()["images"];
    assert_eq!(images["actionable"].as_array().unwrap().len(), 0);
    assert_eq!(images["missing"].as_array().unwrap().len(), 0);
}

#[test]
fn test_scenario_b_heading_skip() {
    let result = audit("<h1>Title</h1><h2>Intro</h2><h4>Details</h4>");
    let skips = result.findings.by_rule("HEAD_001");
    assert_eq!(skips.len(), 1);
    assert_eq!(skips[0].related[0].tag, "h2");
    assert_eq!(skips[0].element.tag, "h4");
}

#[test]
fn test_scenario_c_duplicate_navs() {
    let result = audit("<main><h1>x</h1></main><nav><a href='/a'>A</a></nav><nav><a href='/b'>B</a></nav>");
    let groups = result.findings.by_rule("LAND_005");
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].related.len(), 2);
}

#[test]
fn test_scenario_d_label_wins_over_placeholder() {
    let document = Document::parse_str(r#"<label for="f1">Name</label><input id="f1" placeholder="Enter name">"#).unwrap();
    let handle = document.handle();
    let input = handle.find_all(&["input"])[0];
    let name = handle.accessible_name(&input);
    assert_eq!(name.text, "Name");
    assert_eq!(name.source, LabelSource::LabelFor);
}

#[test]
fn test_duplicate_ids_resolve_to_first() {
    let document = Document::parse_str(r#"<p id="x">one</p><span id="x">two</span><div id="x">three</div>"#).unwrap();
    let handle = document.handle();
    let first = handle.id_index().get("x").unwrap();
    assert_eq!(dom::tag(&first), "p");
    assert_eq!(handle.id_index().duplicates()[0].occurrences.len(), 3);
}

#[test]
fn test_decorative_images_never_informative() {
    let result = audit(r#"<img src="a.png" alt=""><a href="/"><img src="b.png" alt=""></a>"#);
    let images = &result.payloads.get(Checklist::CL03).unwrap()["images"];
    assert_eq!(images["decorative"].as_array().unwrap().len(), 2);
    assert_eq!(images["informative"].as_array().unwrap().len(), 0);
    assert_eq!(images["missing"].as_array().unwrap().len(), 0);
}

#[test]
fn test_declared_latin1_decoding() {
    let bytes = b"<html lang=\"fr\"><head><title>Caf\xe9</title></head></html>";
    let config: Config = toml::from_str("[document]\ndeclared_encoding = \"iso-8859-1\"").unwrap();
    let result = audit_bytes(bytes, Path::new("cafe.html"), &config).unwrap();
    assert_eq!(result.page_title, "Café");
}

#[test]
fn test_invalid_utf8_never_fails() {
    let result = audit_bytes(b"<title>Bad \xff\xfe bytes</title>", Path::new("bad.html"), &Config::default()).unwrap();
    assert!(result.page_title.contains('\u{FFFD}'));
}

#[test]
fn test_suppression_table_conforms() {
    assert!(suppress::check_conformance().is_empty());
}

#[test]
fn test_empty_normalize_round_trip() {
    let ctx = ReportContext::new("Empty", NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(), "none", &Config::default().report);
    let rows = normalize(&[], &[], &ctx);
    assert!(rows.is_empty());
    let csv = render_rows(&rows, RowFormat::Csv).unwrap();
    assert_eq!(csv.lines().count(), 1);
}

#[test]
fn test_full_report_with_recorded_responses() {
    let result = audit_file(Path::new("tests/fixtures/inaccessible.html"), &Config::default()).unwrap();
    let plan = plan(&result.payloads, false);
    assert!(plan.requests.iter().any(|r| r.prompt == PromptKind::PlaceholderAsLabel));

    let responses = tempfile::tempdir().unwrap();
    fs::write(
        responses.path().join("link_clarity.json"),
        "```json\n[{\"text\": \"Home\", \"is_clear\": false, \"reason\": \"Too short\"}]\n```",
    )
    .unwrap();
    fs::write(
        responses.path().join("placeholder_as_label.json"),
        r#"{"verdict": "unexpected shape"}"#,
    )
    .unwrap();

    let judgments = judge_all(&ResponseDir::new(responses.path()), &plan.requests);
    assert_eq!(judgments.len(), plan.requests.len());

    let ctx = ReportContext::new(
        result.page_title.clone(),
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        "judge-model",
        &Config::default().report,
    );
    let rows = normalize(&result.findings.findings, &judgments, &ctx);

    let ids: Vec<usize> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, (1..=rows.len()).collect::<Vec<_>>());

    let split = rows
        .iter()
        .position(|r| r.reported_by != "Programmatic")
        .unwrap_or(rows.len());
    assert!(split > 0 && split <= result.findings.len());
    assert!(rows[split..].iter().all(|r| r.reported_by == "judge-model"));
    assert!(rows.iter().any(|r| r.issue_title == "Unclear link: \"Home\""));
    assert!(rows
        .iter()
        .any(|r| r.issue_title == "Normalizer failed for prompt placeholder_as_label"));
    assert_eq!(result.page_title, "Quick Shop");

    let csv = render_rows(&rows, RowFormat::Csv).unwrap();
    let header = csv.lines().next().unwrap();
    assert_eq!(header, COLUMNS.join(","));
}

#[test]
fn test_scan_directory_of_fixtures() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("pages")).unwrap();
    fs::create_dir_all(dir.path().join("node_modules")).unwrap();
    fs::copy("tests/fixtures/accessible.html", dir.path().join("pages/good.html")).unwrap();
    fs::copy("tests/fixtures/inaccessible.html", dir.path().join("pages/bad.htm")).unwrap();
    fs::copy("tests/fixtures/inaccessible.html", dir.path().join("node_modules/skip.html")).unwrap();

    let results = scanner::scan_directory(dir.path(), &Config::default()).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().any(|r| r.findings.has_errors()));

    let sarif = generate_report(&results, OutputFormat::Sarif);
    let parsed: serde_json::Value = serde_json::from_str(&sarif).unwrap();
    let uris: Vec<&str> = parsed["runs"][0]["results"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|r| r["locations"][0]["physicalLocation"]["artifactLocation"]["uri"].as_str())
        .collect();
    assert!(uris.iter().all(|u| u.ends_with("bad.htm")));
}

#[test]
fn test_config_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conf/.wcagbot.toml");
    write_default_config(&path).unwrap();

    let loaded = load_config(&path).unwrap();
    let defaults = Config::default();
    assert_eq!(loaded.document.snippet_chars, defaults.document.snippet_chars);
    assert_eq!(loaded.judgment.model_label, defaults.judgment.model_label);
    assert_eq!(loaded.report.browser_combination, defaults.report.browser_combination);
    assert_eq!(loaded.scan.exclude, defaults.scan.exclude);

    let missing = load_config(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(missing.log.level, "warn");
}
