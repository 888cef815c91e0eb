// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report generation.
//!
//! Rule findings can be rendered as:
//! - Text: human-readable findings grouped by severity with WCAG references
//! - JSON: structured findings per audited document
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration
//!
//! Unified report rows are written as CSV or JSON with the fixed column set.

use crate::audit::AuditResult;
use crate::error::Result;
use crate::finding::Severity;
use crate::normalize::{ReportRow, COLUMNS, REPORT_SCHEMA_VERSION};
use serde::Serialize;
use std::io::Write;

/// Output format for findings reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
    /// SARIF for IDE/CI integration
    Sarif,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Sarif => write!(f, "sarif"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "sarif" => Ok(OutputFormat::Sarif),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Output format for unified report rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFormat {
    Csv,
    Json,
}

/// Generate a findings report over one or more audited documents
pub fn generate_report(results: &[AuditResult], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => generate_text_report(results),
        OutputFormat::Json => generate_json_report(results),
        OutputFormat::Sarif => generate_sarif_report(results),
    }
}

fn generate_text_report(results: &[AuditResult]) -> String {
    let mut output = String::new();

    output.push_str("=== wcagbot Accessibility Audit Report ===\n\n");

    let total: usize = results.iter().map(|r| r.findings.len()).sum();
    if total == 0 {
        output.push_str(&format!(
            "Audited {} document(s). No rule violations found.\n",
            results.len()
        ));
        return output;
    }

    let errors: usize = results.iter().map(|r| r.findings.errors().len()).sum();
    let warnings: usize = results.iter().map(|r| r.findings.warnings().len()).sum();

    output.push_str(&format!(
        "Audited {} document(s). Found {} issue(s): {} error(s), {} warning(s), {} info\n\n",
        results.len(),
        total,
        errors,
        warnings,
        total - errors - warnings
    ));

    for result in results.iter().filter(|r| !r.findings.is_empty()) {
        output.push_str(&format!(
            "## {} ({})\n\n",
            result.source.display(),
            result.page_title
        ));

        for severity in [Severity::Error, Severity::Warning, Severity::Info] {
            let sev_findings = result.findings.by_severity(severity);
            if sev_findings.is_empty() {
                continue;
            }

            output.push_str(&format!("--- {} ({}) ---\n", severity, sev_findings.len()));

            for finding in sev_findings {
                output.push_str(&format!("[{}] {}\n", finding.rule_id, finding.description));
                output.push_str(&format!(
                    "  Element: {} at {}\n",
                    finding.element.display_name(),
                    finding.location_string()
                ));
                if !finding.related.is_empty() {
                    output.push_str(&format!("  Related: {} element(s)\n", finding.related.len()));
                }
                output.push_str(&format!(
                    "  WCAG: {} {} (Level {})\n",
                    finding.wcag.criterion, finding.wcag.name, finding.wcag.level
                ));
                if let Some(ref suggestion) = finding.suggestion {
                    output.push_str(&format!("  Fix: {}\n", suggestion));
                }
                output.push('\n');
            }
        }
    }

    if errors > 0 {
        output.push_str("RESULT: FAIL (errors found)\n");
    } else if warnings > 0 {
        output.push_str("RESULT: PASS WITH WARNINGS\n");
    } else {
        output.push_str("RESULT: PASS\n");
    }

    output
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    source: String,
    page_title: &'a str,
    findings: &'a [crate::finding::Finding],
}

fn generate_json_report(results: &[AuditResult]) -> String {
    let documents: Vec<JsonDocument<'_>> = results
        .iter()
        .map(|r| JsonDocument {
            source: r.source.display().to_string(),
            page_title: &r.page_title,
            findings: &r.findings.findings,
        })
        .collect();

    serde_json::to_string_pretty(&serde_json::json!({ "documents": documents })).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize findings: {}\"}}", e)
    })
}

/// SARIF report structure (simplified)
#[derive(Debug, Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: String,
    version: String,
    runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Debug, Serialize)]
struct SarifDriver {
    name: String,
    version: String,
    rules: Vec<SarifRule>,
}

#[derive(Debug, Serialize)]
struct SarifRule {
    id: String,
    name: String,
    #[serde(rename = "shortDescription")]
    short_description: SarifMessage,
    #[serde(rename = "helpUri")]
    help_uri: String,
}

#[derive(Debug, Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Debug, Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Debug, Serialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
    #[serde(rename = "logicalLocations", skip_serializing_if = "Vec::is_empty")]
    logical_locations: Vec<SarifLogicalLocation>,
}

#[derive(Debug, Serialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifactLocation,
}

#[derive(Debug, Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Debug, Serialize)]
struct SarifLogicalLocation {
    #[serde(rename = "fullyQualifiedName")]
    fully_qualified_name: String,
    kind: String,
}

/// Quick-reference anchor for a success criterion, e.g. `#non-text-content`
fn quickref_uri(criterion_name: &str) -> String {
    let slug: String = criterion_name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("https://www.w3.org/WAI/WCAG22/quickref/#{}", slug)
}

fn generate_sarif_report(results: &[AuditResult]) -> String {
    let rules = crate::rules::all_rules()
        .map(|rule| SarifRule {
            id: rule.id.to_string(),
            name: rule.name.to_string(),
            short_description: SarifMessage {
                text: format!("{} ({} {})", rule.name, rule.criterion.number, rule.criterion.name),
            },
            help_uri: quickref_uri(rule.criterion.name),
        })
        .collect();

    let sarif_results: Vec<SarifResult> = results
        .iter()
        .flat_map(|result| {
            result.findings.findings.iter().map(move |f| {
                let level = match f.severity {
                    Severity::Error => "error",
                    Severity::Warning => "warning",
                    Severity::Info => "note",
                };

                let logical_locations = if f.element.is_document() {
                    Vec::new()
                } else {
                    vec![SarifLogicalLocation {
                        fully_qualified_name: f.element.css_path.clone(),
                        kind: "element".to_string(),
                    }]
                };

                SarifResult {
                    rule_id: f.rule_id.clone(),
                    level: level.to_string(),
                    message: SarifMessage {
                        text: f.description.clone(),
                    },
                    locations: vec![SarifLocation {
                        physical_location: SarifPhysicalLocation {
                            artifact_location: SarifArtifactLocation {
                                uri: result.source.display().to_string(),
                            },
                        },
                        logical_locations,
                    }],
                }
            })
        })
        .collect();

    let report = SarifReport {
        schema: "https://json.schemastore.org/sarif-2.1.0.json".to_string(),
        version: "2.1.0".to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "wcagbot".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results: sarif_results,
        }],
    };

    serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize SARIF report: {}\"}}", e)
    })
}

/// Write rows as CSV; the header is written even when there are no rows
pub fn write_rows_csv<W: Write>(rows: &[ReportRow], writer: W) -> Result<()> {
    let mut csv = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(COLUMNS)?;
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct RowsDocument<'a> {
    schema_version: u32,
    columns: &'a [&'a str],
    rows: &'a [ReportRow],
}

/// Write rows as a JSON document tagged with the schema version
pub fn write_rows_json<W: Write>(rows: &[ReportRow], writer: W) -> Result<()> {
    let document = RowsDocument {
        schema_version: REPORT_SCHEMA_VERSION,
        columns: &COLUMNS,
        rows,
    };
    serde_json::to_writer_pretty(writer, &document)?;
    Ok(())
}

/// Render rows in the given format
pub fn render_rows(rows: &[ReportRow], format: RowFormat) -> Result<String> {
    let mut buf = Vec::new();
    match format {
        RowFormat::Csv => write_rows_csv(rows, &mut buf)?,
        RowFormat::Json => write_rows_json(rows, &mut buf)?,
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::audit_bytes;
    use crate::config::Config;
    use crate::normalize::{normalize, ReportContext};
    use chrono::NaiveDate;
    use std::path::Path;

    fn audited(html: &str) -> AuditResult {
        audit_bytes(html.as_bytes(), Path::new("index.html"), &Config::default()).unwrap()
    }

    fn rows(result: &AuditResult) -> Vec<ReportRow> {
        let ctx = ReportContext::new(
            result.page_title.clone(),
            NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
            "judge",
            &Config::default().report,
        );
        normalize(&result.findings.findings, &[], &ctx)
    }

    const BROKEN: &str = r#"<html><body><img src="cat.png"></body></html>"#;

    #[test]
    fn test_text_report_with_findings() {
        let report = generate_report(&[audited(BROKEN)], OutputFormat::Text);
        assert!(report.contains("NON_TEXT_001"));
        assert!(report.contains("index.html"));
        assert!(report.contains("RESULT: FAIL"));
    }

    #[test]
    fn test_text_report_empty() {
        let report = generate_report(&[], OutputFormat::Text);
        assert!(report.contains("No rule violations found"));
    }

    #[test]
    fn test_json_report() {
        let report = generate_report(&[audited(BROKEN)], OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&report).expect("valid JSON");
        assert_eq!(parsed["documents"][0]["source"], "index.html");
        assert!(parsed["documents"][0]["findings"].is_array());
    }

    #[test]
    fn test_sarif_report() {
        let report = generate_report(&[audited(BROKEN)], OutputFormat::Sarif);
        let parsed: serde_json::Value = serde_json::from_str(&report).expect("valid JSON");
        assert_eq!(parsed["version"], "2.1.0");
        let results = parsed["runs"][0]["results"].as_array().unwrap();
        let img = results.iter().find(|r| r["ruleId"] == "NON_TEXT_001").unwrap();
        assert_eq!(img["level"], "error");
        assert_eq!(
            img["locations"][0]["logicalLocations"][0]["fullyQualifiedName"],
            "html:nth-of-type(1) > body:nth-of-type(1) > img:nth-of-type(1)"
        );
        assert!(parsed["runs"][0]["tool"]["driver"]["rules"].as_array().unwrap().len() >= 40);
    }

    #[test]
    fn test_quickref_uri() {
        assert_eq!(
            quickref_uri("Audio-only and Video-only (Prerecorded)"),
            "https://www.w3.org/WAI/WCAG22/quickref/#audio-only-and-video-only-prerecorded"
        );
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("sarif".parse::<OutputFormat>().unwrap(), OutputFormat::Sarif);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_csv_header_only_when_empty() {
        let csv = render_rows(&[], RowFormat::Csv).unwrap();
        assert_eq!(csv.trim_end(), COLUMNS.join(","));
    }

    #[test]
    fn test_csv_rows() {
        let rows = rows(&audited(BROKEN));
        let csv = render_rows(&rows, RowFormat::Csv).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let header: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(header, COLUMNS);
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), rows.len());
        assert_eq!(&records[0][0], "1");
        assert_eq!(&records[0][11], "2026-01-02");
    }

    #[test]
    fn test_json_rows() {
        let rows = rows(&audited(BROKEN));
        let json = render_rows(&rows, RowFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["schema_version"], REPORT_SCHEMA_VERSION);
        assert_eq!(parsed["columns"].as_array().unwrap().len(), 13);
        assert_eq!(parsed["rows"].as_array().unwrap().len(), rows.len());
    }
}
