// SPDX-License-Identifier: PMPL-1.0-or-later
//! One audit run over one document: parse, rules, extract, suppress.
//!
//! Each checklist is handled to completion before the next: all of its rule
//! findings exist before its payload is filtered.

use crate::config::Config;
use crate::dom::{Document, DocumentHandle};
use crate::error::Result;
use crate::extract::{extract_checklist, Payloads};
use crate::finding::{Checklist, FindingSet, WcagLevel};
use crate::normalize::page_title_from;
use crate::rules::run_checklist;
use crate::suppress::filter_in_place;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of auditing one document
#[derive(Debug, Clone, Serialize)]
pub struct AuditResult {
    pub source: PathBuf,
    /// Document `<title>`, first `<h1>` or the file stem
    pub page_title: String,
    pub findings: FindingSet,
    /// Payloads after suppression
    pub payloads: Payloads,
    /// Entries removed by suppression
    pub suppressed: usize,
}

impl AuditResult {
    /// Copy keeping only findings whose criterion is at or below `max_level`
    pub fn limited_to(&self, max_level: WcagLevel) -> AuditResult {
        AuditResult {
            source: self.source.clone(),
            page_title: self.page_title.clone(),
            findings: FindingSet {
                findings: self.findings.at_level(max_level).into_iter().cloned().collect(),
            },
            payloads: self.payloads.clone(),
            suppressed: self.suppressed,
        }
    }
}

/// Run the rule engine and extractors over a parsed document
pub fn audit_handle(doc: &DocumentHandle<'_>, source: &Path) -> Result<AuditResult> {
    let mut findings = FindingSet::new();
    let mut payloads = Payloads::new();
    let mut suppressed = 0;

    for checklist in Checklist::ALL {
        let rule_findings = run_checklist(doc, checklist);
        let mut payload = extract_checklist(doc, checklist)?;
        suppressed += filter_in_place(&mut payload, checklist, &rule_findings);
        debug!(
            %checklist,
            findings = rule_findings.len(),
            "Checklist complete"
        );
        findings.extend(rule_findings);
        payloads.insert(checklist, payload);
    }

    let fallback = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    let page_title = page_title_from(&payloads, fallback);

    info!(
        source = %source.display(),
        findings = findings.len(),
        suppressed,
        "Audited document"
    );

    Ok(AuditResult {
        source: source.to_path_buf(),
        page_title,
        findings,
        payloads,
        suppressed,
    })
}

/// Decode, parse and audit raw bytes
pub fn audit_bytes(bytes: &[u8], source: &Path, config: &Config) -> Result<AuditResult> {
    let document = Document::parse(
        bytes,
        config.document.declared_encoding.as_deref(),
        config.document.snippet_chars,
    )?;
    audit_handle(&document.handle(), source)
}

/// Audit a file on disk
pub fn audit_file(path: &Path, config: &Config) -> Result<AuditResult> {
    let bytes = std::fs::read(path)?;
    audit_bytes(&bytes, path, config)
}
