// SPDX-License-Identifier: PMPL-1.0-or-later
//! wcagbot - WCAG checklist auditor for HTML documents
//!
//! Part of the gitbot-fleet ecosystem. wcagbot combines deterministic
//! structural rules with payloads prepared for quality judgment, and merges
//! both into one report.
//!
//! ## Pipeline
//!
//! 1. **dom**: decode and parse, id index, accessible-name resolution
//! 2. **rules**: three checklists of independent rules
//!    - CL01 Semantic structure (titles, language, landmarks, headings, links)
//!    - CL02 Forms (labels, groups, required fields, instructions, errors)
//!    - CL03 Non-text content (images, image maps, embeds, canvas, objects)
//! 3. **extract**: one JSON payload per checklist
//! 4. **suppress**: drop payload entries that rules already proved broken
//! 5. **prompts**: slice payloads into judgment requests
//! 6. **normalize**: merge findings and judgments into 13-column rows

pub mod audit;
pub mod config;
pub mod dom;
pub mod error;
pub mod extract;
pub mod finding;
pub mod normalize;
pub mod prompts;
pub mod report;
pub mod rules;
pub mod scanner;
pub mod suppress;

pub use audit::{audit_bytes, audit_file, AuditResult};
pub use error::{AuditError, Result};
pub use finding::{Checklist, Finding, FindingSet, Severity};
pub use normalize::{normalize, ReportContext, ReportRow};
