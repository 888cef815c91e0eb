// SPDX-License-Identifier: PMPL-1.0-or-later
//! Semantic structure rules (CL01) - page title, language, landmarks,
//! headings, links, skip navigation, focus order, tables, iframes and ids.

use super::{sc, Rule, RuleSet};
use crate::dom::{
    self, attr, attr_lower, attr_nonblank, child_elements, closest, descendants_by_tag,
    heading_level, tag, text, DocumentHandle, Node,
};
use crate::finding::{Checklist, Finding, Severity};
use regex::Regex;
use std::sync::LazyLock;

/// Semantic structure rule set
pub struct SemanticRules;

impl RuleSet for SemanticRules {
    fn name(&self) -> &str {
        "Semantic Structure Rules"
    }

    fn checklist(&self) -> Checklist {
        Checklist::CL01
    }

    fn rules(&self) -> &'static [Rule] {
        RULES
    }
}

/// BCP-47-shaped language tag
static LANGUAGE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]{2,3}(-[a-zA-Z0-9]{2,8})*$").expect("valid regex"));

/// Roles that make an element a landmark when given explicitly
pub const LANDMARK_ROLES: &[&str] = &[
    "banner",
    "navigation",
    "main",
    "contentinfo",
    "complementary",
    "search",
    "form",
    "region",
];

/// Sectioning elements that stop header/footer mapping to banner/contentinfo
const SECTIONING: &[&str] = &["article", "aside", "main", "nav", "section"];

/// Elements that can take keyboard focus without tabindex
const NATIVELY_FOCUSABLE: &[&str] = &["a", "button", "input", "select", "textarea"];

pub static RULES: &[Rule] = &[
    Rule {
        id: "PAGE_TITLE_001",
        name: "Missing <title>",
        checklist: Checklist::CL01,
        criterion: sc::PAGE_TITLED,
        severity: Severity::Error,
        suggestion: "Add a <title> element to <head> that describes the page's topic or purpose.",
        check: page_title_missing,
    },
    Rule {
        id: "PAGE_TITLE_002",
        name: "Multiple <title> elements",
        checklist: Checklist::CL01,
        criterion: sc::PAGE_TITLED,
        severity: Severity::Warning,
        suggestion: "Keep a single <title> element in <head>.",
        check: page_title_multiple,
    },
    Rule {
        id: "PAGE_TITLE_003",
        name: "Empty <title>",
        checklist: Checklist::CL01,
        criterion: sc::PAGE_TITLED,
        severity: Severity::Error,
        suggestion: "Give the <title> element descriptive text.",
        check: page_title_empty,
    },
    Rule {
        id: "LANG_001",
        name: "Missing primary language",
        checklist: Checklist::CL01,
        criterion: sc::LANGUAGE_OF_PAGE,
        severity: Severity::Error,
        suggestion: "Add a lang attribute to <html>, e.g. <html lang=\"en\">.",
        check: lang_missing,
    },
    Rule {
        id: "LANG_002",
        name: "Invalid primary language code",
        checklist: Checklist::CL01,
        criterion: sc::LANGUAGE_OF_PAGE,
        severity: Severity::Error,
        suggestion: "Use a valid BCP 47 language tag such as \"en\" or \"en-GB\".",
        check: lang_invalid,
    },
    Rule {
        id: "LANG_003",
        name: "Invalid inline language code",
        checklist: Checklist::CL01,
        criterion: sc::LANGUAGE_OF_PARTS,
        severity: Severity::Warning,
        suggestion: "Use a valid BCP 47 language tag on elements that change language.",
        check: lang_inline_invalid,
    },
    Rule {
        id: "LAND_001",
        name: "Missing main landmark",
        checklist: Checklist::CL01,
        criterion: sc::BYPASS_BLOCKS,
        severity: Severity::Error,
        suggestion: "Wrap the primary content in a <main> element.",
        check: land_main_missing,
    },
    Rule {
        id: "LAND_002",
        name: "Multiple main landmarks",
        checklist: Checklist::CL01,
        criterion: sc::INFO_AND_RELATIONSHIPS,
        severity: Severity::Warning,
        suggestion: "Use exactly one main landmark per page.",
        check: land_main_multiple,
    },
    Rule {
        id: "LAND_003",
        name: "Multiple banner landmarks",
        checklist: Checklist::CL01,
        criterion: sc::INFO_AND_RELATIONSHIPS,
        severity: Severity::Warning,
        suggestion: "Use one page-level <header> (banner); nest others inside sectioning elements.",
        check: land_banner_multiple,
    },
    Rule {
        id: "LAND_004",
        name: "Multiple contentinfo landmarks",
        checklist: Checklist::CL01,
        criterion: sc::INFO_AND_RELATIONSHIPS,
        severity: Severity::Warning,
        suggestion: "Use one page-level <footer> (contentinfo); nest others inside sectioning elements.",
        check: land_contentinfo_multiple,
    },
    Rule {
        id: "LAND_005",
        name: "Multiple same-type landmarks without accessible labels",
        checklist: Checklist::CL01,
        criterion: sc::INFO_AND_RELATIONSHIPS,
        severity: Severity::Warning,
        suggestion: "Give each landmark of the same type a distinguishing aria-label or aria-labelledby.",
        check: land_unlabeled_duplicates,
    },
    Rule {
        id: "LAND_006",
        name: "Content outside landmark regions",
        checklist: Checklist::CL01,
        criterion: sc::INFO_AND_RELATIONSHIPS,
        severity: Severity::Warning,
        suggestion: "Place all visible content inside landmark regions.",
        check: land_content_outside,
    },
    Rule {
        id: "HEAD_001",
        name: "Skipped heading level",
        checklist: Checklist::CL01,
        criterion: sc::INFO_AND_RELATIONSHIPS,
        severity: Severity::Warning,
        suggestion: "Increase heading levels one step at a time.",
        check: head_skipped_level,
    },
    Rule {
        id: "HEAD_002",
        name: "Multiple <h1> elements",
        checklist: Checklist::CL01,
        criterion: sc::INFO_AND_RELATIONSHIPS,
        severity: Severity::Warning,
        suggestion: "Use a single <h1> for the page's main heading.",
        check: head_multiple_h1,
    },
    Rule {
        id: "HEAD_003",
        name: "Missing <h1> element",
        checklist: Checklist::CL01,
        criterion: sc::INFO_AND_RELATIONSHIPS,
        severity: Severity::Warning,
        suggestion: "Add an <h1> that describes the page's main content.",
        check: head_missing_h1,
    },
    Rule {
        id: "HEAD_004",
        name: "Empty heading",
        checklist: Checklist::CL01,
        criterion: sc::HEADINGS_AND_LABELS,
        severity: Severity::Error,
        suggestion: "Give the heading text content or remove it.",
        check: head_empty,
    },
    Rule {
        id: "LINK_001",
        name: "Link without accessible name",
        checklist: Checklist::CL01,
        criterion: sc::LINK_PURPOSE,
        severity: Severity::Error,
        suggestion: "Add link text or an aria-label describing the destination.",
        check: link_no_name,
    },
    Rule {
        id: "LINK_002",
        name: "Anchor without href",
        checklist: Checklist::CL01,
        criterion: sc::KEYBOARD,
        severity: Severity::Warning,
        suggestion: "Give the anchor an href, or use a <button> for actions.",
        check: link_no_href,
    },
    Rule {
        id: "NAV_001",
        name: "Skip link not present",
        checklist: Checklist::CL01,
        criterion: sc::BYPASS_BLOCKS,
        severity: Severity::Warning,
        suggestion: "Add a \"Skip to main content\" link as the first focusable element.",
        check: nav_skip_missing,
    },
    Rule {
        id: "NAV_002",
        name: "Skip link target does not exist",
        checklist: Checklist::CL01,
        criterion: sc::BYPASS_BLOCKS,
        severity: Severity::Error,
        suggestion: "Point the skip link at the id of the main content element.",
        check: nav_skip_target_missing,
    },
    Rule {
        id: "NAV_003",
        name: "Skip link is not first focusable element",
        checklist: Checklist::CL01,
        criterion: sc::BYPASS_BLOCKS,
        severity: Severity::Warning,
        suggestion: "Move the skip link before all other focusable elements.",
        check: nav_skip_not_first,
    },
    Rule {
        id: "FOCUS_001",
        name: "Positive tabindex used",
        checklist: Checklist::CL01,
        criterion: sc::FOCUS_ORDER,
        severity: Severity::Warning,
        suggestion: "Use tabindex=\"0\" or \"-1\" and order content in the DOM instead.",
        check: focus_positive_tabindex,
    },
    Rule {
        id: "TABLE_001",
        name: "Missing table caption",
        checklist: Checklist::CL01,
        criterion: sc::INFO_AND_RELATIONSHIPS,
        severity: Severity::Warning,
        suggestion: "Add a <caption> describing the table.",
        check: table_no_caption,
    },
    Rule {
        id: "TABLE_002",
        name: "Missing table headers",
        checklist: Checklist::CL01,
        criterion: sc::INFO_AND_RELATIONSHIPS,
        severity: Severity::Error,
        suggestion: "Mark header cells with <th> and a scope attribute.",
        check: table_no_headers,
    },
    Rule {
        id: "IFRAME_001",
        name: "Missing iframe title",
        checklist: Checklist::CL01,
        criterion: sc::NAME_ROLE_VALUE,
        severity: Severity::Error,
        suggestion: "Add a title attribute describing the frame's content.",
        check: iframe_title_missing,
    },
    Rule {
        id: "IFRAME_002",
        name: "Empty iframe title",
        checklist: Checklist::CL01,
        criterion: sc::NAME_ROLE_VALUE,
        severity: Severity::Error,
        suggestion: "Give the iframe title descriptive text.",
        check: iframe_title_empty,
    },
    Rule {
        id: "PARSE_001",
        name: "Duplicate ID",
        checklist: Checklist::CL01,
        criterion: sc::PARSING,
        severity: Severity::Error,
        suggestion: "Make every id attribute value unique within the page.",
        check: parse_duplicate_id,
    },
];

// --- Page title ---

/// Document `<title>` elements, ignoring SVG titles
fn page_titles<'a>(doc: &DocumentHandle<'a>) -> Vec<Node<'a>> {
    doc.find_where(|el| tag(el) == "title" && closest(el, &["svg"]).is_none())
}

fn page_title_missing(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    if page_titles(doc).is_empty() {
        vec![rule.document_finding("The page does not contain a <title> element.")]
    } else {
        Vec::new()
    }
}

fn page_title_multiple(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    let titles = page_titles(doc);
    if titles.len() < 2 {
        return Vec::new();
    }
    titles
        .iter()
        .map(|t| rule.finding(doc, t, format!("{} <title> elements found.", titles.len())))
        .collect()
}

fn page_title_empty(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    page_titles(doc)
        .first()
        .filter(|t| text(t).is_empty())
        .map(|t| vec![rule.finding(doc, t, "<title> element exists but contains no text.")])
        .unwrap_or_default()
}

// --- Language ---

pub fn is_valid_language_tag(value: &str) -> bool {
    LANGUAGE_TAG.is_match(value.trim())
}

fn lang_missing(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    let html = doc.root();
    if attr_nonblank(&html, "lang").is_none() {
        vec![rule.finding(doc, &html, "<html> element is missing a lang attribute.")]
    } else {
        Vec::new()
    }
}

fn lang_invalid(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    let html = doc.root();
    match attr_nonblank(&html, "lang") {
        Some(lang) if !is_valid_language_tag(lang) => vec![rule.finding(
            doc,
            &html,
            format!("Invalid language code '{}' on <html>.", lang),
        )],
        _ => Vec::new(),
    }
}

fn lang_inline_invalid(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    let root = doc.root();
    doc.elements()
        .iter()
        .filter(|el| **el != root)
        // lang="" is valid and means "unknown"
        .filter_map(|el| attr_nonblank(el, "lang").map(|lang| (el, lang)))
        .filter(|(_, lang)| !is_valid_language_tag(lang))
        .map(|(el, lang)| rule.finding(doc, el, format!("Invalid lang attribute '{}'.", lang)))
        .collect()
}

// --- Landmarks ---

/// Landmark role of an element. An explicit role wins over the tag.
pub fn landmark_role(el: &Node<'_>) -> Option<&'static str> {
    if let Some(role) = attr_lower(el, "role").filter(|r| !r.is_empty()) {
        let first = role.split_whitespace().next().unwrap_or_default();
        return LANDMARK_ROLES.iter().copied().find(|r| *r == first);
    }
    match tag(el) {
        "main" => Some("main"),
        "nav" => Some("navigation"),
        "aside" => Some("complementary"),
        "header" if closest(el, SECTIONING).is_none() => Some("banner"),
        "footer" if closest(el, SECTIONING).is_none() => Some("contentinfo"),
        _ => None,
    }
}

/// Every landmark in document order, each element counted once
pub fn landmarks<'a>(doc: &DocumentHandle<'a>) -> Vec<(Node<'a>, &'static str)> {
    doc.elements()
        .iter()
        .filter_map(|el| landmark_role(el).map(|role| (*el, role)))
        .collect()
}

/// Landmarks grouped by role, groups ordered by first appearance
fn landmark_groups<'a>(doc: &DocumentHandle<'a>) -> Vec<(&'static str, Vec<Node<'a>>)> {
    let mut groups: Vec<(&'static str, Vec<Node<'a>>)> = Vec::new();
    for (el, role) in landmarks(doc) {
        match groups.iter_mut().find(|(r, _)| *r == role) {
            Some((_, members)) => members.push(el),
            None => groups.push((role, vec![el])),
        }
    }
    groups
}

fn landmarks_with_role<'a>(doc: &DocumentHandle<'a>, role: &str) -> Vec<Node<'a>> {
    landmarks(doc)
        .into_iter()
        .filter(|(_, r)| *r == role)
        .map(|(el, _)| el)
        .collect()
}

fn land_main_missing(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    if landmarks_with_role(doc, "main").is_empty() {
        vec![rule.document_finding("Page does not contain a main landmark.")]
    } else {
        Vec::new()
    }
}

fn multiple_of_role(rule: &Rule, doc: &DocumentHandle<'_>, role: &str) -> Vec<Finding> {
    let members = landmarks_with_role(doc, role);
    if members.len() < 2 {
        return Vec::new();
    }
    members
        .iter()
        .map(|el| {
            rule.finding(
                doc,
                el,
                format!("{} '{}' landmarks found; expected one.", members.len(), role),
            )
        })
        .collect()
}

fn land_main_multiple(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    multiple_of_role(rule, doc, "main")
}

fn land_banner_multiple(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    multiple_of_role(rule, doc, "banner")
}

fn land_contentinfo_multiple(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    multiple_of_role(rule, doc, "contentinfo")
}

/// Whether a landmark carries a distinguishing label
pub fn has_landmark_label<'a>(doc: &DocumentHandle<'a>, el: &Node<'a>) -> bool {
    attr_nonblank(el, "aria-label").is_some()
        || doc.referenced_text(attr(el, "aria-labelledby")).is_some()
}

fn land_unlabeled_duplicates(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    landmark_groups(doc)
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .filter_map(|(role, members)| {
            let unlabeled: Vec<Node<'_>> = members
                .iter()
                .copied()
                .filter(|el| !has_landmark_label(doc, el))
                .collect();
            let first = unlabeled.first()?;
            Some(rule.finding_with_related(
                doc,
                first,
                &unlabeled,
                format!(
                    "{} '{}' landmarks, {} without aria-label or aria-labelledby to tell them apart.",
                    members.len(),
                    role,
                    unlabeled.len()
                ),
            ))
        })
        .collect()
}

/// Text under `el` that is not inside any landmark
fn text_outside_landmarks(el: &Node<'_>) -> String {
    dom::text_filtered(el, |a| landmark_role(a).is_some())
}

fn land_content_outside(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    let Some(body) = doc.body() else {
        return Vec::new();
    };
    child_elements(&body)
        .into_iter()
        .filter(|child| !matches!(tag(child), "script" | "style" | "template" | "noscript"))
        .filter(|child| landmark_role(child).is_none())
        .find(|child| !text_outside_landmarks(child).is_empty())
        .map(|child| {
            vec![rule.finding(
                doc,
                &child,
                "Content found directly under <body> that is not contained within a landmark region.",
            )]
        })
        .unwrap_or_default()
}

// --- Headings ---

fn headings<'a>(doc: &DocumentHandle<'a>) -> Vec<(Node<'a>, u8)> {
    doc.elements()
        .iter()
        .filter_map(|el| heading_level(el).map(|level| (*el, level)))
        .collect()
}

fn head_skipped_level(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    headings(doc)
        .windows(2)
        .filter(|pair| pair[1].1 > pair[0].1 + 1)
        .map(|pair| {
            let (prev, prev_level) = pair[0];
            let (current, level) = pair[1];
            rule.finding_with_related(
                doc,
                &current,
                &[prev],
                format!("Heading level skipped from h{} to h{}.", prev_level, level),
            )
        })
        .collect()
}

fn head_multiple_h1(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    let h1s = doc.find_all(&["h1"]);
    if h1s.len() < 2 {
        return Vec::new();
    }
    h1s.iter()
        .map(|h| rule.finding(doc, h, format!("{} <h1> elements found.", h1s.len())))
        .collect()
}

fn head_missing_h1(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    if doc.find_all(&["h1"]).is_empty() {
        vec![rule.document_finding("The page does not contain an <h1> element.")]
    } else {
        Vec::new()
    }
}

/// Whether an element exposes any name: text, aria-label,
/// aria-labelledby or a descendant image's alt
pub fn has_accessible_content<'a>(doc: &DocumentHandle<'a>, el: &Node<'a>) -> bool {
    !text(el).is_empty()
        || attr_nonblank(el, "aria-label").is_some()
        || doc.referenced_text(attr(el, "aria-labelledby")).is_some()
        || descendants_by_tag(el, &["img"])
            .iter()
            .any(|img| attr_nonblank(img, "alt").is_some())
}

fn head_empty(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    headings(doc)
        .iter()
        .filter(|(h, _)| !has_accessible_content(doc, h))
        .map(|(h, level)| rule.finding(doc, h, format!("<h{}> element contains no text.", level)))
        .collect()
}

// --- Links ---

fn link_no_name(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    doc.find_all(&["a"])
        .iter()
        // Image links are judged by NON_TEXT_002
        .filter(|a| descendants_by_tag(a, &["img"]).is_empty())
        .filter(|a| {
            text(a).is_empty()
                && attr_nonblank(a, "aria-label").is_none()
                && doc.referenced_text(attr(a, "aria-labelledby")).is_none()
        })
        .map(|a| rule.finding(doc, a, "Link has no text, aria-label or aria-labelledby."))
        .collect()
}

fn link_no_href(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    doc.find_all(&["a"])
        .iter()
        .filter(|a| attr_nonblank(a, "href").is_none())
        .map(|a| rule.finding(doc, a, "Anchor element does not have an href attribute."))
        .collect()
}

// --- Skip navigation ---

/// Links with an in-page target whose text mentions "skip"
pub fn skip_links<'a>(doc: &DocumentHandle<'a>) -> Vec<Node<'a>> {
    doc.find_where(|el| {
        tag(el) == "a"
            && attr(el, "href").is_some_and(|h| h.trim().starts_with('#'))
            && text(el).to_lowercase().contains("skip")
    })
}

fn nav_skip_missing(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    if skip_links(doc).is_empty() {
        vec![rule.document_finding("Page does not contain a skip navigation link.")]
    } else {
        Vec::new()
    }
}

fn nav_skip_target_missing(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    skip_links(doc)
        .iter()
        .filter_map(|link| {
            let href = attr(link, "href")?.trim();
            let target = &href[1..];
            if doc.id_index().contains(target) {
                return None;
            }
            Some(rule.finding(
                doc,
                link,
                format!("Skip link points to '#{}' but no element with that id exists.", target),
            ))
        })
        .collect()
}

/// Whether an element is in the sequential focus order
pub fn is_focusable(el: &Node<'_>) -> bool {
    if let Some(tabindex) = attr(el, "tabindex") {
        if let Ok(value) = tabindex.trim().parse::<i32>() {
            return value >= 0;
        }
    }
    match tag(el) {
        "a" => attr_nonblank(el, "href").is_some(),
        "input" => attr_lower(el, "type").as_deref() != Some("hidden"),
        t => NATIVELY_FOCUSABLE.contains(&t),
    }
}

fn nav_skip_not_first(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    let skips = skip_links(doc);
    if skips.is_empty() {
        return Vec::new();
    }
    match doc.elements().iter().find(|el| is_focusable(el)) {
        Some(first) if !skips.contains(first) => vec![rule.finding(
            doc,
            first,
            "The first focusable element on the page is not a skip navigation link.",
        )],
        _ => Vec::new(),
    }
}

// --- Focus ---

fn focus_positive_tabindex(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    let mut findings = Vec::new();
    for el in doc.find_where(|el| attr(el, "tabindex").is_some()) {
        let raw = attr(&el, "tabindex").unwrap_or_default().trim();
        match raw.parse::<i64>() {
            Ok(value) if value > 0 => findings.push(rule.finding(
                doc,
                &el,
                format!("tabindex=\"{}\" overrides the natural focus order.", value),
            )),
            Ok(_) => {}
            Err(_) => rule.skip(doc, &el, format!("tabindex '{}' is not an integer", raw)),
        }
    }
    findings
}

// --- Tables ---

/// Tables that are not marked presentational
pub fn data_tables<'a>(doc: &DocumentHandle<'a>) -> Vec<Node<'a>> {
    doc.find_where(|el| {
        tag(el) == "table"
            && !matches!(attr_lower(el, "role").as_deref(), Some("presentation") | Some("none"))
    })
}

fn table_no_caption(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    data_tables(doc)
        .iter()
        .filter(|t| descendants_by_tag(t, &["caption"]).is_empty())
        .map(|t| rule.finding(doc, t, "Data table does not contain a <caption>."))
        .collect()
}

fn table_no_headers(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    data_tables(doc)
        .iter()
        .filter(|t| descendants_by_tag(t, &["th"]).is_empty())
        .map(|t| rule.finding(doc, t, "Table does not contain <th> elements."))
        .collect()
}

// --- Iframes ---

fn iframe_title_missing(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    doc.find_all(&["iframe"])
        .iter()
        .filter(|f| attr(f, "title").is_none())
        .map(|f| rule.finding(doc, f, "Iframe does not have a title attribute."))
        .collect()
}

fn iframe_title_empty(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    doc.find_all(&["iframe"])
        .iter()
        .filter(|f| attr(f, "title").is_some_and(|t| t.trim().is_empty()))
        .map(|f| rule.finding(doc, f, "Iframe title attribute is empty."))
        .collect()
}

// --- Parsing ---

fn parse_duplicate_id(rule: &Rule, doc: &DocumentHandle<'_>) -> Vec<Finding> {
    doc.id_index()
        .duplicates()
        .iter()
        .filter_map(|dup| {
            let first = dup.occurrences.first()?;
            Some(rule.finding_with_related(
                doc,
                first,
                &dup.occurrences,
                format!("id '{}' is used {} times.", dup.id, dup.occurrences.len()),
            ))
        })
        .collect()
}
