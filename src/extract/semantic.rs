// SPDX-License-Identifier: PMPL-1.0-or-later
//! Semantic structure payload (CL01)

use super::{clean, clip, non_empty, Extractor};
use crate::dom::{
    attr, attr_lower, attr_nonblank, css_path, descendants_by_tag, heading_level, tag, text,
    DocumentHandle, Node,
};
use crate::error::Result;
use crate::finding::Checklist;
use crate::rules::semantic::landmark_role;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Link texts that say nothing about the destination
const GENERIC_LINK_TERMS: &[&str] = &[
    "click here",
    "here",
    "read more",
    "more",
    "learn more",
    "details",
    "link",
];

/// Links with at most this many words are flagged as short
const SHORT_LINK_WORDS: usize = 2;

const MAX_TABLE_HEADERS: usize = 20;
const MAX_SRC_CHARS: usize = 80;

/// Semantic structure extractor
pub struct SemanticExtractor;

impl Extractor for SemanticExtractor {
    fn name(&self) -> &str {
        "Semantic Structure Extractor"
    }

    fn checklist(&self) -> Checklist {
        Checklist::CL01
    }

    fn extract(&self, doc: &DocumentHandle<'_>) -> Result<Value> {
        Ok(serde_json::to_value(build(doc))?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticPayload {
    pub language: Option<String>,
    pub page_title: PageTitle,
    pub headings: Vec<Heading>,
    pub flagged_links: Vec<FlaggedLink>,
    pub buttons: Vec<Button>,
    pub landmarks: Vec<Landmark>,
    pub tables: Vec<Table>,
    pub iframes: Vec<Iframe>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageTitle {
    pub title: Option<String>,
    pub h1: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub text: Option<String>,
    pub selector: String,
}

/// Why a link was flagged for review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkReason {
    Empty,
    Generic,
    Short,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlaggedLink {
    pub text: Option<String>,
    pub aria_label: Option<String>,
    pub href: Option<String>,
    pub reason: LinkReason,
    pub selector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Button {
    pub text: Option<String>,
    pub aria_label: Option<String>,
    pub has_label: bool,
    pub selector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Landmark {
    pub tag: String,
    pub role: String,
    pub aria_label: Option<String>,
    pub selector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub caption: Option<String>,
    pub headers: Vec<String>,
    pub selector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Iframe {
    pub title: Option<String>,
    pub src: Option<String>,
    pub selector: String,
}

/// Build the typed payload
pub fn build(doc: &DocumentHandle<'_>) -> SemanticPayload {
    SemanticPayload {
        language: clean(attr(&doc.root(), "lang")),
        page_title: page_title(doc),
        headings: headings(doc),
        flagged_links: flagged_links(doc),
        buttons: buttons(doc),
        landmarks: landmarks(doc),
        tables: tables(doc),
        iframes: iframes(doc),
    }
}

fn page_title(doc: &DocumentHandle<'_>) -> PageTitle {
    let title = doc
        .find_where(|el| tag(el) == "title" && crate::dom::closest(el, &["svg"]).is_none())
        .first()
        .and_then(|t| non_empty(text(t)));
    let h1 = doc.find_all(&["h1"]).first().and_then(|h| non_empty(text(h)));
    PageTitle { title, h1 }
}

fn headings(doc: &DocumentHandle<'_>) -> Vec<Heading> {
    doc.elements()
        .iter()
        .filter_map(|el| {
            heading_level(el).map(|level| Heading {
                level,
                text: non_empty(text(el)),
                selector: css_path(el),
            })
        })
        .collect()
}

/// Name a screen reader would announce for a link
fn link_name<'a>(doc: &DocumentHandle<'a>, a: &Node<'a>) -> String {
    if let Some(label) = attr_nonblank(a, "aria-label") {
        return crate::dom::collapse_whitespace(label);
    }
    if let Some(label) = doc.referenced_text(attr(a, "aria-labelledby")) {
        return label;
    }
    let visible = text(a);
    if !visible.is_empty() {
        return visible;
    }
    descendants_by_tag(a, &["img"])
        .iter()
        .filter_map(|img| attr_nonblank(img, "alt"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Classify a link name, `None` when it reads fine
pub fn link_reason(name: &str) -> Option<LinkReason> {
    if name.is_empty() {
        return Some(LinkReason::Empty);
    }
    if GENERIC_LINK_TERMS.contains(&name.to_lowercase().as_str()) {
        return Some(LinkReason::Generic);
    }
    if name.split_whitespace().count() <= SHORT_LINK_WORDS {
        return Some(LinkReason::Short);
    }
    None
}

fn flagged_links(doc: &DocumentHandle<'_>) -> Vec<FlaggedLink> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for a in doc.find_all(&["a"]) {
        let Some(reason) = link_reason(&link_name(doc, &a)) else {
            continue;
        };
        let text = non_empty(text(&a));
        let aria_label = clean(attr(&a, "aria-label"));
        if !seen.insert((text.clone(), aria_label.clone())) {
            continue;
        }
        links.push(FlaggedLink {
            text,
            aria_label,
            href: attr_nonblank(&a, "href").map(|h| clip(h, MAX_SRC_CHARS)),
            reason,
            selector: css_path(&a),
        });
    }

    links
}

fn buttons(doc: &DocumentHandle<'_>) -> Vec<Button> {
    let mut seen = HashSet::new();
    doc.find_where(|el| tag(el) == "button" || attr_lower(el, "role").as_deref() == Some("button"))
        .iter()
        .filter_map(|b| {
            let text = non_empty(text(b));
            let aria_label = clean(attr(b, "aria-label"));
            if !seen.insert((text.clone(), aria_label.clone())) {
                return None;
            }
            Some(Button {
                has_label: text.is_some() || aria_label.is_some(),
                text,
                aria_label,
                selector: css_path(b),
            })
        })
        .collect()
}

fn landmarks(doc: &DocumentHandle<'_>) -> Vec<Landmark> {
    doc.elements()
        .iter()
        .filter_map(|el| {
            landmark_role(el).map(|role| Landmark {
                tag: tag(el).to_string(),
                role: role.to_string(),
                aria_label: clean(attr(el, "aria-label"))
                    .or_else(|| doc.referenced_text(attr(el, "aria-labelledby"))),
                selector: css_path(el),
            })
        })
        .collect()
}

fn tables(doc: &DocumentHandle<'_>) -> Vec<Table> {
    doc.find_all(&["table"])
        .iter()
        .map(|t| Table {
            caption: descendants_by_tag(t, &["caption"])
                .first()
                .and_then(|c| non_empty(text(c))),
            headers: descendants_by_tag(t, &["th"])
                .iter()
                .take(MAX_TABLE_HEADERS)
                .map(text)
                .collect(),
            selector: css_path(t),
        })
        .collect()
}

fn iframes(doc: &DocumentHandle<'_>) -> Vec<Iframe> {
    doc.find_all(&["iframe"])
        .iter()
        .map(|f| Iframe {
            title: clean(attr(f, "title")),
            src: attr_nonblank(f, "src").map(|s| clip(s, MAX_SRC_CHARS)),
            selector: css_path(f),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn payload(html: &str) -> SemanticPayload {
        let doc = Document::parse_str(html).unwrap();
        let h = doc.handle();
        build(&h)
    }

    #[test]
    fn test_page_title_and_language() {
        let p = payload(r#"<html lang="en"><head><title> Shop  home </title></head><body><h1>Deals</h1></body></html>"#);
        assert_eq!(p.language.as_deref(), Some("en"));
        assert_eq!(p.page_title.title.as_deref(), Some("Shop home"));
        assert_eq!(p.page_title.h1.as_deref(), Some("Deals"));
    }

    #[test]
    fn test_headings_in_order() {
        let p = payload("<h2>B</h2><h1>A</h1><h3></h3>");
        let levels: Vec<u8> = p.headings.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![2, 1, 3]);
        assert_eq!(p.headings[2].text, None);
        assert!(p.headings[0].selector.ends_with("h2:nth-of-type(1)"));
    }

    #[test]
    fn test_flagged_links() {
        let p = payload(
            r#"<a href="/a">Click here</a><a href="/b">Click here</a><a href="/c"></a>
<a href="/d">Read our full accessibility statement</a><a href="/e">Pricing</a>
<a href="/f"><img src="home.png" alt="Go to the home page"></a>"#,
        );
        let reasons: Vec<LinkReason> = p.flagged_links.iter().map(|l| l.reason).collect();
        assert_eq!(reasons, vec![LinkReason::Generic, LinkReason::Empty, LinkReason::Short]);
        assert_eq!(p.flagged_links[0].href.as_deref(), Some("/a"));
    }

    #[test]
    fn test_buttons_dedup() {
        let p = payload(r#"<button>Save</button><button>Save</button><div role="button" aria-label="Close"></div><button></button>"#);
        assert_eq!(p.buttons.len(), 3);
        assert!(p.buttons[1].has_label);
        assert!(!p.buttons[2].has_label);
    }

    #[test]
    fn test_landmarks_and_tables() {
        let p = payload(
            r#"<nav aria-label="Main"></nav><div role="search"></div>
<table><caption>Q1</caption><tr><th>Region</th><th>Sales</th></tr></table>
<iframe src="https://video.example/embed" title="Demo"></iframe>"#,
        );
        assert_eq!(p.landmarks.len(), 2);
        assert_eq!(p.landmarks[0].role, "navigation");
        assert_eq!(p.landmarks[0].aria_label.as_deref(), Some("Main"));
        assert_eq!(p.landmarks[1].role, "search");
        assert_eq!(p.tables[0].caption.as_deref(), Some("Q1"));
        assert_eq!(p.tables[0].headers, vec!["Region", "Sales"]);
        assert_eq!(p.iframes[0].title.as_deref(), Some("Demo"));
    }

    #[test]
    fn test_null_keys_serialized() {
        let doc = Document::parse_str("<iframe></iframe>").unwrap();
        let h = doc.handle();
        let value = SemanticExtractor.extract(&h).unwrap();
        let iframe = &value["iframes"][0];
        assert!(iframe.get("title").is_some());
        assert!(iframe["title"].is_null());
        assert!(iframe["src"].is_null());
    }
}
