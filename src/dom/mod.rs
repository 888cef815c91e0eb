// SPDX-License-Identifier: PMPL-1.0-or-later
//! Document model adapter over `scraper`.
//!
//! [`Document`] owns the parsed tree for one audit run. Everything else works
//! through a borrowed [`DocumentHandle`], which holds the elements in document
//! order and builds the id index once on first use.

pub mod resolve;

use crate::error::{AuditError, Result};
use crate::finding::ElementDescriptor;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::cell::OnceCell;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// An element node borrowed from a [`Document`]
pub type Node<'a> = ElementRef<'a>;

/// Default snippet bound used by [`Document::parse_str`]
pub const DEFAULT_SNIPPET_CHARS: usize = 200;

/// Bytes inspected when sniffing `<meta charset>`
const SNIFF_WINDOW: usize = 1024;

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([a-z0-9_\-:.]+)"#).expect("valid regex")
});

/// Text encodings the decoder understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    /// ISO-8859-1 and windows-1252, decoded byte to code point
    Latin1,
    Ascii,
}

impl Encoding {
    /// Map a charset label to an encoding, `None` when unknown
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" | "unicode-1-1-utf-8" => Some(Encoding::Utf8),
            "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" | "l1" | "windows-1252"
            | "cp1252" => Some(Encoding::Latin1),
            "us-ascii" | "ascii" => Some(Encoding::Ascii),
            _ => None,
        }
    }
}

/// Find a `<meta charset>` declaration near the start of the document
pub fn sniff_charset(bytes: &[u8]) -> Option<String> {
    let window = &bytes[..bytes.len().min(SNIFF_WINDOW)];
    let head = String::from_utf8_lossy(window);
    META_CHARSET
        .captures(&head)
        .map(|caps| caps[1].to_string())
}

/// Decode raw bytes to text. Never fails: undecodable bytes become U+FFFD.
pub fn decode(bytes: &[u8], declared_encoding: Option<&str>) -> String {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(rest).into_owned();
    }

    let label = declared_encoding
        .map(str::to_string)
        .or_else(|| sniff_charset(bytes))
        .unwrap_or_else(|| "utf-8".to_string());

    let encoding = Encoding::from_label(&label).unwrap_or_else(|| {
        warn!("Unknown encoding label '{}', decoding as UTF-8", label);
        Encoding::Utf8
    });
    debug!(?encoding, "Decoding document");

    match encoding {
        Encoding::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        Encoding::Latin1 => bytes.iter().map(|&b| b as char).collect(),
        Encoding::Ascii => bytes
            .iter()
            .map(|&b| if b.is_ascii() { b as char } else { char::REPLACEMENT_CHARACTER })
            .collect(),
    }
}

/// Collapse whitespace runs to a single space and trim the ends
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// A parsed HTML document
pub struct Document {
    html: Html,
    snippet_chars: usize,
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("snippet_chars", &self.snippet_chars)
            .finish_non_exhaustive()
    }
}

impl Document {
    /// Decode and parse a document.
    ///
    /// Invalid markup is repaired by the parser; the only failure is a tree
    /// without a root element.
    pub fn parse(bytes: &[u8], declared_encoding: Option<&str>, snippet_chars: usize) -> Result<Self> {
        let source = decode(bytes, declared_encoding);
        Self::from_source(&source, snippet_chars)
    }

    /// Parse already-decoded markup with the default snippet bound
    pub fn parse_str(source: &str) -> Result<Self> {
        Self::from_source(source, DEFAULT_SNIPPET_CHARS)
    }

    fn from_source(source: &str, snippet_chars: usize) -> Result<Self> {
        let html = Html::parse_document(source);
        if !html.errors.is_empty() {
            debug!(count = html.errors.len(), "Parser recovered from markup errors");
        }
        let has_root = html.tree.root().children().any(|n| ElementRef::wrap(n).is_some());
        if !has_root {
            return Err(AuditError::MalformedDocument(
                "parser produced no root element".to_string(),
            ));
        }
        Ok(Self { html, snippet_chars })
    }

    /// Borrow the tree for traversal
    pub fn handle(&self) -> DocumentHandle<'_> {
        DocumentHandle::new(&self.html, self.snippet_chars)
    }
}

/// Read-only view of a document with a memoized id index
pub struct DocumentHandle<'a> {
    root: Node<'a>,
    elements: Vec<Node<'a>>,
    snippet_chars: usize,
    index: OnceCell<IdIndex<'a>>,
}

impl<'a> DocumentHandle<'a> {
    fn new(html: &'a Html, snippet_chars: usize) -> Self {
        let elements: Vec<Node<'a>> = html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .collect();
        // Checked non-empty in Document::from_source
        let root = html.root_element();
        Self {
            root,
            elements,
            snippet_chars,
            index: OnceCell::new(),
        }
    }

    /// The `<html>` element
    pub fn root(&self) -> Node<'a> {
        self.root
    }

    /// All elements in document order
    pub fn elements(&self) -> &[Node<'a>] {
        &self.elements
    }

    /// The first `<body>` element, if any
    pub fn body(&self) -> Option<Node<'a>> {
        self.elements.iter().copied().find(|el| tag(el) == "body")
    }

    /// Elements whose tag is one of `tags`, in document order
    pub fn find_all(&self, tags: &[&str]) -> Vec<Node<'a>> {
        self.find_where(|el| tags.contains(&tag(el)))
    }

    /// Elements matching a predicate, in document order
    pub fn find_where(&self, predicate: impl Fn(&Node<'a>) -> bool) -> Vec<Node<'a>> {
        self.elements.iter().copied().filter(|el| predicate(el)).collect()
    }

    /// The id index, built on first call
    pub fn id_index(&self) -> &IdIndex<'a> {
        self.index.get_or_init(|| IdIndex::build(&self.elements))
    }

    /// Position of an element in document order
    pub fn position(&self, el: &Node<'a>) -> Option<usize> {
        self.elements.iter().position(|e| e == el)
    }

    /// Stable descriptor for findings and payload selectors
    pub fn describe(&self, el: &Node<'a>) -> ElementDescriptor {
        ElementDescriptor {
            tag: tag(el).to_string(),
            id: attr_nonblank(el, "id").map(str::to_string),
            class: attr_nonblank(el, "class").map(str::to_string),
            css_path: css_path(el),
            snippet: self.snippet(el),
        }
    }

    /// Outer HTML bounded to the configured length
    pub fn snippet(&self, el: &Node<'a>) -> String {
        truncate_chars(&el.html(), self.snippet_chars)
    }
}

/// Lookup from id to element, plus every duplicated id
#[derive(Debug, Default)]
pub struct IdIndex<'a> {
    first: HashMap<&'a str, Node<'a>>,
    duplicates: Vec<DuplicateId<'a>>,
}

/// An id carried by more than one element
#[derive(Debug, Clone)]
pub struct DuplicateId<'a> {
    pub id: &'a str,
    /// Every occurrence in document order
    pub occurrences: Vec<Node<'a>>,
}

impl<'a> IdIndex<'a> {
    fn build(elements: &[Node<'a>]) -> Self {
        let mut order: Vec<&'a str> = Vec::new();
        let mut all: HashMap<&'a str, Vec<Node<'a>>> = HashMap::new();

        for el in elements {
            let Some(id) = attr(el, "id") else { continue };
            if id.is_empty() {
                continue;
            }
            let entry = all.entry(id).or_default();
            if entry.is_empty() {
                order.push(id);
            }
            entry.push(*el);
        }

        let mut first = HashMap::with_capacity(order.len());
        let mut duplicates = Vec::new();
        for id in order {
            let occurrences = all.remove(id).unwrap_or_default();
            if let Some(head) = occurrences.first() {
                first.insert(id, *head);
            }
            if occurrences.len() > 1 {
                duplicates.push(DuplicateId { id, occurrences });
            }
        }

        debug!(ids = first.len(), duplicates = duplicates.len(), "Built id index");
        Self { first, duplicates }
    }

    /// First element carrying `id`
    pub fn get(&self, id: &str) -> Option<Node<'a>> {
        self.first.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.first.contains_key(id)
    }

    /// Duplicated ids in order of first appearance
    pub fn duplicates(&self) -> &[DuplicateId<'a>] {
        &self.duplicates
    }

    pub fn len(&self) -> usize {
        self.first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }
}

/// Lowercase tag name
pub fn tag<'a>(el: &Node<'a>) -> &'a str {
    el.value().name()
}

/// Raw attribute value
pub fn attr<'a>(el: &Node<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name)
}

/// Attribute value trimmed, `None` when absent or blank
pub fn attr_nonblank<'a>(el: &Node<'a>, name: &str) -> Option<&'a str> {
    attr(el, name).map(str::trim).filter(|v| !v.is_empty())
}

/// Attribute value lowercased and trimmed
pub fn attr_lower(el: &Node<'_>, name: &str) -> Option<String> {
    attr(el, name).map(|v| v.trim().to_ascii_lowercase())
}

pub fn has_attr(el: &Node<'_>, name: &str) -> bool {
    el.value().attr(name).is_some()
}

/// Descendant text with whitespace collapsed
pub fn text(el: &Node<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

/// Descendant text of `el`, skipping the subtree rooted at `excluded`
pub fn text_excluding<'a>(el: &Node<'a>, excluded: &Node<'a>) -> String {
    text_filtered(el, |a| a == excluded)
}

/// Descendant text, dropping text nodes with an element ancestor matching `skip`
pub fn text_filtered<'a>(el: &Node<'a>, skip: impl Fn(&Node<'a>) -> bool) -> String {
    let raw: String = el
        .descendants()
        .filter_map(|n| {
            let t = n.value().as_text()?;
            let hidden = n.ancestors().filter_map(ElementRef::wrap).any(|a| skip(&a));
            (!hidden).then(|| String::from(&**t))
        })
        .collect();
    collapse_whitespace(&raw)
}

pub fn parent<'a>(el: &Node<'a>) -> Option<Node<'a>> {
    el.parent().and_then(ElementRef::wrap)
}

/// Element ancestors, nearest first
pub fn ancestors<'a>(el: &Node<'a>) -> impl Iterator<Item = Node<'a>> {
    el.ancestors().filter_map(ElementRef::wrap)
}

/// Nearest ancestor whose tag is one of `tags`
pub fn closest<'a>(el: &Node<'a>, tags: &[&str]) -> Option<Node<'a>> {
    ancestors(el).find(|a| tags.contains(&tag(a)))
}

/// Descendant elements (excluding `el`) whose tag is one of `tags`
pub fn descendants_by_tag<'a>(el: &Node<'a>, tags: &[&str]) -> Vec<Node<'a>> {
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|d| tags.contains(&tag(d)))
        .collect()
}

/// Direct child elements
pub fn child_elements<'a>(el: &Node<'a>) -> Vec<Node<'a>> {
    el.children().filter_map(ElementRef::wrap).collect()
}

/// `tag:nth-of-type(k)` segments from `<html>` down to `el`
pub fn css_path(el: &Node<'_>) -> String {
    let mut segments: Vec<String> = std::iter::once(*el)
        .chain(ancestors(el))
        .map(|node| {
            let name = tag(&node);
            let nth = node
                .prev_siblings()
                .filter_map(ElementRef::wrap)
                .filter(|s| tag(s) == name)
                .count()
                + 1;
            format!("{}:nth-of-type({})", name, nth)
        })
        .collect();
    segments.reverse();
    segments.join(" > ")
}

/// First `max` characters of `s`
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Heading level for h1..h6
pub fn heading_level(el: &Node<'_>) -> Option<u8> {
    match tag(el) {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_collapses_whitespace() {
        let doc = Document::parse_str("<p>  Hello \n\t <b>big</b>   world  </p>").unwrap();
        let h = doc.handle();
        let p = h.find_all(&["p"])[0];
        assert_eq!(text(&p), "Hello big world");
    }

    #[test]
    fn test_find_all_document_order() {
        let doc = Document::parse_str("<h2>b</h2><h1>a</h1><h2>c</h2>").unwrap();
        let h = doc.handle();
        let found: Vec<String> = h.find_all(&["h1", "h2"]).iter().map(text).collect();
        assert_eq!(found, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let doc = Document::parse_str(
            r#"<div id="x">one</div><span id="x">two</span><p id="x">three</p><i id="y"></i>"#,
        )
        .unwrap();
        let h = doc.handle();
        let index = h.id_index();
        let first = index.get("x").unwrap();
        assert_eq!(tag(&first), "div");
        assert_eq!(index.duplicates().len(), 1);
        assert_eq!(index.duplicates()[0].occurrences.len(), 3);
        assert!(index.contains("y"));
        assert!(!index.contains(""));
    }

    #[test]
    fn test_css_path() {
        let doc = Document::parse_str("<body><p>a</p><div><p>b</p><p id='t'>c</p></div></body>")
            .unwrap();
        let h = doc.handle();
        let target = h.id_index().get("t").unwrap();
        assert_eq!(
            css_path(&target),
            "html:nth-of-type(1) > body:nth-of-type(1) > div:nth-of-type(1) > p:nth-of-type(2)"
        );
    }

    #[test]
    fn test_snippet_truncated() {
        let doc = Document::parse(b"<p>abcdefghijklmnopqrstuvwxyz</p>", None, 10).unwrap();
        let h = doc.handle();
        let p = h.find_all(&["p"])[0];
        assert_eq!(h.snippet(&p), "<p>abcdefg");
    }

    #[test]
    fn test_decode_latin1() {
        let bytes = b"<meta charset=\"iso-8859-1\"><p>caf\xe9</p>";
        assert!(decode(bytes, None).contains("caf\u{e9}"));
    }

    #[test]
    fn test_decode_invalid_utf8_replaced() {
        let decoded = decode(b"<p>a\xffb</p>", Some("utf-8"));
        assert!(decoded.contains("a\u{fffd}b"));
    }

    #[test]
    fn test_decode_ascii_replaces_high_bytes() {
        let decoded = decode(b"x\xe9y", Some("us-ascii"));
        assert_eq!(decoded, "x\u{fffd}y");
    }

    #[test]
    fn test_unknown_label_falls_back() {
        assert_eq!(decode("héllo".as_bytes(), Some("klingon")), "héllo");
    }

    #[test]
    fn test_text_excluding() {
        let doc = Document::parse_str(r#"<a href="/"><i class="fa fa-home">x</i> Home</a>"#).unwrap();
        let h = doc.handle();
        let a = h.find_all(&["a"])[0];
        let i = h.find_all(&["i"])[0];
        assert_eq!(text_excluding(&a, &i), "Home");
    }

    #[test]
    fn test_id_index_memoized() {
        let doc = Document::parse_str(r#"<p id="a"></p>"#).unwrap();
        let h = doc.handle();
        let first = h.id_index() as *const _;
        let second = h.id_index() as *const _;
        assert_eq!(first, second);
    }
}
