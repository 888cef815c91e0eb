// SPDX-License-Identifier: PMPL-1.0-or-later
//! Non-text content payload (CL03) - images, SVG, icon fonts and media.
//!
//! Images are partitioned by alt status into `informative`, `decorative`
//! and `missing`. `actionable` and `complex` are context lists: an image
//! joins them in addition to its alt-status list.

use super::{basename, clean, clip, non_empty, Extractor};
use crate::dom::{
    attr, attr_lower, attr_nonblank, closest, css_path, descendants_by_tag, has_attr, parent, tag,
    text, text_excluding, DocumentHandle, Node,
};
use crate::error::Result;
use crate::finding::Checklist;
use crate::rules::nontext::INTERACTIVE_PARENTS;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Icon font class prefixes (Font Awesome 4-6, Elementor, Dashicons, Glyphicons)
static ICON_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(fa|fas|far|fab|fal|fad|fa-|eicon|dashicons|glyphicon)\b").expect("valid regex")
});

/// Hints that an image is a chart, diagram or similar
static COMPLEX_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(chart|graph|diagram|infographic|figure|map|plot)").expect("valid regex")
});

static ALT_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(jpe?g|png|gif|svg|webp|bmp|ico)$").expect("valid regex"));

static ALT_REDUNDANT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(image of|photo of|picture of|graphic of|icon of|screenshot of)")
        .expect("valid regex")
});

const MAX_ALT_CHARS: usize = 150;
const MAX_SRC_NAME: usize = 60;
const MAX_URL: usize = 80;
const MAX_SURROUNDING: usize = 100;
const MAX_SIBLING_TEXT: usize = 80;
const ICON_KEY_CLASSES: usize = 60;
const ICON_CLASSES: usize = 80;

/// Non-text content extractor
pub struct NonTextExtractor;

impl Extractor for NonTextExtractor {
    fn name(&self) -> &str {
        "Non-text Content Extractor"
    }

    fn checklist(&self) -> Checklist {
        Checklist::CL03
    }

    fn extract(&self, doc: &DocumentHandle<'_>) -> Result<Value> {
        Ok(serde_json::to_value(build(doc))?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonTextPayload {
    pub images: Images,
    pub svgs: Vec<Svg>,
    pub icon_fonts: Vec<IconFont>,
    pub media: Vec<Media>,
}

/// Images bucketed by alt state. `informative`, `decorative` and `missing`
/// partition every `<img>`; `actionable` and `complex` are overlays, so an
/// image inside a link or hinting at a chart also sits in its alt bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Images {
    pub informative: Vec<ImageEntry>,
    pub decorative: Vec<ImageEntry>,
    pub missing: Vec<ImageEntry>,
    pub actionable: Vec<ImageEntry>,
    pub complex: Vec<ImageEntry>,
}

/// Programmatic alt-text quality flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AltFlag {
    LooksLikeFilename,
    RedundantPhrase,
    TooLong,
}

/// Interactive ancestor of an image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageContext {
    InLink,
    InButton,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub alt_flags: Vec<AltFlag>,
    pub selector: String,
    pub context: Option<ImageContext>,
    pub interactive_text: Option<String>,
    pub interactive_aria_label: Option<String>,
    pub link_href: Option<String>,
    pub aria_describedby_text: Option<String>,
    pub longdesc: Option<String>,
    pub surrounding_text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Svg {
    pub role: Option<String>,
    pub aria_label: Option<String>,
    pub aria_labelledby_text: Option<String>,
    pub title: Option<String>,
    pub desc: Option<String>,
    pub selector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconFont {
    pub classes: String,
    pub aria_hidden: bool,
    pub aria_label: Option<String>,
    pub visible_text: Option<String>,
    pub sibling_text: Option<String>,
    /// Icon is the only content of its link or button
    pub sole_content: bool,
    pub selector: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Video,
    Audio,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Media {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub src: Option<String>,
    pub has_controls: bool,
    pub autoplay: bool,
    pub tracks: Vec<Track>,
    pub aria_label: Option<String>,
    pub selector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub kind: Option<String>,
    pub label: Option<String>,
    pub srclang: Option<String>,
}

/// Quality flags for non-empty alt text
pub fn alt_flags(alt: &str) -> Vec<AltFlag> {
    let mut flags = Vec::new();
    if ALT_FILENAME.is_match(alt) {
        flags.push(AltFlag::LooksLikeFilename);
    }
    if ALT_REDUNDANT.is_match(alt) {
        flags.push(AltFlag::RedundantPhrase);
    }
    if alt.chars().count() > MAX_ALT_CHARS {
        flags.push(AltFlag::TooLong);
    }
    flags
}

/// Whether src or class hints at a chart or diagram
pub fn is_complex(img: &Node<'_>) -> bool {
    [attr(img, "src"), attr(img, "class")]
        .into_iter()
        .flatten()
        .any(|v| COMPLEX_HINT.is_match(v))
}

pub fn is_icon_font(el: &Node<'_>) -> bool {
    attr(el, "class").is_some_and(|c| ICON_CLASS.is_match(c))
}

/// Build the typed payload
pub fn build(doc: &DocumentHandle<'_>) -> NonTextPayload {
    NonTextPayload {
        images: images(doc),
        svgs: svgs(doc),
        icon_fonts: icon_fonts(doc),
        media: media(doc),
    }
}

/// Every image lands in exactly one alt bucket, plus the overlays it matches
fn images(doc: &DocumentHandle<'_>) -> Images {
    let mut images = Images::default();

    for img in doc.find_all(&["img"]) {
        let raw_alt = attr(&img, "alt");
        let alt = clean(raw_alt);
        let interactive = closest(&img, INTERACTIVE_PARENTS);

        let entry = ImageEntry {
            src: attr_nonblank(&img, "src").map(|s| basename(s, MAX_SRC_NAME)),
            alt_flags: alt.as_deref().map(alt_flags).unwrap_or_default(),
            alt,
            selector: css_path(&img),
            context: interactive.map(|i| match tag(&i) {
                "a" => ImageContext::InLink,
                _ => ImageContext::InButton,
            }),
            interactive_text: interactive.and_then(|i| non_empty(text(&i))),
            interactive_aria_label: interactive.and_then(|i| clean(attr(&i, "aria-label"))),
            link_href: interactive
                .filter(|i| tag(i) == "a")
                .and_then(|i| attr_nonblank(&i, "href"))
                .map(|h| clip(h, MAX_URL)),
            aria_describedby_text: doc.referenced_text(attr(&img, "aria-describedby")),
            longdesc: clean(attr(&img, "longdesc")),
            surrounding_text: parent(&img).and_then(|p| non_empty(clip(&text(&p), MAX_SURROUNDING))),
        };

        if interactive.is_some() {
            images.actionable.push(entry.clone());
        }
        if is_complex(&img) {
            images.complex.push(entry.clone());
        }

        match raw_alt {
            None => images.missing.push(entry),
            Some(_) if entry.alt.is_none() => images.decorative.push(entry),
            Some(_) => images.informative.push(entry),
        }
    }

    images
}

fn svgs(doc: &DocumentHandle<'_>) -> Vec<Svg> {
    doc.find_all(&["svg"])
        .iter()
        .filter(|svg| attr_lower(svg, "aria-hidden").as_deref() != Some("true"))
        .map(|svg| Svg {
            role: clean(attr(svg, "role")),
            aria_label: clean(attr(svg, "aria-label")),
            aria_labelledby_text: doc.referenced_text(attr(svg, "aria-labelledby")),
            title: descendants_by_tag(svg, &["title"]).first().and_then(|t| non_empty(text(t))),
            desc: descendants_by_tag(svg, &["desc"]).first().and_then(|d| non_empty(text(d))),
            selector: css_path(svg),
        })
        .collect()
}

fn icon_fonts(doc: &DocumentHandle<'_>) -> Vec<IconFont> {
    let mut seen = HashSet::new();
    let mut icons = Vec::new();

    for el in doc.find_where(|el| matches!(tag(el), "i" | "span") && is_icon_font(el)) {
        let classes = crate::dom::collapse_whitespace(attr(&el, "class").unwrap_or_default());
        let aria_hidden = attr_lower(&el, "aria-hidden").as_deref() == Some("true");
        let aria_label = clean(attr(&el, "aria-label"));

        let key = (clip(&classes, ICON_KEY_CLASSES), aria_hidden, aria_label.clone());
        if !seen.insert(key) {
            continue;
        }

        let sole_content = closest(&el, INTERACTIVE_PARENTS)
            .is_some_and(|i| text_excluding(&i, &el).is_empty());

        icons.push(IconFont {
            classes: clip(&classes, ICON_CLASSES),
            aria_hidden,
            aria_label,
            visible_text: non_empty(text(&el)),
            sibling_text: parent(&el).and_then(|p| non_empty(clip(&text(&p), MAX_SIBLING_TEXT))),
            sole_content,
            selector: css_path(&el),
        });
    }

    icons
}

fn tracks(el: &Node<'_>) -> Vec<Track> {
    descendants_by_tag(el, &["track"])
        .iter()
        .map(|t| Track {
            kind: clean(attr(t, "kind")),
            label: clean(attr(t, "label")),
            srclang: clean(attr(t, "srclang")),
        })
        .collect()
}

fn media(doc: &DocumentHandle<'_>) -> Vec<Media> {
    doc.find_all(&["video", "audio"])
        .iter()
        .map(|el| {
            let src = attr_nonblank(el, "src").or_else(|| {
                descendants_by_tag(el, &["source"])
                    .first()
                    .and_then(|s| attr_nonblank(s, "src"))
            });
            Media {
                kind: if tag(el) == "video" { MediaKind::Video } else { MediaKind::Audio },
                src: src.map(|s| clip(s, MAX_URL)),
                has_controls: has_attr(el, "controls"),
                autoplay: has_attr(el, "autoplay"),
                tracks: tracks(el),
                aria_label: clean(attr(el, "aria-label")),
                selector: css_path(el),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn payload(html: &str) -> NonTextPayload {
        let doc = Document::parse_str(html).unwrap();
        let h = doc.handle();
        build(&h)
    }

    #[test]
    fn test_alt_partition() {
        let p = payload(
            r#"<img src="a.png" alt=""><img src="b.png" alt="   "><img src="c.png"><img src="d.png" alt="A dog">"#,
        );
        assert_eq!(p.images.decorative.len(), 2);
        assert_eq!(p.images.missing.len(), 1);
        assert_eq!(p.images.informative.len(), 1);
        assert!(p.images.decorative.iter().all(|e| e.alt.is_none() && e.alt_flags.is_empty()));
    }

    #[test]
    fn test_actionable_context() {
        let p = payload(r##"<a href="#"><img src="x.png"></a><button aria-label="Play"><img src="play.svg" alt="Play"></button>"##);
        assert_eq!(p.images.actionable.len(), 2);
        assert_eq!(p.images.actionable[0].context, Some(ImageContext::InLink));
        assert_eq!(p.images.actionable[0].link_href.as_deref(), Some("#"));
        assert_eq!(p.images.actionable[1].context, Some(ImageContext::InButton));
        assert_eq!(p.images.actionable[1].interactive_aria_label.as_deref(), Some("Play"));
        assert_eq!(p.images.missing.len(), 1);
    }

    #[test]
    fn test_complex_hint() {
        let p = payload(r#"<img src="/img/SalesChart.png" alt="Sales"><img class="org-diagram" src="x.png" alt="Org"><img src="cat.png" alt="Cat">"#);
        assert_eq!(p.images.complex.len(), 2);
        assert_eq!(p.images.informative.len(), 3);
    }

    #[test]
    fn test_overlays_keep_alt_bucket() {
        let p = payload(
            r#"<a href="/home"><img src="logo.png" alt="Home"></a><button><img src="x.png" alt=""></button><img src="flow-diagram.png">"#,
        );
        assert_eq!(p.images.actionable.len(), 2);
        assert_eq!(p.images.complex.len(), 1);

        let alt_buckets = p.images.informative.len() + p.images.decorative.len() + p.images.missing.len();
        assert_eq!(alt_buckets, 3);
        assert_eq!(p.images.informative[0].alt.as_deref(), Some("Home"));
        assert_eq!(p.images.informative[0].context, Some(ImageContext::InLink));
        assert_eq!(p.images.decorative[0].context, Some(ImageContext::InButton));
        assert_eq!(p.images.missing[0].selector, p.images.complex[0].selector);
    }

    #[test]
    fn test_alt_flags() {
        assert_eq!(alt_flags("IMG_0042.JPG"), vec![AltFlag::LooksLikeFilename]);
        assert_eq!(alt_flags("Image of a cat"), vec![AltFlag::RedundantPhrase]);
        assert_eq!(alt_flags(&"x".repeat(151)), vec![AltFlag::TooLong]);
        assert!(alt_flags("A tabby cat asleep on a sofa").is_empty());
    }

    #[test]
    fn test_icon_fonts() {
        let p = payload(
            r#"<a href="/"><i class="fa fa-home"></i></a>
<a href="/cart"><i class="fa fa-cart" aria-hidden="true"></i> Cart</a>
<a href="/x"><i class="fa fa-home"></i></a>
<span class="label">not an icon</span>"#,
        );
        assert_eq!(p.icon_fonts.len(), 2);
        assert!(p.icon_fonts[0].sole_content);
        assert!(!p.icon_fonts[1].sole_content);
        assert!(p.icon_fonts[1].aria_hidden);
    }

    #[test]
    fn test_svgs_and_media() {
        let p = payload(
            r#"<svg role="img" aria-label="Logo"><title>Acme</title></svg><svg aria-hidden="true"></svg>
<video controls><source src="intro.mp4"><track kind="captions" srclang="en" label="English"></video>
<audio src="pod.mp3" autoplay></audio>"#,
        );
        assert_eq!(p.svgs.len(), 1);
        assert_eq!(p.svgs[0].title.as_deref(), Some("Acme"));
        assert_eq!(p.media.len(), 2);
        assert_eq!(p.media[0].src.as_deref(), Some("intro.mp4"));
        assert_eq!(p.media[0].tracks[0].kind.as_deref(), Some("captions"));
        assert_eq!(p.media[1].kind, MediaKind::Audio);
        assert!(p.media[1].autoplay);
        assert!(!p.media[1].has_controls);
    }
}
