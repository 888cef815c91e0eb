// SPDX-License-Identifier: PMPL-1.0-or-later
//! Forms payload (CL02)
//!
//! Field labels come from the same accessible-name computation the form
//! rules use, so `label_source` here always agrees with FORM_LABEL_001.

use super::{clean, non_empty, Extractor};
use crate::dom::resolve::LabelSource;
use crate::dom::{
    attr, attr_lower, attr_nonblank, closest, css_path, descendants_by_tag, tag, text,
    text_excluding, DocumentHandle, Node,
};
use crate::error::Result;
use crate::finding::Checklist;
use crate::rules::forms::{is_form_control, is_required};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Forms extractor
pub struct FormExtractor;

impl Extractor for FormExtractor {
    fn name(&self) -> &str {
        "Forms Extractor"
    }

    fn checklist(&self) -> Checklist {
        Checklist::CL02
    }

    fn extract(&self, doc: &DocumentHandle<'_>) -> Result<Value> {
        Ok(serde_json::to_value(build(doc))?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormsPayload {
    pub forms: Vec<Form>,
    pub orphan_labels: Vec<OrphanLabel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    pub action: Option<String>,
    pub aria_label: Option<String>,
    pub aria_labelledby_text: Option<String>,
    pub fields: Vec<Field>,
    pub groups: Vec<Group>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    #[serde(rename = "type")]
    pub field_type: String,
    pub id: Option<String>,
    pub name: Option<String>,
    /// Text of the `<label for>` or wrapping label
    pub label: Option<String>,
    pub aria_label: Option<String>,
    pub aria_labelledby_text: Option<String>,
    pub title: Option<String>,
    pub effective_label: Option<String>,
    pub label_source: LabelSource,
    pub placeholder: Option<String>,
    /// Resolved aria-describedby text
    pub instructions: Option<String>,
    pub required: bool,
    pub group_label: Option<String>,
    pub selector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub legend: Option<String>,
    pub input_types: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrphanLabel {
    pub label_text: Option<String>,
    #[serde(rename = "for")]
    pub for_id: String,
    pub target_tag: Option<String>,
}

/// `type` of an input, or the tag for select/textarea
pub fn field_type(el: &Node<'_>) -> String {
    match tag(el) {
        "input" => attr_lower(el, "type")
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "text".to_string()),
        other => other.to_string(),
    }
}

/// Build the typed payload
pub fn build(doc: &DocumentHandle<'_>) -> FormsPayload {
    let forms: Vec<Form> = doc
        .find_all(&["form"])
        .iter()
        .map(|form| build_form(doc, form))
        .filter(|f| !f.fields.is_empty() || !f.groups.is_empty())
        .collect();

    FormsPayload {
        forms,
        orphan_labels: orphan_labels(doc),
    }
}

fn build_form<'a>(doc: &DocumentHandle<'a>, form: &Node<'a>) -> Form {
    let fields = descendants_by_tag(form, &["input", "select", "textarea"])
        .iter()
        .filter(|c| is_form_control(c))
        .map(|c| build_field(doc, c))
        .collect();

    let groups = descendants_by_tag(form, &["fieldset"])
        .iter()
        .map(|fs| Group {
            legend: legend_text(fs),
            input_types: descendants_by_tag(fs, &["input", "select", "textarea"])
                .iter()
                .filter(|c| is_form_control(c))
                .map(field_type)
                .collect(),
        })
        .collect();

    Form {
        action: clean(attr(form, "action")),
        aria_label: clean(attr(form, "aria-label")),
        aria_labelledby_text: doc.referenced_text(attr(form, "aria-labelledby")),
        fields,
        groups,
    }
}

fn legend_text(fieldset: &Node<'_>) -> Option<String> {
    descendants_by_tag(fieldset, &["legend"])
        .first()
        .and_then(|l| non_empty(text(l)))
}

fn build_field<'a>(doc: &DocumentHandle<'a>, control: &Node<'a>) -> Field {
    let name = doc.accessible_name(control);

    let label = match doc.label_for(control) {
        Some(l) => non_empty(text(&l)),
        None => doc
            .wrapping_label(control)
            .and_then(|l| non_empty(text_excluding(&l, control))),
    };

    Field {
        field_type: field_type(control),
        id: attr_nonblank(control, "id").map(str::to_string),
        name: attr_nonblank(control, "name").map(str::to_string),
        label,
        aria_label: clean(attr(control, "aria-label")),
        aria_labelledby_text: doc.referenced_text(attr(control, "aria-labelledby")),
        title: clean(attr(control, "title")),
        effective_label: name.effective_label().map(str::to_string),
        label_source: name.source,
        placeholder: clean(attr(control, "placeholder")),
        instructions: doc.referenced_text(attr(control, "aria-describedby")),
        required: is_required(control),
        group_label: closest(control, &["fieldset"]).and_then(|fs| legend_text(&fs)),
        selector: css_path(control),
    }
}

/// Labels whose `for` target is not a control inside a form
fn orphan_labels(doc: &DocumentHandle<'_>) -> Vec<OrphanLabel> {
    let in_form: HashSet<&str> = doc
        .find_all(&["form"])
        .iter()
        .flat_map(|form| descendants_by_tag(form, &["input", "select", "textarea"]))
        .filter_map(|c| attr_nonblank(&c, "id"))
        .collect();

    doc.find_all(&["label"])
        .iter()
        .filter_map(|label| {
            let for_id = attr_nonblank(label, "for")?;
            if in_form.contains(for_id) {
                return None;
            }
            Some(OrphanLabel {
                label_text: non_empty(text(label)),
                for_id: for_id.to_string(),
                target_tag: doc.id_index().get(for_id).map(|t| tag(&t).to_string()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    fn payload(html: &str) -> FormsPayload {
        let doc = Document::parse_str(html).unwrap();
        let h = doc.handle();
        build(&h)
    }

    #[test]
    fn test_field_labels() {
        let p = payload(
            r#"<form action="/signup" aria-label="Sign up">
<label for="f1">Name</label><input id="f1" name="name" placeholder="Enter name">
<input type="email" placeholder="Email">
<label>Bio <textarea></textarea></label>
<input type="submit">
</form>"#,
        );
        assert_eq!(p.forms.len(), 1);
        let form = &p.forms[0];
        assert_eq!(form.action.as_deref(), Some("/signup"));
        assert_eq!(form.aria_label.as_deref(), Some("Sign up"));
        assert_eq!(form.fields.len(), 3);

        let name = &form.fields[0];
        assert_eq!(name.label_source, LabelSource::LabelFor);
        assert_eq!(name.effective_label.as_deref(), Some("Name"));
        assert_eq!(name.placeholder.as_deref(), Some("Enter name"));

        let email = &form.fields[1];
        assert_eq!(email.field_type, "email");
        assert_eq!(email.label_source, LabelSource::PlaceholderOnly);
        assert_eq!(email.effective_label, None);

        let bio = &form.fields[2];
        assert_eq!(bio.field_type, "textarea");
        assert_eq!(bio.label.as_deref(), Some("Bio"));
        assert_eq!(bio.label_source, LabelSource::WrappingLabel);
    }

    #[test]
    fn test_instructions_and_groups() {
        let p = payload(
            r#"<form><fieldset><legend>Contact</legend>
<input type="tel" aria-label="Phone" aria-describedby="tel-hint" required>
<select aria-label="Country"><option>UK</option></select>
</fieldset><p id="tel-hint">Include area code</p></form>"#,
        );
        let form = &p.forms[0];
        let phone = &form.fields[0];
        assert_eq!(phone.instructions.as_deref(), Some("Include area code"));
        assert!(phone.required);
        assert_eq!(phone.group_label.as_deref(), Some("Contact"));
        assert_eq!(form.groups.len(), 1);
        assert_eq!(form.groups[0].input_types, vec!["tel", "select"]);
    }

    #[test]
    fn test_orphan_labels() {
        let p = payload(
            r#"<label for="q">Search</label><input id="q">
<label for="ghost">Nothing</label>
<form><label for="in">In</label><input id="in"></form>"#,
        );
        assert_eq!(p.orphan_labels.len(), 2);
        assert_eq!(p.orphan_labels[0].target_tag.as_deref(), Some("input"));
        assert_eq!(p.orphan_labels[1].target_tag, None);
    }

    #[test]
    fn test_empty_forms_dropped() {
        let p = payload(r#"<form><button>Go</button></form>"#);
        assert!(p.forms.is_empty());
    }

    #[test]
    fn test_field_keys_always_present() {
        let doc = Document::parse_str("<form><input></form>").unwrap();
        let h = doc.handle();
        let value = FormExtractor.extract(&h).unwrap();
        let field = value["forms"][0]["fields"][0].as_object().unwrap();
        for key in [
            "type", "id", "name", "label", "aria_label", "aria_labelledby_text", "title",
            "effective_label", "label_source", "placeholder", "instructions", "required",
            "group_label", "selector",
        ] {
            assert!(field.contains_key(key), "{}", key);
        }
        assert_eq!(field["label_source"], "none");
    }
}
