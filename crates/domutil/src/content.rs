//! Content update.
//!
//! One operation, three content forms. Form inputs take any content as
//! their value (never as markup); everything else branches on the form:
//! markup replaces the child subtree through the parser, text becomes a
//! single verbatim text node, and an option list is coerced into
//! `<option>` children for selection controls.

use crate::error::Result;
use crate::target::{resolve, Target};
use dom::{Document, NodeId, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Html(String),
    Text(String),
    Options(Vec<SelectOption>),
}

impl Content {
    pub fn html(markup: impl Into<String>) -> Self {
        Content::Html(markup.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Content::Text(text.into())
    }

    pub fn options<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SelectOption>,
    {
        Content::Options(items.into_iter().map(Into::into).collect())
    }
}

/// One entry of a selection-control list: a bare value, or a value with a
/// separate display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: Option<String>,
}

impl SelectOption {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: None,
        }
    }

    pub fn labeled(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: Some(label.into()),
        }
    }
}

impl From<&str> for SelectOption {
    fn from(value: &str) -> Self {
        SelectOption::new(value)
    }
}

impl From<(&str, &str)> for SelectOption {
    fn from((value, label): (&str, &str)) -> Self {
        SelectOption::labeled(value, label)
    }
}

/// Replace a node's content. Returns the resolved node.
pub fn update<'a>(
    doc: &mut Document,
    target: impl Into<Target<'a>>,
    content: Content,
) -> Result<NodeId> {
    let id = resolve(doc, target, None)?;

    if doc.get(id)?.is_form_input() {
        let value = match &content {
            Content::Html(s) | Content::Text(s) => s.clone(),
            Content::Options(items) => items
                .iter()
                .map(|o| o.value.as_str())
                .collect::<Vec<_>>()
                .join(","),
        };
        doc.get_mut(id)?.set_attr("value", &value);
        return Ok(id);
    }

    match content {
        Content::Html(markup) => doc.set_markup(id, &markup)?,
        Content::Text(text) => doc.set_text(id, &text)?,
        Content::Options(items) => {
            doc.clear_children(id)?;
            for item in items {
                let option = doc.create_element("option");
                doc.get_mut(option)?.set_attr("value", &item.value);
                let label = item.label.as_deref().unwrap_or(&item.value);
                doc.set_text(option, label)?;
                doc.insert(option, id, Position::BeforeEnd)?;
            }
        }
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::serializer::outer_markup;

    #[test]
    fn test_text_update_is_exact_and_uninterpreted() {
        let mut doc = Document::parse("<div id=\"out\"><b>old</b></div>").unwrap();
        let out = update(&mut doc, "#out", Content::text("<b>X</b> & more")).unwrap();

        assert_eq!(doc.text_content(out).unwrap(), "<b>X</b> & more");
        // no element was created from the markup-significant characters
        assert_eq!(doc.get(out).unwrap().children_ids.len(), 1);
        assert_eq!(
            outer_markup(&doc, out).unwrap(),
            "<div id=\"out\">&lt;b&gt;X&lt;/b&gt; &amp; more</div>"
        );
    }

    #[test]
    fn test_html_update_replaces_subtree() {
        let mut doc = Document::parse("<div id=\"out\">old</div>").unwrap();
        let out = update(&mut doc, "#out", Content::html("<p>a</p><p>b</p>")).unwrap();

        assert_eq!(doc.query_all(out, "p").unwrap().len(), 2);
        assert_eq!(doc.text_content(out).unwrap(), "ab");
    }

    #[test]
    fn test_input_value_is_never_markup() {
        let mut doc = Document::parse("<input id=\"q\" value=\"old\">").unwrap();
        let q = update(&mut doc, "#q", Content::html("<b>new</b>")).unwrap();

        assert_eq!(doc.get(q).unwrap().attr("value"), Some("<b>new</b>"));
        assert!(doc.get(q).unwrap().children_ids.is_empty());
    }

    #[test]
    fn test_select_option_coercion() {
        let mut doc = Document::parse("<select id=\"pick\"></select>").unwrap();
        let pick = update(
            &mut doc,
            "#pick",
            Content::Options(vec![
                SelectOption::new("1"),
                SelectOption::labeled("2", "two"),
            ]),
        )
        .unwrap();

        let options = doc.query_all(pick, "option").unwrap();
        assert_eq!(options.len(), 2);
        assert_eq!(doc.get(options[0]).unwrap().attr("value"), Some("1"));
        assert_eq!(doc.text_content(options[0]).unwrap(), "1");
        assert_eq!(doc.get(options[1]).unwrap().attr("value"), Some("2"));
        assert_eq!(doc.text_content(options[1]).unwrap(), "two");
    }

    #[test]
    fn test_update_replaces_previous_options() {
        let mut doc =
            Document::parse("<select id=\"pick\"><option value=\"z\">z</option></select>").unwrap();
        let pick = update(&mut doc, "#pick", Content::options(["a", "b"])).unwrap();
        assert_eq!(doc.query_all(pick, "option").unwrap().len(), 2);
    }
}
