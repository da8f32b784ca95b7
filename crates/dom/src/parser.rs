//! Byte-cursor markup parser.
//!
//! Produces detached fragment roots inside an existing document arena, so
//! both full-document parsing and fragment insertion share one code path.
//! Recovery is lenient: a mismatched end tag pops the open-element stack
//! until it finds its partner instead of failing the whole parse.

use crate::arena::{Document, Position};
use crate::error::{DomError, Result};
use crate::types::{is_void_tag, NodeId};
use std::collections::HashMap;

/// Parse a markup fragment into detached nodes of `doc`, returning the
/// top-level node ids in source order. Nested nodes are already attached
/// to their fragment parents.
pub fn parse_fragment(doc: &mut Document, markup: &str) -> Result<Vec<NodeId>> {
    let bytes = markup.as_bytes();
    let mut roots = Vec::new();
    let mut stack: Vec<NodeId> = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        if markup[i..].starts_with("<!--") {
            let end = markup[i + 4..]
                .find("-->")
                .ok_or_else(|| DomError::ParseError("unclosed comment".to_string()))?;
            let comment = doc.create_comment(&markup[i + 4..i + 4 + end]);
            attach(doc, &stack, &mut roots, comment)?;
            i += 4 + end + 3;
            continue;
        }

        if markup[i..].starts_with("<!") {
            // doctype and friends carry no tree content
            while i < bytes.len() && bytes[i] != b'>' {
                i += 1;
            }
            i = (i + 1).min(bytes.len());
            continue;
        }

        if markup[i..].starts_with("</") {
            let (tag, next) = parse_end_tag(markup, i)?;
            i = next;
            while let Some(top) = stack.pop() {
                let matched = doc
                    .get(top)?
                    .tag_name()
                    .is_some_and(|t| t.eq_ignore_ascii_case(&tag));
                if matched {
                    break;
                }
            }
            continue;
        }

        if bytes[i] == b'<' && bytes.get(i + 1).is_some_and(u8::is_ascii_alphabetic) {
            let (tag, attrs, self_closing, next) = parse_start_tag(markup, i)?;
            i = next;

            let node = doc.create_element(&tag);
            doc.get_mut(node)?.attributes = attrs;
            attach(doc, &stack, &mut roots, node)?;

            // script and style bodies are raw text up to the close tag
            if tag == "script" || tag == "style" {
                let close_rel = markup[i..]
                    .to_ascii_lowercase()
                    .find(&format!("</{}", tag))
                    .ok_or_else(|| DomError::ParseError(format!("unclosed <{}>", tag)))?;
                let body = &markup[i..i + close_rel];
                if !body.is_empty() {
                    let text = doc.create_text(body);
                    doc.insert(text, node, Position::BeforeEnd)?;
                }
                let (_, after) = parse_end_tag(markup, i + close_rel)?;
                i = after;
                continue;
            }

            if !self_closing && !is_void_tag(&tag) {
                stack.push(node);
            }
            continue;
        }

        // text run; a '<' that opens no recognizable construct is text too
        let start = i;
        i += 1;
        while i < bytes.len() && !at_markup_boundary(bytes, i) {
            i += 1;
        }
        let text = &markup[start..i];
        if !text.is_empty() && (!stack.is_empty() || !text.trim().is_empty()) {
            let node = doc.create_text(&decode_entities(text));
            attach(doc, &stack, &mut roots, node)?;
        }
    }

    Ok(roots)
}

/// Attach to the innermost open element, or record as a fragment root.
fn attach(
    doc: &mut Document,
    stack: &[NodeId],
    roots: &mut Vec<NodeId>,
    node: NodeId,
) -> Result<()> {
    match stack.last() {
        Some(&parent) => doc.insert(node, parent, Position::BeforeEnd),
        None => {
            roots.push(node);
            Ok(())
        }
    }
}

fn at_markup_boundary(bytes: &[u8], i: usize) -> bool {
    bytes[i] == b'<'
        && matches!(bytes.get(i + 1), Some(c) if c.is_ascii_alphabetic() || *c == b'/' || *c == b'!')
}

fn parse_start_tag(markup: &str, at: usize) -> Result<(String, HashMap<String, String>, bool, usize)> {
    let bytes = markup.as_bytes();
    let mut i = at + 1; // past '<'

    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    let tag = markup[tag_start..i].to_ascii_lowercase();
    if tag.is_empty() {
        return Err(DomError::ParseError("empty tag name".to_string()));
    }

    let mut attrs = HashMap::new();
    let mut self_closing = false;

    loop {
        skip_ws(bytes, &mut i);
        if i >= bytes.len() {
            return Err(DomError::ParseError(format!("unclosed <{}> start tag", tag)));
        }
        if bytes[i] == b'>' {
            i += 1;
            break;
        }
        if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'>') {
            self_closing = true;
            i += 2;
            break;
        }

        let name_start = i;
        while i < bytes.len() && is_attr_name_char(bytes[i]) {
            i += 1;
        }
        let name = markup[name_start..i].to_ascii_lowercase();
        if name.is_empty() {
            return Err(DomError::ParseError(format!(
                "invalid attribute in <{}>",
                tag
            )));
        }

        skip_ws(bytes, &mut i);
        let value = if bytes.get(i) == Some(&b'=') {
            i += 1;
            skip_ws(bytes, &mut i);
            parse_attr_value(markup, &mut i)?
        } else {
            // bare boolean attribute
            "true".to_string()
        };
        attrs.insert(name, value);
    }

    Ok((tag, attrs, self_closing, i))
}

fn parse_end_tag(markup: &str, at: usize) -> Result<(String, usize)> {
    let bytes = markup.as_bytes();
    let mut i = at + 2; // past '</'
    skip_ws(bytes, &mut i);

    let tag_start = i;
    while i < bytes.len() && is_tag_char(bytes[i]) {
        i += 1;
    }
    let tag = markup[tag_start..i].to_ascii_lowercase();

    while i < bytes.len() && bytes[i] != b'>' {
        i += 1;
    }
    if i >= bytes.len() {
        return Err(DomError::ParseError("unclosed end tag".to_string()));
    }
    Ok((tag, i + 1))
}

fn parse_attr_value(markup: &str, i: &mut usize) -> Result<String> {
    let bytes = markup.as_bytes();
    if *i >= bytes.len() {
        return Err(DomError::ParseError("missing attribute value".to_string()));
    }

    if bytes[*i] == b'\'' || bytes[*i] == b'"' {
        let quote = bytes[*i];
        *i += 1;
        let start = *i;
        while *i < bytes.len() && bytes[*i] != quote {
            *i += 1;
        }
        if *i >= bytes.len() {
            return Err(DomError::ParseError(
                "unclosed quoted attribute value".to_string(),
            ));
        }
        let value = decode_entities(&markup[start..*i]);
        *i += 1;
        return Ok(value);
    }

    let start = *i;
    while *i < bytes.len()
        && !bytes[*i].is_ascii_whitespace()
        && bytes[*i] != b'>'
        && !(bytes[*i] == b'/' && bytes.get(*i + 1) == Some(&b'>'))
    {
        *i += 1;
    }
    Ok(decode_entities(&markup[start..*i]))
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

fn is_tag_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-'
}

fn is_attr_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'-' || c == b'_' || c == b':'
}

/// Decode the named references plus decimal `&#NN;` forms. An ampersand
/// that opens no known reference passes through verbatim.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let semi = rest.find(';').filter(|&s| (2..=10).contains(&s));
        let decoded = semi.and_then(|s| {
            let entity = &rest[1..s];
            match entity {
                "amp" => Some(('&', s)),
                "lt" => Some(('<', s)),
                "gt" => Some(('>', s)),
                "quot" => Some(('"', s)),
                "apos" => Some(('\'', s)),
                _ => entity
                    .strip_prefix('#')
                    .and_then(|d| d.parse::<u32>().ok())
                    .and_then(char::from_u32)
                    .map(|c| (c, s)),
            }
        });
        match decoded {
            Some((c, s)) => {
                out.push(c);
                rest = &rest[s + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
