//! Structural selector engine.
//!
//! Grammar: tag names, `*`, `#id`, `.class`, `[attr]`, `[attr=value]`,
//! `[attr~=value]`, compound steps, descendant and `>` combinators, and
//! comma-separated groups. Matching runs right-to-left along the
//! combinator chain; results come back in document order.

use crate::arena::Document;
use crate::error::{DomError, Result};
use crate::types::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    /// `~=`: whitespace-token membership.
    Includes { key: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SelectorStep {
    tag: Option<String>,
    universal: bool,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrCondition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SelectorPart {
    step: SelectorStep,
    /// Relation to the previous (left) part.
    combinator: Option<Combinator>,
}

impl Document {
    /// First descendant of `scope` matching `selector`, in document order.
    pub fn query_first(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        Ok(self.scan(scope, &groups).into_iter().next())
    }

    /// All descendants of `scope` matching `selector`, in document order.
    pub fn query_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        Ok(self.scan(scope, &groups))
    }

    fn scan(&self, scope: NodeId, groups: &[Vec<SelectorPart>]) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&id| self.get(id).map(|n| n.is_element()).unwrap_or(false))
            .filter(|&id| groups.iter().any(|chain| self.matches_chain(id, chain)))
            .collect()
    }

    fn matches_chain(&self, node_id: NodeId, chain: &[SelectorPart]) -> bool {
        let Some(last) = chain.last() else {
            return false;
        };
        if !self.matches_step(node_id, &last.step) {
            return false;
        }

        let mut current = node_id;
        for idx in (1..chain.len()).rev() {
            let prev_step = &chain[idx - 1].step;
            let combinator = chain[idx].combinator.unwrap_or(Combinator::Descendant);

            let matched = match combinator {
                Combinator::Child => self
                    .parent_of(current)
                    .filter(|&parent| self.matches_step(parent, prev_step)),
                Combinator::Descendant => {
                    let mut cursor = self.parent_of(current);
                    let mut found = None;
                    while let Some(parent) = cursor {
                        if self.matches_step(parent, prev_step) {
                            found = Some(parent);
                            break;
                        }
                        cursor = self.parent_of(parent);
                    }
                    found
                }
            };

            let Some(matched) = matched else {
                return false;
            };
            current = matched;
        }
        true
    }

    fn matches_step(&self, node_id: NodeId, step: &SelectorStep) -> bool {
        let Ok(node) = self.get(node_id) else {
            return false;
        };
        if !node.is_element() {
            return false;
        }

        if let Some(tag) = &step.tag {
            if !node.node_name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &step.id {
            if node.attr("id") != Some(id) {
                return false;
            }
        }
        if step.classes.iter().any(|class| !node.has_class(class)) {
            return false;
        }
        step.attrs.iter().all(|cond| match cond {
            AttrCondition::Exists { key } => node.attr(key).is_some(),
            AttrCondition::Eq { key, value } => node.attr(key) == Some(value),
            AttrCondition::Includes { key, value } => node
                .attr(key)
                .is_some_and(|v| v.split_whitespace().any(|token| token == value)),
        })
    }
}

fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    split_top_level(selector, ',')?
        .into_iter()
        .map(|group| parse_selector_chain(&group, selector))
        .collect()
}

fn parse_selector_chain(group: &str, original: &str) -> Result<Vec<SelectorPart>> {
    let mut chain = Vec::new();
    let mut pending: Option<Combinator> = None;

    for token in tokenize_chain(group, original)? {
        if token == ">" {
            if pending.is_some() || chain.is_empty() {
                return Err(DomError::InvalidSelector(original.to_string()));
            }
            pending = Some(Combinator::Child);
            continue;
        }
        let combinator = if chain.is_empty() {
            None
        } else {
            Some(pending.take().unwrap_or(Combinator::Descendant))
        };
        chain.push(SelectorPart {
            step: parse_step(&token, original)?,
            combinator,
        });
    }

    if chain.is_empty() || pending.is_some() {
        return Err(DomError::InvalidSelector(original.to_string()));
    }
    Ok(chain)
}

/// Split a chain into compound-step tokens and `>` combinators.
fn tokenize_chain(group: &str, original: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in group.chars() {
        match c {
            '"' | '\'' if quote == Some(c) => {
                quote = None;
                current.push(c);
            }
            '"' | '\'' if quote.is_none() && depth > 0 => {
                quote = Some(c);
                current.push(c);
            }
            '[' if quote.is_none() => {
                depth += 1;
                current.push(c);
            }
            ']' if quote.is_none() => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| DomError::InvalidSelector(original.to_string()))?;
                current.push(c);
            }
            c if c.is_whitespace() && quote.is_none() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            '>' if quote.is_none() && depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
                tokens.push(">".to_string());
            }
            _ => current.push(c),
        }
    }
    if depth != 0 || quote.is_some() {
        return Err(DomError::InvalidSelector(original.to_string()));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Split on a separator, ignoring occurrences inside brackets or quotes.
fn split_top_level(selector: &str, sep: char) -> Result<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    for c in selector.chars() {
        match c {
            '"' | '\'' if quote == Some(c) => quote = None,
            '"' | '\'' if quote.is_none() => quote = Some(c),
            '[' if quote.is_none() => depth += 1,
            ']' if quote.is_none() => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| DomError::InvalidSelector(selector.to_string()))?;
            }
            _ => {}
        }
        if c == sep && depth == 0 && quote.is_none() {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    parts.push(current);

    for part in &parts {
        if part.trim().is_empty() {
            return Err(DomError::InvalidSelector(selector.to_string()));
        }
    }
    Ok(parts)
}

fn parse_step(token: &str, original: &str) -> Result<SelectorStep> {
    let mut step = SelectorStep::default();
    let chars: Vec<char> = token.chars().collect();
    let mut i = 0usize;

    // optional leading tag or universal
    if i < chars.len() && chars[i] == '*' {
        step.universal = true;
        i += 1;
    } else if i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '-') {
        let start = i;
        while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '-') {
            i += 1;
        }
        step.tag = Some(chars[start..i].iter().collect::<String>().to_ascii_lowercase());
    }

    while i < chars.len() {
        match chars[i] {
            '#' => {
                let (name, next) = take_name(&chars, i + 1);
                if name.is_empty() {
                    return Err(DomError::InvalidSelector(original.to_string()));
                }
                step.id = Some(name);
                i = next;
            }
            '.' => {
                let (name, next) = take_name(&chars, i + 1);
                if name.is_empty() {
                    return Err(DomError::InvalidSelector(original.to_string()));
                }
                step.classes.push(name);
                i = next;
            }
            '[' => {
                let close = chars[i..]
                    .iter()
                    .position(|&c| c == ']')
                    .ok_or_else(|| DomError::InvalidSelector(original.to_string()))?;
                let inner: String = chars[i + 1..i + close].iter().collect();
                step.attrs.push(parse_attr_condition(inner.trim(), original)?);
                i += close + 1;
            }
            _ => return Err(DomError::InvalidSelector(original.to_string())),
        }
    }

    if !step.universal
        && step.tag.is_none()
        && step.id.is_none()
        && step.classes.is_empty()
        && step.attrs.is_empty()
    {
        return Err(DomError::InvalidSelector(original.to_string()));
    }
    Ok(step)
}

fn take_name(chars: &[char], from: usize) -> (String, usize) {
    let mut i = from;
    while i < chars.len()
        && (chars[i].is_ascii_alphanumeric() || chars[i] == '-' || chars[i] == '_')
    {
        i += 1;
    }
    (chars[from..i].iter().collect(), i)
}

fn parse_attr_condition(inner: &str, original: &str) -> Result<AttrCondition> {
    let invalid = || DomError::InvalidSelector(original.to_string());

    if let Some((key, value)) = inner.split_once("~=") {
        return Ok(AttrCondition::Includes {
            key: attr_key(key).ok_or_else(invalid)?,
            value: unquote(value.trim()).to_string(),
        });
    }
    if let Some((key, value)) = inner.split_once('=') {
        return Ok(AttrCondition::Eq {
            key: attr_key(key).ok_or_else(invalid)?,
            value: unquote(value.trim()).to_string(),
        });
    }
    Ok(AttrCondition::Exists {
        key: attr_key(inner).ok_or_else(invalid)?,
    })
}

fn attr_key(raw: &str) -> Option<String> {
    let key = raw.trim();
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':');
    valid.then(|| key.to_ascii_lowercase())
}

fn unquote(value: &str) -> &str {
    let stripped = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')));
    stripped.unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::parse(concat!(
            "<div id=\"menu\" class=\"nav main\">",
            "<ul><li class=\"item\">one</li><li class=\"item sel\">two</li></ul>",
            "</div>",
            "<form><input type=\"checkbox\" name=\"a\" checked>",
            "<input type=\"text\" name=\"b\"></form>",
        ))
        .unwrap()
    }

    fn tags(doc: &Document, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| doc.get(id).unwrap().node_name.clone())
            .collect()
    }

    #[test]
    fn test_query_by_id_and_class() {
        let doc = sample();
        let root = doc.root_id();
        let menu = doc.query_first(root, "#menu").unwrap().unwrap();
        assert_eq!(doc.get(menu).unwrap().tag_name(), Some("div"));

        let items = doc.query_all(root, ".item").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(doc.query_all(root, "li.item.sel").unwrap().len(), 1);
    }

    #[test]
    fn test_query_by_attribute() {
        let doc = sample();
        let root = doc.root_id();
        assert_eq!(doc.query_all(root, "input[checked]").unwrap().len(), 1);
        assert_eq!(
            doc.query_all(root, "input[type=\"text\"]").unwrap().len(),
            1
        );
        assert_eq!(doc.query_all(root, "[name=a]").unwrap().len(), 1);
        assert_eq!(doc.query_all(root, "div[class~=nav]").unwrap().len(), 1);
    }

    #[test]
    fn test_combinators() {
        let doc = sample();
        let root = doc.root_id();
        assert_eq!(doc.query_all(root, "#menu li").unwrap().len(), 2);
        assert_eq!(doc.query_all(root, "ul > li").unwrap().len(), 2);
        // children of #menu are ul elements, not li
        assert_eq!(doc.query_all(root, "#menu > li").unwrap().len(), 0);
    }

    #[test]
    fn test_groups_in_document_order() {
        let doc = sample();
        let root = doc.root_id();
        let hits = doc.query_all(root, "form, li.sel, #menu").unwrap();
        assert_eq!(tags(&doc, &hits), vec!["div", "li", "form"]);
    }

    #[test]
    fn test_scoped_query() {
        let doc = sample();
        let root = doc.root_id();
        let form = doc.query_first(root, "form").unwrap().unwrap();
        assert_eq!(doc.query_all(form, "input").unwrap().len(), 2);
        assert!(doc.query_first(form, "li").unwrap().is_none());
    }

    #[test]
    fn test_universal_and_errors() {
        let doc = sample();
        let root = doc.root_id();
        assert!(!doc.query_all(root, "*").unwrap().is_empty());
        assert!(doc.query_first(root, "").is_err());
        assert!(doc.query_first(root, "li >").is_err());
        assert!(doc.query_first(root, "li[").is_err());
        assert!(doc.query_first(root, "#").is_err());
    }
}
