//! Minimal element tree over quick-xml events
//!
//! Only what the portal responses need: element local names (namespace prefixes are
//! dropped), concatenated text content and child elements. Attributes are ignored.

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::Event;

use super::client::RemoteError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    pub name: String,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// First child element with the given local name
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of a direct child, `None` when the child element is absent
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(|c| c.text.clone())
    }

    /// Follow a chain of child names from this node
    pub fn descend(&self, path: &[&str]) -> Option<&XmlNode> {
        path.iter().try_fold(self, |node, name| node.child(name))
    }
}

fn local_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

/// Parse a complete document, returning a synthetic root whose children are the
/// top-level elements
pub fn parse_document(xml: &str) -> Result<XmlNode, RemoteError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack = vec![XmlNode::new("")];

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(XmlNode::new(local_name(e.local_name().as_ref()))),
            Event::Empty(e) => {
                let node = XmlNode::new(local_name(e.local_name().as_ref()));
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(node);
                }
            }
            Event::End(_) => {
                let node = stack.pop().filter(|_| !stack.is_empty()).ok_or_else(|| {
                    RemoteError::UnexpectedResponse("unbalanced closing tag".to_string())
                })?;
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(node);
                }
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Event::CData(c) => {
                let raw = c.into_inner();
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&raw));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        return Err(RemoteError::UnexpectedResponse("document ended inside an element".into()));
    }
    stack.pop().ok_or_else(|| RemoteError::UnexpectedResponse("empty document".into()))
}

/// Escape text for inclusion in an element body
pub fn escape_text(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}
