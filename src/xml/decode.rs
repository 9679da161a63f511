use indexmap::map::Entry;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::whitelist::ArrayWhitelist;
use crate::core::{ATTRIBUTE_PREFIX, Mapping, Node, SzamlaError, TEXT_KEY};

/// Decodes invoice XML into a [`Node`] tree.
///
/// Tag and attribute names lose their namespace prefix, text is trimmed and
/// unescaped but never converted, and elements named in the whitelist always
/// decode to a [`Node::List`].
#[derive(Debug, Clone, Default)]
pub struct XmlDecoder {
    whitelist: ArrayWhitelist,
}

/// Element under construction.
struct Frame {
    name: String,
    entries: Mapping,
    text: String,
}

impl XmlDecoder {
    pub fn new(whitelist: ArrayWhitelist) -> Self {
        Self { whitelist }
    }

    pub fn whitelist(&self) -> &ArrayWhitelist {
        &self.whitelist
    }

    /// Decode raw bytes, rejecting input that is not UTF-8.
    pub fn decode_bytes(&self, xml: &[u8]) -> Result<Node, SzamlaError> {
        let xml = std::str::from_utf8(xml)
            .map_err(|e| SzamlaError::Parse(format!("invalid UTF-8 input: {e}")))?;
        self.decode(xml)
    }

    /// Decode an XML document.
    ///
    /// The result is a mapping keyed by the root element's local name.
    pub fn decode(&self, xml: &str) -> Result<Node, SzamlaError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut root = Mapping::new();
        let mut stack: Vec<Frame> = Vec::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                SzamlaError::Parse(format!("{e} at byte {}", reader.buffer_position()))
            })?;
            if matches!(event, Event::Start(_) | Event::Empty(_))
                && stack.is_empty()
                && !root.is_empty()
            {
                return Err(SzamlaError::Parse(format!(
                    "multiple root elements at byte {}",
                    reader.buffer_position()
                )));
            }
            match event {
                Event::Start(ref e) => stack.push(open_frame(e)?),
                Event::Empty(ref e) => {
                    let frame = open_frame(e)?;
                    self.close_frame(frame, &mut stack, &mut root);
                }
                Event::End(_) => {
                    let frame = stack.pop().ok_or_else(|| {
                        SzamlaError::Parse(format!(
                            "unexpected closing tag at byte {}",
                            reader.buffer_position()
                        ))
                    })?;
                    self.close_frame(frame, &mut stack, &mut root);
                }
                Event::Text(ref e) => {
                    let text = e.unescape().map_err(|e| {
                        SzamlaError::Parse(format!("{e} at byte {}", reader.buffer_position()))
                    })?;
                    append_text(&mut stack, text.trim());
                }
                Event::CData(ref e) => {
                    let text = std::str::from_utf8(e)
                        .map_err(|e| SzamlaError::Parse(format!("invalid CDATA: {e}")))?;
                    append_text(&mut stack, text);
                }
                Event::Eof => break,
                // Declaration, comments, processing instructions, doctype.
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(SzamlaError::Parse(format!(
                "unexpected end of input: <{}> is not closed",
                open.name
            )));
        }
        if root.is_empty() {
            return Err(SzamlaError::Parse("document has no root element".into()));
        }
        Ok(Node::Mapping(root))
    }

    fn close_frame(&self, frame: Frame, stack: &mut [Frame], root: &mut Mapping) {
        let Frame {
            name,
            mut entries,
            text,
        } = frame;
        let node = if entries.is_empty() {
            Node::Scalar(text)
        } else {
            if !text.is_empty() {
                entries.insert(TEXT_KEY.to_string(), Node::Scalar(text));
            }
            Node::Mapping(entries)
        };
        let parent = match stack.last_mut() {
            Some(parent) => &mut parent.entries,
            None => root,
        };
        self.attach(parent, name, node);
    }

    /// Insert a finished child, applying the cardinality rules.
    fn attach(&self, entries: &mut Mapping, name: String, node: Node) {
        let always_list = self.whitelist.contains(&name);
        match entries.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(if always_list {
                    Node::List(vec![node])
                } else {
                    node
                });
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Node::List(items) => items.push(node),
                single => {
                    let first = std::mem::replace(single, Node::List(Vec::with_capacity(2)));
                    *single = Node::List(vec![first, node]);
                }
            },
        }
    }
}

/// Decode with the built-in OSA 3.0 whitelist.
pub fn decode(xml: &str) -> Result<Node, SzamlaError> {
    XmlDecoder::default().decode(xml)
}

fn open_frame(start: &BytesStart<'_>) -> Result<Frame, SzamlaError> {
    let name = local_name(start.local_name().as_ref())?;
    let mut entries = Mapping::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| SzamlaError::Parse(format!("in <{name}>: {e}")))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = local_name(attr.key.local_name().as_ref())?;
        let value = attr
            .unescape_value()
            .map_err(|e| SzamlaError::Parse(format!("attribute {key} of <{name}>: {e}")))?;
        entries.insert(
            format!("{ATTRIBUTE_PREFIX}{key}"),
            Node::Scalar(value.into_owned()),
        );
    }
    Ok(Frame {
        name,
        entries,
        text: String::new(),
    })
}

fn local_name(bytes: &[u8]) -> Result<String, SzamlaError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| SzamlaError::Parse(format!("invalid name: {e}")))
}

// Text outside the root element is ignored.
fn append_text(stack: &mut [Frame], text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(frame) = stack.last_mut() {
        frame.text.push_str(text);
    }
}
