use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Key prefix marking an XML attribute inside a [`Node::Mapping`].
///
/// An attribute `currency` is stored as `@_currency`, so it can never collide
/// with a child element named `currency`.
pub const ATTRIBUTE_PREFIX: &str = "@_";

/// Key holding the text content of an element that also has attributes or
/// child elements.
pub const TEXT_KEY: &str = "#text";

/// Ordered element/attribute map of a decoded element.
pub type Mapping = IndexMap<String, Node>;

/// A decoded XML document tree.
///
/// Every leaf is a string. Numbers, booleans and dates stay textual until a
/// formatter interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Text-only element.
    Scalar(String),
    /// Element with attributes and/or child elements, in document order.
    Mapping(Mapping),
    /// Repeated or array-coerced element occurrences, in document order.
    List(Vec<Node>),
}

static EMPTY: &[Node] = &[];

impl Node {
    /// An empty mapping node.
    pub fn empty() -> Self {
        Self::Mapping(Mapping::new())
    }

    /// Look up a direct child by key. Only mappings have children.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Self::Mapping(map) => map.get(key),
            _ => None,
        }
    }

    /// Follow a path of keys from this node.
    ///
    /// A list encountered mid-path resolves through its first element, which
    /// is what templates expect for single-valued array-coerced fields.
    pub fn path(&self, keys: &[&str]) -> Option<&Node> {
        let mut current = self;
        for key in keys {
            current = match current {
                Self::List(items) => items.first()?.get(key)?,
                other => other.get(key)?,
            };
        }
        Some(current)
    }

    /// Text of a path, see [`Node::path`] and [`Node::text`].
    pub fn text_at(&self, keys: &[&str]) -> Option<&str> {
        self.path(keys).and_then(Node::text)
    }

    /// The string of a scalar node.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Text content: a scalar's value or a mapping's `#text` entry.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::Mapping(map) => map.get(TEXT_KEY).and_then(Node::as_str),
            Self::List(_) => None,
        }
    }

    /// Value of attribute `name` (without the `@_` marker).
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Self::Mapping(map) => map
                .get(&format!("{ATTRIBUTE_PREFIX}{name}"))
                .and_then(Node::as_str),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// View this node as a sequence: a list yields its items, any other node
    /// yields itself once.
    pub fn items(&self) -> &[Node] {
        match self {
            Self::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    /// Convert into the JSON data model used by template helpers.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Scalar(s) => serde_json::Value::String(s.clone()),
            Self::Mapping(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Node::to_json).collect()),
        }
    }
}

/// Sequence view of an optional node; absent yields nothing.
pub fn items_of(node: Option<&Node>) -> &[Node] {
    node.map_or(EMPTY, Node::items)
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::Scalar(s.to_string())
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Self::Scalar(s)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Self::List(items)
    }
}

impl From<Mapping> for Node {
    fn from(map: Mapping) -> Self {
        Self::Mapping(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Node {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        Self::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
