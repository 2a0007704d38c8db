//! Converted node types
//!
//! A converted element is either a bare string or an ordered mapping. Values
//! inside a mapping are an [`Entry`]: a single node, or a list of nodes when
//! the source had several same-named siblings.

use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Ordered mapping of a converted element
pub type NodeMap = IndexMap<String, Entry>;

/// Result of converting one XML element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Scalar text content
    Text(String),
    /// Attributes, children and mixed text keyed by name
    Object(NodeMap),
}

/// Value stored under a key of an object node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    /// Exactly one occurrence
    Single(Node),
    /// Several same-named siblings, in document order
    List(Vec<Node>),
}

impl Node {
    /// Create a text node
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    /// Get the text of a scalar node
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(s) => Some(s),
            Node::Object(_) => None,
        }
    }

    /// Get the mapping of an object node
    pub fn as_object(&self) -> Option<&NodeMap> {
        match self {
            Node::Object(map) => Some(map),
            Node::Text(_) => None,
        }
    }

    /// Look up a key in an object node
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Follow a path of single-valued keys
    pub fn pointer<'a>(&self, path: impl IntoIterator<Item = &'a str>) -> Option<&Node> {
        path.into_iter()
            .try_fold(self, |node, key| node.get(key).and_then(Entry::as_single))
    }

    /// Name of the root element when this is a document node
    pub fn root_name(&self) -> Option<&str> {
        match self.as_object() {
            Some(map) if map.len() == 1 => map.keys().next().map(String::as_str),
            _ => None,
        }
    }

    /// Check if this node is a scalar
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Convert to a generic JSON value
    pub fn to_json_value(&self) -> Result<JsonValue> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parse a node back from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.to_string())
    }
}

impl From<NodeMap> for Node {
    fn from(map: NodeMap) -> Self {
        Node::Object(map)
    }
}

impl Entry {
    /// Get the node when there was exactly one occurrence
    pub fn as_single(&self) -> Option<&Node> {
        match self {
            Entry::Single(node) => Some(node),
            Entry::List(_) => None,
        }
    }

    /// Get the nodes when there were several occurrences
    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Entry::List(nodes) => Some(nodes),
            Entry::Single(_) => None,
        }
    }

    /// Number of source occurrences
    pub fn len(&self) -> usize {
        match self {
            Entry::Single(_) => 1,
            Entry::List(nodes) => nodes.len(),
        }
    }

    /// Entries always hold at least one node
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the nodes in document order
    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        let nodes: &[Node] = match self {
            Entry::Single(node) => std::slice::from_ref(node),
            Entry::List(nodes) => nodes,
        };
        nodes.iter()
    }

    /// Build an entry from sibling nodes: one node stays bare, more become a list
    pub fn from_siblings(mut nodes: Vec<Node>) -> Self {
        if nodes.len() == 1 {
            Entry::Single(nodes.remove(0))
        } else {
            Entry::List(nodes)
        }
    }
}

impl From<Node> for Entry {
    fn from(node: Node) -> Self {
        Entry::Single(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn airline() -> Node {
        let mut map = NodeMap::new();
        map.insert("@CodeContext".into(), Node::text("3").into());
        map.insert("#text".into(), Node::text("JQ").into());
        Node::Object(map)
    }

    #[test]
    fn test_text_node_serializes_as_string() {
        let node = Node::text("255");
        assert_eq!(node.to_json_value().unwrap(), json!("255"));
        assert!(node.is_text());
    }

    #[test]
    fn test_object_node_preserves_insertion_order() {
        let json = serde_json::to_string(&airline()).unwrap();
        assert_eq!(json, r##"{"@CodeContext":"3","#text":"JQ"}"##);
    }

    #[test]
    fn test_list_entry_serializes_as_array() {
        let mut map = NodeMap::new();
        map.insert(
            "Leg".into(),
            Entry::from_siblings(vec![Node::text("a"), Node::text("b")]),
        );
        let value = Node::Object(map).to_json_value().unwrap();
        assert_eq!(value, json!({"Leg": ["a", "b"]}));
    }

    #[test]
    fn test_from_siblings_cardinality() {
        assert!(Entry::from_siblings(vec![Node::text("x")]).as_single().is_some());

        let list = Entry::from_siblings(vec![Node::text("x"), Node::text("y")]);
        assert_eq!(list.as_list().map(<[Node]>::len), Some(2));
        assert_eq!(list.iter().count(), 2);
    }

    #[test]
    fn test_deserialize_round_trip() {
        let json = r##"{"Flight":{"Leg":[{"Num":"1"},"bare"],"Airline":{"@CodeContext":"3","#text":"JQ"}}}"##;
        let node = Node::from_json_str(json).unwrap();

        let leg = node.pointer(["Flight"]).and_then(|n| n.get("Leg")).unwrap();
        assert_eq!(leg.len(), 2);
        assert_eq!(node.root_name(), Some("Flight"));
        assert_eq!(serde_json::to_string(&node).unwrap(), json);
    }

    #[test]
    fn test_non_string_scalars_are_rejected() {
        assert!(Node::from_json_str(r#"{"Num": 255}"#).is_err());
    }

    #[test]
    fn test_pointer() {
        let mut leg = NodeMap::new();
        leg.insert("Airline".into(), airline().into());
        let mut flight = NodeMap::new();
        flight.insert("Leg".into(), Node::Object(leg).into());

        let node = Node::Object(flight);
        let airline_node = node.pointer(["Leg", "Airline"]).unwrap();
        assert_eq!(
            airline_node.get("#text").and_then(Entry::as_single),
            Some(&Node::text("JQ"))
        );
        assert!(node.pointer(["Leg", "Missing"]).is_none());
    }
}
