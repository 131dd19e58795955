//! Global node identifiers: base64("<type>:<key>"), the relay convention.
//! Pure and stateless; the only way ids cross the API boundary.

use crate::error::AppError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fmt;

/// Closed set of entity kinds addressable by a global id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Actor,
    CountryOrigin,
    Movie,
}

impl NodeType {
    pub fn tag(self) -> &'static str {
        match self {
            NodeType::Actor => "Actor",
            NodeType::CountryOrigin => "CountryOrigin",
            NodeType::Movie => "Movie",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Actor" => Some(NodeType::Actor),
            "CountryOrigin" => Some(NodeType::CountryOrigin),
            "Movie" => Some(NodeType::Movie),
            _ => None,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A decoded global id: entity kind plus the store's local key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId {
    pub node_type: NodeType,
    pub key: i64,
}

impl NodeId {
    pub fn new(node_type: NodeType, key: i64) -> Self {
        NodeId { node_type, key }
    }

    pub fn encode(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.node_type.tag(), self.key))
    }

    pub fn decode(raw: &str) -> Result<Self, AppError> {
        let invalid = || AppError::InvalidId(raw.to_string());
        let bytes = STANDARD.decode(raw).map_err(|_| invalid())?;
        let text = String::from_utf8(bytes).map_err(|_| invalid())?;
        let (tag, key) = text.split_once(':').ok_or_else(invalid)?;
        let node_type = NodeType::from_tag(tag).ok_or_else(invalid)?;
        let key: i64 = key.parse().map_err(|_| invalid())?;
        Ok(NodeId { node_type, key })
    }

    /// Local key, checked against the entity type expected at the call site.
    pub fn expect(self, expected: NodeType) -> Result<i64, AppError> {
        if self.node_type == expected {
            Ok(self.key)
        } else {
            Err(AppError::InvalidId(format!(
                "expected {} id, got {}",
                expected, self.node_type
            )))
        }
    }
}
