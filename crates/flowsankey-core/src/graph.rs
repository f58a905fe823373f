//! The renderer-facing graph. Indices are only meaningful inside the graph that produced
//! them; every build returns a fresh value.

use crate::records::{EntityId, StockId};
use serde::{Serialize, Serializer};
use std::fmt;

pub type NodeIndex = usize;

/// Render-time node id: a natural entity id, or the synthetic sink of one stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    Entity(EntityId),
    Stock(StockId),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entity(id) => write!(f, "{id}"),
            Self::Stock(id) => write!(f, "stock-{id}"),
        }
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Entity(id) => serializer.serialize_u64(*id),
            Self::Stock(_) => serializer.collect_str(self),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_to_source: Option<Offset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Flow id, or stock id when `is_stock`.
    pub id: u64,
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub value: f64,
    pub units: String,
    pub is_stock: bool,
    pub text: String,
    pub composition: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<Node>,
    pub links: Vec<Link>,
}

impl FlowGraph {
    /// A graph without links is not handed to a renderer.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn source_of(&self, link: &Link) -> &Node {
        &self.nodes[link.source]
    }

    pub fn target_of(&self, link: &Link) -> &Node {
        &self.nodes[link.target]
    }

    pub fn total_value(&self) -> f64 {
        self.links.iter().map(|l| l.value).sum()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
