//! Events: what the renderer reports (index/node-id based) and what the view re-emits
//! (record based).

use crate::graph::NodeId;
use crate::records::{EntityRecord, FlowRecord};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    LinkSelected,
    LinkDeselected,
    AllDeselected,
}

impl EventName {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LinkSelected => "linkSelected",
            Self::LinkDeselected => "linkDeselected",
            Self::AllDeselected => "allDeselected",
        }
    }
}

/// A selected link resolved back to domain records.
///
/// `origin` / `destination` are clones annotated with the color their node was drawn with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkDetail {
    pub flow: FlowRecord,
    pub origin: Option<EntityRecord>,
    pub destination: Option<EntityRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Detail {
    One(LinkDetail),
    Many(Vec<LinkDetail>),
}

impl Detail {
    pub fn as_slice(&self) -> &[LinkDetail] {
        match self {
            Self::One(d) => std::slice::from_ref(d),
            Self::Many(d) => d,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SankeyEvent {
    LinkSelected(Detail),
    LinkDeselected(Detail),
    AllDeselected,
}

impl SankeyEvent {
    pub fn name(&self) -> EventName {
        match self {
            Self::LinkSelected(_) => EventName::LinkSelected,
            Self::LinkDeselected(_) => EventName::LinkDeselected,
            Self::AllDeselected => EventName::AllDeselected,
        }
    }

    pub fn detail(&self) -> Option<&Detail> {
        match self {
            Self::LinkSelected(d) | Self::LinkDeselected(d) => Some(d),
            Self::AllDeselected => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNode {
    pub id: NodeId,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLink {
    pub id: u64,
    pub is_stock: bool,
    pub source: RenderedNode,
    pub target: RenderedNode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Selected,
    Deselected,
}

/// Low-level selection event emitted by a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererEvent {
    pub change: SelectionChange,
    pub link: RenderedLink,
}

type Listener = Box<dyn FnMut(&SankeyEvent)>;

/// Callback registry standing in for DOM event dispatch on the view container.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(Option<EventName>, Listener)>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    pub fn on(&mut self, name: EventName, listener: impl FnMut(&SankeyEvent) + 'static) {
        self.listeners.push((Some(name), Box::new(listener)));
    }

    pub fn on_any(&mut self, listener: impl FnMut(&SankeyEvent) + 'static) {
        self.listeners.push((None, Box::new(listener)));
    }

    pub fn emit(&mut self, event: &SankeyEvent) {
        let name = event.name();
        for (filter, listener) in &mut self.listeners {
            if filter.is_none_or(|f| f == name) {
                listener(event);
            }
        }
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}
