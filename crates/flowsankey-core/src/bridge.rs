//! Maps render-time link/node references back to flow and entity records.

use crate::events::{LinkDetail, RenderedLink, RenderedNode};
use crate::graph::{FlowGraph, NodeId};
use crate::records::{Entities, EntityRecord, Flows, Repository};

pub struct SelectionBridge<'a> {
    origins: &'a Entities,
    destinations: &'a Entities,
    flows: &'a Flows,
}

impl<'a> SelectionBridge<'a> {
    pub fn new(origins: &'a Entities, destinations: &'a Entities, flows: &'a Flows) -> Self {
        Self {
            origins,
            destinations,
            flows,
        }
    }

    /// `None` for stock links and for links whose flow is unknown.
    pub fn resolve(&self, link: &RenderedLink) -> Option<LinkDetail> {
        if link.is_stock {
            return None;
        }
        let Some(flow) = self.flows.get(link.id) else {
            tracing::debug!(link = link.id, "selected link has no flow record");
            return None;
        };
        Some(LinkDetail {
            flow: flow.clone(),
            origin: annotate(self.origins, &link.source),
            destination: annotate(self.destinations, &link.target),
        })
    }

    /// Details for every flow link of `graph`, in link order.
    pub fn resolve_all(&self, graph: &FlowGraph) -> Vec<LinkDetail> {
        graph
            .links
            .iter()
            .filter_map(|link| {
                let source = graph.source_of(link);
                let target = graph.target_of(link);
                self.resolve(&RenderedLink {
                    id: link.id,
                    is_stock: link.is_stock,
                    source: RenderedNode {
                        id: source.id,
                        color: Some(source.color.clone()),
                    },
                    target: RenderedNode {
                        id: target.id,
                        color: Some(target.color.clone()),
                    },
                })
            })
            .collect()
    }
}

fn annotate(entities: &Entities, node: &RenderedNode) -> Option<EntityRecord> {
    let NodeId::Entity(id) = node.id else {
        return None;
    };
    let mut record = entities.get(id)?.clone();
    if let Some(color) = &node.color {
        record.color = Some(color.clone());
    }
    Some(record)
}
