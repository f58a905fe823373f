//! Collections → `{nodes, links}`.

use crate::color::{ColorAssigner, STOCK_COLOR};
use crate::composition::CompositionFormatter;
use crate::config::SankeyConfig;
use crate::filter::{Connectivity, Role};
use crate::graph::{FlowGraph, Link, Node, NodeId, NodeIndex, Offset};
use crate::locale::{Localizer, NumberFormat, Untranslated};
use crate::records::{Entities, EntityId, FlowRecord, Flows, Materials, StockRecord, Stocks};
use rustc_hash::FxHashMap;

pub const SIDE_BY_SIDE_ORIGIN: &str = "origin";
pub const SIDE_BY_SIDE_DESTINATION: &str = "destination";

pub const WASTE: &str = "Waste";
pub const PRODUCT: &str = "Product";
pub const STOCK: &str = "Stock";

/// Horizontal offset hint placing a stock sink next to its source node.
pub const STOCK_ALIGN_OFFSET: Offset = Offset { x: 80.0, y: 0.0 };

/// The five input collections of one build.
#[derive(Debug, Clone, Copy)]
pub struct Collections<'a> {
    pub origins: &'a Entities,
    pub destinations: &'a Entities,
    pub flows: &'a Flows,
    pub stocks: &'a Stocks,
    pub materials: &'a Materials,
}

type NodeKey = (&'static str, EntityId);

#[derive(Default)]
struct GraphDb {
    nodes: Vec<Node>,
    indices: FxHashMap<NodeKey, NodeIndex>,
    labels: FxHashMap<NodeKey, String>,
    links: Vec<Link>,
}

impl GraphDb {
    fn add_nodes(
        &mut self,
        entities: &Entities,
        prefix: &'static str,
        keep: impl Fn(EntityId) -> bool,
        colors: &mut ColorAssigner,
    ) {
        for entity in entities.iter() {
            let key = (prefix, entity.id);
            if self.indices.contains_key(&key) {
                continue;
            }
            if !keep(entity.id) {
                continue;
            }
            let color = colors.color_for(&entity.name, entity.color.as_deref());
            self.indices.insert(key, self.nodes.len());
            self.labels.insert(key, entity.name.clone());
            self.nodes.push(Node {
                id: NodeId::Entity(entity.id),
                name: entity.name.clone(),
                color,
                text: None,
                align_to_source: None,
            });
        }
    }

    fn index_of(&self, prefix: &'static str, id: EntityId) -> Option<NodeIndex> {
        self.indices.get(&(prefix, id)).copied()
    }

    fn push_stock_node(
        &mut self,
        stock: &StockRecord,
        name: String,
        source_label: String,
    ) -> NodeIndex {
        let idx = self.nodes.len();
        self.nodes.push(Node {
            id: NodeId::Stock(stock.id),
            name,
            color: STOCK_COLOR.to_string(),
            text: Some(source_label),
            align_to_source: Some(STOCK_ALIGN_OFFSET),
        });
        idx
    }
}

pub struct GraphBuilder<'a> {
    config: &'a SankeyConfig,
    localizer: &'a dyn Localizer,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(config: &'a SankeyConfig, localizer: &'a dyn Localizer) -> Self {
        Self { config, localizer }
    }

    fn prefixes(&self, c: &Collections<'_>) -> (&'static str, &'static str) {
        if self.config.force_side_by_side {
            (SIDE_BY_SIDE_ORIGIN, SIDE_BY_SIDE_DESTINATION)
        } else {
            (c.origins.kind().tag(), c.destinations.kind().tag())
        }
    }

    fn type_label(&self, is_waste: bool) -> String {
        self.localizer
            .gettext(if is_waste { WASTE } else { PRODUCT })
            .into_owned()
    }

    pub fn build(&self, c: Collections<'_>) -> FlowGraph {
        let (source_prefix, target_prefix) = self.prefixes(&c);
        let stocks = self.config.render_stocks.then_some(c.stocks);
        let numbers = NumberFormat::for_language(&self.config.language);
        let formatter = CompositionFormatter::new(c.materials, self.localizer, numbers);
        let units = self.localizer.gettext(&self.config.units).into_owned();
        let mut colors = ColorAssigner::new(self.config.color_policy);

        let connectivity = self
            .config
            .hide_unconnected
            .then(|| Connectivity::new(c.flows, stocks));
        let keep = |role: Role| {
            let connectivity = connectivity.as_ref();
            move |id: EntityId| connectivity.is_none_or(|conn| conn.is_connected(role, id))
        };

        let mut db = GraphDb::default();
        db.add_nodes(c.origins, source_prefix, keep(Role::Origin), &mut colors);
        db.add_nodes(
            c.destinations,
            target_prefix,
            keep(Role::Destination),
            &mut colors,
        );

        for flow in c.flows.iter() {
            if flow.origin == flow.destination {
                tracing::warn!(
                    flow = flow.id,
                    node = flow.origin,
                    "self referencing flow skipped"
                );
                continue;
            }
            let (Some(source), Some(target)) = (
                db.index_of(source_prefix, flow.origin),
                db.index_of(target_prefix, flow.destination),
            ) else {
                tracing::debug!(flow = flow.id, "flow endpoint not in graph");
                continue;
            };
            db.links.push(self.flow_link(flow, source, target, &formatter, &units));
        }

        for stock in stocks.into_iter().flat_map(|s| s.iter()) {
            let Some(source) = db.index_of(source_prefix, stock.origin) else {
                tracing::debug!(stock = stock.id, "stock origin not in graph");
                continue;
            };
            let source_label = db
                .labels
                .get(&(source_prefix, stock.origin))
                .cloned()
                .unwrap_or_default();
            let name = self.localizer.gettext(STOCK).into_owned();
            let target = db.push_stock_node(stock, name, source_label);

            let composition = formatter.format(stock.composition.as_ref());
            db.links.push(Link {
                id: stock.id,
                source,
                target,
                value: stock.amount,
                units: units.clone(),
                is_stock: true,
                text: format!("{}<br>{}", self.type_label(stock.is_waste), composition.markup),
                composition: composition.flattened,
            });
        }

        FlowGraph {
            nodes: db.nodes,
            links: db.links,
        }
    }

    fn flow_link(
        &self,
        flow: &FlowRecord,
        source: NodeIndex,
        target: NodeIndex,
        formatter: &CompositionFormatter<'_>,
        units: &str,
    ) -> Link {
        let composition = formatter.format(flow.composition.as_ref());
        Link {
            id: flow.id,
            source,
            target,
            value: flow.amount,
            units: units.to_string(),
            is_stock: false,
            text: format!(
                "<u>{}</u><br>{}",
                self.type_label(flow.is_waste),
                composition.markup
            ),
            composition: composition.flattened,
        }
    }
}

/// Builds the graph with untranslated display text.
pub fn build(
    origins: &Entities,
    destinations: &Entities,
    flows: &Flows,
    stocks: &Stocks,
    materials: &Materials,
    config: &SankeyConfig,
) -> FlowGraph {
    GraphBuilder::new(config, &Untranslated).build(Collections {
        origins,
        destinations,
        flows,
        stocks,
        materials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Composition, EntityKind, EntityRecord, Fraction, MaterialRecord};
    use serde_json::json;

    fn flow(id: u64, origin: u64, destination: u64, amount: f64) -> FlowRecord {
        FlowRecord {
            id,
            origin,
            destination,
            amount,
            is_waste: false,
            composition: None,
        }
    }

    fn stock(id: u64, origin: u64, amount: f64) -> StockRecord {
        StockRecord {
            id,
            origin,
            amount,
            is_waste: false,
            composition: None,
        }
    }

    fn actors(items: &[(u64, &str)]) -> Entities {
        Entities::new(
            EntityKind::Actor,
            items.iter().map(|&(id, name)| EntityRecord::new(id, name)),
        )
    }

    #[test]
    fn end_to_end_single_flow() {
        let origins = actors(&[(1, "FactoryA")]);
        let destinations = actors(&[(2, "LandfillB")]);
        let flows: Flows = [FlowRecord {
            composition: Some(Composition {
                fractions: vec![Fraction {
                    material: 1,
                    fraction: 0.5,
                    avoidable: false,
                }],
            }),
            ..flow(10, 1, 2, 42.5)
        }]
        .into_iter()
        .collect();
        let materials: Materials = [MaterialRecord {
            id: 1,
            name: "Plastic".to_string(),
        }]
        .into_iter()
        .collect();

        let graph = build(
            &origins,
            &destinations,
            &flows,
            &Stocks::new(),
            &materials,
            &SankeyConfig::default(),
        );
        let value = graph.to_json();
        assert_eq!(value["nodes"][0]["id"], json!(1));
        assert_eq!(value["nodes"][0]["name"], json!("FactoryA"));
        assert_eq!(value["nodes"][1]["id"], json!(2));
        assert_eq!(value["nodes"][1]["name"], json!("LandfillB"));
        assert_eq!(
            value["links"],
            json!([{
                "id": 10,
                "source": 0,
                "target": 1,
                "value": 42.5,
                "units": "t/year",
                "isStock": false,
                "text": "<u>Product</u><br>50% Plastic",
                "composition": "50% Plastic"
            }])
        );
    }

    #[test]
    fn self_loops_are_dropped_without_aborting() {
        let entities = actors(&[(1, "A"), (2, "B")]);
        let flows: Flows = [flow(1, 1, 1, 5.0), flow(2, 1, 2, 3.0)].into_iter().collect();
        let graph = build(
            &entities,
            &entities,
            &flows,
            &Stocks::new(),
            &Materials::new(),
            &SankeyConfig::default(),
        );
        assert_eq!(graph.links.len(), 1);
        assert_eq!(graph.links[0].id, 2);
    }

    #[test]
    fn shared_namespace_dedups_pass_through_nodes() {
        let entities = actors(&[(1, "A"), (2, "B"), (3, "C")]);
        let flows: Flows = [flow(1, 1, 2, 1.0), flow(2, 2, 3, 1.0)].into_iter().collect();
        let graph = build(
            &entities,
            &entities,
            &flows,
            &Stocks::new(),
            &Materials::new(),
            &SankeyConfig::default(),
        );
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.links[0].target, graph.links[1].source);
    }

    #[test]
    fn side_by_side_splits_pass_through_nodes() {
        let entities = actors(&[(1, "A"), (2, "B"), (3, "C")]);
        let flows: Flows = [flow(1, 1, 2, 1.0), flow(2, 2, 3, 1.0)].into_iter().collect();
        let config = SankeyConfig {
            force_side_by_side: true,
            ..SankeyConfig::default()
        };
        let graph = build(
            &entities,
            &entities,
            &flows,
            &Stocks::new(),
            &Materials::new(),
            &config,
        );
        assert_eq!(graph.nodes.len(), 6);
        assert_ne!(graph.links[0].target, graph.links[1].source);
        assert_eq!(graph.nodes[graph.links[0].target].id, NodeId::Entity(2));
        assert_eq!(graph.nodes[graph.links[1].source].id, NodeId::Entity(2));
    }

    #[test]
    fn different_kinds_never_share_nodes() {
        let groups = Entities::new(EntityKind::ActivityGroup, [EntityRecord::new(1, "G")]);
        let actors = actors(&[(1, "A"), (2, "B")]);
        let flows: Flows = [flow(1, 1, 2, 1.0)].into_iter().collect();
        let graph = build(
            &groups,
            &actors,
            &flows,
            &Stocks::new(),
            &Materials::new(),
            &SankeyConfig::default(),
        );
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.links[0].source, 0);
        assert_eq!(graph.links[0].target, 2);
    }

    #[test]
    fn hide_unconnected_prunes_nodes_and_their_links() {
        let origins = actors(&[(1, "A"), (2, "B"), (4, "D")]);
        let destinations = actors(&[(3, "C"), (5, "E")]);
        let flows: Flows = [flow(1, 1, 3, 1.0)].into_iter().collect();
        let stocks: Stocks = [stock(7, 2, 4.0)].into_iter().collect();
        let config = SankeyConfig {
            hide_unconnected: true,
            force_side_by_side: true,
            ..SankeyConfig::default()
        };
        let graph = build(
            &origins,
            &destinations,
            &flows,
            &stocks,
            &Materials::new(),
            &config,
        );
        let ids = graph.nodes.iter().map(|n| n.id).collect::<Vec<_>>();
        assert_eq!(
            ids,
            vec![
                NodeId::Entity(1),
                NodeId::Entity(2),
                NodeId::Entity(3),
                NodeId::Stock(7)
            ]
        );
        assert_eq!(graph.links.len(), 2);
    }

    #[test]
    fn every_stock_gets_its_own_sink() {
        let origins = actors(&[(1, "Farm")]);
        let stocks: Stocks = [stock(1, 1, 2.0), stock(2, 1, 3.0), stock(3, 99, 1.0)]
            .into_iter()
            .collect();
        let graph = build(
            &origins,
            &Entities::default(),
            &Flows::new(),
            &stocks,
            &Materials::new(),
            &SankeyConfig::default(),
        );
        assert_eq!(graph.nodes.len(), 3);
        assert_eq!(graph.links.len(), 2);
        assert_eq!(graph.links[0].target, 1);
        assert_eq!(graph.links[1].target, 2);
        let sink = &graph.nodes[1];
        assert_eq!(sink.id, NodeId::Stock(1));
        assert_eq!(sink.text.as_deref(), Some("Farm"));
        assert_eq!(sink.color, "darkgray");
        assert_eq!(sink.align_to_source, Some(STOCK_ALIGN_OFFSET));
        assert!(graph.links.iter().all(|l| l.is_stock));
        assert_eq!(graph.links[0].text, "Product<br>no composition defined");
    }

    #[test]
    fn stocks_can_be_switched_off() {
        let origins = actors(&[(1, "Farm")]);
        let stocks: Stocks = [stock(1, 1, 2.0)].into_iter().collect();
        let config = SankeyConfig {
            render_stocks: false,
            hide_unconnected: true,
            ..SankeyConfig::default()
        };
        let graph = build(
            &origins,
            &Entities::default(),
            &Flows::new(),
            &stocks,
            &Materials::new(),
            &config,
        );
        assert!(graph.nodes.is_empty());
        assert!(graph.is_empty());
    }

    #[test]
    fn links_never_reference_out_of_range_nodes() {
        let origins = actors(&[(1, "A"), (2, "B")]);
        let destinations = actors(&[(2, "B"), (3, "C")]);
        let flows: Flows = [
            flow(1, 1, 2, 1.0),
            flow(2, 2, 3, 1.0),
            flow(3, 9, 3, 1.0),
            flow(4, 1, 9, 1.0),
        ]
        .into_iter()
        .collect();
        let stocks: Stocks = [stock(1, 3, 1.0), stock(2, 2, 1.0)].into_iter().collect();
        for side_by_side in [false, true] {
            let config = SankeyConfig {
                force_side_by_side: side_by_side,
                ..SankeyConfig::default()
            };
            let graph = build(
                &origins,
                &destinations,
                &flows,
                &stocks,
                &Materials::new(),
                &config,
            );
            assert!(
                graph
                    .links
                    .iter()
                    .all(|l| l.source < graph.nodes.len() && l.target < graph.nodes.len())
            );
        }
    }
}
