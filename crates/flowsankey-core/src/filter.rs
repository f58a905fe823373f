//! Connectivity predicates used when unconnected nodes are hidden.

use crate::records::{EntityId, Flows, Stocks};
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Origin,
    Destination,
}

/// Precomputed endpoint sets over the supplied (already filtered) flows and stocks.
#[derive(Debug, Default)]
pub struct Connectivity {
    flow_origins: FxHashSet<EntityId>,
    flow_destinations: FxHashSet<EntityId>,
    stock_origins: FxHashSet<EntityId>,
}

impl Connectivity {
    pub fn new(flows: &Flows, stocks: Option<&Stocks>) -> Self {
        let mut out = Self::default();
        for flow in flows.iter() {
            out.flow_origins.insert(flow.origin);
            out.flow_destinations.insert(flow.destination);
        }
        for stock in stocks.into_iter().flat_map(|s| s.iter()) {
            out.stock_origins.insert(stock.origin);
        }
        out
    }

    /// Origins need an outgoing flow or a stock, destinations an incoming flow.
    pub fn is_connected(&self, role: Role, id: EntityId) -> bool {
        match role {
            Role::Origin => self.flow_origins.contains(&id) || self.stock_origins.contains(&id),
            Role::Destination => self.flow_destinations.contains(&id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{FlowRecord, StockRecord};

    fn flow(id: u64, origin: u64, destination: u64) -> FlowRecord {
        FlowRecord {
            id,
            origin,
            destination,
            amount: 1.0,
            is_waste: false,
            composition: None,
        }
    }

    #[test]
    fn stocks_count_for_origins_only() {
        let flows: Flows = [flow(1, 1, 2)].into_iter().collect();
        let stocks: Stocks = [StockRecord {
            id: 5,
            origin: 3,
            amount: 2.0,
            is_waste: false,
            composition: None,
        }]
        .into_iter()
        .collect();
        let c = Connectivity::new(&flows, Some(&stocks));

        assert!(c.is_connected(Role::Origin, 1));
        assert!(c.is_connected(Role::Origin, 3));
        assert!(!c.is_connected(Role::Destination, 3));
        assert!(c.is_connected(Role::Destination, 2));
        assert!(!c.is_connected(Role::Origin, 2));
    }

    #[test]
    fn ignored_stocks_do_not_connect() {
        let flows = Flows::new();
        let stocks: Stocks = [StockRecord {
            id: 5,
            origin: 3,
            amount: 2.0,
            is_waste: false,
            composition: None,
        }]
        .into_iter()
        .collect();
        let c = Connectivity::new(&flows, None);
        assert!(!c.is_connected(Role::Origin, 3));
        let c = Connectivity::new(&flows, Some(&stocks));
        assert!(c.is_connected(Role::Origin, 3));
    }
}
