use crate::build::Collections;
use crate::config::SankeyConfig;
use crate::records::{
    Entities, EntityKind, EntityRecord, FlowRecord, Flows, MaterialRecord, Materials,
    StockRecord, Stocks,
};
use serde::Deserialize;

/// Owned input collections of a view.
#[derive(Debug, Clone, Default)]
pub struct SankeyInputs {
    pub origins: Entities,
    pub destinations: Entities,
    pub flows: Flows,
    pub stocks: Stocks,
    pub materials: Materials,
}

impl SankeyInputs {
    pub fn collections(&self) -> Collections<'_> {
        Collections {
            origins: &self.origins,
            destinations: &self.destinations,
            flows: &self.flows,
            stocks: &self.stocks,
            materials: &self.materials,
        }
    }
}

/// Everything one view needs, as a single JSON document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputBundle {
    #[serde(default)]
    pub origin_kind: EntityKind,
    #[serde(default)]
    pub destination_kind: EntityKind,
    #[serde(default)]
    pub origins: Vec<EntityRecord>,
    #[serde(default)]
    pub destinations: Vec<EntityRecord>,
    #[serde(default)]
    pub flows: Vec<FlowRecord>,
    #[serde(default)]
    pub stocks: Vec<StockRecord>,
    #[serde(default)]
    pub materials: Vec<MaterialRecord>,
    #[serde(default)]
    pub config: SankeyConfig,
}

impl InputBundle {
    pub fn from_json(text: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn into_parts(self) -> (SankeyInputs, SankeyConfig) {
        let inputs = SankeyInputs {
            origins: Entities::new(self.origin_kind, self.origins),
            destinations: Entities::new(self.destination_kind, self.destinations),
            flows: self.flows.into_iter().collect(),
            stocks: self.stocks.into_iter().collect(),
            materials: self.materials.into_iter().collect(),
        };
        (inputs, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::records::Repository;

    #[test]
    fn bundle_decodes_with_defaults() {
        let bundle = InputBundle::from_json(
            r#"{
                "originKind": "activityGroup",
                "origins": [{"id": 1, "name": "G"}],
                "destinations": [{"id": 2, "name": "A"}],
                "flows": [{"id": 1, "origin": 1, "destination": 2, "amount": 4}],
                "config": {"forceSideBySide": true}
            }"#,
        )
        .unwrap();
        let (inputs, config) = bundle.into_parts();
        assert_eq!(inputs.origins.kind(), EntityKind::ActivityGroup);
        assert_eq!(inputs.destinations.kind(), EntityKind::Actor);
        assert_eq!(inputs.flows.len(), 1);
        assert!(inputs.stocks.is_empty());
        assert!(config.force_side_by_side);
    }

    #[test]
    fn malformed_collections_are_caller_errors() {
        let err = InputBundle::from_json(r#"{"flows": [{"id": "x"}]}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
