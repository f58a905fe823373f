//! Domain records and the typed repositories the engine reads them from.
//!
//! Records are owned by the caller. The engine only reads them; the one exception is the
//! display color that gets attached to the *clones* handed out with selection events.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub type EntityId = u64;
pub type FlowId = u64;
pub type StockId = u64;
pub type MaterialId = u64;

/// Granularity of an entity collection.
///
/// The tag doubles as the node namespace when side-by-side mode is off, so origins and
/// destinations of the same kind share nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    #[default]
    Actor,
    Activity,
    ActivityGroup,
}

impl EntityKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Actor => "actors",
            Self::Activity => "activities",
            Self::ActivityGroup => "activitygroups",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: EntityId,
    pub name: String,
    /// Display color, either supplied by the caller or attached to a clone by the selection
    /// bridge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl EntityRecord {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fraction {
    pub material: MaterialId,
    pub fraction: f64,
    #[serde(default)]
    pub avoidable: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Composition {
    #[serde(default)]
    pub fractions: Vec<Fraction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowRecord {
    pub id: FlowId,
    pub origin: EntityId,
    pub destination: EntityId,
    pub amount: f64,
    #[serde(default, alias = "waste")]
    pub is_waste: bool,
    #[serde(default)]
    pub composition: Option<Composition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub id: StockId,
    pub origin: EntityId,
    pub amount: f64,
    #[serde(default, alias = "waste")]
    pub is_waste: bool,
    #[serde(default)]
    pub composition: Option<Composition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRecord {
    pub id: MaterialId,
    pub name: String,
}

/// Read access to an ordered, id-addressed collection.
pub trait Repository {
    type Id: Copy + Eq + std::hash::Hash;
    type Record;

    fn get(&self, id: Self::Id) -> Option<&Self::Record>;
    fn records(&self) -> Box<dyn Iterator<Item = &Self::Record> + '_>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keyed record storage preserving insertion order.
///
/// The first record of an id wins; later duplicates are ignored.
#[derive(Debug, Clone)]
pub struct Records<R> {
    by_id: IndexMap<u64, R>,
}

impl<R> Default for Records<R> {
    fn default() -> Self {
        Self {
            by_id: IndexMap::new(),
        }
    }
}

pub trait Keyed {
    fn key(&self) -> u64;
}

impl Keyed for EntityRecord {
    fn key(&self) -> u64 {
        self.id
    }
}

impl Keyed for FlowRecord {
    fn key(&self) -> u64 {
        self.id
    }
}

impl Keyed for StockRecord {
    fn key(&self) -> u64 {
        self.id
    }
}

impl Keyed for MaterialRecord {
    fn key(&self) -> u64 {
        self.id
    }
}

impl<R: Keyed> Records<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the id was already present.
    pub fn insert(&mut self, record: R) -> bool {
        let key = record.key();
        if self.by_id.contains_key(&key) {
            tracing::debug!(id = key, "duplicate record id ignored");
            return false;
        }
        self.by_id.insert(key, record);
        true
    }
}

impl<R: Keyed> FromIterator<R> for Records<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        let mut out = Self::new();
        for record in iter {
            out.insert(record);
        }
        out
    }
}

impl<R> Repository for Records<R> {
    type Id = u64;
    type Record = R;

    fn get(&self, id: u64) -> Option<&R> {
        self.by_id.get(&id)
    }

    fn records(&self) -> Box<dyn Iterator<Item = &R> + '_> {
        Box::new(self.by_id.values())
    }

    fn len(&self) -> usize {
        self.by_id.len()
    }
}

pub type Flows = Records<FlowRecord>;
pub type Stocks = Records<StockRecord>;
pub type Materials = Records<MaterialRecord>;

/// Origins or destinations of one granularity.
#[derive(Debug, Clone, Default)]
pub struct Entities {
    kind: EntityKind,
    records: Records<EntityRecord>,
}

impl Entities {
    pub fn new(kind: EntityKind, records: impl IntoIterator<Item = EntityRecord>) -> Self {
        Self {
            kind,
            records: records.into_iter().collect(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntityRecord> {
        self.records.by_id.values()
    }
}

impl Repository for Entities {
    type Id = EntityId;
    type Record = EntityRecord;

    fn get(&self, id: EntityId) -> Option<&EntityRecord> {
        self.records.get(id)
    }

    fn records(&self) -> Box<dyn Iterator<Item = &EntityRecord> + '_> {
        self.records.records()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

impl<R> Records<R> {
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.by_id.values()
    }
}
