#![forbid(unsafe_code)]

//! Flow graph construction for material-flow sankey diagrams (headless).
//!
//! Turns origin/destination entities, flows, stocks, and a material dictionary into an
//! index-addressed `{nodes, links}` graph for an external diagram renderer, and maps the
//! renderer's selection events back to domain records.
//!
//! - [`build()`]: the core transform
//! - [`FlowSankeyView`]: render/refresh/select/export around a [`DiagramRenderer`]
//! - [`hierarchy::level_list`]: leveled lists for hierarchical pickers

pub mod bridge;
pub mod build;
pub mod color;
pub mod composition;
pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod filter;
pub mod graph;
pub mod hierarchy;
pub mod input;
pub mod locale;
pub mod records;
pub mod view;

pub use build::{Collections, GraphBuilder, build};
pub use color::ColorPolicy;
pub use config::{Features, SankeyConfig, Viewport};
pub use error::{Error, Result};
pub use events::{
    Detail, EventName, LinkDetail, RenderedLink, RenderedNode, RendererEvent, SankeyEvent,
    SelectionChange,
};
pub use export::CsvExport;
pub use graph::{FlowGraph, Link, Node, NodeId, NodeIndex};
pub use input::{InputBundle, SankeyInputs};
pub use locale::{Catalog, Localizer, NumberFormat, Untranslated};
pub use records::{
    Composition, Entities, EntityKind, EntityRecord, FlowRecord, Flows, Fraction,
    MaterialRecord, Materials, Repository, StockRecord, Stocks,
};
pub use view::{DiagramRenderer, FlowSankeyView, ViewState};
