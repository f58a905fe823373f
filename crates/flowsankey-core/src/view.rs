//! The interactive view: builds the graph, hands it to a renderer, bridges selection
//! events, and serves exports from the last built graph.

use crate::bridge::SelectionBridge;
use crate::build::GraphBuilder;
use crate::config::{SankeyConfig, Viewport};
use crate::events::{Detail, EventBus, EventName, RendererEvent, SankeyEvent, SelectionChange};
use crate::export::{CsvExport, graph_to_csv};
use crate::graph::FlowGraph;
use crate::input::SankeyInputs;
use crate::locale::{Localizer, NumberFormat, Untranslated};
use crate::{Error, Result};

pub const NO_DATA_MESSAGE: &str = "No flow data found for applied filters.";

/// The diagram layout/drawing collaborator.
pub trait DiagramRenderer {
    fn render(&mut self, graph: &FlowGraph, viewport: Viewport);
    /// Replaces the diagram with a plain message.
    fn show_message(&mut self, message: &str);
    fn set_size(&mut self, viewport: Viewport);
    fn zoom_to_fit(&mut self) {}
    fn set_all_selected(&mut self, selected: bool);
    /// SVG markup of what is currently drawn.
    fn svg_snapshot(&self) -> Option<String>;
    fn clear(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Closed,
    Rendered,
    /// The last build produced no links; the renderer shows [`NO_DATA_MESSAGE`].
    NoData,
}

pub struct FlowSankeyView<R: DiagramRenderer> {
    inputs: SankeyInputs,
    config: SankeyConfig,
    localizer: Box<dyn Localizer>,
    renderer: R,
    events: EventBus,
    graph: Option<FlowGraph>,
    state: ViewState,
    fullscreen: bool,
    container: Viewport,
}

impl<R: DiagramRenderer> FlowSankeyView<R> {
    pub fn new(inputs: SankeyInputs, config: SankeyConfig, renderer: R) -> Self {
        let container = config.viewport();
        Self {
            inputs,
            config,
            localizer: Box::new(Untranslated),
            renderer,
            events: EventBus::default(),
            graph: None,
            state: ViewState::Closed,
            fullscreen: false,
            container,
        }
    }

    pub fn with_localizer(mut self, localizer: impl Localizer + 'static) -> Self {
        self.localizer = Box::new(localizer);
        self
    }

    pub fn on(&mut self, name: EventName, listener: impl FnMut(&SankeyEvent) + 'static) {
        self.events.on(name, listener);
    }

    pub fn on_select(&mut self, listener: impl FnMut(&SankeyEvent) + 'static) {
        self.events.on(EventName::LinkSelected, listener);
    }

    pub fn on_deselect(&mut self, listener: impl FnMut(&SankeyEvent) + 'static) {
        self.events.on(EventName::LinkDeselected, listener);
    }

    pub fn config(&self) -> &SankeyConfig {
        &self.config
    }

    pub fn graph(&self) -> Option<&FlowGraph> {
        self.graph.as_ref()
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn numbers(&self) -> NumberFormat {
        NumberFormat::for_language(&self.config.language)
    }

    fn viewport(&self) -> Viewport {
        if self.fullscreen {
            self.container
        } else {
            self.config.viewport()
        }
    }

    /// Rebuilds the graph from scratch and hands it to the renderer. Selection state is reset
    /// as a side effect.
    pub fn render(&mut self) -> &FlowGraph {
        let graph = GraphBuilder::new(&self.config, self.localizer.as_ref())
            .build(self.inputs.collections());
        if graph.is_empty() {
            let message = self.localizer.gettext(NO_DATA_MESSAGE).into_owned();
            self.renderer.show_message(&message);
            self.state = ViewState::NoData;
        } else {
            let viewport = self.viewport();
            self.renderer.render(&graph, viewport);
            self.state = ViewState::Rendered;
        }
        tracing::debug!(
            nodes = graph.nodes.len(),
            links = graph.links.len(),
            "sankey graph built"
        );
        self.graph.insert(graph)
    }

    pub fn set_inputs(&mut self, inputs: SankeyInputs) -> &FlowGraph {
        self.inputs = inputs;
        self.render()
    }

    pub fn set_config(&mut self, config: SankeyConfig) -> &FlowGraph {
        self.config = config;
        self.render()
    }

    pub fn set_hide_unconnected(&mut self, hide: bool) -> &FlowGraph {
        self.config.hide_unconnected = hide;
        self.render()
    }

    pub fn set_force_side_by_side(&mut self, side_by_side: bool) -> &FlowGraph {
        self.config.force_side_by_side = side_by_side;
        self.render()
    }

    /// Resizes without rebuilding. In fullscreen the container size wins.
    pub fn refresh(&mut self, size: Option<Viewport>) {
        let viewport = match (self.fullscreen, size) {
            (true, _) => self.container,
            (false, Some(size)) => size,
            (false, None) => self.config.viewport(),
        };
        if self.state == ViewState::Rendered {
            self.renderer.set_size(viewport);
            self.renderer.zoom_to_fit();
        }
    }

    pub fn toggle_fullscreen(&mut self, container: Viewport) -> Result<()> {
        if !self.config.features.fullscreen {
            return Err(Error::FeatureDisabled {
                feature: "fullscreen",
            });
        }
        self.fullscreen = !self.fullscreen;
        self.container = container;
        self.refresh(None);
        Ok(())
    }

    /// Resolves a renderer selection event and re-emits it with domain records.
    pub fn handle_renderer_event(&mut self, event: &RendererEvent) {
        let bridge = SelectionBridge::new(
            &self.inputs.origins,
            &self.inputs.destinations,
            &self.inputs.flows,
        );
        let Some(detail) = bridge.resolve(&event.link) else {
            return;
        };
        let event = match event.change {
            SelectionChange::Selected => SankeyEvent::LinkSelected(Detail::One(detail)),
            SelectionChange::Deselected => SankeyEvent::LinkDeselected(Detail::One(detail)),
        };
        self.events.emit(&event);
    }

    /// Selects every rendered flow link. Listeners first get `allDeselected`, then a single
    /// `linkSelected` carrying all links of the last built graph.
    pub fn select_all(&mut self) -> Result<()> {
        if !self.config.features.select_all {
            return Err(Error::FeatureDisabled {
                feature: "select-all",
            });
        }
        let graph = self.graph.as_ref().ok_or(Error::NoGraph)?;
        let details = SelectionBridge::new(
            &self.inputs.origins,
            &self.inputs.destinations,
            &self.inputs.flows,
        )
        .resolve_all(graph);

        self.renderer.set_all_selected(true);
        self.events.emit(&SankeyEvent::AllDeselected);
        self.events.emit(&SankeyEvent::LinkSelected(Detail::Many(details)));
        Ok(())
    }

    pub fn deselect_all(&mut self) {
        self.renderer.set_all_selected(false);
        self.events.emit(&SankeyEvent::AllDeselected);
    }

    pub fn export_csv(&self) -> Result<CsvExport> {
        if !self.config.features.export {
            return Err(Error::FeatureDisabled { feature: "export" });
        }
        let graph = self.graph.as_ref().ok_or(Error::NoGraph)?;
        graph_to_csv(graph, self.localizer.as_ref(), self.numbers())
    }

    /// SVG of the current drawing, the input for raster export.
    pub fn svg_snapshot(&self) -> Result<String> {
        if !self.config.features.export {
            return Err(Error::FeatureDisabled { feature: "export" });
        }
        match self.state {
            ViewState::Rendered => {
                self.renderer
                    .svg_snapshot()
                    .ok_or_else(|| Error::NothingRendered {
                        reason: "renderer returned no SVG".to_string(),
                    })
            }
            ViewState::NoData => Err(Error::NothingRendered {
                reason: "no flow data for the applied filters".to_string(),
            }),
            ViewState::Closed => Err(Error::NoGraph),
        }
    }

    pub fn close(&mut self) {
        self.renderer.clear();
        self.events.clear();
        self.graph = None;
        self.state = ViewState::Closed;
    }
}
