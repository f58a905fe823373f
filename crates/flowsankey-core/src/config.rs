use crate::color::ColorPolicy;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: f64 = 800.0;
pub const DEFAULT_UNITS: &str = "t/year";

/// Optional view features. Both historic variants of the view are expressible through these
/// switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Features {
    pub export: bool,
    pub select_all: bool,
    pub fullscreen: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            export: true,
            select_all: true,
            fullscreen: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SankeyConfig {
    pub width: f64,
    /// Defaults to a third of the width.
    pub height: Option<f64>,
    pub hide_unconnected: bool,
    pub force_side_by_side: bool,
    pub render_stocks: bool,
    pub color_policy: ColorPolicy,
    pub language: String,
    /// Unit message id attached to every link (localized at build time).
    pub units: String,
    pub features: Features,
}

impl Default for SankeyConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: None,
            hide_unconnected: false,
            force_side_by_side: false,
            render_stocks: true,
            color_policy: ColorPolicy::default(),
            language: "en".to_string(),
            units: DEFAULT_UNITS.to_string(),
            features: Features::default(),
        }
    }
}

impl SankeyConfig {
    pub fn effective_height(&self) -> f64 {
        self.height.unwrap_or(self.width / 3.0)
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.width,
            height: self.effective_height(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}
