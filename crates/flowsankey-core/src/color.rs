use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub const STOCK_COLOR: &str = "darkgray";

const CATEGORY20: [&str; 20] = [
    "#1f77b4", "#aec7e8", "#ff7f0e", "#ffbb78", "#2ca02c", "#98df8a", "#d62728", "#ff9896",
    "#9467bd", "#c5b0d5", "#8c564b", "#c49c94", "#e377c2", "#f7b6d2", "#7f7f7f", "#c7c7c7",
    "#bcbd22", "#dbdb8d", "#17becf", "#9edae5",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorPolicy {
    /// A color derived from the full entity name; a color carried by the record wins.
    #[default]
    NameHash,
    /// Ordinal 20-color palette keyed by the first word of the name, assigned in first-seen
    /// order.
    CategoryPalette,
}

/// Per-build color state. The palette domain is rebuilt with every graph.
#[derive(Debug, Default)]
pub struct ColorAssigner {
    policy: ColorPolicy,
    domain: FxHashMap<String, usize>,
}

impl ColorAssigner {
    pub fn new(policy: ColorPolicy) -> Self {
        Self {
            policy,
            domain: FxHashMap::default(),
        }
    }

    pub fn color_for(&mut self, name: &str, preset: Option<&str>) -> String {
        match self.policy {
            ColorPolicy::NameHash => preset
                .map(str::to_string)
                .unwrap_or_else(|| color_by_name(name)),
            ColorPolicy::CategoryPalette => {
                let key = name.split(' ').next().unwrap_or_default();
                let next = self.domain.len();
                let idx = *self.domain.entry(key.to_string()).or_insert(next);
                CATEGORY20[idx % CATEGORY20.len()].to_string()
            }
        }
    }
}

/// Stable `#rrggbb` color for a name (32-bit string hash over UTF-16 code units).
pub fn color_by_name(name: &str) -> String {
    let mut hash: i32 = 0;
    for unit in name.encode_utf16() {
        hash = (unit as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash));
    }
    let mut out = String::from("#");
    for i in 0..3 {
        let value = (hash >> (i * 8)) & 0xff;
        out.push_str(&format!("{value:02x}"));
    }
    out
}
