//! Parent-referencing items → depth-first list annotated with tree levels, for hierarchical
//! pickers (materials, activity groups).

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

const MAX_TEXT_CHARS: usize = 70;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyItem {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub parent: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeveledItem {
    pub id: u64,
    /// Display text, truncated.
    pub text: String,
    /// Full name.
    pub title: String,
    /// Roots are level 1.
    pub level: usize,
    pub parent: Option<u64>,
}

fn display_text(name: &str) -> String {
    if name.chars().count() <= MAX_TEXT_CHARS {
        return name.to_string();
    }
    let mut text = name.chars().take(MAX_TEXT_CHARS).collect::<String>();
    text.push_str("...");
    text
}

/// Items whose parent is absent from `items` are treated as roots. Siblings keep input order.
/// Members of parent cycles are emitted as roots after everything reachable.
pub fn level_list(items: &[HierarchyItem]) -> Vec<LeveledItem> {
    let known: FxHashSet<u64> = items.iter().map(|i| i.id).collect();
    let mut children: FxHashMap<u64, Vec<usize>> = FxHashMap::default();
    let mut roots = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        match item.parent {
            Some(parent) if known.contains(&parent) && parent != item.id => {
                children.entry(parent).or_default().push(idx)
            }
            _ => roots.push(idx),
        }
    }

    let mut out = Vec::with_capacity(items.len());
    let mut visited = vec![false; items.len()];
    let mut stack: Vec<(usize, usize)> = Vec::new();

    let mut walk = |start: usize, out: &mut Vec<LeveledItem>, visited: &mut Vec<bool>| {
        stack.push((start, 1));
        while let Some((idx, level)) = stack.pop() {
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            let item = &items[idx];
            out.push(LeveledItem {
                id: item.id,
                text: display_text(&item.name),
                title: item.name.clone(),
                level,
                parent: item.parent,
            });
            if let Some(kids) = children.get(&item.id) {
                for &kid in kids.iter().rev() {
                    stack.push((kid, level + 1));
                }
            }
        }
    };

    for &root in &roots {
        walk(root, &mut out, &mut visited);
    }
    for idx in 0..items.len() {
        if !visited[idx] {
            walk(idx, &mut out, &mut visited);
        }
    }
    out
}
