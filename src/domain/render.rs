//! Tree-shaped text rendering.

use std::collections::HashMap;
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::record::Labelled;
use crate::domain::tree::{NodeId, Tree};

/// Glyphs and tokens used when rendering lists and trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Branch in front of a child that has later siblings
    pub mid_branch: String,
    /// Branch in front of the last child
    pub last_branch: String,
    /// Indent below an ancestor that has later siblings
    pub continuation: String,
    /// Indent below an ancestor that is a last child
    pub blank: String,
    /// Separator between the records of a list
    pub separator: String,
    /// Rendering of a list without records
    pub empty_list: String,
    /// Rendering of a node without records
    pub empty_node: String,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            mid_branch: "├── ".into(),
            last_branch: "└── ".into(),
            continuation: "│   ".into(),
            blank: "    ".into(),
            separator: " <-> ".into(),
            empty_list: "Empty List".into(),
            empty_node: "Empty".into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Placement {
    depth: usize,
    is_last: bool,
}

impl<T> Tree<T> {
    /// Depth and last-child flag of every node.
    fn placements(&self) -> HashMap<NodeId, Placement> {
        let mut placements = HashMap::with_capacity(self.node_count());
        placements.insert(
            self.root(),
            Placement {
                depth: 0,
                is_last: true,
            },
        );
        for (id, node) in self.iter() {
            let depth = placements.get(&id).map_or(0, |p| p.depth);
            let count = node.children().len();
            for (i, &child) in node.children().iter().enumerate() {
                placements.insert(
                    child,
                    Placement {
                        depth: depth + 1,
                        is_last: i + 1 == count,
                    },
                );
            }
        }
        placements
    }

    fn prefix(&self, id: NodeId, placements: &HashMap<NodeId, Placement>, style: &RenderStyle) -> String {
        let Some(placement) = placements.get(&id) else {
            return String::new();
        };
        if placement.depth == 0 {
            return String::new();
        }

        let mut prefix = String::new();
        let mut current = id;
        for _ in 0..placement.depth - 1 {
            let Some(parent) = self.find_parent(current) else {
                break;
            };
            let ancestor_is_last = placements.get(&parent).map_or(true, |p| p.is_last);
            let glyph = if ancestor_is_last {
                &style.blank
            } else {
                &style.continuation
            };
            prefix.insert_str(0, glyph);
            current = parent;
        }
        prefix.push_str(if placement.is_last {
            &style.last_branch
        } else {
            &style.mid_branch
        });
        prefix
    }
}

impl<T: Labelled + fmt::Display> Tree<T> {
    /// One line per node in pre-order: branch prefix plus the node's first record.
    #[instrument(level = "debug", skip_all, fields(tag = %self.tag()))]
    pub fn render(&self, style: &RenderStyle) -> String {
        let placements = self.placements();
        self.iter()
            .map(|(id, node)| {
                format!(
                    "{}{}",
                    self.prefix(id, &placements, style),
                    node.display_label(style)
                )
            })
            .join("\n")
    }
}

impl<T: Labelled + fmt::Display> fmt::Display for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&RenderStyle::default()))
    }
}
