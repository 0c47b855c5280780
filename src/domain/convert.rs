/*
Conversion into `termtree` for the expanded view: every node shows its whole
info list, not just the first record.
 */
use std::fmt;

use termtree::Tree as TermTree;
use tracing::instrument;

use crate::domain::render::RenderStyle;
use crate::domain::tree::{NodeId, Tree};

pub trait TreeConvert {
    fn to_tree_string(&self, style: &RenderStyle) -> TermTree<String>;
}

impl<T: fmt::Display> TreeConvert for Tree<T> {
    #[instrument(level = "debug", skip_all, fields(tag = %self.tag()))]
    fn to_tree_string(&self, style: &RenderStyle) -> TermTree<String> {
        fn build_tree<T: fmt::Display>(
            tree: &Tree<T>,
            node_id: NodeId,
            parent_tree: &mut TermTree<String>,
            style: &RenderStyle,
        ) {
            if let Some(node) = tree.node(node_id) {
                for &child_id in node.children() {
                    if let Some(child) = tree.node(child_id) {
                        let mut child_tree = TermTree::new(child.info.render(style));
                        build_tree(tree, child_id, &mut child_tree, style);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        let root = self.root();
        let label = self
            .node(root)
            .map(|node| node.info.render(style))
            .unwrap_or_else(|| style.empty_list.clone());
        let mut term_tree = TermTree::new(label);
        build_tree(self, root, &mut term_tree, style);
        term_tree
    }
}
