use std::collections::HashSet;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::flow::Flow;
use crate::domain::list::InfoList;
use crate::domain::record::{Labelled, Record};
use crate::domain::render::RenderStyle;

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

/// Handle of a node inside one specific [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    tree: u64,
    index: Index,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.index.into_raw_parts();
        write!(f, "n{}.{}@tree{}", slot, generation, self.tree)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode<T> {
    /// Records attached to this node
    pub info: InfoList<T>,
    /// Parent handle, None for the root
    parent: Option<NodeId>,
    /// Child handles in insertion order
    children: Vec<NodeId>,
}

impl<T> TreeNode<T> {
    fn new(parent: Option<NodeId>) -> Self {
        Self {
            info: InfoList::new(),
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Display text of the node: its first record's label, the record itself,
    /// or the empty-node token.
    pub fn display_label(&self, style: &RenderStyle) -> String
    where
        T: Labelled + fmt::Display,
    {
        match self.info.first() {
            Some(first) => match first.label() {
                Some(label) => label.to_string(),
                None => first.to_string(),
            },
            None => style.empty_node.clone(),
        }
    }
}

impl<T: Labelled + fmt::Display> fmt::Display for TreeNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_label(&RenderStyle::default()))
    }
}

/// Arena-based tree whose nodes each carry an info list.
///
/// The root exists from construction on. Nodes are only ever added, and every
/// node knows its parent through a non-owning handle.
#[derive(Debug)]
pub struct Tree<T = Record> {
    id: u64,
    arena: Arena<TreeNode<T>>,
    root: NodeId,
    tag: String,
}

impl<T> Tree<T> {
    pub fn new(tag: impl Into<String>) -> Self {
        let id = NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed);
        let mut arena = Arena::new();
        let index = arena.insert(TreeNode::new(None));
        Self {
            id,
            arena,
            root: NodeId { tree: id, index },
            tag: tag.into(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    fn unknown(&self, node: NodeId) -> DomainError {
        DomainError::UnknownNode {
            node,
            tag: self.tag.clone(),
        }
    }

    fn resolve(&self, node: NodeId) -> DomainResult<Index> {
        if node.tree == self.id && self.arena.contains(node.index) {
            Ok(node.index)
        } else {
            Err(self.unknown(node))
        }
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.resolve(node).is_ok()
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode<T>> {
        let index = self.resolve(id).ok()?;
        self.arena.get(index)
    }

    pub fn info(&self, id: NodeId) -> DomainResult<&InfoList<T>> {
        self.node(id).map(|node| &node.info).ok_or_else(|| self.unknown(id))
    }

    pub fn info_mut(&mut self, id: NodeId) -> DomainResult<&mut InfoList<T>> {
        let index = self.resolve(id)?;
        Ok(&mut self.arena[index].info)
    }

    pub fn children(&self, id: NodeId) -> DomainResult<&[NodeId]> {
        self.node(id)
            .map(|node| node.children())
            .ok_or_else(|| self.unknown(id))
    }

    /// Creates a new empty node as the last child of `parent`.
    #[instrument(level = "debug", skip(self), fields(tag = %self.tag))]
    pub fn add_child(&mut self, parent: NodeId) -> DomainResult<NodeId> {
        let parent_index = self.resolve(parent)?;
        let index = self.arena.insert(TreeNode::new(Some(parent)));
        let child = NodeId {
            tree: self.id,
            index,
        };
        self.arena[parent_index].children.push(child);
        debug!(%parent, %child, "added child");
        Ok(child)
    }

    /// Parent of `target`; `None` for the root and for nodes not in this tree.
    pub fn find_parent(&self, target: NodeId) -> Option<NodeId> {
        self.node(target)?.parent
    }

    /// Parent lookup by searching every child list in pre-order.
    ///
    /// O(tree size); `find_parent` answers the same question from the stored
    /// parent handle.
    pub fn search_parent(&self, target: NodeId) -> Option<NodeId> {
        self.iter()
            .find(|(_, node)| node.children.contains(&target))
            .map(|(id, _)| id)
    }

    /// Distance from the root (root = 0).
    pub fn node_depth(&self, id: NodeId) -> DomainResult<usize> {
        let mut current = self.node(id).ok_or_else(|| self.unknown(id))?;
        let mut depth = 0;
        while let Some(parent) = current.parent {
            current = self.node(parent).ok_or_else(|| self.unknown(parent))?;
            depth += 1;
        }
        Ok(depth)
    }

    /// Number of levels; a lone root has height 1.
    #[instrument(level = "debug", skip(self))]
    pub fn height(&self) -> usize {
        self.calculate_height(self.root)
    }

    fn calculate_height(&self, id: NodeId) -> usize {
        match self.node(id) {
            Some(node) => {
                1 + node
                    .children
                    .iter()
                    .map(|&child| self.calculate_height(child))
                    .max()
                    .unwrap_or(0)
            }
            None => 0,
        }
    }

    /// Nodes without children, in pre-order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(id, _)| id)
            .collect()
    }

    pub fn iter(&self) -> PreOrder<'_, T> {
        PreOrder {
            tree: self,
            stack: vec![self.root],
        }
    }

    pub fn iter_from(&self, start: NodeId) -> DomainResult<PreOrder<'_, T>> {
        self.resolve(start)?;
        Ok(PreOrder {
            tree: self,
            stack: vec![start],
        })
    }

    /// Pre-order traversal from `start` (root when `None`), applying `action`
    /// to every node: the node first, then each child subtree in insertion order.
    pub fn traverse<F, R>(
        &self,
        start: Option<NodeId>,
        mut action: F,
    ) -> DomainResult<ControlFlow<R::Break>>
    where
        F: FnMut(NodeId, &TreeNode<T>) -> R,
        R: Flow,
    {
        for (id, node) in self.iter_from(start.unwrap_or(self.root))? {
            if let ControlFlow::Break(value) = action(id, node).into_flow() {
                return Ok(ControlFlow::Break(value));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Groups the records of every node below `start` by their local position.
    ///
    /// Group `i` holds the `i`-th record of each node that has one, in tree
    /// pre-order.
    #[instrument(level = "debug", skip(self), fields(tag = %self.tag))]
    pub fn position_groups(&self, start: Option<NodeId>) -> DomainResult<Vec<Vec<&T>>> {
        let mut groups: Vec<Vec<&T>> = Vec::new();
        for (_, node) in self.iter_from(start.unwrap_or(self.root))? {
            for (position, record) in node.info.iter().enumerate() {
                if position == groups.len() {
                    groups.push(Vec::new());
                }
                groups[position].push(record);
            }
        }
        debug!(groups = groups.len(), "position groups built");
        Ok(groups)
    }

    /// Position-synchronized traversal of all info lists below `start`.
    ///
    /// All groups are built first; `aggregate` then runs once per group in
    /// ascending position order and may stop the run early.
    pub fn sync_traverse<F, R>(
        &self,
        start: Option<NodeId>,
        mut aggregate: F,
    ) -> DomainResult<ControlFlow<R::Break>>
    where
        F: FnMut(usize, &[&T]) -> R,
        R: Flow,
    {
        let groups = self.position_groups(start)?;
        for (position, records) in groups.iter().enumerate() {
            if let ControlFlow::Break(value) = aggregate(position, records.as_slice()).into_flow() {
                debug!(position, "sync traversal stopped early");
                return Ok(ControlFlow::Break(value));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Runs `aggregate` on every position group and collects the results.
    pub fn sync_aggregate<F, A>(&self, start: Option<NodeId>, mut aggregate: F) -> DomainResult<Vec<A>>
    where
        F: FnMut(usize, &[&T]) -> A,
    {
        let groups = self.position_groups(start)?;
        Ok(groups
            .iter()
            .enumerate()
            .map(|(position, records)| aggregate(position, records.as_slice()))
            .collect())
    }

    /// Checks that every node is reachable exactly once, that stored parent
    /// handles agree with the child lists, and that every info list is intact.
    pub fn validate(&self) -> DomainResult<()> {
        let invariant = |detail: String| DomainError::TreeInvariant {
            tag: self.tag.clone(),
            detail,
        };

        let mut seen = HashSet::new();
        for (id, node) in self.iter() {
            if !seen.insert(id) {
                return Err(invariant(format!("node {} is reachable twice", id)));
            }
            if self.search_parent(id) != node.parent {
                return Err(invariant(format!(
                    "stored parent of {} disagrees with the child lists",
                    id
                )));
            }
            node.info.validate()?;
        }
        if seen.len() != self.arena.len() {
            return Err(invariant(format!(
                "{} of {} nodes are reachable from the root",
                seen.len(),
                self.arena.len()
            )));
        }
        Ok(())
    }
}

/// Pre-order iterator over `(handle, node)` pairs.
pub struct PreOrder<'a, T> {
    tree: &'a Tree<T>,
    stack: Vec<NodeId>,
}

impl<'a, T> Iterator for PreOrder<'a, T> {
    type Item = (NodeId, &'a TreeNode<T>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.node(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current, node));
            }
        }
        None
    }
}
