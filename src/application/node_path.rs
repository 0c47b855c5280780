//! Addressing nodes by child-index paths.
//!
//! `""` (or `"."`) is the root, `"0"` its first child, `"0.2"` the third child
//! of that child.

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{NodeId, Tree};

pub fn resolve_node_path<T>(tree: &Tree<T>, path: &str) -> ApplicationResult<NodeId> {
    let trimmed = path.trim();
    let mut current = tree.root();
    if trimmed.is_empty() || trimmed == "." {
        return Ok(current);
    }

    let error = |reason: String| ApplicationError::NodePath {
        path: path.to_string(),
        reason,
    };
    for segment in trimmed.split('.') {
        let position: usize = segment
            .parse()
            .map_err(|_| error(format!("'{}' is not a child index", segment)))?;
        let children = tree.children(current)?;
        current = *children.get(position).ok_or_else(|| {
            error(format!(
                "child {} requested but node has {} children",
                position,
                children.len()
            ))
        })?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_node_path() {
        let mut tree: Tree<&str> = Tree::new("t");
        let root = tree.root();
        let a = tree.add_child(root).unwrap();
        let b = tree.add_child(root).unwrap();
        let b0 = tree.add_child(b).unwrap();

        assert_eq!(resolve_node_path(&tree, "").unwrap(), root);
        assert_eq!(resolve_node_path(&tree, ".").unwrap(), root);
        assert_eq!(resolve_node_path(&tree, "0").unwrap(), a);
        assert_eq!(resolve_node_path(&tree, "1.0").unwrap(), b0);
        assert!(matches!(
            resolve_node_path(&tree, "0.0"),
            Err(ApplicationError::NodePath { .. })
        ));
        assert!(matches!(
            resolve_node_path(&tree, "x"),
            Err(ApplicationError::NodePath { .. })
        ));
    }
}
