//! Tree manifests: TOML descriptions of a tree and the records of each node.
//!
//! ```toml
//! tag = "model"
//!
//! [root]
//! records = [{ label = "encoder", width = 512 }]
//!
//! [[root.children]]
//! records = [{ label = "layer-1", width = 256 }, { width = 128 }]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Record, Tree};

/// One node of a manifest with its records and child nodes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeSpec {
    pub records: Vec<Record>,
    pub children: Vec<NodeSpec>,
}

/// Whole-tree manifest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TreeManifest {
    pub tag: String,
    #[serde(default)]
    pub root: NodeSpec,
}

impl TreeManifest {
    /// Parse a manifest from TOML text.
    pub fn from_toml_str(content: &str) -> ApplicationResult<Self> {
        Self::parse(content, Path::new("<string>"))
    }

    /// Read and parse a manifest file.
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let content = std::fs::read_to_string(path).with_path_context("read manifest", path)?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> ApplicationResult<Self> {
        toml::from_str(content).map_err(|e| ApplicationError::Manifest {
            path: PathBuf::from(path),
            message: e.message().to_string(),
        })
    }

    /// Builds the described tree.
    ///
    /// Iterative with an explicit stack; children are created when their
    /// parent is popped, so sibling order follows the manifest.
    #[instrument(level = "debug", skip(self), fields(tag = %self.tag))]
    pub fn build(&self) -> ApplicationResult<Tree<Record>> {
        let mut tree = Tree::new(self.tag.clone());
        let mut stack = vec![(&self.root, tree.root())];

        while let Some((node, node_id)) = stack.pop() {
            tree.info_mut(node_id)?.extend(node.records.iter().cloned());

            let mut created = Vec::with_capacity(node.children.len());
            for child in &node.children {
                created.push((child, tree.add_child(node_id)?));
            }
            stack.extend(created.into_iter().rev());
        }

        debug!(nodes = tree.node_count(), "tree built from manifest");
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AttrValue;

    #[test]
    fn test_parse_records_with_typed_attributes() {
        let manifest = TreeManifest::from_toml_str(
            r#"
            tag = "t"
            [root]
            records = [{ label = "a", width = 3, ratio = 0.5, on = true, act = "relu" }]
            "#,
        )
        .unwrap();
        let record = &manifest.root.records[0];
        assert_eq!(record.label.as_deref(), Some("a"));
        assert_eq!(record.attr("width"), Some(&AttrValue::Int(3)));
        assert_eq!(record.attr("ratio"), Some(&AttrValue::Float(0.5)));
        assert_eq!(record.attr("on"), Some(&AttrValue::Bool(true)));
        assert_eq!(record.attr("act"), Some(&AttrValue::Text("relu".into())));
        assert_eq!(record.attr("label"), None);
    }

    #[test]
    fn test_missing_tag_is_a_manifest_error() {
        let err = TreeManifest::from_toml_str("[root]\nrecords = []").unwrap_err();
        assert!(matches!(err, ApplicationError::Manifest { .. }));
    }

    #[test]
    fn test_build_keeps_sibling_order() {
        let manifest = TreeManifest::from_toml_str(
            r#"
            tag = "t"
            [root]
            records = [{ label = "R" }]
            [[root.children]]
            records = [{ label = "X" }]
            [[root.children.children]]
            records = [{ label = "X1" }]
            [[root.children]]
            records = [{ label = "Y" }]
            "#,
        )
        .unwrap();
        let tree = manifest.build().unwrap();
        assert_eq!(tree.tag(), "t");
        assert_eq!(tree.to_string(), "R\n├── X\n│   └── X1\n└── Y");
    }
}
