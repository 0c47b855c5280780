//! Trees whose nodes each carry a doubly linked list of info records.
//!
//! The [`domain`] layer holds the data structures and traversals: the
//! arena-backed [`InfoList`], the [`Tree`] of list-carrying nodes, pre-order
//! traversal, parent lookup, position-synchronized aggregation
//! ([`Tree::sync_traverse`]) and tree rendering. The [`application`] and
//! [`cli`] layers load trees from TOML manifests for the `infotree` binary.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{
    Direction, DomainError, DomainResult, InfoList, NodeId, Record, RecordId, RenderStyle, Tree,
    TreeNode,
};
