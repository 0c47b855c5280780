//! Application layer: manifests, node addressing and built-in aggregates
//!
//! This layer turns files and command-line input into domain trees and runs
//! the domain traversals on them.

pub mod aggregate;
pub mod error;
pub mod error_ext;
pub mod manifest;
pub mod node_path;

pub use aggregate::{Aggregate, AggregateKind};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use manifest::{NodeSpec, TreeManifest};
pub use node_path::resolve_node_path;
