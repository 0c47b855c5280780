//! Domain layer: info lists, trees and their traversals
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod convert;
pub mod error;
pub mod flow;
pub mod list;
pub mod record;
pub mod render;
pub mod tree;

pub use convert::TreeConvert;
pub use error::{DomainError, DomainResult};
pub use flow::{break_value, Flow};
pub use list::{Direction, InfoList, RecordId};
pub use record::{AttrValue, Labelled, Record};
pub use render::RenderStyle;
pub use tree::{NodeId, PreOrder, Tree, TreeNode};
