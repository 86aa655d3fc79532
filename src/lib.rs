pub mod config;
pub mod error;
pub mod identity;
pub mod operations;
pub mod row;
pub mod tree;
pub mod types;
pub mod utils;

pub use error::{CatalogError, Result, TreeError};
pub use identity::Identity;
pub use row::{format_row, Field, IntoField, Tabular};
pub use tree::{Node, RowFormatter, CONTAINER_MARKER};
pub use types::{CatalogRow, EntryKind, ModelRecord};
pub use utils::{format_tree, pretty_print_tree};
