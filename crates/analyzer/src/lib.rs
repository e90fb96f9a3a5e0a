//! Module tree model, query engine, report rendering, and data sinks.

pub mod query;
pub mod reporter;
pub mod sink;
pub mod tree;

pub use query::{find, Match, Selector};
pub use tree::ModuleNode;
