//! Workflow graph construction and queries for Cascade.

mod graph;

pub use graph::{GraphError, WorkflowGraph};
