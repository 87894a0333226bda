//! Queryable trigger graph built from a workflow definition snapshot.

use cascade_core::ids::JobId;
use cascade_core::pipeline::{JoinSource, WorkflowDefinition};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Cycle detected in workflow triggers")]
    CycleDetected,
    #[error("Unknown job in trigger edge: {0}")]
    UnknownJob(String),
    #[error("Empty workflow")]
    EmptyWorkflow,
    #[error("Join source has no resolved job id: {0}")]
    UnresolvedJob(String),
}

/// A node in the trigger graph.
#[derive(Debug, Clone)]
struct GraphNode {
    name: String,
    job_id: Option<JobId>,
}

/// Directed graph of job-trigger relationships, immutable once built.
/// Edge weights mark join membership.
#[derive(Debug)]
pub struct WorkflowGraph {
    graph: DiGraph<GraphNode, bool>,
    name_to_index: HashMap<String, NodeIndex>,
}

impl WorkflowGraph {
    /// Build a graph from a workflow definition, rejecting cycles and edges
    /// referencing undeclared jobs.
    pub fn build(definition: &WorkflowDefinition) -> Result<Self, GraphError> {
        if definition.nodes.is_empty() {
            return Err(GraphError::EmptyWorkflow);
        }

        let mut graph = DiGraph::new();
        let mut name_to_index = HashMap::new();

        for node in &definition.nodes {
            let idx = graph.add_node(GraphNode {
                name: node.name.clone(),
                job_id: node.job_id,
            });
            name_to_index.insert(node.name.clone(), idx);
        }

        for edge in &definition.edges {
            let from = name_to_index
                .get(&edge.from)
                .ok_or_else(|| GraphError::UnknownJob(edge.from.clone()))?;
            let to = name_to_index
                .get(&edge.to)
                .ok_or_else(|| GraphError::UnknownJob(edge.to.clone()))?;
            graph.add_edge(*from, *to, edge.join);
        }

        let workflow = WorkflowGraph {
            graph,
            name_to_index,
        };

        // Verify no cycles
        toposort(&workflow.graph, None).map_err(|_| GraphError::CycleDetected)?;

        Ok(workflow)
    }

    /// Job names triggered by the completion of `from`.
    pub fn next_jobs(&self, from: &str) -> Vec<String> {
        self.name_to_index
            .get(from)
            .map(|&idx| {
                self.graph
                    .neighbors_directed(idx, petgraph::Direction::Outgoing)
                    .filter_map(|n| self.graph.node_weight(n))
                    .map(|n| n.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The join specification for `job`: the upstream (name, id) pairs of its
    /// join-flagged incoming edges. Empty for non-join nodes; a plain trigger
    /// edge into a join node does not appear here.
    pub fn join_sources(&self, job: &str) -> Result<Vec<JoinSource>, GraphError> {
        let Some(&idx) = self.name_to_index.get(job) else {
            return Ok(Vec::new());
        };

        self.graph
            .edges_directed(idx, petgraph::Direction::Incoming)
            .filter(|edge| *edge.weight())
            .filter_map(|edge| self.graph.node_weight(edge.source()))
            .map(|node| {
                let job_id = node
                    .job_id
                    .ok_or_else(|| GraphError::UnresolvedJob(node.name.clone()))?;
                Ok(JoinSource {
                    name: node.name.clone(),
                    job_id,
                })
            })
            .collect()
    }

    /// Jobs with no incoming trigger edge.
    pub fn roots(&self) -> Vec<String> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, petgraph::Direction::Incoming)
                    .count()
                    == 0
            })
            .filter_map(|idx| self.graph.node_weight(idx))
            .map(|n| n.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascade_core::pipeline::{WorkflowEdge, WorkflowNode};

    fn node(name: &str) -> WorkflowNode {
        WorkflowNode {
            name: name.to_string(),
            job_id: Some(JobId::new()),
        }
    }

    fn edge(from: &str, to: &str) -> WorkflowEdge {
        WorkflowEdge {
            from: from.to_string(),
            to: to.to_string(),
            join: false,
        }
    }

    fn join_edge(from: &str, to: &str) -> WorkflowEdge {
        WorkflowEdge {
            join: true,
            ..edge(from, to)
        }
    }

    fn diamond() -> WorkflowDefinition {
        // main -> {a, b}, c joined on {a, b}
        WorkflowDefinition {
            nodes: vec![node("main"), node("a"), node("b"), node("c")],
            edges: vec![
                edge("main", "a"),
                edge("main", "b"),
                join_edge("a", "c"),
                join_edge("b", "c"),
            ],
        }
    }

    #[test]
    fn test_next_jobs_fan_out() {
        let graph = WorkflowGraph::build(&diamond()).unwrap();
        let mut next = graph.next_jobs("main");
        next.sort();
        assert_eq!(next, vec!["a", "b"]);
    }

    #[test]
    fn test_next_jobs_unknown_job_is_empty() {
        let graph = WorkflowGraph::build(&diamond()).unwrap();
        assert!(graph.next_jobs("nope").is_empty());
    }

    #[test]
    fn test_join_sources_on_join_node() {
        let graph = WorkflowGraph::build(&diamond()).unwrap();
        let mut sources = graph.join_sources("c").unwrap();
        sources.sort_by(|x, y| x.name.cmp(&y.name));
        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_plain_edge_is_not_a_join_source() {
        let mut definition = diamond();
        // x also triggers c, but is not part of c's join
        definition.nodes.push(node("x"));
        definition.edges.push(edge("x", "c"));

        let graph = WorkflowGraph::build(&definition).unwrap();
        let sources = graph.join_sources("c").unwrap();
        assert_eq!(sources.len(), 2);
        assert!(sources.iter().all(|s| s.name != "x"));
    }

    #[test]
    fn test_non_join_node_has_no_sources() {
        let graph = WorkflowGraph::build(&diamond()).unwrap();
        assert!(graph.join_sources("a").unwrap().is_empty());
    }

    #[test]
    fn test_roots() {
        let graph = WorkflowGraph::build(&diamond()).unwrap();
        assert_eq!(graph.roots(), vec!["main"]);
    }

    #[test]
    fn test_cycle_rejected() {
        let definition = WorkflowDefinition {
            nodes: vec![node("a"), node("b")],
            edges: vec![edge("a", "b"), edge("b", "a")],
        };
        assert!(matches!(
            WorkflowGraph::build(&definition),
            Err(GraphError::CycleDetected)
        ));
    }

    #[test]
    fn test_unknown_edge_endpoint_rejected() {
        let definition = WorkflowDefinition {
            nodes: vec![node("a")],
            edges: vec![edge("a", "missing")],
        };
        assert!(matches!(
            WorkflowGraph::build(&definition),
            Err(GraphError::UnknownJob(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_empty_workflow_rejected() {
        assert!(matches!(
            WorkflowGraph::build(&WorkflowDefinition::default()),
            Err(GraphError::EmptyWorkflow)
        ));
    }

    #[test]
    fn test_unresolved_join_source_rejected() {
        let mut definition = diamond();
        definition.nodes[1].job_id = None; // "a", a member of c's join
        let graph = WorkflowGraph::build(&definition).unwrap();
        assert!(matches!(
            graph.join_sources("c"),
            Err(GraphError::UnresolvedJob(name)) if name == "a"
        ));
    }
}
