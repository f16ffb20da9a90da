// src/dag/graph.rs

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::types::{TaskList, TaskName};

/// Reported by a [`TopologicalSort`] when the task graph has a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleDetected {
    /// A task that lies on the cycle.
    pub task: TaskName,
}

/// Orders the tasks of a job so every task comes after all of its upstreams.
pub trait TopologicalSort: Send + Sync {
    fn order(&self, graph: &TaskList) -> Result<Vec<TaskName>, CycleDetected>;
}

/// Default ordering backed by `petgraph::algo::toposort`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PetgraphSort;

impl TopologicalSort for PetgraphSort {
    fn order(&self, graph: &TaskList) -> Result<Vec<TaskName>, CycleDetected> {
        // Edge direction: producer -> consumer, as stored in `task_list`.
        let mut g: DiGraphMap<&str, ()> = DiGraphMap::new();

        for name in graph.keys() {
            g.add_node(name.as_str());
        }
        for (name, next) in graph.iter() {
            for target in next {
                g.add_edge(name.as_str(), target.as_str(), ());
            }
        }

        match toposort(&g, None) {
            Ok(order) => Ok(order.into_iter().map(str::to_string).collect()),
            Err(cycle) => Err(CycleDetected {
                task: cycle.node_id().to_string(),
            }),
        }
    }
}

/// Internal node structure: immediate upstreams and downstreams.
#[derive(Debug, Clone, Default)]
struct JobNode {
    upstream: Vec<TaskName>,
    downstream: Vec<TaskName>,
}

/// Adjacency view over a job's `task_list`, keyed by task name.
///
/// Does not check acyclicity; that is the job of [`TopologicalSort`].
#[derive(Debug, Clone)]
pub struct JobGraph {
    nodes: HashMap<TaskName, JobNode>,
}

impl JobGraph {
    pub fn from_task_list(task_list: &TaskList) -> Self {
        let mut nodes: HashMap<TaskName, JobNode> = HashMap::new();

        for (name, next) in task_list.iter() {
            nodes.entry(name.clone()).or_default().downstream = next.clone();
            for target in next {
                nodes
                    .entry(target.clone())
                    .or_default()
                    .upstream
                    .push(name.clone());
            }
        }

        Self { nodes }
    }

    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    /// Tasks whose output feeds `name`.
    pub fn upstream_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.upstream.as_slice())
            .unwrap_or(&[])
    }

    /// Tasks that consume the output of `name`.
    pub fn downstream_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.downstream.as_slice())
            .unwrap_or(&[])
    }

    /// Tasks with no upstream, sorted by name.
    pub fn roots(&self) -> Vec<TaskName> {
        let mut roots: Vec<TaskName> = self
            .tasks()
            .filter(|name| self.upstream_of(name).is_empty())
            .map(str::to_string)
            .collect();
        roots.sort();
        roots
    }
}
