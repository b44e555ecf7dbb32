//! Connectivity algorithms
//!
//! Weakly connected components (union-find, direction ignored) and strongly
//! connected components (iterative Tarjan, direction respected).

use super::common::{GraphView, NodeId};
use std::collections::HashMap;

/// Result of a connected components algorithm
///
/// Components are ordered by their smallest member index and each component
/// lists its members in index order.
#[derive(Debug, Clone)]
pub struct ComponentsResult {
    /// Component ID -> List of NodeIds
    pub components: Vec<Vec<NodeId>>,
    /// Map of NodeId -> Component ID
    pub node_component: HashMap<NodeId, usize>,
}

/// Result of WCC algorithm
pub type WccResult = ComponentsResult;

/// Result of SCC algorithm
pub type SccResult = ComponentsResult;

impl ComponentsResult {
    /// Number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Largest component by node count. Ties go to the first component in order.
    pub fn largest(&self) -> Option<&[NodeId]> {
        let mut best: Option<&Vec<NodeId>> = None;
        for component in &self.components {
            if best.map_or(true, |b| component.len() > b.len()) {
                best = Some(component);
            }
        }
        best.map(Vec::as_slice)
    }

    /// Build the result from a per-index component label, renumbering the
    /// labels by first appearance.
    fn from_labels(view: &GraphView, labels: &[usize]) -> Self {
        let mut renumber: HashMap<usize, usize> = HashMap::new();
        let mut components: Vec<Vec<NodeId>> = Vec::new();
        let mut node_component = HashMap::with_capacity(view.node_count);

        for (idx, &label) in labels.iter().enumerate() {
            let next_id = components.len();
            let component_id = *renumber.entry(label).or_insert(next_id);
            if component_id == next_id {
                components.push(Vec::new());
            }
            let node_id = view.index_to_node[idx];
            components[component_id].push(node_id);
            node_component.insert(node_id, component_id);
        }

        ComponentsResult {
            components,
            node_component,
        }
    }
}

/// Union-Find data structure
struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<usize>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        let mut current = i;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);

        if root_i != root_j {
            if self.rank[root_i] < self.rank[root_j] {
                self.parent[root_i] = root_j;
            } else if self.rank[root_i] > self.rank[root_j] {
                self.parent[root_j] = root_i;
            } else {
                self.parent[root_j] = root_i;
                self.rank[root_i] += 1;
            }
        }
    }
}

/// Weakly Connected Components (WCC)
///
/// Finds all disjoint subgraphs in the graph.
/// Ignores edge direction.
pub fn weakly_connected_components(view: &GraphView) -> WccResult {
    let n = view.node_count;
    let mut uf = UnionFind::new(n);

    // Iterate all edges and Union connected nodes
    for u_idx in 0..n {
        for &v_idx in view.successors(u_idx) {
            uf.union(u_idx, v_idx);
        }
    }

    let labels: Vec<usize> = (0..n).map(|i| uf.find(i)).collect();
    ComponentsResult::from_labels(view, &labels)
}

/// Strongly Connected Components (SCC)
///
/// Two nodes share a component when each is reachable from the other
/// following edge direction. Uses an explicit stack so deep graphs do not
/// overflow the call stack.
pub fn strongly_connected_components(view: &GraphView) -> SccResult {
    const UNVISITED: usize = usize::MAX;

    let n = view.node_count;
    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0usize; n];
    let mut on_stack = vec![false; n];
    let mut stack: Vec<usize> = Vec::new();
    let mut labels = vec![0usize; n];
    let mut next_index = 0usize;

    // (node, position in its successor list)
    let mut call_stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if index[root] != UNVISITED {
            continue;
        }

        call_stack.push((root, 0));
        index[root] = next_index;
        lowlink[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;

        while let Some(frame) = call_stack.last_mut() {
            let node = frame.0;
            let successors = view.successors(node);
            if frame.1 < successors.len() {
                let next = successors[frame.1];
                frame.1 += 1;

                if index[next] == UNVISITED {
                    index[next] = next_index;
                    lowlink[next] = next_index;
                    next_index += 1;
                    stack.push(next);
                    on_stack[next] = true;
                    call_stack.push((next, 0));
                } else if on_stack[next] {
                    lowlink[node] = lowlink[node].min(index[next]);
                }
                continue;
            }

            call_stack.pop();
            if let Some(&(parent, _)) = call_stack.last() {
                lowlink[parent] = lowlink[parent].min(lowlink[node]);
            }

            if lowlink[node] == index[node] {
                // Label the component with its root; renumbered afterwards
                while let Some(member) = stack.pop() {
                    on_stack[member] = false;
                    labels[member] = node;
                    if member == node {
                        break;
                    }
                }
            }
        }
    }

    ComponentsResult::from_labels(view, &labels)
}
