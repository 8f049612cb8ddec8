//! Cut vertices of the "could still be path" subgraph

/// Undirected graph as adjacency lists
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleGraph {
    neighbors: Vec<Vec<usize>>,
}

impl SimpleGraph {
    /// Wrap adjacency lists; every edge should appear in both lists
    pub const fn new(neighbors: Vec<Vec<usize>>) -> Self {
        Self { neighbors }
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Neighbours of `node`
    pub fn neighbors(&self, node: usize) -> &[usize] {
        self.neighbors.get(node).map_or(&[], Vec::as_slice)
    }
}

/// Result of an articulation-point search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticulationInfo {
    /// Nodes whose removal would separate two relevant nodes
    pub is_articulation: Vec<bool>,
    /// Component id of every node reached from a relevant root
    pub component: Vec<Option<usize>>,
    /// Number of components containing a relevant node
    pub component_count: usize,
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    node: usize,
    next: usize,
    pending_child: Option<usize>,
    relevant_children: usize,
}

impl Frame {
    const fn new(node: usize) -> Self {
        Self {
            node,
            next: 0,
            pending_child: None,
            relevant_children: 0,
        }
    }
}

/// Find articulation points among the walkable nodes
///
/// A node is an articulation point if removing it leaves two relevant nodes
/// without a path between them. `relevant` defaults to every walkable node.
/// Only relevant nodes are used as search roots, so components without a
/// relevant node are never visited.
///
/// The depth-first search keeps its frames on an explicit stack, so deep
/// graphs cannot overflow the call stack.
// Nodes are only visited once walkable_at has checked them against node_count
#[allow(clippy::indexing_slicing)]
pub fn articulation_points(
    graph: &SimpleGraph,
    walkable: &[bool],
    relevant: Option<&[bool]>,
) -> ArticulationInfo {
    let node_count = graph.node_count();
    let walkable_at =
        |node: usize| node < node_count && walkable.get(node).copied().unwrap_or(false);
    let relevant_at = |node: usize| relevant.is_none_or(|r| r.get(node).copied().unwrap_or(false));

    let mut low = vec![0_usize; node_count];
    let mut dfs_num = vec![0_usize; node_count];
    let mut next_num = 1;
    let mut is_articulation = vec![false; node_count];
    let mut component = vec![None; node_count];
    let mut component_count = 0;

    for root in 0..node_count {
        if !walkable_at(root) || !relevant_at(root) || dfs_num[root] != 0 {
            continue;
        }

        component[root] = Some(component_count);
        low[root] = next_num;
        dfs_num[root] = next_num;
        next_num += 1;

        let mut stack = vec![Frame::new(root)];
        let mut child_relevant = false;
        let mut root_children = 0;

        while let Some(mut frame) = stack.pop() {
            let u = frame.node;

            // Returning from the subtree rooted at v
            if let Some(v) = frame.pending_child.take() {
                if child_relevant {
                    frame.relevant_children += 1;
                    if low[v] >= dfs_num[u] {
                        is_articulation[u] = true;
                    }
                }
                low[u] = low[u].min(low[v]);
                frame.next += 1;
                stack.push(frame);
                continue;
            }

            match graph.neighbors(u).get(frame.next).copied() {
                Some(v) if !walkable_at(v) => {
                    frame.next += 1;
                    stack.push(frame);
                }
                Some(v) if dfs_num[v] == 0 => {
                    component[v] = Some(component_count);
                    low[v] = next_num;
                    dfs_num[v] = next_num;
                    next_num += 1;
                    frame.pending_child = Some(v);
                    stack.push(frame);
                    stack.push(Frame::new(v));
                }
                Some(v) => {
                    low[u] = low[u].min(dfs_num[v]);
                    frame.next += 1;
                    stack.push(frame);
                }
                None => {
                    if stack.is_empty() {
                        root_children = frame.relevant_children;
                    } else {
                        child_relevant = frame.relevant_children > 0 || relevant_at(u);
                    }
                }
            }
        }

        is_articulation[root] = root_children > 1;
        component_count += 1;
    }

    ArticulationInfo {
        is_articulation,
        component,
        component_count,
    }
}
