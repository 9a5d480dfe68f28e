//! Coarse navigation over platform centers
//!
//! The graph is a snapshot of the platform list: one node per platform and a
//! bidirectional pair of edges between every two centers within walking
//! distance. It is rebuilt from scratch whenever the level changes.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::foundation::math::Vec3;
use crate::physics::platform::Platform;

/// Default maximum distance between two connected platform centers
pub const MAX_WALK_DISTANCE: f32 = 8.0;

/// A graph node placed at a platform center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavNode {
    /// Copied platform center
    pub position: Vec3,
    /// Index of the platform this node was built from
    pub platform_index: usize,
}

/// A directed edge with its traversal cost
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavEdge {
    /// Source node index
    pub from: usize,
    /// Target node index
    pub to: usize,
    /// Euclidean length of the edge
    pub cost: f32,
}

/// Platform-center graph answering A* path queries
#[derive(Debug, Clone)]
pub struct NavigationGraph {
    nodes: Vec<NavNode>,
    edges: Vec<NavEdge>,
    /// Outgoing edge indices per node
    adjacency: Vec<Vec<usize>>,
    max_walk_distance: f32,
}

impl Default for NavigationGraph {
    fn default() -> Self {
        Self::new(MAX_WALK_DISTANCE)
    }
}

impl NavigationGraph {
    /// Creates an empty graph
    pub fn new(max_walk_distance: f32) -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            adjacency: Vec::new(),
            max_walk_distance,
        }
    }

    /// Rebuild the graph from a platform list, discarding the previous contents
    pub fn build_from_platforms(&mut self, platforms: &[Platform]) {
        self.nodes = platforms
            .iter()
            .enumerate()
            .map(|(platform_index, platform)| NavNode {
                position: platform.position(),
                platform_index,
            })
            .collect();
        self.edges.clear();
        self.adjacency = vec![Vec::new(); self.nodes.len()];

        for i in 0..self.nodes.len() {
            for j in (i + 1)..self.nodes.len() {
                let cost = (self.nodes[i].position - self.nodes[j].position).magnitude();
                if cost <= self.max_walk_distance {
                    self.push_edge(i, j, cost);
                    self.push_edge(j, i, cost);
                }
            }
        }

        log::debug!(
            "Navigation graph built: {} nodes, {} edges",
            self.nodes.len(),
            self.edges.len()
        );
    }

    fn push_edge(&mut self, from: usize, to: usize, cost: f32) {
        self.adjacency[from].push(self.edges.len());
        self.edges.push(NavEdge { from, to, cost });
    }

    /// Shortest route from `start` to `goal`.
    ///
    /// The result is the positions of the visited nodes followed by `goal`
    /// itself. Returns an empty path when the graph is empty or the goal node
    /// is unreachable, and just `[goal]` when both ends map to the same node.
    pub fn find_path(&self, start: &Vec3, goal: &Vec3) -> Vec<Vec3> {
        let (Some(start_node), Some(goal_node)) = (self.closest_node(start), self.closest_node(goal))
        else {
            return Vec::new();
        };

        if start_node == goal_node {
            return vec![*goal];
        }

        let target = self.nodes[goal_node].position;
        let heuristic = |node: usize| (self.nodes[node].position - target).magnitude();

        let mut g_score = vec![f32::INFINITY; self.nodes.len()];
        let mut came_from: Vec<Option<usize>> = vec![None; self.nodes.len()];
        // Min-heap on (f, node): equal scores pop the lowest node index first
        let mut open = BinaryHeap::new();

        g_score[start_node] = 0.0;
        open.push(Reverse((OrderedFloat(heuristic(start_node)), start_node)));

        while let Some(Reverse((_, current))) = open.pop() {
            if current == goal_node {
                let mut route = vec![current];
                let mut node = current;
                while let Some(previous) = came_from[node] {
                    route.push(previous);
                    node = previous;
                }
                let mut path: Vec<Vec3> = route
                    .into_iter()
                    .rev()
                    .map(|index| self.nodes[index].position)
                    .collect();
                path.push(*goal);
                return path;
            }

            for &edge_index in &self.adjacency[current] {
                let edge = &self.edges[edge_index];
                let tentative = g_score[current] + edge.cost;
                if tentative < g_score[edge.to] {
                    came_from[edge.to] = Some(current);
                    g_score[edge.to] = tentative;
                    open.push(Reverse((OrderedFloat(tentative + heuristic(edge.to)), edge.to)));
                }
            }
        }

        Vec::new()
    }

    /// Index of the node nearest to `position`, `None` on an empty graph.
    ///
    /// Ties keep the lowest index.
    pub fn closest_node(&self, position: &Vec3) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (index, (node.position - position).magnitude_squared()))
            .fold(None, |best: Option<(usize, f32)>, (index, distance)| match best {
                Some((_, best_distance)) if best_distance <= distance => best,
                _ => Some((index, distance)),
            })
            .map(|(index, _)| index)
    }

    /// Whether the graph has any nodes
    pub fn is_valid(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Nodes in platform order
    pub fn nodes(&self) -> &[NavNode] {
        &self.nodes
    }

    /// All directed edges
    pub fn edges(&self) -> &[NavEdge] {
        &self.edges
    }

    /// Maximum connected distance this graph was configured with
    pub fn max_walk_distance(&self) -> f32 {
        self.max_walk_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn block(x: f32, z: f32) -> Platform {
        Platform::new(Vec3::new(x, 0.0, z), Vec3::new(2.0, 0.5, 2.0))
    }

    fn graph(platforms: &[Platform]) -> NavigationGraph {
        let mut graph = NavigationGraph::default();
        graph.build_from_platforms(platforms);
        graph
    }

    #[test]
    fn test_empty_graph() {
        let graph = graph(&[]);
        assert!(!graph.is_valid());
        assert!(graph.closest_node(&Vec3::zeros()).is_none());
        assert!(graph.find_path(&Vec3::zeros(), &Vec3::new(1.0, 0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_edges_are_bidirectional_within_walk_distance() {
        let graph = graph(&[block(0.0, 0.0), block(8.0, 0.0), block(16.5, 0.0)]);
        assert_eq!(graph.nodes().len(), 3);
        assert_eq!(graph.edges().len(), 2);
        assert!(graph.edges().iter().any(|e| e.from == 0 && e.to == 1));
        assert!(graph.edges().iter().any(|e| e.from == 1 && e.to == 0));
        assert_relative_eq!(graph.edges()[0].cost, 8.0);
    }

    #[test]
    fn test_reachable_path_ends_at_literal_goal() {
        let graph = graph(&[block(0.0, 0.0), block(5.0, 0.0)]);
        let goal = Vec3::new(5.3, 1.0, 0.4);
        let path = graph.find_path(&Vec3::new(-0.5, 1.0, 0.0), &goal);

        assert_eq!(path.len(), 3);
        assert_eq!(path[0], Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(path[1], Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(path[2], goal);
    }

    #[test]
    fn test_unreachable_goal_gives_empty_path() {
        let graph = graph(&[block(0.0, 0.0), block(20.0, 0.0)]);
        let path = graph.find_path(&Vec3::zeros(), &Vec3::new(20.0, 0.0, 0.0));
        assert!(path.is_empty());
    }

    #[test]
    fn test_same_node_returns_goal_only() {
        let graph = graph(&[block(0.0, 0.0), block(5.0, 0.0)]);
        let goal = Vec3::new(0.5, 1.0, 0.5);
        assert_eq!(graph.find_path(&Vec3::new(-0.5, 1.0, 0.0), &goal), vec![goal]);
    }

    #[test]
    fn test_path_routes_through_connected_nodes() {
        // Node 3 is only linked through node 1; node 2 is a dead end
        let graph = graph(&[
            block(0.0, 0.0),
            block(6.0, 0.0),
            block(4.0, 5.0),
            block(12.0, 0.0),
        ]);
        let path = graph.find_path(&Vec3::zeros(), &Vec3::new(12.0, 0.0, 0.0));
        assert_eq!(path.len(), 4);
        assert_eq!(path[1], Vec3::new(6.0, 0.0, 0.0));
    }

    #[test]
    fn test_closest_node_prefers_lowest_index_on_tie() {
        let graph = graph(&[block(-1.0, 0.0), block(1.0, 0.0)]);
        assert_eq!(graph.closest_node(&Vec3::zeros()), Some(0));
        assert_eq!(graph.closest_node(&Vec3::new(0.9, 0.0, 0.0)), Some(1));
    }

    #[test]
    fn test_rebuild_discards_previous_snapshot() {
        let mut graph = graph(&[block(0.0, 0.0), block(5.0, 0.0)]);
        graph.build_from_platforms(&[block(0.0, 0.0)]);
        assert_eq!(graph.nodes().len(), 1);
        assert!(graph.edges().is_empty());
    }
}
