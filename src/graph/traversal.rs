//! BFS traversal over a built knowledge graph.

use std::collections::{HashSet, VecDeque};

use super::{EdgeView, KnowledgeGraph};

/// Traverse the graph breadth-first from `start`, following outgoing edges.
/// Returns every edge that reaches a not-yet-visited node within `max_depth` hops.
pub fn traverse<'g>(
    graph: &'g KnowledgeGraph,
    start: &str,
    relation_types: Option<&[String]>,
    max_depth: usize,
) -> Vec<EdgeView<'g>> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue = VecDeque::new();
    let mut result = Vec::new();

    if !graph.contains(start) {
        return result;
    }
    visited.insert(start);
    queue.push_back((start, 0));

    while let Some((entity, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }

        for edge in graph.outgoing(entity) {
            if let Some(types) = relation_types {
                if !types.iter().any(|t| t == edge.relationship) {
                    continue;
                }
            }
            if visited.insert(edge.target) {
                queue.push_back((edge.target, depth + 1));
                result.push(edge);
            }
        }
    }

    result
}
