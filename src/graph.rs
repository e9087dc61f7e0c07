//! Pure graph computations over task and edge snapshots.
//!
//! Every function here takes read-only slices of one owner's tasks and
//! edges and returns an owned result. Nothing is cached between calls;
//! callers load a scope, invoke, and consume the output. Mutation and
//! owner filtering live in [`crate::store::Workspace`], which runs these
//! checks before committing any change.

use crate::types::{DependencyEdge, Task};
use std::collections::{HashMap, HashSet, VecDeque};

/// Outcome of a topological sort.
#[derive(Debug, Clone, PartialEq)]
pub struct SortResult {
    /// Tasks in dependency order, providers before dependents. When
    /// `has_cycle` is true this holds only the acyclic portion and must
    /// not be presented as a usable ordering.
    pub sorted: Vec<Task>,

    /// True when a cycle prevented a complete ordering.
    pub has_cycle: bool,
}

/// One step of the iterative depth-first traversal. A node is pushed as
/// `Enter` to explore it and as `Exit` to drop it from the active path.
enum Frame<'a> {
    Enter(&'a str),
    Exit(&'a str),
}

/// Check whether adding the edge `provider_id -> dependent_id` to `edges`
/// would create a cycle.
///
/// Builds the adjacency of the existing edges plus the candidate, then runs
/// a depth-first traversal keeping two markings per node: seen at all, and
/// on the current path. Meeting an on-path node again is a back edge, so
/// the graph has a cycle. A candidate with `provider_id == dependent_id`
/// is caught the same way, as a one-node cycle.
///
/// The traversal uses an explicit work stack, so arbitrarily deep chains
/// cannot exhaust the call stack.
pub fn would_create_cycle(edges: &[DependencyEdge], provider_id: &str, dependent_id: &str) -> bool {
    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        adjacency
            .entry(edge.provider_id.as_str())
            .or_default()
            .push(edge.dependent_id.as_str());
    }
    adjacency.entry(provider_id).or_default().push(dependent_id);

    // Traversal roots: every endpoint of the combined edge set, in first
    // appearance order so the scan is deterministic.
    let mut roots: Vec<&str> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for edge in edges {
        for node in [edge.provider_id.as_str(), edge.dependent_id.as_str()] {
            if seen.insert(node) {
                roots.push(node);
            }
        }
    }
    for node in [provider_id, dependent_id] {
        if seen.insert(node) {
            roots.push(node);
        }
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut on_path: HashSet<&str> = HashSet::new();
    let mut stack: Vec<Frame> = Vec::new();

    for &root in &roots {
        if visited.contains(root) {
            continue;
        }
        stack.push(Frame::Enter(root));

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Enter(node) => {
                    if !visited.insert(node) {
                        continue;
                    }
                    on_path.insert(node);
                    stack.push(Frame::Exit(node));

                    if let Some(nexts) = adjacency.get(node) {
                        for &next in nexts {
                            if on_path.contains(next) {
                                // Back edge: `next` is an ancestor still on
                                // the active path.
                                return true;
                            }
                            if !visited.contains(next) {
                                stack.push(Frame::Enter(next));
                            }
                        }
                    }
                }
                Frame::Exit(node) => {
                    on_path.remove(node);
                }
            }
        }
    }

    false
}

/// Order `tasks` so that every provider precedes its dependents.
///
/// Kahn's algorithm over the edges whose endpoints both appear in `tasks`.
/// An edge referencing a task outside the set is skipped with a warning;
/// it cannot constrain an ordering of tasks it does not connect.
///
/// The ready queue is seeded in input order and drained FIFO, so tasks
/// with no ordering constraint between them keep their original relative
/// order and the output is deterministic for a given input sequence.
///
/// When fewer tasks come out than went in, the leftovers form at least one
/// cycle: `has_cycle` is set and `sorted` holds only the acyclic portion.
pub fn topological_sort(tasks: &[Task], edges: &[DependencyEdge]) -> SortResult {
    let mut task_map: HashMap<&str, &Task> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for task in tasks {
        if !task_map.contains_key(task.id.as_str()) {
            order.push(task.id.as_str());
        }
        task_map.insert(task.id.as_str(), task);
    }

    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    for &id in &order {
        adjacency.insert(id, Vec::new());
        in_degree.insert(id, 0);
    }

    for edge in edges {
        let provider = edge.provider_id.as_str();
        let dependent = edge.dependent_id.as_str();
        if !task_map.contains_key(provider) || !task_map.contains_key(dependent) {
            log::warn!(
                "skipping edge {} -> {}: endpoint not in the task set",
                provider,
                dependent
            );
            continue;
        }
        adjacency.entry(provider).or_default().push(dependent);
        *in_degree.entry(dependent).or_insert(0) += 1;
    }

    let mut queue: VecDeque<&str> = VecDeque::new();
    for &id in &order {
        if in_degree.get(id) == Some(&0) {
            queue.push_back(id);
        }
    }

    let mut sorted: Vec<Task> = Vec::with_capacity(order.len());
    while let Some(current) = queue.pop_front() {
        if let Some(&task) = task_map.get(current) {
            sorted.push(task.clone());
        }
        if let Some(dependents) = adjacency.get(current) {
            for &dependent in dependents {
                if let Some(degree) = in_degree.get_mut(dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(dependent);
                    }
                }
            }
        }
    }

    // Anything still carrying in-degree sits on a cycle and never reached
    // the queue.
    let has_cycle = sorted.len() != tasks.len();

    SortResult { sorted, has_cycle }
}

/// IDs of a task's direct prerequisites: the provider of every edge whose
/// dependent is `task_id`, in edge order.
pub fn task_prerequisites(task_id: &str, edges: &[DependencyEdge]) -> Vec<String> {
    edges
        .iter()
        .filter(|edge| edge.dependent_id == task_id)
        .map(|edge| edge.provider_id.clone())
        .collect()
}

/// Check whether a task is eligible for completion.
///
/// True when the task has no direct prerequisites, or when every one of
/// them exists in `tasks` and is completed. A prerequisite missing from
/// the task set counts as unmet, so a stale edge locks its dependent
/// rather than silently waving it through.
///
/// Only direct providers are consulted. Transitive locking is not computed
/// here; it emerges because completing those providers is itself gated
/// through this same check.
pub fn is_task_unlocked(task_id: &str, tasks: &[Task], edges: &[DependencyEdge]) -> bool {
    let provider_ids = task_prerequisites(task_id, edges);
    if provider_ids.is_empty() {
        return true;
    }

    let task_map: HashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();

    provider_ids
        .iter()
        .all(|id| task_map.get(id.as_str()).is_some_and(|t| t.completed))
}
