use std::cmp::Ordering;
use std::collections::HashMap as ClosedMap;

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::apq::{AdaptablePriorityQueue, EntryRef, HeapApq, ListApq};
use crate::graph::{Graph, VertexId};

/// Path cost used as the priority-queue key.
///
/// Wraps `f64` with a total order so it can drive an `Ord`-keyed queue.
/// Weights are assumed non-negative and free of NaN; negative weights are
/// not validated and silently produce non-shortest results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cost(pub f64);

impl Eq for Cost {}

#[allow(clippy::non_canonical_partial_ord_impl)]
impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }
}

/// Finalized record for one vertex: its shortest distance from the source
/// and the vertex it was reached through (`None` for the source itself).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PathEntry {
    pub distance: f64,
    pub predecessor: Option<VertexId>,
}

/// Result of a shortest-path run: the set of vertices that were
/// finalized, with their distances and predecessors.
///
/// A vertex unreachable from the source (or skipped by an early exit)
/// has no entry; lookups return `None` rather than failing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShortestPaths {
    source: VertexId,
    closed: ClosedMap<VertexId, PathEntry>,
}

impl ShortestPaths {
    pub fn source(&self) -> VertexId {
        self.source
    }

    pub fn len(&self) -> usize {
        self.closed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closed.is_empty()
    }

    pub fn entry(&self, vertex: VertexId) -> Option<&PathEntry> {
        self.closed.get(&vertex)
    }

    pub fn distance(&self, vertex: VertexId) -> Option<f64> {
        self.entry(vertex).map(|entry| entry.distance)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &PathEntry)> + '_ {
        self.closed.iter().map(|(&vertex, entry)| (vertex, entry))
    }

    /// Reconstruct the vertex sequence from the source to `destination`
    /// by walking predecessors. `None` when the destination was never
    /// finalized.
    pub fn path_to(&self, destination: VertexId) -> Option<Vec<VertexId>> {
        self.entry(destination)?;
        let mut path = Vec::new();
        let mut current = destination;
        while current != self.source {
            path.push(current);
            current = self.entry(current)?.predecessor?;
        }
        path.push(self.source);
        path.reverse();
        Some(path)
    }
}

/// Open-set policy of a run: how discovered vertices enter the queue and
/// how improvements are recorded.
trait Frontier {
    fn open(&mut self, vertex: VertexId, predecessor: Option<VertexId>, cost: Cost);
    fn improve(&mut self, vertex: VertexId, predecessor: VertexId, cost: Cost);
    /// Tentative distance of an open vertex, `None` when the policy does
    /// not track one (forcing the caller to insert a fresh entry).
    fn tentative(&self, vertex: VertexId) -> Option<Cost>;
    fn pop(&mut self) -> Option<(Cost, VertexId, Option<VertexId>)>;
}

/// Decrease-key policy: one queue entry per open vertex, lowered in place
/// through its handle whenever a shorter tentative distance is found.
struct EagerFrontier<Q> {
    queue: Q,
    handles: HashMap<VertexId, EntryRef>,
    predecessors: HashMap<VertexId, Option<VertexId>>,
}

impl<Q: AdaptablePriorityQueue<Cost, VertexId>> EagerFrontier<Q> {
    fn new(queue: Q) -> Self {
        EagerFrontier {
            queue,
            handles: HashMap::new(),
            predecessors: HashMap::new(),
        }
    }
}

impl<Q: AdaptablePriorityQueue<Cost, VertexId>> Frontier for EagerFrontier<Q> {
    fn open(&mut self, vertex: VertexId, predecessor: Option<VertexId>, cost: Cost) {
        let handle = self.queue.add(cost, vertex);
        self.handles.insert(vertex, handle);
        self.predecessors.insert(vertex, predecessor);
    }

    fn improve(&mut self, vertex: VertexId, predecessor: VertexId, cost: Cost) {
        if let Some(&handle) = self.handles.get(&vertex) {
            // Handles stay live until their vertex is popped.
            let updated = self.queue.update_key(handle, cost);
            debug_assert!(updated.is_ok());
            self.predecessors.insert(vertex, Some(predecessor));
        }
    }

    fn tentative(&self, vertex: VertexId) -> Option<Cost> {
        let handle = self.handles.get(&vertex)?;
        self.queue.get_key(*handle).ok().copied()
    }

    fn pop(&mut self) -> Option<(Cost, VertexId, Option<VertexId>)> {
        let (cost, vertex) = self.queue.remove_min()?;
        self.handles.remove(&vertex);
        let predecessor = self.predecessors.remove(&vertex).flatten();
        Some((cost, vertex, predecessor))
    }
}

/// Duplicate-entry policy: every relaxation appends a fresh
/// `(vertex, predecessor)` entry and never touches existing ones. Stale
/// entries surface at extraction and are discarded against the closed
/// set. Only `add` and `remove_min` are ever exercised.
struct LazyFrontier {
    queue: HeapApq<Cost, (VertexId, Option<VertexId>)>,
}

impl LazyFrontier {
    fn new() -> Self {
        LazyFrontier {
            queue: HeapApq::new(),
        }
    }
}

impl Frontier for LazyFrontier {
    fn open(&mut self, vertex: VertexId, predecessor: Option<VertexId>, cost: Cost) {
        self.queue.add(cost, (vertex, predecessor));
    }

    fn improve(&mut self, vertex: VertexId, predecessor: VertexId, cost: Cost) {
        self.open(vertex, Some(predecessor), cost);
    }

    fn tentative(&self, _vertex: VertexId) -> Option<Cost> {
        None
    }

    fn pop(&mut self) -> Option<(Cost, VertexId, Option<VertexId>)> {
        let (cost, (vertex, predecessor)) = self.queue.remove_min()?;
        Some((cost, vertex, predecessor))
    }
}

/// The one traversal shared by every variant. A vertex moves
/// unseen -> open on its first relaxation, open -> closed when it leaves
/// the queue as the global minimum; once closed its entry never changes.
fn run<V, E, F: Frontier>(
    graph: &Graph<V, E>,
    source: VertexId,
    destination: Option<VertexId>,
    mut frontier: F,
) -> ShortestPaths {
    let mut closed = ClosedMap::new();
    if !graph.contains_vertex(source) {
        return ShortestPaths { source, closed };
    }
    frontier.open(source, None, Cost(0.0));

    while let Some((cost, vertex, predecessor)) = frontier.pop() {
        if closed.contains_key(&vertex) {
            // Stale duplicate left behind by a lazy frontier.
            continue;
        }
        closed.insert(
            vertex,
            PathEntry {
                distance: cost.0,
                predecessor,
            },
        );
        tracing::trace!(vertex = vertex.index(), cost = cost.0, "vertex closed");

        if destination == Some(vertex) {
            break;
        }

        for edge in graph.get_edges(vertex) {
            let Some(neighbor) = edge.opposite(vertex) else {
                continue;
            };
            if closed.contains_key(&neighbor) {
                continue;
            }
            let candidate = Cost(cost.0 + edge.weight());
            match frontier.tentative(neighbor) {
                None => frontier.open(neighbor, Some(vertex), candidate),
                Some(current) if candidate < current => {
                    frontier.improve(neighbor, vertex, candidate);
                }
                Some(_) => {}
            }
        }
    }

    tracing::debug!(
        source = source.index(),
        finalized = closed.len(),
        "shortest-path run finished"
    );
    ShortestPaths { source, closed }
}

/// Dijkstra's algorithm over the heap-backed queue, exploring until the
/// open set drains; every vertex reachable from `source` gets an entry.
#[tracing::instrument(level = "debug", skip(graph))]
pub fn dijkstra<V, E>(graph: &Graph<V, E>, source: VertexId) -> ShortestPaths {
    run(graph, source, None, EagerFrontier::new(HeapApq::new()))
}

/// Same traversal as [`dijkstra`], returning as soon as `destination` is
/// finalized. Its destination entry is identical to the full run's.
#[tracing::instrument(level = "debug", skip(graph))]
pub fn dijkstra_to<V, E>(
    graph: &Graph<V, E>,
    source: VertexId,
    destination: VertexId,
) -> ShortestPaths {
    run(
        graph,
        source,
        Some(destination),
        EagerFrontier::new(HeapApq::new()),
    )
}

/// Full exploration over the linear-scan queue. Produces the same result
/// as [`dijkstra`] at a different asymptotic cost; kept for contrasting
/// the two queues empirically.
#[tracing::instrument(level = "debug", skip(graph))]
pub fn dijkstra_list<V, E>(graph: &Graph<V, E>, source: VertexId) -> ShortestPaths {
    run(graph, source, None, EagerFrontier::new(ListApq::new()))
}

/// Dijkstra without key updates: relaxations insert duplicate entries and
/// stale ones are dropped at extraction time. Converges to the same
/// distances as [`dijkstra`] while processing more entries.
#[tracing::instrument(level = "debug", skip(graph))]
pub fn dijkstra_lazy<V, E>(graph: &Graph<V, E>, source: VertexId) -> ShortestPaths {
    run(graph, source, None, LazyFrontier::new())
}

/// Run the decrease-key engine over a caller-supplied queue, exploring
/// fully when `destination` is `None` and exiting early otherwise.
pub fn dijkstra_with<V, E, Q>(
    graph: &Graph<V, E>,
    source: VertexId,
    destination: Option<VertexId>,
    queue: Q,
) -> ShortestPaths
where
    Q: AdaptablePriorityQueue<Cost, VertexId>,
{
    run(graph, source, destination, EagerFrontier::new(queue))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_graph() -> (Graph<char>, [VertexId; 4]) {
        let mut graph = Graph::new();
        let a = graph.add_vertex('a');
        let b = graph.add_vertex('b');
        let c = graph.add_vertex('c');
        let d = graph.add_vertex('d');
        // a-b 1, a-c 4, b-c 2, b-d 5, c-d 1; best a..d is a-b-c-d = 4.
        graph.add_edge(a, b, 1.0, ());
        graph.add_edge(a, c, 4.0, ());
        graph.add_edge(b, c, 2.0, ());
        graph.add_edge(b, d, 5.0, ());
        graph.add_edge(c, d, 1.0, ());
        (graph, [a, b, c, d])
    }

    #[test]
    fn full_exploration_reaches_every_vertex() {
        let (graph, [a, b, c, d]) = simple_graph();
        let paths = dijkstra(&graph, a);

        assert_eq!(paths.len(), 4);
        assert_eq!(paths.distance(a), Some(0.0));
        assert_eq!(paths.distance(b), Some(1.0));
        assert_eq!(paths.distance(c), Some(3.0));
        assert_eq!(paths.distance(d), Some(4.0));

        assert_eq!(paths.entry(a).unwrap().predecessor, None);
        assert_eq!(paths.entry(b).unwrap().predecessor, Some(a));
        assert_eq!(paths.entry(c).unwrap().predecessor, Some(b));
        assert_eq!(paths.entry(d).unwrap().predecessor, Some(c));
    }

    #[test]
    fn path_reconstruction_walks_predecessors() {
        let (graph, [a, b, c, d]) = simple_graph();
        let paths = dijkstra(&graph, a);

        assert_eq!(paths.path_to(d), Some(vec![a, b, c, d]));
    }

    #[test]
    fn early_exit_matches_full_run_at_destination() {
        let (graph, [a, _, _, d]) = simple_graph();
        let full = dijkstra(&graph, a);
        let early = dijkstra_to(&graph, a, d);

        assert_eq!(early.entry(d), full.entry(d));
        assert!(early.len() <= full.len());
    }

    #[test]
    fn early_exit_at_source_closes_only_source() {
        let (graph, [a, _, _, _]) = simple_graph();
        let paths = dijkstra_to(&graph, a, a);

        assert_eq!(paths.len(), 1);
        assert_eq!(paths.distance(a), Some(0.0));
        assert_eq!(paths.path_to(a), Some(vec![a]));
    }

    #[test]
    fn list_queue_produces_identical_result() {
        let (graph, [a, _, _, _]) = simple_graph();
        assert_eq!(dijkstra_list(&graph, a), dijkstra(&graph, a));
    }

    #[test]
    fn lazy_variant_converges_to_same_result() {
        let (graph, [a, _, _, _]) = simple_graph();
        assert_eq!(dijkstra_lazy(&graph, a), dijkstra(&graph, a));
    }

    #[test]
    fn caller_supplied_queue_runs_the_engine() {
        let (graph, [a, _, _, d]) = simple_graph();
        let paths = dijkstra_with(&graph, a, Some(d), ListApq::new());

        assert_eq!(paths.distance(d), Some(4.0));
    }

    #[test]
    fn unreachable_vertex_has_no_entry() {
        let (mut graph, [a, _, _, _]) = simple_graph();
        let isolated = graph.add_vertex('z');
        let paths = dijkstra(&graph, a);

        assert_eq!(paths.entry(isolated), None);
        assert_eq!(paths.distance(isolated), None);
        assert_eq!(paths.path_to(isolated), None);
    }

    #[test]
    fn unknown_source_yields_empty_result() {
        let (graph, _) = simple_graph();

        let mut bigger: Graph<char> = Graph::new();
        for label in "vwxyz".chars() {
            bigger.add_vertex(label);
        }
        let stranger = bigger.add_vertex('!');

        let paths = dijkstra(&graph, stranger);
        assert!(paths.is_empty());
    }

    #[test]
    fn unit_grid_corner_to_corner() {
        let mut graph = Graph::new();
        let v00 = graph.add_vertex((0u8, 0u8));
        let v01 = graph.add_vertex((0, 1));
        let v10 = graph.add_vertex((1, 0));
        let v11 = graph.add_vertex((1, 1));
        graph.add_edge(v00, v01, 1.0, ());
        graph.add_edge(v00, v10, 1.0, ());
        graph.add_edge(v01, v11, 1.0, ());
        graph.add_edge(v10, v11, 1.0, ());

        let paths = dijkstra_to(&graph, v00, v11);
        assert_eq!(paths.distance(v11), Some(2.0));
        assert_eq!(paths.path_to(v11).unwrap().len(), 3);
    }

    #[test]
    fn zero_weight_edges_are_traversed() {
        let mut graph: Graph<u32> = Graph::new();
        let a = graph.add_vertex(0);
        let b = graph.add_vertex(1);
        let c = graph.add_vertex(2);
        graph.add_edge(a, b, 0.0, ());
        graph.add_edge(b, c, 0.0, ());

        let paths = dijkstra(&graph, a);
        assert_eq!(paths.distance(c), Some(0.0));
        assert_eq!(paths.path_to(c), Some(vec![a, b, c]));
    }

    #[test]
    fn negative_weights_do_not_panic() {
        // Correctness is not defended for negative weights; the run must
        // still terminate without a fault.
        let mut graph: Graph<u32> = Graph::new();
        let a = graph.add_vertex(0);
        let b = graph.add_vertex(1);
        let c = graph.add_vertex(2);
        graph.add_edge(a, b, -1.0, ());
        graph.add_edge(b, c, 2.0, ());

        let _ = dijkstra(&graph, a);
    }

    #[test]
    fn cost_orders_by_value() {
        assert!(Cost(1.5) < Cost(2.0));
        assert_eq!(Cost(3.0).cmp(&Cost(3.0)), Ordering::Equal);
    }
}
