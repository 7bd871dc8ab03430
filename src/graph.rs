#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of a vertex inside its owning [`Graph`].
///
/// Identity (equality, hashing) is what adjacency is keyed on; vertex
/// labels are only consulted on demand for lookups and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexId(usize);

impl VertexId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An undirected weighted edge with an optional payload.
///
/// A single edge instance is referenced from both endpoints' adjacency
/// maps, so weight and payload are observed identically from either side.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Edge<E = ()> {
    endpoints: (VertexId, VertexId),
    weight: f64,
    label: E,
}

impl<E> Edge<E> {
    /// The endpoints in insertion order.
    pub fn endpoints(&self) -> (VertexId, VertexId) {
        self.endpoints
    }

    pub fn start(&self) -> VertexId {
        self.endpoints.0
    }

    pub fn end(&self) -> VertexId {
        self.endpoints.1
    }

    /// The endpoint opposite `v`, or `None` if the edge is not incident
    /// on `v`.
    pub fn opposite(&self, v: VertexId) -> Option<VertexId> {
        if self.endpoints.0 == v {
            Some(self.endpoints.1)
        } else if self.endpoints.1 == v {
            Some(self.endpoints.0)
        } else {
            None
        }
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn label(&self) -> &E {
        &self.label
    }
}

/// A simple undirected weighted graph.
///
/// Vertices carry opaque labels of type `V` and are addressed through
/// [`VertexId`] handles issued at insertion; edges can carry a payload of
/// type `E`. At most one edge exists per vertex pair and self edges are
/// assumed absent. Vertices and edges live for the lifetime of the graph;
/// there is no removal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Graph<V, E = ()> {
    labels: Vec<V>,
    adjacency: Vec<HashMap<VertexId, usize>>,
    edges: Vec<Edge<E>>,
}

impl<V, E> Graph<V, E> {
    pub fn new() -> Self {
        Graph {
            labels: Vec::new(),
            adjacency: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.labels.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_vertex(&self, v: VertexId) -> bool {
        v.0 < self.labels.len()
    }

    /// Add a new vertex with `label` and return its identifier.
    ///
    /// Always creates a fresh vertex, even when an equal label is already
    /// present; deduplication is the caller's job (or use
    /// [`Graph::add_vertex_if_new`]).
    pub fn add_vertex(&mut self, label: V) -> VertexId {
        self.labels.push(label);
        self.adjacency.push(HashMap::new());
        VertexId(self.labels.len() - 1)
    }

    /// Return the vertex carrying an equal label, creating it if absent.
    ///
    /// Scans all existing labels, so repeated use on large graphs is
    /// slow.
    pub fn add_vertex_if_new(&mut self, label: V) -> VertexId
    where
        V: PartialEq,
    {
        for (index, existing) in self.labels.iter().enumerate() {
            if *existing == label {
                return VertexId(index);
            }
        }
        self.add_vertex(label)
    }

    pub fn label(&self, v: VertexId) -> Option<&V> {
        self.labels.get(v.0)
    }

    /// First vertex whose label equals `label`, if any.
    ///
    /// Linear search over every vertex; unsuitable for repeated lookups
    /// on large graphs. Callers needing fast resolution should keep
    /// their own label map.
    pub fn get_vertex_by_label(&self, label: &V) -> Option<VertexId>
    where
        V: PartialEq,
    {
        self.labels.iter().position(|l| l == label).map(VertexId)
    }

    /// Add an edge between `v` and `w`, or replace the existing one.
    ///
    /// Returns `None` without modifying the graph when either endpoint is
    /// not a vertex of this graph. The edge is installed in both
    /// endpoints' adjacency maps as one shared instance.
    pub fn add_edge(&mut self, v: VertexId, w: VertexId, weight: f64, label: E) -> Option<&Edge<E>> {
        if !self.contains_vertex(v) || !self.contains_vertex(w) {
            return None;
        }
        let edge = Edge {
            endpoints: (v, w),
            weight,
            label,
        };
        let index = match self.adjacency[v.0].get(&w) {
            Some(&existing) => {
                self.edges[existing] = edge;
                existing
            }
            None => {
                self.edges.push(edge);
                let index = self.edges.len() - 1;
                self.adjacency[v.0].insert(w, index);
                self.adjacency[w.0].insert(v, index);
                index
            }
        };
        Some(&self.edges[index])
    }

    /// Add every `(v, w, weight)` triple as an edge with a default
    /// payload.
    pub fn add_edge_pairs<I>(&mut self, triples: I)
    where
        I: IntoIterator<Item = (VertexId, VertexId, f64)>,
        E: Default,
    {
        for (v, w, weight) in triples {
            self.add_edge(v, w, weight, E::default());
        }
    }

    pub fn get_edge(&self, v: VertexId, w: VertexId) -> Option<&Edge<E>> {
        let index = *self.adjacency.get(v.0)?.get(&w)?;
        Some(&self.edges[index])
    }

    /// All edges incident on `v`. Empty for an unknown vertex.
    pub fn get_edges(&self, v: VertexId) -> impl Iterator<Item = &Edge<E>> + '_ {
        self.adjacency
            .get(v.0)
            .into_iter()
            .flat_map(|neighbors| neighbors.values())
            .map(move |&index| &self.edges[index])
    }

    pub fn degree(&self, v: VertexId) -> usize {
        self.adjacency.get(v.0).map_or(0, HashMap::len)
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> {
        (0..self.labels.len()).map(VertexId)
    }

    /// Every edge of the graph, each emitted exactly once.
    pub fn edges(&self) -> impl Iterator<Item = &Edge<E>> + '_ {
        self.edges.iter()
    }

    pub fn highest_degree_vertex(&self) -> Option<VertexId> {
        (0..self.labels.len())
            .map(VertexId)
            .max_by_key(|&v| self.degree(v))
    }
}

impl<V, E> Default for Graph<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Display, E> fmt::Display for Graph<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "|V| = {}; |E| = {}", self.num_vertices(), self.num_edges())
    }
}

#[cfg(feature = "petgraph")]
impl<V: Clone, E> Graph<V, E> {
    /// Convert into a petgraph undirected graph with the same labels and
    /// weights, for interoperating with petgraph's algorithms.
    pub fn to_petgraph(&self) -> petgraph::graph::UnGraph<V, f64> {
        let mut pg = petgraph::graph::UnGraph::new_undirected();
        let nodes: Vec<_> = self
            .labels
            .iter()
            .map(|label| pg.add_node(label.clone()))
            .collect();
        for edge in &self.edges {
            let (v, w) = edge.endpoints();
            pg.add_edge(nodes[v.index()], nodes[w.index()], edge.weight());
        }
        pg
    }
}
