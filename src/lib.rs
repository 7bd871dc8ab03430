//! Adaptable priority queues with live entry handles, a weighted
//! undirected graph, and Dijkstra shortest-path variants built on both.
pub mod apq;
pub mod dijkstra;
pub mod graph;

pub use apq::{AdaptablePriorityQueue, ApqError, EntryRef, HeapApq, ListApq};
pub use dijkstra::{
    dijkstra, dijkstra_lazy, dijkstra_list, dijkstra_to, dijkstra_with, Cost, PathEntry,
    ShortestPaths,
};
pub use graph::{Edge, Graph, VertexId};
