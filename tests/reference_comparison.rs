use apq_dijkstra::{dijkstra, dijkstra_lazy, dijkstra_list, dijkstra_to, Graph, VertexId};
use petgraph::algo::{bellman_ford, dijkstra as petgraph_dijkstra};
use petgraph::graph::{DiGraph, NodeIndex, UnGraph};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Connected random graph: a spanning tree first, then extra edges
/// between pairs that are not yet connected directly.
fn random_graph(n: usize, extra_edges: usize, seed: u64) -> (Graph<usize>, Vec<VertexId>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::new();
    let vertices: Vec<VertexId> = (0..n).map(|i| graph.add_vertex(i)).collect();

    for i in 1..n {
        let parent = rng.gen_range(0..i);
        let weight = rng.gen_range(1.0..10.0);
        graph.add_edge(vertices[parent], vertices[i], weight, ());
    }

    let mut added = 0;
    while added < extra_edges {
        let v = rng.gen_range(0..n);
        let w = rng.gen_range(0..n);
        if v != w && graph.get_edge(vertices[v], vertices[w]).is_none() {
            let weight = rng.gen_range(1.0..10.0);
            graph.add_edge(vertices[v], vertices[w], weight, ());
            added += 1;
        }
    }

    (graph, vertices)
}

fn undirected_mirror(graph: &Graph<usize>) -> (UnGraph<usize, f64>, Vec<NodeIndex>) {
    let mut pg = UnGraph::new_undirected();
    let nodes: Vec<NodeIndex> = (0..graph.num_vertices()).map(|i| pg.add_node(i)).collect();
    for edge in graph.edges() {
        let (v, w) = edge.endpoints();
        pg.add_edge(nodes[v.index()], nodes[w.index()], edge.weight());
    }
    (pg, nodes)
}

/// Both arcs per undirected edge, so the relaxation-based reference sees
/// the same reachability.
fn directed_mirror(graph: &Graph<usize>) -> (DiGraph<usize, f64>, Vec<NodeIndex>) {
    let mut pg = DiGraph::new();
    let nodes: Vec<NodeIndex> = (0..graph.num_vertices()).map(|i| pg.add_node(i)).collect();
    for edge in graph.edges() {
        let (v, w) = edge.endpoints();
        pg.add_edge(nodes[v.index()], nodes[w.index()], edge.weight());
        pg.add_edge(nodes[w.index()], nodes[v.index()], edge.weight());
    }
    (pg, nodes)
}

#[test]
fn distances_match_petgraph_dijkstra() {
    for seed in [1, 2, 3] {
        let (graph, vertices) = random_graph(60, 80, seed);
        let (pg, nodes) = undirected_mirror(&graph);

        let ours = dijkstra(&graph, vertices[0]);
        let reference = petgraph_dijkstra(&pg, nodes[0], None, |e| *e.weight());

        assert_eq!(ours.len(), reference.len());
        for (i, &v) in vertices.iter().enumerate() {
            let mine = ours.distance(v).unwrap();
            let theirs = reference[&nodes[i]];
            assert!(
                (mine - theirs).abs() < 1e-9,
                "seed {}, vertex {}: {} vs {}",
                seed,
                i,
                mine,
                theirs
            );
        }
    }
}

#[test]
fn distances_match_bellman_ford() {
    let (graph, vertices) = random_graph(40, 50, 7);
    let (pg, nodes) = directed_mirror(&graph);

    let ours = dijkstra(&graph, vertices[0]);
    let reference = bellman_ford(&pg, nodes[0]).unwrap();

    for (i, &v) in vertices.iter().enumerate() {
        let mine = ours.distance(v).unwrap();
        let theirs = reference.distances[nodes[i].index()];
        assert!(
            (mine - theirs).abs() < 1e-9,
            "vertex {}: {} vs {}",
            i,
            mine,
            theirs
        );
    }
}

#[test]
fn variants_agree_with_full_exploration() {
    for seed in [11, 12] {
        let (graph, vertices) = random_graph(50, 60, seed);
        let source = vertices[0];

        let full = dijkstra(&graph, source);
        assert_eq!(dijkstra_list(&graph, source), full);
        assert_eq!(dijkstra_lazy(&graph, source), full);

        for &destination in &vertices[..10] {
            let early = dijkstra_to(&graph, source, destination);
            assert_eq!(early.entry(destination), full.entry(destination));
            assert!(early.len() <= full.len());
        }
    }
}

#[test]
fn early_exit_reconstructs_the_same_path() {
    let (graph, vertices) = random_graph(30, 40, 21);
    let source = vertices[0];
    let destination = vertices[29];

    let full = dijkstra(&graph, source);
    let early = dijkstra_to(&graph, source, destination);

    assert_eq!(early.path_to(destination), full.path_to(destination));
}
