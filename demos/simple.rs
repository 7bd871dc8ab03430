fn main() {
    let mut graph = apq_dijkstra::Graph::new();

    let cork = graph.add_vertex("Cork");
    let limerick = graph.add_vertex("Limerick");
    let galway = graph.add_vertex("Galway");
    let dublin = graph.add_vertex("Dublin");
    let athlone = graph.add_vertex("Athlone");
    let waterford = graph.add_vertex("Waterford");

    graph.add_edge(cork, limerick, 98.0, ());
    graph.add_edge(cork, waterford, 121.0, ());
    graph.add_edge(limerick, galway, 105.0, ());
    graph.add_edge(limerick, athlone, 120.0, ());
    graph.add_edge(athlone, dublin, 124.0, ());
    graph.add_edge(athlone, galway, 93.0, ());
    graph.add_edge(waterford, dublin, 166.0, ());
    graph.add_edge(galway, dublin, 208.0, ());

    println!("{}", graph);

    let paths = apq_dijkstra::dijkstra_to(&graph, cork, dublin);

    match paths.path_to(dublin) {
        Some(route) => {
            let stops: Vec<&str> = route
                .iter()
                .filter_map(|&v| graph.label(v).copied())
                .collect();
            println!(
                "Cork to Dublin: {:.0} km via {}",
                paths.distance(dublin).unwrap_or(f64::INFINITY),
                stops.join(" -> ")
            );
        }
        None => println!("Dublin is not reachable from Cork"),
    }
}
