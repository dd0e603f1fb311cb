use clap::Parser;
use log::info;
use wardrop::gml;
use wardrop::routing::{self, graph::node_by_label, utils, EdgeFlow, RoutingError};

///
/// Social optimum and Nash equilibrium of a congestion routing game.
///
/// Loads a GML road network whose edges carry the coefficients of an affine
/// cost function a*x + b, routes N drivers from INITIAL to FINAL, and prints
/// both allocations and the price of anarchy.
///
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Opts {
    /// GML file with per-edge cost coefficients `a` and `b`
    file: std::path::PathBuf,
    /// number of drivers to route
    n: u32,
    /// label of the origin node
    initial: String,
    /// label of the destination node
    r#final: String,
    /// also print Graphviz dot renderings with per-edge driver counts
    /// (social optimum first, equilibrium second)
    #[clap(long)]
    dot: bool,
}

fn main() {
    env_logger::init();
    let opts: Opts = Opts::parse();
    if let Err(e) = run(&opts) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(opts: &Opts) -> Result<(), RoutingError> {
    let graph = gml::load(&opts.file)?;
    info!(
        "loaded {} ({} nodes, {} edges)",
        opts.file.display(),
        graph.node_count(),
        graph.edge_count()
    );
    let source = node_by_label(&graph, &opts.initial)
        .ok_or_else(|| RoutingError::InvalidGraph(format!("unknown node {}", opts.initial)))?;
    let target = node_by_label(&graph, &opts.r#final)
        .ok_or_else(|| RoutingError::InvalidGraph(format!("unknown node {}", opts.r#final)))?;

    let analysis = routing::analyze(&graph, source, target, opts.n)?;

    println!("paths:");
    for (i, path) in analysis.paths.iter().enumerate() {
        println!("  [{}] {}", i, path.show(&graph));
    }

    println!("social optimum:");
    for (i, (&count, &x)) in analysis
        .social
        .counts
        .iter()
        .zip(analysis.social.fractional.iter())
        .enumerate()
    {
        println!("  [{}] {} drivers (continuous {:.4})", i, count, x);
    }
    println!("  total cost: {}", analysis.social.total_cost);

    println!("nash equilibrium ({} rounds):", analysis.equilibrium.rounds);
    for (i, &count) in analysis.equilibrium.counts.iter().enumerate() {
        println!("  [{}] {} drivers", i, count);
    }
    for (d, &cost) in analysis.equilibrium.driver_costs.iter().enumerate() {
        println!("  driver {} pays {}", d, cost);
    }
    println!("  total cost: {}", analysis.equilibrium.total_cost);

    println!("price of anarchy: {:.4}", analysis.price_of_anarchy);

    if opts.dot {
        let social = EdgeFlow::from_path_counts(&graph, &analysis.paths, &analysis.social.counts);
        let nash =
            EdgeFlow::from_path_counts(&graph, &analysis.paths, &analysis.equilibrium.counts);
        println!("{}", utils::draw(&graph));
        println!("{}", utils::draw_with_flow(&graph, &social));
        println!("{}", utils::draw_with_flow(&graph, &nash));
    }
    Ok(())
}
