use qw_rust::qw_walk::WalkOperator;
use qw_rust::{
    identify_influential_nodes, CountsProvider, LinearThresholdModel, QuantumWalkSampler,
    SocialGraph,
};
use std::time::Instant;

/// Time walk sampling and threshold spread on growing scale-free graphs
fn main() {
    std::env::set_var("RUST_LOG", "error");
    let _ = simple_logger::init_with_env();

    println!("\n=== Quantum Walk Influence Scaling Benchmark ===\n");

    let sizes = vec![10, 25, 50, 100, 200, 400];
    let shots = 4096;
    let top_k = 5;

    println!(
        "{:<8} {:>8} {:>14} {:>14} {:>14} {:>10}",
        "Nodes", "Edges", "Eigen (ms)", "Sample (ms)", "Spread (ms)", "Active"
    );
    println!("{}", "-".repeat(74));

    for n in sizes {
        let graph = match SocialGraph::barabasi_albert(n, 2, 42) {
            Ok(graph) => graph,
            Err(e) => {
                eprintln!("skipping n={}: {}", n, e);
                continue;
            }
        };

        let start = Instant::now();
        let _ = WalkOperator::new(&graph).node_probabilities(1.0);
        let eigen_ms = start.elapsed().as_secs_f64() * 1000.0;

        let start = Instant::now();
        let mut sampler = QuantumWalkSampler::new(1.0, shots, Some([42u8; 32]));
        let counts = match sampler.sample_counts(&graph) {
            Ok(counts) => counts,
            Err(e) => {
                eprintln!("sampling failed for n={}: {}", n, e);
                continue;
            }
        };
        let sample_ms = start.elapsed().as_secs_f64() * 1000.0;

        let seeds = match identify_influential_nodes(&counts, n, top_k) {
            Ok(ranking) => ranking.nodes(),
            Err(e) => {
                eprintln!("ranking failed for n={}: {}", n, e);
                continue;
            }
        };

        let start = Instant::now();
        let active = LinearThresholdModel::new(&graph, n)
            .run(&seeds)
            .map(|r| r.active_count())
            .unwrap_or(0);
        let spread_ms = start.elapsed().as_secs_f64() * 1000.0;

        println!(
            "{:<8} {:>8} {:>14.3} {:>14.3} {:>14.3} {:>10}",
            n,
            graph.num_edges(),
            eigen_ms,
            sample_ms,
            spread_ms,
            active
        );
    }

    println!();
}
