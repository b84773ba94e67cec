use log::{error, info};
use rand::Rng;
use simple_logger::SimpleLogger;

use qw_rust::{ExperimentConfig, ExperimentRunner};

fn main() {
    SimpleLogger::new().init().unwrap();

    info!("starting");

    let mut seed = [0u8; 32];
    rand::thread_rng().fill(&mut seed);

    // 10-node scale-free network, t = 1.0, 1024 shots, top 3
    let config = ExperimentConfig {
        seed: Some(seed),
        ..Default::default()
    };

    let result = ExperimentRunner::new(config).and_then(|runner| runner.run());
    match result {
        Ok(result) => {
            result.print_summary();
            info!("let seed = {:?};", seed);
        }
        Err(e) => {
            error!("run failed: {}", e);
            std::process::exit(1);
        }
    }
}
