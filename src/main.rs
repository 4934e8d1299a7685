use std::error::Error;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod config;
mod curve;
mod data;
mod error;
mod experiment;
mod problems;
mod render;
mod strongin;

use config::{ExperimentConfig, PlotConfig};
use data::FunctionTag;
use render::PanelSummary;

/// Read the experiment output, print the run summary and render the convergence figure
fn plot_convergence(config: &PlotConfig) -> Result<(), Box<dyn Error>> {
    println!("Generating convergence plot...");

    let table = data::load_samples(&config.data_path)?;
    let stats = data::load_stats(&config.stats_path)?;
    stats.print_summary();

    let panels = [
        PanelSummary::build(&table, &stats, FunctionTag::Hill, config.interpolation_points)?,
        PanelSummary::build(&table, &stats, FunctionTag::Shekel, config.interpolation_points)?,
    ];

    render::render(&panels, &stats, config)?;

    println!("Convergence plot saved as '{}'", config.output_path.display());

    Ok(())
}

fn init_tracing() -> Result<(), Box<dyn Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn run() -> Result<(), Box<dyn Error>> {
    init_tracing()?;

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("plot") => {
            plot_convergence(&PlotConfig::default())?;
        },
        Some("experiment") => {
            // Run the Strongin experiment, then plot what it wrote
            let config = ExperimentConfig::from_args(&args[2..])?;
            experiment::run_experiment(&config)?;
            plot_convergence(&PlotConfig::default())?;
        },
        Some(other) => {
            println!("Unknown command: {}. Available commands:", other);
            println!("  plot                                    - Plot plot_data.txt and stats.txt (default)");
            println!("  experiment <epsilon> <r> <tests> [seed] - Run the Strongin experiment, then plot");
        }
    }

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
