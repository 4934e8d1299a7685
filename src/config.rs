use std::path::PathBuf;

use crate::curve::DEFAULT_INTERPOLATION_POINTS;
use crate::error::{PlotError, PlotResult};

pub const DATA_FILE: &str = "plot_data.txt";
pub const STATS_FILE: &str = "stats.txt";
pub const FIGURE_FILE: &str = "figures/convergence.png";

/// Iteration budget of a single minimization
pub const MAX_ITERATIONS: usize = 1000;

/// Where the plotting pipeline reads from and renders to
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub data_path: PathBuf,
    pub stats_path: PathBuf,
    pub output_path: PathBuf,
    pub interpolation_points: usize,
    pub figure_size: (u32, u32),
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DATA_FILE),
            stats_path: PathBuf::from(STATS_FILE),
            output_path: PathBuf::from(FIGURE_FILE),
            interpolation_points: DEFAULT_INTERPOLATION_POINTS,
            figure_size: (1200, 600),
        }
    }
}

/// Parameters of one Strongin experiment run
#[derive(Debug, Clone)]
pub struct ExperimentConfig {
    pub epsilon: f64,
    pub r: f64,
    pub num_tests: usize,
    pub max_iterations: usize,
    pub seed: u64,
    pub data_path: PathBuf,
    pub stats_path: PathBuf,
}

impl ExperimentConfig {
    pub fn new(epsilon: f64, r: f64, num_tests: usize, seed: u64) -> PlotResult<Self> {
        if !(epsilon > 0.0) {
            return Err(PlotError::InvalidInput(format!("epsilon must be > 0, got {}", epsilon)));
        }
        if !(r > 1.0) {
            return Err(PlotError::InvalidInput(format!("r must be > 1, got {}", r)));
        }
        if num_tests == 0 {
            return Err(PlotError::InvalidInput("number of tests must be at least 1".to_string()));
        }

        Ok(Self {
            epsilon,
            r,
            num_tests,
            max_iterations: MAX_ITERATIONS,
            seed,
            data_path: PathBuf::from(DATA_FILE),
            stats_path: PathBuf::from(STATS_FILE),
        })
    }

    /// Parse `<epsilon> <r> <num_tests> [seed]`. Without a seed one is drawn at random.
    pub fn from_args(args: &[String]) -> PlotResult<Self> {
        if args.len() < 3 || args.len() > 4 {
            return Err(PlotError::InvalidInput(
                "usage: experiment <epsilon> <r> <num_tests> [seed]".to_string(),
            ));
        }

        let epsilon = parse_arg::<f64>(&args[0], "epsilon")?;
        let r = parse_arg::<f64>(&args[1], "r")?;
        let num_tests = parse_arg::<usize>(&args[2], "num_tests")?;
        let seed = match args.get(3) {
            Some(raw) => parse_arg::<u64>(raw, "seed")?,
            None => rand::random(),
        };

        Self::new(epsilon, r, num_tests, seed)
    }
}

fn parse_arg<T: std::str::FromStr>(raw: &str, name: &str) -> PlotResult<T> {
    raw.parse()
        .map_err(|_| PlotError::InvalidInput(format!("cannot parse {} from '{}'", name, raw)))
}
