use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::config::ExperimentConfig;
use crate::data::RunStats;
use crate::error::{PlotError, PlotResult};
use crate::problems::{HillProblem, ShekelProblem, TestProblem};
use crate::strongin::{ExitCondition, MinimizationResult, StronginMinimizer};

/// Outcome of one paired trial
#[derive(Debug, Clone, Copy)]
pub struct TrialOutcome {
    pub hill: MinimizationResult,
    pub shekel: MinimizationResult,
}

/// Run the paired Hill/Shekel experiment in parallel, keeping trial order
pub fn run_trials(config: &ExperimentConfig) -> Vec<TrialOutcome> {
    let progress_bar = ProgressBar::new(config.num_tests as u64);
    progress_bar.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );

    let outcomes: Vec<TrialOutcome> = (0..config.num_tests)
        .into_par_iter()
        .map(|trial| {
            // Distinct, reproducible problem per trial and family
            let base = config.seed.wrapping_add(2 * trial as u64);
            let hill = HillProblem::generate(base);
            let shekel = ShekelProblem::generate(base.wrapping_add(1));

            let outcome = TrialOutcome {
                hill: minimize(&hill, config),
                shekel: minimize(&shekel, config),
            };
            progress_bar.inc(1);
            outcome
        })
        .collect();

    progress_bar.finish_with_message("Strongin experiment completed!");
    outcomes
}

fn minimize<P: TestProblem>(problem: &P, config: &ExperimentConfig) -> MinimizationResult {
    let result = StronginMinimizer::new(problem, config.epsilon, config.r, config.max_iterations).minimize();
    tracing::debug!(
        optimum = problem.optimum_point(),
        optimum_value = problem.optimum_value(),
        found = result.best_point,
        found_value = result.best_value,
        iterations = result.iterations,
        exit = ?result.exit,
        "minimization finished"
    );
    result
}

fn count_exits(outcomes: &[TrialOutcome], exit: ExitCondition, pick: impl Fn(&TrialOutcome) -> ExitCondition) -> i64 {
    outcomes.iter().filter(|&o| pick(o) == exit).count() as i64
}

/// Fold trial outcomes into the exit counters written to the stats file
pub fn summarize(outcomes: &[TrialOutcome], config: &ExperimentConfig) -> RunStats {
    RunStats {
        hill_exit_main: count_exits(outcomes, ExitCondition::Main, |o| o.hill.exit),
        shekel_exit_main: count_exits(outcomes, ExitCondition::Main, |o| o.shekel.exit),
        hill_exit_test: count_exits(outcomes, ExitCondition::Test, |o| o.hill.exit),
        shekel_exit_test: count_exits(outcomes, ExitCondition::Test, |o| o.shekel.exit),
        epsilon: config.epsilon,
        r: config.r,
        num_tests: config.num_tests as f64,
    }
}

fn create(path: &Path) -> PlotResult<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| PlotError::FileWrite { path: path.to_path_buf(), source })
}

/// One `trial iterations` row per minimization, Hill before Shekel
pub fn write_data_file(path: &Path, outcomes: &[TrialOutcome]) -> PlotResult<()> {
    let write_err = |source| PlotError::FileWrite { path: path.to_path_buf(), source };
    let mut writer = create(path)?;
    for (i, outcome) in outcomes.iter().enumerate() {
        writeln!(writer, "{} {}", i + 1, outcome.hill.iterations).map_err(write_err)?;
        writeln!(writer, "{} {}", i + 1, outcome.shekel.iterations).map_err(write_err)?;
    }
    writer.flush().map_err(write_err)
}

pub fn write_stats_file(path: &Path, stats: &RunStats) -> PlotResult<()> {
    let write_err = |source| PlotError::FileWrite { path: path.to_path_buf(), source };
    let mut writer = create(path)?;
    writeln!(
        writer,
        "{} {} {} {}",
        stats.hill_exit_main, stats.shekel_exit_main, stats.hill_exit_test, stats.shekel_exit_test
    )
    .map_err(write_err)?;
    writeln!(writer, "{} {} {}", stats.epsilon, stats.r, stats.num_tests).map_err(write_err)?;
    writer.flush().map_err(write_err)
}

/// Run the experiment and write both files the plotting pipeline reads
pub fn run_experiment(config: &ExperimentConfig) -> PlotResult<RunStats> {
    println!(
        "Running Strongin experiment: epsilon = {}, r = {}, {} tests (seed {})",
        config.epsilon, config.r, config.num_tests, config.seed
    );

    let outcomes = run_trials(config);
    let stats = summarize(&outcomes, config);

    write_data_file(&config.data_path, &outcomes)?;
    write_stats_file(&config.stats_path, &stats)?;

    println!("Iteration counts saved to '{}'", config.data_path.display());
    println!("Exit statistics saved to '{}'", config.stats_path.display());

    Ok(stats)
}
