use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{PlotError, PlotResult};

/// Benchmark function a sample belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionTag {
    Hill,
    Shekel,
}

impl FunctionTag {
    pub fn name(&self) -> &'static str {
        match self {
            FunctionTag::Hill => "Hill",
            FunctionTag::Shekel => "Shekel",
        }
    }

    /// Even rows belong to Hill, odd rows to Shekel
    fn for_row(index: usize) -> Self {
        if index % 2 == 0 {
            FunctionTag::Hill
        } else {
            FunctionTag::Shekel
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub problem_id: i64,
    pub iterations: f64,
    pub function: FunctionTag,
}

/// Both per-function series of the data file, paired by problem
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SampleTable {
    pub hill: Vec<Sample>,
    pub shekel: Vec<Sample>,
}

impl SampleTable {
    pub fn series(&self, function: FunctionTag) -> &[Sample] {
        match function {
            FunctionTag::Hill => &self.hill,
            FunctionTag::Shekel => &self.shekel,
        }
    }

    /// Iteration counts of one function, in file order
    pub fn iterations(&self, function: FunctionTag) -> Vec<f64> {
        self.series(function).iter().map(|s| s.iterations).collect()
    }

    pub fn num_problems(&self) -> usize {
        self.hill.len()
    }
}

/// Exit counters and run parameters written by the experiment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStats {
    pub hill_exit_main: i64,
    pub shekel_exit_main: i64,
    pub hill_exit_test: i64,
    pub shekel_exit_test: i64,
    pub epsilon: f64,
    pub r: f64,
    pub num_tests: f64,
}

impl RunStats {
    /// (main, test) exit counters of one function
    pub fn exit_counts(&self, function: FunctionTag) -> (i64, i64) {
        match function {
            FunctionTag::Hill => (self.hill_exit_main, self.hill_exit_test),
            FunctionTag::Shekel => (self.shekel_exit_main, self.shekel_exit_test),
        }
    }

    pub fn print_summary(&self) {
        println!("Loop exit information:");
        println!("  Hill (main condition): {}", self.hill_exit_main);
        println!("  Hill (test condition): {}", self.hill_exit_test);
        println!("  Shekel (main condition): {}", self.shekel_exit_main);
        println!("  Shekel (test condition): {}", self.shekel_exit_test);
        println!("\nParameters:");
        println!("  Epsilon: {}", self.epsilon);
        println!("  r: {}", self.r);
        println!("  Number of tests: {}", self.num_tests as i64);
    }
}

fn open(path: &Path) -> PlotResult<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| PlotError::FileRead { path: path.to_path_buf(), source })
}

/// Load the interleaved Hill/Shekel sample table
pub fn load_samples(path: &Path) -> PlotResult<SampleTable> {
    let reader = open(path)?;
    let table = parse_samples(reader, &path.display().to_string())?;
    tracing::info!(
        path = %path.display(),
        problems = table.num_problems(),
        "loaded sample table"
    );
    Ok(table)
}

/// Parse whitespace-separated numeric rows. Blank lines and `#` comments are
/// skipped; every row must have the same number of columns.
pub fn parse_samples<R: BufRead>(reader: R, origin: &str) -> PlotResult<SampleTable> {
    let mut table = SampleTable::default();
    let mut columns: Option<usize> = None;
    let mut rows = 0usize;
    let mut last_row_line = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|source| PlotError::FileRead { path: origin.into(), source })?;
        let content = line.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let values = content
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|_| {
                    PlotError::format(origin, line_no, format!("non-numeric token '{}'", token))
                })
            })
            .collect::<PlotResult<Vec<f64>>>()?;

        match columns {
            None if values.len() < 2 => {
                return Err(PlotError::format(
                    origin,
                    line_no,
                    format!("expected at least 2 columns, found {}", values.len()),
                ));
            }
            None => columns = Some(values.len()),
            Some(expected) if expected != values.len() => {
                return Err(PlotError::format(
                    origin,
                    line_no,
                    format!("expected {} columns, found {}", expected, values.len()),
                ));
            }
            Some(_) => {}
        }

        if !values[1].is_finite() {
            return Err(PlotError::format(
                origin,
                line_no,
                format!("iteration count must be finite, found {}", values[1]),
            ));
        }

        let function = FunctionTag::for_row(rows);
        let sample = Sample {
            problem_id: values[0] as i64,
            iterations: values[1],
            function,
        };
        match function {
            FunctionTag::Hill => table.hill.push(sample),
            FunctionTag::Shekel => table.shekel.push(sample),
        }
        rows += 1;
        last_row_line = line_no;
    }

    if rows % 2 != 0 {
        return Err(PlotError::format(
            origin,
            last_row_line,
            format!("{} data rows, expected an even count of paired Hill/Shekel rows", rows),
        ));
    }

    Ok(table)
}

/// Load the exit counters and run parameters
pub fn load_stats(path: &Path) -> PlotResult<RunStats> {
    let reader = open(path)?;
    let stats = parse_stats(reader, &path.display().to_string())?;
    tracing::info!(path = %path.display(), "loaded run stats");
    Ok(stats)
}

/// Line 1: four integer exit counters. Line 2: epsilon, r, number of tests.
pub fn parse_stats<R: BufRead>(reader: R, origin: &str) -> PlotResult<RunStats> {
    let mut lines = reader.lines();
    let mut next_line = |line_no: usize| -> PlotResult<String> {
        match lines.next() {
            Some(line) => line.map_err(|source| PlotError::FileRead { path: origin.into(), source }),
            None => Err(PlotError::format(origin, line_no, "unexpected end of file")),
        }
    };

    let counters: Vec<i64> = parse_tokens(&next_line(1)?, origin, 1, 4)?;
    let params: Vec<f64> = parse_tokens(&next_line(2)?, origin, 2, 3)?;

    Ok(RunStats {
        hill_exit_main: counters[0],
        shekel_exit_main: counters[1],
        hill_exit_test: counters[2],
        shekel_exit_test: counters[3],
        epsilon: params[0],
        r: params[1],
        num_tests: params[2],
    })
}

fn parse_tokens<T: std::str::FromStr>(
    line: &str,
    origin: &str,
    line_no: usize,
    expected: usize,
) -> PlotResult<Vec<T>> {
    let values = line
        .split_whitespace()
        .map(|token| {
            token.parse::<T>().map_err(|_| {
                PlotError::format(origin, line_no, format!("cannot parse '{}'", token))
            })
        })
        .collect::<PlotResult<Vec<T>>>()?;

    if values.len() != expected {
        return Err(PlotError::format(
            origin,
            line_no,
            format!("expected {} values, found {}", expected, values.len()),
        ));
    }
    Ok(values)
}
