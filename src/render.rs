use std::error::Error;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::PlotConfig;
use crate::curve::{build_curve, interpolate, mean_iterations, InterpolatedCurve, SolvedFractionCurve};
use crate::data::{FunctionTag, RunStats, SampleTable};
use crate::error::{PlotError, PlotResult};

/// Everything one chart panel shows for a benchmark function
#[derive(Debug, Clone)]
pub struct PanelSummary {
    pub function: FunctionTag,
    pub curve: SolvedFractionCurve,
    pub interpolated: InterpolatedCurve,
    pub mean_iterations: f64,
    pub exit_main: i64,
    pub exit_test: i64,
}

impl PanelSummary {
    pub fn build(
        table: &SampleTable,
        stats: &RunStats,
        function: FunctionTag,
        interpolation_points: usize,
    ) -> PlotResult<Self> {
        let iterations = table.iterations(function);
        let curve = build_curve(&iterations)?;
        let interpolated = interpolate(&curve, interpolation_points)?;
        let mean_iterations = mean_iterations(&iterations).ok_or_else(|| {
            PlotError::InvalidInput(format!("no {} samples", function.name()))
        })?;
        let (exit_main, exit_test) = stats.exit_counts(function);

        tracing::debug!(
            function = function.name(),
            samples = curve.len(),
            mean_iterations,
            "panel prepared"
        );

        Ok(Self {
            function,
            curve,
            interpolated,
            mean_iterations,
            exit_main,
            exit_test,
        })
    }

    pub fn annotation(&self) -> [String; 2] {
        [
            format!("Mean iterations: {:.2}", self.mean_iterations),
            format!("Main condition: {}, Test condition: {}", self.exit_main, self.exit_test),
        ]
    }
}

/// Render the Hill and Shekel panels side by side into `config.output_path`
pub fn render(panels: &[PanelSummary; 2], stats: &RunStats, config: &PlotConfig) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = config.output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let root = BitMapBackend::new(&config.output_path, config.figure_size).into_drawing_area();
    root.fill(&WHITE)?;

    let root = root.titled(
        &format!("Parameters: r = {}, epsilon = {}", stats.r, stats.epsilon),
        ("sans-serif", 26).into_font(),
    )?;

    let areas = root.split_evenly((1, 2));
    for (area, panel) in areas.iter().zip(panels) {
        draw_panel(area, panel)?;
    }

    root.present()?;
    tracing::info!(path = %config.output_path.display(), "figure written");

    Ok(())
}

fn draw_panel(area: &DrawingArea<BitMapBackend<'_>, Shift>, panel: &PanelSummary) -> Result<(), Box<dyn Error>> {
    let points = panel.curve.points();
    let x_min = panel.curve.min_iterations().unwrap_or(0.0);
    let x_max = panel.curve.max_iterations().unwrap_or(1.0);

    let mut chart = ChartBuilder::on(area)
        .caption(format!("{} function", panel.function.name()), ("sans-serif", 22).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..105.0)?;

    chart.configure_mesh()
         .x_desc("Iteration count")
         .y_desc("Percent solved")
         .axis_desc_style(("sans-serif", 18))
         .label_style(("sans-serif", 16))
         .x_labels(6)
         .y_labels(6)
         .draw()?;

    chart.draw_series(LineSeries::new(
        points.iter().map(|p| (p.iterations, p.solved_percent)),
        &BLUE,
    ))?
    .label("Observed")
    .legend(|(x, y)| Circle::new((x + 10, y), 3, BLUE.filled()));

    chart.draw_series(
        points.iter().map(|p| Circle::new((p.iterations, p.solved_percent), 3, BLUE.filled())),
    )?;

    chart.draw_series(LineSeries::new(panel.interpolated.iter(), RED.stroke_width(2)))?
    .label("Interpolation")
    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    // Upper left, where the curve is still low
    let text_x = x_min + 0.03 * (x_max - x_min);
    for (i, line) in panel.annotation().into_iter().enumerate() {
        chart.draw_series(std::iter::once(Text::new(
            line,
            (text_x, 102.0 - 6.0 * i as f64),
            ("sans-serif", 16).into_font(),
        )))?;
    }

    chart.configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .label_font(("sans-serif", 16))
        .position(SeriesLabelPosition::LowerRight)
        .draw()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_samples;

    fn stats() -> RunStats {
        RunStats {
            hill_exit_main: 2,
            shekel_exit_main: 3,
            hill_exit_test: 1,
            shekel_exit_test: 4,
            epsilon: 0.01,
            r: 3.0,
            num_tests: 3.0,
        }
    }

    #[test]
    fn panel_collects_curve_and_counters() {
        let table = parse_samples("1 3\n1 40\n2 1\n2 10\n3 2\n3 25\n".as_bytes(), "plot_data.txt").unwrap();
        let panel = PanelSummary::build(&table, &stats(), FunctionTag::Shekel, 50).unwrap();

        assert_eq!(panel.curve.len(), 3);
        assert_eq!(panel.curve.min_iterations(), Some(10.0));
        assert_eq!(panel.interpolated.x.len(), 50);
        assert_eq!(panel.mean_iterations, 25.0);
        assert_eq!((panel.exit_main, panel.exit_test), (3, 4));
        assert_eq!(
            panel.annotation(),
            ["Mean iterations: 25.00".to_string(), "Main condition: 3, Test condition: 4".to_string()]
        );
    }

    #[test]
    fn figure_is_written_into_missing_directory() {
        let table = parse_samples("1 3\n1 40\n2 1\n2 10\n3 2\n3 25\n".as_bytes(), "plot_data.txt").unwrap();
        let stats = stats();
        let panels = [
            PanelSummary::build(&table, &stats, FunctionTag::Hill, 50).unwrap(),
            PanelSummary::build(&table, &stats, FunctionTag::Shekel, 50).unwrap(),
        ];

        let dir = tempfile::tempdir().unwrap();
        let config = PlotConfig {
            output_path: dir.path().join("figures").join("convergence.png"),
            figure_size: (600, 300),
            ..PlotConfig::default()
        };

        render(&panels, &stats, &config).unwrap();

        let written = std::fs::metadata(&config.output_path).unwrap();
        assert!(written.is_file());
        assert!(written.len() > 0);
    }

    #[test]
    fn equal_counts_abort_before_rendering() {
        let table = parse_samples("1 5\n1 7\n2 5\n2 9\n".as_bytes(), "plot_data.txt").unwrap();
        let err = PanelSummary::build(&table, &stats(), FunctionTag::Hill, 500).unwrap_err();
        assert!(matches!(err, PlotError::DegenerateInput(_)));
    }

    #[test]
    fn empty_table_is_invalid_input() {
        let table = SampleTable::default();
        let err = PanelSummary::build(&table, &stats(), FunctionTag::Hill, 500).unwrap_err();
        assert!(matches!(err, PlotError::InvalidInput(_)));
    }
}
