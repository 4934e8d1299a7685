use crate::problems::TestProblem;

/// Slopes over intervals narrower than this are ignored when estimating the Lipschitz constant
const MIN_INTERVAL: f64 = 1e-9;

/// Why a minimization stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCondition {
    /// The new trial landed within tolerance of its left neighbour
    Main,
    /// The new trial landed within tolerance of the known optimum
    Test,
    /// Iteration budget exhausted
    Budget,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimizationResult {
    pub best_point: f64,
    pub best_value: f64,
    pub iterations: usize,
    pub exit: ExitCondition,
}

#[derive(Debug, Clone, Copy)]
struct Trial {
    x: f64,
    z: f64,
}

/// Strongin's information-statistical global search on a 1-D interval
pub struct StronginMinimizer<'a, P: TestProblem + ?Sized> {
    problem: &'a P,
    epsilon: f64,
    r: f64,
    max_iterations: usize,
    trials: Vec<Trial>,
}

impl<'a, P: TestProblem + ?Sized> StronginMinimizer<'a, P> {
    pub fn new(problem: &'a P, epsilon: f64, r: f64, max_iterations: usize) -> Self {
        let (lo, hi) = problem.bounds();
        let trials = vec![
            Trial { x: lo, z: problem.evaluate(lo) },
            Trial { x: hi, z: problem.evaluate(hi) },
        ];

        Self {
            problem,
            epsilon,
            r,
            max_iterations,
            trials,
        }
    }

    pub fn minimize(&mut self) -> MinimizationResult {
        let (lo, hi) = self.problem.bounds();
        let tolerance = self.epsilon * (hi - lo).abs() / 2.0;
        let optimum = self.problem.optimum_point();

        let mut iteration = 0;
        let mut exit = ExitCondition::Budget;

        while iteration < self.max_iterations {
            let slope = self.max_slope();
            let m = if slope > 0.0 { self.r * slope } else { 1.0 };

            let best = self.best_interval(m);
            let (left, right) = (self.trials[best], self.trials[best + 1]);
            let x_new = (0.5 * (left.x + right.x) - (right.z - left.z) / (2.0 * m)).clamp(lo, hi);
            let z_new = self.problem.evaluate(x_new);
            self.trials.insert(best + 1, Trial { x: x_new, z: z_new });

            tracing::trace!(iteration = iteration + 1, x = x_new, z = z_new, "trial");

            if (x_new - left.x).abs() <= tolerance {
                exit = ExitCondition::Main;
                break;
            }
            if (x_new - optimum).abs() <= tolerance {
                exit = ExitCondition::Test;
                break;
            }

            iteration += 1;
        }

        let best_trial = self
            .trials
            .iter()
            .copied()
            .fold(self.trials[0], |best, t| if t.z < best.z { t } else { best });

        MinimizationResult {
            best_point: best_trial.x,
            best_value: best_trial.z,
            iterations: iteration,
            exit,
        }
    }

    fn max_slope(&self) -> f64 {
        self.trials
            .windows(2)
            .filter(|w| (w[1].x - w[0].x).abs() > MIN_INTERVAL)
            .map(|w| ((w[1].z - w[0].z) / (w[1].x - w[0].x)).abs())
            .fold(0.0, f64::max)
    }

    /// Index of the left end of the interval with the largest characteristic
    fn best_interval(&self, m: f64) -> usize {
        let mut best_index = 0;
        let mut best_value = f64::NEG_INFINITY;
        for (i, w) in self.trials.windows(2).enumerate() {
            let dx = w[1].x - w[0].x;
            let dz = w[1].z - w[0].z;
            let characteristic = m * dx + dz * dz / (m * dx) - 2.0 * (w[1].z + w[0].z);
            if characteristic > best_value {
                best_value = characteristic;
                best_index = i;
            }
        }
        best_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::{HillProblem, ShekelProblem};

    struct Parabola {
        center: f64,
    }

    impl TestProblem for Parabola {
        fn bounds(&self) -> (f64, f64) {
            (0.0, 1.0)
        }

        fn evaluate(&self, x: f64) -> f64 {
            (x - self.center).powi(2)
        }

        fn optimum_point(&self) -> f64 {
            self.center
        }
    }

    #[test]
    fn converges_on_parabola() {
        let problem = Parabola { center: 0.3 };
        let mut minimizer = StronginMinimizer::new(&problem, 1e-3, 3.0, 1000);
        let result = minimizer.minimize();

        assert_ne!(result.exit, ExitCondition::Budget);
        assert!((result.best_point - 0.3).abs() < 1e-2);
        assert_eq!(minimizer.trials.len(), result.iterations + 3);
    }

    #[test]
    fn trials_stay_sorted_inside_bounds() {
        let problem = ShekelProblem::generate(5);
        let mut minimizer = StronginMinimizer::new(&problem, 1e-4, 2.5, 300);
        minimizer.minimize();

        for w in minimizer.trials.windows(2) {
            assert!(w[0].x <= w[1].x);
        }
        assert_eq!(minimizer.trials.first().unwrap().x, 0.0);
        assert_eq!(minimizer.trials.last().unwrap().x, 10.0);
    }

    #[test]
    fn budget_exit_reports_full_budget() {
        let problem = HillProblem::generate(9);
        let mut minimizer = StronginMinimizer::new(&problem, 1e-12, 3.0, 5);
        let result = minimizer.minimize();

        assert_eq!(result.exit, ExitCondition::Budget);
        assert_eq!(result.iterations, 5);
        assert_eq!(minimizer.trials.len(), 7);
    }

    #[test]
    fn improves_on_interval_ends() {
        let problem = HillProblem::generate(21);
        let mut minimizer = StronginMinimizer::new(&problem, 1e-3, 3.0, 1000);
        let result = minimizer.minimize();

        assert!(result.best_value <= problem.evaluate(0.0));
        assert!(result.best_value <= problem.evaluate(1.0));
    }
}
