use std::f64::consts::PI;

use ndarray::Array1;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::SeedableRng;

const HILL_TERMS: usize = 14;
const SHEKEL_TERMS: usize = 10;

/// Grid resolution for the initial optimum scan
const OPTIMUM_GRID: usize = 10_000;
const GOLDEN_ITERATIONS: usize = 60;

/// One-dimensional test problem with a known global minimizer
pub trait TestProblem: Sync {
    fn bounds(&self) -> (f64, f64);
    fn evaluate(&self, x: f64) -> f64;
    fn optimum_point(&self) -> f64;

    fn optimum_value(&self) -> f64 {
        self.evaluate(self.optimum_point())
    }
}

/// Trigonometric polynomial on [0, 1]
#[derive(Debug, Clone)]
pub struct HillProblem {
    a0: f64,
    sin_coeffs: Array1<f64>,
    cos_coeffs: Array1<f64>,
    optimum: f64,
}

impl HillProblem {
    pub fn generate(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let coeff = Uniform::new_inclusive(-1.0, 1.0);
        let a0 = Array1::random_using(1, coeff, &mut rng)[0];
        let sin_coeffs = Array1::random_using(HILL_TERMS, coeff, &mut rng);
        let cos_coeffs = Array1::random_using(HILL_TERMS, coeff, &mut rng);

        let mut problem = Self { a0, sin_coeffs, cos_coeffs, optimum: 0.0 };
        problem.optimum = locate_minimum(&problem);
        problem
    }
}

impl TestProblem for HillProblem {
    fn bounds(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    fn evaluate(&self, x: f64) -> f64 {
        let mut value = self.a0;
        for i in 0..HILL_TERMS {
            let angle = 2.0 * PI * (i + 1) as f64 * x;
            value += self.sin_coeffs[i] * angle.sin() + self.cos_coeffs[i] * angle.cos();
        }
        value
    }

    fn optimum_point(&self) -> f64 {
        self.optimum
    }
}

/// Sum of inverted wells on [0, 10]
#[derive(Debug, Clone)]
pub struct ShekelProblem {
    steepness: Array1<f64>,
    centers: Array1<f64>,
    depths: Array1<f64>,
    optimum: f64,
}

impl ShekelProblem {
    pub fn generate(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let steepness = Array1::random_using(SHEKEL_TERMS, Uniform::new_inclusive(1.0, 3.0), &mut rng);
        let centers = Array1::random_using(SHEKEL_TERMS, Uniform::new_inclusive(0.0, 10.0), &mut rng);
        let depths = Array1::random_using(SHEKEL_TERMS, Uniform::new_inclusive(0.1, 0.3), &mut rng);

        let mut problem = Self { steepness, centers, depths, optimum: 0.0 };
        problem.optimum = locate_minimum(&problem);
        problem
    }
}

impl TestProblem for ShekelProblem {
    fn bounds(&self) -> (f64, f64) {
        (0.0, 10.0)
    }

    fn evaluate(&self, x: f64) -> f64 {
        let mut value = 0.0;
        for i in 0..SHEKEL_TERMS {
            let d = x - self.centers[i];
            value -= 1.0 / (self.steepness[i] * d * d + self.depths[i]);
        }
        value
    }

    fn optimum_point(&self) -> f64 {
        self.optimum
    }
}

/// Dense grid scan, then golden-section refinement around the best grid cell
fn locate_minimum<P: TestProblem + ?Sized>(problem: &P) -> f64 {
    let (lo, hi) = problem.bounds();
    let step = (hi - lo) / OPTIMUM_GRID as f64;

    let mut best_x = lo;
    let mut best_y = problem.evaluate(lo);
    for i in 1..=OPTIMUM_GRID {
        let x = lo + step * i as f64;
        let y = problem.evaluate(x);
        if y < best_y {
            best_x = x;
            best_y = y;
        }
    }

    let refined = golden_section(problem, (best_x - step).max(lo), (best_x + step).min(hi));
    if problem.evaluate(refined) < best_y {
        refined
    } else {
        best_x
    }
}

fn golden_section<P: TestProblem + ?Sized>(problem: &P, mut a: f64, mut b: f64) -> f64 {
    let inv_phi = (5.0_f64.sqrt() - 1.0) / 2.0;
    let mut c = b - inv_phi * (b - a);
    let mut d = a + inv_phi * (b - a);
    let mut fc = problem.evaluate(c);
    let mut fd = problem.evaluate(d);

    for _ in 0..GOLDEN_ITERATIONS {
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - inv_phi * (b - a);
            fc = problem.evaluate(c);
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + inv_phi * (b - a);
            fd = problem.evaluate(d);
        }
    }
    0.5 * (a + b)
}
