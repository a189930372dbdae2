use ndarray::{Array1, Array2};

use crate::calc;
use crate::config::axis;
use crate::error::GridError;
use crate::marginals::Marginals4d;

fn gaussian(axis: &Array1<f64>, center: f64, sigma: f64) -> Array1<f64> {
    axis.mapv(|v| (-0.5 * ((v - center) / sigma).powi(2)).exp())
}

fn outer(a: &Array1<f64>, b: &Array1<f64>) -> Array2<f64> {
    Array2::from_shape_fn((a.len(), b.len()), |(i, j)| a[i] * b[j])
}

/// Synthetic marginal record for the smoke run: separable Gaussian densities
/// over a small 4D coordinate box, each 1D marginal normalized to unit
/// integral and the 2D marginals built as outer products.
pub fn synthetic_marginals(
) -> Result<(Marginals4d, Array1<f64>, Array1<f64>, Array1<f64>, Array1<f64>), GridError> {
    let x0 = axis(41, 0.5);
    let x1 = axis(51, 0.5);
    let x2 = axis(21, 0.5);
    let x3 = axis(81, 0.1);

    let p0 = calc::normalize(&gaussian(&x0, 10.0, 2.0), &x0, "prob_x0")?;
    let p1 = calc::normalize(&gaussian(&x1, 12.5, 2.5), &x1, "prob_x1")?;
    let p2 = calc::normalize(&gaussian(&x2, 5.0, 1.5), &x2, "prob_x2")?;
    let p3 = calc::normalize(&gaussian(&x3, 4.0, 0.8), &x3, "prob_x3")?;

    let marginals = Marginals4d {
        prob_x0_x1: outer(&p0, &p1),
        prob_x0_x2: outer(&p0, &p2),
        prob_x1_x2: outer(&p1, &p2),
        prob_x0_x3: outer(&p0, &p3),
        prob_x1_x3: outer(&p1, &p3),
        prob_x2_x3: outer(&p2, &p3),
        prob_x0: p0,
        prob_x1: p1,
        prob_x2: p2,
        prob_x3: p3,
    };
    Ok((marginals, x0, x1, x2, x3))
}
