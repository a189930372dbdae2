use ndarray::{Array1, Array2};

/// Marginal probability densities of a 3D location grid, one field per
/// quantity the renderer knows how to draw. Field completeness is enforced by
/// the type instead of string keys into a dictionary.
#[derive(Debug, Clone)]
pub struct Marginals3d {
    pub prob_x0: Array1<f64>,
    pub prob_x1: Array1<f64>,
    pub prob_x2: Array1<f64>,
    pub prob_x0_x1: Array2<f64>,
    pub prob_x0_x2: Array2<f64>,
    pub prob_x1_x2: Array2<f64>,
}

impl Marginals3d {
    /// Output file suffixes, in render order. One figure is produced per
    /// suffix and no others.
    pub const SUFFIXES: [&'static str; 6] = [
        "prob_x0",
        "prob_x1",
        "prob_x2",
        "prob_x0_x1",
        "prob_x0_x2",
        "prob_x1_x2",
    ];
}

/// Marginal probability densities of a 4D (space and time) location grid.
#[derive(Debug, Clone)]
pub struct Marginals4d {
    pub prob_x0: Array1<f64>,
    pub prob_x1: Array1<f64>,
    pub prob_x2: Array1<f64>,
    pub prob_x3: Array1<f64>,
    pub prob_x0_x1: Array2<f64>,
    pub prob_x0_x2: Array2<f64>,
    pub prob_x1_x2: Array2<f64>,
    pub prob_x0_x3: Array2<f64>,
    pub prob_x1_x3: Array2<f64>,
    pub prob_x2_x3: Array2<f64>,
}

impl Marginals4d {
    pub const SUFFIXES: [&'static str; 10] = [
        "prob_x0",
        "prob_x1",
        "prob_x2",
        "prob_x3",
        "prob_x0_x3",
        "prob_x1_x3",
        "prob_x2_x3",
        "prob_x0_x1",
        "prob_x0_x2",
        "prob_x1_x2",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixes_are_unique() {
        for (i, a) in Marginals4d::SUFFIXES.iter().enumerate() {
            for b in Marginals4d::SUFFIXES.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_3d_suffixes_subset_of_4d() {
        for suffix in Marginals3d::SUFFIXES {
            assert!(Marginals4d::SUFFIXES.contains(&suffix));
        }
    }
}
