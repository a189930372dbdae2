use std::fs;
use std::path::{Path, PathBuf};

use ndarray::Array1;
use serde::Deserialize;

use crate::error::GridError;

/// Metadata describing a stack grid file, supplied by the grid-construction
/// pipeline alongside the binary data. Dimensions and spacings are never
/// inferred from the file itself.
#[derive(Debug, Clone, Deserialize)]
pub struct TestInfo {
    /// (nx, ny, nz, nt)
    pub grid_shape: (usize, usize, usize, usize),
    /// (dx, dy, dz, dt) in km and seconds
    pub grid_spacing: (f64, f64, f64, f64),
    /// Grid indexes of the true source location and origin time.
    pub true_indexes: (usize, usize, usize, usize),
    /// Time offset applied when the stack was shifted, in seconds.
    pub stack_shift_time: f64,
    /// Path to the binary stack grid (row-major little-endian f64).
    pub dat_file: PathBuf,
}

impl TestInfo {
    pub fn from_json(path: &Path) -> Result<TestInfo, GridError> {
        let text = fs::read_to_string(path)?;
        let info = serde_json::from_str(&text)?;
        Ok(info)
    }

    /// Coordinate axes for the four grid dimensions. The time axis is shifted
    /// back by the stack shift so that t=0 is the origin time.
    pub fn axes(&self) -> (Array1<f64>, Array1<f64>, Array1<f64>, Array1<f64>) {
        let (nx, ny, nz, nt) = self.grid_shape;
        let (dx, dy, dz, dt) = self.grid_spacing;
        let x = axis(nx, dx);
        let y = axis(ny, dy);
        let z = axis(nz, dz);
        let t = axis(nt, dt).mapv(|v| v - self.stack_shift_time);
        (x, y, z, t)
    }
}

/// Coordinate axis for one grid dimension: `index * spacing`.
pub fn axis(n: usize, spacing: f64) -> Array1<f64> {
    Array1::from_iter((0..n).map(|i| i as f64 * spacing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_axis_values() {
        let a = axis(4, 0.5);
        assert_eq!(a.len(), 4);
        assert_eq!(a[0], 0.0);
        assert_eq!(a[3], 1.5);
    }

    #[test]
    fn test_time_axis_shift() {
        let info = TestInfo {
            grid_shape: (2, 2, 2, 3),
            grid_spacing: (1.0, 1.0, 1.0, 0.5),
            true_indexes: (0, 0, 0, 0),
            stack_shift_time: 1.0,
            dat_file: PathBuf::from("stack.dat"),
        };
        let (x, _, _, t) = info.axes();
        assert_eq!(x.len(), 2);
        assert_eq!(t.len(), 3);
        assert!((t[0] - (-1.0)).abs() < 1e-12);
        assert!((t[2] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "grid_shape": [4, 5, 6, 7],
                "grid_spacing": [0.5, 0.5, 0.5, 0.1],
                "true_indexes": [1, 2, 3, 4],
                "stack_shift_time": 2.0,
                "dat_file": "grids/stack.dat"
            }}"#
        )
        .unwrap();

        let info = TestInfo::from_json(file.path()).unwrap();
        assert_eq!(info.grid_shape, (4, 5, 6, 7));
        assert_eq!(info.true_indexes.3, 4);
        assert_eq!(info.dat_file, PathBuf::from("grids/stack.dat"));
    }

    #[test]
    fn test_from_json_missing_field() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "grid_shape": [2, 2, 2, 2] }}"#).unwrap();
        assert!(TestInfo::from_json(file.path()).is_err());
    }
}
