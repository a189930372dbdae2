use ndarray::{s, Array1, Array2, ArrayView4, Axis, Ix1};

use crate::error::GridError;

fn check_index(context: &'static str, index: usize, extent: usize) -> Result<(), GridError> {
    if index >= extent {
        return Err(GridError::ShapeMismatch {
            context,
            expected: extent,
            actual: index,
        });
    }
    Ok(())
}

/// XY cross-section of the grid at fixed depth and time indexes. Nearest-index
/// only, no interpolation.
pub fn xy_cut(grid: ArrayView4<f64>, iz: usize, it: usize) -> Result<Array2<f64>, GridError> {
    let (_, _, nz, nt) = grid.dim();
    check_index("z index for XY cut", iz, nz)?;
    check_index("t index for XY cut", it, nt)?;
    Ok(grid.slice(s![.., .., iz, it]).to_owned())
}

/// XZ cross-section at fixed y and time indexes.
pub fn xz_cut(grid: ArrayView4<f64>, iy: usize, it: usize) -> Result<Array2<f64>, GridError> {
    let (_, ny, _, nt) = grid.dim();
    check_index("y index for XZ cut", iy, ny)?;
    check_index("t index for XZ cut", it, nt)?;
    Ok(grid.slice(s![.., iy, .., it]).to_owned())
}

/// YZ cross-section at fixed x and time indexes.
pub fn yz_cut(grid: ArrayView4<f64>, ix: usize, it: usize) -> Result<Array2<f64>, GridError> {
    let (nx, _, _, nt) = grid.dim();
    check_index("x index for YZ cut", ix, nx)?;
    check_index("t index for YZ cut", it, nt)?;
    Ok(grid.slice(s![ix, .., .., it]).to_owned())
}

/// Reduce every axis except `axis_to_keep` by taking the maximum. The result
/// has the length of the grid along the kept axis.
pub fn max_projection(grid: ArrayView4<f64>, axis_to_keep: usize) -> Result<Array1<f64>, GridError> {
    if axis_to_keep > 3 {
        return Err(GridError::ShapeMismatch {
            context: "projection axis index",
            expected: 3,
            actual: axis_to_keep,
        });
    }
    // Fold the complementary axes from highest to lowest so axis numbers stay
    // valid as dimensions disappear.
    let mut reduced = grid.to_owned().into_dyn();
    for axis in (0..4).rev() {
        if axis == axis_to_keep {
            continue;
        }
        reduced = reduced.fold_axis(Axis(axis), f64::NEG_INFINITY, |acc, &v| acc.max(v));
    }
    reduced
        .into_dimensionality::<Ix1>()
        .map_err(|_| GridError::ShapeMismatch {
            context: "projection result dimensionality",
            expected: 1,
            actual: 0,
        })
}

/// Maximum of the grid over all three spatial axes, one value per time index.
pub fn max_over_space(grid: ArrayView4<f64>) -> Result<Array1<f64>, GridError> {
    max_projection(grid, 3)
}

/// For each time index, the physical coordinate (`index * spacing`) of the
/// element maximizing the grid along the chosen spatial axis.
///
/// The two complementary spatial axes are max-reduced first and the argmax
/// runs on the reduced plane, never independently per axis. Ties resolve to
/// the lowest index.
pub fn argmax_coordinate(
    grid: ArrayView4<f64>,
    spatial_axis: usize,
    spacing: f64,
) -> Result<Array1<f64>, GridError> {
    let max = |acc: &f64, v: &f64| acc.max(*v);
    let plane: Array2<f64> = match spatial_axis {
        // keep (x, t): reduce z then y
        0 => grid
            .fold_axis(Axis(2), f64::NEG_INFINITY, max)
            .fold_axis(Axis(1), f64::NEG_INFINITY, max),
        // keep (y, t): reduce z then x
        1 => grid
            .fold_axis(Axis(2), f64::NEG_INFINITY, max)
            .fold_axis(Axis(0), f64::NEG_INFINITY, max),
        // keep (z, t): reduce y then x
        2 => grid
            .fold_axis(Axis(1), f64::NEG_INFINITY, max)
            .fold_axis(Axis(0), f64::NEG_INFINITY, max),
        _ => {
            return Err(GridError::ShapeMismatch {
                context: "spatial axis index",
                expected: 2,
                actual: spatial_axis,
            })
        }
    };

    let nt = plane.dim().1;
    let mut coords = Array1::zeros(nt);
    for (j, column) in plane.axis_iter(Axis(1)).enumerate() {
        let mut best = 0usize;
        let mut best_value = f64::NEG_INFINITY;
        for (i, &v) in column.iter().enumerate() {
            if v > best_value {
                best_value = v;
                best = i;
            }
        }
        coords[j] = best as f64 * spacing;
    }
    Ok(coords)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array4;

    fn ramp_grid() -> Array4<f64> {
        // value[i,j,k,l] = i + j + k + l
        Array4::from_shape_fn((4, 4, 4, 4), |(i, j, k, l)| (i + j + k + l) as f64)
    }

    #[test]
    fn test_xy_cut_ramp() {
        let grid = ramp_grid();
        let xy = xy_cut(grid.view(), 1, 2).unwrap();
        assert_eq!(xy.dim(), (4, 4));
        for i in 0..4 {
            for j in 0..4 {
                assert_eq!(xy[[i, j]], (i + j + 3) as f64);
            }
        }
    }

    #[test]
    fn test_cut_idempotent() {
        let grid = ramp_grid();
        let first = xz_cut(grid.view(), 2, 3).unwrap();
        let second = xz_cut(grid.view(), 2, 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_cut_out_of_bounds() {
        let grid = ramp_grid();
        assert!(xy_cut(grid.view(), 4, 0).is_err());
        assert!(yz_cut(grid.view(), 0, 7).is_err());
    }

    #[test]
    fn test_max_projection_matches_brute_force() {
        let grid = Array4::from_shape_fn((3, 4, 2, 5), |(i, j, k, l)| {
            ((i * 7 + j * 3 + k * 11 + l * 5) % 13) as f64
        });
        for axis in 0..4 {
            let projection = max_projection(grid.view(), axis).unwrap();
            assert_eq!(projection.len(), grid.shape()[axis]);
            for (idx, &value) in projection.iter().enumerate() {
                let mut brute = f64::NEG_INFINITY;
                for (coords, &v) in grid.indexed_iter() {
                    let pos = [coords.0, coords.1, coords.2, coords.3];
                    if pos[axis] == idx {
                        brute = brute.max(v);
                    }
                }
                assert_eq!(value, brute, "axis {} index {}", axis, idx);
            }
        }
    }

    #[test]
    fn test_max_over_space_length() {
        let grid = ramp_grid();
        let curve = max_over_space(grid.view()).unwrap();
        assert_eq!(curve.len(), 4);
        // max over spatial ramp at time l is 9 + l
        for l in 0..4 {
            assert_eq!(curve[l], (9 + l) as f64);
        }
    }

    #[test]
    fn test_argmax_coordinate_peak() {
        // single sharp peak at (2, 1, 0) for every time index
        let mut grid = Array4::zeros((4, 3, 2, 3));
        for l in 0..3 {
            grid[[2, 1, 0, l]] = 10.0 + l as f64;
        }
        let dx = 0.5;
        let coords = argmax_coordinate(grid.view(), 0, dx).unwrap();
        assert_eq!(coords.len(), 3);
        for l in 0..3 {
            assert_eq!(coords[l], 2.0 * dx);
        }
        let dy = 2.0;
        let coords = argmax_coordinate(grid.view(), 1, dy).unwrap();
        for l in 0..3 {
            assert_eq!(coords[l], 1.0 * dy);
        }
    }

    #[test]
    fn test_argmax_runs_on_reduced_plane() {
        // Peak location along x differs per time index; the argmax must follow
        // the max-reduced plane for each one.
        let mut grid = Array4::zeros((5, 2, 2, 2));
        grid[[1, 0, 1, 0]] = 3.0;
        grid[[4, 1, 0, 1]] = 7.0;
        let coords = argmax_coordinate(grid.view(), 0, 1.0).unwrap();
        assert_eq!(coords[0], 1.0);
        assert_eq!(coords[1], 4.0);
    }

    #[test]
    fn test_argmax_bad_axis() {
        let grid = ramp_grid();
        assert!(argmax_coordinate(grid.view(), 3, 1.0).is_err());
        assert!(max_projection(grid.view(), 4).is_err());
    }
}
