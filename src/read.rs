use std::fs::File;
use std::io::Read;
use std::path::Path;

use byteorder::{ByteOrder, LittleEndian};
use ndarray::Array4;

use crate::error::GridError;

/// Read a whole binary stack grid into memory and reshape it.
///
/// The file holds row-major little-endian f64 values (the layout written by
/// the stacking pipeline); the shape comes from external metadata, never from
/// the file itself.
pub fn read_stack_grid(
    path: &Path,
    shape: (usize, usize, usize, usize),
) -> Result<Array4<f64>, GridError> {
    let mut file = File::open(path)?;
    let mut buffer = Vec::new();
    file.read_to_end(&mut buffer)?;

    let (nx, ny, nz, nt) = shape;
    let n_values = nx * ny * nz * nt;
    if buffer.len() != n_values * 8 {
        return Err(GridError::ShapeMismatch {
            context: "stack grid file size",
            expected: n_values * 8,
            actual: buffer.len(),
        });
    }

    let mut values = vec![0.0f64; n_values];
    LittleEndian::read_f64_into(&buffer, &mut values);

    Array4::from_shape_vec(shape, values).map_err(|_| GridError::ShapeMismatch {
        context: "stack grid reshape",
        expected: n_values,
        actual: buffer.len() / 8,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;
    use std::io::Write;

    fn write_grid_file(values: &[f64]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for &v in values {
            file.write_f64::<LittleEndian>(v).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_read_round_trip() {
        // value[i,j,k,l] = i + j + k + l over a (2,2,2,2) grid, row-major
        let mut values = Vec::new();
        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    for l in 0..2 {
                        values.push((i + j + k + l) as f64);
                    }
                }
            }
        }
        let file = write_grid_file(&values);

        let grid = read_stack_grid(file.path(), (2, 2, 2, 2)).unwrap();
        assert_eq!(grid.dim(), (2, 2, 2, 2));
        assert_eq!(grid[[0, 0, 0, 0]], 0.0);
        assert_eq!(grid[[1, 0, 1, 0]], 2.0);
        assert_eq!(grid[[1, 1, 1, 1]], 4.0);
    }

    #[test]
    fn test_read_wrong_size() {
        let file = write_grid_file(&[1.0, 2.0, 3.0]);
        let err = read_stack_grid(file.path(), (2, 2, 2, 2)).unwrap_err();
        match err {
            GridError::ShapeMismatch {
                expected, actual, ..
            } => {
                assert_eq!(expected, 16 * 8);
                assert_eq!(actual, 3 * 8);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_stack_grid(&dir.path().join("no_such.dat"), (1, 1, 1, 1)).unwrap_err();
        assert!(matches!(err, GridError::Io(_)));
    }
}
