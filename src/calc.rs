use ndarray::Array1;

use crate::error::GridError;

/// Trapezoidal integral of a 1D curve over its paired coordinate axis.
pub fn trapz(curve: &Array1<f64>, axis: &Array1<f64>) -> Result<f64, GridError> {
    if curve.len() != axis.len() {
        return Err(GridError::ShapeMismatch {
            context: "curve vs coordinate axis",
            expected: axis.len(),
            actual: curve.len(),
        });
    }
    let mut integral = 0.0;
    for i in 1..curve.len() {
        integral += 0.5 * (curve[i] + curve[i - 1]) * (axis[i] - axis[i - 1]);
    }
    Ok(integral)
}

/// Rescale a curve so its trapezoidal integral over `axis` equals 1.
///
/// A zero or non-finite integral is a `DegenerateCurve` error naming the
/// curve, rather than a silent component-wise division by zero.
pub fn normalize(
    curve: &Array1<f64>,
    axis: &Array1<f64>,
    label: &str,
) -> Result<Array1<f64>, GridError> {
    let integral = trapz(curve, axis)?;
    if integral == 0.0 || !integral.is_finite() {
        return Err(GridError::DegenerateCurve {
            label: label.to_string(),
        });
    }
    Ok(curve.mapv(|v| v / integral))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_trapz_triangle() {
        let curve = array![0.0, 1.0, 2.0, 1.0, 0.0];
        let axis = array![0.0, 1.0, 2.0, 3.0, 4.0];
        let integral = trapz(&curve, &axis).unwrap();
        assert!((integral - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_trapz_uneven_spacing() {
        // f(x) = x integrated over [0, 4] is exactly 8 under the trapezoid rule
        let axis = array![0.0, 0.5, 1.5, 4.0];
        let curve = axis.clone();
        let integral = trapz(&curve, &axis).unwrap();
        assert!((integral - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_triangle() {
        let curve = array![0.0, 1.0, 2.0, 1.0, 0.0];
        let axis = array![0.0, 1.0, 2.0, 3.0, 4.0];
        let normalized = normalize(&curve, &axis, "triangle").unwrap();
        let expected = array![0.0, 0.25, 0.5, 0.25, 0.0];
        for (a, b) in normalized.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_normalized_curve_integrates_to_one() {
        let axis = Array1::from_iter((0..50).map(|i| i as f64 * 0.2));
        let curves = [
            axis.mapv(|v: f64| (-0.5 * (v - 5.0) * (v - 5.0)).exp()),
            axis.mapv(|v: f64| v * v + 1.0),
            axis.mapv(|v: f64| (v * 0.7).sin().abs() + 0.1),
        ];
        for (n, curve) in curves.iter().enumerate() {
            let normalized = normalize(curve, &axis, &format!("curve{}", n)).unwrap();
            let integral = trapz(&normalized, &axis).unwrap();
            assert!(
                (integral - 1.0).abs() < 1e-9,
                "curve {} integrates to {}",
                n,
                integral
            );
        }
    }

    #[test]
    fn test_normalize_degenerate() {
        let curve = Array1::zeros(5);
        let axis = Array1::from_iter((0..5).map(|i| i as f64));
        let err = normalize(&curve, &axis, "flatline").unwrap_err();
        match err {
            GridError::DegenerateCurve { label } => assert_eq!(label, "flatline"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_length_mismatch() {
        let curve = array![1.0, 2.0];
        let axis = array![0.0, 1.0, 2.0];
        assert!(trapz(&curve, &axis).is_err());
        assert!(normalize(&curve, &axis, "short").is_err());
    }
}
