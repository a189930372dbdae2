use std::error::Error;
use std::ops::Range;
use std::path::{Path, PathBuf};

use ndarray::{Array1, Array2, ArrayView4};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};

use crate::calc;
use crate::config::TestInfo;
use crate::error::GridError;
use crate::marginals::{Marginals3d, Marginals4d};
use crate::reduce;

/// Number of filled-contour bands. Values are quantized into this many level
/// bins and each bin gets one Viridis color.
const CONTOUR_BANDS: usize = 10;

fn band_color(value: f64, min: f64, max: f64) -> RGBColor {
    let norm = if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let band = ((norm * CONTOUR_BANDS as f64).floor() as usize).min(CONTOUR_BANDS - 1);
    ViridisRGB.get_color((band as f64 + 0.5) / CONTOUR_BANDS as f64)
}

fn cell_step(axis: &Array1<f64>, i: usize) -> f64 {
    let n = axis.len();
    if n < 2 {
        return 1.0;
    }
    if i + 1 < n {
        axis[i + 1] - axis[i]
    } else {
        axis[n - 1] - axis[n - 2]
    }
}

fn check_curve(
    context: &'static str,
    curve: &Array1<f64>,
    axis: &Array1<f64>,
) -> Result<(), GridError> {
    if axis.is_empty() {
        return Err(GridError::ShapeMismatch {
            context,
            expected: 1,
            actual: 0,
        });
    }
    if curve.len() != axis.len() {
        return Err(GridError::ShapeMismatch {
            context,
            expected: axis.len(),
            actual: curve.len(),
        });
    }
    Ok(())
}

fn check_plane(
    context: &'static str,
    plane: &Array2<f64>,
    ax_h: &Array1<f64>,
    ax_v: &Array1<f64>,
) -> Result<(), GridError> {
    let (nh, nv) = plane.dim();
    if nh != ax_h.len() {
        return Err(GridError::ShapeMismatch {
            context,
            expected: ax_h.len(),
            actual: nh,
        });
    }
    if nv != ax_v.len() {
        return Err(GridError::ShapeMismatch {
            context,
            expected: ax_v.len(),
            actual: nv,
        });
    }
    if nh == 0 || nv == 0 {
        return Err(GridError::ShapeMismatch {
            context,
            expected: 1,
            actual: 0,
        });
    }
    Ok(())
}

/// Filled-contour plot of a 2D plane on one panel of a figure. The first axis
/// of the plane runs horizontally. Returns the (min, max) of the data so a
/// caller can attach a matching colorbar.
fn contour_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    ax_h: &Array1<f64>,
    ax_v: &Array1<f64>,
    plane: &Array2<f64>,
    x_desc: &str,
    y_desc: &str,
    title: &str,
) -> Result<(f64, f64), Box<dyn Error>> {
    check_plane("contour plane vs axes", plane, ax_h, ax_v)?;

    let min = plane.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    let max = plane.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));

    let h_end = ax_h[ax_h.len() - 1] + cell_step(ax_h, ax_h.len() - 1);
    let v_end = ax_v[ax_v.len() - 1] + cell_step(ax_v, ax_v.len() - 1);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(65)
        .build_cartesian_2d(ax_h[0]..h_end, ax_v[0]..v_end)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(6)
        .y_labels(6)
        .x_label_formatter(&|v| format!("{:.1}", v))
        .y_label_formatter(&|v| format!("{:.1}", v))
        .label_style(("sans-serif", 18))
        .draw()?;

    chart.draw_series(plane.indexed_iter().map(|((i, j), &value)| {
        let x0 = ax_h[i];
        let y0 = ax_v[j];
        Rectangle::new(
            [
                (x0, y0),
                (x0 + cell_step(ax_h, i), y0 + cell_step(ax_v, j)),
            ],
            band_color(value, min, max).filled(),
        )
    }))?;

    Ok((min, max))
}

/// Colorbar for the contour bands, drawn into its own panel.
fn colorbar_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    min: f64,
    max: f64,
) -> Result<(), Box<dyn Error>> {
    let (lo, hi) = if max > min { (min, max) } else { (min, min + 1.0) };

    let mut chart = ChartBuilder::on(area)
        .margin_top(30)
        .margin_bottom(55)
        .set_label_area_size(LabelAreaPosition::Right, 60)
        .build_cartesian_2d(0.0..1.0, lo..hi)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_x_axis()
        .y_labels(7)
        .y_label_formatter(&|v| format!("{:.2e}", v))
        .y_label_style(("sans-serif", 16))
        .draw()?;

    let steps = 100;
    chart.draw_series((0..steps).map(|i| {
        let value = lo + (hi - lo) * i as f64 / steps as f64;
        Rectangle::new(
            [(0.0, value), (1.0, value + (hi - lo) / steps as f64)],
            band_color(value, lo, hi).filled(),
        )
    }))?;

    Ok(())
}

/// Line plot on one panel, with optional red markers for a reference time
/// (vertical) and a reference coordinate (horizontal).
#[allow(clippy::too_many_arguments)]
fn line_panel(
    area: &DrawingArea<BitMapBackend, Shift>,
    axis: &Array1<f64>,
    curve: &Array1<f64>,
    x_range: Range<f64>,
    y_range: Range<f64>,
    x_desc: &str,
    y_desc: &str,
    caption: Option<&str>,
    vline: Option<f64>,
    hline: Option<f64>,
) -> Result<(), Box<dyn Error>> {
    check_curve("line curve vs axis", curve, axis)?;

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(45)
        .y_label_area_size(70);
    if let Some(title) = caption {
        builder.caption(title, ("sans-serif", 22));
    }
    let mut chart = builder.build_cartesian_2d(x_range.clone(), y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(6)
        .y_labels(5)
        .x_max_light_lines(0)
        .y_max_light_lines(0)
        .axis_style(BLACK.stroke_width(1))
        .x_label_formatter(&|v| format!("{:.1}", v))
        .y_label_formatter(&|v| format!("{:.2e}", v))
        .label_style(("sans-serif", 18))
        .draw()?;

    chart.draw_series(LineSeries::new(
        axis.iter().zip(curve.iter()).map(|(&x, &y)| (x, y)),
        GREEN.stroke_width(1),
    ))?;

    if let Some(v) = vline {
        chart.draw_series(LineSeries::new(
            [(v, y_range.start), (v, y_range.end)],
            RED.stroke_width(2),
        ))?;
    }
    if let Some(h) = hline {
        chart.draw_series(LineSeries::new(
            [(x_range.start, h), (x_range.end, h)],
            RED.stroke_width(2),
        ))?;
    }

    Ok(())
}

fn curve_ranges(axis: &Array1<f64>, curve: &Array1<f64>) -> (Range<f64>, Range<f64>) {
    let x_start = axis[0];
    let x_end = axis[axis.len() - 1];
    let x_range = if x_end > x_start {
        x_start..x_end
    } else {
        (x_start - 1.0)..(x_start + 1.0)
    };

    let y_min = curve.iter().fold(f64::INFINITY, |a, &b| a.min(b)).min(0.0);
    let y_max = curve.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let y_range = if y_max > y_min {
        y_min..(y_max + (y_max - y_min) * 0.1)
    } else {
        (y_min - 1.0)..(y_min + 1.0)
    };

    (x_range, y_range)
}

/// Render a single 1D curve to its own PNG file.
pub fn line_figure(
    path: &Path,
    axis: &Array1<f64>,
    curve: &Array1<f64>,
    x_desc: &str,
    y_desc: &str,
    title: &str,
) -> Result<(), Box<dyn Error>> {
    check_curve("line figure curve vs axis", curve, axis)?;
    let (x_range, y_range) = curve_ranges(axis, curve);

    let root = BitMapBackend::new(path, (900, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    line_panel(
        &root,
        axis,
        curve,
        x_range,
        y_range,
        x_desc,
        y_desc,
        Some(title),
        None,
        None,
    )?;
    root.present()?;
    Ok(())
}

/// Render a single 2D plane as a filled-contour PNG file with a colorbar. The
/// plane is oriented so its first axis runs horizontally.
pub fn contour_figure(
    path: &Path,
    ax_h: &Array1<f64>,
    ax_v: &Array1<f64>,
    plane: &Array2<f64>,
    x_desc: &str,
    y_desc: &str,
    title: &str,
) -> Result<(), Box<dyn Error>> {
    check_plane("contour figure plane vs axes", plane, ax_h, ax_v)?;

    let width = 1000u32;
    let root = BitMapBackend::new(path, (width, 700)).into_drawing_area();
    root.fill(&WHITE)?;
    let (main_area, colorbar_area) = root.split_horizontally(width - 130);

    let (min, max) = contour_panel(&main_area, ax_h, ax_v, plane, x_desc, y_desc, title)?;
    colorbar_panel(&colorbar_area, min, max)?;

    root.present()?;
    Ok(())
}

fn suffix_path(base_filename: &str, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{}_{}.png", base_filename, suffix))
}

/// Summary figure for a Dirac test grid: XY/XZ/YZ filled-contour cuts through
/// the true location at the true time (top row, shared colorbar) and the four
/// max-stack curves over time (bottom row), each marked with the true time and
/// the true coordinate in red.
///
/// Output is `<fig_dir>/<grid file name>.png`; the created path is returned.
pub fn dirac_summary(
    info: &TestInfo,
    grid: ArrayView4<f64>,
    fig_dir: &Path,
) -> Result<PathBuf, Box<dyn Error>> {
    let (nx, ny, nz, nt) = grid.dim();
    let (ix, iy, iz, it) = info.true_indexes;
    if ix >= nx || iy >= ny || iz >= nz || it >= nt {
        return Err(GridError::ShapeMismatch {
            context: "true indexes vs grid shape",
            expected: nx * ny * nz * nt,
            actual: ix.max(iy).max(iz).max(it),
        }
        .into());
    }

    let (x, y, z, t) = info.axes();
    let (dx, dy, dz, _) = info.grid_spacing;

    let xy = reduce::xy_cut(grid, iz, it)?;
    let xz = reduce::xz_cut(grid, iy, it)?;
    let yz = reduce::yz_cut(grid, ix, it)?;
    let max_val = reduce::max_over_space(grid)?;
    let max_x = reduce::argmax_coordinate(grid, 0, dx)?;
    let max_y = reduce::argmax_coordinate(grid, 1, dy)?;
    let max_z = reduce::argmax_coordinate(grid, 2, dz)?;

    let file_name = info
        .dat_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "stack_grid".to_string());
    let out_path = fig_dir.join(format!("{}.png", file_name));

    let width = 1400u32;
    let height = 1000u32;
    let backend_path = out_path.clone();
    let root = BitMapBackend::new(&backend_path, (width, height)).into_drawing_area();
    root.fill(&WHITE)?;

    let (upper, lower) = root.split_vertically(height / 2);
    let (panel_xy, rest) = upper.split_horizontally(430);
    let (panel_xz, rest) = rest.split_horizontally(430);
    let (panel_yz, colorbar_area) = rest.split_horizontally(430);

    contour_panel(&panel_xy, &x, &y, &xy, "x (km)", "y (km)", "XY plane")?;
    contour_panel(&panel_xz, &x, &z, &xz, "x (km)", "z (km)", "XZ plane")?;
    let (min, max) = contour_panel(&panel_yz, &y, &z, &yz, "y (km)", "z (km)", "YZ plane")?;
    colorbar_panel(&colorbar_area, min, max)?;

    let (panel_val, rest) = lower.split_horizontally(350);
    let (panel_x, rest) = rest.split_horizontally(350);
    let (panel_y, panel_z) = rest.split_horizontally(350);

    let t_true = t[it];
    let t_window = (t_true - 2.0)..(t_true + 2.0);

    let val_max = max_val.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let val_range = if val_max > 0.0 { 0.0..val_max } else { 0.0..1.0 };
    line_panel(
        &panel_val,
        &t,
        &max_val,
        t_window.clone(),
        val_range,
        "t (s)",
        "max stack",
        None,
        Some(t_true),
        None,
    )?;

    for (panel, curve, y_desc, coord_true) in [
        (&panel_x, &max_x, "x of max (km)", x[ix]),
        (&panel_y, &max_y, "y of max (km)", y[iy]),
        (&panel_z, &max_z, "z of max (km)", z[iz]),
    ] {
        let lo = curve.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let hi = curve.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
        line_panel(
            panel,
            &t,
            curve,
            t_window.clone(),
            (lo - pad)..(hi + pad),
            "t (s)",
            y_desc,
            None,
            Some(t_true),
            Some(coord_true),
        )?;
    }

    root.present()?;
    Ok(out_path)
}

/// Normalize the four max-projection curves to unit integral and render each
/// to `<base>_test_stack_{x,y,z,t}.png`.
pub fn stack_curves(
    curves: (&Array1<f64>, &Array1<f64>, &Array1<f64>, &Array1<f64>),
    axes: (&Array1<f64>, &Array1<f64>, &Array1<f64>, &Array1<f64>),
    base_filename: &str,
) -> Result<(), Box<dyn Error>> {
    let (stack_x, stack_y, stack_z, stack_t) = curves;
    let (x, y, z, t) = axes;

    let plots = [
        (stack_x, x, "test_stack_x", "x (km)", "p(x)", "x"),
        (stack_y, y, "test_stack_y", "y (km)", "p(y)", "y"),
        (stack_z, z, "test_stack_z", "z (km)", "p(z)", "z"),
        (stack_t, t, "test_stack_t", "t (s)", "p(t)", "t"),
    ];

    for (curve, axis, suffix, x_desc, y_desc, name) in plots {
        let normalized = calc::normalize(curve, axis, suffix)?;
        line_figure(
            &suffix_path(base_filename, suffix),
            axis,
            &normalized,
            x_desc,
            y_desc,
            &format!("Marginal probability density over {} (at maximum)", name),
        )?;
    }

    Ok(())
}

/// Render every field of a 4D marginal record, one PNG per field, named
/// `<base>_<suffix>.png`. 1D fields become line plots, 2D fields become
/// filled-contour plots with a colorbar.
pub fn marginals_4d(
    m: &Marginals4d,
    x0: &Array1<f64>,
    x1: &Array1<f64>,
    x2: &Array1<f64>,
    x3: &Array1<f64>,
    base_filename: &str,
) -> Result<(), Box<dyn Error>> {
    log::debug!(
        "integral over x0 = {:.3}",
        calc::trapz(&m.prob_x0, x0)?
    );

    let lines = [
        (
            "prob_x0",
            x0,
            &m.prob_x0,
            "x (km)",
            "p(x)",
            "Marginal probability density over x",
        ),
        (
            "prob_x1",
            x1,
            &m.prob_x1,
            "y (km)",
            "p(y)",
            "Marginal probability density over y",
        ),
        (
            "prob_x2",
            x2,
            &m.prob_x2,
            "z (km)",
            "p(z)",
            "Marginal probability density over z",
        ),
        (
            "prob_x3",
            x3,
            &m.prob_x3,
            "time (s)",
            "p(t)",
            "Marginal probability density over time",
        ),
    ];
    for (suffix, axis, curve, x_desc, y_desc, title) in lines {
        line_figure(
            &suffix_path(base_filename, suffix),
            axis,
            curve,
            x_desc,
            y_desc,
            title,
        )?;
    }

    let pairs: [(&str, &Array1<f64>, &Array1<f64>, &Array2<f64>, &str, &str, &str); 6] = [
        (
            "prob_x0_x3",
            x0,
            x3,
            &m.prob_x0_x3,
            "x (km)",
            "time (s)",
            "Marginal probability density over x and time",
        ),
        (
            "prob_x1_x3",
            x1,
            x3,
            &m.prob_x1_x3,
            "y (km)",
            "time (s)",
            "Marginal probability density over y and time",
        ),
        (
            "prob_x2_x3",
            x2,
            x3,
            &m.prob_x2_x3,
            "z (km)",
            "time (s)",
            "Marginal probability density over z and time",
        ),
        (
            "prob_x0_x1",
            x0,
            x1,
            &m.prob_x0_x1,
            "x (km)",
            "y (km)",
            "Marginal probability density over x and y",
        ),
        (
            "prob_x0_x2",
            x0,
            x2,
            &m.prob_x0_x2,
            "x (km)",
            "z (km)",
            "Marginal probability density over x and z",
        ),
        (
            "prob_x1_x2",
            x1,
            x2,
            &m.prob_x1_x2,
            "y (km)",
            "z (km)",
            "Marginal probability density over y and z",
        ),
    ];
    for (suffix, ax_h, ax_v, plane, x_desc, y_desc, title) in pairs {
        contour_figure(
            &suffix_path(base_filename, suffix),
            ax_h,
            ax_v,
            plane,
            x_desc,
            y_desc,
            title,
        )?;
    }

    Ok(())
}

/// Render every field of a 3D (space only) marginal record, one PNG per
/// field, named `<base>_<suffix>.png`.
pub fn marginals_3d(
    m: &Marginals3d,
    x0: &Array1<f64>,
    x1: &Array1<f64>,
    x2: &Array1<f64>,
    base_filename: &str,
) -> Result<(), Box<dyn Error>> {
    let lines = [
        (
            "prob_x0",
            x0,
            &m.prob_x0,
            "x (km)",
            "p(x)",
            "Marginal probability density over x",
        ),
        (
            "prob_x1",
            x1,
            &m.prob_x1,
            "y (km)",
            "p(y)",
            "Marginal probability density over y",
        ),
        (
            "prob_x2",
            x2,
            &m.prob_x2,
            "z (km)",
            "p(z)",
            "Marginal probability density over z",
        ),
    ];
    for (suffix, axis, curve, x_desc, y_desc, title) in lines {
        line_figure(
            &suffix_path(base_filename, suffix),
            axis,
            curve,
            x_desc,
            y_desc,
            title,
        )?;
    }

    let pairs: [(&str, &Array1<f64>, &Array1<f64>, &Array2<f64>, &str, &str, &str); 3] = [
        (
            "prob_x0_x1",
            x0,
            x1,
            &m.prob_x0_x1,
            "x (km)",
            "y (km)",
            "Marginal probability density over x and y",
        ),
        (
            "prob_x0_x2",
            x0,
            x2,
            &m.prob_x0_x2,
            "x (km)",
            "z (km)",
            "Marginal probability density over x and z",
        ),
        (
            "prob_x1_x2",
            x1,
            x2,
            &m.prob_x1_x2,
            "y (km)",
            "z (km)",
            "Marginal probability density over y and z",
        ),
    ];
    for (suffix, ax_h, ax_v, plane, x_desc, y_desc, title) in pairs {
        contour_figure(
            &suffix_path(base_filename, suffix),
            ax_h,
            ax_v,
            plane,
            x_desc,
            y_desc,
            title,
        )?;
    }

    Ok(())
}
