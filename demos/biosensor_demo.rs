//! End-to-end run: build a small and a large dataset, color them by rule,
//! label the axis from the experiment name, and write the figures as PDF.
//!
//! `RUST_LOG=debug cargo run --example biosensor_demo [out_dir]`

use anyhow::{Context, Result};
use biosensor_plots::models::{Categorical, Series, TidyFrame, WideFrame};
use biosensor_plots::{labels, layout, palette, storage, viz};
use std::path::PathBuf;

fn wave(n: usize, base: f64, spread: f64, phase: usize) -> Vec<f64> {
    (0..n)
        .map(|i| base + spread * (((i + phase) * 7 % 11) as f64 / 10.0 - 0.5))
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    // Small sample: swarm over plain boxes.
    let exp = "Perceval_HeLa";
    let small = WideFrame::new(vec![
        Series::from_values("y1", &wave(12, 1.0, 0.4, 0)),
        Series::from_values("o1", &wave(12, 1.4, 0.5, 3)),
        Series::from_values("m1", &wave(10, 1.2, 0.3, 5)),
    ]);
    let colors = palette::resolve_wide(&small);
    let report = viz::render_wide(
        &small,
        &colors,
        &viz::PlotOptions {
            exp_name: exp.into(),
            x_fig_size: small.suggested_width(),
            y_label: labels::infer_axis_label(exp).into(),
            output_dir: Some(out_dir.clone()),
            ..Default::default()
        },
    )?;
    println!("{exp}: {:?}, wrote {:?}", report.path, report.output);

    // Large sample with an outlier: strip under notched boxes.
    let exp = "MitoRoGFP2_Orp1_run2";
    let mut treated = wave(40, 2.0, 0.8, 1);
    treated[7] = 25.0;
    let large = WideFrame::new(vec![
        Series::from_values("a1", &wave(40, 1.0, 0.6, 2)),
        Series::from_values("c1", &treated),
        Series::from_values("r1", &wave(35, 1.6, 0.7, 4)),
        Series::from_values("s2", &wave(38, 1.8, 0.5, 6)),
    ]);
    let csv_path = out_dir.join(format!("{exp}.csv"));
    storage::save_wide_csv(&large, &csv_path)?;
    let large = storage::load_wide_csv(&csv_path)?;
    let report = viz::render_wide(
        &large,
        &palette::resolve_wide(&large),
        &viz::PlotOptions {
            exp_name: exp.into(),
            x_fig_size: large.suggested_width(),
            y_label: labels::infer_axis_label(exp).into(),
            output_dir: Some(out_dir.clone()),
            ..Default::default()
        },
    )?;
    println!(
        "{exp}: {:?}, ceiling {:?}, {} points above it, wrote {:?}",
        report.path, report.ceiling, report.excluded_points, report.output
    );

    // Tidy input with an explicit level order.
    let ids = ["b1", "y1", "b1", "y1", "f2", "f2", "y1", "b1"];
    let levels = vec!["y1".into(), "b1".into(), "f2".into()];
    let series = Categorical::with_levels(&ids, levels)?;
    let values = [0.9, 1.1, 1.3, 1.0, 2.2, 2.0, 1.05, 1.25].map(Some).to_vec();
    let tidy = TidyFrame::new(series, values)?;
    let colors = palette::resolve_tidy(&tidy);
    let report = viz::render_tidy_strip(
        &tidy,
        &colors,
        &viz::TidyPlotOptions {
            exp_name: "SoNaR_tidy".into(),
            x_fig_size: layout::width_from_palette_length(colors.len()),
            y_label: labels::infer_axis_label("SoNaR_tidy").into(),
            save: true,
            output_dir: Some(out_dir),
            ..Default::default()
        },
    )?;
    println!("SoNaR_tidy: {:?}, wrote {:?}", report.path, report.output);

    Ok(())
}
