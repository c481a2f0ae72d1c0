use biosensor_plots::Error;
use biosensor_plots::models::{Categorical, Series, TidyFrame, WideFrame};
use biosensor_plots::palette::{self, RuleSet};
use biosensor_plots::viz::{self, PlotOptions, RenderPath, RenderReport, TidyPlotOptions};
use std::fs;

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn frame_with_rows(rows: usize) -> WideFrame {
    let a: Vec<f64> = (0..rows).map(|i| 1.0 + (i % 5) as f64 * 0.1).collect();
    let o: Vec<f64> = (0..rows).map(|i| 2.0 + (i % 7) as f64 * 0.2).collect();
    WideFrame::new(vec![Series::from_values("a1", &a), Series::from_values("o1", &o)])
}

/// 30 rows: 0..=4 six times each, with one 4 replaced by an outlier of 10.
/// Q1 = 1 and Q3 = 3, so the ceiling is 3 + 2 * 1.7 = 6.4.
fn frame_with_outlier() -> WideFrame {
    let mut v: Vec<f64> = (0..30).map(|i| (i % 5) as f64).collect();
    v[29] = 10.0;
    WideFrame::new(vec![Series::from_values("c1", &v)])
}

/// Vertex count of every `<polygon>`; only box bodies are drawn as polygons.
fn polygon_vertex_counts(svg: &str) -> Vec<usize> {
    svg.split("<polygon")
        .skip(1)
        .filter_map(|tag| {
            let tag = &tag[..tag.find('>')?];
            let start = tag.find("points=\"")? + "points=\"".len();
            let end = start + tag[start..].find('"')?;
            Some(tag[start..end].split_whitespace().count())
        })
        .collect()
}

fn assert_swarm_look(report: &RenderReport) {
    assert_eq!(report.path, RenderPath::Swarm);
    assert!(!report.box_layer.notch);
    assert_eq!(report.box_layer.fill_alpha, 0.5);
    assert_eq!(report.point_layer.alpha, 0.8);
    assert_eq!(report.point_layer.jitter, 0.0);
    assert!(report.points_on_top);

    let counts = polygon_vertex_counts(&report.svg);
    assert!(!counts.is_empty());
    assert!(counts.iter().all(|n| *n == 4), "plain boxes: {counts:?}");
    // Boxes first, points over them.
    assert!(report.svg.contains("<circle"));
    assert!(report.svg.find("<polygon") < report.svg.find("<circle"));
}

fn assert_strip_look(report: &RenderReport) {
    assert_eq!(report.path, RenderPath::Strip);
    assert!(report.box_layer.notch);
    assert_eq!(report.box_layer.fill_alpha, 0.8);
    assert_eq!(report.point_layer.alpha, 0.2);
    assert_eq!(report.point_layer.jitter, 0.3);
    assert!(!report.points_on_top);

    let counts = polygon_vertex_counts(&report.svg);
    assert!(!counts.is_empty());
    assert!(counts.iter().all(|n| *n == 10), "notched boxes: {counts:?}");
    // Points first, boxes over them.
    assert!(report.svg.contains("<circle"));
    assert!(report.svg.find("<circle") < report.svg.find("<polygon"));
}

fn no_save() -> PlotOptions {
    PlotOptions {
        save: false,
        ..Default::default()
    }
}

#[test]
fn fewer_than_thirty_rows_draws_a_swarm() {
    init_logs();
    let f = frame_with_rows(29);
    let report = viz::render_wide(&f, &palette::resolve_wide(&f), &no_save()).unwrap();
    assert_swarm_look(&report);
    assert_eq!(report.ceiling, None);
    assert_eq!(report.excluded_points, 0);
    assert_eq!(report.boxes.len(), 2);
    assert!(report.svg.contains("<svg"));
    assert!(report.output.is_none());
    assert_eq!((report.width_px, report.height_px), (375, 250));
}

#[test]
fn thirty_rows_draws_a_strip() {
    init_logs();
    let f = frame_with_rows(30);
    let report = viz::render_wide(&f, &palette::resolve_wide(&f), &no_save()).unwrap();
    assert_strip_look(&report);
    let ceiling = report.ceiling.expect("strip path computes a ceiling");
    assert_eq!(report.y_range, (0.0, ceiling));
}

#[test]
fn points_at_or_above_the_ceiling_leave_the_strip_but_not_the_box() {
    init_logs();
    let f = frame_with_outlier();
    let report = viz::render_wide(&f, &palette::resolve_wide(&f), &no_save()).unwrap();
    let ceiling = report.ceiling.unwrap();
    assert!((ceiling - 6.4).abs() < 1e-9);
    assert_eq!(report.excluded_points, 1);
    assert_eq!(report.boxes[0].count, 30);
    assert_eq!(report.boxes[0].max, 10.0);
}

#[test]
fn explicit_limits_override_the_computed_ceiling() {
    init_logs();
    let f = frame_with_outlier();
    let colors = palette::resolve_wide(&f);

    let opts = PlotOptions {
        y_axis_limit: Some(20.0),
        y_axis_start: -1.0,
        ..no_save()
    };
    let report = viz::render_wide(&f, &colors, &opts).unwrap();
    assert_eq!(report.y_range, (-1.0, 20.0));
    assert!((report.ceiling.unwrap() - 6.4).abs() < 1e-9);

    let opts = PlotOptions {
        upper_axis_limit: Some(3.5),
        ..no_save()
    };
    let report = viz::render_wide(&f, &colors, &opts).unwrap();
    assert_eq!(report.ceiling, Some(3.5));
    // five 4s and the 10
    assert_eq!(report.excluded_points, 6);
    assert_eq!(report.y_range, (0.0, 3.5));
}

#[test]
fn y_label_lines_and_categories_reach_the_svg() {
    init_logs();
    let f = frame_with_rows(10);
    let opts = PlotOptions {
        y_label: "PercevalHR 488/405\n(Relative ATP/ADP)".into(),
        ..no_save()
    };
    let report = viz::render_wide(&f, &palette::resolve_wide(&f), &opts).unwrap();
    assert!(report.svg.contains("PercevalHR 488/405"));
    assert!(report.svg.contains("(Relative ATP/ADP)"));
    assert!(report.svg.contains("a1"));
    assert!(report.svg.contains("o1"));
}

#[test]
fn saving_writes_named_pdf() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let f = frame_with_rows(12);
    let opts = PlotOptions {
        exp_name: "Perceval_run1".into(),
        output_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    let report = viz::render_wide(&f, &palette::resolve_wide(&f), &opts).unwrap();
    let out = report.output.clone().expect("saved");
    assert_eq!(out, dir.path().join("Perceval_run1.pdf"));
    assert!(fs::read(&out).unwrap().starts_with(b"%PDF"));
    assert!(report.svg.contains("<svg"));

    // Same name again overwrites silently.
    viz::render_wide(&f, &palette::resolve_wide(&f), &opts).unwrap();
    assert!(out.exists());
}

#[test]
fn unmatched_series_name_is_an_invalid_color() {
    init_logs();
    let f = WideFrame::new(vec![Series::from_values("Z9", &[1.0, 2.0])]);
    let colors = RuleSet::default().resolve_wide(&f.column_names());
    assert_eq!(colors["Z9"], "Z9");
    let e = viz::render_wide(&f, &colors, &no_save()).unwrap_err();
    assert!(matches!(e, Error::InvalidColor(ref s) if s == "Z9"));
}

#[test]
fn misaligned_palettes_are_rejected() {
    init_logs();
    let f = frame_with_rows(5);
    let mut colors = palette::resolve_wide(&f);
    colors.shift_remove("o1");
    assert!(matches!(
        viz::render_wide(&f, &colors, &no_save()),
        Err(Error::PaletteMismatch { expected: 2, found: 1 })
    ));

    let mut renamed = palette::resolve_wide(&f);
    renamed.shift_remove("o1");
    renamed.insert("zz".into(), "#000000".into());
    assert!(matches!(
        viz::render_wide(&f, &renamed, &no_save()),
        Err(Error::MissingColor(ref s)) if s == "o1"
    ));
}

#[test]
fn degenerate_frames_are_errors() {
    init_logs();
    let empty = WideFrame::default();
    assert!(matches!(
        viz::render_wide(&empty, &palette::resolve_wide(&empty), &no_save()),
        Err(Error::EmptyDataset)
    ));

    let all_missing = WideFrame::new(vec![Series::new("a1", vec![None; 3])]);
    assert!(matches!(
        viz::render_wide(&all_missing, &palette::resolve_wide(&all_missing), &no_save()),
        Err(Error::Degenerate(_))
    ));
}

fn tidy_frame() -> TidyFrame {
    let ids = ["y1", "o1", "y1", "o1", "m1", "m1", "y1"];
    let values = vec![
        Some(1.0),
        Some(2.0),
        Some(1.2),
        Some(2.4),
        Some(3.0),
        None,
        Some(0.9),
    ];
    let series = Categorical::with_levels(&ids, vec!["y1".into(), "o1".into(), "m1".into()])
        .unwrap();
    TidyFrame::new(series, values).unwrap()
}

#[test]
fn tidy_entry_points_pick_their_own_look() {
    init_logs();
    let t = tidy_frame();
    let colors = palette::resolve_tidy(&t);
    assert_eq!(colors, vec!["#9FADAD", "#F57171", "#BA55D3"]);

    let swarm = viz::render_tidy_swarm(&t, &colors, &TidyPlotOptions::default()).unwrap();
    assert_swarm_look(&swarm);
    assert_eq!(swarm.ceiling, None);
    assert!(swarm.output.is_none());
    assert_eq!((swarm.width_px, swarm.height_px), (250, 250));

    let strip = viz::render_tidy_strip(&t, &colors, &TidyPlotOptions::default()).unwrap();
    assert_strip_look(&strip);
    assert_eq!(strip.excluded_points, 0);
    assert_eq!(strip.boxes.len(), 3);
    assert_eq!(strip.boxes[2].count, 1);
}

#[test]
fn tidy_renders_are_deterministic() {
    init_logs();
    let t = tidy_frame();
    let colors = palette::resolve_tidy(&t);
    let a = viz::render_tidy_strip(&t, &colors, &TidyPlotOptions::default()).unwrap();
    let b = viz::render_tidy_strip(&t, &colors, &TidyPlotOptions::default()).unwrap();
    assert_eq!(a.svg, b.svg);
}

#[test]
fn tidy_palette_length_must_match_levels() {
    init_logs();
    let t = tidy_frame();
    let colors = vec!["#9FADAD".to_string()];
    assert!(matches!(
        viz::render_tidy_swarm(&t, &colors, &TidyPlotOptions::default()),
        Err(Error::PaletteMismatch { expected: 3, found: 1 })
    ));
}

#[test]
fn tidy_saving_uses_exp_name() {
    init_logs();
    let dir = tempfile::tempdir().unwrap();
    let t = tidy_frame();
    let opts = TidyPlotOptions {
        save: true,
        output_dir: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    let report = viz::render_tidy_swarm(&t, &palette::resolve_tidy(&t), &opts).unwrap();
    let out = dir.path().join("Test_plot.pdf");
    assert_eq!(report.output.as_ref(), Some(&out));
    assert!(fs::read(&out).unwrap().starts_with(b"%PDF"));
}
