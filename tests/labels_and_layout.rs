use biosensor_plots::labels::{self, infer_axis_label};
use biosensor_plots::layout::{width_from_column_count, width_from_palette_length};
use biosensor_plots::models::{Series, WideFrame};
use biosensor_plots::palette;

#[test]
fn known_sensors() {
    assert_eq!(
        infer_axis_label("Perceval_sensor"),
        "PercevalHR 488/405\n(Relative ATP/ADP)"
    );
    assert_eq!(
        infer_axis_label("cepia3mt_MitoTdTomato"),
        labels::CEPIA_MITOTD_LABEL
    );
    assert_eq!(infer_axis_label("unknown_probe"), "y_axis_label");
    assert_eq!(infer_axis_label("HeLa_cpYFP"), "CpYFP 405/488");
}

#[test]
fn width_presets() {
    assert_eq!(width_from_column_count(3), 1.5);
    assert_eq!(width_from_column_count(4), 2.5);
    assert_eq!(width_from_column_count(5), 3.75);
    assert_eq!(width_from_column_count(0), 1.5);
}

#[test]
fn frame_and_palette_widths_agree() {
    let f = WideFrame::new(
        ["a1", "o1", "c1", "r1"]
            .iter()
            .map(|n| Series::from_values(*n, &[1.0, 2.0]))
            .collect(),
    );
    let p = palette::resolve_wide(&f);
    assert_eq!(f.suggested_width(), 2.5);
    assert_eq!(width_from_palette_length(p.len()), f.suggested_width());
}
