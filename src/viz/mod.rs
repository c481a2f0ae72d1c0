//! Plot composer: per-point layer (swarm or jittered strip) overlaid with box summaries.
//!
//! - [`render_wide`] picks the layer from the row count: fewer than
//!   [`STRIP_MIN_ROWS`] rows draws a swarm over plain boxes, otherwise a
//!   jittered strip of the sub-ceiling points under notched boxes.
//! - [`render_tidy_swarm`] and [`render_tidy_strip`] take a long-form frame and
//!   apply one of the two looks unconditionally.
//!
//! Figures are rendered to SVG in memory and returned in a [`RenderReport`];
//! with `save` set they are also converted to PDF and written to `<exp_name>.pdf`.

pub mod swarm;
pub mod text;
pub mod types;
pub mod util;

pub use types::{
    BoxLayer, PlotOptions, PointLayer, RenderPath, RenderReport, STRIP_MIN_ROWS, StyleConfig,
    TidyPlotOptions,
};

use crate::error::{Error, Result};
use crate::models::{TidyFrame, WideFrame};
use crate::palette::Palette;
use crate::stats::{self, BoxSummary, DEFAULT_CEILING_FACTOR};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::FontTransform;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use plotters_svg::SVGBackend;
use svg2pdf::usvg::{self, fontdb};
use svg2pdf::{ConversionOptions, PageOptions};

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, OnceLock};

use swarm::{beeswarm_offsets, jitter_offsets};
use text::{label_lines, truncate_to_width};
use types::{NOTCHED_BOXES, PLAIN_BOXES, STRIP_POINTS, SWARM_POINTS};
use util::{box_line_gray, compute_left_label_area_px, desaturate, format_tick, parse_color};

const Y_TICKS: usize = 6;
const POINT_EDGE: RGBColor = RGBColor(128, 128, 128);

static STYLE: OnceLock<StyleConfig> = OnceLock::new();

/// System fonts for PDF export, loaded on first save.
static FONTS: LazyLock<Arc<fontdb::Database>> = LazyLock::new(|| {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    let sans = fontdb::Query {
        families: &[fontdb::Family::SansSerif],
        ..Default::default()
    };
    // Fall back to any installed family so axis text is not dropped.
    if db.query(&sans).is_none() {
        let first = db
            .faces()
            .find_map(|f| f.families.first().map(|(n, _)| n.clone()));
        if let Some(name) = first {
            db.set_sans_serif_family(name);
        }
    }
    log::debug!("loaded {} font faces for PDF export", db.len());
    Arc::new(db)
});

/// Install the process-wide style. Only the first call succeeds; renders that
/// run before any call install [`StyleConfig::default`].
pub fn init_style(style: StyleConfig) -> Result<()> {
    STYLE
        .set(style)
        .map_err(|_| Error::StyleAlreadyInitialized)?;
    log::info!("plot style initialized: {:?}", current_style());
    Ok(())
}

/// The active process-wide style.
pub fn current_style() -> &'static StyleConfig {
    STYLE.get_or_init(StyleConfig::default)
}

/// One category (box + points) ready to draw.
struct Category {
    name: String,
    color: RGBColor,
    summary: Option<BoxSummary>,
    /// Values drawn in the point layer.
    points: Vec<f64>,
}

struct Figure<'a> {
    categories: Vec<Category>,
    points: PointLayer,
    boxes: BoxLayer,
    points_on_top: bool,
    y_range: (f64, f64),
    y_label: &'a str,
    size_px: (u32, u32),
    jitter_seed: u64,
}

/// Render a wide frame, choosing swarm or strip by row count.
pub fn render_wide(
    frame: &WideFrame,
    palette: &Palette,
    opts: &PlotOptions,
) -> Result<RenderReport> {
    if frame.n_columns() == 0 {
        return Err(Error::EmptyDataset);
    }
    if palette.len() != frame.n_columns() {
        return Err(Error::PaletteMismatch {
            expected: frame.n_columns(),
            found: palette.len(),
        });
    }
    let style = current_style();

    let mut categories = Vec::with_capacity(frame.n_columns());
    for col in frame.columns() {
        let spec = palette
            .get(&col.name)
            .ok_or_else(|| Error::MissingColor(col.name.clone()))?;
        let values = col.finite_values();
        categories.push(Category {
            name: col.name.clone(),
            color: parse_color(spec)?,
            summary: summarize(&values)?,
            points: values,
        });
    }
    ensure_some_data(&categories)?;

    let path = if frame.rows() < STRIP_MIN_ROWS {
        RenderPath::Swarm
    } else {
        RenderPath::Strip
    };
    log::debug!(
        "render_wide {:?}: {} rows x {} series -> {:?}",
        opts.exp_name,
        frame.rows(),
        frame.n_columns(),
        path
    );

    let mut ceiling = None;
    let mut excluded_points = 0usize;
    let (points, boxes, points_on_top, top) = match path {
        RenderPath::Swarm => {
            let top = opts
                .y_axis_limit
                .unwrap_or_else(|| autoscale_top(&categories));
            (SWARM_POINTS, PLAIN_BOXES, true, top)
        }
        RenderPath::Strip => {
            let limit = match opts.upper_axis_limit {
                Some(v) => v,
                None => stats::outlier_ceiling(frame, DEFAULT_CEILING_FACTOR)?,
            };
            log::debug!("strip ceiling = {limit}");
            for cat in categories.iter_mut() {
                let before = cat.points.len();
                cat.points.retain(|v| *v < limit);
                excluded_points += before - cat.points.len();
            }
            ceiling = Some(limit);
            let top = opts.y_axis_limit.unwrap_or(limit);
            (STRIP_POINTS, NOTCHED_BOXES, false, top)
        }
    };

    let fig = Figure {
        categories,
        points,
        boxes,
        points_on_top,
        y_range: y_range(opts.y_axis_start, top),
        y_label: &opts.y_label,
        size_px: size_px(opts.x_fig_size, opts.y_fig_size, opts.scale, style),
        jitter_seed: opts.jitter_seed,
    };
    let save = Save {
        enabled: opts.save,
        dir: opts.output_dir.as_deref(),
        exp_name: &opts.exp_name,
    };
    finish(fig, path, ceiling, excluded_points, style, save)
}

/// Tidy frame drawn as a swarm over translucent plain boxes.
pub fn render_tidy_swarm(
    frame: &TidyFrame,
    palette: &[String],
    opts: &TidyPlotOptions,
) -> Result<RenderReport> {
    render_tidy(frame, palette, opts, RenderPath::Swarm)
}

/// Tidy frame drawn as a jittered strip under notched boxes.
pub fn render_tidy_strip(
    frame: &TidyFrame,
    palette: &[String],
    opts: &TidyPlotOptions,
) -> Result<RenderReport> {
    render_tidy(frame, palette, opts, RenderPath::Strip)
}

fn render_tidy(
    frame: &TidyFrame,
    palette: &[String],
    opts: &TidyPlotOptions,
    path: RenderPath,
) -> Result<RenderReport> {
    let levels = frame.levels();
    if levels.is_empty() {
        return Err(Error::EmptyDataset);
    }
    if palette.len() != levels.len() {
        return Err(Error::PaletteMismatch {
            expected: levels.len(),
            found: palette.len(),
        });
    }
    let style = current_style();

    let categories = levels
        .iter()
        .zip(palette)
        .enumerate()
        .map(|(i, (name, spec))| {
            let values = frame.values_for_level(i);
            Ok(Category {
                name: name.clone(),
                color: parse_color(spec)?,
                summary: summarize(&values)?,
                points: values,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    ensure_some_data(&categories)?;
    log::debug!(
        "render_tidy {:?}: {} rows, {} levels -> {:?}",
        opts.exp_name,
        frame.rows(),
        levels.len(),
        path
    );

    let (points, boxes, points_on_top) = match path {
        RenderPath::Swarm => (SWARM_POINTS, PLAIN_BOXES, true),
        RenderPath::Strip => (STRIP_POINTS, NOTCHED_BOXES, false),
    };
    let top = opts
        .y_axis_limit
        .unwrap_or_else(|| autoscale_top(&categories));

    let fig = Figure {
        categories,
        points,
        boxes,
        points_on_top,
        y_range: y_range(opts.y_axis_start, top),
        y_label: &opts.y_label,
        size_px: size_px(opts.x_fig_size, opts.y_fig_size, opts.scale, style),
        jitter_seed: opts.jitter_seed,
    };
    let save = Save {
        enabled: opts.save,
        dir: opts.output_dir.as_deref(),
        exp_name: &opts.exp_name,
    };
    finish(fig, path, None, 0, style, save)
}

// ------------------------ Shared pipeline ------------------------

struct Save<'a> {
    enabled: bool,
    dir: Option<&'a Path>,
    exp_name: &'a str,
}

fn summarize(values: &[f64]) -> Result<Option<BoxSummary>> {
    if values.is_empty() {
        Ok(None)
    } else {
        BoxSummary::from_values(values).map(Some)
    }
}

fn ensure_some_data(categories: &[Category]) -> Result<()> {
    if categories.iter().all(|c| c.summary.is_none()) {
        return Err(Error::Degenerate("every series is empty".into()));
    }
    Ok(())
}

/// Data maximum plus a 5% margin of the data span.
fn autoscale_top(categories: &[Category]) -> f64 {
    let (lo, hi) = categories
        .iter()
        .filter_map(|c| c.summary)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), b| {
            (lo.min(b.min), hi.max(b.max))
        });
    let span = hi - lo;
    if span > 0.0 {
        hi + 0.05 * span
    } else {
        hi + 0.05 * hi.abs().max(1.0)
    }
}

fn y_range(bottom: f64, top: f64) -> (f64, f64) {
    if top > bottom {
        (bottom, top)
    } else {
        (bottom, bottom + 1.0)
    }
}

fn size_px(x_in: f64, y_in: f64, scale: f64, style: &StyleConfig) -> (u32, u32) {
    let px = |inches: f64| ((inches * scale * style.dpi).round() as u32).max(1);
    (px(x_in), px(y_in))
}

fn finish(
    fig: Figure<'_>,
    path: RenderPath,
    ceiling: Option<f64>,
    excluded_points: usize,
    style: &StyleConfig,
    save: Save<'_>,
) -> Result<RenderReport> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, fig.size_px).into_drawing_area();
        draw_figure(root, &fig, style)?;
    }

    let output = if save.enabled {
        Some(write_figure(&svg, save.dir, save.exp_name)?)
    } else {
        None
    };

    Ok(RenderReport {
        path,
        point_layer: fig.points,
        box_layer: fig.boxes,
        points_on_top: fig.points_on_top,
        y_range: fig.y_range,
        ceiling,
        excluded_points,
        boxes: fig.categories.iter().filter_map(|c| c.summary).collect(),
        width_px: fig.size_px.0,
        height_px: fig.size_px.1,
        svg,
        output,
    })
}

/// Write `<exp_name>.pdf` into `dir` (or the working directory), replacing any existing file.
fn write_figure(svg: &str, dir: Option<&Path>, exp_name: &str) -> Result<PathBuf> {
    let path = dir
        .unwrap_or_else(|| Path::new("."))
        .join(format!("{exp_name}.pdf"));
    std::fs::write(&path, svg_to_pdf(svg)?)?;
    log::info!("wrote figure to {}", path.display());
    Ok(path)
}

/// Vector PDF of an SVG document. The page is the SVG canvas, so an unpainted
/// background stays transparent.
pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>> {
    let options = usvg::Options {
        fontdb: Arc::clone(&FONTS),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg, &options).map_err(Error::pdf)?;
    let pdf = svg2pdf::to_pdf(&tree, ConversionOptions::default(), PageOptions::default());
    pdf.map_err(Error::pdf)
}

// ------------------------ Drawing ------------------------

fn draw_figure<DB>(
    root: DrawingArea<DB, Shift>,
    fig: &Figure<'_>,
    style: &StyleConfig,
) -> Result<()>
where
    DB: DrawingBackend,
{
    if !style.transparent {
        root.fill(&WHITE).map_err(Error::render)?;
    }

    let n = fig.categories.len();
    let (y0, y1) = fig.y_range;
    let family = style.font_family.as_str();
    let tick_px = style.pt_to_px(style.tick_font_pt);
    let label_px = style.pt_to_px(style.label_font_pt);
    let pad_px = style.pt_to_px(style.tick_pad_pt).round() as u32;
    let spine = (style.spine_width.round() as u32).max(1);
    let lines = label_lines(fig.y_label);

    let left_area =
        compute_left_label_area_px(y0, y1, Y_TICKS, tick_px as u32, lines.len(), pad_px);
    let bottom_area = tick_px.ceil() as u32 + style.tick_size_px.max(0) as u32 + pad_px + 6;

    let mut chart = ChartBuilder::on(&root)
        .margin(style.margin_px)
        .set_label_area_size(LabelAreaPosition::Left, left_area)
        .set_label_area_size(LabelAreaPosition::Bottom, bottom_area)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y0..y1)
        .map_err(Error::render)?;

    // Category slot width in pixels, used by the swarm and tick labels.
    let slot_px = (chart.backend_coord(&(1.0, y0)).0 - chart.backend_coord(&(0.0, y0)).0)
        .unsigned_abs()
        .max(1);

    let names: Vec<String> = fig
        .categories
        .iter()
        .map(|c| truncate_to_width(&c.name, tick_px as u32, slot_px))
        .collect();
    let x_label_fmt = |x: &f64| {
        let i = x.round();
        if (x - i).abs() < 1e-6 && i >= 0.0 && (i as usize) < names.len() {
            names[i as usize].clone()
        } else {
            String::new()
        }
    };
    let y_label_fmt = |v: &f64| format_tick(*v);

    // Only the left and bottom spines exist; there is no top/right frame to remove.
    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(Y_TICKS)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((family, tick_px))
        .axis_style(BLACK.stroke_width(spine))
        .set_all_tick_mark_size(style.tick_size_px)
        .draw()
        .map_err(Error::render)?;

    if fig.points_on_top {
        draw_boxes(&mut chart, fig)?;
        draw_points(&mut chart, fig, style, slot_px as f64)?;
    } else {
        draw_points(&mut chart, fig, style, slot_px as f64)?;
        draw_boxes(&mut chart, fig)?;
    }

    // Rotated y label, one column per line, centred on the plotting area.
    let (_, y_px) = chart.plotting_area().get_pixel_range();
    let mid_y = (y_px.start + y_px.end) / 2;
    let line_h = label_px.ceil() as i32 + 2;
    let font = (family, label_px)
        .into_font()
        .transform(FontTransform::Rotate270);
    let text_style = TextStyle::from(font).pos(Pos::new(HPos::Center, VPos::Center));
    for (i, line) in lines.iter().enumerate() {
        let x = style.margin_px as i32 + i as i32 * line_h + line_h / 2;
        root.draw(&Text::new(line.to_string(), (x, mid_y), text_style.clone()))
            .map_err(Error::render)?;
    }

    root.present().map_err(Error::render)?;
    Ok(())
}

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn draw_boxes<DB: DrawingBackend>(chart: &mut Chart<'_, DB>, fig: &Figure<'_>) -> Result<()> {
    let layer = fig.boxes;
    let fills: Vec<RGBColor> = fig
        .categories
        .iter()
        .map(|c| desaturate(c.color, layer.saturation))
        .collect();
    let gray = box_line_gray(&fills);
    let line = gray.stroke_width((layer.line_width.round() as u32).max(1));
    let h = layer.width / 2.0;

    for (i, (cat, fill)) in fig.categories.iter().zip(&fills).enumerate() {
        let Some(b) = cat.summary else { continue };
        let b = clamp_summary(b, fig.y_range);
        let x = i as f64;

        let outline: Vec<(f64, f64)> = if layer.notch {
            vec![
                (x - h, b.q1),
                (x + h, b.q1),
                (x + h, b.notch_low),
                (x + h / 2.0, b.median),
                (x + h, b.notch_high),
                (x + h, b.q3),
                (x - h, b.q3),
                (x - h, b.notch_high),
                (x - h / 2.0, b.median),
                (x - h, b.notch_low),
            ]
        } else {
            vec![(x - h, b.q1), (x + h, b.q1), (x + h, b.q3), (x - h, b.q3)]
        };
        let median_half = if layer.notch { h / 2.0 } else { h };

        let mut closed = outline.clone();
        closed.push(outline[0]);

        chart
            .draw_series(std::iter::once(Polygon::new(
                outline,
                fill.mix(layer.fill_alpha).filled(),
            )))
            .map_err(Error::render)?;
        let (cap_lo, cap_hi) = (x - h / 2.0, x + h / 2.0);
        let segments = [
            closed,
            vec![(x - median_half, b.median), (x + median_half, b.median)],
            vec![(x, b.q1), (x, b.whisker_low)],
            vec![(x, b.q3), (x, b.whisker_high)],
            vec![(cap_lo, b.whisker_low), (cap_hi, b.whisker_low)],
            vec![(cap_lo, b.whisker_high), (cap_hi, b.whisker_high)],
        ];
        chart
            .draw_series(segments.map(|pts| PathElement::new(pts, line)))
            .map_err(Error::render)?;
    }
    Ok(())
}

/// Pin box geometry to the visible y-range so nothing is drawn over the axes.
fn clamp_summary(b: BoxSummary, (y0, y1): (f64, f64)) -> BoxSummary {
    let c = |v: f64| v.clamp(y0, y1);
    BoxSummary {
        q1: c(b.q1),
        median: c(b.median),
        q3: c(b.q3),
        whisker_low: c(b.whisker_low),
        whisker_high: c(b.whisker_high),
        notch_low: c(b.notch_low),
        notch_high: c(b.notch_high),
        ..b
    }
}

fn draw_points<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    fig: &Figure<'_>,
    style: &StyleConfig,
    slot_px: f64,
) -> Result<()> {
    let layer = fig.points;
    let (y0, y1) = fig.y_range;
    let radius = (style.pt_to_px(layer.size_pt) / 2.0).max(1.0);
    let edge = ShapeStyle {
        color: POINT_EDGE.mix(layer.alpha),
        filled: false,
        stroke_width: (layer.edge_width.round() as u32).max(1),
    };
    let max_offset_px = slot_px * fig.boxes.width / 2.0;

    for (i, cat) in fig.categories.iter().enumerate() {
        let ys: Vec<f64> = cat
            .points
            .iter()
            .copied()
            .filter(|v| *v >= y0 && *v <= y1)
            .collect();
        if ys.is_empty() {
            continue;
        }

        let offsets: Vec<f64> = if layer.jitter > 0.0 {
            let seed = fig.jitter_seed.wrapping_add(i as u64);
            jitter_offsets(ys.len(), layer.jitter, seed)
        } else {
            let ys_px: Vec<f64> = ys
                .iter()
                .map(|y| chart.backend_coord(&(i as f64, *y)).1 as f64)
                .collect();
            let (px, clamped) = beeswarm_offsets(&ys_px, radius, max_offset_px);
            if clamped > 0 {
                log::warn!(
                    "{:.0}% of the points in {:?} cannot be placed; they sit at the box edge",
                    100.0 * clamped as f64 / ys.len() as f64,
                    cat.name
                );
            }
            px.into_iter().map(|o| o / slot_px).collect()
        };

        let fill = cat.color.mix(layer.alpha).filled();
        let r = radius.round() as i32;
        let coords: Vec<(f64, f64)> = ys
            .iter()
            .zip(offsets)
            .map(|(y, dx)| (i as f64 + dx, *y))
            .collect();
        chart
            .draw_series(coords.iter().map(|c| Circle::new(*c, r, fill)))
            .map_err(Error::render)?;
        chart
            .draw_series(coords.iter().map(|c| Circle::new(*c, r, edge)))
            .map_err(Error::render)?;
    }
    Ok(())
}
