//! Public option, style, and report types for the plot composer.

use crate::error::Result;
use crate::stats::BoxSummary;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Row count at which the wide composer switches from swarm to strip.
pub const STRIP_MIN_ROWS: usize = 30;

/// Which point layer a figure was drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderPath {
    /// Non-overlapping swarm under-laid by plain boxes.
    Swarm,
    /// Jittered strip beneath notched boxes.
    Strip,
}

/// Process-wide rendering configuration, installed once via [`super::init_style`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub font_family: String,
    /// Tick label font size (pt).
    pub tick_font_pt: f64,
    /// Axis label font size (pt).
    pub label_font_pt: f64,
    /// Stroke of the left/bottom spines; tick marks share it.
    pub spine_width: f64,
    pub tick_size_px: i32,
    /// Gap between tick marks and their labels (pt).
    pub tick_pad_pt: f64,
    pub dpi: f64,
    /// Leave the background unpainted.
    pub transparent: bool,
    /// Outer margin (px) around the axes.
    pub margin_px: u32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".into(),
            tick_font_pt: 12.0,
            label_font_pt: 12.0,
            spine_width: 1.0,
            tick_size_px: 4,
            tick_pad_pt: 1.0,
            dpi: 100.0,
            transparent: true,
            margin_px: 4,
        }
    }
}

impl StyleConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Points to pixels at this style's dpi.
    pub fn pt_to_px(&self, pt: f64) -> f64 {
        pt * self.dpi / 72.0
    }
}

/// Options for the wide-frame composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    /// File stem of the saved figure.
    pub exp_name: String,
    pub x_fig_size: f64,
    pub y_fig_size: f64,
    pub scale: f64,
    pub y_label: String,
    /// Explicit y-axis top; overrides the computed ceiling.
    pub y_axis_limit: Option<f64>,
    pub y_axis_start: f64,
    /// Explicit strip-path outlier ceiling.
    pub upper_axis_limit: Option<f64>,
    pub save: bool,
    /// Directory for the saved figure; `None` means the working directory.
    pub output_dir: Option<PathBuf>,
    pub jitter_seed: u64,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            exp_name: "Test".into(),
            x_fig_size: 3.75,
            y_fig_size: 2.5,
            scale: 1.0,
            y_label: "not set".into(),
            y_axis_limit: None,
            y_axis_start: 0.0,
            upper_axis_limit: None,
            save: true,
            output_dir: None,
            jitter_seed: 0,
        }
    }
}

/// Options for the two tidy entry points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TidyPlotOptions {
    pub exp_name: String,
    pub x_fig_size: f64,
    pub y_fig_size: f64,
    pub scale: f64,
    pub y_axis_start: f64,
    pub y_axis_limit: Option<f64>,
    pub y_label: String,
    pub save: bool,
    pub output_dir: Option<PathBuf>,
    pub jitter_seed: u64,
}

impl Default for TidyPlotOptions {
    fn default() -> Self {
        Self {
            exp_name: "Test_plot".into(),
            x_fig_size: 2.5,
            y_fig_size: 2.5,
            scale: 1.0,
            y_axis_start: 0.0,
            y_axis_limit: None,
            y_label: "set y label".into(),
            save: false,
            output_dir: None,
            jitter_seed: 0,
        }
    }
}

/// Point layer look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLayer {
    pub alpha: f64,
    /// Marker diameter (pt).
    pub size_pt: f64,
    pub edge_width: f64,
    /// Strip jitter half-range in category units; 0 selects the swarm layout.
    pub jitter: f64,
}

/// Box layer look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxLayer {
    pub saturation: f64,
    pub line_width: f64,
    pub notch: bool,
    pub fill_alpha: f64,
    /// Box width as a fraction of the category slot.
    pub width: f64,
}

pub const SWARM_POINTS: PointLayer = PointLayer {
    alpha: 0.8,
    size_pt: 5.0,
    edge_width: 0.5,
    jitter: 0.0,
};

pub const STRIP_POINTS: PointLayer = PointLayer {
    alpha: 0.2,
    size_pt: 5.0,
    edge_width: 0.5,
    jitter: 0.3,
};

pub const PLAIN_BOXES: BoxLayer = BoxLayer {
    saturation: 0.9,
    line_width: 1.5,
    notch: false,
    fill_alpha: 0.5,
    width: 0.8,
};

pub const NOTCHED_BOXES: BoxLayer = BoxLayer {
    saturation: 0.9,
    line_width: 1.5,
    notch: true,
    fill_alpha: 0.8,
    width: 0.8,
};

/// What a render produced.
#[derive(Debug, Clone)]
pub struct RenderReport {
    pub path: RenderPath,
    pub point_layer: PointLayer,
    pub box_layer: BoxLayer,
    /// Points were drawn over the boxes (swarm) rather than under them (strip).
    pub points_on_top: bool,
    /// Final y-axis range (bottom, top).
    pub y_range: (f64, f64),
    /// Computed or supplied strip ceiling (strip path of the wide composer only).
    pub ceiling: Option<f64>,
    /// Points left out of the strip layer for lying at or above the ceiling.
    pub excluded_points: usize,
    pub boxes: Vec<BoxSummary>,
    pub width_px: u32,
    pub height_px: u32,
    pub svg: String,
    /// Saved PDF, when `save` was set.
    pub output: Option<PathBuf>,
}
