//! biosensor_plots
//!
//! Helpers for styled swarm/strip-and-box figures of fluorescent biosensor
//! readouts, plus the small lookups that go with them.
//!
//! ### Features
//! - Regex-rule color palettes for wide columns or tidy category levels
//! - Y-axis label inference from experiment names (PercevalHR, SoNaR, roGFP2, ...)
//! - Figure width presets from the number of series
//! - Swarm + box (small samples) or strip + notched box (30+ rows) rendering to SVG,
//!   saved as vector PDF
//! - CSV loading for wide and long-form data
//!
//! ### Example
//! ```no_run
//! use biosensor_plots::{labels, palette, storage, viz};
//!
//! let frame = storage::load_wide_csv("perceval_run1.csv")?;
//! let colors = palette::resolve_wide(&frame);
//! let opts = viz::PlotOptions {
//!     exp_name: "perceval_run1".into(),
//!     x_fig_size: frame.suggested_width(),
//!     y_label: labels::infer_axis_label("perceval_run1").to_string(),
//!     ..Default::default()
//! };
//! let report = viz::render_wide(&frame, &colors, &opts)?;
//! println!("{:?} -> {:?}", report.path, report.output);
//! # Ok::<(), biosensor_plots::Error>(())
//! ```

pub mod error;
pub mod labels;
pub mod layout;
pub mod models;
pub mod palette;
pub mod stats;
pub mod storage;
pub mod viz;

pub use error::{Error, Result};
pub use models::{Categorical, Series, TidyFrame, WideFrame};
pub use palette::{Palette, PatternColorRule, RuleSet, RuleSpec};
