//! Color parsing, seaborn-style color adjustments, and axis sizing helpers.

use crate::error::{Error, Result};
use plotters::prelude::*;

use super::text::estimate_text_width_px;

/// Parse `#RRGGBB` or `#RGB` into a color.
pub fn parse_color(spec: &str) -> Result<RGBColor> {
    let invalid = || Error::InvalidColor(spec.to_string());
    let hex = spec.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    match hex.len() {
        6 => Ok(RGBColor(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let d = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Ok(RGBColor(d(0)?, d(1)?, d(2)?))
        }
        _ => Err(invalid()),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hls {
    pub h: f64, // 0..1
    pub l: f64, // 0..1
    pub s: f64, // 0..1
}

pub fn rgb_to_hls(c: RGBColor) -> Hls {
    let r = c.0 as f64 / 255.0;
    let g = c.1 as f64 / 255.0;
    let b = c.2 as f64 / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if max == min {
        return Hls { h: 0.0, l, s: 0.0 };
    }
    let d = max - min;
    let s = if l <= 0.5 {
        d / (max + min)
    } else {
        d / (2.0 - max - min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    Hls { h: h / 6.0, l, s }
}

pub fn hls_to_rgb(hls: Hls) -> RGBColor {
    let Hls { h, l, s } = hls;
    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return RGBColor(v, v, v);
    }
    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 1.0 / 2.0 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    }

    let to_u8 = |x: f64| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
    RGBColor(
        to_u8(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        to_u8(hue_to_rgb(p, q, h)),
        to_u8(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    )
}

/// Scale saturation by `prop` (seaborn's box `saturation`).
pub fn desaturate(c: RGBColor, prop: f64) -> RGBColor {
    let mut hls = rgb_to_hls(c);
    hls.s = (hls.s * prop).clamp(0.0, 1.0);
    hls_to_rgb(hls)
}

/// Shared gray for box outlines: 0.6 x the darkest box lightness.
pub fn box_line_gray(fills: &[RGBColor]) -> RGBColor {
    let lum = fills
        .iter()
        .map(|c| rgb_to_hls(*c).l)
        .fold(f64::INFINITY, f64::min);
    let lum = if lum.is_finite() { lum * 0.6 } else { 0.25 };
    let v = (lum * 255.0).round() as u8;
    RGBColor(v, v, v)
}

/// Tick label text for the y axis; precision shrinks as magnitude grows.
pub fn format_tick(v: f64) -> String {
    let a = v.abs();
    let prec = if a >= 100.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    };
    format!("{:.*}", prec, v)
}

/// Left label area width (px): widest tick label, the y label lines, and padding.
pub fn compute_left_label_area_px(
    ymin: f64,
    ymax: f64,
    ticks: usize,
    font_px: u32,
    label_lines: usize,
    tick_pad_px: u32,
) -> u32 {
    let mut max_px = 0u32;
    for i in 0..=ticks {
        let t = if ticks == 0 {
            0.0
        } else {
            i as f64 / ticks as f64
        };
        let s = format_tick(ymin + (ymax - ymin) * t);
        max_px = max_px.max(estimate_text_width_px(&s, font_px));
    }
    let label_px = label_lines as u32 * (font_px + 2);
    (max_px + label_px + tick_pad_px + 10).clamp(24, 200)
}
