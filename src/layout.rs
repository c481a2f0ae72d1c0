//! Figure width presets, keyed by how many series are drawn.

/// Width (inches) for up to three series.
pub const NARROW_WIDTH: f64 = 1.5;
/// Width (inches) for exactly four series.
pub const MEDIUM_WIDTH: f64 = 2.5;
/// Width (inches) for five or more series.
pub const WIDE_WIDTH: f64 = 3.75;

fn width_for(n: usize) -> f64 {
    if n <= 3 {
        NARROW_WIDTH
    } else if n < 5 {
        MEDIUM_WIDTH
    } else {
        WIDE_WIDTH
    }
}

/// Width preset from a dataset's column count.
pub fn width_from_column_count(n: usize) -> f64 {
    width_for(n)
}

/// Width preset from a palette's length; same tiers as [`width_from_column_count`].
pub fn width_from_palette_length(n: usize) -> f64 {
    width_for(n)
}
