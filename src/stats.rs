use crate::error::{Error, Result};
use crate::models::WideFrame;
use serde::{Deserialize, Serialize};

/// Multiplier on the IQR above Q3 for the strip-plot outlier ceiling.
pub const DEFAULT_CEILING_FACTOR: f64 = 1.7;
/// Whisker reach, in IQRs beyond the box.
pub const WHISKER_FACTOR: f64 = 1.5;
/// Notch half-width constant (median ± 1.57 IQR / √n).
pub const NOTCH_FACTOR: f64 = 1.57;

/// Linear-interpolated quantile of **sorted** data, rank `(n - 1) * q`.
pub fn quantile(sorted: &[f64], q: f64) -> Result<f64> {
    if sorted.is_empty() {
        return Err(Error::Degenerate("quantile of empty data".into()));
    }
    let q = q.clamp(0.0, 1.0);
    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let d = rank - lo as f64;
    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * d)
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    v.sort_by(f64::total_cmp);
    v
}

/// `Q3 + factor * IQR` of one series.
pub fn series_ceiling(values: &[f64], factor: f64) -> Result<f64> {
    let v = sorted_finite(values);
    let q1 = quantile(&v, 0.25)?;
    let q3 = quantile(&v, 0.75)?;
    Ok(q3 + (q3 - q1) * factor)
}

/// Largest per-column ceiling; columns without finite data are skipped.
pub fn outlier_ceiling(frame: &WideFrame, factor: f64) -> Result<f64> {
    if frame.n_columns() == 0 {
        return Err(Error::EmptyDataset);
    }
    frame
        .columns()
        .iter()
        .map(|c| c.finite_values())
        .filter(|v| !v.is_empty())
        .map(|v| series_ceiling(&v, factor))
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .reduce(f64::max)
        .ok_or_else(|| Error::Degenerate("no column has finite values".into()))
}

/// Box-and-whisker summary of one series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Lowest datum within `WHISKER_FACTOR * IQR` below Q1.
    pub whisker_low: f64,
    /// Highest datum within `WHISKER_FACTOR * IQR` above Q3.
    pub whisker_high: f64,
    pub notch_low: f64,
    pub notch_high: f64,
}

impl BoxSummary {
    pub fn from_values(values: &[f64]) -> Result<Self> {
        let v = sorted_finite(values);
        let q1 = quantile(&v, 0.25)?;
        let median = quantile(&v, 0.5)?;
        let q3 = quantile(&v, 0.75)?;
        let iqr = q3 - q1;

        let lo_fence = q1 - WHISKER_FACTOR * iqr;
        let hi_fence = q3 + WHISKER_FACTOR * iqr;
        // Whiskers never fall inside the box.
        let whisker_low = v
            .iter()
            .copied()
            .find(|x| *x >= lo_fence)
            .map_or(q1, |x| x.min(q1));
        let whisker_high = v
            .iter()
            .rev()
            .copied()
            .find(|x| *x <= hi_fence)
            .map_or(q3, |x| x.max(q3));

        let half_notch = NOTCH_FACTOR * iqr / (v.len() as f64).sqrt();

        Ok(Self {
            count: v.len(),
            min: v[0],
            q1,
            median,
            q3,
            max: v[v.len() - 1],
            whisker_low,
            whisker_high,
            notch_low: median - half_notch,
            notch_high: median + half_notch,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Series;

    #[test]
    fn quantile_interpolates_linearly() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&v, 0.0).unwrap(), 1.0);
        assert_eq!(quantile(&v, 1.0).unwrap(), 4.0);
        assert!((quantile(&v, 0.25).unwrap() - 1.75).abs() < 1e-12);
        assert!((quantile(&v, 0.5).unwrap() - 2.5).abs() < 1e-12);
        assert_eq!(quantile(&[7.0], 0.75).unwrap(), 7.0);
    }

    #[test]
    fn quantile_of_nothing_is_degenerate() {
        assert!(matches!(quantile(&[], 0.5), Err(Error::Degenerate(_))));
    }

    #[test]
    fn ceiling_is_q3_plus_1_7_iqr() {
        // Q1 = 1, Q3 = 3
        let c = series_ceiling(&[0.0, 1.0, 2.0, 3.0, 4.0], DEFAULT_CEILING_FACTOR).unwrap();
        assert!((c - 6.4).abs() < 1e-12);
    }

    #[test]
    fn frame_ceiling_takes_the_max_and_skips_empty_columns() {
        let f = WideFrame::new(vec![
            Series::from_values("a1", &[0.0, 1.0, 2.0, 3.0, 4.0]),
            Series::from_values("o1", &[10.0, 10.0, 10.0, 10.0, 10.0]),
            Series::new("b1", vec![None; 5]),
        ]);
        assert_eq!(outlier_ceiling(&f, DEFAULT_CEILING_FACTOR).unwrap(), 10.0);
    }

    #[test]
    fn frame_ceiling_errors() {
        assert!(matches!(
            outlier_ceiling(&WideFrame::default(), 1.7),
            Err(Error::EmptyDataset)
        ));
        let all_missing = WideFrame::new(vec![Series::new("a1", vec![None, None])]);
        assert!(matches!(
            outlier_ceiling(&all_missing, 1.7),
            Err(Error::Degenerate(_))
        ));
    }

    #[test]
    fn box_summary_whiskers_stop_at_fences() {
        let b = BoxSummary::from_values(&[0.0, 1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        // q1 = 1.25, q3 = 3.75, iqr = 2.5, upper fence = 7.5
        assert!((b.q1 - 1.25).abs() < 1e-12);
        assert!((b.q3 - 3.75).abs() < 1e-12);
        assert_eq!(b.whisker_high, 4.0);
        assert_eq!(b.whisker_low, 0.0);
        assert_eq!(b.max, 100.0);
        assert_eq!(b.count, 6);
        assert!(b.notch_low < b.median && b.median < b.notch_high);
    }
}
