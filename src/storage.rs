use crate::error::{Error, Result};
use crate::models::{Categorical, Series, TidyFrame, WideFrame};
use csv::{ReaderBuilder, WriterBuilder};
use std::path::Path;

fn parse_cell(raw: &str, column: &str, row: usize) -> Result<Option<f64>> {
    let t = raw.trim();
    if t.is_empty() || t.eq_ignore_ascii_case("nan") || t.eq_ignore_ascii_case("na") {
        return Ok(None);
    }
    t.parse::<f64>().map(Some).map_err(|_| Error::Parse {
        column: column.to_string(),
        row,
        value: raw.to_string(),
    })
}

/// Load a wide CSV: header = series names, each row one replicate.
pub fn load_wide_csv<P: AsRef<Path>>(path: P) -> Result<WideFrame> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let names: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); names.len()];
    for (row, rec) in rdr.records().enumerate() {
        let rec = rec?;
        for (col, name) in names.iter().enumerate() {
            let cell = rec.get(col).unwrap_or("");
            values[col].push(parse_cell(cell, name, row + 1)?);
        }
    }
    Ok(WideFrame::new(
        names
            .into_iter()
            .zip(values)
            .map(|(n, v)| Series::new(n, v))
            .collect(),
    ))
}

/// Load a long-form CSV with a series-identifier column and a value column.
///
/// With `levels = None` the category levels are the sorted unique identifiers.
pub fn load_tidy_csv<P: AsRef<Path>>(
    path: P,
    series_col: &str,
    value_col: &str,
    levels: Option<Vec<String>>,
) -> Result<TidyFrame> {
    let mut rdr = ReaderBuilder::new().from_path(path)?;
    let headers = rdr.headers()?.clone();
    let find = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| Error::Parse {
                column: name.to_string(),
                row: 0,
                value: "<missing column>".to_string(),
            })
    };
    let s_idx = find(series_col)?;
    let v_idx = find(value_col)?;

    let mut ids: Vec<String> = Vec::new();
    let mut values: Vec<Option<f64>> = Vec::new();
    for (row, rec) in rdr.records().enumerate() {
        let rec = rec?;
        ids.push(rec.get(s_idx).unwrap_or("").trim().to_string());
        let value = parse_cell(rec.get(v_idx).unwrap_or(""), value_col, row + 1)?;
        values.push(value);
    }

    let series = match levels {
        Some(l) => Categorical::with_levels(&ids, l)?,
        None => Categorical::from_values(&ids),
    };
    TidyFrame::new(series, values)
}

/// Save a wide frame as CSV; missing values become empty cells.
pub fn save_wide_csv<P: AsRef<Path>>(frame: &WideFrame, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(frame.column_names())?;
    for row in 0..frame.rows() {
        wtr.write_record(frame.columns().iter().map(|c| match c.values[row] {
            Some(v) => v.to_string(),
            None => String::new(),
        }))?;
    }
    wtr.flush()?;
    Ok(())
}
