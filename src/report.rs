use std::io::Write;
use std_dev::standard_deviation;

use crate::constants::{RESULT_HEADER, SUMMARY_HEADER};
use crate::error::ProbeError;
use crate::probe::ProbeWindowResult;

/// Write result rows under the canonical header, floats with two decimals.
pub fn write_results<'a, W: Write>(
    dst: W,
    delimiter: u8,
    results: impl IntoIterator<Item = &'a ProbeWindowResult>,
) -> Result<usize, ProbeError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(dst);
    writer.write_record(RESULT_HEADER)?;
    let mut rows = 0;
    for result in results {
        writer.write_record([
            result.id.as_str(),
            result.probe_ref.as_str(),
            result.probe_alt.as_str(),
            &result.length.to_string(),
            &result.start.to_string(),
            &result.snp_coordinate.to_string(),
            &format!("{:.2}", result.tm_ref),
            &format!("{:.2}", result.tm_alt),
            &format!("{:.2}", result.delta_tm),
            &format!("{:.2}", result.delta_h_ref),
            &format!("{:.2}", result.delta_h_alt),
        ])?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordSummary {
    pub id: String,
    pub windows: usize,
    pub mean_delta_tm: f32,
    pub std_delta_tm: f32,
    pub best_length: usize,
    pub best_delta_tm: f64,
}

/**
 * Summarise the ΔTm spread of one record's windows.
 *
 * The best window is the one with the largest |ΔTm|; ties go to the shorter probe.
 */
pub fn summarize(windows: &[ProbeWindowResult]) -> Option<RecordSummary> {
    let first = windows.first()?;
    let best = windows.iter().fold(first, |best, w| {
        if w.delta_tm.abs() > best.delta_tm.abs() {
            w
        } else {
            best
        }
    });

    let values: Vec<f32> = windows.iter().map(|w| w.delta_tm as f32).collect();
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    let std = match values.len() {
        1 => 0.0,
        _ => standard_deviation(&values).standard_deviation,
    };

    Some(RecordSummary {
        id: first.id.clone(),
        windows: windows.len(),
        mean_delta_tm: mean,
        std_delta_tm: std,
        best_length: best.length,
        best_delta_tm: best.delta_tm,
    })
}

pub fn write_summary<'a, W: Write>(
    dst: W,
    delimiter: u8,
    summaries: impl IntoIterator<Item = &'a RecordSummary>,
) -> Result<(), ProbeError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(dst);
    writer.write_record(SUMMARY_HEADER)?;
    for summary in summaries {
        writer.write_record([
            summary.id.as_str(),
            &summary.windows.to_string(),
            &format!("{:.2}", summary.mean_delta_tm),
            &format!("{:.2}", summary.std_delta_tm),
            &summary.best_length.to_string(),
            &format!("{:.2}", summary.best_delta_tm),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
