use rayon::prelude::*;

use crate::config::ReactionConditions;
use crate::error::ProbeError;
use crate::probe::{ProbeRecord, ProbeWindowResult, tile};

pub type RecordOutcome = Result<Vec<ProbeWindowResult>, ProbeError>;

pub fn evaluate_record(
    record: &ProbeRecord,
    conditions: &ReactionConditions,
    check_ref_allele: bool,
) -> RecordOutcome {
    let snp_index = record.snp_index()?;
    if check_ref_allele {
        if let Some(base) = record.reference_mismatch(snp_index) {
            log::warn!(
                "{}: Alelo_Ref {} does not match sequence base {} at {}",
                record.id,
                record.allele_ref,
                base,
                record.snp_coordinate
            );
        }
    }
    let windows = tile(record, conditions)?.collect::<Result<Vec<_>, _>>()?;
    log::debug!("{}: {} windows", record.id, windows.len());
    Ok(windows)
}

/// Evaluate every parsed row independently, preserving input order. Rows that
/// already failed to parse pass their error through untouched.
pub fn evaluate_batch(
    records: Vec<Result<ProbeRecord, ProbeError>>,
    conditions: &ReactionConditions,
    check_ref_allele: bool,
) -> Vec<RecordOutcome> {
    records
        .into_par_iter()
        .map(|record| evaluate_record(&record?, conditions, check_ref_allele))
        .collect()
}
