mod batch;
mod config;
mod constants;
mod error;
mod probe;
mod records;
mod report;
mod thermo;

use crate::batch::evaluate_batch;
use crate::config::{Args, ProgramConfig};
use crate::error::ProbeError;
use crate::records::{SequenceSource, read_fasta, read_probe_records};
use crate::report::{RecordSummary, summarize, write_results, write_summary};
use clap::Parser;
use std::fs::File;
use std::io::{BufReader, BufWriter};

fn main() -> Result<(), ProbeError> {
    env_logger::init();

    let args = Args::parse();
    log::debug!("args: {:?}", args);
    let program_config = ProgramConfig::from_args(args)?;

    if program_config.threads > 0 {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(program_config.threads)
            .build_global()
        {
            log::warn!("Could not size thread pool: {}", e);
        }
    }

    // 1. Read sequences and probe records
    let fasta: Option<SequenceSource> = match &program_config.fasta {
        Some(path) => {
            log::info!("Reading FASTA sequences from {}...", path);
            let sequences = read_fasta(File::open(path)?)?;
            log::info!(".... DONE, {} sequences.", sequences.len());
            Some(sequences)
        }
        None => None,
    };

    log::info!("Reading probe records...");
    let records = read_probe_records(
        BufReader::new(File::open(&program_config.input)?),
        program_config.delimiter,
        fasta.as_ref(),
    )?;
    log::info!(".... DONE, {} records.", records.len());

    // 2. Tile and score windows around every SNP
    log::info!("Scoring probe windows...");
    let outcomes = evaluate_batch(
        records,
        &program_config.conditions,
        program_config.check_ref_allele,
    );
    let mut failed = 0;
    let mut results = Vec::new();
    let mut summaries: Vec<RecordSummary> = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(windows) => {
                if let Some(summary) = summarize(&windows) {
                    log::info!(
                        "{}: {} windows, mean ΔTm={:.2}, std={:.2}, best length={} (ΔTm={:.2})",
                        summary.id,
                        summary.windows,
                        summary.mean_delta_tm,
                        summary.std_delta_tm,
                        summary.best_length,
                        summary.best_delta_tm
                    );
                    summaries.push(summary);
                }
                results.extend(windows);
            }
            Err(e) => {
                failed += 1;
                log::warn!("Skipping record: {}", e);
            }
        }
    }
    log::info!(".... DONE, {} windows, {} records failed.", results.len(), failed);

    // 3. Output
    log::info!("Outputting probes...");
    let rows = write_results(
        BufWriter::new(File::create(&program_config.output)?),
        program_config.delimiter,
        &results,
    )?;
    log::info!("Done outputting {} probes to {}", rows, program_config.output);

    if let Some(path) = &program_config.summary {
        write_summary(
            BufWriter::new(File::create(path)?),
            program_config.delimiter,
            &summaries,
        )?;
        log::info!("Done outputting summary to {}", path);
    }

    Ok(())
}
