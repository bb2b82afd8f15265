use crate::constants::{DEFAULT_THREADS, GAS_CONSTANT, OUTPUT_SUFFIX, PRIMER_CONC, SALT_CONC};
use crate::error::ProbeError;
use std::path::Path;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about=None)]
pub struct Args {
    #[arg(
        short,
        long,
        help = "Delimited table with ID, Secuencia, Coordenada SNP, Alelo_Ref, Alelo_Alt"
    )]
    pub input: String,

    #[arg(short, long, help = "Defaults to <input>_evaluado next to the input")]
    pub output: Option<String>,

    #[arg(long, env = "PROBE_FASTA", help = "FASTA file used for rows with an empty Secuencia")]
    pub fasta: Option<String>,

    #[arg(long, env = "SUMMARY", help = "Write per-record ΔTm summary to this path")]
    pub summary: Option<String>,

    // Primer concentration (mol/L)
    #[arg(long, env = "PRIMER_CONC", default_value_t = PRIMER_CONC)]
    pub primer_conc: f64,
    // Monovalent salt concentration (mol/L)
    #[arg(long, env = "SALT_CONC", default_value_t = SALT_CONC)]
    pub salt_conc: f64,

    #[arg(
        long,
        env = "THREADS",
        default_value_t = DEFAULT_THREADS,
        help = "Worker threads, 0 uses all cores"
    )]
    pub threads: usize,

    // logic based config
    #[arg(
        long,
        env = "TSV",
        default_value = "false",
        value_parser = ["true", "false"],
        help = "Read and write tab-delimited tables instead of CSV."
    )]
    pub tsv: String,

    #[arg(
        long,
        env = "CHECK_REF_ALLELE",
        default_value = "true",
        value_parser = ["true", "false"],
        help = "Warns when Alelo_Ref differs from the sequence base at the SNP coordinate."
    )]
    pub check_ref_allele: String,
}

/// Physical constants of the hybridization reaction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReactionConditions {
    pub gas_constant: f64,
    pub primer_conc: f64,
    pub salt_conc: f64,
}

impl Default for ReactionConditions {
    fn default() -> Self {
        ReactionConditions {
            gas_constant: GAS_CONSTANT,
            primer_conc: PRIMER_CONC,
            salt_conc: SALT_CONC,
        }
    }
}

impl ReactionConditions {
    pub fn new(primer_conc: f64, salt_conc: f64) -> Result<Self, ProbeError> {
        for (name, value) in [("primer_conc", primer_conc), ("salt_conc", salt_conc)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ProbeError::InvalidCondition { name, value });
            }
        }
        Ok(ReactionConditions {
            primer_conc,
            salt_conc,
            ..Default::default()
        })
    }
}

#[derive(Clone, Debug)]
pub struct ProgramConfig {
    pub input: String,
    pub output: String,
    pub fasta: Option<String>,
    pub summary: Option<String>,

    pub threads: usize,
    pub delimiter: u8,
    pub check_ref_allele: bool,

    pub conditions: ReactionConditions,
}

/// `dir/probes.csv` -> `dir/probes_evaluado.csv`
pub fn default_output_path(input: &str) -> String {
    let path = Path::new(input);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, OUTPUT_SUFFIX, ext.to_string_lossy()),
        None => format!("{}{}", stem, OUTPUT_SUFFIX),
    };
    path.with_file_name(name).to_string_lossy().to_string()
}

impl ProgramConfig {
    pub fn from_args(args: Args) -> Result<Self, ProbeError> {
        let conditions = ReactionConditions::new(args.primer_conc, args.salt_conc)?;
        let delimiter = match args.tsv.as_str() == "true" {
            true => b'\t',
            false => b',',
        };
        let output = args
            .output
            .unwrap_or_else(|| default_output_path(&args.input));
        Ok(ProgramConfig {
            input: args.input,
            output,
            fasta: args.fasta,
            summary: args.summary,
            threads: args.threads,
            delimiter,
            check_ref_allele: args.check_ref_allele.as_str() == "true",
            conditions,
        })
    }
}
