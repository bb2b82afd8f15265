// Gas constant, cal/(K*mol)
pub const GAS_CONSTANT: f64 = 1.987;
// Primer concentration (mol/L)
pub const PRIMER_CONC: f64 = 500e-9;
// Monovalent salt concentration (mol/L)
pub const SALT_CONC: f64 = 50e-3;
pub const KELVIN_OFFSET: f64 = 273.15;
pub const SALT_CORRECTION_FACTOR: f64 = 16.6;

// Helix initiation corrections (kcal/mol, cal/(K*mol))
pub const INIT_DELTA_H: f64 = 0.2;
pub const INIT_DELTA_S: f64 = -1.4;

// Used for any dinucleotide outside the A/C/G/T table
pub const DEFAULT_DELTA_H: f64 = -7.0;
pub const DEFAULT_DELTA_S: f64 = -20.0;

pub const MIN_SCORABLE_LENGTH: usize = 2;
pub const PROBE_LENGTHS: [usize; 5] = [18, 19, 20, 21, 22];

pub const DEFAULT_THREADS: usize = 0;
// Appended to the input file stem when no output path is given
pub const OUTPUT_SUFFIX: &str = "_evaluado";

// Input column names
pub const COL_ID: &str = "ID";
pub const COL_SEQUENCE: &str = "Secuencia";
pub const COL_COORDINATE: &str = "Coordenada SNP";
pub const COL_ALLELE_REF: &str = "Alelo_Ref";
pub const COL_ALLELE_ALT: &str = "Alelo_Alt";

// Output columns, canonical order
pub const RESULT_HEADER: [&str; 11] = [
    "ID",
    "Sonda_ref",
    "Sonda_alt",
    "Longitud",
    "Inicio",
    "SNP Central",
    "Tm_ref (°C)",
    "Tm_alt (°C)",
    "ΔTm (°C)",
    "ΔH_ref (kcal/mol)",
    "ΔH_alt (kcal/mol)",
];
pub const SUMMARY_HEADER: [&str; 6] = [
    "id",
    "windows",
    "mean_delta_tm",
    "std_delta_tm",
    "best_length",
    "best_delta_tm",
];
