use itertools::Itertools;
use std::collections::HashMap;
use std::sync::LazyLock;

use crate::config::ReactionConditions;
use crate::constants::{
    DEFAULT_DELTA_H, DEFAULT_DELTA_S, INIT_DELTA_H, INIT_DELTA_S, KELVIN_OFFSET,
    MIN_SCORABLE_LENGTH, SALT_CORRECTION_FACTOR,
};
use crate::error::ProbeError;

/// Enthalpy (kcal/mol) and entropy (cal/(K*mol)) of one stacked base pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NnParams {
    pub delta_h: f64,
    pub delta_s: f64,
}

pub const DEFAULT_NN_PARAMS: NnParams = NnParams {
    delta_h: DEFAULT_DELTA_H,
    delta_s: DEFAULT_DELTA_S,
};

/// SantaLucia (1998) unified nearest-neighbor parameters, keyed by the
/// dinucleotide as read 5'->3' on the probe strand.
static NN_TABLE: LazyLock<HashMap<[u8; 2], NnParams>> = LazyLock::new(|| {
    const RAW_NN: [(&[u8; 2], (f64, f64)); 16] = [
        (b"AA", (-7.9, -22.2)),
        (b"TT", (-7.9, -22.2)),
        (b"AT", (-7.2, -20.4)),
        (b"TA", (-7.2, -21.3)),
        (b"CA", (-8.5, -22.7)),
        (b"TG", (-8.5, -22.7)),
        (b"GT", (-8.4, -22.4)),
        (b"AC", (-8.4, -22.4)),
        (b"CT", (-7.8, -21.0)),
        (b"AG", (-7.8, -21.0)),
        (b"GA", (-8.2, -22.2)),
        (b"TC", (-8.2, -22.2)),
        (b"CG", (-10.6, -27.2)),
        (b"GC", (-9.8, -24.4)),
        (b"GG", (-8.0, -19.9)),
        (b"CC", (-8.0, -19.9)),
    ];

    RAW_NN
        .iter()
        .map(|(pair, (delta_h, delta_s))| {
            (
                **pair,
                NnParams {
                    delta_h: *delta_h,
                    delta_s: *delta_s,
                },
            )
        })
        .collect()
});

/// Look up a dinucleotide, falling back to `DEFAULT_NN_PARAMS` for anything
/// outside the 16 canonical pairs (ambiguity codes, gaps, non-ASCII).
pub fn nn_params(first: char, second: char) -> NnParams {
    let key = match (u8::try_from(first), u8::try_from(second)) {
        (Ok(a), Ok(b)) => [a.to_ascii_uppercase(), b.to_ascii_uppercase()],
        _ => return DEFAULT_NN_PARAMS,
    };
    NN_TABLE.get(&key).copied().unwrap_or(DEFAULT_NN_PARAMS)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThermoScore {
    /// Melting temperature, °C
    pub tm: f64,
    /// Cumulative enthalpy including initiation, kcal/mol
    pub delta_h: f64,
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sum of all stacked pairs plus the helix initiation terms.
fn nearest_neighbor_sum(sequence: &str) -> NnParams {
    let stacked = sequence
        .chars()
        .tuple_windows()
        .map(|(a, b)| nn_params(a, b))
        .fold((0.0, 0.0), |(dh, ds), p| (dh + p.delta_h, ds + p.delta_s));
    NnParams {
        delta_h: stacked.0 + INIT_DELTA_H,
        delta_s: stacked.1 + INIT_DELTA_S,
    }
}

/// Two-state Tm with a monovalent salt correction.
fn melting_temperature(sequence: &str, conditions: &ReactionConditions) -> ThermoScore {
    let total = nearest_neighbor_sum(sequence);
    let tm = (1000.0 * total.delta_h)
        / (total.delta_s + conditions.gas_constant * conditions.primer_conc.ln())
        - KELVIN_OFFSET
        + SALT_CORRECTION_FACTOR * conditions.salt_conc.log10();
    ThermoScore {
        tm: round2(tm),
        delta_h: round2(total.delta_h),
    }
}

/// Score a probe sequence with the nearest-neighbor model. The whole sequence
/// is uppercased first, so its length may change (`ß` becomes `SS`).
pub fn score(
    sequence: &str,
    conditions: &ReactionConditions,
) -> Result<ThermoScore, ProbeError> {
    let normalized = sequence.to_uppercase();
    let length = normalized.chars().count();
    if length < MIN_SCORABLE_LENGTH {
        return Err(ProbeError::InvalidInputLength { length });
    }
    Ok(melting_temperature(&normalized, conditions))
}
