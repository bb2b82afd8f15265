use crate::config::ReactionConditions;
use crate::constants::PROBE_LENGTHS;
use crate::error::ProbeError;
use crate::thermo::{round2, score};

/// Uppercased nucleotide string, indexed by character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NucleotideSequence {
    residues: Vec<char>,
}

impl NucleotideSequence {
    pub fn new(raw: &str) -> Self {
        NucleotideSequence {
            residues: raw.to_uppercase().chars().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn base_at(&self, index: usize) -> Option<char> {
        self.residues.get(index).copied()
    }

    fn slice(&self, start: usize, end: usize) -> String {
        self.residues[start..end].iter().collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProbeRecord {
    pub id: String,
    pub sequence: NucleotideSequence,
    /// 1-based
    pub snp_coordinate: i64,
    pub allele_ref: char,
    pub allele_alt: char,
}

impl ProbeRecord {
    pub fn new(
        id: &str,
        sequence: &str,
        snp_coordinate: i64,
        allele_ref: char,
        allele_alt: char,
    ) -> Self {
        ProbeRecord {
            id: id.to_string(),
            sequence: NucleotideSequence::new(sequence),
            snp_coordinate,
            allele_ref: allele_ref.to_ascii_uppercase(),
            allele_alt: allele_alt.to_ascii_uppercase(),
        }
    }

    /// Zero-based SNP index, or `SnpOutOfBounds` when the coordinate does not
    /// address a base of the sequence.
    pub fn snp_index(&self) -> Result<usize, ProbeError> {
        let length = self.sequence.len();
        match usize::try_from(self.snp_coordinate) {
            Ok(coordinate) if (1..=length).contains(&coordinate) => Ok(coordinate - 1),
            _ => Err(ProbeError::SnpOutOfBounds {
                record: self.id.clone(),
                coordinate: self.snp_coordinate,
                length,
            }),
        }
    }

    /// The sequence base at `snp_index` when it disagrees with `allele_ref`.
    pub fn reference_mismatch(&self, snp_index: usize) -> Option<char> {
        self.sequence
            .base_at(snp_index)
            .filter(|base| *base != self.allele_ref)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProbeWindowResult {
    pub id: String,
    pub probe_ref: String,
    pub probe_alt: String,
    pub length: usize,
    /// 1-based
    pub start: usize,
    /// 1-based
    pub snp_coordinate: usize,
    pub tm_ref: f64,
    pub tm_alt: f64,
    pub delta_tm: f64,
    pub delta_h_ref: f64,
    pub delta_h_alt: f64,
}

/// Half-open `[start, end)` window over the sequence, zero-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowPlacement {
    pub length: usize,
    pub start: usize,
    pub end: usize,
}

/// Centre a window of `length` on the SNP, clamped at the 5' end. Returns
/// `None` when the full length does not fit inside the sequence.
pub fn place_window(
    snp_index: usize,
    length: usize,
    sequence_len: usize,
) -> Option<WindowPlacement> {
    let start = snp_index.saturating_sub(length / 2);
    let end = (start + length).min(sequence_len);
    if end - start != length {
        log::trace!("length {} does not fit at start {}, skipped", length, start);
        return None;
    }
    if !(start..end).contains(&snp_index) {
        return None;
    }
    Some(WindowPlacement { length, start, end })
}

/// Replace the base at `position` with `allele`, leaving every other base as is.
pub fn substitute_allele(probe: &str, position: usize, allele: char) -> String {
    probe
        .chars()
        .enumerate()
        .map(|(idx, c)| if idx == position { allele } else { c })
        .collect()
}

fn evaluate_window(
    record: &ProbeRecord,
    placement: WindowPlacement,
    snp_index: usize,
    conditions: &ReactionConditions,
) -> Result<ProbeWindowResult, ProbeError> {
    let probe_ref = record.sequence.slice(placement.start, placement.end);
    let probe_alt = substitute_allele(&probe_ref, snp_index - placement.start, record.allele_alt);
    let score_ref = score(&probe_ref, conditions)?;
    let score_alt = score(&probe_alt, conditions)?;
    log::trace!(
        "{}: length={} start={} ref={} alt={} tm_ref={} tm_alt={}",
        record.id,
        placement.length,
        placement.start + 1,
        probe_ref,
        probe_alt,
        score_ref.tm,
        score_alt.tm
    );

    Ok(ProbeWindowResult {
        id: record.id.clone(),
        probe_ref,
        probe_alt,
        length: placement.length,
        start: placement.start + 1,
        snp_coordinate: snp_index + 1,
        tm_ref: score_ref.tm,
        tm_alt: score_alt.tm,
        delta_tm: round2(score_alt.tm - score_ref.tm),
        delta_h_ref: score_ref.delta_h,
        delta_h_alt: score_alt.delta_h,
    })
}

/// Enumerate every full-length probe window around the SNP, shortest first.
/// Lengths that cannot be placed are left out. The returned iterator is lazy
/// and can be cloned to restart it.
pub fn tile<'a>(
    record: &'a ProbeRecord,
    conditions: &'a ReactionConditions,
) -> Result<
    impl Iterator<Item = Result<ProbeWindowResult, ProbeError>> + Clone + 'a,
    ProbeError,
> {
    let snp_index = record.snp_index()?;
    let sequence_len = record.sequence.len();

    Ok(PROBE_LENGTHS
        .into_iter()
        .filter_map(move |length| place_window(snp_index, length, sequence_len))
        .map(move |placement| evaluate_window(record, placement, snp_index, conditions)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPEAT_20: &str = "ACGTACGTACGTACGTACGT";
    const SEQ_45: &str = "GATTACAGGCTTAACGGATCCTAGCTAGGCATCGATCGGATTACA";

    fn differing_positions(a: &str, b: &str) -> Vec<usize> {
        a.chars()
            .zip(b.chars())
            .enumerate()
            .filter(|(_, (x, y))| x != y)
            .map(|(idx, _)| idx)
            .collect()
    }

    fn tile_all(record: &ProbeRecord) -> Vec<ProbeWindowResult> {
        tile(record, &ReactionConditions::default())
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_place_window() {
        assert_eq!(
            place_window(9, 18, 20),
            Some(WindowPlacement {
                length: 18,
                start: 0,
                end: 18
            })
        );
        assert_eq!(
            place_window(22, 22, 45),
            Some(WindowPlacement {
                length: 22,
                start: 11,
                end: 33
            })
        );
        assert_eq!(place_window(0, 22, 20), None);
        // near the 3' end the window would have to shrink
        assert_eq!(place_window(40, 18, 45), None);
    }

    #[test]
    fn test_substitute_allele() {
        assert_eq!(substitute_allele("ACGT", 0, 'T'), "TCGT");
        assert_eq!(substitute_allele("ACGT", 3, 'A'), "ACGA");
        // substituting the base already present is a no-op
        assert_eq!(substitute_allele("ACGT", 2, 'G'), "ACGT");
    }

    #[test]
    fn test_known_values() {
        let record = ProbeRecord::new("rs1", REPEAT_20, 10, 'C', 'A');
        let conditions = ReactionConditions::default();
        let results = tile_all(&record);

        assert_eq!(results.len(), 3);
        let first = &results[0];
        assert_eq!(first.id, "rs1");
        assert_eq!(first.length, 18);
        assert_eq!(first.start, 1);
        assert_eq!(first.snp_coordinate, 10);
        assert_eq!(first.probe_ref, "ACGTACGTACGTACGTAC");
        assert_eq!(first.probe_alt, "ACGTACGTAAGTACGTAC");
        assert_eq!(first.tm_ref, 49.52);
        assert_eq!(first.tm_alt, 46.91);
        assert_eq!(first.delta_tm, -2.61);
        assert_eq!(first.delta_h_ref, -146.6);
        assert_eq!(first.delta_h_alt, -143.3);

        let tm_ref = score(&first.probe_ref, &conditions).unwrap().tm;
        assert_eq!(first.tm_ref, tm_ref);

        assert_eq!(results[1].length, 19);
        assert_eq!(results[1].tm_ref, 52.25);
        assert_eq!(results[1].tm_alt, 49.83);
        assert_eq!(results[1].delta_tm, -2.42);
        assert_eq!(results[2].length, 20);
        assert_eq!(results[2].probe_ref, REPEAT_20);
        assert_eq!(results[2].delta_h_alt, -162.3);
    }

    #[test]
    fn test_boundary_omission() {
        let record = ProbeRecord::new("edge", REPEAT_20, 1, 'A', 'G');
        let lengths: Vec<usize> = tile_all(&record).iter().map(|r| r.length).collect();
        assert_eq!(lengths, vec![18, 19, 20]);
    }

    #[test]
    fn test_all_lengths_interior_snp() {
        let record = ProbeRecord::new("mid", SEQ_45, 23, 'A', 'T');
        let results = tile_all(&record);

        let starts: Vec<(usize, usize)> = results.iter().map(|r| (r.length, r.start)).collect();
        assert_eq!(starts, vec![(18, 14), (19, 14), (20, 13), (21, 13), (22, 12)]);
        assert_eq!(results[4].probe_ref, "TAACGGATCCTAGCTAGGCATC");
        assert_eq!(results[4].probe_alt, "TAACGGATCCTTGCTAGGCATC");
        assert_eq!(results[4].tm_ref, 54.46);
        assert_eq!(results[4].tm_alt, 55.47);
        assert_eq!(results[4].delta_tm, 1.01);

        for result in &results {
            assert_eq!(result.probe_ref.len(), result.length);
            assert_eq!(result.probe_alt.len(), result.length);
            let offset = result.start - 1;
            assert_eq!(&SEQ_45[offset..offset + result.length], result.probe_ref);
            assert_eq!(
                differing_positions(&result.probe_ref, &result.probe_alt),
                vec![result.snp_coordinate - result.start]
            );
        }
    }

    #[test]
    fn test_reference_allele_substitution_is_identity() {
        let record = ProbeRecord::new("mid", SEQ_45, 23, 'A', 'T');
        for result in tile_all(&record) {
            let pos = result.snp_coordinate - result.start;
            assert_eq!(
                substitute_allele(&result.probe_ref, pos, record.allele_ref),
                result.probe_ref
            );
        }
        assert_eq!(record.reference_mismatch(22), None);
        let swapped = ProbeRecord::new("mid", SEQ_45, 23, 'G', 'T');
        assert_eq!(swapped.reference_mismatch(22), Some('A'));
    }

    #[test]
    fn test_tile_is_restartable_and_deterministic() {
        let record = ProbeRecord::new("mid", SEQ_45, 23, 'A', 'T');
        let conditions = ReactionConditions::default();
        let windows = tile(&record, &conditions).unwrap();
        let first: Vec<ProbeWindowResult> = windows.clone().map(Result::unwrap).collect();
        let second: Vec<ProbeWindowResult> = windows.map(Result::unwrap).collect();
        assert_eq!(first, second);
        assert_eq!(first, tile_all(&record));
    }

    #[test]
    fn test_lowercase_input_is_normalized() {
        let record = ProbeRecord::new("low", &REPEAT_20.to_lowercase(), 10, 'c', 'a');
        let first = tile_all(&record).remove(0);
        assert_eq!(first.probe_ref, "ACGTACGTACGTACGTAC");
        assert_eq!(first.probe_alt, "ACGTACGTAAGTACGTAC");
    }

    #[test]
    fn test_short_sequence_yields_nothing() {
        let record = ProbeRecord::new("short", "ACGTACGTAC", 5, 'A', 'G');
        let conditions = ReactionConditions::default();
        assert_eq!(tile(&record, &conditions).unwrap().count(), 0);
    }

    #[test]
    fn test_snp_out_of_bounds() {
        let conditions = ReactionConditions::default();
        for coordinate in [0, -3, 21] {
            let record = ProbeRecord::new("oob", REPEAT_20, coordinate, 'A', 'G');
            match tile(&record, &conditions) {
                Err(ProbeError::SnpOutOfBounds {
                    record,
                    coordinate: c,
                    length,
                }) => {
                    assert_eq!(record, "oob");
                    assert_eq!(c, coordinate);
                    assert_eq!(length, 20);
                }
                _ => panic!("expected SnpOutOfBounds for {}", coordinate),
            }
        }
        let record = ProbeRecord::new("last", REPEAT_20, 20, 'T', 'G');
        assert!(tile(&record, &conditions).is_ok());
    }
}
